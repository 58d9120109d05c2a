//! Validates the particle WGSL with naga, catching shader errors without a
//! GPU in the loop.

use naga::valid::{Capabilities, ValidationFlags, Validator};

#[test]
fn particle_shader_parses_and_validates() {
    let module = naga::front::wgsl::parse_str(plume::SHADER_SOURCE)
        .expect("particle shader should parse as WGSL");

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::empty());
    validator
        .validate(&module)
        .expect("particle shader should validate");
}

#[test]
fn particle_shader_has_expected_entry_points() {
    let module = naga::front::wgsl::parse_str(plume::SHADER_SOURCE).unwrap();
    let names: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}
