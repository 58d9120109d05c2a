//! Error types for GPU setup and the demo driver.

use std::fmt;

/// Errors that can occur while bringing up the GPU context.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::AdapterRequest(e) => write!(
                f,
                "No compatible GPU adapter found ({}). Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.",
                e
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::AdapterRequest(e) => Some(e),
        }
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::AdapterRequest(e)
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the demo application.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
