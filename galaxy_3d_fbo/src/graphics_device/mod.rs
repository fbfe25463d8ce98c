/// Graphics device module - backend traits, descriptors, and the shared context

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod renderbuffer;
pub mod frame_buffer;
pub mod area;
pub mod context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use renderbuffer::*;
pub use frame_buffer::*;
pub use area::*;
pub use context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
