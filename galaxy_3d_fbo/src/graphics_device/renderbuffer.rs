/// Renderbuffer trait and descriptor
///
/// A renderbuffer is opaque storage that can be rendered into but never
/// sampled. Multisampled color renderbuffers must be resolved into a
/// texture before their contents can be read by a shader.

use crate::graphics_device::TextureFormat;

/// Descriptor for creating a renderbuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderbufferDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Sample count (1 = single-sampled)
    pub samples: u32,
    /// Coverage sample count (0 = no coverage sampling)
    pub coverage_samples: u32,
}

/// Read-only properties of a created renderbuffer
pub type RenderbufferInfo = RenderbufferDesc;

/// Renderbuffer resource trait
///
/// The renderbuffer is automatically destroyed when its last reference is dropped.
pub trait Renderbuffer: Send + Sync {
    /// Get the read-only properties of this renderbuffer
    fn info(&self) -> &RenderbufferInfo;

    /// Backend object id
    fn id(&self) -> u32;
}
