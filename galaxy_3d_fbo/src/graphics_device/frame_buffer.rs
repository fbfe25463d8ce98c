/// Framebuffer trait - a device object grouping attachment slots
///
/// Textures and renderbuffers are attached to a framebuffer at an
/// `AttachmentPoint`. The framebuffer itself owns no storage.

use std::fmt;

/// Framebuffer device object
///
/// Created via `GraphicsDevice::create_framebuffer()`.
/// The device handle is released when the last reference is dropped.
pub trait Framebuffer: Send + Sync {
    /// Backend object id
    fn id(&self) -> u32;
}

/// Attachment slot of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentPoint {
    /// Color slot `index` (bounded by the driver's max color attachments)
    Color(u32),
    /// Depth-only slot
    Depth,
    /// Stencil-only slot
    Stencil,
    /// Combined depth-stencil slot
    DepthStencil,
}

impl AttachmentPoint {
    /// Returns true for color slots
    pub fn is_color(&self) -> bool {
        matches!(self, AttachmentPoint::Color(_))
    }
}

impl fmt::Display for AttachmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentPoint::Color(index) => write!(f, "COLOR{}", index),
            AttachmentPoint::Depth => write!(f, "DEPTH"),
            AttachmentPoint::Stencil => write!(f, "STENCIL"),
            AttachmentPoint::DepthStencil => write!(f, "DEPTH_STENCIL"),
        }
    }
}

/// Which framebuffer binding an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferKind {
    /// Destination of draw calls and blits
    Draw,
    /// Source of blits and pixel reads
    Read,
    /// Both draw and read bindings
    DrawRead,
}

impl FramebufferKind {
    pub fn includes_draw(&self) -> bool {
        matches!(self, FramebufferKind::Draw | FramebufferKind::DrawRead)
    }

    pub fn includes_read(&self) -> bool {
        matches!(self, FramebufferKind::Read | FramebufferKind::DrawRead)
    }
}

/// Raw completeness status reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    Unsupported,
    IncompleteMissingAttachment,
    IncompleteAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    IncompleteMultisample,
    IncompleteLayerTargets,
    IncompleteDimensions,
    /// Backend-specific status code with no portable meaning
    Other(u32),
}
