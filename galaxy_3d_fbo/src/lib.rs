/*!
# Galaxy 3D FBO

Render-target attachment sets for the Galaxy 3D engine.

A render target is a bundle of images (color, depth, stencil) that draw
calls write into. This crate validates a requested bundle, creates the
storages the request leaves to defaults, binds everything into
framebuffer objects, and keeps multisample resolves and mipmap chains
up to date lazily, only when an attachment is actually read.

## Architecture

- **GraphicsDevice**: Backend trait creating storages and framebuffers
- **Context**: Shared device handle, memoized limits, binding stacks
- **FboFormat**: Builder describing the requested attachments
- **AttachmentValidator**: Cross-attachment rules, checked before allocation
- **AttachmentProvisioner**: Sample negotiation and default storages
- **DrawTargetBinder**: Primary and shadow (multisample) framebuffers
- **ResolveMipmapScheduler**: Dirty flags, resolve blits, mipmap regeneration
- **RenderTarget**: The public object tying these together

Backends implement `GraphicsDevice`; everything above it is backend-agnostic.
*/

// Internal modules
mod error;
pub mod log;
pub mod graphics_device;
pub mod fbo;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Render targets
    pub use crate::fbo::{FboFormat, RenderTarget, RenderTargetCubeMap, TextureFormatRequest};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Render sub-module with the device-facing types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Attachment engine sub-module
    pub mod fbo {
        pub use crate::fbo::*;
    }
}

// Re-export math library at crate root
pub use glam;
