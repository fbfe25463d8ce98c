/// Render target module - attachment sets, their validation and provisioning,
/// the framebuffer objects behind them, and lazy resolve / mipmap upkeep

// Module declarations
pub mod aspect;
pub mod attachment;
pub mod attachment_set;
pub mod format;
pub mod validator;
pub mod provisioner;
pub mod binder;
pub mod scheduler;
pub mod completeness;
pub mod pixel_buffer;
pub mod render_target;
pub mod cube_map;

// Re-export the public surface
pub use aspect::{Aspect, aspect_of, allowed_aspect, format_fits_point};
pub use attachment::{Attachment, Storage};
pub use attachment_set::AttachmentSet;
pub use format::{Backing, ExplicitAttachment, FboFormat, TextureFormatRequest};
pub use validator::{DefaultRequests, ValidationSummary};
pub use provisioner::{AttachmentProvisioner, SampleSettings};
pub use binder::DrawTargetBinder;
pub use scheduler::{AttachmentSelection, ResolveMipmapScheduler};
pub use completeness::{CompletenessChecker, IncompleteReason};
pub use pixel_buffer::PixelBuffer;
pub use render_target::RenderTarget;
pub use cube_map::{CubeFace, RenderTargetCubeMap};
