/// GraphicsDevice trait - the backend interface used by render targets

use std::sync::Arc;
use bitflags::bitflags;

use crate::error::Result;
use crate::graphics_device::{
    Area, AttachmentPoint, Framebuffer, FramebufferKind, FramebufferStatus,
    Renderbuffer, RenderbufferDesc, Texture, TextureDesc, TextureFormat,
};

// ============================================================================
// Common types
// ============================================================================

/// Integer limits queried from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverLimit {
    /// Number of color attachment slots per framebuffer
    MaxColorAttachments,
    /// Highest sample count accepted for any format
    MaxSamples,
}

/// Optional device capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFeature {
    /// Renderbuffers accept a coverage sample count
    CoverageSampling,
    /// Textures can be multisampled
    TextureMultisample,
}

/// Filter applied when a blit scales its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlitFilter {
    #[default]
    Nearest,
    Linear,
}

bitflags! {
    /// Buffers copied by a blit
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlitMask: u32 {
        const COLOR   = 0b0001;
        const DEPTH   = 0b0010;
        const STENCIL = 0b0100;
    }
}

/// Descriptor for a framebuffer-to-framebuffer copy
#[derive(Clone, Copy)]
pub struct BlitDesc<'a> {
    /// Source framebuffer (None = default framebuffer)
    pub src: Option<&'a Arc<dyn Framebuffer>>,
    /// Destination framebuffer (None = default framebuffer)
    pub dst: Option<&'a Arc<dyn Framebuffer>>,
    /// Restricts the copy to one slot on both sides (None = current read/draw buffers)
    pub attachment: Option<AttachmentPoint>,
    /// Source rectangle
    pub src_area: Area,
    /// Destination rectangle
    pub dst_area: Area,
    /// Buffers to copy
    pub mask: BlitMask,
    /// Scaling filter
    pub filter: BlitFilter,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Backend interface for framebuffer management
///
/// Implemented by backend-specific devices. Render targets hold the device
/// through a `Context` as `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create an opaque renderbuffer
    fn create_renderbuffer(&mut self, desc: RenderbufferDesc) -> Result<Arc<dyn Renderbuffer>>;

    /// Create an empty framebuffer object
    fn create_framebuffer(&mut self) -> Result<Arc<dyn Framebuffer>>;

    /// Attach a mip level of a texture (all layers for arrays and 3D textures)
    fn attach_texture(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        texture: &Arc<dyn Texture>,
        level: u32,
    ) -> Result<()>;

    /// Attach a single face of a cube map texture
    ///
    /// # Arguments
    ///
    /// * `face` - Face index in +X, -X, +Y, -Y, +Z, -Z order
    /// * `level` - Mip level
    fn attach_texture_face(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        texture: &Arc<dyn Texture>,
        face: u32,
        level: u32,
    ) -> Result<()>;

    /// Attach a renderbuffer
    fn attach_renderbuffer(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        renderbuffer: &Arc<dyn Renderbuffer>,
    ) -> Result<()>;

    /// Clear a slot
    fn detach(&mut self, framebuffer: &Arc<dyn Framebuffer>, point: AttachmentPoint) -> Result<()>;

    /// Configure the color slots written by draw calls, in order
    ///
    /// An empty list disables color writes.
    fn set_draw_buffers(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        points: &[AttachmentPoint],
    ) -> Result<()>;

    /// Query framebuffer completeness
    fn framebuffer_status(&self, framebuffer: &Arc<dyn Framebuffer>) -> FramebufferStatus;

    /// Bind a framebuffer (None = default framebuffer)
    fn bind_framebuffer(
        &mut self,
        kind: FramebufferKind,
        framebuffer: Option<&Arc<dyn Framebuffer>>,
    ) -> Result<()>;

    /// Copy a rectangle between framebuffers
    fn blit(&mut self, desc: &BlitDesc<'_>) -> Result<()>;

    /// Regenerate the mipmap chain of a texture from its base level
    fn generate_mipmaps(&mut self, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Read RGBA8 pixels from a slot, rows bottom-up
    fn read_pixels(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        area: Area,
    ) -> Result<Vec<u8>>;

    /// Attach a debug label to a framebuffer
    fn set_label(&mut self, framebuffer: &Arc<dyn Framebuffer>, label: &str) -> Result<()>;

    /// Query a driver limit
    fn query_limit(&self, limit: DriverLimit) -> u32;

    /// Highest sample count supported for `format`
    fn sample_count_limit(&self, format: TextureFormat) -> u32;

    /// Query an optional capability
    fn supports(&self, feature: DeviceFeature) -> bool;
}
