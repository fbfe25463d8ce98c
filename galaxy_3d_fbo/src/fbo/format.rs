/// FboFormat - the caller's request for a render target
///
/// Describes which default attachments to provision (color, depth,
/// stencil), whether each is texture- or renderbuffer-backed, the
/// multisampling parameters, and any explicit attachments that override
/// the defaults.

use std::sync::Arc;

use crate::fbo::Storage;
use crate::graphics_device::{AttachmentPoint, Texture, TextureDesc, TextureFormat, TextureType};

// ===== BACKING =====

/// Storage kind requested for a default attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    Texture,
    Buffer,
}

// ===== TEXTURE FORMAT REQUEST =====

/// Template for the default color texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureFormatRequest {
    pub format: TextureFormat,
    pub texture_type: TextureType,
    /// Slices of a 3D texture
    pub depth: u32,
    /// Layers of an array texture
    pub array_layers: u32,
    pub fixed_sample_locations: bool,
    pub mipmap: bool,
}

impl TextureFormatRequest {
    /// Single-sampled 2D texture
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            texture_type: TextureType::Tex2D,
            depth: 1,
            array_layers: 1,
            fixed_sample_locations: true,
            mipmap: false,
        }
    }

    pub fn tex_1d(mut self) -> Self {
        self.texture_type = TextureType::Tex1D;
        self
    }

    pub fn tex_3d(mut self, depth: u32) -> Self {
        self.texture_type = TextureType::Tex3D;
        self.depth = depth.max(1);
        self
    }

    pub fn array(mut self, layers: u32) -> Self {
        self.texture_type = TextureType::Array2D;
        self.array_layers = layers.max(1);
        self
    }

    pub fn cube(mut self) -> Self {
        self.texture_type = TextureType::Cube;
        self
    }

    pub fn fixed_sample_locations(mut self, fixed: bool) -> Self {
        self.fixed_sample_locations = fixed;
        self
    }

    pub fn mipmap(mut self, mipmap: bool) -> Self {
        self.mipmap = mipmap;
        self
    }

    /// Descriptor for a `width` x `height` texture at `samples`
    pub fn to_desc(&self, width: u32, height: u32, samples: u32) -> TextureDesc {
        TextureDesc {
            width,
            height: if self.texture_type == TextureType::Tex1D { 1 } else { height },
            depth: if self.texture_type == TextureType::Tex3D { self.depth } else { 1 },
            array_layers: if self.texture_type == TextureType::Array2D { self.array_layers } else { 1 },
            texture_type: self.texture_type,
            format: self.format,
            samples: samples.max(1),
            fixed_sample_locations: self.fixed_sample_locations,
            // Multisample textures have no mip chain
            mipmap: self.mipmap && samples <= 1,
        }
    }
}

// ===== EXPLICIT ATTACHMENTS =====

/// Attachment supplied by the caller
#[derive(Clone)]
pub struct ExplicitAttachment {
    pub point: AttachmentPoint,
    pub storage: Storage,
    pub resolve: Option<Arc<dyn Texture>>,
}

// ===== FORMAT =====

/// Render target request
///
/// Defaults: an RGBA8 color texture, a 24-bit depth renderbuffer, no
/// stencil, no multisampling, automatic resolve and mipmap regeneration.
#[derive(Clone)]
pub struct FboFormat {
    color: Option<Backing>,
    color_texture_format: TextureFormatRequest,
    color_buffer_format: TextureFormat,
    depth: Option<Backing>,
    depth_format: TextureFormat,
    stencil: Option<Backing>,
    stencil_format: TextureFormat,
    samples: u32,
    coverage_samples: u32,
    auto_resolve: bool,
    auto_mipmap: bool,
    attachments: Vec<ExplicitAttachment>,
    label: Option<String>,
}

impl Default for FboFormat {
    fn default() -> Self {
        Self {
            color: Some(Backing::Texture),
            color_texture_format: TextureFormatRequest::new(TextureFormat::R8G8B8A8_UNORM),
            color_buffer_format: TextureFormat::R8G8B8A8_UNORM,
            depth: Some(Backing::Buffer),
            depth_format: TextureFormat::D24_UNORM,
            stencil: None,
            stencil_format: TextureFormat::S8_UINT,
            samples: 0,
            coverage_samples: 0,
            auto_resolve: true,
            auto_mipmap: true,
            attachments: Vec::new(),
            label: None,
        }
    }
}

impl FboFormat {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== BUILDER =====

    /// Default color attachment as a texture built from `request`
    pub fn color_texture(mut self, request: TextureFormatRequest) -> Self {
        self.color = Some(Backing::Texture);
        self.color_texture_format = request;
        self
    }

    /// Default color attachment as a renderbuffer
    pub fn color_buffer(mut self, format: TextureFormat) -> Self {
        self.color = Some(Backing::Buffer);
        self.color_buffer_format = format;
        self
    }

    pub fn disable_color(mut self) -> Self {
        self.color = None;
        self
    }

    /// Default depth attachment as a texture
    pub fn depth_texture(mut self, format: TextureFormat) -> Self {
        self.depth = Some(Backing::Texture);
        self.depth_format = format;
        self
    }

    /// Default depth attachment as a renderbuffer
    pub fn depth_buffer(mut self, format: TextureFormat) -> Self {
        self.depth = Some(Backing::Buffer);
        self.depth_format = format;
        self
    }

    pub fn disable_depth(mut self) -> Self {
        self.depth = None;
        self
    }

    /// Default stencil attachment as a texture
    pub fn stencil_texture(mut self) -> Self {
        self.stencil = Some(Backing::Texture);
        self
    }

    /// Default stencil attachment as a renderbuffer
    pub fn stencil_buffer(mut self) -> Self {
        self.stencil = Some(Backing::Buffer);
        self
    }

    /// Format of stencil-only defaults
    pub fn stencil_format(mut self, format: TextureFormat) -> Self {
        self.stencil_format = format;
        self
    }

    pub fn disable_stencil(mut self) -> Self {
        self.stencil = None;
        self
    }

    /// Sample count of default attachments (0 or 1 = no multisampling)
    pub fn samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    /// Coverage sample count of default renderbuffers
    pub fn coverage_samples(mut self, coverage_samples: u32) -> Self {
        self.coverage_samples = coverage_samples;
        self
    }

    pub fn auto_resolve(mut self, enabled: bool) -> Self {
        self.auto_resolve = enabled;
        self
    }

    pub fn auto_mipmap(mut self, enabled: bool) -> Self {
        self.auto_mipmap = enabled;
        self
    }

    /// Explicit attachment at `point`, replacing any earlier one there
    pub fn attach(
        mut self,
        point: AttachmentPoint,
        storage: impl Into<Storage>,
        resolve: Option<Arc<dyn Texture>>,
    ) -> Self {
        self.attachments.retain(|attachment| attachment.point != point);
        self.attachments.push(ExplicitAttachment { point, storage: storage.into(), resolve });
        self
    }

    /// Remove the explicit attachment at `point`
    pub fn detach(mut self, point: AttachmentPoint) -> Self {
        self.attachments.retain(|attachment| attachment.point != point);
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    // ===== ACCESSORS =====

    pub fn color_backing(&self) -> Option<Backing> {
        self.color
    }

    pub fn color_texture_format(&self) -> &TextureFormatRequest {
        &self.color_texture_format
    }

    pub fn color_buffer_format(&self) -> TextureFormat {
        self.color_buffer_format
    }

    pub fn depth_backing(&self) -> Option<Backing> {
        self.depth
    }

    pub fn depth_format(&self) -> TextureFormat {
        self.depth_format
    }

    pub fn stencil_backing(&self) -> Option<Backing> {
        self.stencil
    }

    pub fn stencil_format_value(&self) -> TextureFormat {
        self.stencil_format
    }

    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    pub fn coverage_sample_count(&self) -> u32 {
        self.coverage_samples
    }

    pub fn is_auto_resolve(&self) -> bool {
        self.auto_resolve
    }

    pub fn is_auto_mipmap(&self) -> bool {
        self.auto_mipmap
    }

    pub fn attachments(&self) -> &[ExplicitAttachment] {
        &self.attachments
    }

    pub fn label_value(&self) -> Option<&str> {
        self.label.as_deref()
    }

    // ===== NORMALIZATION =====

    pub(crate) fn set_backings(
        &mut self,
        color: Option<Backing>,
        depth: Option<Backing>,
        stencil: Option<Backing>,
    ) {
        self.color = color;
        self.depth = depth;
        self.stencil = stencil;
    }

    pub(crate) fn set_sample_counts(&mut self, samples: u32, coverage_samples: u32) {
        self.samples = samples;
        self.coverage_samples = coverage_samples;
    }

    /// Explicit attachments are consumed by construction
    pub(crate) fn take_attachments(&mut self) -> Vec<ExplicitAttachment> {
        std::mem::take(&mut self.attachments)
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
