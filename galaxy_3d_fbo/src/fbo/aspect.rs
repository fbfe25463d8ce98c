/// Attachment classification: pixel format aspects and the aspect each
/// attachment point accepts.

use crate::graphics_device::{AttachmentPoint, TextureFormat};

/// Functional category of a pixel format or attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Color,
    Depth,
    Stencil,
    DepthStencil,
    /// Color slot beyond the driver's attachment limit
    Invalid,
}

impl Aspect {
    /// True for aspects carrying depth data
    pub fn has_depth(&self) -> bool {
        matches!(self, Aspect::Depth | Aspect::DepthStencil)
    }

    /// True for aspects carrying stencil data
    pub fn has_stencil(&self) -> bool {
        matches!(self, Aspect::Stencil | Aspect::DepthStencil)
    }
}

/// Aspect of a pixel format
///
/// Anything that is not a depth or stencil format is Color.
pub fn aspect_of(format: TextureFormat) -> Aspect {
    match format {
        TextureFormat::D16_UNORM
        | TextureFormat::D24_UNORM
        | TextureFormat::D32_SFLOAT => Aspect::Depth,
        TextureFormat::D24_UNORM_S8_UINT
        | TextureFormat::D32_SFLOAT_S8_UINT => Aspect::DepthStencil,
        TextureFormat::S8_UINT => Aspect::Stencil,
        _ => Aspect::Color,
    }
}

/// Aspect a storage must have to occupy `point`
pub fn allowed_aspect(point: AttachmentPoint, max_color_attachments: u32) -> Aspect {
    match point {
        AttachmentPoint::Color(index) if index < max_color_attachments => Aspect::Color,
        AttachmentPoint::Color(_) => Aspect::Invalid,
        AttachmentPoint::Depth => Aspect::Depth,
        AttachmentPoint::Stencil => Aspect::Stencil,
        AttachmentPoint::DepthStencil => Aspect::DepthStencil,
    }
}

/// Whether a storage of `format` may occupy `point`
///
/// A combined depth-stencil format is also accepted at the Depth point,
/// where only its depth data is used.
pub fn format_fits_point(format: TextureFormat, point: AttachmentPoint, max_color_attachments: u32) -> bool {
    let format_aspect = aspect_of(format);
    match allowed_aspect(point, max_color_attachments) {
        Aspect::Invalid => false,
        Aspect::Depth => format_aspect.has_depth(),
        Aspect::Stencil => format_aspect.has_stencil(),
        allowed => allowed == format_aspect,
    }
}

/// Combined depth-stencil format matching a depth request
///
/// 32-bit float depth pairs with `D32_SFLOAT_S8_UINT`; every other depth
/// request becomes `D24_UNORM_S8_UINT`.
pub fn depth_stencil_complement(depth_format: TextureFormat) -> TextureFormat {
    match depth_format {
        TextureFormat::D32_SFLOAT | TextureFormat::D32_SFLOAT_S8_UINT => {
            TextureFormat::D32_SFLOAT_S8_UINT
        }
        _ => TextureFormat::D24_UNORM_S8_UINT,
    }
}

#[cfg(test)]
#[path = "aspect_tests.rs"]
mod tests;
