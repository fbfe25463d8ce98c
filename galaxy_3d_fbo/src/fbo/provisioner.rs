/// AttachmentProvisioner - synthesizes the default attachments
///
/// Runs after validation. Negotiates the sample counts against the driver
/// limits, promotes or downgrades default backings where the device or the
/// rest of the set demands it, then allocates the default storages and the
/// single-sample resolve textures that go with them.

use std::sync::Arc;

use crate::error::Result;
use crate::fbo::aspect::depth_stencil_complement;
use crate::fbo::format::{Backing, FboFormat, TextureFormatRequest};
use crate::fbo::validator::{ColorRequest, DefaultRequests, ValidationSummary};
use crate::fbo::{Attachment, AttachmentSet, Storage};
use crate::graphics_device::{
    AttachmentPoint, Context, DeviceFeature, GraphicsDevice, RenderbufferDesc, Texture,
    TextureDesc, TextureFormat, TextureType,
};
use crate::{engine_debug, engine_warn};

/// Sample counts agreed with the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSettings {
    /// 0 when not multisampling
    pub samples: u32,
    /// 0 unless coverage sampling is supported and exceeds `samples`
    pub coverage_samples: u32,
}

impl SampleSettings {
    pub fn is_multisample(&self) -> bool {
        self.samples > 1
    }
}

pub struct AttachmentProvisioner<'a> {
    context: &'a Context,
    width: u32,
    height: u32,
}

impl<'a> AttachmentProvisioner<'a> {
    pub fn new(context: &'a Context, width: u32, height: u32) -> Self {
        Self { context, width, height }
    }

    // ===== NEGOTIATION =====

    /// Clamp the requested sample counts to what the driver accepts
    ///
    /// Explicit multisample attachments impose their sample count on the
    /// defaults. Otherwise the request is clamped to the global limit and
    /// to the per-format limit of every default format.
    pub fn negotiate_samples(
        &self,
        format: &FboFormat,
        defaults: &DefaultRequests,
        summary: &ValidationSummary,
    ) -> Result<SampleSettings> {
        let mut samples = match summary.explicit_sample_count {
            Some(explicit) => explicit,
            None if format.sample_count() > 1 => {
                let requested = format.sample_count();
                let mut samples = requested.min(self.context.max_samples()?);
                for default_format in default_formats(defaults) {
                    samples = samples.min(self.context.sample_count_limit(default_format)?);
                }
                if samples != requested {
                    engine_debug!("galaxy3d::fbo::Provisioner",
                        "Sample count {} clamped to {}", requested, samples);
                }
                samples
            }
            None => 0,
        };
        if samples <= 1 {
            samples = 0;
        }

        let requested_coverage = format.coverage_sample_count();
        let coverage_samples = if requested_coverage > samples && samples > 0 {
            if self.context.supports(DeviceFeature::CoverageSampling)? {
                requested_coverage
            } else {
                engine_debug!("galaxy3d::fbo::Provisioner",
                    "Coverage sampling unsupported, ignoring {} coverage samples", requested_coverage);
                0
            }
        } else {
            0
        };

        Ok(SampleSettings { samples, coverage_samples })
    }

    // ===== BACKING ADJUSTMENTS =====

    /// Final backings of the defaults after promotion and downgrade
    ///
    /// Buffer requests are promoted to textures when the other side of the
    /// set (color vs depth/stencil) holds a multisample texture or an array.
    /// Texture requests fall back to buffers on devices without multisample
    /// textures.
    pub fn adjust_backings(
        &self,
        defaults: &mut DefaultRequests,
        summary: &ValidationSummary,
        settings: SampleSettings,
    ) -> Result<()> {
        if summary.depth_stencil_forces_textures {
            if let Some(ColorRequest::Buffer(buffer_format)) = defaults.color.clone() {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Color buffer promoted to a texture to match multisample or array depth/stencil attachments");
                defaults.color = Some(ColorRequest::Texture(TextureFormatRequest::new(buffer_format)));
            }
        }
        if summary.color_forces_textures {
            if defaults.depth == Some(Backing::Buffer) {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Depth buffer promoted to a texture to match multisample or array color attachments");
                defaults.depth = Some(Backing::Texture);
            }
            if defaults.stencil == Some(Backing::Buffer) {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Stencil buffer promoted to a texture to match multisample or array color attachments");
                defaults.stencil = Some(Backing::Texture);
            }
        }

        if settings.is_multisample()
            && !summary.has_array
            && !self.context.supports(DeviceFeature::TextureMultisample)?
        {
            if let Some(ColorRequest::Texture(request)) = defaults.color.clone() {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Multisample textures unsupported, color texture replaced by a buffer");
                defaults.color = Some(ColorRequest::Buffer(request.format));
            }
            if defaults.depth == Some(Backing::Texture) {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Multisample textures unsupported, depth texture replaced by a buffer");
                defaults.depth = Some(Backing::Buffer);
            }
            if defaults.stencil == Some(Backing::Texture) {
                engine_warn!("galaxy3d::fbo::Provisioner",
                    "Multisample textures unsupported, stencil texture replaced by a buffer");
                defaults.stencil = Some(Backing::Buffer);
            }
        }
        Ok(())
    }

    // ===== PROVISIONING =====

    /// Merge `explicit` with freshly allocated defaults
    ///
    /// `format` is normalized in place: negotiated sample counts and the
    /// final default backings are written back.
    pub fn provision(
        &self,
        format: &mut FboFormat,
        mut explicit: AttachmentSet,
        mut defaults: DefaultRequests,
        summary: &ValidationSummary,
    ) -> Result<AttachmentSet> {
        let settings = self.negotiate_samples(format, &defaults, summary)?;
        self.adjust_backings(&mut defaults, summary, settings)?;
        format.set_sample_counts(settings.samples, settings.coverage_samples);
        normalize_backings(format, &defaults);

        let auto_resolve = format.is_auto_resolve();
        let mut device = self.context.device()?;

        // Explicit multisample textures get a resolve unless one was supplied
        let points: Vec<AttachmentPoint> = explicit.active_points().to_vec();
        for point in points {
            if let Some(attachment) = explicit.remove(point) {
                let attachment = with_resolve(&mut *device, attachment, auto_resolve)?;
                explicit.insert(point, attachment);
            }
        }

        let mut allocator = Allocator {
            device: &mut *device,
            width: self.width,
            height: self.height,
            settings,
            auto_resolve,
            array_layers: summary.array_layers,
        };

        match &defaults.color {
            Some(ColorRequest::Texture(request)) => {
                let desc = request.to_desc(self.width, self.height, settings.samples);
                let resolve_desc = request.to_desc(self.width, self.height, 1);
                let attachment = allocator.texture(desc, resolve_desc)?;
                explicit.insert(AttachmentPoint::Color(0), attachment);
            }
            Some(ColorRequest::Buffer(buffer_format)) => {
                let mut resolve_desc = TextureDesc::new_2d(self.width, self.height, *buffer_format);
                resolve_desc.mipmap = format.color_texture_format().mipmap;
                let attachment = allocator.buffer(*buffer_format, resolve_desc)?;
                explicit.insert(AttachmentPoint::Color(0), attachment);
            }
            None => {}
        }

        let depth_stencil_defaults = match defaults.combined() {
            Some(backing) => vec![(
                AttachmentPoint::DepthStencil,
                depth_stencil_complement(defaults.depth_format),
                backing,
            )],
            None => [
                defaults.depth.map(|backing| (AttachmentPoint::Depth, defaults.depth_format, backing)),
                defaults.stencil.map(|backing| (AttachmentPoint::Stencil, defaults.stencil_format, backing)),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };
        for (point, pixel_format, backing) in depth_stencil_defaults {
            let attachment = match backing {
                Backing::Texture => {
                    let desc = allocator.depth_stencil_desc(pixel_format, settings.samples);
                    let resolve_desc = allocator.depth_stencil_desc(pixel_format, 1);
                    allocator.texture(desc, resolve_desc)?
                }
                Backing::Buffer => {
                    let resolve_desc = TextureDesc::new_2d(self.width, self.height, pixel_format);
                    allocator.buffer(pixel_format, resolve_desc)?
                }
            };
            engine_debug!("galaxy3d::fbo::Provisioner",
                "Default {} {:?} as {:?} ({} samples)", point, pixel_format, backing, settings.samples);
            explicit.insert(point, attachment);
        }

        Ok(explicit)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Allocates default storages and their resolves
struct Allocator<'d> {
    device: &'d mut dyn GraphicsDevice,
    width: u32,
    height: u32,
    settings: SampleSettings,
    auto_resolve: bool,
    array_layers: Option<u32>,
}

impl Allocator<'_> {
    /// Texture-backed attachment, with a resolve when multisampled
    fn texture(&mut self, desc: TextureDesc, resolve_desc: TextureDesc) -> Result<Attachment> {
        let multisample = desc.samples > 1;
        let texture = self.device.create_texture(desc)?;
        let resolve = if multisample && self.auto_resolve {
            Some(self.device.create_texture(resolve_desc)?)
        } else {
            None
        };
        Ok(Attachment::new(Storage::Texture(texture), resolve))
    }

    /// Buffer-backed attachment, with a resolve when multisampled
    fn buffer(&mut self, pixel_format: TextureFormat, resolve_desc: TextureDesc) -> Result<Attachment> {
        let buffer = self.device.create_renderbuffer(RenderbufferDesc {
            width: self.width,
            height: self.height,
            format: pixel_format,
            samples: self.settings.samples.max(1),
            coverage_samples: self.settings.coverage_samples,
        })?;
        let resolve: Option<Arc<dyn Texture>> = if self.settings.is_multisample() && self.auto_resolve {
            Some(self.device.create_texture(resolve_desc)?)
        } else {
            None
        };
        Ok(Attachment::new(Storage::Buffer(buffer), resolve))
    }

    /// Depth/stencil texture, layered to match array color targets
    fn depth_stencil_desc(&self, pixel_format: TextureFormat, samples: u32) -> TextureDesc {
        let mut desc = TextureDesc::new_2d(self.width, self.height, pixel_format);
        desc.samples = samples.max(1);
        if let Some(layers) = self.array_layers {
            desc.texture_type = TextureType::Array2D;
            desc.array_layers = layers;
        }
        desc
    }
}

/// Formats the defaults will be allocated with
fn default_formats(defaults: &DefaultRequests) -> Vec<TextureFormat> {
    let mut formats = Vec::new();
    match &defaults.color {
        Some(ColorRequest::Texture(request)) => formats.push(request.format),
        Some(ColorRequest::Buffer(buffer_format)) => formats.push(*buffer_format),
        None => {}
    }
    if defaults.combined().is_some() {
        formats.push(depth_stencil_complement(defaults.depth_format));
    } else {
        if defaults.depth.is_some() {
            formats.push(defaults.depth_format);
        }
        if defaults.stencil.is_some() {
            formats.push(defaults.stencil_format);
        }
    }
    formats
}

/// Give a multisample texture attachment a resolve if it lacks one
///
/// Buffers and single-sample textures are returned unchanged.
pub(crate) fn with_resolve(
    device: &mut dyn GraphicsDevice,
    attachment: Attachment,
    auto_resolve: bool,
) -> Result<Attachment> {
    if !auto_resolve || attachment.resolve().is_some() {
        return Ok(attachment);
    }
    match attachment.storage() {
        Storage::Texture(texture) if texture.info().is_multisample() => {
            let resolve = device.create_texture(single_sample(texture.info()))?;
            Ok(Attachment::new(attachment.storage().clone(), Some(resolve)))
        }
        _ => Ok(attachment),
    }
}

/// Single-sample copy of a multisample texture description
///
/// The mip setting carries over so the resolve can be mipmapped.
fn single_sample(info: &TextureDesc) -> TextureDesc {
    TextureDesc {
        samples: 1,
        fixed_sample_locations: true,
        ..info.clone()
    }
}

/// Record the final default backings in the effective format
fn normalize_backings(format: &mut FboFormat, defaults: &DefaultRequests) {
    let color = match &defaults.color {
        Some(ColorRequest::Texture(_)) => Some(Backing::Texture),
        Some(ColorRequest::Buffer(_)) => Some(Backing::Buffer),
        None => format.color_backing(),
    };
    let depth = defaults.depth.or(format.depth_backing());
    let stencil = defaults.stencil.or(format.stencil_backing());
    format.set_backings(color, depth, stencil);
}

#[cfg(test)]
#[path = "provisioner_tests.rs"]
mod tests;
