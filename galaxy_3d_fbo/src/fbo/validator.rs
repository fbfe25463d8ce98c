/// AttachmentValidator - consistency rules over a requested attachment set
///
/// Validation looks at the explicit attachments together with the
/// defaults the provisioner is about to synthesize, so a conflict between
/// the two is caught before any storage is allocated.
///
/// Rules, each failing with a distinct `InvalidSpecification` message:
/// 1. color attachments share one shape (1D, 2D, 3D or array)
/// 2. multisampled attachments share one sample count
/// 3. multisample textures agree on fixed sample locations when they
///    coexist with multisample renderbuffers
/// 4. depth and stencil requested together use one combined attachment
/// 5. 3D color targets carry no depth or stencil
/// 6. default depth/stencil formats classify to the matching aspect

use crate::error::Result;
use crate::fbo::aspect::{aspect_of, format_fits_point};
use crate::fbo::format::{Backing, FboFormat, TextureFormatRequest};
use crate::fbo::{AttachmentSet, Storage};
use crate::graphics_device::{AttachmentPoint, TextureFormat, TextureType};
use crate::engine_bail;

// ============================================================================
// Default requests
// ============================================================================

/// Default color attachment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRequest {
    Texture(TextureFormatRequest),
    Buffer(TextureFormat),
}

/// Defaults still to be provisioned for slots the caller left empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRequests {
    pub color: Option<ColorRequest>,
    pub depth: Option<Backing>,
    pub stencil: Option<Backing>,
    pub depth_format: TextureFormat,
    pub stencil_format: TextureFormat,
    /// Requested sample count of every default (0 or 1 = single-sampled)
    pub samples: u32,
    /// The format asked for both depth and stencil defaults
    pub depth_and_stencil: bool,
}

impl DefaultRequests {
    /// Defaults of `format` for every slot `explicit` does not fill
    ///
    /// Color0 gets a default only while it is empty. Depth and stencil
    /// defaults are skipped when their own point or DepthStencil is taken.
    pub fn from_format(format: &FboFormat, explicit: &AttachmentSet) -> Self {
        let color = if explicit.contains(AttachmentPoint::Color(0)) {
            None
        } else {
            match format.color_backing() {
                Some(Backing::Texture) => Some(ColorRequest::Texture(format.color_texture_format().clone())),
                Some(Backing::Buffer) => Some(ColorRequest::Buffer(format.color_buffer_format())),
                None => None,
            }
        };
        let combined_taken = explicit.contains(AttachmentPoint::DepthStencil);
        let depth = format.depth_backing()
            .filter(|_| !combined_taken && !explicit.contains(AttachmentPoint::Depth));
        let stencil = format.stencil_backing()
            .filter(|_| !combined_taken && !explicit.contains(AttachmentPoint::Stencil));

        Self {
            color,
            depth,
            stencil,
            depth_format: format.depth_format(),
            stencil_format: format.stencil_format_value(),
            samples: format.sample_count(),
            depth_and_stencil: format.depth_backing().is_some() && format.stencil_backing().is_some(),
        }
    }

    /// No defaults (incremental attach and detach)
    pub fn none() -> Self {
        Self {
            color: None,
            depth: None,
            stencil: None,
            depth_format: TextureFormat::D24_UNORM,
            stencil_format: TextureFormat::S8_UINT,
            samples: 0,
            depth_and_stencil: false,
        }
    }

    /// Backing of the combined depth-stencil default, if both are requested
    ///
    /// Texture wins if either side asked for one.
    pub fn combined(&self) -> Option<Backing> {
        match (self.depth, self.stencil) {
            (Some(Backing::Buffer), Some(Backing::Buffer)) => Some(Backing::Buffer),
            (Some(_), Some(_)) => Some(Backing::Texture),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.depth.is_none() && self.stencil.is_none()
    }

    pub fn is_multisample(&self) -> bool {
        self.samples > 1
    }
}

// ============================================================================
// Counts
// ============================================================================

/// Shape of a color target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    OneD,
    TwoD,
    ThreeD,
    Array,
}

impl Shape {
    /// Renderbuffers and cube maps render as 2D
    fn of(texture_type: Option<TextureType>) -> Self {
        match texture_type {
            Some(TextureType::Tex1D) => Shape::OneD,
            Some(TextureType::Tex3D) => Shape::ThreeD,
            Some(TextureType::Array2D) => Shape::Array,
            _ => Shape::TwoD,
        }
    }
}

/// Per-aspect tallies of the explicit attachments plus pending defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentCounts {
    pub color_1d: u32,
    pub color_2d: u32,
    pub color_3d: u32,
    pub color_array: u32,
    pub color_textures: u32,
    pub color_buffers: u32,
    pub depth_textures: u32,
    pub depth_buffers: u32,
    pub stencil_textures: u32,
    pub stencil_buffers: u32,
    pub depth_stencil_textures: u32,
    pub depth_stencil_buffers: u32,
    pub multisample_textures: u32,
    pub multisample_buffers: u32,
    /// Distinct sample counts above 1, ascending
    pub sample_counts: Vec<u32>,
    /// Distinct fixed-sample-location settings of multisample textures
    pub fixed_sample_locations: Vec<bool>,
    pub min_array_layers: u32,
    pub max_array_layers: u32,
}

impl AttachmentCounts {
    pub fn color_count(&self) -> u32 {
        self.color_textures + self.color_buffers
    }

    pub fn depth_count(&self) -> u32 {
        self.depth_textures + self.depth_buffers
    }

    pub fn stencil_count(&self) -> u32 {
        self.stencil_textures + self.stencil_buffers
    }

    pub fn depth_stencil_count(&self) -> u32 {
        self.depth_stencil_textures + self.depth_stencil_buffers
    }

    fn shape_count(&self) -> usize {
        [self.color_1d, self.color_2d, self.color_3d, self.color_array]
            .iter()
            .filter(|count| **count > 0)
            .count()
    }

    fn add_color(&mut self, shape: Shape, texture: bool, layers: u32) {
        match shape {
            Shape::OneD => self.color_1d += 1,
            Shape::TwoD => self.color_2d += 1,
            Shape::ThreeD => self.color_3d += 1,
            Shape::Array => {
                self.color_array += 1;
                self.min_array_layers = if self.min_array_layers == 0 {
                    layers
                } else {
                    self.min_array_layers.min(layers)
                };
                self.max_array_layers = self.max_array_layers.max(layers);
            }
        }
        if texture {
            self.color_textures += 1;
        } else {
            self.color_buffers += 1;
        }
    }

    fn add_samples(&mut self, samples: u32, texture: bool, fixed_sample_locations: bool) {
        if samples <= 1 {
            return;
        }
        if !self.sample_counts.contains(&samples) {
            self.sample_counts.push(samples);
            self.sample_counts.sort_unstable();
        }
        if texture {
            self.multisample_textures += 1;
            if !self.fixed_sample_locations.contains(&fixed_sample_locations) {
                self.fixed_sample_locations.push(fixed_sample_locations);
            }
        } else {
            self.multisample_buffers += 1;
        }
    }

    fn add_depth_stencil(&mut self, point: AttachmentPoint, texture: bool) {
        let slot = match (point, texture) {
            (AttachmentPoint::Depth, true) => &mut self.depth_textures,
            (AttachmentPoint::Depth, false) => &mut self.depth_buffers,
            (AttachmentPoint::Stencil, true) => &mut self.stencil_textures,
            (AttachmentPoint::Stencil, false) => &mut self.stencil_buffers,
            (_, true) => &mut self.depth_stencil_textures,
            (_, false) => &mut self.depth_stencil_buffers,
        };
        *slot += 1;
    }

    fn add_storage(&mut self, point: AttachmentPoint, storage: &Storage) {
        let texture = storage.is_texture();
        if point.is_color() {
            self.add_color(Shape::of(storage.texture_type()), texture, storage.array_layers());
        } else {
            self.add_depth_stencil(point, texture);
        }
        self.add_samples(storage.samples(), texture, storage.fixed_sample_locations());
    }

    /// Tally `explicit` plus the defaults still to be provisioned
    pub fn collect(explicit: &AttachmentSet, defaults: &DefaultRequests) -> Self {
        let mut counts = Self::default();
        for (point, attachment) in explicit.iter() {
            counts.add_storage(point, attachment.storage());
        }

        match &defaults.color {
            Some(ColorRequest::Texture(request)) => {
                counts.add_color(Shape::of(Some(request.texture_type)), true, request.array_layers);
                counts.add_samples(defaults.samples, true, request.fixed_sample_locations);
            }
            Some(ColorRequest::Buffer(_)) => {
                counts.add_color(Shape::TwoD, false, 1);
                counts.add_samples(defaults.samples, false, true);
            }
            None => {}
        }

        let depth_stencil_defaults = match defaults.combined() {
            Some(backing) => vec![(AttachmentPoint::DepthStencil, backing)],
            None => [
                defaults.depth.map(|backing| (AttachmentPoint::Depth, backing)),
                defaults.stencil.map(|backing| (AttachmentPoint::Stencil, backing)),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };
        for (point, backing) in depth_stencil_defaults {
            let texture = backing == Backing::Texture;
            counts.add_depth_stencil(point, texture);
            counts.add_samples(defaults.samples, texture, true);
        }
        counts
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Facts about a validated set, consumed by the provisioner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub counts: AttachmentCounts,
    pub has_color: bool,
    pub has_depth: bool,
    pub has_stencil: bool,
    pub has_array: bool,
    /// The one sample count above 1 shared by every multisampled attachment
    pub sample_count: Option<u32>,
    /// Sample count imposed by the explicit attachments alone
    pub explicit_sample_count: Option<u32>,
    /// Any multisample texture (as opposed to a multisample renderbuffer)
    pub has_multisample_texture: bool,
    /// Color side holds a multisample texture or an array
    pub color_forces_textures: bool,
    /// Depth/stencil side holds a multisample texture or an array
    pub depth_stencil_forces_textures: bool,
    /// Layer count of the color arrays, if any
    pub array_layers: Option<u32>,
}

// ============================================================================
// Validation
// ============================================================================

/// Check that every explicit storage fits its point
///
/// # Errors
///
/// Returns `InvalidAttachmentFormat` for an aspect mismatch or a color
/// index beyond `max_color_attachments`.
pub fn check_formats(explicit: &AttachmentSet, max_color_attachments: u32) -> Result<()> {
    for (point, attachment) in explicit.iter() {
        check_format(point, attachment.storage(), max_color_attachments)?;
    }
    Ok(())
}

/// Check that one storage fits `point`
pub fn check_format(point: AttachmentPoint, storage: &Storage, max_color_attachments: u32) -> Result<()> {
    if let AttachmentPoint::Color(index) = point {
        if index >= max_color_attachments {
            engine_bail!(InvalidAttachmentFormat, "galaxy3d::fbo::Validator",
                "{} exceeds the {} color attachments supported", point, max_color_attachments);
        }
    }
    let format = storage.format();
    if !format_fits_point(format, point, max_color_attachments) {
        engine_bail!(InvalidAttachmentFormat, "galaxy3d::fbo::Validator",
            "{:?} ({:?}) cannot be attached at {}", format, aspect_of(format), point);
    }
    Ok(())
}

/// Validate `explicit` together with the pending `defaults`
///
/// # Errors
///
/// Returns `InvalidSpecification` naming the first violated rule.
pub fn validate(explicit: &AttachmentSet, defaults: &DefaultRequests) -> Result<ValidationSummary> {
    for (point, attachment) in explicit.iter() {
        if let Some(resolve) = attachment.resolve() {
            if resolve.info().is_multisample() {
                engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
                    "Resolve texture at {} must be single-sampled", point);
            }
            if attachment.storage().is_texture() && !attachment.storage().is_multisample() {
                engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
                    "Resolve texture at {} requires a multisampled primary storage", point);
            }
        }
    }

    let counts = AttachmentCounts::collect(explicit, defaults);

    // Rule 1
    if counts.shape_count() > 1 {
        if counts.color_array > 0 {
            engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
                "Cannot mix array and non-array color attachments");
        }
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Cannot mix 1D, 2D and 3D color attachments");
    }

    // Rule 2
    if counts.sample_counts.len() > 1 {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Sample counts of multisampled attachments must be the same (found {:?})",
            counts.sample_counts);
    }

    // Rule 3
    if counts.multisample_textures > 0
        && counts.multisample_buffers > 0
        && counts.fixed_sample_locations.len() > 1
    {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Multisample textures mixed with multisample renderbuffers must agree on fixed sample locations");
    }

    // Rule 4
    let explicit_depth = explicit.contains(AttachmentPoint::Depth);
    let explicit_stencil = explicit.contains(AttachmentPoint::Stencil);
    let explicit_combined = explicit.contains(AttachmentPoint::DepthStencil);
    if explicit_combined && (explicit_depth || explicit_stencil) {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "A combined depth-stencil attachment cannot coexist with separate depth or stencil attachments");
    }
    if defaults.depth_and_stencil && !explicit_combined && (explicit_depth || explicit_stencil) {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Depth and stencil requested together must share one combined depth-stencil attachment");
    }

    // Rule 5
    let depth_or_stencil = counts.depth_count() + counts.stencil_count() + counts.depth_stencil_count() > 0;
    if counts.color_3d > 0 && depth_or_stencil {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "3D color targets do not support depth or stencil attachments");
    }

    // Rule 6
    if defaults.depth.is_some() && !aspect_of(defaults.depth_format).has_depth() {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Depth format {:?} is not a depth format", defaults.depth_format);
    }
    if defaults.stencil.is_some() && !aspect_of(defaults.stencil_format).has_stencil() {
        engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
            "Stencil format {:?} is not a stencil format", defaults.stencil_format);
    }

    Ok(summarize(explicit, defaults, counts))
}

fn summarize(explicit: &AttachmentSet, defaults: &DefaultRequests, counts: AttachmentCounts) -> ValidationSummary {
    let explicit_sample_count = explicit.iter()
        .map(|(_, attachment)| attachment.storage().samples())
        .find(|samples| *samples > 1);

    let mut color_forces_textures = counts.color_array > 0;
    let mut depth_stencil_forces_textures = false;
    for (point, attachment) in explicit.iter() {
        let storage = attachment.storage();
        let forces = storage.is_texture()
            && (storage.is_multisample() || storage.texture_type() == Some(TextureType::Array2D));
        if point.is_color() {
            color_forces_textures |= forces;
        } else {
            depth_stencil_forces_textures |= forces;
        }
    }
    if let Some(ColorRequest::Texture(_)) = &defaults.color {
        color_forces_textures |= defaults.is_multisample();
    }
    let depth_stencil_texture_default = defaults.depth == Some(Backing::Texture)
        || defaults.stencil == Some(Backing::Texture);
    depth_stencil_forces_textures |= depth_stencil_texture_default && defaults.is_multisample();

    ValidationSummary {
        has_color: counts.color_count() > 0,
        has_depth: counts.depth_count() + counts.depth_stencil_count() > 0,
        has_stencil: counts.stencil_count() + counts.depth_stencil_count() > 0,
        has_array: counts.color_array > 0,
        sample_count: counts.sample_counts.first().copied(),
        explicit_sample_count,
        has_multisample_texture: counts.multisample_textures > 0,
        color_forces_textures,
        depth_stencil_forces_textures,
        array_layers: (counts.max_array_layers > 0).then_some(counts.max_array_layers),
        counts,
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
