/// RenderTarget - a drawable surface backed by an attachment set
///
/// Construction runs the whole pipeline: explicit attachments are checked
/// against their points, validated together with the requested defaults,
/// the defaults are provisioned, the framebuffer objects are populated and
/// finally checked for completeness. Any failure leaves nothing behind:
/// every storage and framebuffer created so far is released with its
/// last `Arc`.
///
/// Incremental `attach`/`detach` re-run validation on the candidate set
/// before touching the target, and `attach` rolls back if the driver then
/// reports the framebuffer incomplete.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fbo::completeness::{CompletenessChecker, IncompleteReason};
use crate::fbo::format::{FboFormat, TextureFormatRequest};
use crate::fbo::provisioner::{with_resolve, AttachmentProvisioner};
use crate::fbo::scheduler::{AttachmentSelection, ResolveMipmapScheduler};
use crate::fbo::validator::{check_format, check_formats, validate, DefaultRequests};
use crate::fbo::{Attachment, AttachmentSet, DrawTargetBinder, PixelBuffer, Storage};
use crate::graphics_device::{
    Area, AttachmentPoint, BlitDesc, BlitFilter, BlitMask, Context, Framebuffer, FramebufferKind,
    Texture, TextureFormat,
};
use crate::{engine_bail, engine_debug};

pub struct RenderTarget {
    context: Arc<Context>,
    width: u32,
    height: u32,
    /// Effective format after normalization (explicit attachments consumed)
    format: FboFormat,
    attachments: AttachmentSet,
    binder: DrawTargetBinder,
    scheduler: ResolveMipmapScheduler,
    label: Option<String>,
}

impl RenderTarget {
    // ===== CONSTRUCTION =====

    /// Create a `width` x `height` render target from `format`
    ///
    /// # Errors
    ///
    /// - `InvalidAttachmentFormat` if an explicit storage does not fit its point
    /// - `InvalidSpecification` for a rule violation or an incomplete framebuffer
    /// - device errors from storage or framebuffer creation, unchanged
    pub fn create(context: Arc<Context>, width: u32, height: u32, mut format: FboFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            engine_bail!(InvalidSpecification, "galaxy3d::fbo::RenderTarget",
                "Render target size {}x{} must be non-zero", width, height);
        }

        let max_color_attachments = context.max_color_attachments()?;
        let mut explicit = AttachmentSet::new();
        for attachment in format.take_attachments() {
            explicit.insert(attachment.point, Attachment::new(attachment.storage, attachment.resolve));
        }
        check_formats(&explicit, max_color_attachments)?;

        let defaults = DefaultRequests::from_format(&format, &explicit);
        let summary = validate(&explicit, &defaults)?;
        let attachments = AttachmentProvisioner::new(&context, width, height)
            .provision(&mut format, explicit, defaults, &summary)?;

        let binder = DrawTargetBinder::new(&context, &attachments)?;
        let scheduler = ResolveMipmapScheduler::new(format.is_auto_resolve(), format.is_auto_mipmap());
        let label = format.label_value().map(str::to_string);

        let target = Self {
            context,
            width,
            height,
            format,
            attachments,
            binder,
            scheduler,
            label,
        };
        if let Some(label) = &target.label {
            target.binder.set_label(&target.context, label)?;
        }
        target.check_completeness()?;

        engine_debug!("galaxy3d::fbo::RenderTarget",
            "Created {}x{} render target {} with {} attachment(s), {} samples",
            width, height, target.id(), target.attachments.len(), target.format.sample_count());
        Ok(target)
    }

    /// Create a target with an 8-bit color texture and optional depth and
    /// stencil renderbuffers
    pub fn create_simple(
        context: Arc<Context>,
        width: u32,
        height: u32,
        alpha: bool,
        depth: bool,
        stencil: bool,
    ) -> Result<Self> {
        let color_format = if alpha { TextureFormat::R8G8B8A8_UNORM } else { TextureFormat::R8G8B8_UNORM };
        let mut format = FboFormat::new().color_texture(TextureFormatRequest::new(color_format));
        format = if depth { format.depth_buffer(TextureFormat::D24_UNORM) } else { format.disable_depth() };
        format = if stencil { format.stencil_buffer() } else { format.disable_stencil() };
        Self::create(context, width, height, format)
    }

    // ===== ACCESSORS =====

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `[0, width) x [0, height)`
    pub fn bounds(&self) -> Area {
        Area::from_size(self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Effective format (negotiated samples, final default backings)
    pub fn format(&self) -> &FboFormat {
        &self.format
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub(crate) fn binder(&self) -> &DrawTargetBinder {
        &self.binder
    }

    /// Smallest non-zero size among the attached storages
    pub fn effective_size(&self) -> (u32, u32) {
        let mut size: Option<(u32, u32)> = None;
        for (_, attachment) in self.attachments.iter() {
            let (width, height) = (attachment.storage().width(), attachment.storage().height());
            if width == 0 || height == 0 {
                continue;
            }
            size = Some(match size {
                Some((w, h)) => (w.min(width), h.min(height)),
                None => (width, height),
            });
        }
        size.unwrap_or((self.width, self.height))
    }

    pub fn max_samples(&self) -> Result<u32> {
        self.context.max_samples()
    }

    pub fn max_color_attachments(&self) -> Result<u32> {
        self.context.max_color_attachments()
    }

    pub fn sample_count_limit(&self, format: TextureFormat) -> Result<u32> {
        self.context.sample_count_limit(format)
    }

    pub fn has_depth_attachment(&self) -> bool {
        self.attachments.contains(AttachmentPoint::Depth)
            || self.attachments.contains(AttachmentPoint::DepthStencil)
    }

    pub fn has_stencil_attachment(&self) -> bool {
        self.attachments.contains(AttachmentPoint::Stencil)
            || self.attachments.contains(AttachmentPoint::DepthStencil)
    }

    // ===== IDS AND LABELS =====

    /// Id of the framebuffer draw calls write to
    pub fn id(&self) -> u32 {
        self.binder.write_framebuffer().id()
    }

    /// Id of the shadow multisample framebuffer, if any
    pub fn multisample_id(&self) -> Option<u32> {
        self.binder.shadow().map(|framebuffer| framebuffer.id())
    }

    /// Id of the primary framebuffer holding the resolved images
    pub fn resolve_id(&self) -> u32 {
        self.binder.primary().id()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) -> Result<()> {
        self.binder.set_label(&self.context, label)?;
        self.label = Some(label.to_string());
        Ok(())
    }

    // ===== ATTACHMENTS =====

    /// Attach `storage` at `point`, replacing whatever was there
    ///
    /// A multisample texture without `resolve` gets one synthesized when
    /// automatic resolution is enabled.
    ///
    /// # Errors
    ///
    /// - `InvalidAttachmentFormat` if the storage's aspect does not fit `point`
    /// - `InvalidSpecification` if the resulting set breaks a rule or the
    ///   framebuffer becomes incomplete
    ///
    /// The target is unchanged on error.
    pub fn attach(
        &mut self,
        point: AttachmentPoint,
        storage: impl Into<Storage>,
        resolve: Option<Arc<dyn Texture>>,
    ) -> Result<()> {
        let storage = storage.into();
        check_format(point, &storage, self.context.max_color_attachments()?)?;

        let mut candidate = self.attachments.clone();
        candidate.insert(point, Attachment::new(storage.clone(), resolve.clone()));
        validate(&candidate, &DefaultRequests::none())?;

        let attachment = {
            let mut device = self.context.device()?;
            with_resolve(&mut *device, Attachment::new(storage, resolve), self.format.is_auto_resolve())?
        };
        candidate.insert(point, attachment);

        let previous = std::mem::replace(&mut self.attachments, candidate);
        let applied = self.binder.attach(&self.context, &self.attachments, point)
            .and_then(|_| self.check_completeness());
        if let Err(error) = applied {
            self.attachments = previous;
            if self.attachments.contains(point) {
                self.binder.attach(&self.context, &self.attachments, point)?;
            } else {
                self.binder.detach(&self.context, &self.attachments, point)?;
            }
            return Err(error);
        }
        Ok(())
    }

    /// Remove the attachment at `point`; the target keeps its size
    pub fn detach(&mut self, point: AttachmentPoint) -> Result<()> {
        if !self.attachments.contains(point) {
            return Ok(());
        }
        let mut candidate = self.attachments.clone();
        candidate.remove(point);
        validate(&candidate, &DefaultRequests::none())?;

        self.attachments = candidate;
        self.binder.detach(&self.context, &self.attachments, point)
    }

    // ===== BINDING =====

    /// Bind for `kind` on the context's framebuffer stack
    ///
    /// Draw bindings mark every attachment dirty. A read-only binding
    /// resolves pending attachments first.
    pub fn bind(&mut self, kind: FramebufferKind) -> Result<()> {
        if kind.includes_draw() {
            self.binder.bind(&self.context, kind)?;
            self.scheduler.mark_dirty(&mut self.attachments);
        } else {
            self.resolve_selection(AttachmentSelection::All, false)?;
            self.binder.bind(&self.context, kind)?;
        }
        Ok(())
    }

    /// Restore the binding saved by the most recent bind on `context`
    pub fn unbind(context: &Context) -> Result<()> {
        DrawTargetBinder::unbind(context)
    }

    // ===== SAMPLED TEXTURES =====

    /// Up-to-date texture for `point`, resolved and mipmapped as needed
    ///
    /// None for an empty point or a renderbuffer without a resolve.
    pub fn sampled_texture(&mut self, point: AttachmentPoint) -> Result<Option<Arc<dyn Texture>>> {
        let bounds = self.bounds();
        self.scheduler.sampled_texture(&self.context, &self.binder, &mut self.attachments, point, bounds)
    }

    pub fn color_texture(&mut self, index: u32) -> Result<Option<Arc<dyn Texture>>> {
        self.sampled_texture(AttachmentPoint::Color(index))
    }

    /// Depth texture (a combined depth-stencil texture if there is no
    /// depth-only one)
    pub fn depth_texture(&mut self) -> Result<Option<Arc<dyn Texture>>> {
        if self.attachments.contains(AttachmentPoint::Depth) {
            self.sampled_texture(AttachmentPoint::Depth)
        } else {
            self.sampled_texture(AttachmentPoint::DepthStencil)
        }
    }

    pub fn stencil_texture(&mut self) -> Result<Option<Arc<dyn Texture>>> {
        if self.attachments.contains(AttachmentPoint::Stencil) {
            self.sampled_texture(AttachmentPoint::Stencil)
        } else {
            self.sampled_texture(AttachmentPoint::DepthStencil)
        }
    }

    pub fn depth_stencil_texture(&mut self) -> Result<Option<Arc<dyn Texture>>> {
        self.sampled_texture(AttachmentPoint::DepthStencil)
    }

    /// Resolve every attachment now
    ///
    /// With automatic resolution only flagged attachments are blitted;
    /// without it every attachment with a resolve is.
    pub fn resolve_all(&mut self) -> Result<()> {
        let force = !self.scheduler.auto_resolve();
        self.resolve_selection(AttachmentSelection::All, force)?;
        Ok(())
    }

    /// Regenerate every mip chain now
    ///
    /// With automatic mipmaps only flagged attachments are regenerated;
    /// without it every mipmapped texture is.
    pub fn update_all_mipmaps(&mut self) -> Result<()> {
        let force = !self.scheduler.auto_mipmap();
        self.scheduler.update_mipmaps(&self.context, &mut self.attachments, AttachmentSelection::All, force)?;
        Ok(())
    }

    fn resolve_selection(&mut self, selection: AttachmentSelection, force: bool) -> Result<usize> {
        let bounds = self.bounds();
        self.scheduler.resolve(&self.context, &self.binder, &mut self.attachments, selection, bounds, force)
    }

    // ===== READBACK =====

    /// Read RGBA8 pixels of `point` inside `area`, rows top-down
    ///
    /// The area is clipped to the attachment's bounds. The attachment is
    /// resolved first; reading does not dirty it again.
    pub fn read_pixels(&mut self, area: Area, point: AttachmentPoint) -> Result<PixelBuffer> {
        let (bounds, has_resolve) = match self.attachments.get(point) {
            Some(attachment) => (
                Area::from_size(attachment.storage().width(), attachment.storage().height()),
                attachment.resolve().is_some(),
            ),
            None => {
                engine_bail!(InvalidResource, "galaxy3d::fbo::RenderTarget",
                    "Cannot read pixels: no attachment at {}", point);
            }
        };
        let clipped = area.clipped_by(&bounds);
        if clipped.is_empty() {
            return PixelBuffer::from_bottom_up(0, 0, Vec::new());
        }

        let force = !self.scheduler.auto_resolve();
        self.resolve_selection(AttachmentSelection::One(point), force)?;

        let framebuffer = if has_resolve {
            self.binder.primary()
        } else {
            self.binder.write_framebuffer()
        };
        let data = self.context.device()?.read_pixels(framebuffer, point, clipped)?;
        PixelBuffer::from_bottom_up(clipped.width(), clipped.height(), data)
    }

    // ===== BLITS =====

    /// Copy `src_area` of this target into `dst_area` of `destination`
    ///
    /// Pending resolves run first; the copy reads the single-sample
    /// framebuffer so the areas may differ in size.
    pub fn blit_to(
        &mut self,
        destination: &mut RenderTarget,
        src_area: Area,
        dst_area: Area,
        filter: BlitFilter,
        mask: BlitMask,
    ) -> Result<()> {
        self.resolve_selection(AttachmentSelection::All, false)?;
        self.blit(Some(self.binder.primary()), Some(destination.binder.write_framebuffer()),
            src_area, dst_area, filter, mask)?;
        destination.scheduler.mark_dirty(&mut destination.attachments);
        Ok(())
    }

    /// Copy `src_area` of this target into the default framebuffer
    pub fn blit_to_screen(&mut self, src_area: Area, dst_area: Area, filter: BlitFilter, mask: BlitMask) -> Result<()> {
        self.resolve_selection(AttachmentSelection::All, false)?;
        self.blit(Some(self.binder.primary()), None, src_area, dst_area, filter, mask)
    }

    /// Copy `src_area` of the default framebuffer into this target
    pub fn blit_from_screen(&mut self, src_area: Area, dst_area: Area, filter: BlitFilter, mask: BlitMask) -> Result<()> {
        self.blit(None, Some(self.binder.write_framebuffer()), src_area, dst_area, filter, mask)?;
        self.scheduler.mark_dirty(&mut self.attachments);
        Ok(())
    }

    fn blit(
        &self,
        src: Option<&Arc<dyn Framebuffer>>,
        dst: Option<&Arc<dyn Framebuffer>>,
        src_area: Area,
        dst_area: Area,
        filter: BlitFilter,
        mask: BlitMask,
    ) -> Result<()> {
        self.context.device()?.blit(&BlitDesc {
            src,
            dst,
            attachment: None,
            src_area,
            dst_area,
            mask,
            filter,
        })
    }

    // ===== COMPLETENESS =====

    /// Reason the framebuffers are incomplete, if they are
    pub fn incomplete_reason(&self) -> Result<Option<IncompleteReason>> {
        CompletenessChecker::query(&self.context, &self.framebuffers())
    }

    /// Fail with `InvalidSpecification` unless the framebuffers are complete
    pub fn check_completeness(&self) -> Result<()> {
        CompletenessChecker::check(&self.context, &self.framebuffers())
    }

    fn framebuffers(&self) -> Vec<&Arc<dyn Framebuffer>> {
        let mut framebuffers = Vec::with_capacity(2);
        if let Some(shadow) = self.binder.shadow() {
            framebuffers.push(shadow);
        }
        framebuffers.push(self.binder.primary());
        framebuffers
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.resolve_id())?;
        if let Some(multisample_id) = self.multisample_id() {
            writeln!(f, "  Multisample ID: {}", multisample_id)?;
        }
        if let Some(label) = &self.label {
            writeln!(f, "  Label: {}", label)?;
        }
        writeln!(f, "   Dims: {} x {}", self.width, self.height)?;
        for (point, attachment) in self.attachments.iter() {
            let kind = if attachment.storage().is_texture() { "Texture" } else { "Renderbuffer" };
            writeln!(f, "-{} Attachment: {}", kind, point)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
