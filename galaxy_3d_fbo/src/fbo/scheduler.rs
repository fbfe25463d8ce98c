/// ResolveMipmapScheduler - lazy multisample resolve and mipmap regeneration
///
/// Binding a target for drawing marks its attachments dirty. The first
/// read of an attachment afterwards performs the resolve blit and the
/// mipmap regeneration it needs, exactly once, then clears the flags.
///
/// Per attachment:
///
/// ```text
/// Clean --bind--> NeedsResolve / NeedsMipmap --sampled_texture--> Clean
/// ```

use std::sync::Arc;

use crate::error::Result;
use crate::fbo::{AttachmentSet, DrawTargetBinder};
use crate::graphics_device::{
    Area, AttachmentPoint, BlitDesc, BlitFilter, BlitMask, Context, Texture,
};
use crate::engine_trace;

/// Attachments an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSelection {
    One(AttachmentPoint),
    All,
}

impl AttachmentSelection {
    fn points(&self, set: &AttachmentSet) -> Vec<AttachmentPoint> {
        match self {
            AttachmentSelection::One(point) if set.contains(*point) => vec![*point],
            AttachmentSelection::One(_) => Vec::new(),
            AttachmentSelection::All => set.active_points().to_vec(),
        }
    }
}

/// Buffers a resolve blit copies for `point`
pub fn blit_mask_for(point: AttachmentPoint) -> BlitMask {
    match point {
        AttachmentPoint::Color(_) => BlitMask::COLOR,
        AttachmentPoint::Depth => BlitMask::DEPTH,
        AttachmentPoint::Stencil => BlitMask::STENCIL,
        AttachmentPoint::DepthStencil => BlitMask::DEPTH | BlitMask::STENCIL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveMipmapScheduler {
    auto_resolve: bool,
    auto_mipmap: bool,
}

impl ResolveMipmapScheduler {
    pub fn new(auto_resolve: bool, auto_mipmap: bool) -> Self {
        Self { auto_resolve, auto_mipmap }
    }

    pub fn auto_resolve(&self) -> bool {
        self.auto_resolve
    }

    pub fn auto_mipmap(&self) -> bool {
        self.auto_mipmap
    }

    /// Flag every attachment after the target was bound for drawing
    pub fn mark_dirty(&self, set: &mut AttachmentSet) {
        set.mark_dirty(self.auto_resolve, self.auto_mipmap);
    }

    /// Blit the pending multisample attachments into their resolves
    ///
    /// With `force`, every selected attachment that has a resolve is
    /// blitted whether flagged or not. Each blit covers `bounds` and is
    /// restricted to the attachment's own slot. Returns the blit count.
    pub fn resolve(
        &self,
        context: &Context,
        binder: &DrawTargetBinder,
        set: &mut AttachmentSet,
        selection: AttachmentSelection,
        bounds: Area,
        force: bool,
    ) -> Result<usize> {
        let Some(shadow) = binder.shadow() else {
            return Ok(0);
        };

        let mut blits = 0;
        for point in selection.points(set) {
            let Some(attachment) = set.get_mut(point) else {
                continue;
            };
            let pending = attachment.needs_resolve() || (force && attachment.resolve().is_some());
            if !pending {
                continue;
            }
            {
                let mut device = context.device()?;
                device.blit(&BlitDesc {
                    src: Some(shadow),
                    dst: Some(binder.primary()),
                    attachment: Some(point),
                    src_area: bounds,
                    dst_area: bounds,
                    mask: blit_mask_for(point),
                    filter: BlitFilter::Nearest,
                })?;
            }
            attachment.clear_resolve();
            blits += 1;
        }
        if blits > 0 {
            engine_trace!("galaxy3d::fbo::Scheduler", "Resolved {} attachment(s)", blits);
        }
        Ok(blits)
    }

    /// Regenerate the pending mipmap chains
    ///
    /// With `force`, every selected texture with a mip chain is
    /// regenerated whether flagged or not. Returns the regeneration count.
    pub fn update_mipmaps(
        &self,
        context: &Context,
        set: &mut AttachmentSet,
        selection: AttachmentSelection,
        force: bool,
    ) -> Result<usize> {
        let mut updates = 0;
        for point in selection.points(set) {
            let Some(attachment) = set.get_mut(point) else {
                continue;
            };
            let texture = attachment.sampled_texture()
                .filter(|texture| texture.info().mipmap)
                .cloned();
            let pending = attachment.needs_mipmap() || (force && texture.is_some());
            if !pending {
                continue;
            }
            if let Some(texture) = texture {
                context.device()?.generate_mipmaps(&texture)?;
                updates += 1;
            }
            attachment.clear_mipmap();
        }
        Ok(updates)
    }

    /// Texture to sample for `point`, brought up to date first
    ///
    /// Returns None when the point is empty or holds a renderbuffer
    /// without a resolve.
    pub fn sampled_texture(
        &self,
        context: &Context,
        binder: &DrawTargetBinder,
        set: &mut AttachmentSet,
        point: AttachmentPoint,
        bounds: Area,
    ) -> Result<Option<Arc<dyn Texture>>> {
        let selection = AttachmentSelection::One(point);
        self.resolve(context, binder, set, selection, bounds, false)?;
        self.update_mipmaps(context, set, selection, false)?;
        Ok(set.get(point).and_then(|attachment| attachment.sampled_texture().cloned()))
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
