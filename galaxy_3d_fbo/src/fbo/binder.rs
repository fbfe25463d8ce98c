/// DrawTargetBinder - the framebuffer objects behind a render target
///
/// The primary framebuffer always exists. A shadow framebuffer is created
/// as soon as any attachment carries a resolve texture: primary storages
/// are then written through the shadow framebuffer and the resolves sit at
/// the same points of the primary framebuffer, ready to be blitted into.
/// Without a shadow framebuffer every storage lives on the primary one.

use std::sync::Arc;

use crate::error::Result;
use crate::fbo::{AttachmentSet, Storage};
use crate::graphics_device::{
    AttachmentPoint, Context, Framebuffer, FramebufferKind, GraphicsDevice, Texture, TextureType,
};
use crate::engine_debug;

pub struct DrawTargetBinder {
    primary: Arc<dyn Framebuffer>,
    shadow: Option<Arc<dyn Framebuffer>>,
}

impl DrawTargetBinder {
    /// Create the framebuffers for `set` and attach every storage
    pub fn new(context: &Context, set: &AttachmentSet) -> Result<Self> {
        let mut device = context.device()?;
        let primary = device.create_framebuffer()?;
        let shadow = if set.has_resolve() {
            Some(device.create_framebuffer()?)
        } else {
            None
        };
        let binder = Self { primary, shadow };

        for (point, _) in set.iter() {
            binder.attach_point(&mut *device, set, point)?;
        }
        binder.apply_draw_buffers(&mut *device, set)?;

        engine_debug!("galaxy3d::fbo::Binder",
            "Framebuffer {} created ({} attachments, multisample framebuffer: {:?})",
            binder.primary.id(), set.len(), binder.shadow.as_ref().map(|fb| fb.id()));
        Ok(binder)
    }

    // ===== FRAMEBUFFERS =====

    pub fn primary(&self) -> &Arc<dyn Framebuffer> {
        &self.primary
    }

    pub fn shadow(&self) -> Option<&Arc<dyn Framebuffer>> {
        self.shadow.as_ref()
    }

    /// Framebuffer draw calls write into (shadow if present)
    pub fn write_framebuffer(&self) -> &Arc<dyn Framebuffer> {
        self.shadow.as_ref().unwrap_or(&self.primary)
    }

    // ===== BINDING =====

    /// Push this target on the context's binding stack
    ///
    /// Draw bindings target the write framebuffer, read-only bindings the
    /// primary one where resolved pixels land.
    pub fn bind(&self, context: &Context, kind: FramebufferKind) -> Result<()> {
        let framebuffer = if kind.includes_draw() {
            self.write_framebuffer()
        } else {
            &self.primary
        };
        context.push_framebuffer(kind, Some(framebuffer))
    }

    /// Restore the binding saved by the most recent `bind`
    pub fn unbind(context: &Context) -> Result<()> {
        context.pop_last()
    }

    // ===== INCREMENTAL UPDATES =====

    /// Reflect the attachment now stored at `point` in `set`
    pub fn attach(&mut self, context: &Context, set: &AttachmentSet, point: AttachmentPoint) -> Result<()> {
        if self.shadow.is_some() != set.has_resolve() {
            return self.rebuild(context, set);
        }
        let mut device = context.device()?;
        if self.shadow.is_some() {
            // The point may have changed from resolving to non-resolving
            device.detach(&self.primary, point)?;
        }
        self.attach_point(&mut *device, set, point)?;
        self.apply_draw_buffers(&mut *device, set)
    }

    /// Clear `point`, already removed from `set`
    pub fn detach(&mut self, context: &Context, set: &AttachmentSet, point: AttachmentPoint) -> Result<()> {
        {
            let mut device = context.device()?;
            device.detach(&self.primary, point)?;
            if let Some(shadow) = &self.shadow {
                device.detach(shadow, point)?;
            }
        }
        if self.shadow.is_some() != set.has_resolve() {
            return self.rebuild(context, set);
        }
        let mut device = context.device()?;
        self.apply_draw_buffers(&mut *device, set)
    }

    /// Create or drop the shadow framebuffer and reattach everything
    pub fn rebuild(&mut self, context: &Context, set: &AttachmentSet) -> Result<()> {
        let mut device = context.device()?;
        if set.has_resolve() {
            if self.shadow.is_none() {
                self.shadow = Some(device.create_framebuffer()?);
            }
        } else {
            // Dropping the handle releases the framebuffer
            self.shadow = None;
        }
        for (point, attachment) in set.iter() {
            if self.shadow.is_some() && attachment.resolve().is_none() {
                device.detach(&self.primary, point)?;
            }
            self.attach_point(&mut *device, set, point)?;
        }
        self.apply_draw_buffers(&mut *device, set)
    }

    // ===== LABELS =====

    /// Label the primary framebuffer, and the shadow one with a suffix
    pub fn set_label(&self, context: &Context, label: &str) -> Result<()> {
        let mut device = context.device()?;
        device.set_label(&self.primary, label)?;
        if let Some(shadow) = &self.shadow {
            device.set_label(shadow, &format!("{} (multisample)", label))?;
        }
        Ok(())
    }

    /// Point the write framebuffer's `point` at one face of a cube texture
    pub fn attach_face(
        &self,
        context: &Context,
        point: AttachmentPoint,
        texture: &Arc<dyn Texture>,
        face: u32,
        level: u32,
    ) -> Result<()> {
        let mut device = context.device()?;
        device.attach_texture_face(self.write_framebuffer(), point, texture, face, level)
    }

    // ===== INTERNALS =====

    fn attach_point(&self, device: &mut dyn GraphicsDevice, set: &AttachmentSet, point: AttachmentPoint) -> Result<()> {
        let Some(attachment) = set.get(point) else {
            return Ok(());
        };
        attach_storage(device, self.write_framebuffer(), point, attachment.storage())?;
        if let (Some(resolve), Some(_)) = (attachment.resolve(), &self.shadow) {
            attach_texture(device, &self.primary, point, resolve)?;
        }
        Ok(())
    }

    fn apply_draw_buffers(&self, device: &mut dyn GraphicsDevice, set: &AttachmentSet) -> Result<()> {
        device.set_draw_buffers(&self.primary, set.draw_order())?;
        if let Some(shadow) = &self.shadow {
            device.set_draw_buffers(shadow, set.draw_order())?;
        }
        Ok(())
    }
}

/// Attach level 0 of a texture (face +X for cube maps)
fn attach_texture(
    device: &mut dyn GraphicsDevice,
    framebuffer: &Arc<dyn Framebuffer>,
    point: AttachmentPoint,
    texture: &Arc<dyn Texture>,
) -> Result<()> {
    if texture.info().texture_type == TextureType::Cube {
        device.attach_texture_face(framebuffer, point, texture, 0, 0)
    } else {
        device.attach_texture(framebuffer, point, texture, 0)
    }
}

fn attach_storage(
    device: &mut dyn GraphicsDevice,
    framebuffer: &Arc<dyn Framebuffer>,
    point: AttachmentPoint,
    storage: &Storage,
) -> Result<()> {
    match storage {
        Storage::Texture(texture) => attach_texture(device, framebuffer, point, texture),
        Storage::Buffer(buffer) => device.attach_renderbuffer(framebuffer, point, buffer),
    }
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
