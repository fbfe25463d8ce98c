/// Attachment - one occupied slot of a render target
///
/// An attachment owns exactly one storage (a texture or an opaque
/// renderbuffer), at most one single-sample resolve texture, and the two
/// dirty flags that drive lazy resolve and mipmap regeneration.

use std::fmt;
use std::sync::Arc;

use crate::graphics_device::{Renderbuffer, Texture, TextureFormat, TextureType};

// ===== STORAGE =====

/// Primary storage of an attachment
#[derive(Clone)]
pub enum Storage {
    Texture(Arc<dyn Texture>),
    Buffer(Arc<dyn Renderbuffer>),
}

impl Storage {
    pub fn format(&self) -> TextureFormat {
        match self {
            Storage::Texture(texture) => texture.info().format,
            Storage::Buffer(buffer) => buffer.info().format,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Storage::Texture(texture) => texture.info().width,
            Storage::Buffer(buffer) => buffer.info().width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Storage::Texture(texture) => texture.info().height,
            Storage::Buffer(buffer) => buffer.info().height,
        }
    }

    pub fn samples(&self) -> u32 {
        match self {
            Storage::Texture(texture) => texture.info().samples,
            Storage::Buffer(buffer) => buffer.info().samples,
        }
    }

    pub fn is_multisample(&self) -> bool {
        self.samples() > 1
    }

    pub fn is_texture(&self) -> bool {
        matches!(self, Storage::Texture(_))
    }

    /// Texture shape, or None for renderbuffers
    pub fn texture_type(&self) -> Option<TextureType> {
        match self {
            Storage::Texture(texture) => Some(texture.info().texture_type),
            Storage::Buffer(_) => None,
        }
    }

    /// Array layer count (1 for anything that is not an array texture)
    pub fn array_layers(&self) -> u32 {
        match self {
            Storage::Texture(texture) if texture.info().is_array() => texture.info().array_layers,
            _ => 1,
        }
    }

    /// Fixed sample locations (always true for renderbuffers)
    pub fn fixed_sample_locations(&self) -> bool {
        match self {
            Storage::Texture(texture) => texture.info().fixed_sample_locations,
            Storage::Buffer(_) => true,
        }
    }

    pub fn as_texture(&self) -> Option<&Arc<dyn Texture>> {
        match self {
            Storage::Texture(texture) => Some(texture),
            Storage::Buffer(_) => None,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Storage::Texture(texture) => texture.id(),
            Storage::Buffer(buffer) => buffer.id(),
        }
    }
}

impl From<Arc<dyn Texture>> for Storage {
    fn from(texture: Arc<dyn Texture>) -> Self {
        Storage::Texture(texture)
    }
}

impl From<Arc<dyn Renderbuffer>> for Storage {
    fn from(buffer: Arc<dyn Renderbuffer>) -> Self {
        Storage::Buffer(buffer)
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_texture() { "Texture" } else { "Renderbuffer" };
        write!(
            f,
            "{} {{ id: {}, {}x{}, {:?}, samples: {} }}",
            kind,
            self.id(),
            self.width(),
            self.height(),
            self.format(),
            self.samples()
        )
    }
}

// ===== ATTACHMENT =====

/// Occupied attachment slot
#[derive(Clone)]
pub struct Attachment {
    storage: Storage,
    resolve: Option<Arc<dyn Texture>>,
    needs_resolve: bool,
    needs_mipmap: bool,
}

impl Attachment {
    /// New clean attachment
    pub fn new(storage: Storage, resolve: Option<Arc<dyn Texture>>) -> Self {
        Self {
            storage,
            resolve,
            needs_resolve: false,
            needs_mipmap: false,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn resolve(&self) -> Option<&Arc<dyn Texture>> {
        self.resolve.as_ref()
    }

    pub fn needs_resolve(&self) -> bool {
        self.needs_resolve
    }

    pub fn needs_mipmap(&self) -> bool {
        self.needs_mipmap
    }

    /// Texture a shader should sample: the resolve if present, else the
    /// primary texture. None for a renderbuffer without a resolve.
    pub fn sampled_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.resolve.as_ref().or_else(|| self.storage.as_texture())
    }

    /// Recompute both dirty flags after the target was bound for writing
    pub(crate) fn mark_dirty(&mut self, auto_resolve: bool, auto_mipmap: bool) {
        self.needs_resolve = auto_resolve && self.resolve.is_some();

        let texture_has_mipmap = self.storage.as_texture()
            .map(|texture| texture.info().mipmap)
            .unwrap_or(false);
        let resolve_has_mipmap = self.resolve.as_ref()
            .map(|texture| texture.info().mipmap)
            .unwrap_or(false);

        // A multisample attachment that does not resolve keeps stale mipmaps
        self.needs_mipmap = auto_mipmap
            && (texture_has_mipmap || (self.needs_resolve && resolve_has_mipmap));
    }

    pub(crate) fn clear_resolve(&mut self) {
        self.needs_resolve = false;
    }

    pub(crate) fn clear_mipmap(&mut self) {
        self.needs_mipmap = false;
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("storage", &self.storage)
            .field("resolve", &self.resolve.as_ref().map(|texture| texture.id()))
            .field("needs_resolve", &self.needs_resolve)
            .field("needs_mipmap", &self.needs_mipmap)
            .finish()
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
