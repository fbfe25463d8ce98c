/// Texture trait, texture descriptor, and texture info

/// Pixel format of textures and renderbuffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    R8G8B8_UNORM,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SFLOAT,

    // Depth formats
    D16_UNORM,
    D24_UNORM,
    D32_SFLOAT,

    // Combined depth-stencil formats
    D24_UNORM_S8_UINT,
    D32_SFLOAT_S8_UINT,

    // Stencil formats
    S8_UINT,
}

/// Shape of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    /// One-dimensional texture
    Tex1D,
    /// Two-dimensional texture
    Tex2D,
    /// Three-dimensional (volume) texture
    Tex3D,
    /// Array of 2D layers
    Array2D,
    /// Six-faced cube map
    Cube,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels (1 for 1D textures)
    pub height: u32,
    /// Depth in slices (3D textures only, 1 otherwise)
    pub depth: u32,
    /// Number of array layers (Array2D only, 1 otherwise)
    pub array_layers: u32,
    /// Texture shape
    pub texture_type: TextureType,
    /// Pixel format
    pub format: TextureFormat,
    /// Sample count (1 = single-sampled)
    pub samples: u32,
    /// Fixed sample locations (multisample textures only)
    pub fixed_sample_locations: bool,
    /// Allocate a full mipmap chain
    pub mipmap: bool,
}

impl TextureDesc {
    /// Single-sampled 2D texture without mipmaps
    pub fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            depth: 1,
            array_layers: 1,
            texture_type: TextureType::Tex2D,
            format,
            samples: 1,
            fixed_sample_locations: true,
            mipmap: false,
        }
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()`. Mirrors the descriptor it was created from.
pub type TextureInfo = TextureDesc;

impl TextureInfo {
    /// Returns true if this texture is a texture array
    pub fn is_array(&self) -> bool {
        self.texture_type == TextureType::Array2D
    }

    /// Returns true if this texture has more than one sample per pixel
    pub fn is_multisample(&self) -> bool {
        self.samples > 1
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
/// The texture is automatically destroyed when its last reference is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Backend object id
    fn id(&self) -> u32;
}
