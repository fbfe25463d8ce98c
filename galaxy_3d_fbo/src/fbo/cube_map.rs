/// RenderTargetCubeMap - render target whose color attachment is a cube map
///
/// Each face is rendered separately: `bind_face` points COLOR0 at one face
/// and mip level, then binds the target for drawing. `calc_view_matrix`
/// gives the matching view transform for an eye position.

use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::fbo::{FboFormat, RenderTarget, TextureFormatRequest};
use crate::graphics_device::{AttachmentPoint, Context, FramebufferKind, Texture, TextureFormat};
use crate::{engine_bail, engine_trace};

/// Face of a cube map, in the device's face order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(&self) -> u32 {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    /// World-space direction the face looks along
    pub fn direction(&self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::X,
            CubeFace::NegativeX => Vec3::NEG_X,
            CubeFace::PositiveY => Vec3::Y,
            CubeFace::NegativeY => Vec3::NEG_Y,
            CubeFace::PositiveZ => Vec3::Z,
            CubeFace::NegativeZ => Vec3::NEG_Z,
        }
    }
}

pub struct RenderTargetCubeMap {
    target: RenderTarget,
    cube: Arc<dyn Texture>,
}

impl RenderTargetCubeMap {
    /// RGBA8 cube map with mipmaps, 24-bit depth renderbuffer
    pub fn default_format() -> FboFormat {
        FboFormat::new()
            .color_texture(TextureFormatRequest::new(TextureFormat::R8G8B8A8_UNORM).cube().mipmap(true))
    }

    /// Create a cube target with `face_width` x `face_height` faces
    ///
    /// The color request of `format` is turned into a cube map. Cube
    /// targets are never multisampled.
    pub fn create(context: Arc<Context>, face_width: u32, face_height: u32, format: FboFormat) -> Result<Self> {
        let request = format.color_texture_format().clone().cube();
        let format = format.color_texture(request).samples(0).coverage_samples(0);
        let target = RenderTarget::create(context, face_width, face_height, format)?;

        let cube = match target.attachments().get(AttachmentPoint::Color(0))
            .and_then(|attachment| attachment.storage().as_texture())
        {
            Some(texture) => texture.clone(),
            None => {
                engine_bail!(InvalidResource, "galaxy3d::fbo::CubeMap",
                    "Cube render target has no color texture at COLOR0");
            }
        };
        Ok(Self { target, cube })
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }

    /// Cube texture with its mip chain brought up to date
    pub fn cube_texture(&mut self) -> Result<Arc<dyn Texture>> {
        self.target.sampled_texture(AttachmentPoint::Color(0))?;
        Ok(self.cube.clone())
    }

    /// Render into `face` at mip `level` until the next unbind
    pub fn bind_face(&mut self, face: CubeFace, level: u32) -> Result<()> {
        self.target.binder().attach_face(
            self.target.context(),
            AttachmentPoint::Color(0),
            &self.cube,
            face.index(),
            level,
        )?;
        engine_trace!("galaxy3d::fbo::CubeMap", "Binding face {:?} level {}", face, level);
        self.target.bind(FramebufferKind::Draw)
    }

    /// View matrix looking from `eye` through `face`
    ///
    /// Side faces are rolled half a turn so rows come out in the order
    /// cube map sampling expects.
    pub fn calc_view_matrix(face: CubeFace, eye: Vec3) -> Mat4 {
        let up = match face {
            CubeFace::PositiveY => Vec3::Z,
            CubeFace::NegativeY => Vec3::NEG_Z,
            _ => Vec3::Y,
        };
        let view = Mat4::look_at_rh(eye, eye + face.direction(), up);
        match face {
            CubeFace::PositiveY | CubeFace::NegativeY => view,
            _ => Mat4::from_rotation_z(PI) * view,
        }
    }
}

#[cfg(test)]
#[path = "cube_map_tests.rs"]
mod tests;
