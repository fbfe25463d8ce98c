/// PixelBuffer - RGBA8 pixels read back from a render target, rows top-down

use crate::error::Result;
use crate::engine_bail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap rows as returned by the device (bottom row first)
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if `data` does not hold `width * height`
    /// RGBA8 pixels.
    pub fn from_bottom_up(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            engine_bail!(InvalidResource, "galaxy3d::fbo::PixelBuffer",
                "Expected {} bytes for {}x{} RGBA8 pixels, got {}", expected, width, height, data.len());
        }
        let mut buffer = Self { width, height, data };
        buffer.flip_vertical();
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixels as RGBA8 texels
    pub fn texels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    /// Texel at `(x, y)`, y = 0 being the top row
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels().get((y * self.width + x) as usize).copied()
    }

    /// Swap rows top to bottom in place
    pub fn flip_vertical(&mut self) {
        let row_bytes = self.width as usize * Self::BYTES_PER_PIXEL;
        let rows = self.height as usize;
        if row_bytes == 0 {
            return;
        }
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (head, tail) = self.data.split_at_mut(bottom * row_bytes);
            head[top * row_bytes..(top + 1) * row_bytes].swap_with_slice(&mut tail[..row_bytes]);
        }
    }
}

#[cfg(test)]
#[path = "pixel_buffer_tests.rs"]
mod tests;
