/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every device call is recorded as a `MockCommand` in a shared log so
/// tests can assert on exactly which GPU work a render target issued.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    Area, AttachmentPoint, BlitDesc, Context, BlitFilter, BlitMask, DeviceFeature, DriverLimit,
    Framebuffer, FramebufferKind, FramebufferStatus, GraphicsDevice, Renderbuffer,
    RenderbufferDesc, RenderbufferInfo, Texture, TextureDesc, TextureFormat, TextureInfo,
};
use crate::engine_bail;

// ============================================================================
// Recorded commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCommand {
    CreateTexture { id: u32, desc: TextureDesc },
    CreateRenderbuffer { id: u32, desc: RenderbufferDesc },
    CreateFramebuffer { id: u32 },
    ReleaseFramebuffer { id: u32 },
    AttachTexture { framebuffer: u32, point: AttachmentPoint, texture: u32, level: u32 },
    AttachTextureFace { framebuffer: u32, point: AttachmentPoint, texture: u32, face: u32, level: u32 },
    AttachRenderbuffer { framebuffer: u32, point: AttachmentPoint, renderbuffer: u32 },
    Detach { framebuffer: u32, point: AttachmentPoint },
    SetDrawBuffers { framebuffer: u32, points: Vec<AttachmentPoint> },
    BindFramebuffer { kind: FramebufferKind, framebuffer: Option<u32> },
    Blit {
        src: Option<u32>,
        dst: Option<u32>,
        attachment: Option<AttachmentPoint>,
        src_area: Area,
        dst_area: Area,
        mask: BlitMask,
        filter: BlitFilter,
    },
    GenerateMipmaps { texture: u32 },
    ReadPixels { framebuffer: u32, point: AttachmentPoint, area: Area },
    SetLabel { framebuffer: u32, label: String },
    QueryLimit { limit: DriverLimit },
}

pub type CommandLog = Arc<Mutex<Vec<MockCommand>>>;

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub id: u32,
    pub info: TextureInfo,
}

impl MockTexture {
    pub fn new(id: u32, info: TextureInfo) -> Self {
        Self { id, info }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn id(&self) -> u32 {
        self.id
    }
}

// ============================================================================
// Mock Renderbuffer
// ============================================================================

#[derive(Debug)]
pub struct MockRenderbuffer {
    pub id: u32,
    pub info: RenderbufferInfo,
}

impl Renderbuffer for MockRenderbuffer {
    fn info(&self) -> &RenderbufferInfo {
        &self.info
    }

    fn id(&self) -> u32 {
        self.id
    }
}

// ============================================================================
// Mock Framebuffer
// ============================================================================

pub struct MockFramebuffer {
    pub id: u32,
    commands: CommandLog,
}

impl Framebuffer for MockFramebuffer {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for MockFramebuffer {
    fn drop(&mut self) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(MockCommand::ReleaseFramebuffer { id: self.id });
        }
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    pub commands: CommandLog,
    pub next_id: u32,
    /// Status returned by `framebuffer_status`
    pub status: FramebufferStatus,
    pub max_color_attachments: u32,
    pub max_samples: u32,
    /// Per-format sample limits (formats not listed use `max_samples`)
    pub sample_limits: FxHashMap<TextureFormat, u32>,
    pub coverage_sampling: bool,
    pub texture_multisample: bool,
    /// Makes the next texture creation fail with `OutOfMemory`
    pub fail_texture_creation: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            next_id: 1,
            status: FramebufferStatus::Complete,
            max_color_attachments: 8,
            max_samples: 8,
            sample_limits: FxHashMap::default(),
            coverage_sampling: false,
            texture_multisample: true,
            fail_texture_creation: false,
        }
    }

    /// Wrap into the shared handle expected by `Context`, returning the command log
    pub fn into_shared(self) -> (Arc<Mutex<MockGraphicsDevice>>, CommandLog) {
        let commands = self.commands.clone();
        (Arc::new(Mutex::new(self)), commands)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&self, command: MockCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if self.fail_texture_creation {
            self.fail_texture_creation = false;
            return Err(Error::OutOfMemory);
        }
        if desc.samples > 1 && !self.texture_multisample {
            engine_bail!("galaxy3d::mock", "multisample textures are not supported");
        }
        let id = self.allocate_id();
        self.record(MockCommand::CreateTexture { id, desc: desc.clone() });
        Ok(Arc::new(MockTexture::new(id, desc)))
    }

    fn create_renderbuffer(&mut self, desc: RenderbufferDesc) -> Result<Arc<dyn Renderbuffer>> {
        let id = self.allocate_id();
        self.record(MockCommand::CreateRenderbuffer { id, desc: desc.clone() });
        Ok(Arc::new(MockRenderbuffer { id, info: desc }))
    }

    fn create_framebuffer(&mut self) -> Result<Arc<dyn Framebuffer>> {
        let id = self.allocate_id();
        self.record(MockCommand::CreateFramebuffer { id });
        Ok(Arc::new(MockFramebuffer { id, commands: self.commands.clone() }))
    }

    fn attach_texture(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        texture: &Arc<dyn Texture>,
        level: u32,
    ) -> Result<()> {
        self.record(MockCommand::AttachTexture {
            framebuffer: framebuffer.id(),
            point,
            texture: texture.id(),
            level,
        });
        Ok(())
    }

    fn attach_texture_face(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        texture: &Arc<dyn Texture>,
        face: u32,
        level: u32,
    ) -> Result<()> {
        if face >= 6 {
            engine_bail!("galaxy3d::mock", "cube face {} out of range", face);
        }
        self.record(MockCommand::AttachTextureFace {
            framebuffer: framebuffer.id(),
            point,
            texture: texture.id(),
            face,
            level,
        });
        Ok(())
    }

    fn attach_renderbuffer(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        renderbuffer: &Arc<dyn Renderbuffer>,
    ) -> Result<()> {
        self.record(MockCommand::AttachRenderbuffer {
            framebuffer: framebuffer.id(),
            point,
            renderbuffer: renderbuffer.id(),
        });
        Ok(())
    }

    fn detach(&mut self, framebuffer: &Arc<dyn Framebuffer>, point: AttachmentPoint) -> Result<()> {
        self.record(MockCommand::Detach { framebuffer: framebuffer.id(), point });
        Ok(())
    }

    fn set_draw_buffers(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        points: &[AttachmentPoint],
    ) -> Result<()> {
        self.record(MockCommand::SetDrawBuffers {
            framebuffer: framebuffer.id(),
            points: points.to_vec(),
        });
        Ok(())
    }

    fn framebuffer_status(&self, _framebuffer: &Arc<dyn Framebuffer>) -> FramebufferStatus {
        self.status
    }

    fn bind_framebuffer(
        &mut self,
        kind: FramebufferKind,
        framebuffer: Option<&Arc<dyn Framebuffer>>,
    ) -> Result<()> {
        self.record(MockCommand::BindFramebuffer {
            kind,
            framebuffer: framebuffer.map(|fb| fb.id()),
        });
        Ok(())
    }

    fn blit(&mut self, desc: &BlitDesc<'_>) -> Result<()> {
        self.record(MockCommand::Blit {
            src: desc.src.map(|fb| fb.id()),
            dst: desc.dst.map(|fb| fb.id()),
            attachment: desc.attachment,
            src_area: desc.src_area,
            dst_area: desc.dst_area,
            mask: desc.mask,
            filter: desc.filter,
        });
        Ok(())
    }

    fn generate_mipmaps(&mut self, texture: &Arc<dyn Texture>) -> Result<()> {
        self.record(MockCommand::GenerateMipmaps { texture: texture.id() });
        Ok(())
    }

    /// Every byte of row `r` (bottom-up) is `r as u8`
    fn read_pixels(
        &mut self,
        framebuffer: &Arc<dyn Framebuffer>,
        point: AttachmentPoint,
        area: Area,
    ) -> Result<Vec<u8>> {
        self.record(MockCommand::ReadPixels { framebuffer: framebuffer.id(), point, area });
        let row_bytes = area.width() as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * area.height() as usize);
        for row in 0..area.height() {
            pixels.extend(std::iter::repeat(row as u8).take(row_bytes));
        }
        Ok(pixels)
    }

    fn set_label(&mut self, framebuffer: &Arc<dyn Framebuffer>, label: &str) -> Result<()> {
        self.record(MockCommand::SetLabel {
            framebuffer: framebuffer.id(),
            label: label.to_string(),
        });
        Ok(())
    }

    fn query_limit(&self, limit: DriverLimit) -> u32 {
        self.record(MockCommand::QueryLimit { limit });
        match limit {
            DriverLimit::MaxColorAttachments => self.max_color_attachments,
            DriverLimit::MaxSamples => self.max_samples,
        }
    }

    fn sample_count_limit(&self, format: TextureFormat) -> u32 {
        self.sample_limits.get(&format).copied().unwrap_or(self.max_samples)
    }

    fn supports(&self, feature: DeviceFeature) -> bool {
        match feature {
            DeviceFeature::CoverageSampling => self.coverage_sampling,
            DeviceFeature::TextureMultisample => self.texture_multisample,
        }
    }
}

// ============================================================================
// Command log helpers
// ============================================================================

/// Build a context around `device`, keeping typed access to the mock
pub fn mock_context(
    device: MockGraphicsDevice,
) -> (Arc<Context>, Arc<Mutex<MockGraphicsDevice>>, CommandLog) {
    let (shared, log) = device.into_shared();
    let dyn_device: Arc<Mutex<dyn GraphicsDevice>> = shared.clone();
    (Arc::new(Context::new(dyn_device)), shared, log)
}

/// Number of recorded commands matching `predicate`
pub fn count_commands(log: &CommandLog, predicate: impl Fn(&MockCommand) -> bool) -> usize {
    log.lock().unwrap().iter().filter(|command| predicate(command)).count()
}

pub fn blit_count(log: &CommandLog) -> usize {
    count_commands(log, |command| matches!(command, MockCommand::Blit { .. }))
}

pub fn mipmap_count(log: &CommandLog) -> usize {
    count_commands(log, |command| matches!(command, MockCommand::GenerateMipmaps { .. }))
}

pub fn clear_commands(log: &CommandLog) {
    log.lock().unwrap().clear();
}

/// Snapshot of the recorded commands
pub fn commands(log: &CommandLog) -> Vec<MockCommand> {
    log.lock().unwrap().clone()
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
