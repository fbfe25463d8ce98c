/// Graphics context - shared device handle, memoized driver limits, and
/// the framebuffer binding stacks.
///
/// Driver limits never change for the lifetime of a device, so each one is
/// queried at most once per context, not once per process. Create one
/// context per device and share it between render targets so they share
/// the cache. Per-format sample limits are memoized lazily in a map keyed
/// by format.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    DeviceFeature, DriverLimit, Framebuffer, FramebufferKind, GraphicsDevice, TextureFormat,
};
use crate::engine_bail;

/// Current and saved framebuffer bindings
#[derive(Default)]
struct BindingState {
    draw: Option<Arc<dyn Framebuffer>>,
    read: Option<Arc<dyn Framebuffer>>,
    draw_stack: Vec<Option<Arc<dyn Framebuffer>>>,
    read_stack: Vec<Option<Arc<dyn Framebuffer>>>,
    /// Kinds in push order, consumed by `pop_last()`
    pushed_kinds: Vec<FramebufferKind>,
}

fn same_framebuffer(a: &Option<Arc<dyn Framebuffer>>, b: Option<&Arc<dyn Framebuffer>>) -> bool {
    a.as_ref().map(|fb| fb.id()) == b.map(|fb| fb.id())
}

/// Graphics context shared by every render target created on one device
pub struct Context {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    max_color_attachments: OnceLock<u32>,
    max_samples: OnceLock<u32>,
    sample_count_limits: Mutex<FxHashMap<TextureFormat, u32>>,
    bindings: Mutex<BindingState>,
}

impl Context {
    /// Create a context around a device
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self {
            device,
            max_color_attachments: OnceLock::new(),
            max_samples: OnceLock::new(),
            sample_count_limits: Mutex::new(FxHashMap::default()),
            bindings: Mutex::new(BindingState::default()),
        }
    }

    /// Lock the device
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the device lock is poisoned.
    pub fn device(&self) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
        self.device.lock()
            .map_err(|_| Error::BackendError("GraphicsDevice lock poisoned".to_string()))
    }

    /// Shared device handle
    pub fn device_handle(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    // ===== LIMITS =====

    fn cached_limit(&self, cell: &OnceLock<u32>, limit: DriverLimit) -> Result<u32> {
        if let Some(value) = cell.get() {
            return Ok(*value);
        }
        let value = self.device()?.query_limit(limit);
        crate::engine_trace!("galaxy3d::Context", "Driver limit {:?} = {}", limit, value);
        Ok(*cell.get_or_init(|| value))
    }

    /// Number of color attachment slots (queried once)
    pub fn max_color_attachments(&self) -> Result<u32> {
        self.cached_limit(&self.max_color_attachments, DriverLimit::MaxColorAttachments)
    }

    /// Highest sample count for any format (queried once)
    pub fn max_samples(&self) -> Result<u32> {
        self.cached_limit(&self.max_samples, DriverLimit::MaxSamples)
    }

    /// Highest sample count for `format` (queried once per format)
    pub fn sample_count_limit(&self, format: TextureFormat) -> Result<u32> {
        let mut limits = self.sample_count_limits.lock()
            .map_err(|_| Error::BackendError("Sample limit cache lock poisoned".to_string()))?;
        if let Some(value) = limits.get(&format) {
            return Ok(*value);
        }
        let value = self.device()?.sample_count_limit(format);
        limits.insert(format, value);
        Ok(value)
    }

    /// Query an optional capability
    pub fn supports(&self, feature: DeviceFeature) -> Result<bool> {
        Ok(self.device()?.supports(feature))
    }

    // ===== BINDING STACKS =====

    fn bindings(&self) -> Result<MutexGuard<'_, BindingState>> {
        self.bindings.lock()
            .map_err(|_| Error::BackendError("Framebuffer binding lock poisoned".to_string()))
    }

    /// Bind `framebuffer`, saving the previous binding of `kind`
    ///
    /// `None` binds the default framebuffer.
    pub fn push_framebuffer(
        &self,
        kind: FramebufferKind,
        framebuffer: Option<&Arc<dyn Framebuffer>>,
    ) -> Result<()> {
        let mut state = self.bindings()?;
        let mut device = self.device()?;

        if kind.includes_draw() {
            let previous = state.draw.clone();
            if !same_framebuffer(&previous, framebuffer) {
                device.bind_framebuffer(FramebufferKind::Draw, framebuffer)?;
            }
            state.draw_stack.push(previous);
            state.draw = framebuffer.cloned();
        }
        if kind.includes_read() {
            let previous = state.read.clone();
            if !same_framebuffer(&previous, framebuffer) {
                device.bind_framebuffer(FramebufferKind::Read, framebuffer)?;
            }
            state.read_stack.push(previous);
            state.read = framebuffer.cloned();
        }
        state.pushed_kinds.push(kind);
        Ok(())
    }

    /// Restore the binding saved by the matching `push_framebuffer(kind, ..)`
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if nothing of that kind was pushed.
    pub fn pop_framebuffer(&self, kind: FramebufferKind) -> Result<()> {
        let mut state = self.bindings()?;
        match state.pushed_kinds.iter().rposition(|pushed| *pushed == kind) {
            Some(index) => {
                state.pushed_kinds.remove(index);
            }
            None => {
                engine_bail!("galaxy3d::Context",
                    "pop_framebuffer({:?}) without a matching push", kind);
            }
        }
        let mut device = self.device()?;

        if kind.includes_draw() {
            let previous = state.draw_stack.pop().flatten();
            if !same_framebuffer(&state.draw, previous.as_ref()) {
                device.bind_framebuffer(FramebufferKind::Draw, previous.as_ref())?;
            }
            state.draw = previous;
        }
        if kind.includes_read() {
            let previous = state.read_stack.pop().flatten();
            if !same_framebuffer(&state.read, previous.as_ref()) {
                device.bind_framebuffer(FramebufferKind::Read, previous.as_ref())?;
            }
            state.read = previous;
        }
        Ok(())
    }

    /// Pop the most recent push, whatever its kind
    pub fn pop_last(&self) -> Result<()> {
        let last = self.bindings()?.pushed_kinds.last().copied();
        match last {
            Some(kind) => self.pop_framebuffer(kind),
            None => {
                engine_bail!("galaxy3d::Context", "No framebuffer binding to restore");
            }
        }
    }

    /// Id of the framebuffer currently bound for `kind` (None = default framebuffer)
    ///
    /// For `DrawRead` this is the draw binding.
    pub fn bound_framebuffer(&self, kind: FramebufferKind) -> Result<Option<u32>> {
        let state = self.bindings()?;
        let bound = match kind {
            FramebufferKind::Read => &state.read,
            _ => &state.draw,
        };
        Ok(bound.as_ref().map(|fb| fb.id()))
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
