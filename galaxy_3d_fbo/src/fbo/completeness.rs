/// CompletenessChecker - driver completeness status to typed errors

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::graphics_device::{Context, Framebuffer, FramebufferStatus};
use crate::engine_bail;

/// Why a framebuffer cannot be rendered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncompleteReason {
    UnsupportedFormat,
    MissingAttachment,
    IncompleteAttachment,
    MissingDrawBuffer,
    MissingReadBuffer,
    IncompleteMultisample,
    LayerTargetMismatch,
    DimensionMismatch,
    /// Backend status code with no portable meaning
    Unknown(u32),
}

impl IncompleteReason {
    /// None for a complete framebuffer
    pub fn from_status(status: FramebufferStatus) -> Option<Self> {
        match status {
            FramebufferStatus::Complete => None,
            FramebufferStatus::Unsupported => Some(Self::UnsupportedFormat),
            FramebufferStatus::IncompleteMissingAttachment => Some(Self::MissingAttachment),
            FramebufferStatus::IncompleteAttachment => Some(Self::IncompleteAttachment),
            FramebufferStatus::IncompleteDrawBuffer => Some(Self::MissingDrawBuffer),
            FramebufferStatus::IncompleteReadBuffer => Some(Self::MissingReadBuffer),
            FramebufferStatus::IncompleteMultisample => Some(Self::IncompleteMultisample),
            FramebufferStatus::IncompleteLayerTargets => Some(Self::LayerTargetMismatch),
            FramebufferStatus::IncompleteDimensions => Some(Self::DimensionMismatch),
            FramebufferStatus::Other(code) => Some(Self::Unknown(code)),
        }
    }
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => write!(f, "Unsupported framebuffer format"),
            Self::MissingAttachment => write!(f, "Framebuffer incomplete: missing attachment"),
            Self::IncompleteAttachment => write!(f, "Framebuffer incomplete: incomplete attachment"),
            Self::MissingDrawBuffer => write!(f, "Framebuffer incomplete: missing draw buffer"),
            Self::MissingReadBuffer => write!(f, "Framebuffer incomplete: missing read buffer"),
            Self::IncompleteMultisample => write!(f, "Framebuffer incomplete: incomplete multisample"),
            Self::LayerTargetMismatch => write!(f, "Framebuffer incomplete: not all attached images are layered"),
            Self::DimensionMismatch => write!(f, "Framebuffer incomplete: not all attached images have the same dimensions"),
            Self::Unknown(code) => write!(f, "Framebuffer invalid: unknown reason (status {})", code),
        }
    }
}

pub struct CompletenessChecker;

impl CompletenessChecker {
    /// First incomplete reason among `framebuffers`, if any
    pub fn query(context: &Context, framebuffers: &[&Arc<dyn Framebuffer>]) -> Result<Option<IncompleteReason>> {
        let device = context.device()?;
        Ok(framebuffers.iter()
            .find_map(|framebuffer| IncompleteReason::from_status(device.framebuffer_status(framebuffer))))
    }

    /// Fail with `InvalidSpecification` unless every framebuffer is complete
    pub fn check(context: &Context, framebuffers: &[&Arc<dyn Framebuffer>]) -> Result<()> {
        if let Some(reason) = Self::query(context, framebuffers)? {
            engine_bail!(InvalidSpecification, "galaxy3d::fbo::Completeness", "{}", reason);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "completeness_tests.rs"]
mod tests;
