//! Fusion orchestration: lifecycle, event sequencing, snapshot publishing

pub mod orchestrator;
pub mod formatting;

use serde::{Deserialize, Serialize};

use crate::core::types::PositionFix;
use crate::processing::kalman::FilterConfig;

pub use orchestrator::{CallbackHandle, FixCallback, FusionOrchestrator};
pub use formatting::{CsvFormatter, FixFormatter, JsonFormatter, SnapshotRecord, TextFormatter};

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionState {
    /// No correction received yet; displacement events are dropped
    Uninitialized,
    /// Filter seeded; predictions and corrections both flow
    Initialized,
}

impl FusionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Initialized => "Initialized",
        }
    }
}

/// Snapshot broadcast to observers on every state-changing transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FusionUpdate {
    /// A new fused position estimate
    Fix(PositionFix),
    /// The engine was reset and currently has no position
    Reset,
}

impl FusionUpdate {
    pub fn fix(&self) -> Option<&PositionFix> {
        match self {
            Self::Fix(fix) => Some(fix),
            Self::Reset => None,
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FusionConfig {
    pub filter: FilterConfig,
}
