use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default dispute period, in blocks.
pub const DEFAULT_DISPUTE_PERIOD: i64 = 6;

/// Module parameters governing channel closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Blocks a sender-initiated closure waits before it becomes final.
    #[serde(default = "default_dispute_period")]
    pub dispute_period: i64,
    /// Whether a payout leg may be empty (a participant receives nothing).
    #[serde(default = "default_true")]
    pub allow_zero_payout_leg: bool,
}

fn default_dispute_period() -> i64 {
    DEFAULT_DISPUTE_PERIOD
}

fn default_true() -> bool {
    true
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            dispute_period: default_dispute_period(),
            allow_zero_payout_leg: true,
        }
    }
}

impl ChannelParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.dispute_period < 0 {
            return Err(CoreError::InvalidParams(format!(
                "dispute period must not be negative, got {}",
                self.dispute_period
            )));
        }
        Ok(())
    }
}
