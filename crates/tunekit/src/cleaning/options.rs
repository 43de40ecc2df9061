//! Preprocessing options and batch engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::progress::TICK_CEILING;

/// Options forwarded to the cleaning call.
///
/// These are advisory: they are rendered into the cleaning instructions and
/// nothing is filtered locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    #[serde(rename = "removeDuplicates")]
    pub remove_duplicates: bool,

    #[serde(rename = "maskPII")]
    pub mask_pii: bool,

    #[serde(rename = "codeOnly")]
    pub code_only: bool,

    #[serde(rename = "minTokens")]
    pub min_tokens: u32,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            mask_pii: true,
            code_only: false,
            min_tokens: 50,
        }
    }
}

/// Pacing of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause between consecutive cleaning calls, in milliseconds.
    pub inter_item_delay_ms: u64,

    /// Interval of the progress ticker, in milliseconds.
    pub progress_tick_ms: u64,

    /// Percentage added per tick.
    pub progress_step: u8,

    /// Highest percentage the ticker reaches before the run finishes.
    pub progress_cap: u8,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inter_item_delay_ms: 500,
            progress_tick_ms: 200,
            progress_step: 2,
            progress_cap: 90,
        }
    }
}

impl BatchConfig {
    /// No pacing at all; for tests and the mock provider.
    pub fn immediate() -> Self {
        Self {
            inter_item_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }

    /// Reject pacing values that cannot describe a 0-100 progress bar.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_cap > TICK_CEILING {
            return Err(format!(
                "progress_cap must be at most {}, got {}",
                TICK_CEILING, self.progress_cap
            ));
        }
        if self.progress_step == 0 || self.progress_step > TICK_CEILING {
            return Err(format!(
                "progress_step must be between 1 and {}, got {}",
                TICK_CEILING, self.progress_step
            ));
        }
        Ok(())
    }
}
