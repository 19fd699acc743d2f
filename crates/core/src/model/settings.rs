use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("retry delay must be at least 1 tick")]
    InvalidRetryDelayMin,

    #[error("retry delay range is inverted: {min}..={max}")]
    InvalidRetryDelayBounds { min: u32, max: u32 },

    #[error("max question length must be at least 2 characters")]
    InvalidMaxQuestionChars,

    #[error("mock question budget must be > 0")]
    InvalidMockBudget,

    #[error("mock countdown must be > 0 ticks")]
    InvalidMockCountdown,

    #[error("negative marking penalty must be within 0..=1, got {provided}")]
    InvalidPenalty { provided: f64 },

    #[error("unknown delivery policy: {raw}")]
    UnknownDeliveryPolicy { raw: String },
}

//
// ─── DELIVERY POLICY ───────────────────────────────────────────────────────────
//

/// How fresh questions are pulled from a chapter pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPolicy {
    /// Per-chapter cursor with wraparound: every question is shown once
    /// before any repeats.
    #[default]
    Sequential,
    /// A uniformly random question each tick; repeats may come early.
    Shuffle,
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryPolicy::Sequential => write!(f, "sequential"),
            DeliveryPolicy::Shuffle => write!(f, "shuffle"),
        }
    }
}

impl FromStr for DeliveryPolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "shuffle" | "random" => Ok(Self::Shuffle),
            _ => Err(SettingsError::UnknownDeliveryPolicy { raw: s.to_string() }),
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for parsing and question delivery.
///
/// Defaults follow the reference exam format: retries resurface after 2–6
/// ticks, a mock has 100 questions and 7200 countdown ticks, and negative
/// marking costs a quarter point.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSettings {
    retry_delay_min: u32,
    retry_delay_max: u32,
    max_question_chars: usize,
    mock_budget: u32,
    mock_countdown_ticks: u32,
    negative_penalty: f64,
    delivery: DeliveryPolicy,
    seed: Option<u64>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            retry_delay_min: 2,
            retry_delay_max: 6,
            max_question_chars: 500,
            mock_budget: 100,
            mock_countdown_ticks: 7_200,
            negative_penalty: 0.25,
            delivery: DeliveryPolicy::Sequential,
            seed: None,
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when a bound is zero, the retry range is
    /// inverted, or the penalty lies outside `0..=1` (a wrong answer never
    /// costs more than a right one earns).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        retry_delay_min: u32,
        retry_delay_max: u32,
        max_question_chars: usize,
        mock_budget: u32,
        mock_countdown_ticks: u32,
        negative_penalty: f64,
        delivery: DeliveryPolicy,
        seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        if retry_delay_min == 0 {
            return Err(SettingsError::InvalidRetryDelayMin);
        }
        if retry_delay_min > retry_delay_max {
            return Err(SettingsError::InvalidRetryDelayBounds {
                min: retry_delay_min,
                max: retry_delay_max,
            });
        }
        if max_question_chars < 2 {
            return Err(SettingsError::InvalidMaxQuestionChars);
        }
        if mock_budget == 0 {
            return Err(SettingsError::InvalidMockBudget);
        }
        if mock_countdown_ticks == 0 {
            return Err(SettingsError::InvalidMockCountdown);
        }
        if !(0.0..=1.0).contains(&negative_penalty) {
            return Err(SettingsError::InvalidPenalty {
                provided: negative_penalty,
            });
        }

        Ok(Self {
            retry_delay_min,
            retry_delay_max,
            max_question_chars,
            mock_budget,
            mock_countdown_ticks,
            negative_penalty,
            delivery,
            seed,
        })
    }

    /// Same settings with a different delivery policy.
    #[must_use]
    pub fn with_delivery(mut self, delivery: DeliveryPolicy) -> Self {
        self.delivery = delivery;
        self
    }

    /// Same settings with a fixed RNG seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    // Accessors
    #[must_use]
    pub fn retry_delay_min(&self) -> u32 {
        self.retry_delay_min
    }

    #[must_use]
    pub fn retry_delay_max(&self) -> u32 {
        self.retry_delay_max
    }

    #[must_use]
    pub fn max_question_chars(&self) -> usize {
        self.max_question_chars
    }

    #[must_use]
    pub fn mock_budget(&self) -> u32 {
        self.mock_budget
    }

    #[must_use]
    pub fn mock_countdown_ticks(&self) -> u32 {
        self.mock_countdown_ticks
    }

    #[must_use]
    pub fn negative_penalty(&self) -> f64 {
        self.negative_penalty
    }

    #[must_use]
    pub fn delivery(&self) -> DeliveryPolicy {
        self.delivery
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
