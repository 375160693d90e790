//! Engine configuration
//!
//! Scoring constants live in a frozen `ScoringConfig` handed to the scorer
//! at construction, so alternative tables can be swapped in for tests or
//! other questionnaires. Generation settings default from the environment.

use crate::error::EngineError;
use crate::types::{AnswerValue, Language, MaturityLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the generation API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default bound on a generation request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Points awarded per answer, multiplied by the question weight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnswerValues {
    pub yes: f64,
    pub no: f64,
    pub unknown: f64,
}

impl Default for AnswerValues {
    fn default() -> Self {
        Self {
            yes: 1.0,
            no: 0.0,
            unknown: -0.5,
        }
    }
}

impl AnswerValues {
    pub fn value(&self, answer: AnswerValue) -> f64 {
        match answer {
            AnswerValue::Yes => self.yes,
            AnswerValue::No => self.no,
            AnswerValue::Unknown => self.unknown,
        }
    }
}

/// Half-open percentage band `[min, max)` for one maturity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MaturityBand {
    pub level: MaturityLevel,
    pub min: f64,
    pub max: f64,
}

impl MaturityBand {
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.min && percentage < self.max
    }
}

/// Cutoffs for the strengths/weaknesses/critical analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// How many top and bottom categories are considered
    pub window: usize,
    pub strength_min: f64,
    pub weakness_max: f64,
    pub critical_max: f64,
    /// Unknown answers above this share of a category's questions flag an awareness gap
    pub unknown_ratio: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            window: 3,
            strength_min: 70.0,
            weakness_max: 50.0,
            critical_max: 30.0,
            unknown_ratio: 0.5,
        }
    }
}

/// Frozen scoring constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub answer_values: AnswerValues,
    /// Tested in order
    pub maturity_bands: Vec<MaturityBand>,
    /// Used when no band matches
    pub expert_floor: f64,
    pub analysis: AnalysisThresholds,
    /// Language of derived analysis text
    pub language: Language,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            answer_values: AnswerValues::default(),
            maturity_bands: vec![
                MaturityBand {
                    level: MaturityLevel::Basic,
                    min: 0.0,
                    max: 40.0,
                },
                MaturityBand {
                    level: MaturityLevel::Intermediate,
                    min: 40.0,
                    max: 70.0,
                },
                MaturityBand {
                    level: MaturityLevel::Advanced,
                    min: 70.0,
                    max: 85.0,
                },
                MaturityBand {
                    level: MaturityLevel::Expert,
                    min: 85.0,
                    max: 100.0,
                },
            ],
            expert_floor: 85.0,
            analysis: AnalysisThresholds::default(),
            language: Language::default(),
        }
    }
}

/// Settings for the OpenAI-compatible generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API base URL, `/chat/completions` is appended
    pub api_url: String,

    /// API key. Empty disables generation. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: String,

    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,

    /// Upper bound for the whole request
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            model: "gpt-4".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    /// Generation disabled regardless of environment
    pub fn disabled() -> Self {
        Self {
            api_key: String::new(),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub generation: GenerationConfig,
}

impl EngineConfig {
    /// Default config file location: `<config_dir>/maturity-engine/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("maturity-engine").join("config.json"))
    }

    /// Load from an explicit path, else the default location if it exists,
    /// else built-in defaults. A key in the environment fills a missing key
    /// in the file.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(&path).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;

        if config.generation.api_key.is_empty() {
            config.generation.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        }

        tracing::debug!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.scoring.maturity_bands.is_empty() {
            return Err(EngineError::Config("maturity_bands must not be empty".to_string()));
        }
        if let Some(band) = self.scoring.maturity_bands.iter().find(|b| b.min > b.max) {
            return Err(EngineError::Config(format!(
                "maturity band {} has min {} above max {}",
                band.level, band.min, band.max
            )));
        }
        if self.generation.timeout_secs == 0 {
            return Err(EngineError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
