//! maturity-engine - E-commerce Maturity Scoring & Recommendations
//!
//! Turns answers to a weighted yes/no/unknown questionnaire into category and
//! overall scores, a maturity level, and a ranked list of actions.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ Plan filter  │ → │   Scoring    │ → │ Recommendations  │ → │ Prioritizer  │
//! │ (questions)  │   │ (answers)    │   │ (rules / model)  │   │ (constraints)│
//! └──────────────┘   └──────────────┘   └──────────────────┘   └──────────────┘
//! ```
//!
//! Recommendations come from an external text model when an API key is
//! configured. Any failure there falls back to the built-in rule table, so
//! the pipeline as a whole never fails.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use maturity_engine::{quick_score, Answer, AnswerValue, MaturityEngine};
//!
//! // Scores only
//! let result = quick_score(&[Answer::new("s1", AnswerValue::Yes)])?;
//!
//! // Full pipeline
//! let engine = MaturityEngine::init(None)?;
//! let report = engine.assess(&answers, &profile, &constraints, Language::Tr).await;
//! ```

pub mod catalog;
pub mod config;
pub mod convenience;
pub mod error;
pub mod generation;
pub mod plan;
pub mod prioritizer;
pub mod recommendations;
pub mod scoring;
pub mod types;

// Core types
pub use catalog::{Catalog, CatalogData};
pub use config::{EngineConfig, GenerationConfig, ScoringConfig};
pub use error::{CatalogError, EngineError, GenerationError};
pub use types::*;

// Pipeline stages
pub use plan::{filter_questions, Plan};
pub use prioritizer::prioritize_actions;
pub use recommendations::{CategoryRule, RecommendationEngine};
pub use scoring::{PerformanceAnalysis, ScoringSystem};

// Generation seam
pub use generation::{GenerationProvider, OpenAiProvider};

// Convenience API
pub use convenience::{quick_score, AssessmentReport, MaturityEngine};
