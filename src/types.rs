//! Core types for the maturity assessment engine
//!
//! Catalog data (categories, questions) flows in, answers are scored, and
//! the derived types (scores, results, recommendations, actions) flow out
//! to whatever renders or stores them. Everything serializes to the
//! camelCase JSON shape the reporting side expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output language for human-readable text
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tr" => Ok(Language::Tr),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{}' (expected tr or en)", other)),
        }
    }
}

/// Text carried in both supported languages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    #[serde(default)]
    pub tr: String,
    #[serde(default)]
    pub en: String,
}

impl LocalizedText {
    pub fn new(tr: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            tr: tr.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Tr => &self.tr,
            Language::En => &self.en,
        }
    }
}

/// A weighted competency area of the questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    /// Importance multiplier applied when aggregating the overall score
    pub weight: f64,
    /// Chart colour, presentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn default_question_weight() -> f64 {
    1.0
}

/// A single yes/no/unknown question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category_id: String,
    #[serde(default)]
    pub text: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number: Option<u32>,
    #[serde(default = "default_question_weight")]
    pub weight: f64,
    /// Sales channel tags. `None` (or empty) means the question is general.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(default)]
    pub is_free_trial_question: bool,
}

impl Question {
    /// A question without channel tags applies to every plan
    pub fn is_general(&self) -> bool {
        self.channels.as_ref().map_or(true, |c| c.is_empty())
    }
}

/// The three possible responses to a question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnswerValue {
    Yes,
    No,
    /// "I don't know" - scored as an awareness gap, not a plain no
    Unknown,
}

/// A respondent's answer to one question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
            timestamp: Utc::now(),
        }
    }
}

/// Score of a single category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category_id: String,
    /// Raw weighted sum, negative when unknowns dominate
    pub score: f64,
    /// Sum of all catalog question weights in the category
    pub max_score: f64,
    /// Clamped to [0, 100], one decimal
    pub percentage: f64,
    pub answered_questions: usize,
    pub total_questions: usize,
    pub unknown_count: usize,
}

/// Ordinal classification of the overall percentage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaturityLevel {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl MaturityLevel {
    pub fn name(&self) -> &'static str {
        match self {
            MaturityLevel::Basic => "basic",
            MaturityLevel::Intermediate => "intermediate",
            MaturityLevel::Advanced => "advanced",
            MaturityLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full output of a scoring pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub id: String,
    pub total_score: f64,
    pub max_total_score: f64,
    pub percentage: f64,
    pub maturity_level: MaturityLevel,
    pub category_scores: Vec<CategoryScore>,
    /// Total magnitude of the unknown-answer deductions
    pub penalty_from_dont_know: f64,
    pub completed_at: DateTime<Utc>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub critical_actions: Vec<String>,
    /// Ids of the categories behind `critical_actions`, without repeats
    #[serde(default)]
    pub critical_categories: Vec<String>,
    /// Filled by the recommendation engine, empty after scoring
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Three-step level used for priority and impact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Implementation effort of a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// Expected delivery window: 0-1, 1-3, 3-6 and 6-12 months
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Immediate,
    Short,
    Medium,
    Long,
}

impl Timeframe {
    /// Ordinal rank, sooner is higher
    pub fn rank(&self) -> u8 {
        match self {
            Timeframe::Immediate => 4,
            Timeframe::Short => 3,
            Timeframe::Medium => 2,
            Timeframe::Long => 1,
        }
    }
}

/// An actionable improvement suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    /// Category id, or "general" for cross-cutting advice
    pub category: String,
    pub priority: Level,
    pub impact: Level,
    pub effort: Effort,
    pub timeframe: Timeframe,
    #[serde(rename = "estimatedROI", default, skip_serializing_if = "Option::is_none")]
    pub estimated_roi: Option<f64>,
}

/// Company size class
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Startup,
    #[default]
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub fn name(&self) -> &'static str {
        match self {
            CompanySize::Startup => "startup",
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
        }
    }
}

/// Profile of the assessed company, used to tailor recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub size: CompanySize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(default)]
    pub current_challenges: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

/// Resource limits the prioritizer scores against
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Available time in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<u32>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A recommendation ranked against constraints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedAction {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub urgency_score: f64,
    pub feasibility_score: f64,
    pub impact_score: f64,
    /// Weighted blend of the three sub-scores
    pub overall_priority: f64,
    /// Low effort and high impact
    pub quick_win: bool,
    pub prerequisites: Vec<String>,
    pub success_metrics: Vec<String>,
}

/// Peer figures supplied by the caller for percentile placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkData {
    pub industry: String,
    pub company_size: String,
    pub average_score: f64,
    pub top_performer_score: f64,
}

/// Improvement urgency of one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementArea {
    pub category_id: String,
    pub priority: Level,
    pub reason: String,
}

impl Level {
    pub fn name(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }

    /// Sort key, high first
    pub fn order(&self) -> u8 {
        match self {
            Level::High => 3,
            Level::Medium => 2,
            Level::Low => 1,
        }
    }
}
