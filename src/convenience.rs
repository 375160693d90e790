//! Convenience entry points
//!
//! Two modes:
//! 1. Simple mode: `quick_score()` - bundled catalog, default tables, no recommendations
//! 2. Full mode: `MaturityEngine` - scoring, recommendations and prioritized actions
//!
//! ```rust,ignore
//! let engine = MaturityEngine::init(None)?;
//! let report = engine
//!     .assess(&answers, &profile, &ActionConstraints::default(), Language::En)
//!     .await;
//! for action in report.actions.iter().filter(|a| a.quick_win) {
//!     println!("{}", action.recommendation.title.en);
//! }
//! ```

use crate::catalog::Catalog;
use crate::config::{EngineConfig, ScoringConfig};
use crate::plan::{self, Plan};
use crate::prioritizer;
use crate::recommendations::RecommendationEngine;
use crate::scoring::ScoringSystem;
use crate::types::*;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// FULL MODE: MaturityEngine
// ============================================================================

/// Everything one assessment produces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    /// Scores and analysis, with `recommendations` filled in
    pub result: AssessmentResult,
    pub improvement_areas: Vec<ImprovementArea>,
    /// Recommendations ranked against the constraints
    pub actions: Vec<PrioritizedAction>,
}

impl AssessmentReport {
    pub fn quick_wins(&self) -> impl Iterator<Item = &PrioritizedAction> {
        self.actions.iter().filter(|a| a.quick_win)
    }
}

/// Full pipeline over one catalog and configuration
///
/// Build once, then call `assess` per submission. Safe to share between
/// tasks.
pub struct MaturityEngine {
    catalog: Arc<Catalog>,
    scoring: ScoringConfig,
    recommender: RecommendationEngine,
}

impl MaturityEngine {
    /// Bundled catalog plus config loaded from `config_path` or the default location
    pub fn init(config_path: Option<&Path>) -> Result<Self> {
        let config = EngineConfig::load(config_path).context("Failed to load engine config")?;
        let catalog = Catalog::bundled().context("Bundled catalog is invalid")?;
        Ok(Self::new(catalog, config))
    }

    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        let catalog = Arc::new(catalog);
        let recommender = RecommendationEngine::from_config(Arc::clone(&catalog), &config.generation);

        tracing::info!(
            "Maturity engine ready: {} categories, {} questions, generation {}",
            catalog.categories().len(),
            catalog.questions().len(),
            if recommender.has_provider() { "enabled" } else { "disabled" }
        );

        Self {
            catalog,
            scoring: config.scoring,
            recommender,
        }
    }

    /// Replace the recommendation engine, e.g. to plug in another provider
    pub fn with_recommender(mut self, recommender: RecommendationEngine) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn recommender(&self) -> &RecommendationEngine {
        &self.recommender
    }

    /// Questions a respondent on `plan` should see
    pub fn questions_for(&self, plan: Plan) -> Vec<&Question> {
        plan::filter_questions(plan, &self.catalog)
    }

    /// Scores only, `recommendations` left empty
    pub fn score(&self, answers: &[Answer]) -> AssessmentResult {
        ScoringSystem::new(&self.catalog, &self.scoring).calculate_score(answers)
    }

    /// Where `result` falls against caller-supplied benchmark figures
    pub fn percentile(&self, result: &AssessmentResult, benchmark: &BenchmarkData) -> u8 {
        ScoringSystem::new(&self.catalog, &self.scoring).calculate_percentile(result.total_score, benchmark)
    }

    /// Score, recommend and prioritize. Never fails: generation problems
    /// fall back to the rule table.
    ///
    /// `language` applies to the analysis text as well as the recommendations.
    pub async fn assess(
        &self,
        answers: &[Answer],
        profile: &CompanyProfile,
        constraints: &ActionConstraints,
        language: Language,
    ) -> AssessmentReport {
        let scoring = ScoringConfig {
            language,
            ..self.scoring.clone()
        };
        let scorer = ScoringSystem::new(&self.catalog, &scoring);
        let mut result = scorer.calculate_score(answers);
        let improvement_areas = scorer.prioritize_improvement_areas(&result.category_scores);

        result.recommendations = self
            .recommender
            .generate_recommendations(&result, profile, language)
            .await;

        let actions = prioritizer::prioritize_actions(&result.recommendations, constraints, &result);

        tracing::debug!(
            "Assessment {}: {:.1}% ({}), {} actions",
            result.id,
            result.percentage,
            result.maturity_level,
            actions.len()
        );

        AssessmentReport {
            result,
            improvement_areas,
            actions,
        }
    }
}

// ============================================================================
// SIMPLE MODE: bundled catalog, default tables
// ============================================================================

/// Score answers against the bundled questionnaire with default tables
///
/// ```rust,ignore
/// let result = quick_score(&[Answer::new("s1", AnswerValue::Yes)])?;
/// println!("{} ({:.1}%)", result.maturity_level, result.percentage);
/// ```
pub fn quick_score(answers: &[Answer]) -> Result<AssessmentResult> {
    let catalog = Catalog::bundled().context("Bundled catalog is invalid")?;
    let config = ScoringConfig::default();
    Ok(ScoringSystem::new(&catalog, &config).calculate_score(answers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::error::GenerationError;
    use crate::generation::GenerationProvider;
    use async_trait::async_trait;
    use std::time::Duration;

    fn offline_engine() -> MaturityEngine {
        let config = EngineConfig {
            scoring: ScoringConfig::default(),
            generation: GenerationConfig::disabled(),
        };
        MaturityEngine::new(Catalog::bundled().unwrap(), config)
    }

    fn answer_all(engine: &MaturityEngine, value: AnswerValue) -> Vec<Answer> {
        engine
            .catalog()
            .questions()
            .iter()
            .map(|q| Answer::new(q.id.clone(), value))
            .collect()
    }

    #[test]
    fn test_quick_score_matches_engine_score() {
        let answers = vec![
            Answer::new("s1", AnswerValue::Yes),
            Answer::new("t2", AnswerValue::Unknown),
        ];
        let quick = quick_score(&answers).unwrap();
        let full = offline_engine().score(&answers);

        assert_eq!(quick.total_score, full.total_score);
        assert_eq!(quick.percentage, full.percentage);
        assert_eq!(quick.category_scores, full.category_scores);
    }

    #[test]
    fn test_questions_for_plan() {
        let engine = offline_engine();
        assert_eq!(engine.questions_for(Plan::FreeTrial).len(), 10);
        assert_eq!(engine.questions_for(Plan::Combined).len(), engine.catalog().questions().len());
    }

    #[tokio::test]
    async fn test_assess_weak_company_offline() {
        let engine = offline_engine();
        let answers = answer_all(&engine, AnswerValue::No);
        let profile = CompanyProfile {
            size: CompanySize::Startup,
            ..Default::default()
        };
        let constraints = ActionConstraints {
            budget: Some(100.0),
            timeframe: Some(3),
            resources: vec![],
        };

        let report = engine.assess(&answers, &profile, &constraints, Language::En).await;

        assert_eq!(report.result.percentage, 0.0);
        assert_eq!(report.result.maturity_level, MaturityLevel::Basic);
        // seven category rules plus automation and consultation
        assert_eq!(report.result.recommendations.len(), 9);
        assert_eq!(report.actions.len(), 9);
        assert_eq!(report.improvement_areas.len(), 7);
        assert!(report.improvement_areas.iter().all(|a| a.priority == Level::High));

        let priorities: Vec<f64> = report.actions.iter().map(|a| a.overall_priority).collect();
        assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
        assert!(report.quick_wins().count() > 0);
    }

    #[tokio::test]
    async fn test_assess_strong_company_has_no_actions() {
        let engine = offline_engine();
        let answers = answer_all(&engine, AnswerValue::Yes);
        let profile = CompanyProfile {
            size: CompanySize::Large,
            ..Default::default()
        };

        let report = engine
            .assess(&answers, &profile, &ActionConstraints::default(), Language::Tr)
            .await;

        assert_eq!(report.result.percentage, 100.0);
        assert_eq!(report.result.maturity_level, MaturityLevel::Expert);
        assert!(report.result.recommendations.is_empty());
        assert!(report.actions.is_empty());
    }

    #[tokio::test]
    async fn test_ranking_does_not_depend_on_language() {
        let engine = offline_engine();
        let answers = answer_all(&engine, AnswerValue::No);
        let profile = CompanyProfile::default();
        let constraints = ActionConstraints::default();

        let tr = engine.assess(&answers, &profile, &constraints, Language::Tr).await;
        let en = engine.assess(&answers, &profile, &constraints, Language::En).await;

        assert!(tr.result.critical_actions[0].contains("alanında"));
        assert!(en.result.critical_actions[0].contains("critical improvement needed"));

        let strategy = tr
            .actions
            .iter()
            .find(|a| a.recommendation.id == "strategy-strategy-doc")
            .unwrap();
        assert_eq!(strategy.urgency_score, 100.0);

        let ranking = |report: &AssessmentReport| -> Vec<(String, f64)> {
            report
                .actions
                .iter()
                .map(|a| (a.recommendation.id.clone(), a.overall_priority))
                .collect()
        };
        assert_eq!(ranking(&tr), ranking(&en));
    }

    struct BrokenProvider;

    #[async_trait]
    impl GenerationProvider for BrokenProvider {
        async fn generate(&self, _prompt: &str, _language: Language) -> Result<String, GenerationError> {
            Ok("no json here".to_string())
        }
    }

    #[tokio::test]
    async fn test_assess_falls_back_when_provider_misbehaves() {
        let offline = offline_engine();
        let answers = answer_all(&offline, AnswerValue::No);
        let profile = CompanyProfile::default();

        let expected = offline
            .assess(&answers, &profile, &ActionConstraints::default(), Language::En)
            .await;

        let recommender = RecommendationEngine::new(Arc::new(Catalog::bundled().unwrap()))
            .with_provider(Arc::new(BrokenProvider), Duration::from_secs(1));
        let engine = offline_engine().with_recommender(recommender);
        assert!(engine.recommender().has_provider());

        let report = engine
            .assess(&answers, &profile, &ActionConstraints::default(), Language::En)
            .await;

        assert_eq!(report.result.recommendations, expected.result.recommendations);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let engine = offline_engine();
        let answers = answer_all(&engine, AnswerValue::No);
        let report = tokio_test::block_on(engine.assess(
            &answers,
            &CompanyProfile::default(),
            &ActionConstraints::default(),
            Language::En,
        ));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["result"]["maturityLevel"].is_string());
        assert!(json["improvementAreas"].is_array());
        assert!(json["actions"][0]["overallPriority"].is_number());
    }

    #[test]
    fn test_percentile_uses_total_score() {
        let engine = offline_engine();
        let result = engine.score(&answer_all(&engine, AnswerValue::Yes));
        let benchmark = BenchmarkData {
            industry: "retail".to_string(),
            company_size: "small".to_string(),
            average_score: result.total_score,
            top_performer_score: result.total_score * 2.0,
        };
        assert_eq!(engine.percentile(&result, &benchmark), 50);
    }
}
