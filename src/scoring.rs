//! Scoring System
//!
//! Turns a set of answers into category scores, an overall weighted score,
//! a maturity level and a short qualitative analysis.
//!
//! - Each answer contributes `value(answer) * question.weight` to its category
//! - A category's maximum is the weight of all its catalog questions, so
//!   skipped questions pull the percentage down
//! - "Unknown" is worth less than "no": not knowing is an awareness gap
//!
//! Scoring is a pure function of (catalog, config, answers).

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::types::*;
use chrono::Utc;
use uuid::Uuid;

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Strengths, weaknesses and critical actions derived from category scores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub critical_actions: Vec<String>,
    pub critical_categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    score: f64,
    answered: usize,
    unknown: usize,
}

/// The scoring engine
pub struct ScoringSystem<'a> {
    catalog: &'a Catalog,
    config: &'a ScoringConfig,
}

impl<'a> ScoringSystem<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ScoringConfig) -> Self {
        Self { catalog, config }
    }

    /// Score a full set of answers
    pub fn calculate_score(&self, answers: &[Answer]) -> AssessmentResult {
        // 1. Per-category raw scores
        let category_scores = self.calculate_category_scores(answers);

        // 2. Category-weighted aggregate
        let total_score = self.calculate_total_score(&category_scores);
        let max_total_score = self.calculate_max_total_score(&category_scores);
        let percentage = self.overall_percentage(total_score, max_total_score);

        // 3. Classification and analysis
        let maturity_level = self.determine_maturity_level(percentage);
        let penalty_from_dont_know = self.calculate_unknown_penalty(answers);
        let analysis = self.analyze_performance(&category_scores);

        tracing::debug!(
            "Scored {} answers: {:.1}% ({}), {} critical actions",
            answers.len(),
            percentage,
            maturity_level,
            analysis.critical_actions.len()
        );

        AssessmentResult {
            id: Uuid::new_v4().to_string(),
            total_score,
            max_total_score,
            percentage,
            maturity_level,
            category_scores,
            penalty_from_dont_know,
            completed_at: Utc::now(),
            strengths: analysis.strengths,
            weaknesses: analysis.weaknesses,
            critical_actions: analysis.critical_actions,
            critical_categories: analysis.critical_categories,
            recommendations: Vec::new(),
        }
    }

    /// One score per catalog category, in catalog order.
    ///
    /// Answers to questions not in the catalog are ignored.
    pub fn calculate_category_scores(&self, answers: &[Answer]) -> Vec<CategoryScore> {
        let categories = self.catalog.categories();
        let mut tallies = vec![Tally::default(); categories.len()];

        for answer in answers {
            let Some(question) = self.catalog.question(&answer.question_id) else {
                tracing::debug!("Ignoring answer to unknown question '{}'", answer.question_id);
                continue;
            };
            let Some(ci) = self.catalog.category_position(&question.category_id) else {
                continue;
            };

            let tally = &mut tallies[ci];
            tally.score += self.config.answer_values.value(answer.value) * question.weight;
            tally.answered += 1;
            if answer.value == AnswerValue::Unknown {
                tally.unknown += 1;
            }
        }

        categories
            .iter()
            .zip(tallies)
            .map(|(category, tally)| {
                let max_score = self.catalog.max_score(&category.id);
                let percentage = if max_score > 0.0 {
                    (tally.score / max_score * 100.0).clamp(0.0, 100.0)
                } else {
                    0.0
                };

                CategoryScore {
                    category_id: category.id.clone(),
                    score: tally.score,
                    max_score,
                    percentage: round1(percentage),
                    answered_questions: tally.answered,
                    total_questions: self.catalog.questions_in(&category.id).count(),
                    unknown_count: tally.unknown,
                }
            })
            .collect()
    }

    fn calculate_total_score(&self, category_scores: &[CategoryScore]) -> f64 {
        category_scores
            .iter()
            .map(|s| s.score * self.category_weight(&s.category_id))
            .sum()
    }

    fn calculate_max_total_score(&self, category_scores: &[CategoryScore]) -> f64 {
        category_scores
            .iter()
            .map(|s| s.max_score * self.category_weight(&s.category_id))
            .sum()
    }

    fn category_weight(&self, category_id: &str) -> f64 {
        self.catalog.category(category_id).map_or(1.0, |c| c.weight)
    }

    /// Overall percentage, floored at zero. A catalog without any
    /// questions has nothing to score against and yields 0.
    fn overall_percentage(&self, total_score: f64, max_total_score: f64) -> f64 {
        if max_total_score <= 0.0 {
            tracing::warn!("Catalog has no weighted questions; overall percentage set to 0");
            return 0.0;
        }
        round1((total_score / max_total_score * 100.0).clamp(0.0, 100.0))
    }

    /// Magnitude of all unknown-answer deductions
    fn calculate_unknown_penalty(&self, answers: &[Answer]) -> f64 {
        let unknown = answers
            .iter()
            .filter(|a| a.value == AnswerValue::Unknown)
            .filter(|a| self.catalog.question(&a.question_id).is_some())
            .count();
        unknown as f64 * self.config.answer_values.unknown.abs()
    }

    /// Map a percentage onto the configured maturity bands
    pub fn determine_maturity_level(&self, percentage: f64) -> MaturityLevel {
        self.config
            .maturity_bands
            .iter()
            .find(|band| band.contains(percentage))
            .map(|band| band.level)
            .unwrap_or(if percentage >= self.config.expert_floor {
                MaturityLevel::Expert
            } else {
                MaturityLevel::Basic
            })
    }

    /// Derive strengths, weaknesses and critical actions
    pub fn analyze_performance(&self, category_scores: &[CategoryScore]) -> PerformanceAnalysis {
        let thresholds = &self.config.analysis;
        let language = self.config.language;

        let mut sorted: Vec<&CategoryScore> = category_scores.iter().collect();
        sorted.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let mut analysis = PerformanceAnalysis::default();

        for score in sorted.iter().take(thresholds.window) {
            if score.percentage >= thresholds.strength_min {
                if let Some(name) = self.category_name(&score.category_id) {
                    analysis.strengths.push(name.to_string());
                }
            }
        }

        let bottom = sorted.len().saturating_sub(thresholds.window);
        for score in &sorted[bottom..] {
            if score.percentage < thresholds.weakness_max {
                if let Some(name) = self.category_name(&score.category_id) {
                    analysis.weaknesses.push(name.to_string());
                }
            }
        }

        // Both conditions may fire for the same category
        for score in category_scores {
            let Some(name) = self.category_name(&score.category_id) else {
                continue;
            };
            let low_score = score.percentage < thresholds.critical_max;
            let awareness_gap =
                score.unknown_count as f64 > score.total_questions as f64 * thresholds.unknown_ratio;

            if low_score {
                analysis.critical_actions.push(critical_message(name, language));
            }
            if awareness_gap {
                analysis.critical_actions.push(awareness_message(name, language));
            }
            if low_score || awareness_gap {
                analysis.critical_categories.push(score.category_id.clone());
            }
        }

        analysis
    }

    fn category_name(&self, category_id: &str) -> Option<&str> {
        self.catalog
            .category(category_id)
            .map(|c| c.name.get(self.config.language))
    }

    /// Place a total score against caller-supplied peer figures
    pub fn calculate_percentile(&self, total_score: f64, benchmark: &BenchmarkData) -> u8 {
        let average = benchmark.average_score;
        if total_score >= benchmark.top_performer_score {
            95
        } else if total_score >= average * 1.2 {
            80
        } else if total_score >= average {
            50
        } else if total_score >= average * 0.8 {
            30
        } else {
            15
        }
    }

    /// Rank categories by how urgently they need work, most urgent first
    pub fn prioritize_improvement_areas(&self, category_scores: &[CategoryScore]) -> Vec<ImprovementArea> {
        let language = self.config.language;

        let mut areas: Vec<ImprovementArea> = category_scores
            .iter()
            .map(|score| {
                let (mut priority, mut reason) = if score.percentage < 30.0 {
                    (Level::High, improvement_reason(Level::High, language))
                } else if score.percentage < 60.0 {
                    (Level::Medium, improvement_reason(Level::Medium, language))
                } else {
                    (Level::Low, improvement_reason(Level::Low, language))
                };

                if score.unknown_count as f64 > score.total_questions as f64 * 0.4 {
                    priority = if priority == Level::Low {
                        Level::Medium
                    } else {
                        Level::High
                    };
                    reason.push_str(match language {
                        Language::Tr => " - Farkındalık eksikliği var",
                        Language::En => " - awareness gap",
                    });
                }

                ImprovementArea {
                    category_id: score.category_id.clone(),
                    priority,
                    reason,
                }
            })
            .collect();

        areas.sort_by(|a, b| b.priority.order().cmp(&a.priority.order()));
        areas
    }
}

fn critical_message(name: &str, language: Language) -> String {
    match language {
        Language::Tr => format!("{} alanında kritik gelişim gerekiyor", name),
        Language::En => format!("{}: critical improvement needed", name),
    }
}

fn awareness_message(name: &str, language: Language) -> String {
    match language {
        Language::Tr => format!("{} alanında farkındalık eksikliği - acil eğitim gerekiyor", name),
        Language::En => format!("{}: awareness gap requiring training", name),
    }
}

fn improvement_reason(priority: Level, language: Language) -> String {
    let text = match (priority, language) {
        (Level::High, Language::Tr) => "Kritik gelişim gerekiyor",
        (Level::Medium, Language::Tr) => "Önemli gelişim alanı",
        (Level::Low, Language::Tr) => "İyileştirme potansiyeli var",
        (Level::High, Language::En) => "Critical improvement needed",
        (Level::Medium, Language::En) => "Significant development area",
        (Level::Low, Language::En) => "Room for improvement",
    };
    text.to_string()
}
