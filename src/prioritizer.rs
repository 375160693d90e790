//! Action Prioritizer
//!
//! Ranks recommendations against the company's constraints. Each
//! recommendation gets three independent 0-100 scores, each starting at 50:
//!
//! - urgency: priority, and whether its category is flagged critical
//! - feasibility: effort, cost vs budget, timeframe vs available months
//! - impact: stated impact, ROI, and whether its category is weak
//!
//! The overall priority weights impact highest.

use crate::types::*;
use std::collections::HashSet;

const BASE_SCORE: f64 = 50.0;

const URGENCY_WEIGHT: f64 = 0.3;
const FEASIBILITY_WEIGHT: f64 = 0.2;
const IMPACT_WEIGHT: f64 = 0.5;

/// Categories under this percentage count as weak for impact scoring
const WEAK_AREA_MAX: f64 = 50.0;

/// Rough cost estimate from ROI when nothing better is known
const ROI_TO_COST_DIVISOR: f64 = 3.0;

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Zero or negative amounts mean "not given"
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Score and rank recommendations, highest overall priority first.
/// Equal priorities keep their input order.
pub fn prioritize_actions(
    recommendations: &[Recommendation],
    constraints: &ActionConstraints,
    result: &AssessmentResult,
) -> Vec<PrioritizedAction> {
    let critical = CriticalAreas::from_result(result);
    let weak_categories: HashSet<&str> = result
        .category_scores
        .iter()
        .filter(|s| s.percentage < WEAK_AREA_MAX)
        .map(|s| s.category_id.as_str())
        .collect();

    let mut actions: Vec<PrioritizedAction> = recommendations
        .iter()
        .map(|rec| {
            let urgency_score = urgency_score(rec, &critical);
            let feasibility_score = feasibility_score(rec, constraints);
            let impact_score = impact_score(rec, &weak_categories);

            PrioritizedAction {
                recommendation: rec.clone(),
                urgency_score,
                feasibility_score,
                impact_score,
                overall_priority: urgency_score * URGENCY_WEIGHT
                    + feasibility_score * FEASIBILITY_WEIGHT
                    + impact_score * IMPACT_WEIGHT,
                quick_win: rec.effort == Effort::Low && rec.impact == Level::High,
                prerequisites: prerequisites(rec),
                success_metrics: success_metrics(rec),
            }
        })
        .collect();

    actions.sort_by(|a, b| b.overall_priority.total_cmp(&a.overall_priority));
    actions
}

/// Categories flagged critical by the scorer.
///
/// Scored results carry category ids, so rankings do not depend on the
/// language the critical-action text was rendered in. Results with messages
/// but no ids fall back to searching the text for the category.
struct CriticalAreas {
    ids: HashSet<String>,
    actions: Vec<String>,
}

impl CriticalAreas {
    fn from_result(result: &AssessmentResult) -> Self {
        Self {
            ids: result
                .critical_categories
                .iter()
                .map(|id| id.to_lowercase())
                .collect(),
            actions: result
                .critical_actions
                .iter()
                .map(|a| a.to_lowercase())
                .collect(),
        }
    }

    fn contains(&self, category: &str) -> bool {
        let category = category.to_lowercase();
        if self.ids.is_empty() {
            self.actions.iter().any(|action| action.contains(&category))
        } else {
            self.ids.contains(&category)
        }
    }
}

fn urgency_score(rec: &Recommendation, critical: &CriticalAreas) -> f64 {
    let mut score = BASE_SCORE;

    score += match rec.priority {
        Level::High => 30.0,
        Level::Medium => 15.0,
        Level::Low => 0.0,
    };

    if critical.contains(&rec.category) {
        score += 20.0;
    }

    clamp_score(score)
}

fn feasibility_score(rec: &Recommendation, constraints: &ActionConstraints) -> f64 {
    let mut score = BASE_SCORE;

    score += match rec.effort {
        Effort::Low => 30.0,
        Effort::Medium => 15.0,
        Effort::High => -10.0,
    };

    if let (Some(budget), Some(roi)) = (positive(constraints.budget), positive(rec.estimated_roi)) {
        let estimated_cost = roi / ROI_TO_COST_DIVISOR;
        score += if estimated_cost <= budget { 20.0 } else { -20.0 };
    }

    if let Some(months) = constraints.timeframe.filter(|m| *m > 0) {
        score += if rec.timeframe.rank() >= constraint_rank(months) {
            15.0
        } else {
            -10.0
        };
    }

    clamp_score(score)
}

/// Available months mapped onto the timeframe ranks; less time demands sooner results
fn constraint_rank(months: u32) -> u8 {
    match months {
        m if m >= 12 => 1,
        m if m >= 6 => 2,
        m if m >= 3 => 3,
        _ => 4,
    }
}

fn impact_score(rec: &Recommendation, weak_categories: &HashSet<&str>) -> f64 {
    let mut score = BASE_SCORE;

    score += match rec.impact {
        Level::High => 30.0,
        Level::Medium => 15.0,
        Level::Low => 0.0,
    };

    match rec.estimated_roi {
        Some(roi) if roi > 200.0 => score += 20.0,
        Some(roi) if roi > 100.0 => score += 10.0,
        _ => {}
    }

    if weak_categories.contains(rec.category.as_str()) {
        score += 15.0;
    }

    clamp_score(score)
}

fn prerequisites(rec: &Recommendation) -> Vec<String> {
    let mut prerequisites: Vec<&str> = Vec::new();

    match rec.category.as_str() {
        "technology" | "analytics" if rec.id.contains("analytics") => {
            prerequisites.extend(["Website admin access", "Google account"]);
        }
        "marketing" if rec.id.contains("seo") => {
            prerequisites.extend(["Website content access", "Keyword research tools"]);
        }
        _ => {}
    }

    match rec.effort {
        Effort::High => prerequisites.extend(["Dedicated team member", "Management approval"]),
        Effort::Medium => prerequisites.push("Technical knowledge or external support"),
        Effort::Low => {}
    }

    prerequisites.into_iter().map(String::from).collect()
}

fn success_metrics(rec: &Recommendation) -> Vec<String> {
    let base: [&str; 3] = match rec.category.as_str() {
        "marketing" => [
            "Organic traffic increase",
            "Conversion rate improvement",
            "Lead generation",
        ],
        "technology" => [
            "Page load speed improvement",
            "Mobile usability score",
            "Site uptime",
        ],
        "customer" => [
            "Customer satisfaction score",
            "Return rate decrease",
            "Average session duration",
        ],
        _ => [
            "ROI achievement",
            "Process efficiency improvement",
            "User engagement increase",
        ],
    };

    let mut metrics: Vec<String> = base.iter().map(|m| m.to_string()).collect();
    if let Some(roi) = positive(rec.estimated_roi) {
        metrics.push(format!("Target ROI: {}%", roi));
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn recommendation(id: &str, category: &str) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: LocalizedText::new(id, id),
            description: LocalizedText::default(),
            category: category.to_string(),
            priority: Level::Low,
            impact: Level::Low,
            effort: Effort::Medium,
            timeframe: Timeframe::Medium,
            estimated_roi: None,
        }
    }

    fn category_score(id: &str, percentage: f64) -> CategoryScore {
        CategoryScore {
            category_id: id.to_string(),
            score: 0.0,
            max_score: 10.0,
            percentage,
            answered_questions: 0,
            total_questions: 0,
            unknown_count: 0,
        }
    }

    fn result(category_scores: Vec<CategoryScore>, critical_actions: Vec<&str>) -> AssessmentResult {
        AssessmentResult {
            id: "test".to_string(),
            total_score: 0.0,
            max_total_score: 0.0,
            percentage: 0.0,
            maturity_level: MaturityLevel::Basic,
            category_scores,
            penalty_from_dont_know: 0.0,
            completed_at: Utc::now(),
            strengths: vec![],
            weaknesses: vec![],
            critical_actions: critical_actions.into_iter().map(String::from).collect(),
            critical_categories: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_clamped_quick_win() {
        let rec = Recommendation {
            priority: Level::High,
            impact: Level::High,
            effort: Effort::Low,
            timeframe: Timeframe::Short,
            estimated_roi: Some(300.0),
            ..recommendation("strategy-doc", "strategy")
        };
        let constraints = ActionConstraints {
            budget: Some(200.0),
            timeframe: Some(6),
            resources: vec![],
        };
        let result = result(
            vec![category_score("strategy", 35.0)],
            vec!["Strategy and Planning: critical improvement needed"],
        );

        let actions = prioritize_actions(&[rec], &constraints, &result);
        let action = &actions[0];

        assert_eq!(action.urgency_score, 100.0);
        assert_eq!(action.feasibility_score, 100.0);
        assert_eq!(action.impact_score, 100.0);
        assert!((action.overall_priority - 100.0).abs() < 1e-9);
        assert!(action.quick_win);
    }

    #[test]
    fn test_base_scores_without_bonuses() {
        let rec = recommendation("plain", "finance");
        let actions = prioritize_actions(&[rec], &ActionConstraints::default(), &result(vec![], vec![]));
        let action = &actions[0];

        assert_eq!(action.urgency_score, 50.0);
        assert_eq!(action.feasibility_score, 65.0);
        assert_eq!(action.impact_score, 50.0);
        assert!((action.overall_priority - 53.0).abs() < 1e-9);
        assert!(!action.quick_win);
    }

    #[test]
    fn test_quick_win_uses_own_fields() {
        let mut actions = Vec::new();
        for (effort, impact) in [
            (Effort::Low, Level::High),
            (Effort::Low, Level::Medium),
            (Effort::Medium, Level::High),
            (Effort::High, Level::Low),
        ] {
            let rec = Recommendation {
                effort,
                impact,
                ..recommendation("r", "x")
            };
            actions.extend(prioritize_actions(&[rec], &ActionConstraints::default(), &result(vec![], vec![])));
        }

        let wins: Vec<bool> = actions.iter().map(|a| a.quick_win).collect();
        assert_eq!(wins, vec![true, false, false, false]);
    }

    #[test]
    fn test_feasibility_budget_and_timeframe() {
        let rec = Recommendation {
            effort: Effort::High,
            timeframe: Timeframe::Long,
            estimated_roi: Some(600.0),
            ..recommendation("big", "operations")
        };

        // 50 - 10 (high effort) - 20 (cost 200 > 100) - 10 (long vs 2 months)
        let tight = ActionConstraints {
            budget: Some(100.0),
            timeframe: Some(2),
            resources: vec![],
        };
        let actions = prioritize_actions(&[rec.clone()], &tight, &result(vec![], vec![]));
        assert_eq!(actions[0].feasibility_score, 10.0);

        // 50 - 10 + 20 (cost 200 <= 500) + 15 (long vs 12 months)
        let roomy = ActionConstraints {
            budget: Some(500.0),
            timeframe: Some(12),
            resources: vec![],
        };
        let actions = prioritize_actions(&[rec], &roomy, &result(vec![], vec![]));
        assert_eq!(actions[0].feasibility_score, 75.0);
    }

    #[test]
    fn test_zero_amounts_count_as_missing() {
        let rec = Recommendation {
            effort: Effort::Low,
            estimated_roi: Some(0.0),
            ..recommendation("free", "finance")
        };
        let zeroed = ActionConstraints {
            budget: Some(0.0),
            timeframe: Some(0),
            resources: vec![],
        };

        let zero = prioritize_actions(&[rec.clone()], &zeroed, &result(vec![], vec![]));
        let none = prioritize_actions(&[rec], &ActionConstraints::default(), &result(vec![], vec![]));

        assert_eq!(zero[0].feasibility_score, 80.0);
        assert_eq!(zero[0].feasibility_score, none[0].feasibility_score);
        assert!(zero[0].success_metrics.iter().all(|m| !m.starts_with("Target ROI")));

        // A real ROI against a zero budget is still unconstrained
        let priced = Recommendation {
            estimated_roi: Some(300.0),
            ..recommendation("priced", "finance")
        };
        let actions = prioritize_actions(&[priced], &zeroed, &result(vec![], vec![]));
        assert_eq!(actions[0].feasibility_score, 65.0);
    }

    #[test]
    fn test_critical_category_id_match_ignores_text_language() {
        let rec = Recommendation {
            priority: Level::High,
            ..recommendation("strategy-strategy-doc", "strategy")
        };
        let mut turkish = result(vec![], vec!["Strateji ve Planlama alanında kritik gelişim gerekiyor"]);

        let actions = prioritize_actions(&[rec.clone()], &ActionConstraints::default(), &turkish);
        assert_eq!(actions[0].urgency_score, 80.0);

        turkish.critical_categories = vec!["strategy".to_string()];
        let actions = prioritize_actions(&[rec.clone()], &ActionConstraints::default(), &turkish);
        assert_eq!(actions[0].urgency_score, 100.0);

        // Once ids are present the message text no longer decides
        let mut english = result(vec![], vec!["Strategy and Planning: critical improvement needed"]);
        english.critical_categories = vec!["technology".to_string()];
        let actions = prioritize_actions(&[rec], &ActionConstraints::default(), &english);
        assert_eq!(actions[0].urgency_score, 80.0);
    }

    #[test]
    fn test_constraint_rank() {
        assert_eq!(constraint_rank(0), 4);
        assert_eq!(constraint_rank(2), 4);
        assert_eq!(constraint_rank(3), 3);
        assert_eq!(constraint_rank(6), 2);
        assert_eq!(constraint_rank(11), 2);
        assert_eq!(constraint_rank(12), 1);
        assert_eq!(constraint_rank(24), 1);
    }

    #[test]
    fn test_roi_bonus_is_exclusive() {
        let with_roi = |roi| Recommendation {
            estimated_roi: Some(roi),
            ..recommendation("r", "x")
        };
        let empty = result(vec![], vec![]);
        let score = |roi| prioritize_actions(&[with_roi(roi)], &ActionConstraints::default(), &empty)[0].impact_score;

        assert_eq!(score(100.0), 50.0);
        assert_eq!(score(150.0), 60.0);
        assert_eq!(score(200.0), 60.0);
        assert_eq!(score(201.0), 70.0);
    }

    #[test]
    fn test_critical_match_is_case_insensitive_substring() {
        let rec = recommendation("r", "Marketing");
        let result = result(vec![], vec!["DIGITAL MARKETING: awareness gap requiring training"]);
        let actions = prioritize_actions(&[rec], &ActionConstraints::default(), &result);
        assert_eq!(actions[0].urgency_score, 70.0);
    }

    #[test]
    fn test_weak_category_requires_exact_id() {
        let rec = recommendation("r", "customer");
        let weak = result(vec![category_score("customer", 49.9)], vec![]);
        let fine = result(vec![category_score("customer", 50.0)], vec![]);

        let score = |r: &AssessmentResult| {
            prioritize_actions(&[rec.clone()], &ActionConstraints::default(), r)[0].impact_score
        };
        assert_eq!(score(&weak), 65.0);
        assert_eq!(score(&fine), 50.0);
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let high = Recommendation {
            impact: Level::High,
            ..recommendation("high", "x")
        };
        let first_tie = recommendation("tie-a", "x");
        let second_tie = recommendation("tie-b", "x");

        let actions = prioritize_actions(
            &[first_tie, high, second_tie],
            &ActionConstraints::default(),
            &result(vec![], vec![]),
        );
        let order: Vec<&str> = actions.iter().map(|a| a.recommendation.id.as_str()).collect();
        assert_eq!(order, vec!["high", "tie-a", "tie-b"]);
    }

    #[test]
    fn test_prerequisites_and_metrics() {
        let seo = Recommendation {
            effort: Effort::Low,
            estimated_roi: Some(200.0),
            ..recommendation("marketing-seo-basics", "marketing")
        };
        let big = Recommendation {
            effort: Effort::High,
            ..recommendation("general-overhaul", "general")
        };

        let actions = prioritize_actions(&[seo, big], &ActionConstraints::default(), &result(vec![], vec![]));
        let seo = actions.iter().find(|a| a.recommendation.id == "marketing-seo-basics").unwrap();
        let big = actions.iter().find(|a| a.recommendation.id == "general-overhaul").unwrap();

        assert_eq!(seo.prerequisites, vec!["Website content access", "Keyword research tools"]);
        assert_eq!(seo.success_metrics.len(), 4);
        assert_eq!(seo.success_metrics[0], "Organic traffic increase");
        assert_eq!(seo.success_metrics[3], "Target ROI: 200%");

        assert_eq!(big.prerequisites, vec!["Dedicated team member", "Management approval"]);
        assert_eq!(big.success_metrics, vec![
            "ROI achievement",
            "Process efficiency improvement",
            "User engagement increase",
        ]);
    }

    #[test]
    fn test_serialized_action_is_flat() {
        let actions = prioritize_actions(
            &[recommendation("r", "x")],
            &ActionConstraints::default(),
            &result(vec![], vec![]),
        );
        let json = serde_json::to_value(&actions[0]).unwrap();
        assert_eq!(json["id"], "r");
        assert_eq!(json["effort"], "medium");
        assert_eq!(json["quickWin"], false);
        assert!(json.get("recommendation").is_none());
    }
}
