//! Plan/Channel Filter
//!
//! Chooses which catalog questions a subscription plan asks. Untagged
//! questions are general and always included; tagged questions need at
//! least one tag in the plan's channel set. The free trial takes the first
//! flagged questions instead.

use crate::catalog::Catalog;
use crate::types::Question;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of questions in the free trial
pub const FREE_TRIAL_QUESTIONS: usize = 10;

/// Subscription tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    FreeTrial,
    /// Domestic e-commerce channels
    Ecommerce,
    /// International e-export channels
    Eexport,
    /// Everything
    Combined,
}

impl Plan {
    pub fn name(&self) -> &'static str {
        match self {
            Plan::FreeTrial => "free_trial",
            Plan::Ecommerce => "ecommerce",
            Plan::Eexport => "eexport",
            Plan::Combined => "combined",
        }
    }

    /// Channel tags this plan covers. `None` means every question applies.
    pub fn allowed_channels(&self) -> Option<&'static [&'static str]> {
        match self {
            Plan::Ecommerce => Some(&[
                "ecommerce",
                "domestic_website",
                "domestic_marketplace",
                "general",
            ]),
            Plan::Eexport => Some(&[
                "eexport",
                "international_website",
                "global_marketplace",
                "general",
            ]),
            Plan::FreeTrial | Plan::Combined => None,
        }
    }

    /// Advertised question count for the plan
    pub fn expected_question_count(&self) -> usize {
        match self {
            Plan::FreeTrial => FREE_TRIAL_QUESTIONS,
            Plan::Ecommerce => 50,
            Plan::Eexport => 60,
            Plan::Combined => 110,
        }
    }

    /// Estimated completion time in minutes, as (low, high)
    pub fn estimated_minutes(&self) -> (u32, u32) {
        match self {
            Plan::FreeTrial => (5, 7),
            Plan::Ecommerce => (20, 25),
            Plan::Eexport => (30, 35),
            Plan::Combined => (45, 50),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_trial" | "free-trial" => Ok(Plan::FreeTrial),
            "ecommerce" => Ok(Plan::Ecommerce),
            "eexport" => Ok(Plan::Eexport),
            "combined" => Ok(Plan::Combined),
            other => Err(format!(
                "unknown plan '{}' (expected free_trial, ecommerce, eexport or combined)",
                other
            )),
        }
    }
}

/// Whether a question is asked under the given channel set
fn applies_to(question: &Question, allowed: &[&str]) -> bool {
    match &question.channels {
        None => true,
        Some(channels) if channels.is_empty() => true,
        Some(channels) => channels.iter().any(|c| allowed.contains(&c.as_str())),
    }
}

/// Questions for a plan, in catalog order
pub fn filter_questions(plan: Plan, catalog: &Catalog) -> Vec<&Question> {
    let questions = catalog.questions();
    match plan {
        Plan::FreeTrial => questions
            .iter()
            .filter(|q| q.is_free_trial_question)
            .take(FREE_TRIAL_QUESTIONS)
            .collect(),
        _ => match plan.allowed_channels() {
            Some(allowed) => questions.iter().filter(|q| applies_to(q, allowed)).collect(),
            None => questions.iter().collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{category, question};

    fn tagged(id: &str, channels: &[&str]) -> Question {
        let mut q = question(id, "c", 1.0);
        q.channels = Some(channels.iter().map(|c| c.to_string()).collect());
        q
    }

    #[test]
    fn test_untagged_questions_are_general() {
        let catalog = Catalog::new(
            vec![category("c", 1.0)],
            vec![
                question("g1", "c", 1.0),
                tagged("e1", &["domestic_website"]),
                tagged("x1", &["global_marketplace"]),
                tagged("empty", &[]),
            ],
        )
        .unwrap();

        let ids = |plan| {
            filter_questions(plan, &catalog)
                .into_iter()
                .map(|q| q.id.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(Plan::Ecommerce), vec!["g1", "e1", "empty"]);
        assert_eq!(ids(Plan::Eexport), vec!["g1", "x1", "empty"]);
        assert_eq!(ids(Plan::Combined), vec!["g1", "e1", "x1", "empty"]);
    }

    #[test]
    fn test_free_trial_takes_first_ten_flagged() {
        let catalog = Catalog::bundled().unwrap();
        let trial = filter_questions(Plan::FreeTrial, &catalog);

        assert_eq!(trial.len(), FREE_TRIAL_QUESTIONS);
        assert!(trial.iter().all(|q| q.is_free_trial_question));
        assert_eq!(trial[0].id, "s1");

        // The bundled catalog flags eleven; the last one is cut.
        let flagged = catalog.questions().iter().filter(|q| q.is_free_trial_question).count();
        assert!(flagged > FREE_TRIAL_QUESTIONS);
        let last_flagged = catalog
            .questions()
            .iter()
            .filter(|q| q.is_free_trial_question)
            .last()
            .unwrap();
        assert!(!trial.iter().any(|q| q.id == last_flagged.id));
    }

    #[test]
    fn test_bundled_export_only_question_excluded_from_ecommerce() {
        let catalog = Catalog::bundled().unwrap();
        let ecommerce = filter_questions(Plan::Ecommerce, &catalog);
        let eexport = filter_questions(Plan::Eexport, &catalog);

        assert!(!ecommerce.iter().any(|q| q.id == "s4"));
        assert!(eexport.iter().any(|q| q.id == "s4"));
        assert_eq!(eexport.len(), catalog.questions().len());
    }

    #[test]
    fn test_filter_is_deterministic() {
        let catalog = Catalog::bundled().unwrap();
        let a: Vec<&str> = filter_questions(Plan::Ecommerce, &catalog)
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();
        let b: Vec<&str> = filter_questions(Plan::Ecommerce, &catalog)
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_parse_and_metadata() {
        assert_eq!("free_trial".parse::<Plan>().unwrap(), Plan::FreeTrial);
        assert!("premium".parse::<Plan>().is_err());
        assert_eq!(Plan::Combined.expected_question_count(), 110);
        assert_eq!(Plan::Eexport.estimated_minutes(), (30, 35));
    }
}
