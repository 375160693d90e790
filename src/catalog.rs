//! Question catalog
//!
//! Loaded once, validated, and read-only afterwards. Lookups by id go
//! through maps built at construction so scoring never scans the lists.

use crate::error::CatalogError;
use crate::types::{Category, Question};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Raw catalog document as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

/// Validated, indexed catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    questions: Vec<Question>,
    category_index: HashMap<String, usize>,
    question_index: HashMap<String, usize>,
    /// Question indices per category, in catalog order
    category_questions: Vec<Vec<usize>>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, dangling category
    /// references and non-positive weights.
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Result<Self, CatalogError> {
        let mut category_index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            if !(category.weight > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    kind: "category",
                    id: category.id.clone(),
                    weight: category.weight,
                });
            }
            if category_index.insert(category.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut question_index = HashMap::with_capacity(questions.len());
        let mut category_questions = vec![Vec::new(); categories.len()];
        for (i, question) in questions.iter().enumerate() {
            if !(question.weight > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    kind: "question",
                    id: question.id.clone(),
                    weight: question.weight,
                });
            }
            if question_index.insert(question.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            let Some(&ci) = category_index.get(&question.category_id) else {
                return Err(CatalogError::UnknownCategory {
                    question: question.id.clone(),
                    category: question.category_id.clone(),
                });
            };
            category_questions[ci].push(i);
        }

        Ok(Self {
            categories,
            questions,
            category_index,
            question_index,
            category_questions,
        })
    }

    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        Self::new(data.categories, data.questions)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData =
            serde_json::from_str(json).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Self::from_data(data)
    }

    /// The e-commerce maturity questionnaire shipped with the crate
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_index.get(id).map(|&i| &self.categories[i])
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.question_index.get(id).map(|&i| &self.questions[i])
    }

    /// Position of a category in catalog order
    pub fn category_position(&self, id: &str) -> Option<usize> {
        self.category_index.get(id).copied()
    }

    /// Questions of a category, in catalog order
    pub fn questions_in(&self, category_id: &str) -> impl Iterator<Item = &Question> + '_ {
        self.category_index
            .get(category_id)
            .map(|&ci| self.category_questions[ci].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&qi| &self.questions[qi])
    }

    /// Sum of question weights in a category, answered or not
    pub fn max_score(&self, category_id: &str) -> f64 {
        self.questions_in(category_id).map(|q| q.weight).sum()
    }

    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            categories: self.categories.clone(),
            questions: self.questions.clone(),
        }
    }
}
