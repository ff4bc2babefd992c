//! Question bank and random question selection
//!
//! The bank is built once at startup and never mutated. Questions keep their
//! definition order inside each (category, level) partition, and partitions
//! may be sparse or empty.

use crate::error::BankError;
use crate::types::{Category, Level, Question, QuestionId, DIFFICULTY_LEVELS};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

/// Catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../data/questions.json");

/// On-disk catalog layout: questions grouped by level, per category
#[derive(Debug, Deserialize)]
struct CatalogFile {
    truths: Vec<LevelGroup>,
    dares: Vec<LevelGroup>,
}

#[derive(Debug, Deserialize)]
struct LevelGroup {
    level: Level,
    questions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    truths: Vec<Question>,
    dares: Vec<Question>,
}

impl QuestionBank {
    /// Load the embedded catalog
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a catalog. Ids are assigned per category, in
    /// definition order, starting at 1.
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let catalog: CatalogFile = serde_json::from_str(json)?;
        Ok(Self {
            truths: build_partition(Category::Truth, catalog.truths)?,
            dares: build_partition(Category::Dare, catalog.dares)?,
        })
    }

    /// Build a bank from already-constructed questions (kept in the given order)
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let (truths, dares): (Vec<Question>, Vec<Question>) = questions
            .into_iter()
            .partition(|q| q.category == Category::Truth);
        Self { truths, dares }
    }

    fn category(&self, category: Category) -> &[Question] {
        match category {
            Category::Truth => &self.truths,
            Category::Dare => &self.dares,
        }
    }

    /// All questions for a category and level, in definition order.
    /// Unknown levels simply yield nothing.
    pub fn questions_for(&self, category: Category, level: Level) -> Vec<&Question> {
        self.category(category)
            .iter()
            .filter(|q| q.level == level)
            .collect()
    }

    /// Number of questions for a category and level
    pub fn count(&self, category: Category, level: Level) -> usize {
        self.category(category)
            .iter()
            .filter(|q| q.level == level)
            .count()
    }

    pub fn len(&self) -> usize {
        self.truths.len() + self.dares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick one question uniformly at random, or `None` if the partition is empty.
    /// No memory of earlier picks; repeats are expected.
    pub fn select_random<R: Rng + ?Sized>(
        &self,
        category: Category,
        level: Level,
        rng: &mut R,
    ) -> Option<&Question> {
        let questions = self.questions_for(category, level);
        if questions.is_empty() {
            tracing::debug!("No {} questions for level {}", category, level);
            return None;
        }

        let index = rng.random_range(0..questions.len());
        Some(questions[index])
    }
}

fn build_partition(
    category: Category,
    groups: Vec<LevelGroup>,
) -> Result<Vec<Question>, BankError> {
    let mut questions = Vec::new();
    let mut next_id: QuestionId = 1;

    for group in groups {
        if !DIFFICULTY_LEVELS.iter().any(|l| l.level == group.level) {
            return Err(BankError::InvalidLevel {
                category,
                level: group.level,
            });
        }

        for text in group.questions {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(BankError::EmptyText {
                    category,
                    level: group.level,
                });
            }

            questions.push(Question {
                id: next_id,
                text,
                level: group.level,
                category,
            });
            next_id += 1;
        }
    }

    Ok(questions)
}
