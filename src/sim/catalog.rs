//! Content catalog: hazard/benefit definitions and outcome quote pools
//!
//! Pure data. Entities only remember their category and label; the numeric
//! impact is looked up here at collision time so the same label can carry a
//! different magnitude under a different content table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::state::{Category, GameStatus};
use crate::error::CatalogError;

/// A single labeled item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    /// Presentation tag (a color in the stock tables)
    pub tag: String,
    /// Health impact on collision
    pub impact: i32,
}

impl CatalogEntry {
    pub fn new(label: impl Into<String>, tag: impl Into<String>, impact: i32) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
            impact,
        }
    }
}

/// Messages picked when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePools {
    /// Encouragement shown after a lost run (its first entry doubles as the idle message)
    pub game_over: Vec<String>,
    /// Shown after reaching the goal
    pub success: Vec<String>,
}

impl Default for QuotePools {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            game_over: owned(&[
                "Keep going! The finish line is close.",
                "Knowledge is the greatest wealth.",
                "There is freedom in honesty.",
                "Hard work is never wasted.",
                "Don't give up, you are not alone.",
                "Success needs perseverance.",
                "Life is a race, win it with good character.",
            ]),
            success: owned(&[
                "Congratulations! You made it.",
                "Your hard work paid off!",
                "You won the race of life.",
            ]),
        }
    }
}

impl QuotePools {
    /// Pool for a terminal status (empty for non-terminal statuses)
    pub fn pool_for(&self, status: GameStatus) -> &[String] {
        match status {
            GameStatus::GameOver => &self.game_over,
            GameStatus::Success => &self.success,
            GameStatus::Start | GameStatus::Playing => &[],
        }
    }

    /// Message held by a fresh run before anything is selected
    pub fn idle_message(&self) -> String {
        self.game_over.first().cloned().unwrap_or_default()
    }
}

/// Immutable content for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub hazards: Vec<CatalogEntry>,
    pub benefits: Vec<CatalogEntry>,
    #[serde(default)]
    pub quotes: QuotePools,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            hazards: vec![
                CatalogEntry::new("Laziness", "#ef4444", -15),
                CatalogEntry::new("Lying", "#f87171", -20),
                CatalogEntry::new("Anger", "#dc2626", -10),
                CatalogEntry::new("Greed", "#b91c1c", -25),
                CatalogEntry::new("Pride", "#991b1b", -30),
            ],
            benefits: vec![
                CatalogEntry::new("Hard Work", "#22c55e", 10),
                CatalogEntry::new("Honesty", "#4ade80", 15),
                CatalogEntry::new("Knowledge", "#10b981", 20),
                CatalogEntry::new("Patience", "#34d399", 12),
                CatalogEntry::new("Courage", "#059669", 18),
            ],
            quotes: QuotePools::default(),
        }
    }
}

impl Catalog {
    /// Parse and validate a catalog from JSON
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Labels must be non-empty and unique within a category
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (category, entries) in [("hazard", &self.hazards), ("benefit", &self.benefits)] {
            let mut seen = HashSet::new();
            for entry in entries {
                if entry.label.is_empty() {
                    return Err(CatalogError::EmptyLabel);
                }
                if !seen.insert(entry.label.as_str()) {
                    return Err(CatalogError::DuplicateLabel {
                        category,
                        label: entry.label.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Entries for a category
    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        match category {
            Category::Hazard => &self.hazards,
            Category::Benefit => &self.benefits,
        }
    }

    /// Impact for a label, `None` if the label is not in the table
    pub fn impact(&self, category: Category, label: &str) -> Option<i32> {
        self.entries(category)
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.impact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let catalog = Catalog::default();
        assert_eq!(catalog.hazards.len(), 5);
        assert_eq!(catalog.benefits.len(), 5);
        assert!(catalog.hazards.iter().all(|e| e.impact < 0));
        assert!(catalog.benefits.iter().all(|e| e.impact > 0));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_impact_lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.impact(Category::Hazard, "Pride"), Some(-30));
        assert_eq!(catalog.impact(Category::Benefit, "Knowledge"), Some(20));
        // Labels are scoped to their category
        assert_eq!(catalog.impact(Category::Benefit, "Pride"), None);
        assert_eq!(catalog.impact(Category::Hazard, "Unknown"), None);
    }

    #[test]
    fn test_from_json_without_quotes_uses_default_pools() {
        let json = r##"{
            "hazards": [{"label": "Fog", "tag": "#888888", "impact": -40}],
            "benefits": []
        }"##;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.impact(Category::Hazard, "Fog"), Some(-40));
        assert!(catalog.benefits.is_empty());
        assert_eq!(catalog.quotes, QuotePools::default());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut catalog = Catalog::default();
        catalog.hazards.push(CatalogEntry::new("Greed", "#000000", -1));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateLabel { category: "hazard", .. })
        ));
    }

    #[test]
    fn test_empty_label_rejected() {
        let json = r#"{"hazards": [{"label": "", "tag": "", "impact": -1}], "benefits": []}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::EmptyLabel)
        ));
    }

    #[test]
    fn test_quote_pools() {
        let pools = QuotePools::default();
        assert_eq!(pools.pool_for(GameStatus::Success).len(), 3);
        assert_eq!(pools.pool_for(GameStatus::GameOver).len(), 7);
        assert!(pools.pool_for(GameStatus::Playing).is_empty());
        assert_eq!(pools.idle_message(), pools.game_over[0]);
    }
}
