//! Static-table calorie lookup adapter.
//!
//! Per-serving kilocalorie estimates for the labels the classifier emits.
//! Misses are fine: enrichment is optional decoration.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ports::{CalorieLookup, CalorieLookupError};

/// Built-in label→kcal estimates.
const DEFAULT_TABLE: [(&str, u32); 12] = [
    ("apple_pie", 320),
    ("caesar_salad", 190),
    ("cheesecake", 400),
    ("dumplings", 220),
    ("fried_rice", 335),
    ("hamburger", 254),
    ("ice_cream", 207),
    ("pizza", 285),
    ("ramen", 436),
    ("steak", 271),
    ("sushi", 200),
    ("tacos", 226),
];

/// Lookup over a fixed label table; matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct TableCalorieLookup {
    table: HashMap<String, u32>,
}

impl TableCalorieLookup {
    /// Lookup over custom entries.
    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, u32)>,
        T: Into<String>,
    {
        Self {
            table: entries
                .into_iter()
                .map(|(label, kcal)| (label.into().to_lowercase(), kcal))
                .collect(),
        }
    }
}

impl Default for TableCalorieLookup {
    fn default() -> Self {
        Self::from_entries(DEFAULT_TABLE)
    }
}

#[async_trait]
impl CalorieLookup for TableCalorieLookup {
    async fn lookup(&self, label: &str) -> Result<Option<u32>, CalorieLookupError> {
        Ok(self.table.get(&label.to_lowercase()).copied())
    }
}
