//! Synthetic instance keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discovery category of a particle container.
///
/// Hero containers sort before section containers so that registry
/// iteration follows discovery order across both categories.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceCategory {
    Hero,
    Section,
}

impl InstanceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceCategory::Hero => "hero",
            InstanceCategory::Section => "section",
        }
    }
}

/// A registry key derived from category and discovery index (`hero-0`, `section-3`).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct InstanceKey {
    pub category: InstanceCategory,
    pub index: usize,
}

impl InstanceKey {
    pub const fn new(category: InstanceCategory, index: usize) -> Self {
        Self { category, index }
    }

    pub const fn hero(index: usize) -> Self {
        Self::new(InstanceCategory::Hero, index)
    }

    pub const fn section(index: usize) -> Self {
        Self::new(InstanceCategory::Section, index)
    }

    /// Parse a key from its display form
    pub fn parse(s: &str) -> Option<Self> {
        let (category, index) = s.rsplit_once('-')?;
        let category = match category {
            "hero" => InstanceCategory::Hero,
            "section" => InstanceCategory::Section,
            _ => return None,
        };
        let index = index.parse().ok()?;
        Some(Self::new(category, index))
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceKey({})", self)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category.as_str(), self.index)
    }
}
