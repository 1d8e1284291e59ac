// Reference scores per money type

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assessment::{MoneyProperty, Rating};

/// Reference ratings a learner's guesses are graded against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub money_type: String,
    pub scores: BTreeMap<MoneyProperty, Rating>,
}

impl ReferenceProfile {
    /// Create a profile from raw scores, rejecting any outside 1..=10
    pub fn new<I>(money_type: &str, scores: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (MoneyProperty, u8)>,
    {
        let mut map = BTreeMap::new();
        for (property, value) in scores {
            let rating = Rating::new(value)
                .map_err(|e| format!("{} / {}: {}", money_type, property, e))?;
            map.insert(property, rating);
        }

        Ok(Self {
            money_type: money_type.to_string(),
            scores: map,
        })
    }

    /// Build from a full row of ratings in `MoneyProperty::ALL` order
    fn from_row(money_type: &str, row: [u8; 10]) -> Self {
        let scores = MoneyProperty::ALL
            .iter()
            .zip(row)
            .map(|(&property, value)| (property, Rating(value)))
            .collect();

        Self {
            money_type: money_type.to_string(),
            scores,
        }
    }

    pub fn bitcoin() -> Self {
        Self::from_row("Bitcoin", [10, 9, 10, 10, 7, 10, 10, 10, 9, 5])
    }

    pub fn gold() -> Self {
        Self::from_row("Gold", [8, 10, 3, 5, 8, 5, 7, 8, 6, 8])
    }

    pub fn fiat() -> Self {
        Self::from_row("Fiat", [2, 6, 7, 8, 9, 6, 4, 1, 2, 10])
    }

    /// Profiles shipped with the crate
    pub fn builtins() -> Vec<Self> {
        vec![Self::bitcoin(), Self::gold(), Self::fiat()]
    }

    /// Look up a built-in profile by money type, ignoring case
    pub fn builtin(money_type: &str) -> Option<Self> {
        Self::find(Self::builtins(), money_type)
    }

    /// Find a profile by money type, ignoring case
    pub fn find(profiles: Vec<Self>, money_type: &str) -> Option<Self> {
        profiles
            .into_iter()
            .find(|p| p.money_type.eq_ignore_ascii_case(money_type.trim()))
    }

    /// Parse a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Vec<Self>, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse profiles: {}", e))
    }

    /// Load a JSON array of profiles from a file
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, String> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            format!("Failed to read profiles {}: {}", path.as_ref().display(), e)
        })?;
        let profiles = Self::from_json(&json)?;

        for profile in &profiles {
            let missing = profile.missing();
            if !missing.is_empty() {
                log::warn!(
                    "Profile '{}' has no reference score for {} properties; they will be ungraded",
                    profile.money_type,
                    missing.len()
                );
            }
        }
        log::info!(
            "Loaded {} profiles from {}",
            profiles.len(),
            path.as_ref().display()
        );

        Ok(profiles)
    }

    /// Reference score for a property
    pub fn reference(&self, property: MoneyProperty) -> Option<Rating> {
        self.scores.get(&property).copied()
    }

    /// Properties with no reference score
    pub fn missing(&self) -> Vec<MoneyProperty> {
        MoneyProperty::ALL
            .iter()
            .copied()
            .filter(|p| !self.scores.contains_key(p))
            .collect()
    }
}
