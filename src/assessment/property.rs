// Properties of money and learner ratings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assessment::AssessmentError;

/// Hint shown for an incorrect rating when the property has no specific one
pub const GENERIC_HINT: &str =
    "Compare how this money behaves in practice with the textbook definition of the property.";

/// The ten properties a money type is rated on, in presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoneyProperty {
    Scarcity,
    Durability,
    Portability,
    Divisibility,
    Fungibility,
    Verifiability,
    #[serde(rename = "Self Custody")]
    SelfCustody,
    Decentralization,
    #[serde(rename = "Censorship Resistance")]
    CensorshipResistance,
    Acceptability,
}

impl MoneyProperty {
    /// All properties in presentation order
    pub const ALL: [MoneyProperty; 10] = [
        MoneyProperty::Scarcity,
        MoneyProperty::Durability,
        MoneyProperty::Portability,
        MoneyProperty::Divisibility,
        MoneyProperty::Fungibility,
        MoneyProperty::Verifiability,
        MoneyProperty::SelfCustody,
        MoneyProperty::Decentralization,
        MoneyProperty::CensorshipResistance,
        MoneyProperty::Acceptability,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            MoneyProperty::Scarcity => "Scarcity",
            MoneyProperty::Durability => "Durability",
            MoneyProperty::Portability => "Portability",
            MoneyProperty::Divisibility => "Divisibility",
            MoneyProperty::Fungibility => "Fungibility",
            MoneyProperty::Verifiability => "Verifiability",
            MoneyProperty::SelfCustody => "Self Custody",
            MoneyProperty::Decentralization => "Decentralization",
            MoneyProperty::CensorshipResistance => "Censorship Resistance",
            MoneyProperty::Acceptability => "Acceptability",
        }
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Property-specific hint, if one is written
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            MoneyProperty::Scarcity => {
                Some("Ask who can create more units, and how costly it is to do so.")
            }
            MoneyProperty::Durability => {
                Some("Think about whether the money degrades, rots or can be destroyed over time.")
            }
            MoneyProperty::Portability => {
                Some("Consider moving a large amount of value across a border.")
            }
            MoneyProperty::Verifiability => {
                Some("How easily can a recipient tell a genuine unit from a counterfeit?")
            }
            MoneyProperty::SelfCustody => {
                Some("Can you hold this money yourself without relying on a bank or custodian?")
            }
            MoneyProperty::Decentralization => {
                Some("Is there a single party that controls issuance or the rules?")
            }
            MoneyProperty::CensorshipResistance => {
                Some("Could a third party block or reverse a payment you want to make?")
            }
            MoneyProperty::Divisibility
            | MoneyProperty::Fungibility
            | MoneyProperty::Acceptability => None,
        }
    }

    /// Hint with the generic fallback applied
    pub fn hint_or_generic(&self) -> &'static str {
        self.hint().unwrap_or(GENERIC_HINT)
    }
}

impl fmt::Display for MoneyProperty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MoneyProperty {
    type Err = AssessmentError;

    /// Accepts display names case-insensitively, with spaces, hyphens or underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |name: &str| -> String {
            name.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        };

        let wanted = normalize(s.trim());
        MoneyProperty::ALL
            .iter()
            .copied()
            .find(|p| normalize(p.name()) == wanted)
            .ok_or_else(|| AssessmentError::UnknownProperty(s.to_string()))
    }
}

/// Learner or reference rating, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(pub(super) u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    /// Starting position of every slider
    pub const DEFAULT: Rating = Rating(5);

    /// Create a rating, rejecting values outside 1..=10
    pub fn new(value: u8) -> Result<Self, AssessmentError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AssessmentError::RatingOutOfRange(value))
        }
    }

    /// Numeric value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Absolute distance to another rating
    pub fn distance(&self, other: Rating) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Rating {
    type Error = AssessmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
