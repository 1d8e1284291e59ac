// Money properties assessment

mod engine;
mod profile;
mod property;

pub use engine::{
    grade, AssessmentReport, AssessmentState, Guesses, PropertyOutcome, Verdict, TOLERANCE,
};
pub use profile::ReferenceProfile;
pub use property::{MoneyProperty, Rating, GENERIC_HINT};

/// Assessment error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// Guesses are frozen once graded
    AlreadyGraded,
    /// Result requested before grading
    NotGraded,
    /// Rating outside 1..=10
    RatingOutOfRange(u8),
    /// Property name not recognised
    UnknownProperty(String),
}

impl std::fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AssessmentError::AlreadyGraded => write!(f, "Assessment already graded"),
            AssessmentError::NotGraded => write!(f, "Assessment not graded yet"),
            AssessmentError::RatingOutOfRange(v) => {
                write!(f, "Rating {} out of range ({}..={})", v, Rating::MIN, Rating::MAX)
            }
            AssessmentError::UnknownProperty(name) => write!(f, "Unknown property: {}", name),
        }
    }
}

impl std::error::Error for AssessmentError {}
