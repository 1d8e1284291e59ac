// Seed phrase exercise

mod wordlist;
mod workflow;

pub use wordlist::{Wordlist, CANONICAL_WORDLIST_SIZE};
pub use workflow::{Mnemonic, SeedPhraseWorkflow, Stage, Toggle, Verification, PHRASE_LEN};

/// Seed workflow error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// Operation not valid in the current stage
    WrongStage { expected: Stage, actual: Stage },
    /// Word or pool slot index past the end
    IndexOutOfRange { index: usize, len: usize },
    /// Verification requested before every word was revealed
    NotFullyRevealed { revealed: usize },
    /// Verification checked before a full phrase was selected
    SelectionIncomplete { selected: usize },
    /// Wordlist rejected
    InvalidWordlist(String),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SeedError::WrongStage { expected, actual } => {
                write!(f, "Operation requires the {} stage, currently in {}", expected, actual)
            }
            SeedError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (0..{})", index, len)
            }
            SeedError::NotFullyRevealed { revealed } => {
                write!(f, "Only {} of {} words revealed", revealed, PHRASE_LEN)
            }
            SeedError::SelectionIncomplete { selected } => {
                write!(f, "Selected {} of {} words", selected, PHRASE_LEN)
            }
            SeedError::InvalidWordlist(reason) => write!(f, "Invalid wordlist: {}", reason),
        }
    }
}

impl std::error::Error for SeedError {}
