// Mnemonic wordlists

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::seed::SeedError;

/// Size of the canonical mnemonic wordlist
pub const CANONICAL_WORDLIST_SIZE: usize = 2048;

/// Abbreviated word excerpt used by the learning exercise.
/// Not a full mnemonic wordlist; load a real one with `Wordlist::load`.
const ILLUSTRATIVE_WORDS: &[&str] = &[
    "abandon", "ability", "able", "about", "above", "absent", "absorb", "abstract",
    "absurd", "abuse", "access", "accident", "account", "accuse", "achieve", "acid",
    "acoustic", "acquire", "across", "act", "action", "actor", "actress", "actual",
    "adapt", "add", "addict", "address", "adjust", "admit", "adult", "advance",
    "advice", "aerobic", "affair", "afford", "afraid", "again", "age", "agent",
    "agree", "ahead", "aim", "air", "airport", "aisle", "alarm", "album",
    "alcohol", "alert", "alien", "all", "alley", "allow", "almost", "alone",
    "alpha", "already", "also", "alter", "always", "amateur", "amazing", "among",
];

/// Source of words a mnemonic is sampled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist {
    words: Vec<String>,
}

impl Wordlist {
    /// Create a wordlist, rejecting empty lists and blank or multi-token entries
    pub fn new<I, S>(words: I) -> Result<Self, SeedError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();

        if words.is_empty() {
            return Err(SeedError::InvalidWordlist("wordlist is empty".to_string()));
        }

        if let Some(pos) = words
            .iter()
            .position(|w| w.is_empty() || w.chars().any(char::is_whitespace))
        {
            return Err(SeedError::InvalidWordlist(format!(
                "entry {} is blank or contains whitespace",
                pos
            )));
        }

        Ok(Self { words })
    }

    /// Built-in excerpt for the learning exercise
    pub fn illustrative() -> Self {
        Self {
            words: ILLUSTRATIVE_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Read one word per line; blank lines are skipped
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, String> {
        let mut words = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line.map_err(|e| format!("Failed to read wordlist: {}", e))?;
            let word = line.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
        }

        Self::new(words).map_err(|e| e.to_string())
    }

    /// Load a wordlist file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = fs::File::open(path.as_ref()).map_err(|e| {
            format!("Failed to open wordlist {}: {}", path.as_ref().display(), e)
        })?;
        let wordlist = Self::from_reader(file)?;

        log::info!(
            "Loaded {} words from {}",
            wordlist.len(),
            path.as_ref().display()
        );
        if !wordlist.is_canonical_size() {
            log::warn!(
                "Wordlist has {} entries, a standard mnemonic list has {}",
                wordlist.len(),
                CANONICAL_WORDLIST_SIZE
            );
        }

        Ok(wordlist)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; an empty wordlist cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the list has the size of a full mnemonic wordlist
    pub fn is_canonical_size(&self) -> bool {
        self.words.len() == CANONICAL_WORDLIST_SIZE
    }

    /// Check membership
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// All words in order
    pub fn words(&self) -> &[String] {
        &self.words
    }
}
