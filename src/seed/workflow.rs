// Seed phrase reveal and verification exercise

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::seed::{SeedError, Wordlist};

/// Number of words in a mnemonic
pub const PHRASE_LEN: usize = 12;

/// Ordered 12-word phrase, immutable once generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic(Vec<String>);

impl Mnemonic {
    /// Sample 12 words independently (with replacement) from the wordlist
    pub fn generate<R: Rng + ?Sized>(wordlist: &Wordlist, rng: &mut R) -> Self {
        let words = wordlist.words();
        let phrase = (0..PHRASE_LEN)
            .map(|_| words[rng.gen_range(0..words.len())].clone())
            .collect();
        Self(phrase)
    }

    #[cfg(test)]
    fn from_words<S: Into<String>>(words: [S; PHRASE_LEN]) -> Self {
        Self(words.into_iter().map(Into::into).collect())
    }

    /// Words in order
    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Word at position
    pub fn word(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No phrase yet
    Generate,
    /// Learner uncovers words
    Reveal,
    /// Learner rebuilds the phrase from a shuffled pool
    Verify,
    /// Phrase reproduced correctly
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Generate => write!(f, "generate"),
            Stage::Reveal => write!(f, "reveal"),
            Stage::Verify => write!(f, "verify"),
            Stage::Complete => write!(f, "complete"),
        }
    }
}

/// Result of toggling a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Result of a verification check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Selection matched the phrase
    Complete,
    /// Selection did not match; it has been cleared for a retry
    Mismatch,
}

enum State {
    Generate,
    Reveal {
        phrase: Mnemonic,
        revealed: BTreeSet<usize>,
        reveal_all: bool,
    },
    Verify {
        phrase: Mnemonic,
        pool: Vec<String>,
        // Pool slot indices in pick order
        selection: Vec<usize>,
    },
    Complete {
        phrase: Mnemonic,
    },
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Generate => Stage::Generate,
            State::Reveal { .. } => Stage::Reveal,
            State::Verify { .. } => Stage::Verify,
            State::Complete { .. } => Stage::Complete,
        }
    }
}

/// Seed phrase exercise: generate, reveal word by word, then rebuild in order.
///
/// Each operation is only valid in one stage; calling it elsewhere returns
/// `SeedError::WrongStage` and leaves the workflow unchanged.
pub struct SeedPhraseWorkflow {
    wordlist: Wordlist,
    state: State,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl SeedPhraseWorkflow {
    /// Create a workflow drawing from the given wordlist
    pub fn new(wordlist: Wordlist) -> Self {
        Self {
            wordlist,
            state: State::Generate,
            on_complete: None,
        }
    }

    /// Register a callback run each time verification succeeds
    pub fn with_completion<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Wordlist in use
    pub fn wordlist(&self) -> &Wordlist {
        &self.wordlist
    }

    /// Generate a fresh phrase and enter the reveal stage.
    /// Any previous session is discarded.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Mnemonic {
        if self.stage() != Stage::Generate {
            log::debug!("Discarding {} session for a new phrase", self.stage());
        }

        self.state = State::Reveal {
            phrase: Mnemonic::generate(&self.wordlist, rng),
            revealed: BTreeSet::new(),
            reveal_all: false,
        };
        log::info!("Generated new {}-word phrase", PHRASE_LEN);

        match &self.state {
            State::Reveal { phrase, .. } => phrase,
            _ => unreachable!("state was just set to Reveal"),
        }
    }

    /// Uncover one word. Revealing the same word twice has no further effect.
    pub fn reveal_word(&mut self, index: usize) -> Result<(), SeedError> {
        let actual = self.stage();
        match &mut self.state {
            State::Reveal { revealed, .. } => {
                if index >= PHRASE_LEN {
                    return Err(SeedError::IndexOutOfRange { index, len: PHRASE_LEN });
                }
                if revealed.insert(index) {
                    log::debug!("Revealed word {}", index + 1);
                }
                Ok(())
            }
            _ => Err(SeedError::WrongStage { expected: Stage::Reveal, actual }),
        }
    }

    /// Uncover every word at once
    pub fn reveal_all(&mut self) -> Result<(), SeedError> {
        let actual = self.stage();
        match &mut self.state {
            State::Reveal { reveal_all, .. } => {
                *reveal_all = true;
                log::debug!("Revealed all words");
                Ok(())
            }
            _ => Err(SeedError::WrongStage { expected: Stage::Reveal, actual }),
        }
    }

    /// Whether the word at `index` is visible to the learner
    pub fn is_revealed(&self, index: usize) -> bool {
        match &self.state {
            State::Reveal { revealed, reveal_all, .. } => {
                index < PHRASE_LEN && (*reveal_all || revealed.contains(&index))
            }
            State::Verify { .. } | State::Complete { .. } => index < PHRASE_LEN,
            State::Generate => false,
        }
    }

    /// Number of visible words
    pub fn revealed_count(&self) -> usize {
        (0..PHRASE_LEN).filter(|&i| self.is_revealed(i)).count()
    }

    /// Whether every word has been revealed
    pub fn all_revealed(&self) -> bool {
        self.revealed_count() == PHRASE_LEN
    }

    /// Shuffle the phrase into a pool and enter the verify stage.
    /// Refused until every word has been revealed.
    pub fn begin_verification<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&[String], SeedError> {
        match &self.state {
            State::Reveal { .. } => {
                let revealed = self.revealed_count();
                if revealed < PHRASE_LEN {
                    return Err(SeedError::NotFullyRevealed { revealed });
                }
            }
            _ => {
                return Err(SeedError::WrongStage {
                    expected: Stage::Reveal,
                    actual: self.stage(),
                });
            }
        }

        let State::Reveal { phrase, .. } = std::mem::replace(&mut self.state, State::Generate)
        else {
            unreachable!("stage checked above");
        };

        let mut pool = phrase.words().to_vec();
        pool.shuffle(rng);
        log::info!("Entering verification with shuffled pool");

        self.state = State::Verify {
            phrase,
            pool,
            selection: Vec::with_capacity(PHRASE_LEN),
        };

        Ok(self.shuffled_pool().unwrap_or_default())
    }

    /// Shuffled pool during verification
    pub fn shuffled_pool(&self) -> Option<&[String]> {
        match &self.state {
            State::Verify { pool, .. } => Some(pool),
            _ => None,
        }
    }

    /// Select a pool slot, or deselect it if already picked
    pub fn toggle_word(&mut self, slot: usize) -> Result<Toggle, SeedError> {
        let actual = self.stage();
        let State::Verify { pool, selection, .. } = &mut self.state else {
            return Err(SeedError::WrongStage { expected: Stage::Verify, actual });
        };

        if slot >= pool.len() {
            return Err(SeedError::IndexOutOfRange { index: slot, len: pool.len() });
        }

        if let Some(pos) = selection.iter().position(|&s| s == slot) {
            selection.remove(pos);
            return Ok(Toggle::Deselected);
        }

        // Slots are distinct and the pool holds PHRASE_LEN of them, so a full
        // selection leaves nothing unpicked to push.
        selection.push(slot);
        Ok(Toggle::Selected)
    }

    /// Picked pool slots in order
    pub fn selected_slots(&self) -> &[usize] {
        match &self.state {
            State::Verify { selection, .. } => selection,
            _ => &[],
        }
    }

    /// Whether a pool slot is already picked
    pub fn is_slot_selected(&self, slot: usize) -> bool {
        self.selected_slots().contains(&slot)
    }

    /// Picked words in order
    pub fn selection(&self) -> Vec<&str> {
        match &self.state {
            State::Verify { pool, selection, .. } => {
                selection.iter().map(|&s| pool[s].as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Whether a full selection is ready to check
    pub fn can_check(&self) -> bool {
        self.stage() == Stage::Verify && self.selected_slots().len() == PHRASE_LEN
    }

    /// Compare the selection with the phrase.
    ///
    /// On a match the workflow completes and the completion callback runs.
    /// On a mismatch the selection is cleared; the pool is kept as is.
    pub fn check_verification(&mut self) -> Result<Verification, SeedError> {
        let actual = self.stage();
        let State::Verify { phrase, pool, selection } = &mut self.state else {
            return Err(SeedError::WrongStage { expected: Stage::Verify, actual });
        };

        if selection.len() != PHRASE_LEN {
            return Err(SeedError::SelectionIncomplete { selected: selection.len() });
        }

        let matches = selection
            .iter()
            .zip(phrase.words())
            .all(|(&slot, word)| pool[slot] == *word);

        if !matches {
            log::info!("Verification mismatch, selection cleared");
            selection.clear();
            return Ok(Verification::Mismatch);
        }

        let phrase = phrase.clone();
        self.state = State::Complete { phrase };
        log::info!("Seed phrase verified");

        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }

        Ok(Verification::Complete)
    }

    /// Current phrase, if one has been generated
    pub fn phrase(&self) -> Option<&Mnemonic> {
        match &self.state {
            State::Generate => None,
            State::Reveal { phrase, .. }
            | State::Verify { phrase, .. }
            | State::Complete { phrase } => Some(phrase),
        }
    }

    /// Discard the session and return to the generate stage
    pub fn reset(&mut self) {
        self.state = State::Generate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;
    use std::rc::Rc;

    fn revealed_workflow(seed: u64) -> (SeedPhraseWorkflow, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());
        workflow.generate(&mut rng);
        workflow.reveal_all().unwrap();
        (workflow, rng)
    }

    /// Pool slots spelling out `words`, each slot used once
    fn slots_for(pool: &[String], words: &[String]) -> Vec<usize> {
        let mut used = vec![false; pool.len()];
        words
            .iter()
            .map(|word| {
                let slot = (0..pool.len())
                    .find(|&s| !used[s] && pool[s] == *word)
                    .unwrap();
                used[slot] = true;
                slot
            })
            .collect()
    }

    fn sorted(words: &[String]) -> Vec<String> {
        let mut v = words.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_generated_phrase_uses_wordlist() {
        let wordlist = Wordlist::illustrative();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let phrase = Mnemonic::generate(&wordlist, &mut rng);

            assert_eq!(phrase.words().len(), PHRASE_LEN);
            assert!(phrase.words().iter().all(|w| wordlist.contains(w)));
        }
    }

    #[test]
    fn test_generate_enters_reveal() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());

        assert_eq!(workflow.stage(), Stage::Generate);
        assert!(workflow.phrase().is_none());

        workflow.generate(&mut rng);
        assert_eq!(workflow.stage(), Stage::Reveal);
        assert_eq!(workflow.revealed_count(), 0);
    }

    #[test]
    fn test_reveal_word_idempotent() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());
        workflow.generate(&mut rng);

        workflow.reveal_word(3).unwrap();
        workflow.reveal_word(3).unwrap();

        assert_eq!(workflow.revealed_count(), 1);
        assert!(workflow.is_revealed(3));
        assert!(!workflow.is_revealed(4));
    }

    #[test]
    fn test_reveal_word_out_of_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());
        workflow.generate(&mut rng);

        assert_eq!(
            workflow.reveal_word(12),
            Err(SeedError::IndexOutOfRange { index: 12, len: 12 })
        );
        assert_eq!(workflow.revealed_count(), 0);
    }

    #[test]
    fn test_reveal_before_generate_rejected() {
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());

        assert_eq!(
            workflow.reveal_word(0),
            Err(SeedError::WrongStage { expected: Stage::Reveal, actual: Stage::Generate })
        );
        assert!(workflow.reveal_all().is_err());
    }

    #[test]
    fn test_verify_refused_until_all_revealed() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative());
        workflow.generate(&mut rng);

        for i in 0..11 {
            workflow.reveal_word(i).unwrap();
        }
        assert_eq!(
            workflow.begin_verification(&mut rng).unwrap_err(),
            SeedError::NotFullyRevealed { revealed: 11 }
        );
        assert_eq!(workflow.stage(), Stage::Reveal);

        workflow.reveal_word(11).unwrap();
        assert!(workflow.begin_verification(&mut rng).is_ok());
        assert_eq!(workflow.stage(), Stage::Verify);
    }

    #[test]
    fn test_reveal_all_allows_verify() {
        let (mut workflow, mut rng) = revealed_workflow(5);

        assert!(workflow.all_revealed());
        assert!(workflow.begin_verification(&mut rng).is_ok());
    }

    #[test]
    fn test_pool_is_permutation() {
        for seed in 0..20 {
            let (mut workflow, mut rng) = revealed_workflow(seed);
            let pool = workflow.begin_verification(&mut rng).unwrap().to_vec();
            let phrase = workflow.phrase().unwrap().words().to_vec();

            assert_eq!(sorted(&pool), sorted(&phrase));
        }
    }

    #[test]
    fn test_toggle_selects_and_deselects() {
        let (mut workflow, mut rng) = revealed_workflow(6);
        workflow.begin_verification(&mut rng).unwrap();

        assert_eq!(workflow.toggle_word(0), Ok(Toggle::Selected));
        assert_eq!(workflow.toggle_word(5), Ok(Toggle::Selected));
        assert_eq!(workflow.toggle_word(2), Ok(Toggle::Selected));
        assert_eq!(workflow.selected_slots(), &[0, 5, 2]);

        assert_eq!(workflow.toggle_word(5), Ok(Toggle::Deselected));
        assert_eq!(workflow.selected_slots(), &[0, 2]);
        assert!(!workflow.is_slot_selected(5));
    }

    #[test]
    fn test_toggle_slot_out_of_range() {
        let (mut workflow, mut rng) = revealed_workflow(7);
        workflow.begin_verification(&mut rng).unwrap();

        assert_eq!(
            workflow.toggle_word(12),
            Err(SeedError::IndexOutOfRange { index: 12, len: 12 })
        );
    }

    #[test]
    fn test_selection_never_exceeds_phrase_len() {
        let (mut workflow, mut rng) = revealed_workflow(8);
        workflow.begin_verification(&mut rng).unwrap();

        for slot in 0..PHRASE_LEN {
            workflow.toggle_word(slot).unwrap();
        }
        assert_eq!(workflow.selected_slots().len(), PHRASE_LEN);
        assert!(workflow.can_check());

        // Every slot is in use; toggling one frees it, re-toggling fills it again
        assert_eq!(workflow.toggle_word(4), Ok(Toggle::Deselected));
        assert_eq!(workflow.toggle_word(4), Ok(Toggle::Selected));
        assert_eq!(workflow.selected_slots().len(), PHRASE_LEN);

        // With a full selection every in-range toggle deselects
        for slot in 0..PHRASE_LEN {
            assert_eq!(workflow.toggle_word(slot), Ok(Toggle::Deselected));
            assert_eq!(workflow.toggle_word(slot), Ok(Toggle::Selected));
        }
        assert!(workflow.toggle_word(PHRASE_LEN).is_err());
        assert_eq!(workflow.selected_slots().len(), PHRASE_LEN);
    }

    #[test]
    fn test_check_requires_full_selection() {
        let (mut workflow, mut rng) = revealed_workflow(9);
        workflow.begin_verification(&mut rng).unwrap();
        workflow.toggle_word(0).unwrap();

        assert!(!workflow.can_check());
        assert_eq!(
            workflow.check_verification(),
            Err(SeedError::SelectionIncomplete { selected: 1 })
        );
    }

    #[test]
    fn test_correct_order_completes() {
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();

        let mut rng = StdRng::seed_from_u64(10);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative())
            .with_completion(move || counter.set(counter.get() + 1));
        workflow.generate(&mut rng);
        workflow.reveal_all().unwrap();
        let pool = workflow.begin_verification(&mut rng).unwrap().to_vec();
        let phrase = workflow.phrase().unwrap().words().to_vec();

        for slot in slots_for(&pool, &phrase) {
            workflow.toggle_word(slot).unwrap();
        }
        assert_eq!(workflow.selection(), phrase.iter().map(String::as_str).collect::<Vec<_>>());

        assert_eq!(workflow.check_verification(), Ok(Verification::Complete));
        assert_eq!(workflow.stage(), Stage::Complete);
        assert_eq!(completions.get(), 1);

        // Complete is terminal for verification
        assert!(workflow.toggle_word(0).is_err());
        assert!(workflow.check_verification().is_err());
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_adjacent_swap_fails_and_clears_selection() {
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();

        let mut rng = StdRng::seed_from_u64(11);
        let mut workflow = SeedPhraseWorkflow::new(Wordlist::illustrative())
            .with_completion(move || counter.set(counter.get() + 1));
        workflow.generate(&mut rng);
        workflow.reveal_all().unwrap();
        let pool = workflow.begin_verification(&mut rng).unwrap().to_vec();
        let phrase = workflow.phrase().unwrap().words().to_vec();

        let i = (0..PHRASE_LEN - 1)
            .find(|&i| phrase[i] != phrase[i + 1])
            .unwrap();
        let mut swapped = phrase.clone();
        swapped.swap(i, i + 1);

        for slot in slots_for(&pool, &swapped) {
            workflow.toggle_word(slot).unwrap();
        }

        assert_eq!(workflow.check_verification(), Ok(Verification::Mismatch));
        assert_eq!(workflow.stage(), Stage::Verify);
        assert!(workflow.selected_slots().is_empty());
        assert_eq!(completions.get(), 0);

        // Retry uses the same pool
        assert_eq!(workflow.shuffled_pool().unwrap(), pool.as_slice());
        for slot in slots_for(&pool, &phrase) {
            workflow.toggle_word(slot).unwrap();
        }
        assert_eq!(workflow.check_verification(), Ok(Verification::Complete));
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_duplicate_words_use_separate_slots() {
        let wordlist = Wordlist::new(vec!["same"]).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let mut workflow = SeedPhraseWorkflow::new(wordlist);
        workflow.generate(&mut rng);
        workflow.reveal_all().unwrap();
        workflow.begin_verification(&mut rng).unwrap();

        for slot in 0..PHRASE_LEN {
            assert_eq!(workflow.toggle_word(slot), Ok(Toggle::Selected));
        }
        assert_eq!(workflow.check_verification(), Ok(Verification::Complete));
    }

    #[test]
    fn test_regenerate_discards_session() {
        let (mut workflow, mut rng) = revealed_workflow(13);
        workflow.begin_verification(&mut rng).unwrap();
        workflow.toggle_word(0).unwrap();

        workflow.generate(&mut rng);
        assert_eq!(workflow.stage(), Stage::Reveal);
        assert_eq!(workflow.revealed_count(), 0);
        assert!(workflow.selected_slots().is_empty());
        assert!(workflow.shuffled_pool().is_none());

        workflow.reset();
        assert_eq!(workflow.stage(), Stage::Generate);
        assert!(workflow.phrase().is_none());
    }

    #[test]
    fn test_mnemonic_display() {
        let phrase = Mnemonic::from_words([
            "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l",
        ]);
        assert_eq!(phrase.to_string(), "a b c d e f g h i j k l");
        assert_eq!(phrase.word(11), Some("l"));
        assert_eq!(phrase.word(12), None);
    }
}
