// Quick assessment grading

use crate::assessment::{AssessmentError, MoneyProperty, Rating, ReferenceProfile};

/// Maximum distance between guess and reference still graded correct
pub const TOLERANCE: u8 = 1;

/// One guess per property; a property can never be left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guesses([Rating; 10]);

impl Guesses {
    /// Every property at the default rating
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: MoneyProperty) -> Rating {
        self.0[property.index()]
    }

    pub fn set(&mut self, property: MoneyProperty, rating: Rating) {
        self.0[property.index()] = rating;
    }

    /// Pairs in presentation order
    pub fn iter(&self) -> impl Iterator<Item = (MoneyProperty, Rating)> + '_ {
        MoneyProperty::ALL.iter().map(|&p| (p, self.get(p)))
    }
}

/// Grading outcome for one property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { hint: &'static str },
    /// No reference score to compare against
    Ungraded,
}

/// Graded result for one property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyOutcome {
    pub property: MoneyProperty,
    pub guess: Rating,
    pub reference: Option<Rating>,
    pub verdict: Verdict,
}

impl PropertyOutcome {
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }

    /// Hint, present only for incorrect guesses
    pub fn hint(&self) -> Option<&'static str> {
        match self.verdict {
            Verdict::Incorrect { hint } => Some(hint),
            _ => None,
        }
    }
}

/// Graded assessment for one money type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentReport {
    money_type: String,
    outcomes: Vec<PropertyOutcome>,
}

impl AssessmentReport {
    pub fn money_type(&self) -> &str {
        &self.money_type
    }

    /// Outcomes in presentation order
    pub fn outcomes(&self) -> &[PropertyOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, property: MoneyProperty) -> &PropertyOutcome {
        &self.outcomes[property.index()]
    }

    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct()).count()
    }

    /// Number of properties that had a reference score
    pub fn graded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict != Verdict::Ungraded)
            .count()
    }

    /// Properties left ungraded for lack of a reference score
    pub fn ungraded(&self) -> Vec<MoneyProperty> {
        self.outcomes
            .iter()
            .filter(|o| o.verdict == Verdict::Ungraded)
            .map(|o| o.property)
            .collect()
    }

    /// Share of graded properties answered correctly, as a percentage
    pub fn score_percent(&self) -> Option<f64> {
        let graded = self.graded_count();
        if graded == 0 {
            return None;
        }
        Some(self.correct_count() as f64 * 100.0 / graded as f64)
    }
}

/// Grade guesses against a reference profile.
///
/// Pure: the same inputs always give the same report. A property without a
/// reference score is `Ungraded` rather than an error.
pub fn grade(guesses: &Guesses, profile: &ReferenceProfile) -> AssessmentReport {
    let outcomes = guesses
        .iter()
        .map(|(property, guess)| {
            let reference = profile.reference(property);
            let verdict = match reference {
                None => Verdict::Ungraded,
                Some(r) if guess.distance(r) <= TOLERANCE => Verdict::Correct,
                Some(_) => Verdict::Incorrect {
                    hint: property.hint_or_generic(),
                },
            };

            PropertyOutcome {
                property,
                guess,
                reference,
                verdict,
            }
        })
        .collect();

    AssessmentReport {
        money_type: profile.money_type.clone(),
        outcomes,
    }
}

/// One learner's assessment of one money type.
///
/// Guesses are editable until `submit`; afterwards the state is read-only.
/// A new money type needs a new `AssessmentState`.
pub struct AssessmentState {
    profile: ReferenceProfile,
    guesses: Guesses,
    report: Option<AssessmentReport>,
    on_complete: Option<Box<dyn FnOnce(&AssessmentReport)>>,
}

impl AssessmentState {
    pub fn new(profile: ReferenceProfile) -> Self {
        Self {
            profile,
            guesses: Guesses::new(),
            report: None,
            on_complete: None,
        }
    }

    /// Register a callback run when the learner proceeds past the graded result
    pub fn with_completion<F: FnOnce(&AssessmentReport) + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn money_type(&self) -> &str {
        &self.profile.money_type
    }

    pub fn guesses(&self) -> &Guesses {
        &self.guesses
    }

    pub fn guess(&self, property: MoneyProperty) -> Rating {
        self.guesses.get(property)
    }

    /// Move one slider
    pub fn set_guess(&mut self, property: MoneyProperty, value: u8) -> Result<(), AssessmentError> {
        if self.is_graded() {
            return Err(AssessmentError::AlreadyGraded);
        }
        self.guesses.set(property, Rating::new(value)?);
        Ok(())
    }

    pub fn is_graded(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&AssessmentReport> {
        self.report.as_ref()
    }

    /// Grade the current guesses and freeze them
    pub fn submit(&mut self) -> Result<&AssessmentReport, AssessmentError> {
        if self.is_graded() {
            return Err(AssessmentError::AlreadyGraded);
        }

        let report = grade(&self.guesses, &self.profile);
        log::info!(
            "Graded {} assessment: {}/{} correct",
            report.money_type(),
            report.correct_count(),
            report.graded_count()
        );
        for property in report.ungraded() {
            log::warn!("No reference score for {}, left ungraded", property);
        }

        Ok(self.report.insert(report))
    }

    /// Leave the graded result, running the completion callback once
    pub fn proceed(&mut self) -> Result<(), AssessmentError> {
        let report = self.report.as_ref().ok_or(AssessmentError::NotGraded)?;
        if let Some(callback) = self.on_complete.take() {
            callback(report);
        }
        Ok(())
    }
}
