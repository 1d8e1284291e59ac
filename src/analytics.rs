// In-memory learning analytics
//
// An `Analytics` value is created by whoever runs the session and handed to
// the code that records events. Nothing is kept beyond its lifetime unless
// the owner exports it.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Kind of learner interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PhraseGenerated,
    WordRevealed,
    VerificationAttempted,
    VerificationSucceeded,
    AssessmentGraded,
    KeysGenerated,
    AddressChecked,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EventKind::PhraseGenerated => "phrase_generated",
            EventKind::WordRevealed => "word_revealed",
            EventKind::VerificationAttempted => "verification_attempted",
            EventKind::VerificationSucceeded => "verification_succeeded",
            EventKind::AssessmentGraded => "assessment_graded",
            EventKind::KeysGenerated => "keys_generated",
            EventKind::AddressChecked => "address_checked",
        };
        write!(f, "{}", name)
    }
}

/// Recorded interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub label: String,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

/// Aggregated view of a session's events
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub by_kind: BTreeMap<EventKind, usize>,
    pub verification_attempts: usize,
    pub verification_successes: usize,
    pub assessments_graded: usize,
}

impl AnalyticsSummary {
    /// Share of verification attempts that succeeded
    pub fn verification_success_rate(&self) -> Option<f64> {
        if self.verification_attempts == 0 {
            return None;
        }
        Some(self.verification_successes as f64 / self.verification_attempts as f64)
    }
}

impl fmt::Display for AnalyticsSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Session analytics:")?;
        writeln!(f, "  Events: {}", self.total)?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        if let Some(rate) = self.verification_success_rate() {
            writeln!(
                f,
                "  Verification: {}/{} ({:.0}%)",
                self.verification_successes,
                self.verification_attempts,
                rate * 100.0
            )?;
        }
        write!(f, "  Assessments graded: {}", self.assessments_graded)
    }
}

/// Caller-owned event log
#[derive(Debug, Clone)]
pub struct Analytics {
    events: Vec<Event>,
    enabled: bool,
}

impl Analytics {
    /// Create an empty, recording log
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// Create a log that drops every event
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an event
    pub fn track(&mut self, kind: EventKind, label: impl Into<String>) {
        if !self.enabled {
            return;
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let event = Event {
            kind,
            label: label.into(),
            timestamp,
        };
        log::trace!("Tracked {} ({})", event.kind, event.label);
        self.events.push(event);
    }

    /// Events in recording order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events of one kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Aggregate counts
    pub fn summary(&self) -> AnalyticsSummary {
        let mut by_kind = BTreeMap::new();
        for event in &self.events {
            *by_kind.entry(event.kind).or_insert(0) += 1;
        }

        AnalyticsSummary {
            total: self.events.len(),
            verification_attempts: by_kind
                .get(&EventKind::VerificationAttempted)
                .copied()
                .unwrap_or(0),
            verification_successes: by_kind
                .get(&EventKind::VerificationSucceeded)
                .copied()
                .unwrap_or(0),
            assessments_graded: by_kind
                .get(&EventKind::AssessmentGraded)
                .copied()
                .unwrap_or(0),
            by_kind,
        }
    }

    /// Events as a JSON array
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.events)
            .map_err(|e| format!("Failed to serialize analytics: {}", e))
    }

    /// Write events as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json).map_err(|e| {
            format!("Failed to write analytics to {}: {}", path.as_ref().display(), e)
        })?;

        log::info!(
            "Wrote {} analytics events to {}",
            self.events.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Drop all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_and_count() {
        let mut analytics = Analytics::new();
        analytics.track(EventKind::PhraseGenerated, "seed");
        analytics.track(EventKind::WordRevealed, "3");
        analytics.track(EventKind::WordRevealed, "4");

        assert_eq!(analytics.events().len(), 3);
        assert_eq!(analytics.count(EventKind::WordRevealed), 2);
        assert_eq!(analytics.count(EventKind::KeysGenerated), 0);
        assert_eq!(analytics.events()[1].label, "3");
    }

    #[test]
    fn test_summary() {
        let mut analytics = Analytics::new();
        analytics.track(EventKind::VerificationAttempted, "seed");
        analytics.track(EventKind::VerificationAttempted, "seed");
        analytics.track(EventKind::VerificationSucceeded, "seed");
        analytics.track(EventKind::AssessmentGraded, "Gold");

        let summary = analytics.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.verification_attempts, 2);
        assert_eq!(summary.verification_successes, 1);
        assert_eq!(summary.assessments_graded, 1);
        assert_eq!(summary.by_kind.get(&EventKind::AssessmentGraded), Some(&1));
        assert_eq!(summary.verification_success_rate(), Some(0.5));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Analytics::new().summary();
        assert_eq!(summary, AnalyticsSummary::default());
        assert_eq!(summary.verification_success_rate(), None);
    }

    #[test]
    fn test_disabled_records_nothing() {
        let mut analytics = Analytics::disabled();
        analytics.track(EventKind::KeysGenerated, "mock");

        assert!(!analytics.is_enabled());
        assert!(analytics.events().is_empty());
    }

    #[test]
    fn test_to_json() {
        let mut analytics = Analytics::new();
        analytics.track(EventKind::AddressChecked, "prefix");

        let json = analytics.to_json().unwrap();
        assert!(json.contains("\"address_checked\""));

        let events: Vec<Event> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, analytics.events());

        analytics.clear();
        assert!(analytics.events().is_empty());
    }

    #[test]
    fn test_save_writes_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("analytics.json");
        let mut analytics = Analytics::new();
        analytics.track(EventKind::PhraseGenerated, "seed");

        analytics.save(&path).unwrap();

        let events: Vec<Event> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(events, analytics.events());
        assert!(analytics.save(temp_dir.path().join("missing/analytics.json")).is_err());
    }
}
