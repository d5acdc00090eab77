//! Answer code to display label translation

use crate::lead::LeadRecord;

/// A closed set of answer codes and the label each one displays as.
///
/// Any code outside the set, including an absent answer, displays as the
/// table's default label.
#[derive(Debug)]
pub struct LabelTable {
    entries: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl LabelTable {
    /// Return the label for `code`, or the default label
    pub fn label(&self, code: Option<&str>) -> &'static str {
        code.and_then(|code| {
            self.entries
                .iter()
                .find(|(known, _)| *known == code)
                .map(|(_, label)| *label)
        })
        .unwrap_or(self.default)
    }
}

/// Preparation timeline labels, keyed by the answer to question 2
pub const TIMELINE: LabelTable = LabelTable {
    entries: &[
        ("urgent", "2-4 Week Intensive"),
        ("moderate", "6-8 Week Standard"),
        ("relaxed", "12+ Week Comprehensive"),
    ],
    default: "6-Week Standard",
};

/// Daily study time labels, keyed by the answer to question 5
pub const STUDY_TIME: LabelTable = LabelTable {
    entries: &[
        ("minimal", "30-60 minutes daily"),
        ("moderate", "1-2 hours daily"),
        ("intensive", "2+ hours daily"),
    ],
    default: "1-2 hours daily",
};

/// Label for a preparation timeline code
pub fn timeline_label(code: Option<&str>) -> &'static str {
    TIMELINE.label(code)
}

/// Label for a daily study time code
pub fn study_time_label(code: Option<&str>) -> &'static str {
    STUDY_TIME.label(code)
}

/// The user-facing view of a lead: timeline and study time are translated,
/// everything else passes through as answered.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContent<'a> {
    target_band: Option<&'a str>,
    timeline: &'static str,
    weak_section: Option<&'a str>,
    study_time: &'static str,
    challenge: Option<&'a str>,
}

impl<'a> NormalizedContent<'a> {
    /// Derive the view for `record`
    pub fn from_record(record: &'a LeadRecord) -> Self {
        NormalizedContent {
            target_band: record.target_band(),
            timeline: timeline_label(record.timeline()),
            weak_section: record.weak_section(),
            study_time: study_time_label(record.study_time()),
            challenge: record.challenge(),
        }
    }

    /// Target band, as answered
    pub fn target_band(&self) -> Option<&'a str> {
        self.target_band
    }

    /// Timeline label
    pub fn timeline(&self) -> &'static str {
        self.timeline
    }

    /// Weak section, as answered
    pub fn weak_section(&self) -> Option<&'a str> {
        self.weak_section
    }

    /// Study time label
    pub fn study_time(&self) -> &'static str {
        self.study_time
    }

    /// Biggest challenge, as answered
    pub fn challenge(&self) -> Option<&'a str> {
        self.challenge
    }
}
