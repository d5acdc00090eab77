//! Quiz submissions, lead records and lead ids

use crate::error::SubmissionError;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Quiz answers keyed by question number (`"1"` through `"6"`).
///
/// Answers are usually strings; numeric answers are kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers(BTreeMap<String, Value>);

impl Answers {
    /// Answers from a submitted `answers` value. Anything but an object holds no answers.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Answers(map.into_iter().collect()),
            _ => Answers::default(),
        }
    }

    /// The answer code for question `index`, if one was given
    pub fn code(&self, index: u8) -> Option<String> {
        match self.0.get(&index.to_string())? {
            Value::String(code) => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        }
    }
}

/// An untrusted quiz form submission, as posted by the browser.
///
/// Fields are kept as raw JSON so that any value type reaches `validate`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    /// Submitter's first name
    pub first_name: Option<Value>,
    /// Submitter's email address
    pub email: Option<Value>,
    /// Quiz answers
    pub answers: Option<Value>,
}

// null, false, 0 and "" do not count as given
fn given(value: Option<Value>) -> Option<Value> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        value => Some(value),
    }
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl QuizSubmission {
    /// Deserialize a submission from a JSON request body
    pub fn from_slice(body: &[u8]) -> Result<Self, SubmissionError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Check that `firstName`, `email` and `answers` are all given.
    ///
    /// `null`, `false`, `0` and the empty string count as missing, whatever
    /// the field. Non-string names and addresses are kept as their JSON text;
    /// their format is not checked.
    pub fn validate(self) -> Result<ValidSubmission, SubmissionError> {
        match (given(self.first_name), given(self.email), given(self.answers)) {
            (Some(first_name), Some(email), Some(answers)) => Ok(ValidSubmission {
                first_name: text(first_name),
                email: text(email),
                answers: Answers::from_value(answers),
            }),
            _ => Err(SubmissionError::MissingFields),
        }
    }
}

/// A submission whose required fields are known to be present
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    first_name: String,
    email: String,
    answers: Answers,
}

/// A captured lead. Built once per submission and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    first_name: String,
    email: String,
    target_band: Option<String>,
    timeline: Option<String>,
    weak_section: Option<String>,
    experience: Option<String>,
    study_time: Option<String>,
    challenge: Option<String>,
    timestamp: DateTime<Utc>,
}

impl LeadRecord {
    /// Build a record for `submission` captured at `timestamp`
    pub fn build(submission: ValidSubmission, timestamp: DateTime<Utc>) -> Self {
        let ValidSubmission {
            first_name,
            email,
            answers,
        } = submission;
        LeadRecord {
            first_name,
            email,
            target_band: answers.code(1),
            timeline: answers.code(2),
            weak_section: answers.code(3),
            experience: answers.code(4),
            study_time: answers.code(5),
            challenge: answers.code(6),
            timestamp,
        }
    }

    /// Build a record for `submission` captured now
    pub fn capture(submission: ValidSubmission) -> Self {
        Self::build(submission, Utc::now())
    }

    /// Submitter's first name
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Submitter's email address
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Target band (question 1)
    pub fn target_band(&self) -> Option<&str> {
        self.target_band.as_deref()
    }

    /// Timeline code (question 2)
    pub fn timeline(&self) -> Option<&str> {
        self.timeline.as_deref()
    }

    /// Weakest test section (question 3)
    pub fn weak_section(&self) -> Option<&str> {
        self.weak_section.as_deref()
    }

    /// Prior test experience (question 4)
    pub fn experience(&self) -> Option<&str> {
        self.experience.as_deref()
    }

    /// Study time code (question 5)
    pub fn study_time(&self) -> Option<&str> {
        self.study_time.as_deref()
    }

    /// Biggest challenge (question 6)
    pub fn challenge(&self) -> Option<&str> {
        self.challenge.as_deref()
    }

    /// Capture instant
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Capture instant as ISO-8601 UTC with millisecond precision
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

const LEAD_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const LEAD_ID_SUFFIX_LEN: usize = 9;

/// Response-only identifier for a captured lead: `IELTS-<unix millis>-<suffix>`
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    /// Fixed id prefix
    pub const PREFIX: &'static str = "IELTS";

    /// Generate an id for the current instant
    pub fn generate() -> Self {
        Self::generate_at(Utc::now(), &mut rand::thread_rng())
    }

    /// Generate an id for `at`, drawing the suffix from `rng`
    pub fn generate_at<R: Rng + ?Sized>(at: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..LEAD_ID_SUFFIX_LEN)
            .map(|_| LEAD_ID_ALPHABET[rng.gen_range(0..LEAD_ID_ALPHABET.len())] as char)
            .collect();
        LeadId(format!("{}-{}-{}", Self::PREFIX, at.timestamp_millis(), suffix))
    }

    /// The id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;
    use std::collections::HashSet;

    fn submission(value: Value) -> QuizSubmission {
        serde_json::from_value(value).expect("valid submission json")
    }

    #[test]
    fn parses_camel_case_body() {
        let body = br#"{"firstName":"Sam","email":"sam@x.com","answers":{"1":"7","2":"urgent"}}"#;
        let parsed = QuizSubmission::from_slice(body).expect("failed to parse submission");
        assert_eq!(parsed.first_name, Some(json!("Sam")));
        assert_eq!(parsed.email, Some(json!("sam@x.com")));
        let answers = Answers::from_value(parsed.answers.expect("answers present"));
        assert_eq!(answers.code(1).as_deref(), Some("7"));
        assert_eq!(answers.code(2).as_deref(), Some("urgent"));
        assert_eq!(answers.code(3), None);
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let bodies: [&[u8]; 5] = [b"", b"{", b"null", b"true", br#""Sam""#];
        for body in bodies.iter() {
            match QuizSubmission::from_slice(body) {
                Err(SubmissionError::Malformed(_)) => {}
                other => panic!("expected malformed error, got {:?}", other),
            }
        }
    }

    #[test]
    fn numeric_answers_keep_their_text() {
        let parsed = submission(json!({ "answers": { "1": 7, "2": 6.5, "3": null, "4": true } }));
        let answers = Answers::from_value(parsed.answers.expect("answers present"));
        assert_eq!(answers.code(1).as_deref(), Some("7"));
        assert_eq!(answers.code(2).as_deref(), Some("6.5"));
        assert_eq!(answers.code(3), None);
        assert_eq!(answers.code(4), None);
    }

    #[test]
    fn validate_requires_all_three_fields() {
        let cases = vec![
            json!({ "email": "sam@x.com", "answers": {} }),
            json!({ "firstName": "", "email": "sam@x.com", "answers": {} }),
            json!({ "firstName": "Sam", "answers": {} }),
            json!({ "firstName": "Sam", "email": "", "answers": {} }),
            json!({ "firstName": "Sam", "email": "sam@x.com" }),
            json!({ "firstName": "Sam", "email": "sam@x.com", "answers": null }),
            json!({ "firstName": "Sam", "email": "sam@x.com", "answers": "" }),
            json!({ "firstName": "Sam", "email": "sam@x.com", "answers": false }),
            json!({ "firstName": "Sam", "email": "sam@x.com", "answers": 0 }),
            json!({ "firstName": 0, "email": "sam@x.com", "answers": {} }),
            json!({ "firstName": false, "email": "sam@x.com", "answers": {} }),
            json!({ "firstName": "", "email": "sam@x.com", "answers": "" }),
            json!({ "firstName": "Sam", "email": null, "answers": {} }),
            json!({}),
        ];
        for case in cases {
            match submission(case.clone()).validate() {
                Err(SubmissionError::MissingFields) => {}
                other => panic!("expected missing fields for {}, got {:?}", case, other),
            }
        }
    }

    #[test]
    fn validate_keeps_other_given_values_as_text() {
        let valid = submission(json!({ "firstName": 42, "email": "sam@x.com", "answers": "yes" }))
            .validate()
            .expect("every field is given");
        let record = LeadRecord::capture(valid);
        assert_eq!(record.first_name(), "42");
        assert_eq!(record.timeline(), None);
    }

    #[test]
    fn validate_accepts_unchecked_email_and_empty_answers() {
        let valid = submission(json!({ "firstName": "Sam", "email": "not-an-address", "answers": {} }))
            .validate()
            .expect("presence is all that is checked");
        let record = LeadRecord::capture(valid);
        assert_eq!(record.email(), "not-an-address");
        assert_eq!(record.target_band(), None);
    }

    #[test]
    fn record_maps_answer_indices() {
        let valid = submission(json!({
            "firstName": "Sam",
            "email": "sam@x.com",
            "answers": { "1": "7", "2": "urgent", "3": "Writing", "4": "none", "5": "minimal", "6": "grammar" }
        }))
        .validate()
        .expect("required fields present");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let record = LeadRecord::build(valid, at);

        assert_eq!(record.first_name(), "Sam");
        assert_eq!(record.email(), "sam@x.com");
        assert_eq!(record.target_band(), Some("7"));
        assert_eq!(record.timeline(), Some("urgent"));
        assert_eq!(record.weak_section(), Some("Writing"));
        assert_eq!(record.experience(), Some("none"));
        assert_eq!(record.study_time(), Some("minimal"));
        assert_eq!(record.challenge(), Some("grammar"));
        assert_eq!(record.timestamp(), at);
        assert_eq!(record.timestamp_iso(), "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn record_tolerates_missing_indices() {
        let valid = QuizSubmission {
            first_name: Some(json!("Ana")),
            email: Some(json!("ana@x.com")),
            answers: Some(json!({ "2": "moderate" })),
        }
        .validate()
        .expect("required fields present");
        let record = LeadRecord::capture(valid);
        assert_eq!(record.timeline(), Some("moderate"));
        assert_eq!(record.target_band(), None);
        assert_eq!(record.challenge(), None);
    }

    #[test]
    fn lead_id_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let id = LeadId::generate_at(at, &mut StdRng::seed_from_u64(7));
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "IELTS");
        assert_eq!(parts[1], at.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(id.to_string()));
    }

    #[test]
    fn lead_ids_do_not_collide() {
        let ids: HashSet<LeadId> = (0..10_000).map(|_| LeadId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
