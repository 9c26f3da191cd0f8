use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display};

/// Upper bound (exclusive) of the random offset added to the current millisecond timestamp.
const ID_RANDOM_OFFSET: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl StudentId {
    /// Current time in milliseconds plus a random offset, re-rolled while it clashes with `taken`.
    ///
    /// This is collision-improbable rather than collision-free: two processes writing the same file
    /// could still pick the same value.
    pub fn generate(taken: &HashSet<Self>) -> Self {
        let mut rng = rng();
        loop {
            let now = u64::try_from(jiff::Timestamp::now().as_millisecond()).unwrap_or_default();
            let candidate = Self(now + rng.random_range(0..ID_RANDOM_OFFSET));
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Compares against an ID as it arrives in a URL path.
    pub fn matches(self, raw: &str) -> bool {
        self.0.to_string() == raw.trim()
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a user supplies about a student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gmail: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub year_level: String,
    #[serde(default)]
    pub university: String,
}

impl StudentDetails {
    pub fn trimmed(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        Self {
            student_id: trim(self.student_id),
            name: trim(self.name),
            gmail: trim(self.gmail),
            gender: trim(self.gender),
            program: trim(self.program),
            year_level: trim(self.year_level),
            university: trim(self.university),
        }
    }
}

/// A stored student; always carries an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub details: StudentDetails,
}

/// A student as found in the roster file or in a create request, where the ID may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
    #[serde(flatten)]
    pub details: StudentDetails,
}

impl StudentRecord {
    pub fn has_required_fields(&self) -> bool {
        !self.details.student_id.trim().is_empty() && !self.details.name.trim().is_empty()
    }

    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            details: self.details,
        }
    }
}

impl From<Student> for StudentRecord {
    fn from(Student { id, details }: Student) -> Self {
        Self {
            id: Some(id),
            details,
        }
    }
}

impl From<StudentDetails> for StudentRecord {
    fn from(details: StudentDetails) -> Self {
        Self { id: None, details }
    }
}
