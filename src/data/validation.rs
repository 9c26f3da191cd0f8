use crate::data::student::StudentDetails;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StudentField {
    StudentId,
    Name,
    Gmail,
    Gender,
    Program,
    YearLevel,
    University,
}

impl StudentField {
    pub const ALL: [Self; 7] = [
        Self::StudentId,
        Self::Name,
        Self::Gmail,
        Self::Gender,
        Self::Program,
        Self::YearLevel,
        Self::University,
    ];

    /// Name of the form input, matching the JSON key.
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::StudentId => "studentId",
            Self::Name => "name",
            Self::Gmail => "gmail",
            Self::Gender => "gender",
            Self::Program => "program",
            Self::YearLevel => "yearLevel",
            Self::University => "university",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StudentId => "Student ID",
            Self::Name => "Full Name",
            Self::Gmail => "Gmail",
            Self::Gender => "Gender",
            Self::Program => "Program",
            Self::YearLevel => "Year Level",
            Self::University => "University",
        }
    }

    pub fn value(self, details: &StudentDetails) -> &str {
        match self {
            Self::StudentId => &details.student_id,
            Self::Name => &details.name,
            Self::Gmail => &details.gmail,
            Self::Gender => &details.gender,
            Self::Program => &details.program,
            Self::YearLevel => &details.year_level,
            Self::University => &details.university,
        }
    }
}

pub type FieldErrors = BTreeMap<StudentField, &'static str>;

fn is_valid_student_id(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// One `@` with something on both sides, and a domain holding a dot that is neither first nor last.
fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn check_field(field: StudentField, value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("This field is required.");
    }

    match field {
        StudentField::StudentId if !is_valid_student_id(value) => {
            Some("Student ID must contain only letters, numbers, and hyphens.")
        }
        StudentField::Gmail if !is_email_shaped(value) => Some("Invalid email format."),
        _ => None,
    }
}

/// Checks a submitted form, returning the trimmed details or one message per failing field.
pub fn validate_student_form(details: StudentDetails) -> Result<StudentDetails, FieldErrors> {
    let details = details.trimmed();

    let errors: FieldErrors = StudentField::ALL
        .into_iter()
        .filter_map(|field| check_field(field, field.value(&details)).map(|msg| (field, msg)))
        .collect();

    if errors.is_empty() {
        Ok(details)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_details() -> StudentDetails {
        StudentDetails {
            student_id: "2024-0001".into(),
            name: "Ann Lee".into(),
            gmail: "ann@gmail.com".into(),
            gender: "Female".into(),
            program: "BSCS".into(),
            year_level: "1st Year".into(),
            university: "State University".into(),
        }
    }

    #[test]
    fn valid_form_passes_and_is_trimmed() {
        let details = StudentDetails {
            name: "  Ann Lee ".into(),
            ..valid_details()
        };

        let validated = validate_student_form(details).unwrap();
        assert_eq!(validated.name, "Ann Lee");
    }

    #[test]
    fn every_empty_field_is_required() {
        let errors = validate_student_form(StudentDetails::default()).unwrap_err();

        assert_eq!(errors.len(), StudentField::ALL.len());
        assert!(errors.values().all(|msg| *msg == "This field is required."));
    }

    #[test]
    fn student_id_allows_letters_digits_and_hyphens_only() {
        assert!(is_valid_student_id("AB-12-cd"));
        assert!(!is_valid_student_id("AB 12"));
        assert!(!is_valid_student_id("AB_12"));

        let errors = validate_student_form(StudentDetails {
            student_id: "S#1".into(),
            ..valid_details()
        })
        .unwrap_err();
        assert_eq!(
            errors.get(&StudentField::StudentId),
            Some(&"Student ID must contain only letters, numbers, and hyphens.")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn email_needs_a_dotted_domain() {
        assert!(is_email_shaped("a@b.com"));
        assert!(is_email_shaped("first.last@mail.school.edu"));
        assert!(!is_email_shaped("a@b"));
        assert!(!is_email_shaped("@b.com"));
        assert!(!is_email_shaped("a@.com"));
        assert!(!is_email_shaped("a@b."));
        assert!(!is_email_shaped("a@b@c.com"));

        // only the shape matters, not the finer address rules
        assert!(is_email_shaped("john doe@gmail.com"));
        assert!(is_email_shaped("a..b@c.com"));
        assert!(is_email_shaped("a@b.c."));
        assert!(is_email_shaped("(x)@y.com"));
        assert!(is_email_shaped(&format!("{}@school.edu", "x".repeat(70))));

        let errors = validate_student_form(StudentDetails {
            gmail: "not-an-email".into(),
            ..valid_details()
        })
        .unwrap_err();
        assert_eq!(errors.get(&StudentField::Gmail), Some(&"Invalid email format."));
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let errors = validate_student_form(StudentDetails {
            program: "   ".into(),
            ..valid_details()
        })
        .unwrap_err();
        assert_eq!(
            errors.get(&StudentField::Program),
            Some(&"This field is required.")
        );
    }
}
