use std::fmt;

use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;
pub const PASSING_GRADE: f64 = 70.0;
pub const PARTIAL_COUNT: usize = 3;

/// Everything that can go wrong while reading a form. Each message names the
/// field the user has to fix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The student name is required")]
    MissingName,
    #[error("The student name cannot be longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("The grade for partial {position} is required")]
    MissingGrade { position: usize },
    #[error("{field}: enter a valid number")]
    NotANumber { field: String },
    #[error("{field}: grades must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
    #[error("Enter the subject name")]
    MissingSubjectName,
    #[error("Enter the subject grade")]
    MissingSubjectGrade,
    #[error("Please enter a comment before saving")]
    EmptyComments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// Applies the passing threshold, which is inclusive.
    pub fn classify(value: f64) -> Self {
        if value >= PASSING_GRADE {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

/// A validated submission of the primary form.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub grades: [f64; PARTIAL_COUNT],
}

impl StudentRecord {
    pub fn average(&self) -> f64 {
        self.grades.iter().sum::<f64>() / PARTIAL_COUNT as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub student_name: String,
    pub average: f64,
    pub status: Status,
}

impl From<&StudentRecord> for EvaluationResult {
    fn from(record: &StudentRecord) -> Self {
        let average = record.average();
        Self {
            student_name: record.name.clone(),
            average,
            status: Status::classify(average),
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Average: {:.2} - {}",
            self.student_name, self.average, self.status
        )
    }
}

/// Trims and checks a student name.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Parses a grade typed into a text field and range-checks it.
///
/// Empty text is reported by the caller, since the message differs between
/// the partial grades and the subject form; here it surfaces as
/// `NotANumber`. Non-finite spellings such as `inf` or `NaN` are not grades.
pub fn parse_grade(field: &str, text: &str) -> Result<f64, ValidationError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
        });
    }
    if !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: MIN_GRADE,
            max: MAX_GRADE,
        });
    }
    Ok(value)
}

/// Validates the primary form into a [`StudentRecord`].
///
/// The name is checked first, then the partials in order; the first problem
/// found is returned and nothing is computed.
pub fn validate_record(
    name: &str,
    grades: [&str; PARTIAL_COUNT],
) -> Result<StudentRecord, ValidationError> {
    let name = validate_name(name)?;
    let mut parsed = [0.0; PARTIAL_COUNT];
    for (idx, text) in grades.iter().enumerate() {
        let position = idx + 1;
        if text.trim().is_empty() {
            return Err(ValidationError::MissingGrade { position });
        }
        parsed[idx] = parse_grade(&format!("Partial {position}"), text)?;
    }
    Ok(StudentRecord {
        name,
        grades: parsed,
    })
}

/// Computes the average and pass/fail status for a student.
pub fn evaluate(
    name: &str,
    grade1: &str,
    grade2: &str,
    grade3: &str,
) -> Result<EvaluationResult, ValidationError> {
    let record = validate_record(name, [grade1, grade2, grade3])?;
    Ok(EvaluationResult::from(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mixed_grades_pass() {
        let result = evaluate("Ana", "85", "78", "65").unwrap();
        assert_eq!(result.student_name, "Ana");
        assert!(close(result.average, 76.0));
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.to_string(), "Ana - Average: 76.00 - PASS");
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = evaluate("Ana", "70", "70", "70").unwrap();
        assert!(close(result.average, 70.0));
        assert_eq!(result.status, Status::Pass);
    }

    #[test]
    fn just_below_threshold_fails() {
        let result = evaluate("Ana", "69.99", "70", "70").unwrap();
        assert!(result.average < PASSING_GRADE);
        assert!(close(result.average, 209.99 / 3.0));
        assert_eq!(result.status, Status::Fail);
    }

    #[test]
    fn name_is_trimmed() {
        let result = evaluate("  Luis  ", "100", "100", "100").unwrap();
        assert_eq!(result.student_name, "Luis");
    }

    #[test]
    fn missing_name_is_reported_first() {
        assert_eq!(
            evaluate("   ", "", "", "").unwrap_err(),
            ValidationError::MissingName
        );
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            evaluate(&name, "1", "2", "3").unwrap_err(),
            ValidationError::NameTooLong {
                max: MAX_NAME_LENGTH
            }
        );
        let name = "ñ".repeat(MAX_NAME_LENGTH);
        assert!(evaluate(&name, "1", "2", "3").is_ok());
    }

    #[test]
    fn missing_grade_names_position() {
        assert_eq!(
            evaluate("Ana", "80", " ", "90").unwrap_err(),
            ValidationError::MissingGrade { position: 2 }
        );
    }

    #[test]
    fn out_of_range_grades_rejected() {
        let err = evaluate("Ana", "80", "90", "100.5").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "Partial 3"));
        let err = evaluate("Ana", "-1", "90", "100").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "Partial 1"));
    }

    #[test]
    fn unparseable_grades_rejected() {
        for bad in ["1.2.3", ".", "abc", "NaN", "inf"] {
            let err = evaluate("Ana", "80", bad, "90").unwrap_err();
            assert_eq!(
                err,
                ValidationError::NotANumber {
                    field: "Partial 2".to_string()
                },
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn classify_uses_threshold() {
        assert_eq!(Status::classify(70.0), Status::Pass);
        assert_eq!(Status::classify(69.9), Status::Fail);
        assert_eq!(Status::classify(100.0), Status::Pass);
    }

    proptest! {
        #[test]
        fn average_matches_mean(
            g1 in 0.0f64..=100.0,
            g2 in 0.0f64..=100.0,
            g3 in 0.0f64..=100.0,
        ) {
            let result = evaluate("Ana", &g1.to_string(), &g2.to_string(), &g3.to_string()).unwrap();
            let expected = (g1 + g2 + g3) / 3.0;
            prop_assume!((expected - PASSING_GRADE).abs() > 1e-9);
            prop_assert!(close(result.average, expected));
            prop_assert_eq!(result.status == Status::Pass, expected >= PASSING_GRADE);
        }

        #[test]
        fn out_of_range_never_evaluates(g in 100.0001f64..1e6) {
            let text = g.to_string();
            let rejected = evaluate("Ana", "50", "50", &text).is_err();
            prop_assert!(rejected);
        }
    }
}
