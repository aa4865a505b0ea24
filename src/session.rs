use std::fmt;

use crate::grades::{parse_grade, EvaluationResult, Status, ValidationError};
use crate::navigation::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Term {
    #[default]
    T2023_1,
    T2023_2,
    T2024_1,
    T2024_2,
}

impl Term {
    pub const ALL: [Term; 4] = [Term::T2023_1, Term::T2023_2, Term::T2024_1, Term::T2024_2];

    pub fn label(&self) -> &'static str {
        match self {
            Term::T2023_1 => "2023-1",
            Term::T2023_2 => "2023-2",
            Term::T2024_1 => "2024-1",
            Term::T2024_2 => "2024-2",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rating {
    #[default]
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Rating {
    pub const ALL: [Rating; 4] = [
        Rating::Excellent,
        Rating::Good,
        Rating::Fair,
        Rating::NeedsImprovement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::NeedsImprovement => "Needs improvement",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectEntry {
    pub subject_name: String,
    pub grade: f64,
    pub term: Term,
    pub status: Status,
}

impl SubjectEntry {
    fn new(subject_name: impl Into<String>, grade: f64, term: Term) -> Self {
        Self {
            subject_name: subject_name.into(),
            grade,
            term,
            status: Status::classify(grade),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentAck {
    pub rating: Rating,
    pub comments: String,
}

impl fmt::Display for CommentAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Evaluation saved:\nRating: {}\nComments: {}",
            self.rating, self.comments
        )
    }
}

pub fn sample_history() -> Vec<SubjectEntry> {
    vec![
        SubjectEntry::new("Programming I", 85.0, Term::T2023_1),
        SubjectEntry::new("Mathematics", 78.0, Term::T2023_1),
        SubjectEntry::new("Physics", 65.0, Term::T2023_1),
    ]
}

/// State shared between the primary and detail views for one run of the app.
#[derive(Debug, Default)]
pub struct Session {
    last_evaluation: Option<EvaluationResult>,
    history: Vec<SubjectEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_evaluation(&mut self, result: EvaluationResult) {
        self.last_evaluation = Some(result);
    }

    pub fn last_evaluation(&self) -> Option<&EvaluationResult> {
        self.last_evaluation.as_ref()
    }

    pub fn require_evaluation(&self) -> Result<&EvaluationResult, NavigationError> {
        self.last_evaluation
            .as_ref()
            .ok_or(NavigationError::NoEvaluationYet)
    }

    /// Starts a fresh history for a detail visit, seeded with the sample rows.
    pub fn open_history(&mut self) {
        self.history = sample_history();
    }

    pub fn history(&self) -> &[SubjectEntry] {
        &self.history
    }

    /// Validates a subject row and appends it to the history.
    pub fn add_subject(
        &mut self,
        name: &str,
        grade_text: &str,
        term: Term,
    ) -> Result<SubjectEntry, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingSubjectName);
        }
        if grade_text.trim().is_empty() {
            return Err(ValidationError::MissingSubjectGrade);
        }
        let grade = parse_grade("Subject grade", grade_text)?;

        let entry = SubjectEntry::new(name, grade, term);
        self.history.push(entry.clone());
        Ok(entry)
    }

    pub fn record_comments(
        &self,
        rating: Rating,
        comments: &str,
    ) -> Result<CommentAck, ValidationError> {
        if comments.trim().is_empty() {
            return Err(ValidationError::EmptyComments);
        }
        Ok(CommentAck {
            rating,
            comments: comments.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::evaluate;

    fn opened() -> Session {
        let mut session = Session::new();
        session.open_history();
        session
    }

    #[test]
    fn require_evaluation_before_any_result() {
        let session = Session::new();
        assert_eq!(
            session.require_evaluation().unwrap_err(),
            NavigationError::NoEvaluationYet
        );
    }

    #[test]
    fn last_evaluation_wins() {
        let mut session = Session::new();
        session.record_evaluation(evaluate("Ana", "85", "78", "65").unwrap());
        session.record_evaluation(evaluate("Luis", "50", "60", "40").unwrap());
        let stored = session.require_evaluation().unwrap();
        assert_eq!(stored.student_name, "Luis");
        assert_eq!(stored.status, Status::Fail);
    }

    #[test]
    fn history_is_seeded_on_open() {
        let session = opened();
        let names: Vec<_> = session
            .history()
            .iter()
            .map(|e| e.subject_name.as_str())
            .collect();
        assert_eq!(names, ["Programming I", "Mathematics", "Physics"]);
        assert_eq!(session.history()[2].status, Status::Fail);
    }

    #[test]
    fn reopening_discards_added_rows() {
        let mut session = opened();
        session.add_subject("Chemistry", "90", Term::T2024_1).unwrap();
        assert_eq!(session.history().len(), 4);
        session.open_history();
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn add_subject_classifies_grade() {
        let mut session = opened();
        let pass = session.add_subject("Chemistry", "70", Term::T2024_1).unwrap();
        assert_eq!(pass.status, Status::Pass);
        let fail = session.add_subject("Biology", "69.9", Term::T2024_2).unwrap();
        assert_eq!(fail.status, Status::Fail);

        let last = session.history().last().unwrap();
        assert_eq!(last.subject_name, "Biology");
        assert_eq!(last.term, Term::T2024_2);
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn add_subject_rejects_bad_rows_without_touching_history() {
        let mut session = opened();
        assert_eq!(
            session.add_subject("  ", "80", Term::T2023_1).unwrap_err(),
            ValidationError::MissingSubjectName
        );
        assert_eq!(
            session.add_subject("Art", "", Term::T2023_1).unwrap_err(),
            ValidationError::MissingSubjectGrade
        );
        assert!(matches!(
            session.add_subject("Art", "101", Term::T2023_1).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));
        assert!(matches!(
            session.add_subject("Art", "1.2.3", Term::T2023_1).unwrap_err(),
            ValidationError::NotANumber { .. }
        ));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn comments_are_required() {
        let session = opened();
        assert_eq!(
            session.record_comments(Rating::Good, " \n ").unwrap_err(),
            ValidationError::EmptyComments
        );
        let ack = session
            .record_comments(Rating::NeedsImprovement, "Keep practicing")
            .unwrap();
        assert_eq!(ack.rating, Rating::NeedsImprovement);
        assert_eq!(
            ack.to_string(),
            "Evaluation saved:\nRating: Needs improvement\nComments: Keep practicing"
        );
    }

    #[test]
    fn labels_match_selectors() {
        let terms: Vec<_> = Term::ALL.iter().map(Term::label).collect();
        assert_eq!(terms, ["2023-1", "2023-2", "2024-1", "2024-2"]);
        assert_eq!(Rating::default().label(), "Excellent");
    }
}
