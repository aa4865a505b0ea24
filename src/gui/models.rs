use crate::grades::PARTIAL_COUNT;
use crate::session::{Rating, Term};

/// Text currently typed into the primary form.
#[derive(Debug, Clone, Default)]
pub struct PrimaryForm {
    pub student_name: String,
    pub partials: [String; PARTIAL_COUNT],
}

impl PrimaryForm {
    pub fn partial_refs(&self) -> [&str; PARTIAL_COUNT] {
        [
            self.partials[0].as_str(),
            self.partials[1].as_str(),
            self.partials[2].as_str(),
        ]
    }
}

/// Text and selections of the detail view. Recreated on every visit.
#[derive(Debug, Clone, Default)]
pub struct DetailForm {
    pub subject_name: String,
    pub subject_grade: String,
    pub term: Term,
    pub rating: Rating,
    pub comments: String,
}

impl DetailForm {
    pub fn clear_subject(&mut self) {
        self.subject_name.clear();
        self.subject_grade.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "Information",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        }
    }
}

/// A message the user has to acknowledge before doing anything else.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}
