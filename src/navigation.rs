use thiserror::Error;

use crate::session::Session;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Calculate the student's average before opening the details")]
    NoEvaluationYet,
    #[error("The details view is disabled in this configuration")]
    DetailDisabled,
    #[error("Action cancelled")]
    ConfirmationDeclined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Primary,
    /// Modal over `Primary`; the primary form is inert while it is shown.
    Detail,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    CloseApp,
    ExitApp,
}

impl Prompt {
    pub fn message(&self) -> &'static str {
        match self {
            Prompt::CloseApp => "Do you want to close the application?",
            Prompt::ExitApp => "Do you want to exit the application?",
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    view: View,
    pending: Option<Prompt>,
    details_enabled: bool,
}

impl Navigator {
    pub fn new(details_enabled: bool) -> Self {
        Self {
            view: View::Primary,
            pending: None,
            details_enabled,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pending_prompt(&self) -> Option<Prompt> {
        self.pending
    }

    pub fn details_enabled(&self) -> bool {
        self.details_enabled
    }

    /// Enters the detail view if a result exists. Opening while already in
    /// the detail view, or after termination, does nothing.
    pub fn open_detail(&mut self, session: &Session) -> Result<(), NavigationError> {
        if self.view != View::Primary {
            return Ok(());
        }
        if !self.details_enabled {
            return Err(NavigationError::DetailDisabled);
        }
        session.require_evaluation()?;
        self.view = View::Detail;
        tracing::info!("opened details view");
        Ok(())
    }

    pub fn back(&mut self) {
        if self.view == View::Detail {
            self.view = View::Primary;
            self.pending = None;
            tracing::info!("returned to primary view");
        }
    }

    /// "Exit" from the detail view. Asks before terminating.
    pub fn request_exit(&mut self) {
        if self.view == View::Detail {
            self.pending = Some(Prompt::ExitApp);
        }
    }

    /// Window close. From the detail view this behaves like "Exit".
    pub fn request_close(&mut self) {
        self.pending = match self.view {
            View::Primary => Some(Prompt::CloseApp),
            View::Detail => Some(Prompt::ExitApp),
            View::Terminated => None,
        };
    }

    /// Answers the pending prompt.
    ///
    /// Returns the resulting view. Declining leaves the view as it was and
    /// reports `ConfirmationDeclined`. With no prompt pending nothing changes.
    pub fn resolve(&mut self, confirmed: bool) -> Result<View, NavigationError> {
        let Some(prompt) = self.pending.take() else {
            return Ok(self.view);
        };
        if !confirmed {
            tracing::warn!(?prompt, "confirmation declined");
            return Err(NavigationError::ConfirmationDeclined);
        }
        self.view = View::Terminated;
        tracing::info!(?prompt, "application terminating");
        Ok(self.view)
    }
}
