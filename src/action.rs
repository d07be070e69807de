use crate::error::{RepopageError, Result};
use crate::paging::PageRequest;
use crate::types::Repository;
use crate::ui::Viewport;

#[derive(Debug)]
pub enum Action {
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Loading
    Load,
    /// Login of the authenticated user, tagged with the lookup it answers.
    UserResolved(u64, String),
    Refresh,
    PageFetched(PageRequest, Result<Vec<Repository>>),

    // Reported by the list view after each draw
    RowsVisible(Viewport),

    // Navigation
    OpenInBrowser,
    YankUrl,
    ShowAbout,

    // User prompt
    EnterUserPrompt,
    PromptInput(char),
    PromptBackspace,
    PromptConfirm,
    PromptCancel,

    Error(String),
    None,
}

impl Action {
    /// Actions that come straight from a key press. These dismiss any
    /// error or notice currently in the status bar.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Action::Back
                | Action::ScrollUp
                | Action::ScrollDown
                | Action::PageUp
                | Action::PageDown
                | Action::GoToTop
                | Action::GoToBottom
                | Action::Refresh
                | Action::OpenInBrowser
                | Action::YankUrl
                | Action::ShowAbout
                | Action::EnterUserPrompt
        )
    }
}

impl From<RepopageError> for Action {
    fn from(err: RepopageError) -> Self {
        Action::Error(err.to_string())
    }
}
