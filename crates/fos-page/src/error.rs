//! Page errors

use std::fmt;
use std::rc::Rc;

/// Error shared between a service, the page that created it and the host
pub type SharedError = Rc<anyhow::Error>;

/// Which strategy operation a transition failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Show,
    Hide,
}

impl fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Hide => f.write_str("hide"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The page's action cannot be invoked
    #[error("action of page '{page}' is not a function")]
    ActionType { page: String },

    /// The action ran and failed
    #[error("action of page '{page}' failed")]
    Action {
        page: String,
        #[source]
        source: anyhow::Error,
    },

    /// The display strategy failed to complete a transition
    #[error("{phase} transition of page '{page}' failed")]
    Transition {
        page: String,
        phase: TransitionPhase,
        #[source]
        source: anyhow::Error,
    },

    #[error("page '{page}' is closed")]
    Closed { page: String },
}

impl PageError {
    /// Name of the page the error belongs to
    pub fn page(&self) -> &str {
        match self {
            Self::ActionType { page }
            | Self::Action { page, .. }
            | Self::Transition { page, .. }
            | Self::Closed { page } => page,
        }
    }
}
