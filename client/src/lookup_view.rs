use shapepad_shared::{LookupResponse, ShapeSummary};

pub const CONNECT_FAILED_MESSAGE: &str = "Could not connect to the server.";

/// Why a request to the lookup service produced no answer. Kept apart from
/// the "no match" outcome, which is a successful answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeAccess {
    Open,
    Locked,
    PasswordProtected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupAction {
    Close,
    Retry,
    Register,
    Unlock,
    Open,
}

impl LookupAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupAction::Close => "close",
            LookupAction::Retry => "retry",
            LookupAction::Register => "register",
            LookupAction::Unlock => "unlock",
            LookupAction::Open => "open",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LookupAction::Close => "Close",
            LookupAction::Retry => "Retry",
            LookupAction::Register => "Register",
            LookupAction::Unlock => "Unlock",
            LookupAction::Open => "Open",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "close" => Some(LookupAction::Close),
            "retry" => Some(LookupAction::Retry),
            "register" => Some(LookupAction::Register),
            "unlock" => Some(LookupAction::Unlock),
            "open" => Some(LookupAction::Open),
            _ => None,
        }
    }

    pub fn is_primary(self) -> bool {
        matches!(
            self,
            LookupAction::Register | LookupAction::Unlock | LookupAction::Open
        )
    }
}

/// What the lookup result modal shows.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupView {
    Loading,
    Failed,
    Unique,
    Found {
        shape: ShapeSummary,
        access: ShapeAccess,
        similarity: Option<f32>,
    },
    Registered {
        shape: ShapeSummary,
    },
}

impl LookupView {
    pub fn from_outcome(outcome: Result<LookupResponse, LookupError>) -> Self {
        let response = match outcome {
            Ok(response) => response,
            Err(_) => return LookupView::Failed,
        };
        if !response.match_found {
            return LookupView::Unique;
        }
        match response.shape {
            Some(shape) => {
                let access = if shape.is_locked {
                    ShapeAccess::Locked
                } else if shape.is_password_protected {
                    ShapeAccess::PasswordProtected
                } else {
                    ShapeAccess::Open
                };
                LookupView::Found {
                    shape,
                    access,
                    similarity: response.similarity_score,
                }
            }
            None => LookupView::Failed,
        }
    }

    pub fn from_registration(outcome: Result<ShapeSummary, LookupError>) -> Self {
        match outcome {
            Ok(shape) => LookupView::Registered { shape },
            Err(_) => LookupView::Failed,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LookupView::Loading => "Searching...",
            LookupView::Failed => "Error",
            LookupView::Unique => "Unique Shape!",
            LookupView::Found { .. } => "Shape Found",
            LookupView::Registered { .. } => "Shape Registered",
        }
    }

    pub fn message(&self) -> String {
        match self {
            LookupView::Loading => "Comparing your drawing to registered shapes...".to_string(),
            LookupView::Failed => CONNECT_FAILED_MESSAGE.to_string(),
            LookupView::Unique => {
                "This shape hasn't been registered yet. You could be the first!".to_string()
            }
            LookupView::Found {
                access, similarity, ..
            } => {
                let mut message = "Your drawing matches this registered shape".to_string();
                if let Some(score) = similarity {
                    message.push_str(&format!(" (similarity {:.0}%)", score * 100.0));
                }
                message.push('.');
                match access {
                    ShapeAccess::Open => {}
                    ShapeAccess::Locked => {
                        message.push_str(" This shape is temporarily locked by its owner.")
                    }
                    ShapeAccess::PasswordProtected => {
                        message.push_str(" This shape is password protected.")
                    }
                }
                message
            }
            LookupView::Registered { .. } => "Your shape is now registered.".to_string(),
        }
    }

    pub fn thumbnail_svg(&self) -> Option<&str> {
        match self {
            LookupView::Found { shape, .. } | LookupView::Registered { shape } => {
                Some(&shape.thumbnail_svg)
            }
            _ => None,
        }
    }

    pub fn shape(&self) -> Option<&ShapeSummary> {
        match self {
            LookupView::Found { shape, .. } | LookupView::Registered { shape } => Some(shape),
            _ => None,
        }
    }

    /// Placeholder for the password input, when the view shows one. A
    /// unique shape may be registered with an optional password; a protected
    /// match needs one to unlock.
    pub fn password_prompt(&self) -> Option<&'static str> {
        match self {
            LookupView::Unique => Some("Password (optional)"),
            LookupView::Found {
                access: ShapeAccess::PasswordProtected,
                ..
            } => Some("Enter password"),
            _ => None,
        }
    }

    pub fn actions(&self) -> &'static [LookupAction] {
        match self {
            LookupView::Loading => &[],
            LookupView::Failed => &[LookupAction::Close],
            LookupView::Unique => &[LookupAction::Retry, LookupAction::Register],
            LookupView::Found { access, .. } => match access {
                ShapeAccess::Locked => &[LookupAction::Retry],
                ShapeAccess::PasswordProtected => &[LookupAction::Retry, LookupAction::Unlock],
                ShapeAccess::Open => &[LookupAction::Retry, LookupAction::Open],
            },
            LookupView::Registered { .. } => &[LookupAction::Close, LookupAction::Open],
        }
    }
}
