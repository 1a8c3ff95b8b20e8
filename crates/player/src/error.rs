use std::fmt;

use thiserror::Error;

/// Remote endpoints of the chess service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Opponent reply
    Move,
    /// Free-text move interpretation
    Parse,
    /// Advice
    Help,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Move => "/move",
            Endpoint::Parse => "/parse",
            Endpoint::Help => "/help",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0} not set")]
    Missing(&'static str),

    #[error("Configuration error: invalid {0} value '{1}'")]
    Invalid(&'static str, String),
}

/// Failure of one remote round-trip.
///
/// `Parse`, `Opponent` and `Advice` mean the service answered but the answer
/// was unusable: a rejection status, a malformed body, or a game that does
/// not continue the current one. `Transport` means no answer arrived.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Move not understood: {0}")]
    Parse(String),

    #[error("Opponent failed to move: {0}")]
    Opponent(String),

    #[error("Advice unavailable: {0}")]
    Advice(String),

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
}

impl MoveError {
    /// The stage-specific rejection for `endpoint`.
    pub fn rejected(endpoint: Endpoint, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match endpoint {
            Endpoint::Parse => MoveError::Parse(detail),
            Endpoint::Move => MoveError::Opponent(detail),
            Endpoint::Help => MoveError::Advice(detail),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            MoveError::Parse(_) => Endpoint::Parse,
            MoveError::Opponent(_) => Endpoint::Move,
            MoveError::Advice(_) => Endpoint::Help,
            MoveError::Transport { endpoint, .. } => *endpoint,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, MoveError::Transport { .. })
    }

    /// Text shown to the player. Every failure leaves the game as it was,
    /// so each message says what to do next.
    pub fn user_message(&self, opponent: &str) -> String {
        match self {
            MoveError::Parse(_) => format!(
                "Either the move is invalid or {opponent} didn't understand it. \
                 Please try again or be more specific."
            ),
            MoveError::Opponent(_) => format!(
                "{opponent} got stumped and gave up. You are smarter than a language model. \
                 Type /retry to ask again or /new to start over."
            ),
            MoveError::Advice(_) => {
                format!("{opponent} could not come up with advice right now. Please try again.")
            }
            MoveError::Transport { endpoint, .. } => {
                let retry = match endpoint {
                    Endpoint::Move => "Type /retry to ask for the reply again.",
                    Endpoint::Parse | Endpoint::Help => "Please try again.",
                };
                format!("Could not reach the chess service. {retry}")
            }
        }
    }
}
