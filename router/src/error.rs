use std::borrow::Cow;
use thiserror::Error;

/// Concrete errors that occur while registering routes or building urls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// the route pattern could not be parsed or conflicts with a
    /// pattern that was already registered at the same position
    #[error("invalid route pattern {pattern:?}: {reason}")]
    Pattern {
        /// the pattern as it was provided
        pattern: String,
        /// a human readable explanation
        reason: Cow<'static, str>,
    },

    /// a verb or scope method received a number of arguments it does
    /// not understand
    #[error("invalid number of arguments ({0})")]
    ArgumentCount(usize),

    /// a verb or scope method received arguments in an order it does
    /// not understand
    #[error("arguments were sent in invalid sequence")]
    ArgumentSequence,

    /// a url was built from a template that references a parameter
    /// that was not provided
    #[error("missing parameter {0:?}")]
    MissingParameter(String),

    /// a url parameter was provided but cannot be rendered into a path
    #[error("parameter {0:?} cannot be rendered into a path")]
    InvalidParameter(String),

    /// no route was registered with this name
    #[error("named route ({0}) does not exist")]
    NamedRouteNotFound(String),
}

impl Error {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// this crate's result type
pub type Result<T> = std::result::Result<T, Error>;
