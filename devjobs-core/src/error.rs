/// Structured error types for devjobs-core.
///
/// Library consumers get `thiserror` enums; the `devjobs` binary wraps them in
/// `anyhow` with context at the command boundary.

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::registration::TransitionError;
use crate::validation::ValidationErrors;

/// Failure of a single remote call, classified the way the pages report it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The endpoint answered with a non-2xx status, or with a body we could not read.
    #[error("server responded with status {status}")]
    Response { status: u16, body: Option<Value> },

    /// The request went out but nothing came back (connection refused, reset, timeout).
    #[error("no response received: {reason}")]
    NoResponse { reason: String },

    /// The request could not be built or dispatched at all.
    #[error("request could not be sent: {reason}")]
    RequestSetup { reason: String },
}

/// The three failure causes, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Response,
    NoResponse,
    RequestSetup,
}

impl FetchError {
    pub fn response(status: u16, body: Option<Value>) -> Self {
        Self::Response { status, body }
    }

    pub fn no_response(reason: impl Into<String>) -> Self {
        Self::NoResponse {
            reason: reason.into(),
        }
    }

    pub fn request_setup(reason: impl Into<String>) -> Self {
        Self::RequestSetup {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Response { .. } => FailureKind::Response,
            Self::NoResponse { .. } => FailureKind::NoResponse,
            Self::RequestSetup { .. } => FailureKind::RequestSetup,
        }
    }

    /// Status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// First message the server attached to one of `fields`, in the order given.
    ///
    /// Django REST style bodies look like `{"username": ["already taken"]}`.
    pub fn field_error(&self, fields: &[&str]) -> Option<String> {
        let Self::Response {
            body: Some(Value::Object(map)),
            ..
        } = self
        else {
            return None;
        };

        fields.iter().find_map(|field| match map.get(*field)? {
            Value::Array(messages) => messages.first().and_then(|m| m.as_str()).map(String::from),
            Value::String(message) => Some(message.clone()),
            _ => None,
        })
    }

    /// First message attached to any field of the error body.
    pub fn any_field_error(&self) -> Option<String> {
        let Self::Response {
            body: Some(Value::Object(map)),
            ..
        } = self
        else {
            return None;
        };
        let fields: Vec<&str> = map.keys().map(String::as_str).collect();
        self.field_error(&fields)
    }
}

/// Main error type for devjobs-core operations
#[derive(Error, Debug)]
pub enum DevJobsError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A config or session file is not valid TOML
    #[error("Invalid TOML in {path:?}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Serializing a config or session file failed
    #[error("Failed to serialize {what}: {source}")]
    TomlSerialize {
        what: &'static str,
        source: toml::ser::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A remote call failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Form input rejected before submission
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Registration flow received an event its current step does not accept
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// An operation needs a logged-in session
    #[error("Not logged in. Run: devjobs login")]
    NotAuthenticated,
}

/// Result type alias for devjobs-core operations
pub type Result<T> = std::result::Result<T, DevJobsError>;

impl DevJobsError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub fn toml_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::TomlParse {
            path: path.into(),
            source,
        }
    }
}
