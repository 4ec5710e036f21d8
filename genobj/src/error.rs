use std::sync::Arc;

use thiserror::Error;

/// Why a message was answered with the False Sentinel.
///
/// [`Receiver::send`](crate::Receiver::send) never surfaces these; they are
/// only visible through [`Object::try_send`](crate::Object::try_send) and in
/// trace logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("`{selector}` sent to class `{class}` instead of an instance")]
    NotAnInstance { class: Arc<str>, selector: String },
    #[error("`{0}` is not a valid selector")]
    InvalidSelector(String),
    #[error("key `{key}` is not allowed for class `{class}`")]
    KeyNotAllowed { class: Arc<str>, key: String },
    #[error("key `{0}` is not set")]
    KeyNotFound(String),
    #[error("`{0}` requires a value")]
    MissingArgument(String),
    #[error("`{0}` requires a scalar key")]
    NotAScalarKey(String),
}
