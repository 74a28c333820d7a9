use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unrecognized document root <{0}>: expected <Profile> or <PermissionSet>")]
    UnrecognizedRoot(String),

    #[error("expected a {expected} document, got {actual}")]
    WrongKind { expected: String, actual: String },
}
