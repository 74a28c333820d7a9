use permerge_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document has no root element")]
    Empty,

    #[error("document has more than one root element (second: <{0}>)")]
    MultipleRoots(String),

    #[error("unexpected end of document inside <{0}>")]
    Unclosed(String),

    #[error(transparent)]
    Document(#[from] TypeError),
}

pub type XmlResult<T> = Result<T, XmlError>;
