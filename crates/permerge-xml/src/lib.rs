//! XML layer for permerge.
//!
//! Turns permission document text into [`permerge_types::Element`] trees and
//! back. Parsing is namespace-aware (tags bound to a namespace come out in
//! Clark notation); writing is deterministic and indented so merged files
//! diff cleanly against the originals.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XmlError, XmlResult};
pub use reader::{parse_document, parse_element};
pub use writer::{write_document, write_element, WriteOptions, XML_DECLARATION};
