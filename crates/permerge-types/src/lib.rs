//! Foundation types for permerge.
//!
//! This crate provides the tree model shared by the XML layer, the merge
//! engine, and the CLI. Every other permerge crate depends on
//! `permerge-types`.
//!
//! # Key Types
//!
//! - [`Element`]: Tag, attributes, optional scalar text, ordered children
//! - [`Document`] / [`DocumentKind`]: A root element tagged as Profile or PermissionSet
//! - [`FieldMap`]: Insertion-ordered field name to text mapping
//! - [`strip_namespace`] / [`strip_namespaces`]: Namespace normalization

pub mod document;
pub mod element;
pub mod error;
pub mod fields;
pub mod namespace;

pub use document::{Document, DocumentKind};
pub use element::Element;
pub use error::TypeError;
pub use fields::FieldMap;
pub use namespace::{is_namespace_free, strip_namespace, strip_namespaces};
