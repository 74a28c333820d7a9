use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::TypeError;
use crate::namespace::strip_namespaces;

/// The two recognized permission document kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Legacy role-based permission definition; the merge source.
    Profile,
    /// Permission set; the merge target.
    PermissionSet,
}

impl DocumentKind {
    /// Root tag (local name) that identifies this kind.
    pub fn root_tag(&self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::PermissionSet => "PermissionSet",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_tag())
    }
}

impl FromStr for DocumentKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Profile" => Ok(Self::Profile),
            "PermissionSet" => Ok(Self::PermissionSet),
            other => Err(TypeError::UnrecognizedRoot(other.to_string())),
        }
    }
}

/// A parsed permission document: its kind plus the root element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub root: Element,
}

impl Document {
    /// Wrap a root element, detecting the kind from its local name.
    pub fn from_root(root: Element) -> Result<Self, TypeError> {
        let kind = root.local_name().parse()?;
        Ok(Self { kind, root })
    }

    /// Fail with [`TypeError::WrongKind`] unless this document is `expected`.
    pub fn expect_kind(&self, expected: DocumentKind) -> Result<(), TypeError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(TypeError::WrongKind {
                expected: expected.to_string(),
                actual: self.kind.to_string(),
            })
        }
    }

    /// Strip namespaces from every tag in the document.
    pub fn strip_namespaces(&mut self) {
        strip_namespaces(&mut self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_through_namespace() {
        let root = Element::new("{http://soap.sforce.com/2006/04/metadata}Profile");
        let doc = Document::from_root(root).unwrap();
        assert_eq!(doc.kind, DocumentKind::Profile);
    }

    #[test]
    fn rejects_unknown_root() {
        let err = Document::from_root(Element::new("CustomObject")).unwrap_err();
        assert_eq!(err, TypeError::UnrecognizedRoot("CustomObject".into()));
    }

    #[test]
    fn expect_kind_mismatch() {
        let doc = Document::from_root(Element::new("PermissionSet")).unwrap();
        assert!(doc.expect_kind(DocumentKind::PermissionSet).is_ok());
        assert!(matches!(
            doc.expect_kind(DocumentKind::Profile),
            Err(TypeError::WrongKind { .. })
        ));
    }

    #[test]
    fn kind_round_trips_through_display() {
        for kind in [DocumentKind::Profile, DocumentKind::PermissionSet] {
            assert_eq!(kind.to_string().parse::<DocumentKind>().unwrap(), kind);
        }
    }
}
