//! Namespace stripping for element tags.
//!
//! Parsed tags arrive either in Clark notation (`{uri}local`) or as prefixed
//! names (`ns:local`). Section matching works on the bare local name, and the
//! merged output carries no namespaces at all.

use crate::element::Element;

/// Return the local part of a tag.
///
/// Everything up to and including the last `}` is removed, then everything
/// up to and including the last `:`. Tags without either separator are
/// returned unchanged. The result never contains a separator, so stripping
/// twice is the same as stripping once.
///
/// ```
/// use permerge_types::strip_namespace;
///
/// assert_eq!(strip_namespace("{http://soap.sforce.com/2006/04/metadata}label"), "label");
/// assert_eq!(strip_namespace("sf:label"), "label");
/// assert_eq!(strip_namespace("label"), "label");
/// ```
pub fn strip_namespace(tag: &str) -> &str {
    let tag = match tag.rsplit_once('}') {
        Some((_, local)) => local,
        None => tag,
    };
    match tag.rsplit_once(':') {
        Some((_, local)) => local,
        None => tag,
    }
}

/// Rewrite the tag of `element` and all of its descendants to their local
/// names. Text and attributes are left untouched.
pub fn strip_namespaces(element: &mut Element) {
    let local = strip_namespace(&element.tag);
    if local.len() != element.tag.len() {
        element.tag = local.to_string();
    }
    for child in &mut element.children {
        strip_namespaces(child);
    }
}

/// Returns `true` if no tag in the tree carries a namespace.
pub fn is_namespace_free(element: &Element) -> bool {
    strip_namespace(&element.tag) == element.tag
        && element.children.iter().all(is_namespace_free)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NS: &str = "{http://soap.sforce.com/2006/04/metadata}";

    fn namespaced_tree() -> Element {
        Element::new(format!("{NS}PermissionSet"))
            .with_child(Element::leaf(format!("{NS}label"), "Sales"))
            .with_child(
                Element::new(format!("{NS}objectPermissions"))
                    .with_child(Element::leaf(format!("{NS}object"), "Account"))
                    .with_child(Element::leaf("x:allowRead", "true")),
            )
    }

    #[test]
    fn strips_clark_notation() {
        assert_eq!(strip_namespace("{urn:a}tabSettings"), "tabSettings");
    }

    #[test]
    fn strips_prefix() {
        assert_eq!(strip_namespace("sf:tabSettings"), "tabSettings");
    }

    #[test]
    fn clark_notation_wins_over_colon_in_uri() {
        assert_eq!(strip_namespace("{http://x.y/z}field"), "field");
    }

    #[test]
    fn plain_tag_unchanged() {
        assert_eq!(strip_namespace("userPermissions"), "userPermissions");
    }

    #[test]
    fn strips_whole_tree() {
        let mut tree = namespaced_tree();
        assert!(!is_namespace_free(&tree));

        strip_namespaces(&mut tree);

        assert!(is_namespace_free(&tree));
        assert_eq!(tree.tag, "PermissionSet");
        assert_eq!(tree.children[0].tag, "label");
        assert_eq!(tree.children[1].children[1].tag, "allowRead");
    }

    #[test]
    fn values_untouched() {
        let mut tree = Element::new("root").with_child(Element::leaf("{u}f", " a:b "));
        strip_namespaces(&mut tree);
        assert_eq!(tree.children[0].text.as_deref(), Some(" a:b "));
    }

    #[test]
    fn repeated_separators_cut_at_the_last() {
        assert_eq!(strip_namespace("a:b:c"), "c");
        assert_eq!(strip_namespace("{u}{v}x"), "x");
        assert_eq!(strip_namespace("{urn:a}p:x"), "x");
        assert_eq!(strip_namespace(strip_namespace("a:b:c")), "c");
    }

    #[test]
    fn stripping_is_idempotent() {
        let mut once = namespaced_tree();
        strip_namespaces(&mut once);
        let mut twice = once.clone();
        strip_namespaces(&mut twice);
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn strip_namespace_is_idempotent(tag in "[a-zA-Z{}:/._]{0,24}") {
            let once = strip_namespace(&tag);
            prop_assert_eq!(strip_namespace(once), once);
        }

        #[test]
        fn tree_stripping_is_idempotent(
            tags in proptest::collection::vec("[a-z]{0,3}[{}:]?[a-zA-Z]{1,8}", 1..6)
        ) {
            let mut tree = Element::new(tags[0].clone());
            for tag in &tags[1..] {
                tree.push(Element::leaf(tag.clone(), "v"));
            }
            strip_namespaces(&mut tree);
            let once = tree.clone();
            strip_namespaces(&mut tree);
            prop_assert_eq!(once, tree);
        }
    }
}
