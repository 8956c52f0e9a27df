//! Label fallback chain shared by the differ and the edit-distance engine

use crate::model::{Attributes, GraphEdge, GraphNode};

/// Attribute keys tried in order when deriving a label.
pub const LABEL_KEYS: [&str; 7] = [
    "label",
    "CODE",
    "SIGNATURE",
    "METHOD_FULL_NAME",
    "NAME",
    "VARIABLE",
    "labelE",
];

/// Signature of a label function, usable wherever a custom labelling is accepted.
pub type LabelFn = fn(&Attributes) -> String;

/// Derive a label from an attribute bag.
///
/// Returns the first present, non-null value among [`LABEL_KEYS`], or the
/// empty string when none is set.
pub fn label(attributes: &Attributes) -> String {
    LABEL_KEYS
        .iter()
        .filter_map(|key| attributes.get(*key))
        .find(|value| !value.is_null())
        .map(|value| value.to_string())
        .unwrap_or_default()
}

pub fn node_label(node: &GraphNode) -> String {
    label(&node.attributes)
}

pub fn edge_label(edge: &GraphEdge) -> String {
    label(&edge.attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{attrs, AttrValue};

    #[test]
    fn test_first_present_key_wins() {
        let a = attrs([("NAME", "name"), ("CODE", "x = 1"), ("labelE", "AST")]);
        assert_eq!(label(&a), "x = 1");
    }

    #[test]
    fn test_null_values_are_skipped() {
        let mut a = Attributes::new();
        a.insert("label".to_string(), AttrValue::Null);
        a.insert("SIGNATURE".to_string(), AttrValue::from("int(int)"));
        assert_eq!(label(&a), "int(int)");
    }

    #[test]
    fn test_missing_keys_yield_empty_label() {
        assert_eq!(label(&Attributes::new()), "");
        assert_eq!(label(&attrs([("LINE_NUMBER", 3i64)])), "");
    }

    #[test]
    fn test_numeric_labels_are_stringified() {
        assert_eq!(label(&attrs([("label", 42i64)])), "42");
    }
}
