//! Flattening of `variantes_dialectales` into `"region/sub-region: forms"` lines.
//!
//! Sources nest regions to arbitrary depth, and some entries skip the region
//! level entirely and give a bare list or string. A list always emits its line,
//! even when it holds no forms. Nothing here fails.

use simi_types::{FieldValue, scalar_text};

/// Flatten one record's variant structure in mapping order.
pub fn flatten_variants(node: &FieldValue) -> Vec<String> {
    let mut lines = Vec::new();
    flatten_into(node, None, &mut lines);
    lines
}

fn flatten_into(node: &FieldValue, path: Option<&str>, lines: &mut Vec<String>) {
    match node {
        FieldValue::Nested(regions) => {
            for (region, value) in regions {
                let key = match path {
                    Some(prefix) => format!("{prefix}/{region}"),
                    None => region.clone(),
                };
                flatten_into(value, Some(&key), lines);
            }
        }
        FieldValue::List(items) => {
            let forms: Vec<String> = items.iter().filter_map(scalar_text).collect();
            lines.push(format!("{}: {}", path.unwrap_or(""), forms.join(", ")));
        }
        FieldValue::Text(form) => lines.push(format!("{}: {form}", path.unwrap_or(""))),
        FieldValue::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(value: serde_json::Value) -> Vec<String> {
        let node: FieldValue = serde_json::from_value(value).expect("variant value");
        flatten_variants(&node)
    }

    #[test]
    fn nested_regions_join_with_slash() {
        assert_eq!(
            flatten(json!({"Peru": {"Cusco": ["qasi", "qhasi"]}})),
            vec!["Peru/Cusco: qasi, qhasi"]
        );
    }

    #[test]
    fn depth_is_unbounded() {
        assert_eq!(
            flatten(json!({"Peru": {"Sur": {"Cusco": {"Urubamba": "qhasi"}}}})),
            vec!["Peru/Sur/Cusco/Urubamba: qhasi"]
        );
    }

    #[test]
    fn mixed_shapes_keep_mapping_order() {
        assert_eq!(
            flatten(json!({
                "Ecuador": "kasi",
                "Peru": {"Cusco": ["qasi"], "Ayacucho": "qasi"},
                "Bolivia": ["jasi", "qasi"],
            })),
            vec![
                "Ecuador: kasi",
                "Peru/Cusco: qasi",
                "Peru/Ayacucho: qasi",
                "Bolivia: jasi, qasi",
            ]
        );
    }

    #[test]
    fn bare_list_and_string_use_empty_path() {
        assert_eq!(flatten(json!(["foo", "bar"])), vec![": foo, bar"]);
        assert_eq!(flatten(json!("foo")), vec![": foo"]);
    }

    #[test]
    fn unsupported_shapes_yield_nothing() {
        assert!(flatten(json!(7)).is_empty());
        assert!(flatten(json!({})).is_empty());
        assert!(flatten(json!({"Peru": null, "Bolivia": {}})).is_empty());
    }

    #[test]
    fn empty_list_still_emits_its_path() {
        assert_eq!(flatten(json!([])), vec![": "]);
        assert_eq!(
            flatten(json!({"Peru": [], "Bolivia": ["a"]})),
            vec!["Peru: ", "Bolivia: a"]
        );
    }

    #[test]
    fn numeric_forms_are_rendered() {
        assert_eq!(flatten(json!({"Peru": ["a", 2]})), vec!["Peru: a, 2"]);
    }
}
