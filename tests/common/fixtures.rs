use std::collections::HashMap;

use form_autofill::field::field_model::{FieldDescriptor, FieldKind, RawControl};

/// file:// URL of an HTML fixture under tests/fixtures/.
pub fn page(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    format!("file://{}", path.display())
}

/// Descriptor with only an id and a label; everything else empty.
pub fn descriptor(id: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor {
        id: id.to_string(),
        selector: format!("form > input#{}", id),
        kind: FieldKind::Text,
        label: label.to_string(),
        placeholder: String::new(),
        accessible_name: String::new(),
        surrounding_text: String::new(),
        attributes: HashMap::new(),
    }
}

/// Descriptor with all matchable attributes set explicitly.
pub fn descriptor_full(
    id: &str,
    label: &str,
    placeholder: &str,
    accessible_name: &str,
    surrounding_text: &str,
) -> FieldDescriptor {
    FieldDescriptor {
        id: id.to_string(),
        selector: format!("form > input#{}", id),
        kind: FieldKind::Text,
        label: label.to_string(),
        placeholder: placeholder.to_string(),
        accessible_name: accessible_name.to_string(),
        surrounding_text: surrounding_text.to_string(),
        attributes: HashMap::new(),
    }
}

/// Bare visible text input with no metadata; tests tweak fields.
pub fn raw_control(tag: &str, input_type: Option<&str>) -> RawControl {
    RawControl {
        tag: tag.to_string(),
        r#type: input_type.map(|s| s.to_string()),
        id: None,
        name: None,
        placeholder: None,
        aria_label: None,
        label_text: None,
        for_label_text: None,
        labelled_by_text: None,
        preceding_text: None,
        preceding_siblings: vec![],
        parent_text: None,
        following_siblings: vec![],
        visible: true,
        path: vec![],
        attributes: HashMap::new(),
    }
}
