use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw record for one form control, as reported by the page driver.
///
/// This is the unprocessed DOM snapshot: associated label texts,
/// sibling/parent texts, and the structural path are all captured here
/// so the extractor can build a `FieldDescriptor` without touching the
/// live page again.
#[derive(Debug, Clone, Deserialize)]
pub struct RawControl {
    pub tag: String,
    pub r#type: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    #[serde(rename = "ariaLabel")]
    pub aria_label: Option<String>,
    /// Text of an explicitly associated <label> (control nested inside it).
    #[serde(rename = "labelText")]
    pub label_text: Option<String>,
    /// Text of a label linked via its `for` attribute.
    #[serde(rename = "forLabelText")]
    pub for_label_text: Option<String>,
    /// Resolved text of the aria-labelledby target.
    #[serde(rename = "labelledByText")]
    pub labelled_by_text: Option<String>,
    /// Immediately preceding free text node, if any.
    #[serde(rename = "precedingText")]
    pub preceding_text: Option<String>,
    #[serde(rename = "precedingSiblings", default)]
    pub preceding_siblings: Vec<String>,
    /// Parent element's direct text node content.
    #[serde(rename = "parentText")]
    pub parent_text: Option<String>,
    #[serde(rename = "followingSiblings", default)]
    pub following_siblings: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Ancestor chain from the document root down to the control itself.
    #[serde(default)]
    pub path: Vec<PathStep>,
    /// Relevant attributes (name, class, data-field-type, data-test-id).
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

fn default_visible() -> bool {
    true
}

/// One step of a control's structural path.
#[derive(Debug, Clone, Deserialize)]
pub struct PathStep {
    pub tag: String,
    pub id: Option<String>,
    /// 1-based position among same-tag siblings.
    #[serde(rename = "nthOfType", default = "default_nth")]
    pub nth_of_type: u32,
}

fn default_nth() -> u32 {
    1
}

/// Supported control kinds. Anything else is excluded at extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Password,
    Textarea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Number => "number",
            FieldKind::Password => "password",
            FieldKind::Textarea => "textarea",
        }
    }
}

/// Normalized metadata bundle describing one form control.
///
/// Immutable once created; a new scan produces fresh descriptors
/// rather than mutating old ones.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Native id/name when present, else a deterministic synthetic token.
    pub id: String,
    /// Path that re-locates the same control later in the same document.
    pub selector: String,
    pub kind: FieldKind,
    pub label: String,
    pub placeholder: String,
    #[serde(rename = "accessibleName")]
    pub accessible_name: String,
    #[serde(rename = "surroundingText")]
    pub surrounding_text: String,
    pub attributes: HashMap<String, String>,
}
