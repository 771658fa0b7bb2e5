use std::collections::HashSet;

use crate::field::field_model::{FieldDescriptor, FieldKind, PathStep, RawControl};

/// Upper bound on surrounding-text length, in characters.
pub const SURROUNDING_TEXT_MAX: usize = 200;

const MAX_PRECEDING_SIBLINGS: usize = 3;
const MAX_FOLLOWING_SIBLINGS: usize = 2;

/// Build descriptors for all fillable controls in a scan.
///
/// Hidden controls and unsupported input kinds are dropped. Descriptor
/// ids are unique within the returned set.
pub fn extract_descriptors(controls: &[RawControl]) -> Vec<FieldDescriptor> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut descriptors = Vec::new();

    for control in controls {
        if !control.visible {
            continue;
        }
        let Some(kind) = classify_kind(control) else {
            continue;
        };

        let selector = build_selector(&control.path);
        let id = resolve_id(control, &selector, kind, &mut seen_ids);

        descriptors.push(FieldDescriptor {
            id,
            selector,
            kind,
            label: resolve_label(control),
            placeholder: control.placeholder.clone().unwrap_or_default(),
            accessible_name: control.aria_label.clone().unwrap_or_default(),
            surrounding_text: surrounding_text(control),
            attributes: control.attributes.clone(),
        });
    }

    descriptors
}

/// Map a raw control to a supported kind, or None to exclude it.
pub fn classify_kind(control: &RawControl) -> Option<FieldKind> {
    match control.tag.as_str() {
        "textarea" => Some(FieldKind::Textarea),
        "input" => match control.r#type.as_deref() {
            None | Some("text") => Some(FieldKind::Text),
            Some("email") => Some(FieldKind::Email),
            Some("tel") => Some(FieldKind::Tel),
            Some("number") => Some(FieldKind::Number),
            Some("password") => Some(FieldKind::Password),
            // submit/button/hidden/checkbox/radio/file etc.
            Some(_) => None,
        },
        _ => None,
    }
}

/// Resolve the field label by priority: explicit label, for-linked
/// label, aria-label / aria-labelledby, immediately preceding text.
/// First non-empty candidate wins; result is trimmed.
pub fn resolve_label(control: &RawControl) -> String {
    let candidates = [
        control.label_text.as_deref(),
        control.for_label_text.as_deref(),
        control.aria_label.as_deref(),
        control.labelled_by_text.as_deref(),
        control.preceding_text.as_deref(),
    ];

    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Assemble best-effort context text: up to 3 preceding sibling texts,
/// the parent's direct text, up to 2 following sibling texts. Bounded
/// to `SURROUNDING_TEXT_MAX` characters.
pub fn surrounding_text(control: &RawControl) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for text in control.preceding_siblings.iter().take(MAX_PRECEDING_SIBLINGS) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    if let Some(parent) = control.parent_text.as_deref() {
        let trimmed = parent.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    for text in control.following_siblings.iter().take(MAX_FOLLOWING_SIBLINGS) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    let joined = parts.join(" ");
    joined
        .chars()
        .take(SURROUNDING_TEXT_MAX)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Compose a re-locatable selector from the structural path: anchor at
/// the nearest enclosing id, nth-of-type tie-breaks below it.
pub fn build_selector(path: &[PathStep]) -> String {
    let mut segments: Vec<String> = Vec::new();

    // Walk leaf-to-root, stop at the first id anchor.
    for step in path.iter().rev() {
        if let Some(id) = step.id.as_deref().filter(|s| !s.is_empty()) {
            segments.push(format!("{}#{}", step.tag, id));
            break;
        }

        if step.nth_of_type > 1 {
            segments.push(format!("{}:nth-of-type({})", step.tag, step.nth_of_type));
        } else {
            segments.push(step.tag.clone());
        }
    }

    segments.reverse();
    segments.join(" > ")
}

/// Choose the descriptor id: native id, else name, else a synthetic
/// token derived from the selector and kind. Uniqueness within the
/// scan is enforced with a counter suffix.
fn resolve_id(
    control: &RawControl,
    selector: &str,
    kind: FieldKind,
    seen: &mut HashSet<String>,
) -> String {
    let base = control
        .id
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(control.name.as_deref().filter(|s| !s.is_empty()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| synthetic_id(selector, kind));

    let id = if seen.contains(&base) {
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        }
    } else {
        base
    };

    seen.insert(id.clone());
    id
}

/// Deterministic synthetic id: same structural path and kind yield the
/// same token on every scan, so a plan survives an identical re-scan.
pub fn synthetic_id(selector: &str, kind: FieldKind) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(selector.as_bytes());
    hasher.update(b":");
    hasher.update(kind.as_str().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("_{}", &digest[..9])
}
