use serde::{Deserialize, Serialize};

/// Hard cap on profile size, bounding matching cost.
pub const MAX_PROFILE_ENTRIES: usize = 20;

/// One reusable piece of personal data: a user-chosen semantic key
/// (e.g. "メールアドレス", "email") and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub key: String,
    pub value: String,
}

impl ProfileEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of profile entries. Insertion order is preserved (it
/// is the tie-break order during matching); key collisions resolve to
/// the last writer; size is capped at `MAX_PROFILE_ENTRIES`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    entries: Vec<ProfileEntry>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from raw entries: duplicate keys keep their
    /// first position but take the last-written value, then the list
    /// is truncated to the cap.
    pub fn from_entries(raw: impl IntoIterator<Item = ProfileEntry>) -> Self {
        let mut profile = Profile::new();
        for entry in raw {
            profile.set(entry.key, entry.value);
        }
        profile
    }

    /// Insert or overwrite an entry. Overwriting keeps the existing
    /// position; inserting beyond the cap is ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.value = value;
            return;
        }
        if self.entries.len() < MAX_PROFILE_ENTRIES {
            self.entries.push(ProfileEntry { key, value });
        }
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-key lookup (trimmed, case-folded comparison).
    pub fn value_for_key(&self, key: &str) -> Option<&str> {
        let wanted = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.key.trim().to_lowercase() == wanted)
            .map(|e| e.value.as_str())
    }

    /// The default key set a fresh profile is seeded with.
    pub fn default_template() -> Self {
        let keys = [
            "性",
            "名",
            "メールアドレス",
            "電話番号",
            "〒",
            "住所１",
            "住所２",
            "住所３",
        ];
        Self::from_entries(keys.into_iter().map(|k| ProfileEntry::new(k, "")))
    }
}
