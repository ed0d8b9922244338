//! Repository labels.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci, filter_eq_str};

/// A label, deduplicated by id across every repository and issue it appears on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Node id.
    pub id: EntityId,
    /// Label name.
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
    /// Description, if set.
    pub description: Option<String>,
}

impl Label {
    /// Returns the summary embedded in issues.
    #[must_use]
    pub fn summary(&self) -> LabelSummary {
        LabelSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// The label reference embedded in an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelSummary {
    /// Label node id.
    pub id: EntityId,
    /// Label name.
    pub name: String,
    /// Hex colour.
    pub color: String,
}

/// Partial update for a [`Label`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPatch {
    /// New name.
    pub name: Option<String>,
    /// New colour.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl Entity for Label {
    type Patch = LabelPatch;

    const KIND: EntityKind = EntityKind::Label;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &LabelPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}

impl Searchable for Label {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.name, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => cmp_ci(&self.name, &other.name),
            "color" => cmp_ci(&self.color, &other.color),
            _ => Ordering::Equal,
        }
    }

    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "color" => value
                .as_str()
                .is_some_and(|v| self.color.eq_ignore_ascii_case(v.trim_start_matches('#'))),
            "name" => filter_eq_str(&self.name, value),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bug() -> Label {
        Label {
            id: EntityId::from("LA_1"),
            name: "bug".to_owned(),
            color: "d73a4a".to_owned(),
            description: Some("Something isn't working".to_owned()),
        }
    }

    #[test]
    fn test_color_filter_ignores_hash_and_case() {
        let label = bug();
        assert!(label.matches_filter("color", &json!("#D73A4A")));
        assert!(!label.matches_filter("color", &json!("ffffff")));
    }

    #[test]
    fn test_patch() {
        let mut label = bug();
        label.apply_patch(&LabelPatch {
            color: Some("000000".to_owned()),
            ..LabelPatch::default()
        });
        assert_eq!(label.color, "000000");
        assert_eq!(label.name, "bug");
    }

    #[test]
    fn test_summary() {
        let summary = bug().summary();
        assert_eq!(summary.name, "bug");
        assert_eq!(summary.id.as_str(), "LA_1");
    }
}
