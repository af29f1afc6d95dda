//! Task/project node records

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Status given to freshly created nodes
pub const DEFAULT_STATUS: &str = "Locked";

/// Name given to freshly created nodes
pub const NEW_NODE_NAME: &str = "New Item - Edit Me";

/// Statuses with a dedicated glyph, in the order the form offers them
pub const KNOWN_STATUSES: [&str; 6] = [
    "Locked",
    "Unlocked",
    "Planning",
    "In-Progress",
    "Blocked",
    "Completed",
];

/// One task or project in the tree.
///
/// Field order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Node>,
}

/// The editable scalar fields of a node, as entered in the detail form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeFields {
    pub name: String,
    pub status: String,
    pub description: String,
    pub notes: String,
}

impl Node {
    /// Create a node from the add-node template
    pub fn template(id: String) -> Self {
        Self {
            id,
            name: NEW_NODE_NAME.to_string(),
            status: DEFAULT_STATUS.to_string(),
            description: String::new(),
            notes: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a bare node with only an id and a name
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Copy of the editable fields
    pub fn fields(&self) -> NodeFields {
        NodeFields {
            name: self.name.clone(),
            status: self.status.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Overwrite the editable fields. Id and children are untouched.
    pub fn apply_fields(&mut self, fields: &NodeFields) {
        self.name.clone_from(&fields.name);
        self.status.clone_from(&fields.status);
        self.description.clone_from(&fields.description);
        self.notes.clone_from(&fields.notes);
    }

    /// Glyph shown in front of the name in the tree
    pub fn glyph(&self) -> &'static str {
        status_glyph(&self.status)
    }

    /// Tree label: glyph followed by the name
    pub fn label(&self) -> String {
        let name = if self.name.is_empty() {
            "Unnamed"
        } else {
            self.name.as_str()
        };
        format!("{} {}", self.glyph(), name)
    }
}

/// Map a free-text status to its glyph
pub fn status_glyph(status: &str) -> &'static str {
    match status {
        "Completed" => "\u{2705}",
        "In-Progress" => "\u{23F3}",
        "Unlocked" => "\u{1F513}",
        "Locked" => "\u{1F512}",
        "Blocked" => "\u{274C}",
        "Planning" => "\u{1F5D3}\u{FE0F}",
        _ => "\u{1F539}",
    }
}

/// Generate a fresh node id of the form `item_` + 8 hex digits
pub fn generate_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("item_{}", &hex[..8])
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_defaults() {
        let node = Node::template("item_0000beef".to_string());
        assert_eq!(node.id, "item_0000beef");
        assert_eq!(node.name, NEW_NODE_NAME);
        assert_eq!(node.status, "Locked");
        assert!(node.description.is_empty());
        assert!(node.notes.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        assert_eq!(id.len(), "item_".len() + 8);
        assert!(id.starts_with("item_"));
        assert!(id[5..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_labels_use_status_glyph() {
        let mut node = Node::named("a", "Survey");
        node.status = "Completed".to_string();
        assert_eq!(node.label(), "\u{2705} Survey");

        node.status = "whatever".to_string();
        assert_eq!(node.label(), "\u{1F539} Survey");

        node.name.clear();
        assert_eq!(node.label(), "\u{1F539} Unnamed");
    }

    #[test]
    fn test_every_known_status_has_its_own_glyph() {
        let fallback = status_glyph("");
        for status in KNOWN_STATUSES {
            assert_ne!(status_glyph(status), fallback, "{status}");
        }
    }

    #[test]
    fn test_apply_fields_keeps_identity_and_children() {
        let mut node = Node::named("p", "Parent");
        node.children.push(Node::named("c", "Child"));

        node.apply_fields(&NodeFields {
            name: "Renamed".to_string(),
            status: "Blocked".to_string(),
            description: "why".to_string(),
            notes: "later".to_string(),
        });

        assert_eq!(node.id, "p");
        assert_eq!(node.name, "Renamed");
        assert_eq!(node.status, "Blocked");
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.fields().notes, "later");
    }

    #[test]
    fn test_missing_null_and_extra_fields_are_tolerated() {
        let yaml = r#"
- notes: first
  id: root
  unlocks: [x, y]
  name: ~
  children:
    - id: leaf
"#;
        let nodes: Vec<Node> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "root");
        assert_eq!(nodes[0].name, "");
        assert_eq!(nodes[0].status, "");
        assert_eq!(nodes[0].notes, "first");
        assert_eq!(nodes[0].children[0].id, "leaf");
        assert!(nodes[0].children[0].children.is_empty());
    }
}
