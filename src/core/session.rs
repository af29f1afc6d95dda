//! Editing session: the forest, where it lives, and what is selected

use super::document::{DocumentStore, StoreError};
use super::forest::{reconcile, Forest, OutlineNode};
use super::node::{Node, NodeFields};

/// Where a new node goes relative to the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    TopLevel,
    SiblingOfSelected,
    ChildOfSelected,
}

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("please select a node first")]
    NoSelection,
    #[error("node not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Save(#[from] StoreError),
}

/// All mutable application data, owned in one place.
///
/// Every mutating operation persists the full forest before returning.
#[derive(Debug)]
pub struct Session {
    store: DocumentStore,
    forest: Forest,
    selection: Option<String>,
}

impl Session {
    /// Open the document behind `store`.
    ///
    /// On a load failure the session starts with an empty forest and the
    /// error is handed back for reporting.
    pub fn open(store: DocumentStore) -> (Self, Option<StoreError>) {
        let (forest, error) = match store.load() {
            Ok(forest) => (forest, None),
            Err(e) => {
                tracing::error!("Failed to load document: {}", e);
                (Forest::default(), Some(e))
            }
        };
        let session = Self {
            store,
            forest,
            selection: None,
        };
        (session, error)
    }

    pub fn with_forest(store: DocumentStore, forest: Forest) -> Self {
        Self {
            store,
            forest,
            selection: None,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// The selected node, if the selection still resolves
    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_deref().and_then(|id| self.forest.find(id))
    }

    /// Change the selection. Returns the newly selected node.
    pub fn select(&mut self, id: Option<String>) -> Option<&Node> {
        self.selection = id;
        self.selected_node()
    }

    /// Persist the whole forest
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.forest)
    }

    /// Write form values into the selected node and persist.
    ///
    /// Returns `Ok(false)` when there is nothing to save to.
    pub fn commit(&mut self, fields: &NodeFields) -> Result<bool, SessionError> {
        let Some(id) = self.selection.as_deref() else {
            return Ok(false);
        };
        let Some(node) = self.forest.find_mut(id) else {
            tracing::debug!("Commit to stale selection {} ignored", id);
            return Ok(false);
        };
        node.apply_fields(fields);
        self.save()?;
        Ok(true)
    }

    /// Create a node from the template, persist, and select it.
    ///
    /// Returns the new id. On a save error the node stays in memory and
    /// remains selected.
    pub fn add_node(&mut self, placement: Placement) -> Result<String, SessionError> {
        let anchor = match placement {
            Placement::TopLevel => None,
            Placement::SiblingOfSelected | Placement::ChildOfSelected => {
                let id = self.selection.clone().ok_or(SessionError::NoSelection)?;
                if !self.forest.contains(&id) {
                    return Err(SessionError::NotFound(id));
                }
                Some(id)
            }
        };

        let new_id = self.forest.fresh_id();
        let node = Node::template(new_id.clone());
        match (placement, anchor) {
            (Placement::SiblingOfSelected, Some(anchor)) => {
                self.forest
                    .insert_after(&anchor, node)
                    .ok_or(SessionError::NotFound(anchor))?;
            }
            (Placement::ChildOfSelected, Some(anchor)) => {
                self.forest
                    .append_child(&anchor, node)
                    .ok_or(SessionError::NotFound(anchor))?;
            }
            _ => self.forest.push_top_level(node),
        }
        tracing::debug!("Added node {} ({:?})", new_id, placement);

        self.selection = Some(new_id.clone());
        self.save()?;
        Ok(new_id)
    }

    /// Delete the selected node and its subtree, then persist.
    ///
    /// Returns the removed node, or `None` if nothing was selected or the
    /// selection no longer resolves.
    pub fn delete_selected(&mut self) -> Result<Option<Node>, SessionError> {
        let Some(id) = self.selection.clone() else {
            return Ok(None);
        };
        let Some(removed) = self.forest.remove(&id) else {
            tracing::debug!("Delete of stale selection {} ignored", id);
            return Ok(None);
        };
        tracing::debug!("Deleted node {} with its subtree", id);

        self.selection = None;
        self.save()?;
        Ok(Some(removed))
    }

    /// Replace the structure with the arrangement the tree view reports,
    /// keeping node content, then persist.
    pub fn rebuild_from_outline(&mut self, outline: &[OutlineNode]) -> Result<(), SessionError> {
        self.forest = reconcile(&self.forest, outline);
        if let Some(id) = self.selection.as_deref() {
            if !self.forest.contains(id) {
                self.selection = None;
            }
        }
        self.save()?;
        Ok(())
    }
}
