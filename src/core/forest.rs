//! The in-memory project tree and its structural operations

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::node::{generate_id, Node};

/// Index path from the top-level list down to a node
pub type NodePath = Vec<usize>;

/// Ordered sequence of top-level nodes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub nodes: Vec<Node>,
}

/// Structural skeleton of one node: its id and the ids below it.
///
/// This is what the tree view hands back after the user rearranged it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub id: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }
}

impl From<Vec<Node>> for Forest {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl Forest {
    /// The forest used when no document exists yet
    pub fn default_document() -> Self {
        Self {
            nodes: vec![Node::named("root", "My Research Portfolio")],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order depth-first search for a node, returning its index path
    pub fn locate(&self, id: &str) -> Option<NodePath> {
        let mut path = Vec::new();
        if Self::locate_in(&self.nodes, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn locate_in(list: &[Node], id: &str, path: &mut NodePath) -> bool {
        for (index, node) in list.iter().enumerate() {
            path.push(index);
            if node.id == id || Self::locate_in(&node.children, id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Find a node by id
    pub fn find(&self, id: &str) -> Option<&Node> {
        let path = self.locate(id)?;
        let (last, parents) = path.split_last()?;
        let mut list = &self.nodes;
        for &index in parents {
            list = &list[index].children;
        }
        list.get(*last)
    }

    /// Find a node by id mutably
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        let (list, index) = self.slot_mut(id)?;
        list.get_mut(index)
    }

    /// The list owning a node and the node's index in it
    pub fn slot_mut(&mut self, id: &str) -> Option<(&mut Vec<Node>, usize)> {
        let path = self.locate(id)?;
        let (last, parents) = path.split_last()?;
        let mut list = &mut self.nodes;
        for &index in parents {
            list = &mut list[index].children;
        }
        Some((list, *last))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// Remove a node together with its whole subtree
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let (list, index) = self.slot_mut(id)?;
        Some(list.remove(index))
    }

    /// Every id in the forest, pre-order
    pub fn ids(&self) -> Vec<&str> {
        fn collect<'a>(list: &'a [Node], out: &mut Vec<&'a str>) {
            for node in list {
                out.push(&node.id);
                collect(&node.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    /// Number of nodes at every depth
    pub fn len(&self) -> usize {
        self.ids().len()
    }

    /// Generate an id not used anywhere in the forest
    pub fn fresh_id(&self) -> String {
        self.fresh_id_with(generate_id)
    }

    /// Draw ids from `generate` until one is not used in the forest
    pub fn fresh_id_with(&self, mut generate: impl FnMut() -> String) -> String {
        let taken: HashSet<&str> = self.ids().into_iter().collect();
        loop {
            let id = generate();
            if !id.is_empty() && !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    /// Give a fresh id to every node whose id is blank or already used by an
    /// earlier node in pre-order. Returns how many ids were replaced.
    pub fn repair_ids(&mut self) -> usize {
        fn walk(
            list: &mut [Node],
            taken: &mut HashSet<String>,
            seen: &mut HashSet<String>,
            repaired: &mut usize,
        ) {
            for node in list {
                if node.id.is_empty() || seen.contains(&node.id) {
                    let id = loop {
                        let id = generate_id();
                        if !taken.contains(&id) {
                            break id;
                        }
                    };
                    tracing::warn!("Assigning id {} to node '{}' (had {:?})", id, node.name, node.id);
                    node.id = id;
                    *repaired += 1;
                }
                taken.insert(node.id.clone());
                seen.insert(node.id.clone());
                walk(&mut node.children, taken, seen, repaired);
            }
        }

        // ids appearing later in the tree must not be handed out either
        let mut taken: HashSet<String> = self.ids().into_iter().map(str::to_string).collect();
        let mut seen = HashSet::new();
        let mut repaired = 0;
        walk(&mut self.nodes, &mut taken, &mut seen, &mut repaired);
        repaired
    }

    pub fn push_top_level(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Insert `node` right after the node `sibling_id` in the same list
    pub fn insert_after(&mut self, sibling_id: &str, node: Node) -> Option<()> {
        let (list, index) = self.slot_mut(sibling_id)?;
        list.insert(index + 1, node);
        Some(())
    }

    /// Append `node` as the last child of `parent_id`
    pub fn append_child(&mut self, parent_id: &str, node: Node) -> Option<()> {
        self.find_mut(parent_id)?.children.push(node);
        Some(())
    }

    /// Structural skeleton of the whole forest
    pub fn outline(&self) -> Vec<OutlineNode> {
        fn walk(list: &[Node]) -> Vec<OutlineNode> {
            list.iter()
                .map(|node| OutlineNode {
                    id: node.id.clone(),
                    children: walk(&node.children),
                })
                .collect()
        }
        walk(&self.nodes)
    }
}

/// Rebuild a forest from a new structural skeleton.
///
/// Content of every node is taken from `old` by id; `children` come from the
/// outline only. Outline ids unknown to `old`, and repeats of an id already
/// placed, are skipped. Nodes of `old` that the outline does not mention are
/// not carried over.
pub fn reconcile(old: &Forest, outline: &[OutlineNode]) -> Forest {
    let mut content: HashMap<&str, &Node> = HashMap::new();
    fn index<'a>(list: &'a [Node], content: &mut HashMap<&'a str, &'a Node>) {
        for node in list {
            content.entry(node.id.as_str()).or_insert(node);
            index(&node.children, content);
        }
    }
    index(&old.nodes, &mut content);

    fn build(
        outline: &[OutlineNode],
        content: &HashMap<&str, &Node>,
        placed: &mut HashSet<String>,
    ) -> Vec<Node> {
        let mut list = Vec::with_capacity(outline.len());
        for entry in outline {
            let Some(original) = content.get(entry.id.as_str()) else {
                tracing::debug!("Dropping unknown id from outline: {}", entry.id);
                continue;
            };
            if !placed.insert(entry.id.clone()) {
                continue;
            }
            list.push(Node {
                id: original.id.clone(),
                name: original.name.clone(),
                status: original.status.clone(),
                description: original.description.clone(),
                notes: original.notes.clone(),
                children: build(&entry.children, content, placed),
            });
        }
        list
    }

    let mut placed = HashSet::new();
    Forest {
        nodes: build(outline, &content, &mut placed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, children: Vec<Node>) -> Node {
        let mut node = Node::named(id, id.to_uppercase());
        node.children = children;
        node
    }

    fn outline(id: &str, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            id: id.to_string(),
            children,
        }
    }

    /// a(b(c), d), e
    fn sample() -> Forest {
        Forest::from(vec![
            node("a", vec![node("b", vec![node("c", vec![])]), node("d", vec![])]),
            node("e", vec![]),
        ])
    }

    #[test]
    fn test_locate_is_preorder() {
        let forest = sample();
        assert_eq!(forest.locate("a"), Some(vec![0]));
        assert_eq!(forest.locate("c"), Some(vec![0, 0, 0]));
        assert_eq!(forest.locate("d"), Some(vec![0, 1]));
        assert_eq!(forest.locate("e"), Some(vec![1]));
        assert_eq!(forest.locate("zzz"), None);
        assert_eq!(forest.ids(), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(forest.len(), 5);
    }

    #[test]
    fn test_slot_mut_returns_owning_list() {
        let mut forest = sample();
        let (list, index) = forest.slot_mut("d").unwrap();
        assert_eq!(index, 1);
        assert_eq!(list[0].id, "b");
    }

    #[test]
    fn test_find_mut_edits_in_place() {
        let mut forest = sample();
        forest.find_mut("c").unwrap().notes = "deep".to_string();
        assert_eq!(forest.find("c").unwrap().notes, "deep");
    }

    #[test]
    fn test_remove_cascades_to_subtree() {
        let mut forest = sample();
        let removed = forest.remove("b").unwrap();
        assert_eq!(removed.children[0].id, "c");
        assert!(!forest.contains("b"));
        assert!(!forest.contains("c"));
        assert_eq!(forest.ids(), vec!["a", "d", "e"]);
        assert!(forest.remove("b").is_none());
    }

    #[test]
    fn test_remove_only_child_leaves_empty_list() {
        let mut forest = Forest::from(vec![node("p", vec![node("only", vec![])])]);
        forest.remove("only");
        assert!(forest.find("p").unwrap().children.is_empty());
    }

    #[test]
    fn test_insert_after_and_append_child() {
        let mut forest = sample();
        forest.insert_after("b", Node::named("x", "X")).unwrap();
        forest.append_child("e", Node::named("y", "Y")).unwrap();

        let a = forest.find("a").unwrap();
        let order: Vec<_> = a.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["b", "x", "d"]);
        assert_eq!(forest.find("e").unwrap().children[0].id, "y");

        assert!(forest.insert_after("nope", Node::default()).is_none());
        assert!(forest.append_child("nope", Node::default()).is_none());
    }

    #[test]
    fn test_fresh_id_is_unused() {
        let forest = sample();
        let id = forest.fresh_id();
        assert!(!forest.contains(&id));
    }

    #[test]
    fn test_fresh_id_retries_on_collision() {
        let forest = sample();
        let mut candidates = vec!["item_new", "", "c", "a"];
        let mut calls = 0;
        let id = forest.fresh_id_with(|| {
            calls += 1;
            candidates.pop().unwrap().to_string()
        });
        assert_eq!(id, "item_new");
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_repair_ids_fills_blank_and_duplicate_ids() {
        let mut forest = Forest::from(vec![
            node("root", vec![node("", vec![node("", vec![])])]),
            node("", vec![]),
            node("root", vec![]),
        ]);
        forest.nodes[1].notes = "keep".to_string();

        assert_eq!(forest.repair_ids(), 4);

        let ids = forest.ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert_eq!(forest.nodes[0].id, "root");
        assert_eq!(forest.nodes[1].notes, "keep");
        assert_eq!(forest.repair_ids(), 0);
    }

    #[test]
    fn test_reconcile_identity_outline_is_noop() {
        let forest = sample();
        assert_eq!(reconcile(&forest, &forest.outline()), forest);
    }

    #[test]
    fn test_reconcile_moves_node_between_parents() {
        let mut old = sample();
        old.find_mut("c").unwrap().description = "unicode \u{00e9}\u{4e2d}".to_string();
        let before = old.find("c").unwrap().clone();

        // c moves from under b to under e
        let new_outline = vec![
            outline("a", vec![outline("b", vec![]), outline("d", vec![])]),
            outline("e", vec![outline("c", vec![])]),
        ];
        let rebuilt = reconcile(&old, &new_outline);

        assert_eq!(rebuilt.locate("c"), Some(vec![1, 0]));
        assert!(rebuilt.find("b").unwrap().children.is_empty());
        assert_eq!(rebuilt.find("c").unwrap(), &before);
        assert_eq!(rebuilt.len(), old.len());
    }

    #[test]
    fn test_reconcile_skips_unknown_and_duplicate_ids() {
        let old = sample();
        let new_outline = vec![
            outline("e", vec![outline("ghost", vec![])]),
            outline("e", vec![]),
            OutlineNode::leaf("a"),
        ];
        let rebuilt = reconcile(&old, &new_outline);
        assert_eq!(rebuilt.ids(), vec!["e", "a"]);
    }

    #[test]
    fn test_reconcile_does_not_touch_old_forest() {
        let old = sample();
        let snapshot = old.clone();
        let _ = reconcile(&old, &[OutlineNode::leaf("c")]);
        assert_eq!(old, snapshot);
    }
}
