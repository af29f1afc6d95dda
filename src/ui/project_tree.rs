//! Project tree panel: renders the forest, handles selection, the context
//! menu, and drag-drop rearrangement

use eframe::egui;

use crate::core::forest::{Forest, OutlineNode};
use crate::core::node::Node;
use crate::core::session::Placement;

/// Display projection of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub id: String,
    pub label: String,
    pub children: Vec<TreeItem>,
}

/// Where a dragged row lands relative to the row under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Before,
    After,
    Into,
}

impl DropZone {
    /// Top quarter is before, bottom quarter after, the middle makes a child
    pub fn from_pointer(rect: egui::Rect, y: f32) -> Self {
        let height = rect.height().max(1.0);
        let relative = (y - rect.top()) / height;
        if relative < 0.25 {
            DropZone::Before
        } else if relative > 0.75 {
            DropZone::After
        } else {
            DropZone::Into
        }
    }
}

/// What the user asked for while interacting with the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    Select(String),
    Add(Placement),
    Delete,
    Drop {
        dragged: String,
        target: String,
        zone: DropZone,
    },
}

/// Drag state carried through one frame of drawing
#[derive(Debug, Default)]
struct DragState {
    source: Option<String>,
    target: Option<(String, DropZone)>,
}

/// Tree widget state. Holds no node content beyond labels.
#[derive(Debug, Default)]
pub struct ProjectTree {
    items: Vec<TreeItem>,
    selected: Option<String>,
    /// Set by `render`; the next frame opens every level again
    expand_all: bool,
    drag_source: Option<String>,
}

impl ProjectTree {
    /// Rebuild the projection from the forest
    pub fn render(&mut self, forest: &Forest) {
        fn project(list: &[Node]) -> Vec<TreeItem> {
            list.iter()
                .map(|node| TreeItem {
                    id: node.id.clone(),
                    label: node.label(),
                    children: project(&node.children),
                })
                .collect()
        }
        self.items = project(&forest.nodes);
        self.expand_all = true;
        if let Some(id) = self.selected.take() {
            self.select_by_id(&id);
        }
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Make the item carrying `id` current. No-op if no item carries it.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if locate(&self.items, id).is_some() {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Current arrangement as an id skeleton
    pub fn outline(&self) -> Vec<OutlineNode> {
        fn walk(items: &[TreeItem]) -> Vec<OutlineNode> {
            items
                .iter()
                .map(|item| OutlineNode {
                    id: item.id.clone(),
                    children: walk(&item.children),
                })
                .collect()
        }
        walk(&self.items)
    }

    /// Move `dragged` next to or into `target`.
    ///
    /// Refuses drops onto the item itself or anywhere inside its subtree.
    pub fn move_item(&mut self, dragged: &str, target: &str, zone: DropZone) -> bool {
        if dragged == target {
            return false;
        }
        let Some(path) = locate(&self.items, dragged) else {
            return false;
        };
        let Some(target_path) = locate(&self.items, target) else {
            return false;
        };
        // a target below the dragged item would make it its own ancestor
        if target_path.starts_with(&path) {
            return false;
        }
        let Some((list, index)) = slot_mut(&mut self.items, &path) else {
            return false;
        };
        let item = list.remove(index);

        let Some(target_path) = locate(&self.items, target) else {
            return false;
        };
        let Some((list, index)) = slot_mut(&mut self.items, &target_path) else {
            return false;
        };
        match zone {
            DropZone::Before => list.insert(index, item),
            DropZone::After => list.insert(index + 1, item),
            DropZone::Into => list[index].children.push(item),
        }
        true
    }

    /// Show the tree and collect the actions the user took this frame
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<TreeAction> {
        let mut actions = Vec::new();
        let mut drag = DragState {
            source: self.drag_source.take(),
            target: None,
        };

        ui.heading("Project Structure");
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("project_tree_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.items.is_empty() {
                    ui.weak("Empty project. Right-click to add a top-level project.");
                }
                for item in &self.items {
                    Self::show_item(
                        ui,
                        item,
                        0,
                        self.expand_all,
                        self.selected.as_deref(),
                        &mut drag,
                        &mut actions,
                    );
                }

                let blank = ui.allocate_response(
                    egui::vec2(ui.available_width(), ui.available_height().max(32.0)),
                    egui::Sense::click(),
                );
                blank.context_menu(|ui| {
                    if ui.button("\u{2795} Add Top-Level Project").clicked() {
                        actions.push(TreeAction::Add(Placement::TopLevel));
                        ui.close();
                    }
                });
            });

        self.expand_all = false;

        if ui.input(|i| i.pointer.any_released()) {
            if let (Some(dragged), Some((target, zone))) = (drag.source, drag.target) {
                actions.push(TreeAction::Drop {
                    dragged,
                    target,
                    zone,
                });
            }
        } else {
            self.drag_source = drag.source;
        }

        actions
    }

    fn show_item(
        ui: &mut egui::Ui,
        item: &TreeItem,
        depth: usize,
        expand_all: bool,
        selected: Option<&str>,
        drag: &mut DragState,
        actions: &mut Vec<TreeAction>,
    ) {
        if item.children.is_empty() {
            ui.horizontal(|ui| {
                ui.add_space(18.0);
                Self::show_row(ui, item, depth, selected, drag, actions);
            });
            return;
        }

        let mut state = egui::collapsing_header::CollapsingState::load_with_default_open(
            ui.ctx(),
            collapse_id(&item.id),
            true,
        );
        if expand_all {
            state.set_open(true);
        }
        state
            .show_header(ui, |ui| {
                Self::show_row(ui, item, depth, selected, drag, actions);
            })
            .body(|ui| {
                for child in &item.children {
                    Self::show_item(ui, child, depth + 1, expand_all, selected, drag, actions);
                }
            });
    }

    fn show_row(
        ui: &mut egui::Ui,
        item: &TreeItem,
        depth: usize,
        selected: Option<&str>,
        drag: &mut DragState,
        actions: &mut Vec<TreeAction>,
    ) {
        let is_selected = selected == Some(item.id.as_str());
        let response = ui
            .selectable_label(is_selected, &item.label)
            .interact(egui::Sense::drag());

        if response.clicked() || response.secondary_clicked() {
            actions.push(TreeAction::Select(item.id.clone()));
        }
        if response.drag_started() {
            drag.source = Some(item.id.clone());
        }

        let dragging_other = drag
            .source
            .as_deref()
            .is_some_and(|source| source != item.id);
        if dragging_other {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                if response.rect.contains(pos) {
                    let zone = DropZone::from_pointer(response.rect, pos.y);
                    Self::paint_drop_hint(ui, response.rect, zone);
                    drag.target = Some((item.id.clone(), zone));
                }
            }
        }

        if drag.source.as_deref() == Some(item.id.as_str())
            && ui.input(|i| i.pointer.is_decidedly_dragging())
        {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                egui::Area::new(egui::Id::new("project_tree_drag"))
                    .fixed_pos(pos + egui::vec2(12.0, 12.0))
                    .order(egui::Order::Tooltip)
                    .show(ui.ctx(), |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.label(&item.label);
                        });
                    });
            }
        }

        response.context_menu(|ui| {
            if ui.button("\u{2795} Add Child Task").clicked() {
                actions.push(TreeAction::Add(Placement::ChildOfSelected));
                ui.close();
            }
            // top-level items can neither get siblings nor be deleted from here
            if depth > 0 {
                if ui.button("\u{2795} Add Sibling Task").clicked() {
                    actions.push(TreeAction::Add(Placement::SiblingOfSelected));
                    ui.close();
                }
                ui.separator();
                if ui.button("\u{274C} Delete Task (and children)").clicked() {
                    actions.push(TreeAction::Delete);
                    ui.close();
                }
            }
        });
    }

    fn paint_drop_hint(ui: &egui::Ui, rect: egui::Rect, zone: DropZone) {
        let color = ui.visuals().selection.stroke.color;
        let stroke = egui::Stroke::new(2.0, color);
        match zone {
            DropZone::Before => {
                ui.painter().hline(rect.x_range(), rect.top(), stroke);
            }
            DropZone::After => {
                ui.painter().hline(rect.x_range(), rect.bottom(), stroke);
            }
            DropZone::Into => {
                ui.painter()
                    .rect_filled(rect, 2.0, color.gamma_multiply(0.25));
            }
        }
    }
}

/// Collapsing-state id of a node row; stable across renders
fn collapse_id(node_id: &str) -> egui::Id {
    egui::Id::new(("project_tree", node_id))
}

fn locate(items: &[TreeItem], id: &str) -> Option<Vec<usize>> {
    for (index, item) in items.iter().enumerate() {
        if item.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = locate(&item.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn slot_mut<'a>(
    items: &'a mut Vec<TreeItem>,
    path: &[usize],
) -> Option<(&'a mut Vec<TreeItem>, usize)> {
    let (last, parents) = path.split_last()?;
    let mut list = items;
    for &index in parents {
        list = &mut list.get_mut(index)?.children;
    }
    Some((list, *last))
}
