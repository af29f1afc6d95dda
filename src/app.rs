//! Main application state and UI coordination

use std::path::PathBuf;

use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::document::DocumentStore;
use crate::core::session::{Placement, Session, SessionError};
use crate::ui::detail_form::DetailForm;
use crate::ui::dialogs::{DialogOutcome, Dialogs};
use crate::ui::project_tree::{DropZone, ProjectTree, TreeAction};
use crate::ui::status_bar::{MessageKind, StatusBar};

/// Main application state
pub struct TreeDeskApp {
    /// Application configuration
    pub config: AppConfig,
    /// Forest, backing document and selection
    pub session: Session,
    /// Tree panel state
    pub tree: ProjectTree,
    /// Detail form state
    pub form: DetailForm,
    /// Blocking dialogs
    pub dialogs: Dialogs,
    /// Transient status messages
    pub status: StatusBar,
    /// egui time of the current frame
    now: f64,
}

impl TreeDeskApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {}", e);
            AppConfig::default()
        });
        Self::with_config(config)
    }

    fn with_config(config: AppConfig) -> Self {
        let (session, load_error) = Session::open(DocumentStore::new(&config.document_path));
        let mut app = Self {
            config,
            session,
            tree: ProjectTree::default(),
            form: DetailForm::default(),
            dialogs: Dialogs::default(),
            status: StatusBar::default(),
            now: 0.0,
        };
        if let Some(e) = load_error {
            app.dialogs
                .message("Load Error", format!("Failed to load YAML file: {}", e));
        }
        app.refresh_view();
        app
    }

    /// Switch to another project document.
    ///
    /// This and every other user action is ignored while a dialog is open.
    pub fn open_document(&mut self, path: PathBuf) {
        if self.dialogs.is_open() {
            return;
        }
        tracing::info!("Opening document: {}", path.display());
        self.config.open_document(path.clone());
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }

        let (session, load_error) = Session::open(DocumentStore::new(path));
        self.session = session;
        if let Some(e) = load_error {
            self.dialogs
                .message("Load Error", format!("Failed to load YAML file: {}", e));
        }
        self.refresh_view();
    }

    /// Re-read the current document from disk
    pub fn reload(&mut self) {
        self.open_document(self.session.store().path().to_path_buf());
    }

    /// Re-render the tree from the forest and re-project the selection into
    /// the tree and the form
    fn refresh_view(&mut self) {
        self.tree.render(self.session.forest());
        match self.session.selection() {
            Some(id) => {
                self.tree.select_by_id(id);
            }
            None => self.tree.clear_selection(),
        }
        match self.session.selected_node() {
            Some(node) => self.form.populate(node),
            None => self.form.clear(),
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        let secs = self.config.ui.status_message_secs;
        self.status.post(MessageKind::Info, text, self.now, secs);
    }

    fn error(&mut self, text: impl Into<String>) {
        let secs = self.config.ui.error_message_secs;
        self.status.post(MessageKind::Error, text, self.now, secs);
    }

    fn report(&mut self, result: Result<(), SessionError>) {
        match result {
            Ok(()) => self.info("\u{1F4BE} Project saved successfully!"),
            Err(SessionError::NoSelection) => {
                self.dialogs
                    .message("Selection Error", "Please select a node first.");
            }
            Err(SessionError::NotFound(id)) => {
                tracing::debug!("Ignoring action on missing node {}", id);
            }
            Err(SessionError::Save(e)) => {
                tracing::error!("Failed to save document: {}", e);
                self.error(format!("Error saving file: {}", e));
            }
        }
    }

    fn select(&mut self, id: String) {
        match self.session.select(Some(id)) {
            Some(node) => self.form.populate(node),
            None => self.form.clear(),
        }
        if let Some(id) = self.session.selection() {
            self.tree.select_by_id(id);
        }
    }

    /// Write the form back into the selected node
    pub fn save_form(&mut self) {
        if self.dialogs.is_open() {
            return;
        }
        match self.session.commit(&self.form.fields) {
            Ok(true) => {
                self.info("\u{1F4BE} Project saved successfully!");
                self.refresh_view();
            }
            Ok(false) => self.info("Nothing selected to save."),
            Err(e) => self.report(Err(e)),
        }
    }

    pub fn add_node(&mut self, placement: Placement) {
        if self.dialogs.is_open() {
            return;
        }
        let result = self.session.add_node(placement).map(|_| ());
        self.report(result);
        self.refresh_view();
    }

    /// Ask for confirmation before deleting the selected node
    pub fn request_delete(&mut self) {
        if self.dialogs.is_open() {
            return;
        }
        if let Some(node) = self.session.selected_node() {
            let (id, name) = (node.id.clone(), node.name.clone());
            self.dialogs.confirm_delete(id, name);
        }
    }

    fn delete_confirmed(&mut self, id: &str) {
        if self.session.selection() != Some(id) {
            return;
        }
        let result = self.session.delete_selected().map(|_| ());
        self.report(result);
        self.refresh_view();
    }

    fn drop_node(&mut self, dragged: &str, target: &str, zone: DropZone) {
        if !self.tree.move_item(dragged, target, zone) {
            return;
        }
        let outline = self.tree.outline();
        let result = self.session.rebuild_from_outline(&outline);
        self.report(result);
        self.refresh_view();
    }

    fn handle_tree_action(&mut self, action: TreeAction) {
        if self.dialogs.is_open() {
            return;
        }
        match action {
            TreeAction::Select(id) => self.select(id),
            TreeAction::Add(placement) => self.add_node(placement),
            TreeAction::Delete => self.request_delete(),
            TreeAction::Drop {
                dragged,
                target,
                zone,
            } => self.drop_node(&dragged, &target, zone),
        }
    }

    fn pick_document(&mut self) {
        if self.dialogs.is_open() {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .pick_file()
        {
            self.open_document(path);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context, blocked: bool) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("\u{1F4BE} Save Changes    Ctrl+S").clicked() {
                        self.save_form();
                        ui.close();
                    }
                    if ui.button("Open Document...").clicked() {
                        self.pick_document();
                        ui.close();
                    }
                    let recent = self.config.recent_documents.clone();
                    ui.add_enabled_ui(!recent.is_empty(), |ui| {
                        ui.menu_button("Recent Documents", |ui| {
                            for path in recent {
                                if ui.button(path.display().to_string()).clicked() {
                                    self.open_document(path);
                                    ui.close();
                                }
                            }
                        });
                    });
                    if ui.button("Reload").clicked() {
                        self.reload();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("\u{1F6AA} Quit    Ctrl+Q").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("\u{2795} Add Top-Level Project").clicked() {
                        self.add_node(Placement::TopLevel);
                        ui.close();
                    }
                    let has_selection = self.session.selected_node().is_some();
                    ui.add_enabled_ui(has_selection, |ui| {
                        if ui.button("\u{2795} Add Sibling Task").clicked() {
                            self.add_node(Placement::SiblingOfSelected);
                            ui.close();
                        }
                        if ui.button("\u{2795} Add Child Task").clicked() {
                            self.add_node(Placement::ChildOfSelected);
                            ui.close();
                        }
                        ui.separator();
                        if ui.button("\u{274C} Delete Task (and children)    Del").clicked() {
                            self.request_delete();
                            ui.close();
                        }
                    });
                });
            }));
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("\u{1F4BE} Save Changes").clicked() {
                        self.save_form();
                    }
                });
            });
        });
    }
}

impl eframe::App for TreeDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.now = ctx.input(|i| i.time);

        // Handle keyboard shortcuts
        let typing = ctx.wants_keyboard_input();
        let (save, quit, delete) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::S),
                i.modifiers.ctrl && i.key_pressed(egui::Key::Q),
                !typing && i.key_pressed(egui::Key::Delete),
            )
        });
        if !self.dialogs.is_open() {
            if save {
                self.save_form();
            }
            if delete {
                self.request_delete();
            }
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let blocked = self.dialogs.is_open();
        self.render_menu_bar(ctx, blocked);

        let now = self.now;
        let document = self.session.store().path().display().to_string();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(remaining) = self.status.show(ui, now, &document) {
                ctx.request_repaint_after(std::time::Duration::from_secs_f64(remaining.max(0.0)));
            }
        });

        egui::SidePanel::left("project_tree")
            .resizable(true)
            .default_width(self.config.ui.tree_panel_width)
            .min_width(200.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    let actions = self.tree.show(ui);
                    for action in actions {
                        self.handle_tree_action(action);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                if self.form.show(ui) {
                    self.save_form();
                }
            });
        });

        match self.dialogs.show(ctx) {
            Some(DialogOutcome::DeleteConfirmed(id)) => self.delete_confirmed(&id),
            Some(DialogOutcome::Dismissed) | None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> TreeDeskApp {
        let config = AppConfig {
            document_path: dir.path().join("tree.yaml"),
            ..AppConfig::default()
        };
        TreeDeskApp::with_config(config)
    }

    #[test]
    fn test_startup_shows_default_tree() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        assert_eq!(app.tree.items().len(), 1);
        assert_eq!(app.tree.items()[0].id, "root");
        assert!(!app.form.is_bound());
        assert!(!app.dialogs.is_open());
    }

    #[test]
    fn test_startup_load_failure_opens_dialog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tree.yaml"), "- id: [oops\n").unwrap();
        let app = app_in(&dir);
        assert!(app.session.forest().is_empty());
        assert!(app.dialogs.is_open());
    }

    #[test]
    fn test_select_edit_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_tree_action(TreeAction::Select("root".to_string()));
        assert_eq!(app.form.id, "root");

        app.form.fields.name = "Dissertation".to_string();
        app.form.fields.status = "Completed".to_string();
        app.save_form();

        assert_eq!(app.tree.items()[0].label, "\u{2705} Dissertation");
        let on_disk = app.session.store().load().unwrap();
        assert_eq!(on_disk.nodes[0].name, "Dissertation");
    }

    #[test]
    fn test_add_child_selects_new_node() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_tree_action(TreeAction::Select("root".to_string()));
        app.handle_tree_action(TreeAction::Add(Placement::ChildOfSelected));

        let new_id = app.session.selection().unwrap().to_string();
        assert_ne!(new_id, "root");
        assert_eq!(app.tree.selected_id(), Some(new_id.as_str()));
        assert_eq!(app.form.id, new_id);
        assert_eq!(app.tree.items()[0].children[0].id, new_id);
    }

    #[test]
    fn test_add_sibling_without_selection_shows_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.add_node(Placement::SiblingOfSelected);
        assert!(app.dialogs.is_open());
        assert_eq!(app.session.forest().len(), 1);
    }

    #[test]
    fn test_confirmed_delete_clears_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.handle_tree_action(TreeAction::Select("root".to_string()));
        app.add_node(Placement::ChildOfSelected);
        let child = app.session.selection().unwrap().to_string();

        app.handle_tree_action(TreeAction::Delete);
        assert!(app.dialogs.is_open());
        assert_eq!(app.session.forest().len(), 2);

        app.delete_confirmed(&child);
        assert_eq!(app.session.forest().len(), 1);
        assert!(!app.form.is_bound());
        assert_eq!(app.tree.selected_id(), None);
    }

    #[test]
    fn test_drop_rebuilds_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add_node(Placement::TopLevel);
        let moved = app.session.selection().unwrap().to_string();

        app.handle_tree_action(TreeAction::Drop {
            dragged: moved.clone(),
            target: "root".to_string(),
            zone: DropZone::Into,
        });

        let forest = app.session.forest();
        assert_eq!(forest.nodes.len(), 1);
        assert_eq!(forest.locate(&moved), Some(vec![0, 0]));
        assert_eq!(&app.session.store().load().unwrap(), forest);
    }

    #[test]
    fn test_drop_keeps_nodes_loaded_without_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tree.yaml"),
            "- id: root\n- name: First untracked\n  notes: keep\n- name: Second untracked\n  notes: precious\n",
        )
        .unwrap();
        let mut app = app_in(&dir);
        assert!(!app.dialogs.is_open());

        app.add_node(Placement::TopLevel);
        let moved = app.session.selection().unwrap().to_string();
        app.handle_tree_action(TreeAction::Drop {
            dragged: moved,
            target: "root".to_string(),
            zone: DropZone::Into,
        });

        let on_disk = app.session.store().load().unwrap();
        assert_eq!(on_disk.len(), 4);
        let notes: Vec<&str> = on_disk.nodes.iter().map(|n| n.notes.as_str()).collect();
        assert_eq!(notes, vec!["", "keep", "precious"]);
    }

    #[test]
    fn test_node_loaded_without_id_can_be_edited() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tree.yaml"), "- name: Untracked\n").unwrap();
        let mut app = app_in(&dir);

        let id = app.tree.items()[0].id.clone();
        assert!(!id.is_empty());
        app.handle_tree_action(TreeAction::Select(id));
        assert!(app.form.is_bound());

        app.form.fields.notes = "edited".to_string();
        app.save_form();
        assert_eq!(app.session.store().load().unwrap().nodes[0].notes, "edited");
    }

    #[test]
    fn test_actions_are_ignored_while_dialog_is_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.handle_tree_action(TreeAction::Select("root".to_string()));
        app.handle_tree_action(TreeAction::Delete);
        let pending = app.dialogs.current().cloned();
        assert!(pending.is_some());

        app.handle_tree_action(TreeAction::Add(Placement::ChildOfSelected));
        app.handle_tree_action(TreeAction::Select("elsewhere".to_string()));
        app.add_node(Placement::TopLevel);
        app.form.fields.name = "Changed behind the dialog".to_string();
        app.save_form();

        assert_eq!(app.dialogs.current().cloned(), pending);
        assert_eq!(app.session.forest().len(), 1);
        assert_eq!(app.session.selection(), Some("root"));
        assert_eq!(app.session.forest().nodes[0].name, "My Research Portfolio");
        assert!(!app.session.store().path().exists());
    }
}
