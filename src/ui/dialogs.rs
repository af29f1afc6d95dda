//! Modal dialogs: error messages and delete confirmation

use eframe::egui;

/// A dialog waiting for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Message { title: String, text: String },
    ConfirmDelete { id: String, name: String },
}

/// How the user closed a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Dismissed,
    DeleteConfirmed(String),
}

/// At most one dialog is open at a time; a newer one replaces the older
#[derive(Debug, Default)]
pub struct Dialogs {
    current: Option<Dialog>,
}

impl Dialogs {
    pub fn message(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.current = Some(Dialog::Message {
            title: title.into(),
            text: text.into(),
        });
    }

    pub fn confirm_delete(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.current = Some(Dialog::ConfirmDelete {
            id: id.into(),
            name: name.into(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }

    /// Show the open dialog, if any
    pub fn show(&mut self, ctx: &egui::Context) -> Option<DialogOutcome> {
        let dialog = self.current.as_ref()?;
        let mut outcome = None;

        match dialog {
            Dialog::Message { title, text } => {
                let response = egui::Modal::new(egui::Id::new("message_dialog")).show(ctx, |ui| {
                    ui.heading(title.as_str());
                    ui.add_space(6.0);
                    ui.label(text.as_str());
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        outcome = Some(DialogOutcome::Dismissed);
                    }
                });
                if response.should_close() && outcome.is_none() {
                    outcome = Some(DialogOutcome::Dismissed);
                }
            }
            Dialog::ConfirmDelete { id, name } => {
                let response = egui::Modal::new(egui::Id::new("confirm_delete_dialog")).show(ctx, |ui| {
                    ui.heading("Confirm Deletion");
                    ui.add_space(6.0);
                    ui.label(format!(
                        "Are you sure you want to permanently delete '{}' and ALL its children?",
                        name
                    ));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            outcome = Some(DialogOutcome::DeleteConfirmed(id.clone()));
                        }
                        if ui.button("No").clicked() {
                            outcome = Some(DialogOutcome::Dismissed);
                        }
                    });
                });
                // Escape or a click outside answers "No"
                if response.should_close() && outcome.is_none() {
                    outcome = Some(DialogOutcome::Dismissed);
                }
            }
        }

        if outcome.is_some() {
            self.current = None;
        }
        outcome
    }
}
