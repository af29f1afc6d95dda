//! Detail form for the selected node

use eframe::egui;

use crate::core::node::{status_glyph, Node, NodeFields, KNOWN_STATUSES};

/// Form state: the bound node id plus the editable field buffers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailForm {
    pub id: String,
    pub fields: NodeFields,
}

impl DetailForm {
    /// Copy a node into the form
    pub fn populate(&mut self, node: &Node) {
        self.id.clone_from(&node.id);
        self.fields = node.fields();
    }

    /// Blank every field
    pub fn clear(&mut self) {
        self.id.clear();
        self.fields = NodeFields::default();
    }

    pub fn is_bound(&self) -> bool {
        !self.id.is_empty()
    }

    /// Show the form. Returns true when the user pressed save.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut save = false;

        egui::ScrollArea::vertical()
            .id_salt("detail_form_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_enabled_ui(self.is_bound(), |ui| {
                    ui.label("ID (Read-Only):");
                    let mut id = self.id.as_str();
                    ui.add(egui::TextEdit::singleline(&mut id).desired_width(f32::INFINITY));
                    ui.add_space(6.0);

                    ui.label("Name:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.fields.name)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(6.0);

                    ui.label("Status:");
                    ui.horizontal(|ui| {
                        let width = ui.available_width() - 40.0;
                        ui.add(
                            egui::TextEdit::singleline(&mut self.fields.status)
                                .desired_width(width),
                        );
                        ui.menu_button("\u{25BE}", |ui| {
                            for status in KNOWN_STATUSES {
                                let label = format!("{} {}", status_glyph(status), status);
                                if ui.button(label).clicked() {
                                    self.fields.status = status.to_string();
                                    ui.close();
                                }
                            }
                        });
                    });
                    ui.add_space(6.0);

                    ui.label("Description:");
                    ui.add(
                        egui::TextEdit::multiline(&mut self.fields.description)
                            .desired_width(f32::INFINITY)
                            .desired_rows(8),
                    );
                    ui.add_space(6.0);

                    ui.label("Notes:");
                    ui.add(
                        egui::TextEdit::multiline(&mut self.fields.notes)
                            .desired_width(f32::INFINITY)
                            .desired_rows(12),
                    );
                    ui.add_space(10.0);

                    if ui.button("\u{1F4BE} Save Changes").clicked() {
                        save = true;
                    }
                });

                if !self.is_bound() {
                    ui.add_space(10.0);
                    ui.weak("Select a node in the tree to edit it.");
                }
            });

        save
    }
}
