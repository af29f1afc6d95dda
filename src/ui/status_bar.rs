//! Status bar with transient messages

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    /// egui input time after which the message disappears
    pub expires_at: f64,
}

/// Bottom status line
#[derive(Debug, Default)]
pub struct StatusBar {
    message: Option<StatusMessage>,
}

impl StatusBar {
    pub fn post(&mut self, kind: MessageKind, text: impl Into<String>, now: f64, secs: f64) {
        self.message = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: now + secs,
        });
    }

    /// The message still visible at `now`
    pub fn current(&self, now: f64) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|m| now < m.expires_at)
    }

    /// Show the bar. Returns seconds until the message expires, so the
    /// caller can schedule a repaint.
    pub fn show(&mut self, ui: &mut egui::Ui, now: f64, document: &str) -> Option<f64> {
        if self.current(now).is_none() {
            self.message = None;
        }

        ui.horizontal(|ui| {
            if let Some(message) = &self.message {
                let color = match message.kind {
                    MessageKind::Info => ui.visuals().text_color(),
                    MessageKind::Error => ui.visuals().error_fg_color,
                };
                ui.label(egui::RichText::new(&message.text).color(color));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(document);
            });
        });

        self.message.as_ref().map(|m| m.expires_at - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let mut bar = StatusBar::default();
        bar.post(MessageKind::Info, "saved", 10.0, 3.0);

        assert_eq!(bar.current(12.9).unwrap().text, "saved");
        assert!(bar.current(13.0).is_none());
    }

    #[test]
    fn test_newer_message_wins() {
        let mut bar = StatusBar::default();
        bar.post(MessageKind::Info, "saved", 0.0, 3.0);
        bar.post(MessageKind::Error, "disk full", 1.0, 5.0);

        let current = bar.current(4.0).unwrap();
        assert_eq!(current.kind, MessageKind::Error);
        assert_eq!(current.text, "disk full");
    }
}
