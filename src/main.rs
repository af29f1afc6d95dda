//! TreeDesk - hierarchical research project manager
//!
//! A tree of projects and tasks, stored as one YAML document and edited in a
//! two-pane desktop window.

mod app;
mod core;
mod ui;

use app::TreeDeskApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting TreeDesk...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Hierarchical Research Project Manager"),
        ..Default::default()
    };

    eframe::run_native(
        "TreeDesk",
        native_options,
        Box::new(|cc| Ok(Box::new(TreeDeskApp::new(cc)))),
    )
}
