//! UI components for TreeDesk

pub mod detail_form;
pub mod dialogs;
pub mod project_tree;
pub mod status_bar;
