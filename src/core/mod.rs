//! Project tree model, document storage, session state, and configuration

pub mod config;
pub mod document;
pub mod forest;
pub mod node;
pub mod session;
