//! formdoc - flat element model and form-control engine
//!
//! This crate provides the core types and logic for editing rich-text
//! documents with embedded form controls, implementing the Elm Architecture
//! pattern over a flat element list per zone.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod control;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod messages;
pub mod model;
pub mod session;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::{Cmd, RenderOptions};
pub use config::{EditorMode, EngineConfig};
pub use error::ControlError;
pub use events::ControlEvent;
pub use messages::Msg;
pub use model::{DocumentData, Element};
pub use session::EditorSession;
pub use update::update;
