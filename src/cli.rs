//! Command-line interface over JSON documents
//!
//! Supports:
//! - Expanding a compound document into flat element lists
//! - Zipping flat lists back into compound form
//! - Reading control values by id, concept id or area id
//! - Batch value injection

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{EditorMode, EngineConfig};
use crate::control::ControlValue;
use crate::events::ControlEvent;
use crate::format::{format_element_list, zip_element_list_in_place, FormatOptions};
use crate::model::{DocumentData, GetValueOption, IdGenerator, SetValueOption, Zone};
use crate::session::EditorSession;

/// Flat element model and form-control engine
#[derive(Parser, Debug)]
#[command(name = "formdoc", version, about = "Inspect and fill form documents")]
pub struct CliArgs {
    /// Config file to use instead of the user config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Expand a compound document into flat element lists
    Expand {
        /// Compound document (JSON)
        input: PathBuf,
    },
    /// Zip flat element lists back into a compound document
    Zip {
        /// Flat document (JSON)
        input: PathBuf,
    },
    /// Print control values; every control when no target is given
    Values {
        /// Compound document (JSON)
        input: PathBuf,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Inject values and print the updated document and events
    SetValues {
        /// Compound document (JSON)
        input: PathBuf,
        /// List of `{ id | conceptId | areaId, value }` entries (JSON)
        values: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct TargetArgs {
    /// Control id
    #[arg(long)]
    pub id: Option<String>,
    /// Concept id shared by several controls
    #[arg(long)]
    pub concept_id: Option<String>,
    /// Id of an enclosing area
    #[arg(long)]
    pub area_id: Option<String>,
}

impl TargetArgs {
    /// `None` when no selector was given
    pub fn into_option(self) -> Option<GetValueOption> {
        if self.id.is_none() && self.concept_id.is_none() && self.area_id.is_none() {
            return None;
        }
        Some(GetValueOption {
            id: self.id,
            concept_id: self.concept_id,
            area_id: self.area_id,
        })
    }
}

/// Result of `set-values`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetValuesReport {
    pub changed: bool,
    pub document: DocumentData,
    pub events: Vec<ControlEvent>,
}

/// Expand every zone in place
pub fn expand_document(mut document: DocumentData, config: &EngineConfig) -> DocumentData {
    let mut ids = IdGenerator::default();
    for zone in Zone::ALL {
        format_element_list(document.zone_mut(zone), &FormatOptions::new(config), &mut ids);
    }
    document
}

/// Zip every zone in place
pub fn zip_document(mut document: DocumentData, config: &EngineConfig) -> DocumentData {
    for zone in Zone::ALL {
        zip_element_list_in_place(document.zone_mut(zone), config);
    }
    document
}

/// Values of the targeted controls, or of every control
pub fn control_values(
    document: DocumentData,
    config: EngineConfig,
    target: Option<GetValueOption>,
) -> Vec<ControlValue> {
    let session = EditorSession::with_document(document, config);
    match target {
        Some(option) => session.value_by_id(&option),
        None => {
            let mut ids: Vec<String> = Vec::new();
            for head in session.control_list() {
                if let Some(id) = head.control_id {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            ids.into_iter()
                .flat_map(|id| session.value_by_id(&GetValueOption::by_id(id)))
                .collect()
        }
    }
}

/// Apply a batch of values the way a host would through the session
pub fn set_values(
    document: DocumentData,
    mut config: EngineConfig,
    options: Vec<SetValueOption>,
) -> SetValuesReport {
    // Filling a document is not an interactive edit
    if config.mode.is_readonly() {
        config.mode = EditorMode::Edit;
    }
    let mut session = EditorSession::with_document(document, config);
    let changed = session.set_value_list_by_id(options).is_some();
    SetValuesReport {
        changed,
        document: session.zipped(),
        events: session.drain_events(),
    }
}
