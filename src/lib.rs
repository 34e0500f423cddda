//! multirename - batch file renaming with literal substring rules
//!
//! This library validates ordered "before -> after" rule rows, applies them to
//! every file below a directory (one full tree pass per rule), runs that work
//! on a single background worker, and lists the directory afterwards.

pub mod cli;
pub mod config;
pub mod listing;
pub mod logging;
pub mod output;
pub mod renamer;
pub mod request;
pub mod rules;
pub mod worker;

pub use config::{ConfigError, RenameConfig};
pub use listing::{SortOrder, list_directory};
pub use renamer::{PlannedRename, RenameError, RenameReport, RenameResult, RenameStep, Renamer};
pub use request::{PreparedRename, RenameRequest, validate_root};
pub use rules::{Rule, RuleRow, RuleSet};
pub use worker::{RenameHandle, RenameWorker};

pub use cli::{RenameCommand, run_cli};
