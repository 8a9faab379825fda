//! Saved-lead command handlers for the CLI.
//!
//! Each invocation opens the storage slot, applies one mutation (which the
//! store writes straight back) and prints the outcome.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;
use leadscout_core::{write_export, LeadStorage, LeadStore, ListTarget};

use crate::lookup::resolve_lead_ref;
use crate::render::{render_table, View};

/// Sub-commands available under `leads`.
#[derive(Debug, Subcommand)]
pub enum LeadsCommands {
    /// Show the saved leads
    List,
    /// Flip the called status of a saved lead
    Toggle {
        /// Row number from `leads list` or a lead id (prefix accepted)
        lead: String,
    },
    /// Replace the notes on a saved lead
    Notes {
        /// Row number from `leads list` or a lead id (prefix accepted)
        lead: String,
        /// New notes text (may be empty to clear)
        #[arg(num_args = 0.., trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Delete a saved lead
    Remove {
        /// Row number from `leads list` or a lead id (prefix accepted)
        lead: String,
    },
    /// Write the saved leads to restaurant_leads_<date>.csv
    Export {
        /// Output directory (defaults to LEADSCOUT_EXPORT_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Apply one `leads` sub-command to `store` and return what to print.
///
/// # Errors
///
/// Returns an error if a lead reference does not resolve, the saved list
/// cannot be written back, or the export cannot be written.
pub(crate) fn run_leads_command<S: LeadStorage>(
    store: &mut LeadStore<S>,
    command: LeadsCommands,
    export_dir: &Path,
    today: NaiveDate,
) -> anyhow::Result<String> {
    match command {
        LeadsCommands::List => Ok(format!(
            "Saved leads ({})\n{}",
            store.saved().len(),
            render_table(store.saved(), View::Leads)
        )),
        LeadsCommands::Toggle { lead } => {
            let id = resolve_lead_ref(store.saved(), &lead)?;
            store.toggle_called(id, ListTarget::Saved);
            store.check_persisted()?;
            let called = store.find_saved(id).is_some_and(|l| l.called);
            Ok(format!(
                "marked {} as {}",
                lead,
                if called { "called" } else { "not called" }
            ))
        }
        LeadsCommands::Notes { lead, text } => {
            let id = resolve_lead_ref(store.saved(), &lead)?;
            store.update_notes(id, text.join(" "));
            store.check_persisted()?;
            Ok(format!("notes updated for {lead}"))
        }
        LeadsCommands::Remove { lead } => {
            let id = resolve_lead_ref(store.saved(), &lead)?;
            let name = store
                .find_saved(id)
                .map(|l| l.name.clone())
                .unwrap_or_default();
            store.remove_lead(id);
            store.check_persisted()?;
            Ok(format!("removed {name}"))
        }
        LeadsCommands::Export { dir } => {
            if store.saved().is_empty() {
                return Ok("no saved leads to export".to_string());
            }
            let dir = dir.as_deref().unwrap_or(export_dir);
            let path = write_export(store.saved(), dir, today)?;
            Ok(format!(
                "exported {} leads to {}",
                store.saved().len(),
                path.display()
            ))
        }
    }
}
