//! Interactive session: both lead lists live in memory for the whole run.
//!
//! A search runs as a spawned task so the prompt keeps accepting saved-lead
//! commands while it is in flight. Only one search may be pending; its
//! outcome is applied when the task completes.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use leadscout_core::{
    write_export, AppConfig, JsonFileStorage, Lead, LeadFinder, LeadStorage, LeadStore,
    ListTarget, MemoryStorage, SearchFailed, SearchState,
};
use leadscout_gemini::GeminiClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::lookup::resolve_lead_ref;
use crate::render::{render_search_error, render_table, View};

const HELP: &str = "\
commands:
  search <location>     scan an area for restaurants without a website
  results               show the latest search results
  leads                 show saved leads
  call <ref>            toggle called on a row in the current view
  save <ref>            copy a search result into saved leads
  notes <ref> <text>    replace the notes on a saved lead
  remove <ref>          delete a saved lead
  export [dir]          write saved leads to restaurant_leads_<date>.csv
  help                  show this list
  quit                  leave the session
<ref> is a row number from the table or a lead id (prefix accepted).";

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Search(String),
    Results,
    Leads,
    Call(String),
    Save(String),
    Notes { lead: String, text: String },
    Remove(String),
    Export(Option<PathBuf>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse one input line. Arguments keep their inner spacing.
pub(crate) fn parse_session_command(line: &str) -> SessionCommand {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let needs_arg = |ctor: fn(String) -> SessionCommand| {
        if rest.is_empty() {
            SessionCommand::Unknown(format!("{word} needs an argument"))
        } else {
            ctor(rest.to_string())
        }
    };

    match word.to_ascii_lowercase().as_str() {
        "" => SessionCommand::Empty,
        "search" | "scan" => needs_arg(SessionCommand::Search),
        "results" => SessionCommand::Results,
        "leads" | "saved" => SessionCommand::Leads,
        "call" => needs_arg(SessionCommand::Call),
        "save" => needs_arg(SessionCommand::Save),
        "remove" | "rm" => needs_arg(SessionCommand::Remove),
        "notes" => match rest.split_once(char::is_whitespace) {
            Some((lead, text)) => SessionCommand::Notes {
                lead: lead.to_string(),
                text: text.trim().to_string(),
            },
            None if !rest.is_empty() => SessionCommand::Notes {
                lead: rest.to_string(),
                text: String::new(),
            },
            None => SessionCommand::Unknown("notes needs a lead reference".to_string()),
        },
        "export" => SessionCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => SessionCommand::Unknown(format!("unknown command '{other}'; type help")),
    }
}

/// Outcome a finished search task sends back to the prompt loop.
pub(crate) type SearchOutcome = Result<Vec<Lead>, SearchFailed>;

/// Everything the session mutates, owned in one place.
///
/// `finder` is `None` when no API key is configured; saved-lead commands
/// still work then.
pub(crate) struct Session<S: LeadStorage, F> {
    store: LeadStore<S>,
    search: SearchState,
    view: View,
    finder: Option<Arc<F>>,
    outcomes: mpsc::UnboundedSender<SearchOutcome>,
    export_dir: PathBuf,
}

impl<S, F> Session<S, F>
where
    S: LeadStorage,
    F: LeadFinder + Send + Sync + 'static,
{
    pub(crate) fn new(
        store: LeadStore<S>,
        finder: Option<Arc<F>>,
        outcomes: mpsc::UnboundedSender<SearchOutcome>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            search: SearchState::new(),
            view: View::Search,
            finder,
            outcomes,
            export_dir,
        }
    }

    pub(crate) fn store(&self) -> &LeadStore<S> {
        &self.store
    }

    /// Handle one command. Returns the text to print and whether to keep going.
    pub(crate) fn handle(&mut self, command: SessionCommand) -> (String, bool) {
        let output = match command {
            SessionCommand::Empty => String::new(),
            SessionCommand::Quit => return (String::new(), false),
            SessionCommand::Help => format!("{HELP}\n"),
            SessionCommand::Unknown(msg) => format!("{msg}\n"),
            SessionCommand::Search(location) => self.start_search(&location),
            SessionCommand::Results => {
                self.view = View::Search;
                self.render_current()
            }
            SessionCommand::Leads => {
                self.view = View::Leads;
                self.render_current()
            }
            SessionCommand::Call(reference) => self.call(&reference),
            SessionCommand::Save(reference) => self.save(&reference),
            SessionCommand::Notes { lead, text } => self.notes(&lead, text),
            SessionCommand::Remove(reference) => self.remove(&reference),
            SessionCommand::Export(dir) => self.export(dir),
        };
        (output, true)
    }

    fn render_current(&self) -> String {
        match self.view {
            View::Search => {
                let mut out = String::new();
                if let Some(location) = self.search.pending_location() {
                    let _ = writeln!(out, "(scanning {location}...)");
                }
                if let Some(error) = self.search.error() {
                    out.push_str(&render_search_error(error));
                }
                out.push_str(&render_table(self.store.results(), View::Search));
                out
            }
            View::Leads => format!(
                "Saved leads ({})\n{}",
                self.store.saved().len(),
                render_table(self.store.saved(), View::Leads)
            ),
        }
    }

    fn start_search(&mut self, raw_location: &str) -> String {
        let Some(finder) = self.finder.clone() else {
            return "searching needs GEMINI_API_KEY; saved-lead commands still work\n"
                .to_string();
        };
        let location = match self.search.begin(raw_location) {
            Ok(location) => location,
            Err(e) => return format!("{e}\n"),
        };

        let task_location = location.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = finder.find_leads(&task_location).await;
            if outcomes.send(outcome).is_err() {
                tracing::debug!(location = %task_location, "session closed before search finished");
            }
        });
        self.view = View::Search;
        format!("scanning {location}... (other commands keep working meanwhile)\n")
    }

    /// Apply a finished search task's outcome.
    pub(crate) fn complete_search(&mut self, outcome: SearchOutcome) -> String {
        match self.search.finish(&mut self.store, outcome) {
            Ok(count) => format!(
                "Found {count} restaurants without a website\n{}",
                render_table(self.store.results(), View::Search)
            ),
            Err(e) => render_search_error(&e.to_string()),
        }
    }

    fn call(&mut self, reference: &str) -> String {
        let (list, target) = match self.view {
            View::Search => (self.store.results(), ListTarget::Results),
            View::Leads => (self.store.saved(), ListTarget::Saved),
        };
        match resolve_lead_ref(list, reference) {
            Ok(id) => {
                self.store.toggle_called(id, target);
                let lead = match target {
                    ListTarget::Results => self.store.find_result(id),
                    ListTarget::Saved => self.store.find_saved(id),
                };
                let out = lead.map_or_else(String::new, |l| {
                    format!(
                        "{}: {}\n",
                        l.name,
                        if l.called { "called" } else { "not called" }
                    )
                });
                out + &self.persist_warning()
            }
            Err(e) => format!("{e}\n"),
        }
    }

    fn save(&mut self, reference: &str) -> String {
        let lead = resolve_lead_ref(self.store.results(), reference)
            .ok()
            .and_then(|id| self.store.find_result(id).cloned());
        match lead {
            Some(lead) => {
                let name = lead.name.clone();
                if self.store.save_lead(lead) {
                    format!("saved {name}\n{}", self.persist_warning())
                } else {
                    format!("{name} is already in saved leads\n")
                }
            }
            None => format!("no search result matches '{reference}'\n"),
        }
    }

    fn notes(&mut self, reference: &str, text: String) -> String {
        match resolve_lead_ref(self.store.saved(), reference) {
            Ok(id) => {
                self.store.update_notes(id, text);
                format!("notes updated\n{}", self.persist_warning())
            }
            Err(e) => format!("{e}\n"),
        }
    }

    fn remove(&mut self, reference: &str) -> String {
        match resolve_lead_ref(self.store.saved(), reference) {
            Ok(id) => {
                let name = self
                    .store
                    .find_saved(id)
                    .map(|l| l.name.clone())
                    .unwrap_or_default();
                self.store.remove_lead(id);
                format!("removed {name}\n{}", self.persist_warning())
            }
            Err(e) => format!("{e}\n"),
        }
    }

    fn export(&self, dir: Option<PathBuf>) -> String {
        if self.store.saved().is_empty() {
            return "no saved leads to export\n".to_string();
        }
        let dir = dir.unwrap_or_else(|| self.export_dir.clone());
        match write_export(self.store.saved(), &dir, Utc::now().date_naive()) {
            Ok(path) => format!(
                "exported {} leads to {}\n",
                self.store.saved().len(),
                path.display()
            ),
            Err(e) => format!("export failed: {e}\n"),
        }
    }

    /// A line telling the user the saved list on disk is behind memory.
    fn persist_warning(&mut self) -> String {
        self.store
            .take_persist_error()
            .map_or_else(String::new, |e| {
                format!("warning: saved leads were not written ({e}); they stay in this session\n")
            })
    }

    pub(crate) fn pending_location(&self) -> Option<&str> {
        self.search.pending_location()
    }
}

/// Run the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading standard input fails.
pub(crate) async fn run_session(config: &AppConfig, ephemeral: bool) -> anyhow::Result<()> {
    let client = match GeminiClient::from_config(config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "search disabled for this session");
            None
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    if ephemeral {
        let store = LeadStore::open(MemoryStorage::new());
        drive(Session::new(store, client, tx, config.export_dir.clone()), rx).await
    } else {
        let store = LeadStore::open(JsonFileStorage::new(&config.storage_path));
        drive(Session::new(store, client, tx, config.export_dir.clone()), rx).await
    }
}

async fn drive<S, F>(
    mut session: Session<S, F>,
    mut outcomes: mpsc::UnboundedReceiver<SearchOutcome>,
) -> anyhow::Result<()>
where
    S: LeadStorage,
    F: LeadFinder + Send + Sync + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!(
        "leadscout session: {} saved leads. Type help for commands.",
        session.store().saved().len()
    );

    loop {
        tokio::select! {
            Some(outcome) = outcomes.recv() => {
                print!("\n{}", session.complete_search(outcome));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let (output, keep_going) = session.handle(parse_session_command(&line));
                print!("{output}");
                if !keep_going {
                    break;
                }
            }
        }
    }

    if let Some(location) = session.pending_location() {
        println!("abandoning the search for {location}");
    }
    Ok(())
}
