//! Core domain for leadscout.
//!
//! Holds the [`Lead`] record, the [`LeadStore`] that owns the transient
//! search results and the persisted saved-leads list, the CSV export encoder,
//! the search session state machine and environment-driven configuration.
//! Nothing here talks to the network; the Gemini client lives in
//! `leadscout-gemini` and plugs in through [`LeadFinder`].

pub mod app_config;
pub mod config;
pub mod error;
pub mod export;
pub mod lead;
pub mod session;
pub mod storage;
pub mod store;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ExportError, SearchFailed, StorageError, SEARCH_FAILED_MESSAGE};
pub use export::{encode_csv, export_file_name, write_export, CSV_HEADER};
pub use lead::{BusinessListing, Lead};
pub use session::{run_search, LeadFinder, SearchError, SearchRejected, SearchState};
pub use storage::{JsonFileStorage, LeadStorage, MemoryStorage};
pub use store::{LeadStore, ListTarget};
