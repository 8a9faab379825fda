use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Needed only for searches; saved-lead commands work without it.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub storage_path: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("storage_path", &self.storage_path)
            .field("export_dir", &self.export_dir)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
