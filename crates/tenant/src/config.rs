use crate::pattern::FilterPattern;
use serde::Deserialize;

/// Database selection settings. An empty value disables the option.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DbFilterConfig {
    /// Regular expression with `%d`, `%s` and `%h` placeholders
    #[serde(default)]
    pub dbfilter: String,
    /// Comma-separated list of exposed databases
    #[serde(default)]
    pub db_name: String,
}

impl DbFilterConfig {
    /// Environment variables take precedence over values from a file.
    ///
    /// - DBFILTER: filter pattern
    /// - DB_NAME: comma-separated database allowlist
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dbfilter) = std::env::var("DBFILTER") {
            self.dbfilter = dbfilter;
        }
        if let Ok(db_name) = std::env::var("DB_NAME") {
            self.db_name = db_name;
        }
        self
    }

    pub fn selection_mode(&self) -> SelectionMode {
        if !self.dbfilter.is_empty() {
            SelectionMode::Pattern(FilterPattern::new(self.dbfilter.clone()))
        } else if !self.db_name.is_empty() {
            SelectionMode::Exposed(
                self.db_name
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .collect(),
            )
        } else {
            SelectionMode::FirstAvailable
        }
    }
}

/// How a tenant is chosen. The pattern wins over the allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    Pattern(FilterPattern),
    Exposed(Vec<String>),
    FirstAvailable,
}
