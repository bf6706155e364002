//! Public suffix classification
//!
//! Maps a hostname to its registrable domain (the public suffix plus one
//! label), e.g. `a.b.example.com` -> `example.com` and
//! `shop.example.co.uk` -> `example.co.uk`.

use crate::error::{Result, TenantError};
use publicsuffix::Psl as _;
use std::path::Path;

/// Lookup of the registrable domain for a host.
///
/// `Ok(None)` means the host has no registrable domain (single label,
/// bare suffix, IP literal). An `Err` means the classifier itself cannot
/// answer and must not be treated as a miss.
pub trait SuffixClassifier: Send + Sync {
    fn registrable_domain(&self, host: &str) -> Result<Option<String>>;
}

/// Public suffix list compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSuffixList;

impl EmbeddedSuffixList {
    pub fn new() -> Self {
        Self
    }
}

impl SuffixClassifier for EmbeddedSuffixList {
    fn registrable_domain(&self, host: &str) -> Result<Option<String>> {
        let host = host.to_lowercase();
        Ok(psl::domain_str(&host).map(str::to_string))
    }
}

/// Public suffix list parsed once from a `public_suffix_list.dat` file.
pub struct SuffixListFile {
    list: publicsuffix::List,
}

impl SuffixListFile {
    /// Load and parse the list. Any failure is reported as the classifier
    /// being unavailable.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TenantError::classifier_unavailable(format!(
                "cannot read suffix list {}: {}",
                path.display(),
                e
            ))
        })?;

        let list = Self::parse(&content).map_err(|e| {
            TenantError::classifier_unavailable(format!(
                "cannot parse suffix list {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!("Loaded public suffix list from {}", path.display());
        Ok(list)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let list: publicsuffix::List = content
            .parse()
            .map_err(|e: publicsuffix::Error| TenantError::classifier_unavailable(e))?;
        Ok(Self { list })
    }
}

impl SuffixClassifier for SuffixListFile {
    fn registrable_domain(&self, host: &str) -> Result<Option<String>> {
        let host = host.to_lowercase();
        Ok(self
            .list
            .domain(host.as_bytes())
            .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
            .map(str::to_string))
    }
}

impl std::fmt::Debug for SuffixListFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuffixListFile").finish_non_exhaustive()
    }
}
