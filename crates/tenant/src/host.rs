// Host-derived identifiers used to pick a tenant database

use crate::error::Result;
use crate::suffix::SuffixClassifier;

/// The three identifiers a request host can map to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCandidates {
    /// Host without port and without a leading `www.` (`%h`)
    pub normalized_host: String,
    /// Everything before the first dot of the normalized host (`%d`)
    pub first_label: String,
    /// Leftmost label of the registrable domain (`%s`)
    pub registrable_root: String,
}

impl HostCandidates {
    pub fn derive(host: &str, classifier: &dyn SuffixClassifier) -> Result<Self> {
        let normalized_host = normalize_host(host).to_string();
        let first_label = first_label(&normalized_host).to_string();

        // A host without a registrable domain falls back to itself
        let registrable_root = match classifier.registrable_domain(&normalized_host)? {
            Some(domain) if !domain.is_empty() => self::first_label(&domain).to_string(),
            _ => normalized_host.clone(),
        };

        Ok(Self {
            normalized_host,
            first_label,
            registrable_root,
        })
    }
}

/// Strip the port and a single leading `www.` label.
pub fn normalize_host(host: &str) -> &str {
    let host = host.split(':').next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host)
}

/// Characters before the first `.`, or the whole value without a dot.
pub fn first_label(host: &str) -> &str {
    host.split('.').next().unwrap_or_default()
}
