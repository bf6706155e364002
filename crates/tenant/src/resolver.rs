//! Tenant Resolver
//!
//! Picks the database that serves a request from its host. Resolution order:
//! - `%d` exact match on the first host label
//! - `%s` exact match on the registrable-root label
//! - `%h` exact match on the normalized host
//! - regular expression match (the only branch that may return several)
//!
//! Without a pattern, the exposed database list or the first available
//! database is used instead.

use crate::config::{DbFilterConfig, SelectionMode};
use crate::error::Result;
use crate::host::HostCandidates;
use crate::pattern::{matches_from_start, FilterPattern, Placeholder};
use crate::suffix::SuffixClassifier;
use std::sync::Arc;

/// Stateless resolver built once at startup and shared between requests.
#[derive(Clone)]
pub struct TenantResolver {
    mode: SelectionMode,
    classifier: Arc<dyn SuffixClassifier>,
}

impl TenantResolver {
    pub fn new(config: &DbFilterConfig, classifier: Arc<dyn SuffixClassifier>) -> Self {
        Self {
            mode: config.selection_mode(),
            classifier,
        }
    }

    pub fn mode(&self) -> &SelectionMode {
        &self.mode
    }

    /// Databases reachable for `host`, in `tenants` order.
    pub fn resolve(&self, host: &str, tenants: &[String]) -> Result<Vec<String>> {
        match &self.mode {
            SelectionMode::Pattern(pattern) => {
                resolve_by_pattern(pattern, host, tenants, self.classifier.as_ref())
            }
            SelectionMode::Exposed(exposed) => Ok(resolve_exposed(exposed, tenants)),
            SelectionMode::FirstAvailable => Ok(tenants.first().cloned().into_iter().collect()),
        }
    }
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn resolve_by_pattern(
    pattern: &FilterPattern,
    host: &str,
    tenants: &[String],
    classifier: &dyn SuffixClassifier,
) -> Result<Vec<String>> {
    let candidates = HostCandidates::derive(host, classifier)?;

    let exact = [
        (Placeholder::FirstLabel, &candidates.first_label),
        (Placeholder::RegistrableRoot, &candidates.registrable_root),
        (Placeholder::Host, &candidates.normalized_host),
    ];
    for (placeholder, name) in exact {
        if pattern.uses(placeholder) && tenants.contains(name) {
            tracing::debug!(
                "Host '{}' resolved to '{}' via {}",
                host,
                name,
                placeholder.token()
            );
            return Ok(vec![name.clone()]);
        }
    }

    let regex = pattern.compile(&candidates)?;
    let matched: Vec<String> = tenants
        .iter()
        .filter(|name| matches_from_start(&regex, name))
        .cloned()
        .collect();

    tracing::debug!(
        "Host '{}' matched {} database(s) with /{}/",
        host,
        matched.len(),
        regex.as_str()
    );

    Ok(matched)
}

fn resolve_exposed(exposed: &[String], tenants: &[String]) -> Vec<String> {
    exposed
        .iter()
        .filter(|name| tenants.contains(name))
        .min()
        .cloned()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TenantError;
    use std::collections::HashMap;

    /// Classifier backed by a fixed host -> registrable domain table.
    struct StaticSuffixes(HashMap<&'static str, &'static str>);

    impl SuffixClassifier for StaticSuffixes {
        fn registrable_domain(&self, host: &str) -> Result<Option<String>> {
            Ok(self.0.get(host).map(|d| d.to_string()))
        }
    }

    struct Unavailable;

    impl SuffixClassifier for Unavailable {
        fn registrable_domain(&self, _host: &str) -> Result<Option<String>> {
            Err(TenantError::classifier_unavailable("suffix list not loaded"))
        }
    }

    fn resolver(dbfilter: &str, db_name: &str, suffixes: &[(&'static str, &'static str)]) -> TenantResolver {
        let config = DbFilterConfig {
            dbfilter: dbfilter.to_string(),
            db_name: db_name.to_string(),
        };
        TenantResolver::new(
            &config,
            Arc::new(StaticSuffixes(suffixes.iter().copied().collect())),
        )
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_first_label_wins() {
        let r = resolver("^(%d|%s|%h)$", "", &[("acme.example.com", "example.com")]);
        let result = r.resolve("acme.example.com", &names(&["example", "acme"])).unwrap();
        assert_eq!(result, names(&["acme"]));
    }

    #[test]
    fn test_falls_through_to_registrable_root() {
        let r = resolver("^(%d|%s|%h)$", "", &[("x.example.com", "example.com")]);
        let result = r.resolve("x.example.com", &names(&["example", "other"])).unwrap();
        assert_eq!(result, names(&["example"]));
    }

    #[test]
    fn test_registrable_root_multi_label_suffix() {
        let r = resolver("^%s$", "", &[("shop.example.co.uk", "example.co.uk")]);
        let result = r.resolve("www.shop.example.co.uk:8069", &names(&["shop", "example"])).unwrap();
        assert_eq!(result, names(&["example"]));
    }

    #[test]
    fn test_placeholder_absent_skips_exact_match() {
        // `acme` equals the first label, but `%d` is not in the pattern
        let r = resolver("^%h$", "", &[("acme.example.com", "example.com")]);
        let result = r.resolve("acme.example.com", &names(&["acme"])).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_normalized_host_exact_match() {
        let r = resolver("^%h$", "", &[]);
        let result = r
            .resolve("www.acme.example.com:8069", &names(&["acme", "acme.example.com"]))
            .unwrap();
        assert_eq!(result, names(&["acme.example.com"]));
    }

    #[test]
    fn test_regex_fallback_returns_all_matches_in_order() {
        let r = resolver("^db.*$", "", &[]);
        let result = r.resolve("anything.example.com", &names(&["db1", "x", "db2"])).unwrap();
        assert_eq!(result, names(&["db1", "db2"]));
    }

    #[test]
    fn test_regex_fallback_with_substitution() {
        let r = resolver("^%d_.*$", "", &[]);
        let result = r
            .resolve("acme.example.com", &names(&["acme_prod", "acme_test", "other_prod"]))
            .unwrap();
        assert_eq!(result, names(&["acme_prod", "acme_test"]));
    }

    #[test]
    fn test_regex_fallback_matches_prefix_only() {
        let r = resolver("%d", "", &[]);
        let result = r.resolve("acme.example.com", &names(&["acme2", "my_acme"])).unwrap();
        assert_eq!(result, names(&["acme2"]));
    }

    #[test]
    fn test_pattern_compile_error_propagates() {
        let r = resolver("^(%d", "", &[]);
        let err = r.resolve("acme.example.com", &names(&["db1"])).unwrap_err();
        assert!(matches!(err, TenantError::PatternCompile { .. }));
    }

    #[test]
    fn test_exact_match_wins_over_invalid_pattern() {
        let r = resolver("^(%d", "", &[]);
        let result = r.resolve("acme.example.com", &names(&["acme"])).unwrap();
        assert_eq!(result, names(&["acme"]));
    }

    #[test]
    fn test_classifier_unavailable_propagates() {
        let config = DbFilterConfig {
            dbfilter: "^%d$".to_string(),
            db_name: String::new(),
        };
        let r = TenantResolver::new(&config, Arc::new(Unavailable));
        let err = r.resolve("acme.example.com", &names(&["acme"])).unwrap_err();
        assert!(matches!(err, TenantError::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_malformed_host_does_not_fail() {
        let r = resolver("^(%d|%s|%h)$", "", &[]);
        assert!(r.resolve("", &names(&["db1"])).unwrap().is_empty());
        assert!(r.resolve("[::1]:8069", &names(&["db1"])).unwrap().is_empty());
        assert!(r.resolve("a+b(c", &names(&["db1"])).unwrap().is_empty());
    }

    #[test]
    fn test_empty_tenants() {
        assert!(resolver("^%d$", "", &[]).resolve("acme.com", &[]).unwrap().is_empty());
        assert!(resolver("", "db1", &[]).resolve("acme.com", &[]).unwrap().is_empty());
        assert!(resolver("", "", &[]).resolve("acme.com", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_exposed_list_intersection_sorted() {
        let r = resolver("", " db2 , db1 ", &[]);
        let result = r.resolve("acme.example.com", &names(&["db1", "db3"])).unwrap();
        assert_eq!(result, names(&["db1"]));

        let result = r.resolve("acme.example.com", &names(&["db2", "db1"])).unwrap();
        assert_eq!(result, names(&["db1"]));
    }

    #[test]
    fn test_exposed_list_no_intersection() {
        let r = resolver("", "db2", &[]);
        assert!(r.resolve("acme.com", &names(&["db1"])).unwrap().is_empty());
    }

    #[test]
    fn test_first_available_keeps_given_order() {
        let r = resolver("", "", &[]);
        let result = r.resolve("acme.com", &names(&["z", "a"])).unwrap();
        assert_eq!(result, names(&["z"]));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let r = resolver("^(%d|%s)_.*$", "", &[("x.example.com", "example.com")]);
        let tenants = names(&["example_a", "x_b", "example_c"]);
        let first = r.resolve("x.example.com", &tenants).unwrap();
        let second = r.resolve("x.example.com", &tenants).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, names(&["example_a", "x_b", "example_c"]));
    }
}
