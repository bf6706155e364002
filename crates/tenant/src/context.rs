// Tenant context for request handling

/// Outcome of resolving a request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one database serves the host
    Resolved(String),
    /// The pattern matched several databases; the caller shows a selector
    Ambiguous(Vec<String>),
    /// No database is reachable for the host
    Unresolved,
}

impl From<Vec<String>> for Resolution {
    fn from(mut databases: Vec<String>) -> Self {
        match databases.len() {
            0 => Self::Unresolved,
            1 => Self::Resolved(databases.remove(0)),
            _ => Self::Ambiguous(databases),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TenantContext {
    pub host: String,
    pub resolution: Resolution,
}

impl TenantContext {
    pub fn new(host: impl Into<String>, databases: Vec<String>) -> Self {
        Self {
            host: host.into(),
            resolution: Resolution::from(databases),
        }
    }

    pub fn databases(&self) -> Vec<String> {
        match &self.resolution {
            Resolution::Resolved(name) => vec![name.clone()],
            Resolution::Ambiguous(names) => names.clone(),
            Resolution::Unresolved => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_from_databases() {
        assert_eq!(Resolution::from(vec![]), Resolution::Unresolved);
        assert_eq!(
            Resolution::from(vec!["db1".to_string()]),
            Resolution::Resolved("db1".to_string())
        );
        assert_eq!(
            Resolution::from(vec!["db1".to_string(), "db2".to_string()]),
            Resolution::Ambiguous(vec!["db1".to_string(), "db2".to_string()])
        );
    }

    #[test]
    fn test_context_databases() {
        let ctx = TenantContext::new("acme.example.com", vec!["acme".to_string()]);
        assert_eq!(ctx.resolution, Resolution::Resolved("acme".to_string()));
        assert_eq!(ctx.databases(), vec!["acme".to_string()]);

        let ctx = TenantContext::new("example.com", vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(ctx.resolution, Resolution::Ambiguous(_)));
        assert_eq!(ctx.databases().len(), 2);
    }
}
