use crate::error::{Result, TenantError};
use crate::host::HostCandidates;
use regex::{Captures, Regex};

lazy_static::lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"%[dhs]").unwrap();
}

/// Host-derived tokens recognized inside a dbfilter pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `%d`: first label of the host
    FirstLabel,
    /// `%s`: registrable-root label
    RegistrableRoot,
    /// `%h`: host without port and `www.`
    Host,
}

impl Placeholder {
    pub fn token(self) -> &'static str {
        match self {
            Self::FirstLabel => "%d",
            Self::RegistrableRoot => "%s",
            Self::Host => "%h",
        }
    }

    fn value(self, candidates: &HostCandidates) -> &str {
        match self {
            Self::FirstLabel => &candidates.first_label,
            Self::RegistrableRoot => &candidates.registrable_root,
            Self::Host => &candidates.normalized_host,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "%d" => Some(Self::FirstLabel),
            "%s" => Some(Self::RegistrableRoot),
            "%h" => Some(Self::Host),
            _ => None,
        }
    }
}

/// A dbfilter regular expression with host placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPattern(String);

impl FilterPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.0.contains(placeholder.token())
    }

    /// Replace every placeholder with the escaped host value in one scan.
    /// Substituted text is never rescanned, so a host value containing
    /// `%s` stays literal.
    pub fn substitute(&self, candidates: &HostCandidates) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.0, |caps: &Captures| {
                let token = &caps[0];
                match Placeholder::from_token(token) {
                    Some(placeholder) => regex::escape(placeholder.value(candidates)),
                    None => token.to_string(),
                }
            })
            .into_owned()
    }

    pub fn compile(&self, candidates: &HostCandidates) -> Result<Regex> {
        let pattern = self.substitute(candidates);
        Regex::new(&pattern).map_err(|source| TenantError::PatternCompile { pattern, source })
    }
}

/// True when `regex` matches `name` starting at its first character.
pub fn matches_from_start(regex: &Regex, name: &str) -> bool {
    // The leftmost match starts at 0 whenever any match at 0 exists
    regex.find(name).is_some_and(|m| m.start() == 0)
}
