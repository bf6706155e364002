// Host-based tenant database selection
// Maps the host of an incoming request to the database that serves it

pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod host;
pub mod pattern;
pub mod resolver;
pub mod suffix;

pub use config::{DbFilterConfig, SelectionMode};
pub use context::{Resolution, TenantContext};
pub use error::{Result, TenantError};
pub use extractor::TenantExtractor;
pub use host::HostCandidates;
pub use pattern::{FilterPattern, Placeholder};
pub use resolver::TenantResolver;
pub use suffix::{EmbeddedSuffixList, SuffixClassifier, SuffixListFile};
