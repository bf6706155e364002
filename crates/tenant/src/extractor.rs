// Tenant extractor implementation
// Reads the request host and resolves it against the available databases

use crate::context::TenantContext;
use crate::error::Result;
use crate::resolver::TenantResolver;
use axum::http::{header, HeaderMap};

const X_FORWARDED_HOST: &str = "x-forwarded-host";

#[derive(Debug, Clone)]
pub struct TenantExtractor {
    resolver: TenantResolver,
    proxy_mode: bool,
}

impl TenantExtractor {
    /// With `proxy_mode`, the host is taken from `X-Forwarded-Host` when a
    /// fronting proxy sets it.
    pub fn new(resolver: TenantResolver, proxy_mode: bool) -> Self {
        Self {
            resolver,
            proxy_mode,
        }
    }

    /// Request host, or the empty string when none is usable.
    pub fn extract_host(&self, headers: &HeaderMap) -> String {
        if self.proxy_mode {
            let forwarded = headers
                .get(X_FORWARDED_HOST)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(host) = forwarded {
                return host.to_string();
            }
        }

        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    pub fn extract_tenant(&self, headers: &HeaderMap, tenants: &[String]) -> Result<TenantContext> {
        let host = self.extract_host(headers);
        let databases = self.resolver.resolve(&host, tenants)?;
        Ok(TenantContext::new(host, databases))
    }
}
