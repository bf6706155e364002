use crate::config::TenantUpstream;
use crate::reverse_proxy::ReverseProxy;

/// Databases the proxy can route to, in configuration order.
pub struct TenantDirectory {
    tenants: Vec<(String, ReverseProxy)>,
}

impl TenantDirectory {
    pub fn new(tenants: &[TenantUpstream]) -> Self {
        Self {
            tenants: tenants
                .iter()
                .map(|t| (t.name.clone(), ReverseProxy::new(&t.upstream)))
                .collect(),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.tenants.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn proxy(&self, name: &str) -> Option<&ReverseProxy> {
        self.tenants
            .iter()
            .find(|(tenant, _)| tenant == name)
            .map(|(_, proxy)| proxy)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
