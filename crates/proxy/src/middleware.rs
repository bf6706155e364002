use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dbfilter_tenant::{Resolution, TenantError};
use std::sync::Arc;

use crate::ProxyState;

/// Lists the databases reachable for the request host instead of proxying.
pub const DATABASE_LIST_PATH: &str = "/web/database/list";

/// Main request handler: resolves the tenant and forwards to its upstream.
pub async fn handle_request(state: Arc<ProxyState>, req: Request<Body>) -> Response {
    let tenants = state.directory.names();

    let ctx = match state.extractor.extract_tenant(req.headers(), &tenants) {
        Ok(ctx) => ctx,
        Err(e) => return resolution_error(&e),
    };

    if req.uri().path() == DATABASE_LIST_PATH {
        return Json(serde_json::json!({ "databases": ctx.databases() })).into_response();
    }

    match ctx.resolution {
        Resolution::Resolved(database) => {
            let Some(proxy) = state.directory.proxy(&database) else {
                tracing::error!("Resolved database '{}' has no upstream", database);
                return json_error(StatusCode::BAD_GATEWAY, "Database has no upstream");
            };

            match proxy.forward(req, &database, &ctx.host).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::error!("Proxy forward error for database '{}': {}", database, e);
                    json_error(StatusCode::BAD_GATEWAY, "Upstream service unavailable")
                }
            }
        }
        Resolution::Ambiguous(databases) => {
            tracing::info!(
                "Host '{}' matches {} databases, showing selector",
                ctx.host,
                databases.len()
            );
            (
                StatusCode::MULTIPLE_CHOICES,
                Json(serde_json::json!({
                    "error": "Several databases match this host",
                    "databases": databases,
                })),
            )
                .into_response()
        }
        Resolution::Unresolved => {
            tracing::info!("No database for host '{}'", ctx.host);
            json_error(StatusCode::NOT_FOUND, "No database matches this host")
        }
    }
}

fn resolution_error(err: &TenantError) -> Response {
    match err {
        TenantError::ClassifierUnavailable(_) => {
            tracing::error!("Tenant resolution failed: {}", err);
            json_error(StatusCode::SERVICE_UNAVAILABLE, "Database selection unavailable")
        }
        TenantError::PatternCompile { .. } => {
            tracing::error!("Tenant resolution failed: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid database filter")
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
