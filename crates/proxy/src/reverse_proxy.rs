use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::str::FromStr;

/// Header carrying the selected database to the upstream.
pub const DATABASE_HEADER: &str = "x-dbfilter-database";

const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Largest request body buffered before forwarding.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Headers that should NOT be forwarded between hops.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

pub struct ReverseProxy {
    client: Client<HttpConnector, Body>,
    upstream: String,
}

impl ReverseProxy {
    pub fn new(upstream: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            client,
            upstream: upstream.trim_end_matches('/').to_string(),
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Forward `req` for `database`. `host` is the host the database was
    /// resolved from; it replaces any client-supplied `X-Forwarded-Host`.
    pub async fn forward(
        &self,
        req: Request<Body>,
        database: &str,
        host: &str,
    ) -> Result<Response<Body>, Box<dyn std::error::Error + Send + Sync>> {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| "/".to_string());

        let upstream_uri = format!("{}{}", self.upstream, path_and_query);

        // Collect the body so we can set Content-Length correctly
        let (parts, body) = req.into_parts();
        let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await?;

        tracing::debug!(
            "Forwarding {} {} → {} for database '{}' (body: {} bytes)",
            parts.method,
            path_and_query,
            upstream_uri,
            database,
            body_bytes.len()
        );

        let mut builder = Request::builder()
            .method(parts.method)
            .uri(Uri::from_str(&upstream_uri)?);

        if let Some(headers) = builder.headers_mut() {
            for (name, value) in parts.headers.iter() {
                let name_str = name.as_str();
                if HOP_BY_HOP.contains(&name_str)
                    || name_str == DATABASE_HEADER
                    || name_str == X_FORWARDED_HOST
                {
                    continue;
                }
                // hyper sets the Host for the upstream
                if *name == header::HOST {
                    continue;
                }
                headers.append(name.clone(), value.clone());
            }

            headers.insert(
                HeaderName::from_static(X_FORWARDED_HOST),
                HeaderValue::from_str(host)?,
            );

            if !body_bytes.is_empty() {
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));
            }

            headers.insert(
                HeaderName::from_static(DATABASE_HEADER),
                HeaderValue::from_str(database)?,
            );
        }

        let new_req = builder.body(Body::from(body_bytes))?;
        let response = self.client.request(new_req).await?;
        let (parts, incoming) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(incoming)))
    }
}
