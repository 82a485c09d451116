use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

/// Per-request operation scope.
///
/// The guard is opened before the handler runs and released when it goes
/// out of scope, on every exit path. Request-scoped resources belong here;
/// with the store being plain filesystem access, the scope currently
/// carries lifecycle observability only.
pub struct RequestScope {
    method: axum::http::Method,
    path: String,
    opened: Instant,
}

impl RequestScope {
    pub fn open(method: axum::http::Method, path: &str) -> Self {
        debug!("Opened request scope for {} {}", method, path);
        Self {
            method,
            path: path.to_string(),
            opened: Instant::now(),
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        debug!(
            "Released request scope for {} {} after {:?}",
            self.method,
            self.path,
            self.opened.elapsed()
        );
    }
}

/// Wrap every request in a [`RequestScope`]
pub async fn scope_middleware(request: Request, next: Next) -> Response {
    let _scope = RequestScope::open(request.method().clone(), request.uri().path());
    next.run(request).await
}
