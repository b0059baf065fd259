// CORS middleware
use axum::http::{header::HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Create the CORS layer for the billing API.
///
/// The checkout runs inside the desktop app's embedded browser and the
/// marketing site, so the origin list is open; auth is the bearer token, not
/// cookies. OPTIONS preflights short-circuit here and never reach auth.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("content-type"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_creation() {
        let _layer = cors_layer();
        // Layer creation succeeded - type system ensures correctness
    }
}
