//! Catch-all for requests no route matched.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;

/// Plaintext body returned for unknown method and path combinations.
pub const INVALID_ROUTE_BODY: &str = "404, invalid route";

/// Default service answering every unmatched request with a plaintext 404.
pub async fn invalid_route() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body(INVALID_ROUTE_BODY)
}
