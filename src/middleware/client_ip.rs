//! Middleware that injects `x-real-ip` from the socket address when no
//! proxy headers (`x-forwarded-for`, `x-real-ip`) are present, so the
//! rate limiter always has a client key even for direct connections.

use axum::{extract::Request, middleware::Next, response::Response};
use std::net::SocketAddr;

pub async fn inject_client_ip(mut request: Request, next: Next) -> Response {
    let headers = request.headers();
    let has_forwarded = headers.contains_key("x-forwarded-for");
    let has_real_ip = headers.contains_key("x-real-ip");

    if !has_forwarded && !has_real_ip {
        if let Some(addr) = request
            .extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
        {
            let ip = addr.0.ip().to_string();
            if let Ok(value) = ip.parse() {
                request.headers_mut().insert("x-real-ip", value);
            }
        }
    }

    next.run(request).await
}
