//! Request extractors.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Identity used to key the rate limiter.
///
/// The peer IP address when the server was started with connect info,
/// otherwise `"unknown"`. The port is left out so that every connection from
/// one host shares a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    /// Identity assigned when the peer address is not available.
    pub const UNKNOWN: &'static str = "unknown";

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| Self::UNKNOWN.to_string(), |info| info.0.ip().to_string());

        Ok(Self(id))
    }
}
