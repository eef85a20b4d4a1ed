/**
 * Request Metadata
 *
 * The client details recorded with activity logs and analytics events.
 * `RequestMeta` is an Axum extractor that never rejects: every field is
 * optional.
 */

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use serde_json::{json, Value};

/// Who made a request, as far as the headers tell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub language: Option<String>,
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RequestMeta {
    /// Build from headers and, when available, the peer address
    ///
    /// The first hop of `X-Forwarded-For` wins over the socket address,
    /// but only when it parses as an IP address.
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());

        Self {
            ip_address: forwarded
                .or_else(|| peer.map(|addr| addr.ip()))
                .map(|ip| ip.to_string()),
            user_agent: header_string(headers, header::USER_AGENT),
            referer: header_string(headers, header::REFERER),
            language: header_string(headers, header::ACCEPT_LANGUAGE),
        }
    }

    /// `device_info` JSON stored with analytics events
    pub fn device_info(&self) -> Value {
        json!({
            "ip": self.ip_address,
            "user_agent": self.user_agent,
            "referer": self.referer,
            "language": self.language,
        })
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_headers(&parts.headers, peer))
    }
}
