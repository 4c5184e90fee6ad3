//! HTTP Handlers

use axum::Json;
use axum::body::Body;
use axum::extract::{OriginalUri, Request, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::client::extract_client_ip;
use platform::cookie::{self, extract_cookie};
use platform::rate_limit::{MemoryRateLimitStore, RateLimitStore};

use crate::application::config::ProxyConfig;
use crate::application::{
    ForwardInput, ForwardUseCase, PublicForwardUseCase, SignInInput, SignInUseCase, SignOutUseCase,
};
use crate::domain::entity::credentials::{CookieUpdate, SessionCredentials};
use crate::domain::entity::exchange::{ProxyBody, UpstreamResponse};
use crate::domain::gateway::BackendGateway;
use crate::error::{ProxyError, ProxyResult};
use crate::presentation::dto::{LoginRequest, OkResponse};

/// Shared state for proxy handlers
#[derive(Clone)]
pub struct ProxyAppState<G>
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    pub gateway: Arc<G>,
    pub config: Arc<ProxyConfig>,
    pub login_limiter: Arc<MemoryRateLimitStore>,
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<G>(
    State(state): State<ProxyAppState<G>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> ProxyResult<Response>
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let limit_key = client_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let limit = state
        .login_limiter
        .check_and_increment(&limit_key, &state.config.login_rate_limit)
        .await
        .map_err(|e| ProxyError::Internal(e.to_string()))?;

    if !limit.allowed {
        tracing::warn!(client_ip = %limit_key, "Login attempt rate limited");
        return Err(ProxyError::RateLimited);
    }

    let use_case = SignInUseCase::new(state.gateway.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookies = credential_cookie_headers(&state.config, &CookieUpdate::Set(output.tokens));

    Ok((StatusCode::OK, cookies, Json(OkResponse::new())).into_response())
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/logout
///
/// Always succeeds and always clears both credential cookies.
pub async fn sign_out<G>(
    State(state): State<ProxyAppState<G>>,
    headers: HeaderMap,
) -> Response
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    let credentials = read_credentials(&headers, &state.config);

    let use_case = SignOutUseCase::new(state.gateway.clone());
    use_case.execute(credentials).await;

    let cookies = credential_cookie_headers(&state.config, &CookieUpdate::Clear);

    (StatusCode::OK, cookies, Json(OkResponse::new())).into_response()
}

// ============================================================================
// Forwarders
// ============================================================================

/// Authenticated catch-all: relays method, path, query and body verbatim,
/// with transparent single-refresh-on-401.
pub async fn forward_authenticated<G>(
    State(state): State<ProxyAppState<G>>,
    OriginalUri(uri): OriginalUri,
    request: Request,
) -> ProxyResult<Response>
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let credentials = read_credentials(&parts.headers, &state.config);
    let body = read_proxy_body(&parts.headers, body, state.config.max_body_bytes).await?;

    let input = ForwardInput {
        path: upstream_path(&uri),
        method: parts.method,
        body,
    };

    let use_case = ForwardUseCase::new(state.gateway.clone());
    let output = use_case.execute(input, credentials).await?;

    let cookies = credential_cookie_headers(&state.config, &output.cookies);

    Ok(relay_response(output.response, cookies))
}

/// Public forwarder: no credentials, no refresh, no retry
pub async fn forward_public<G>(
    State(state): State<ProxyAppState<G>>,
    OriginalUri(uri): OriginalUri,
    request: Request,
) -> ProxyResult<Response>
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let body = read_proxy_body(&parts.headers, body, state.config.max_body_bytes).await?;

    let input = ForwardInput {
        path: upstream_path(&uri),
        method: parts.method,
        body,
    };

    let use_case = PublicForwardUseCase::new(state.gateway.clone());
    let response = use_case.execute(input).await?;

    Ok(relay_response(response, HeaderMap::new()))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read both credential cookies; cleared (empty) values count as absent
pub(crate) fn read_credentials(headers: &HeaderMap, config: &ProxyConfig) -> SessionCredentials {
    let access =
        extract_cookie(headers, &config.access_cookie_name).filter(|v| !v.is_empty());
    let refresh =
        extract_cookie(headers, &config.refresh_cookie_name).filter(|v| !v.is_empty());

    SessionCredentials::new(access, refresh)
}

/// Backend-relative path for an inbound URI: trailing slash before the
/// query string (Django URL convention), query relayed untouched.
pub(crate) fn upstream_path(uri: &Uri) -> String {
    let mut path = uri.path().to_string();

    if !path.ends_with('/') {
        path.push('/');
    }

    if let Some(query) = uri.query() {
        path.push('?');
        path.push_str(query);
    }

    path
}

/// Buffer the inbound body for relay. Non-empty bodies keep their inbound
/// content type so multipart boundaries survive.
pub(crate) async fn read_proxy_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> ProxyResult<ProxyBody> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ProxyError::BodyTooLarge)?;

    if bytes.is_empty() {
        return Ok(ProxyBody::Empty);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    Ok(ProxyBody::Raw {
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// Set-Cookie headers for a cookie side effect; both cookies always move
/// together
pub(crate) fn credential_cookie_headers(
    config: &ProxyConfig,
    update: &CookieUpdate,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    match update {
        CookieUpdate::None => {}
        CookieUpdate::Set(pair) => {
            headers.append(
                header::SET_COOKIE,
                cookie::set_cookie_header(&config.access_cookie(), &pair.access),
            );
            headers.append(
                header::SET_COOKIE,
                cookie::set_cookie_header(&config.refresh_cookie(), &pair.refresh),
            );
        }
        CookieUpdate::Clear => {
            headers.append(
                header::SET_COOKIE,
                cookie::delete_cookie_header(&config.access_cookie()),
            );
            headers.append(
                header::SET_COOKIE,
                cookie::delete_cookie_header(&config.refresh_cookie()),
            );
        }
    }

    headers
}

/// Emit the upstream envelope: status verbatim, JSON body when present,
/// 204 always empty
pub(crate) fn relay_response(upstream: UpstreamResponse, cookie_headers: HeaderMap) -> Response {
    if upstream.status == StatusCode::NO_CONTENT {
        return (StatusCode::NO_CONTENT, cookie_headers).into_response();
    }

    match upstream.body {
        Some(body) => (upstream.status, cookie_headers, Json(body)).into_response(),
        None => (upstream.status, cookie_headers).into_response(),
    }
}
