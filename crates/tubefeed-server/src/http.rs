//! HTTP surface.
//!
//! Routes:
//! - `GET /feed?who=<username>` - enriched activity for a user; `who`
//!   absent resolves the authenticated user
//! - `GET /feed/friends` - enriched friend activity for the
//!   authenticated user
//! - `GET /whoami` - the authenticated username
//! - `GET /healthz` - liveness
//!
//! Per-entry lookup failures degrade inside the feed (the entry carries
//! the `"NOT_AVAILABLE"` sentinel) and still answer 200. Feed-level
//! failures answer with a whole-response sentinel: `"SERVER_ERROR"`
//! (502) when the upstream itself is failing, `"NOT_AVAILABLE"` (404)
//! otherwise, and a structured 401 when credentials are the problem.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use tubefeed_core::{EnrichedFeed, Sentinel};
use tubefeed_upstream::{ActivitySource, AuthContext, FeedTarget, UpstreamError};

use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::enrich::{FeedEnricher, SharedCache};
use crate::error::ServerResult;

/// State shared by all request handlers.
///
/// Construct once at process start; everything inside is reference
/// counted and safe to clone per request.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn ActivitySource>,
    enricher: Arc<FeedEnricher>,
    feeds: SharedCache<EnrichedFeed>,
    credentials: AuthContext,
}

impl AppState {
    /// Creates the shared state over the given source.
    ///
    /// `credentials` are the server's own upstream credentials, used when
    /// a request does not carry its own bearer token.
    pub fn new(
        source: Arc<dyn ActivitySource>,
        credentials: AuthContext,
        config: &ServerConfig,
    ) -> Self {
        let enricher = Arc::new(FeedEnricher::new(source.clone(), config.enrich_config()));
        let feeds = Arc::new(RwLock::new(TtlCache::new(
            config.feed_ttl,
            config.cache_capacity,
        )));
        Self {
            source,
            enricher,
            feeds,
            credentials,
        }
    }
}

/// Query parameters for `GET /feed`.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Username whose activity to fetch; defaults to the authenticated user.
    pub who: Option<String>,
}

/// A feed-level failure; the whole response fails, no partial feed.
#[derive(Debug, PartialEq, Eq)]
enum FeedFailure {
    /// Upstream answered 4xx or the feed could not be resolved.
    NotAvailable,
    /// Upstream is failing server-side (5xx, unreachable).
    ServerError,
    /// Credentials missing, expired or rejected; re-authentication needed.
    Unauthenticated(String),
}

impl FeedFailure {
    fn from_upstream(err: UpstreamError) -> Self {
        use tubefeed_upstream::UpstreamErrorCode::*;
        match err.code() {
            AuthenticationFailed | AuthorizationFailed => {
                Self::Unauthenticated(err.message().to_string())
            }
            code if code.is_server_side() => Self::ServerError,
            _ => Self::NotAvailable,
        }
    }
}

impl IntoResponse for FeedFailure {
    fn into_response(self) -> Response {
        match self {
            Self::NotAvailable => {
                (StatusCode::NOT_FOUND, Json(Sentinel::NotAvailable)).into_response()
            }
            Self::ServerError => {
                (StatusCode::BAD_GATEWAY, Json(Sentinel::ServerError)).into_response()
            }
            Self::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "authentication_required",
                    "message": message,
                })),
            )
                .into_response(),
        }
    }
}

/// Builds the per-request credentials.
///
/// A bearer token in the request takes precedence over the server's own
/// access token; the configured developer key is kept either way.
fn request_auth(state: &AppState, headers: &HeaderMap) -> AuthContext {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    match bearer {
        Some(token) => {
            let mut ctx = state.credentials.clone();
            ctx.access_token = Some(token);
            ctx
        }
        None => state.credentials.clone(),
    }
}

/// Resolves the authenticated principal's username.
async fn resolve_self(state: &AppState, ctx: &AuthContext) -> Result<String, FeedFailure> {
    state
        .source
        .fetch_profile_username(ctx.clone())
        .await
        .map_err(FeedFailure::from_upstream)
}

/// Fetches and enriches the targeted feed, via the whole-feed cache.
async fn fetch_enriched(
    state: &AppState,
    ctx: &AuthContext,
    target: FeedTarget,
) -> Result<EnrichedFeed, FeedFailure> {
    let owner = match &target {
        FeedTarget::User(username) => username.clone(),
        FeedTarget::Friends => resolve_self(state, ctx).await?,
    };
    let key = target.cache_key(&owner);

    let cached = state.feeds.read().await.get(&key).cloned();
    if let Some(feed) = cached {
        debug!(key = %key, "feed cache hit");
        return Ok(feed);
    }

    let entries = state
        .source
        .fetch_activity(ctx.clone(), target)
        .await
        .map_err(FeedFailure::from_upstream)?;

    let feed = state.enricher.enrich(ctx, entries).await;
    state.feeds.write().await.insert(key, feed.clone());
    Ok(feed)
}

/// `GET /feed?who=<username>`
pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = request_auth(&state, &headers);

    let target = match query.who.filter(|who| !who.is_empty()) {
        Some(who) => FeedTarget::User(who),
        None => match resolve_self(&state, &ctx).await {
            Ok(username) => FeedTarget::User(username),
            Err(failure) => return failure.into_response(),
        },
    };

    match fetch_enriched(&state, &ctx, target).await {
        Ok(feed) => Json(feed).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// `GET /feed/friends`
pub async fn get_friend_feed(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = request_auth(&state, &headers);

    match fetch_enriched(&state, &ctx, FeedTarget::Friends).await {
        Ok(feed) => Json(feed).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// `GET /whoami`
pub async fn whoami(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = request_auth(&state, &headers);

    match resolve_self(&state, &ctx).await {
        Ok(username) => Json(username).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// `GET /healthz`
pub async fn healthz() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Builds the router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/feed", get(get_feed))
        .route("/feed/friends", get(get_friend_feed))
        .route("/whoami", get(whoami))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Binds the listener and serves requests until the task is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> ServerResult<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "tubefeed server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubSource, cat_video, uploaded_entry};
    use tubefeed_upstream::UpstreamErrorCode;

    fn state_over(stub: StubSource) -> (Arc<StubSource>, AppState) {
        let source = Arc::new(stub);
        let state = AppState::new(
            source.clone(),
            AuthContext::anonymous(),
            &ServerConfig::default(),
        );
        (source, state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn feed_returns_enriched_json_array() {
        let stub = StubSource::new()
            .with_feed(vec![uploaded_entry("alice", "abc123")])
            .with_video(cat_video("abc123", "Cat video", 42));
        let (_, state) = state_over(stub);

        let response = get_feed(
            State(state),
            Query(FeedQuery {
                who: Some("alice".to_string()),
            }),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.is_array());
        assert_eq!(body[0]["activity_type"], "video_uploaded");
        assert_eq!(body[0]["video_info"]["title"], "Cat video");
        assert_eq!(body[0]["video_info"]["view_count"], 42);
    }

    #[tokio::test]
    async fn feed_without_who_resolves_authenticated_user() {
        let stub = StubSource::new()
            .with_profile_username("alice")
            .with_feed(vec![uploaded_entry("alice", "abc123")]);
        let (source, state) = state_over(stub);

        let response = get_feed(State(state), Query(FeedQuery { who: None }), HeaderMap::new())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(source.feed_calls(), 1);
    }

    #[tokio::test]
    async fn feed_without_who_and_without_auth_is_401() {
        // No profile username configured: whoami fails with an auth error.
        let (_, state) = state_over(StubSource::new());

        let response = get_feed(State(state), Query(FeedQuery { who: None }), HeaderMap::new())
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "authentication_required");
    }

    #[tokio::test]
    async fn feed_level_server_error_sentinel() {
        let stub = StubSource::new().with_feed_error(UpstreamErrorCode::ServerError);
        let (_, state) = state_over(stub);

        let response = get_feed(
            State(state),
            Query(FeedQuery {
                who: Some("alice".to_string()),
            }),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await, json!("SERVER_ERROR"));
    }

    #[tokio::test]
    async fn feed_level_not_found_sentinel() {
        let stub = StubSource::new().with_feed_error(UpstreamErrorCode::NotFound);
        let (_, state) = state_over(stub);

        let response = get_feed(
            State(state),
            Query(FeedQuery {
                who: Some("nobody".to_string()),
            }),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!("NOT_AVAILABLE"));
    }

    #[tokio::test]
    async fn second_feed_request_is_served_from_cache() {
        let stub = StubSource::new().with_feed(vec![uploaded_entry("alice", "abc123")]);
        let (source, state) = state_over(stub);

        for _ in 0..2 {
            let response = get_feed(
                State(state.clone()),
                Query(FeedQuery {
                    who: Some("alice".to_string()),
                }),
                HeaderMap::new(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(source.feed_calls(), 1);
    }

    #[tokio::test]
    async fn friend_feed_is_cached_per_owner() {
        let stub = StubSource::new()
            .with_profile_username("alice")
            .with_feed(vec![uploaded_entry("bob", "abc123")]);
        let (source, state) = state_over(stub);

        let response = get_friend_feed(State(state), HeaderMap::new()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(source.feed_calls(), 1);
        let body = body_json(response).await;
        assert_eq!(body[0]["author"], "bob");
    }

    #[tokio::test]
    async fn whoami_returns_username_json() {
        let stub = StubSource::new().with_profile_username("alice");
        let (_, state) = state_over(stub);

        let response = whoami(State(state), HeaderMap::new()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("alice"));
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let response = healthz().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[test]
    fn bearer_token_overrides_configured_credentials() {
        let source = Arc::new(StubSource::new());
        let credentials = AuthContext::anonymous()
            .with_access_token("server-token")
            .with_developer_key("dev-key");
        let state = AppState::new(source, credentials, &ServerConfig::default());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer user-token".parse().unwrap());

        let ctx = request_auth(&state, &headers);
        assert_eq!(ctx.access_token.as_deref(), Some("user-token"));
        // The developer key identifies the application, not the user.
        assert_eq!(ctx.developer_key.as_deref(), Some("dev-key"));

        let fallback = request_auth(&state, &HeaderMap::new());
        assert_eq!(fallback.access_token.as_deref(), Some("server-token"));
    }

    #[test]
    fn failure_classification() {
        use UpstreamErrorCode::*;

        let auth = FeedFailure::from_upstream(UpstreamError::authentication("expired"));
        assert!(matches!(auth, FeedFailure::Unauthenticated(_)));

        let server = FeedFailure::from_upstream(UpstreamError::server("boom"));
        assert_eq!(server, FeedFailure::ServerError);

        let network = FeedFailure::from_upstream(UpstreamError::network("timeout"));
        assert_eq!(network, FeedFailure::ServerError);

        let rate = FeedFailure::from_upstream(UpstreamError::new(RateLimited, "slow down"));
        assert_eq!(rate, FeedFailure::NotAvailable);

        let missing = FeedFailure::from_upstream(UpstreamError::not_found("gone"));
        assert_eq!(missing, FeedFailure::NotAvailable);
    }
}
