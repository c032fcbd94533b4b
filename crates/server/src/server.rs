use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use std::{net::SocketAddr, sync::Arc};

use crate::{auth, offers, users, wishes, wishlists};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Bearer token of the current request, kept for sign out.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

/// Which browser origins may call the API.
#[derive(Clone, Debug, Default)]
pub enum CorsConfig {
    #[default]
    AllowAll,
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// An empty list means any origin.
    pub fn from_origins(origins: Vec<String>) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins)
        }
    }
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        }
    }
}

async fn auth(
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        tracing::debug!("missing bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    };
    let token = bearer.token().to_string();

    let user = match state.engine.authenticate(&token).await {
        Ok(user) => user,
        Err(EngineError::InvalidCredentials) => {
            tracing::debug!("rejected bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

/// Register the wishlist routes under `prefix`.
fn wishlist_routes(router: Router<ServerState>, prefix: &str) -> Router<ServerState> {
    router
        .route(prefix, get(wishlists::list).post(wishlists::create))
        .route(
            &format!("{prefix}/{{id}}"),
            get(wishlists::get)
                .patch(wishlists::update)
                .delete(wishlists::delete),
        )
}

/// Build the application router.
pub fn router(engine: Arc<Engine>, cors: &CorsConfig) -> Router {
    let state = ServerState { engine };

    let public = Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .route("/wishes/last", get(wishes::latest))
        .route("/wishes/top", get(wishes::top));

    let protected = Router::new()
        .route("/signout", post(auth::sign_out))
        .route("/users/me", get(users::me).patch(users::update_me))
        .route("/users/me/wishes", get(users::my_wishes))
        .route("/users/find", post(users::find))
        .route("/users/{username}", get(users::by_username))
        .route("/users/{username}/wishes", get(users::wishes_of))
        .route("/wishes", post(wishes::create))
        .route(
            "/wishes/{id}",
            get(wishes::get).patch(wishes::update).delete(wishes::delete),
        )
        .route("/wishes/{id}/copy", post(wishes::copy))
        .route("/offers", get(offers::list).post(offers::create))
        .route("/offers/{id}", get(offers::get));
    let protected = wishlist_routes(protected, "/wishlists");
    let protected = wishlist_routes(protected, "/wishlistlists")
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public
        .merge(protected)
        .layer(build_cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
    cors: CorsConfig,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, &cors)).await
}

pub fn spawn_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
    cors: CorsConfig,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener, cors).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
