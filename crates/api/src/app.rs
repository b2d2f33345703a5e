use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_editor, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes;
use crate::services::{AuthService, EmailService, PesapalService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub email: Arc<EmailService>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    /// Present when Pesapal is enabled.
    pub pesapal: Option<Arc<PesapalService>>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let jwt = JwtConfig::new(
            &config.jwt.access_secret,
            &config.jwt.refresh_secret,
            config.jwt.access_token_ttl_secs,
            config.jwt.refresh_token_ttl_secs,
            config.jwt.leeway_secs,
        )?;
        let email = EmailService::new(config.email.clone())?;
        let rate_limiter =
            RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);
        let pesapal = if config.pesapal.enabled {
            Some(Arc::new(PesapalService::new(config.pesapal.clone())?))
        } else {
            None
        };

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            email: Arc::new(email),
            rate_limiter,
            pesapal,
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.pool.clone(),
            Arc::clone(&self.jwt),
            &self.config.security.password_pepper,
        )
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    // Outermost guard is added last.
    let authenticated = || middleware::from_fn_with_state(state.clone(), require_user_auth);

    let public = Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router(state.clone()))
        .merge(routes::contact::router(state.clone()))
        .merge(routes::membership::public_router(state.clone()))
        .merge(routes::public::router())
        .nest("/payments/pesapal", routes::payments::router(state.clone()));

    let signed_in = Router::new()
        .nest("/admin/me", routes::users::profile_router())
        .nest("/admin/section-schemas", routes::section_schemas::router())
        .nest("/admin/news", routes::news::admin_router())
        .nest("/admin/events", routes::events::admin_router())
        .nest("/admin/media", routes::media::router())
        .route_layer(authenticated());

    let editors = Router::new()
        .nest("/admin/pages", routes::pages::router())
        .merge(routes::membership::editor_router())
        .route_layer(middleware::from_fn(require_editor))
        .route_layer(authenticated());

    let admins = Router::new()
        .nest("/admin/users", routes::users::admin_router())
        .nest("/admin/routes", routes::site_routes::router())
        .nest("/email-recipients", routes::email_recipients::router())
        .nest("/email", routes::email::router())
        .merge(routes::membership::admin_router())
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(authenticated());

    let api = Router::new()
        .merge(public)
        .merge(signed_in)
        .merge(editors)
        .merge(admins);

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&config.server.uploads_dir))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
