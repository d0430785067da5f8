use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use domain::services::MediaUrls;
use shared::jwt::JwtConfig;
use shared::snowflake::IdGenerator;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::jobs::UploadQueue;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin_token, trace_id, LoginThrottle,
};
use crate::routes::{
    admin_users, announcements, app_configs, banners, changelogs, health, public, terms,
    versions,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ids: Arc<IdGenerator>,
    pub jwt: Arc<JwtConfig>,
    pub uploads: UploadQueue,
    pub urls: MediaUrls,
    pub login_throttle: Arc<LoginThrottle>,
    pub started_at: Instant,
    /// Wall-clock start, reported by `getVersion`.
    pub boot_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, uploads: UploadQueue) -> anyhow::Result<Self> {
        let ids = IdGenerator::new(config.server.worker_id)?;
        let jwt = JwtConfig::new(&config.token.secret, config.token.timeout_secs)?;
        let login_throttle = LoginThrottle::new(config.token.login_attempts_per_minute);
        let urls = MediaUrls::new(
            &config.storage.bucket_bind_domain,
            &config.storage.pic_base_path,
            &config.storage.version_base_path,
        );

        Ok(Self {
            pool,
            config: Arc::new(config),
            ids: Arc::new(ids),
            jwt: Arc::new(jwt),
            uploads,
            urls,
            login_throttle: Arc::new(login_throttle),
            started_at: Instant::now(),
            boot_time: Utc::now(),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    // Admin UIs are served from other origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        // Banners
        .route("/admin/act/addActAndFile", put(banners::add_banner))
        .route("/admin/act/deleteAct", delete(banners::delete_banner))
        .route("/admin/act/chAct", patch(banners::modify_banner))
        .route("/admin/act/getActs", get(banners::list_banners))
        .route("/admin/act/publishAct", post(banners::publish_banners))
        // Announcements
        .route("/admin/notice/addNotice", put(announcements::add_announcement))
        .route("/admin/notice/getNotice", get(announcements::list_announcements))
        .route("/admin/notice/chNotice", patch(announcements::modify_announcement))
        .route("/admin/notice/deleteNotice", delete(announcements::delete_announcement))
        .route("/admin/notice/publishNotice", post(announcements::publish_announcements))
        // Changelogs
        .route("/admin/log/addLog", put(changelogs::add_changelog))
        .route("/admin/log/getLog", get(changelogs::list_changelogs))
        .route("/admin/log/chLog", patch(changelogs::modify_changelog))
        .route("/admin/log/deleteLog", delete(changelogs::delete_changelog))
        .route("/admin/log/publishLog", post(changelogs::publish_changelogs))
        .route("/admin/log/getVersion", get(changelogs::service_version))
        // Versions
        .route("/admin/version/getAll", get(versions::list_versions))
        .route("/admin/version/add", put(versions::add_version))
        .route("/admin/version/update", patch(versions::modify_version))
        .route("/admin/version/delete", delete(versions::delete_version))
        .route("/admin/version/publish", post(versions::publish_version))
        // Feature flags
        .route("/admin/config/getAllConfig", get(app_configs::list_configs))
        .route("/admin/config/addConfig", put(app_configs::add_config))
        .route("/admin/config/chConfig", patch(app_configs::modify_config))
        .route("/admin/config/deleteConfig", delete(app_configs::delete_config))
        .route("/admin/config/getAllPlatform", get(app_configs::list_platforms))
        // Admin accounts
        .route("/admin/user/getAllAdmin", get(admin_users::list_admins))
        .route("/admin/user/addAdmin", put(admin_users::add_admin))
        .route("/admin/user/deleteAdmin", delete(admin_users::delete_admin))
        .route("/admin/user/chAdmin", post(admin_users::modify_admin))
        // Terms
        .route("/admin/term/addTerm", put(terms::add_term))
        .route("/admin/term/chTerm", patch(terms::modify_term))
        .route("/admin/term/deleteTerm", delete(terms::delete_term))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    let open_routes = Router::new()
        .route("/admin/user/login", post(admin_users::login))
        .route("/admin/term/getAllTerm", get(terms::list_terms))
        .route("/wusthelper/notice", get(public::published_announcements))
        .route("/wusthelper/act", get(public::published_banners))
        .route("/wusthelper/log", get(public::published_changelogs))
        .route("/wusthelper/version", get(public::latest_version))
        .route("/wusthelper/config", get(public::public_config));

    let api = Router::new().merge(admin_routes).merge(open_routes);
    let base_path = config.base_path();
    let api = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(&base_path, api)
    };

    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(api)
        .merge(ops_routes)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
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
