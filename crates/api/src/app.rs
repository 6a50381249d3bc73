use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::require_user_auth;
use crate::routes::{
    animals, auth, farms, feedings, grupos, health, health_events, lots, master_data,
    reproductive_events, transactions, users, weighings,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        // User routes
        .route("/api/v1/users/me", get(users::get_me))
        // Farm routes, including sharing grants
        .route("/api/v1/farms", post(farms::create_farm).get(farms::list_farms))
        .route(
            "/api/v1/farms/:farm_id",
            get(farms::get_farm)
                .patch(farms::update_farm)
                .delete(farms::delete_farm),
        )
        .route(
            "/api/v1/farms/:farm_id/access",
            post(farms::grant_access).get(farms::list_grants),
        )
        .route(
            "/api/v1/farms/:farm_id/access/:user_id",
            delete(farms::revoke_access),
        )
        // Lot routes
        .route("/api/v1/lots", post(lots::create_lot).get(lots::list_lots))
        .route(
            "/api/v1/lots/:lot_id",
            get(lots::get_lot).patch(lots::update_lot).delete(lots::delete_lot),
        )
        // Animal routes, including location history
        .route(
            "/api/v1/animals",
            post(animals::create_animal).get(animals::list_animals),
        )
        .route(
            "/api/v1/animals/:animal_id",
            get(animals::get_animal)
                .patch(animals::update_animal)
                .delete(animals::delete_animal),
        )
        .route(
            "/api/v1/animals/:animal_id/locations",
            get(animals::list_locations).post(animals::record_location),
        )
        // Group routes, including memberships
        .route(
            "/api/v1/grupos",
            post(grupos::create_grupo).get(grupos::list_grupos),
        )
        .route(
            "/api/v1/grupos/:grupo_id",
            get(grupos::get_grupo)
                .patch(grupos::update_grupo)
                .delete(grupos::delete_grupo),
        )
        .route(
            "/api/v1/grupos/:grupo_id/memberships",
            post(grupos::add_membership).get(grupos::list_memberships),
        )
        .route(
            "/api/v1/grupos/:grupo_id/memberships/:animal_id",
            delete(grupos::remove_membership),
        )
        // Health event routes
        .route(
            "/api/v1/health-events",
            post(health_events::create_health_event).get(health_events::list_health_events),
        )
        .route(
            "/api/v1/health-events/:event_id",
            get(health_events::get_health_event)
                .patch(health_events::update_health_event)
                .delete(health_events::delete_health_event),
        )
        // Reproductive event routes, including offspring links
        .route(
            "/api/v1/reproductive-events",
            post(reproductive_events::create_reproductive_event)
                .get(reproductive_events::list_reproductive_events),
        )
        .route(
            "/api/v1/reproductive-events/:event_id",
            get(reproductive_events::get_reproductive_event)
                .patch(reproductive_events::update_reproductive_event)
                .delete(reproductive_events::delete_reproductive_event),
        )
        .route(
            "/api/v1/reproductive-events/:event_id/offspring",
            post(reproductive_events::add_offspring),
        )
        .route(
            "/api/v1/reproductive-events/:event_id/offspring/:animal_id",
            delete(reproductive_events::remove_offspring),
        )
        // Weighing routes
        .route(
            "/api/v1/weighings",
            post(weighings::create_weighing).get(weighings::list_weighings),
        )
        .route(
            "/api/v1/weighings/:weighing_id",
            get(weighings::get_weighing)
                .patch(weighings::update_weighing)
                .delete(weighings::delete_weighing),
        )
        // Feeding routes
        .route(
            "/api/v1/feedings",
            post(feedings::create_feeding).get(feedings::list_feedings),
        )
        .route(
            "/api/v1/feedings/:feeding_id",
            get(feedings::get_feeding)
                .patch(feedings::update_feeding)
                .delete(feedings::delete_feeding),
        )
        // Transaction routes
        .route(
            "/api/v1/transactions",
            post(transactions::create_transaction).get(transactions::list_transactions),
        )
        .route(
            "/api/v1/transactions/:transaction_id",
            get(transactions::get_transaction)
                .patch(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Master data routes
        .route(
            "/api/v1/master-data",
            post(master_data::create_master_data).get(master_data::list_master_data),
        )
        .route(
            "/api/v1/master-data/:id",
            get(master_data::get_master_data).patch(master_data::update_master_data),
        )
        // Auth runs on every protected route
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
