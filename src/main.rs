mod database;
mod filters;
mod handlers;
mod listing;
mod middleware;
mod models;
mod store;
mod utils;

use std::env;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::{create_database_pool, Database};
use store::Stores;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub stores: Arc<Stores>,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let db = create_database_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    let stores = Arc::new(Stores::new(db.clone()));

    // Listen for table change notifications and drop stale cached lists
    let listener_db = db.clone();
    let listener_feed = stores.feed().clone();
    tokio::spawn(async move {
        if let Err(err) = store::listener::run(listener_db, listener_feed).await {
            log::error!("change listener stopped: {}", err);
        }
    });
    tokio::spawn(store::listener::invalidate_on_change(stores.clone()));

    let app = create_router(AppState { db, stores });

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    log::info!("supplyflow server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Public routes (no authentication required)
        .route("/", get(|| async { Redirect::permanent("/dashboard") }))
        .route("/auth", get(handlers::auth::auth_page))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/logout", post(handlers::auth::logout))
        // Protected routes (authentication required)
        .route("/dashboard", get(handlers::dashboard::dashboard))
        // Inventory routes
        .route("/inventory", get(handlers::inventory::items_list))
        .route("/inventory", post(handlers::inventory::create_item))
        .route("/inventory/:id/edit", get(handlers::inventory::item_edit_form))
        .route("/inventory/:id", post(handlers::inventory::update_item))
        .route("/inventory/:id/delete", post(handlers::inventory::delete_item))
        // Sales routes
        .route("/sales", get(handlers::sales::sales_list))
        .route("/sales", post(handlers::sales::record_sale))
        .route("/sales/:id", post(handlers::sales::update_sale_status))
        .route("/sales/:id/delete", post(handlers::sales::delete_sale))
        // Reports routes
        .route("/reports", get(handlers::reports::reports_list))
        // Profile routes
        .route("/profile", get(handlers::profile::profile))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)), // 1MB
        )
        .with_state(state)
}
