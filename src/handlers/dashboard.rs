use askama::Template;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use tower_cookies::Cookies;

use crate::{
    filters,
    middleware::{get_current_user, login_redirect},
    models::Activity,
    store::sales::MonthlyTotal,
    AppState,
};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    user_email: String,
    revenue: Decimal,
    sales_count: i64,
    item_count: i64,
    low_stock_count: i64,
    monthly: Vec<MonthlyTotal>,
    activities: Vec<Activity>,
}

// Handler to display the dashboard overview: headline metrics, the
// monthly sales series, and the recent activity feed
pub async fn dashboard(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };

    let revenue = state.stores.sales.completed_revenue().await.map_err(|err| {
        log::error!("revenue total failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let sales_count = state.stores.sales.sale_count().await.map_err(|err| {
        log::error!("sale count failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let item_count = state.stores.inventory.item_count().await.map_err(|err| {
        log::error!("item count failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let low_stock_count = state
        .stores
        .inventory
        .low_stock_count()
        .await
        .map_err(|err| {
            log::error!("low stock count failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let monthly = state.stores.sales.monthly_totals().await.map_err(|err| {
        log::error!("monthly totals failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let activities = state.stores.activities.recent(6).await.map_err(|err| {
        log::error!("recent activities failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let template = DashboardTemplate {
        user_email: current_user.email,
        revenue,
        sales_count,
        item_count,
        low_stock_count,
        monthly,
        activities,
    };
    Ok(Html(template.render().unwrap()).into_response())
}
