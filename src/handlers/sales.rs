use std::str::FromStr;

use askama::Template;
use axum::{
    extract::{Form, OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    filters,
    handlers::{flash, query_string},
    listing::{column_links, filter_sort, ColumnLink, SortConfig},
    middleware::{get_current_user, login_redirect, CurrentUser},
    models::{ActivityKind, NewSale, PaymentMethod, SaleRecord, SaleStatus},
    store::StoreError,
    AppState,
};

#[derive(Template)]
#[template(path = "sales/records.html")]
struct SalesTemplate<'a> {
    current_user: &'a CurrentUser,
    sales: Vec<SaleRecord>,
    columns: Vec<ColumnLink>,
    statuses: Vec<SaleStatus>,
    payments: Vec<PaymentMethod>,
    selected_status: String,
    selected_payment: String,
    search: String,
    notice: String,
}

#[derive(Deserialize)]
pub struct SalesQuery {
    q: Option<String>,
    status: Option<String>,
    payment: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct SaleForm {
    customer: String,
    items: String,
    total: String,
    payment_method: String,
    status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusForm {
    status: String,
}

const SORTABLE_COLUMNS: [(&str, &str); 5] = [
    ("order_id", "Order ID"),
    ("customer", "Customer"),
    ("date", "Date"),
    ("items", "Items"),
    ("total", "Total"),
];

// Handler to display the sales table with search, status and payment
// filters, and sortable columns
pub async fn sales_list(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
    Query(query): Query<SalesQuery>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };

    let all_sales = state.stores.sales.list().await.map_err(|err| {
        log::error!("sales list failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let search = query.q.unwrap_or_default();
    let selected_status = query.status.filter(|s| !s.is_empty()).unwrap_or_default();
    let selected_payment = query.payment.filter(|p| !p.is_empty()).unwrap_or_default();
    let sort = SortConfig::from_params(query.sort.as_deref(), query.dir.as_deref());

    let status_filter = (!selected_status.is_empty()).then_some(selected_status.as_str());
    let payment_filter = (!selected_payment.is_empty()).then_some(selected_payment.as_str());
    let sales = filter_sort(
        &all_sales,
        &search,
        &[("status", status_filter), ("payment", payment_filter)],
        &sort,
    );

    let base = query_string(&[
        ("q", &search),
        ("status", &selected_status),
        ("payment", &selected_payment),
    ]);
    let columns = column_links(&base, &SORTABLE_COLUMNS, &sort);

    let template = SalesTemplate {
        current_user: &current_user,
        sales,
        columns,
        statuses: SaleStatus::ALL.to_vec(),
        payments: PaymentMethod::ALL.to_vec(),
        selected_status,
        selected_payment,
        search,
        notice: query.error.unwrap_or_default(),
    };
    Ok(Html(template.render().unwrap()).into_response())
}

// Handler to record a new sale
pub async fn record_sale(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<SaleForm>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/sales"));
    };
    if !current_user.can_create {
        return Err(StatusCode::FORBIDDEN);
    }

    let Some(items) = form.items.trim().parse::<i32>().ok().filter(|n| *n > 0) else {
        return Ok(flash("/sales", "Item count must be a positive whole number"));
    };
    let Some(total) = Decimal::from_str(form.total.trim())
        .ok()
        .filter(|d| !d.is_sign_negative())
    else {
        return Ok(flash("/sales", "Total must be a non-negative amount"));
    };
    let Some(payment_method) = PaymentMethod::parse(&form.payment_method) else {
        return Ok(flash("/sales", "Unknown payment method"));
    };
    let status = form
        .status
        .as_deref()
        .and_then(SaleStatus::parse)
        .unwrap_or(SaleStatus::Pending);

    let new_sale = NewSale {
        customer: form.customer,
        items,
        total,
        payment_method,
        status,
    };

    match state
        .stores
        .sales
        .create(Some(current_user.id), new_sale)
        .await
    {
        Ok(sale) => {
            if let Err(err) = state
                .stores
                .activities
                .record(
                    ActivityKind::Sale,
                    &format!("New sale: Order {}", sale.order_id),
                )
                .await
            {
                log::warn!("failed to record activity: {}", err);
            }
            Ok(Redirect::to("/sales"))
        }
        Err(err) => {
            log::error!("failed to record sale: {}", err);
            Ok(flash("/sales", &err.to_string()))
        }
    }
}

// Handler to move a sale through its status lifecycle
pub async fn update_sale_status(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/sales"));
    };
    if !current_user.can_edit {
        return Err(StatusCode::FORBIDDEN);
    }

    let Some(status) = SaleStatus::parse(&form.status) else {
        return Ok(flash("/sales", "Unknown sale status"));
    };

    match state.stores.sales.update_status(id, status).await {
        Ok(_) => Ok(Redirect::to("/sales")),
        Err(StoreError::NotFound) => Ok(flash("/sales", "Sale record no longer exists")),
        Err(err) => {
            log::error!("failed to update sale {}: {}", id, err);
            Ok(flash("/sales", &err.to_string()))
        }
    }
}

// Handler to delete a sale record
pub async fn delete_sale(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/sales"));
    };
    if !current_user.can_delete {
        return Err(StatusCode::FORBIDDEN);
    }

    match state.stores.sales.delete(id).await {
        Ok(()) => Ok(Redirect::to("/sales")),
        Err(StoreError::NotFound) => Ok(flash("/sales", "Sale record no longer exists")),
        Err(err) => {
            log::error!("failed to delete sale {}: {}", id, err);
            Ok(flash("/sales", &err.to_string()))
        }
    }
}
