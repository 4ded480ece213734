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
    models::{ActivityKind, InventoryItem, ItemPatch, NewItem},
    store::StoreError,
    AppState,
};

#[derive(Template)]
#[template(path = "inventory/items.html")]
struct ItemsTemplate<'a> {
    current_user: &'a CurrentUser,
    items: Vec<InventoryItem>,
    columns: Vec<ColumnLink>,
    categories: Vec<String>,
    selected_category: String,
    search: String,
    notice: String,
}

#[derive(Template)]
#[template(path = "inventory/item_form.html")]
struct ItemFormTemplate {
    item: InventoryItem,
    notice: String,
}

#[derive(Deserialize)]
pub struct ItemsQuery {
    q: Option<String>,
    category: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct ItemForm {
    name: String,
    sku: String,
    category: String,
    price: String,
    stock: String,
    threshold: String,
}

// Edit form; blank fields keep the stored value.
#[derive(Deserialize)]
pub struct ItemEditForm {
    name: Option<String>,
    sku: Option<String>,
    category: Option<String>,
    price: Option<String>,
    stock: Option<String>,
    threshold: Option<String>,
}

fn parse_price(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim())
        .ok()
        .filter(|d| !d.is_sign_negative())
}

fn parse_count(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|n| *n >= 0)
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

const SORTABLE_COLUMNS: [(&str, &str); 6] = [
    ("name", "Product Name"),
    ("sku", "SKU"),
    ("category", "Category"),
    ("price", "Price"),
    ("stock", "Stock"),
    ("last_updated", "Last Updated"),
];

// Handler to display the inventory table with search, category filter, and
// sortable columns
pub async fn items_list(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
    Query(query): Query<ItemsQuery>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };

    let all_items = state.stores.inventory.list().await.map_err(|err| {
        log::error!("inventory list failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let search = query.q.unwrap_or_default();
    let selected_category = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_default();
    let sort = SortConfig::from_params(query.sort.as_deref(), query.dir.as_deref());

    let category_filter = if selected_category.is_empty() {
        None
    } else {
        Some(selected_category.as_str())
    };
    let items = filter_sort(
        &all_items,
        &search,
        &[("category", category_filter)],
        &sort,
    );

    // Filter dropdown options come from the data itself.
    let mut categories: Vec<String> = all_items.iter().map(|i| i.category.clone()).collect();
    categories.sort();
    categories.dedup();

    let base = query_string(&[("q", &search), ("category", &selected_category)]);
    let columns = column_links(&base, &SORTABLE_COLUMNS, &sort);

    let template = ItemsTemplate {
        current_user: &current_user,
        items,
        columns,
        categories,
        selected_category,
        search,
        notice: query.error.unwrap_or_default(),
    };
    Ok(Html(template.render().unwrap()).into_response())
}

// Handler to create a new inventory item
pub async fn create_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ItemForm>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/inventory"));
    };
    if !current_user.can_create {
        return Err(StatusCode::FORBIDDEN);
    }

    let (Some(price), Some(stock), Some(threshold)) = (
        parse_price(&form.price),
        parse_count(&form.stock),
        parse_count(&form.threshold),
    ) else {
        return Ok(flash(
            "/inventory",
            "Price, stock and threshold must be non-negative numbers",
        ));
    };

    let new_item = NewItem {
        name: form.name,
        sku: form.sku,
        category: form.category,
        price,
        stock,
        threshold,
    };

    match state
        .stores
        .inventory
        .create(Some(current_user.id), new_item)
        .await
    {
        Ok(item) => {
            if let Err(err) = state
                .stores
                .activities
                .record(
                    ActivityKind::Inventory,
                    &format!("Inventory item added: {}", item.name),
                )
                .await
            {
                log::warn!("failed to record activity: {}", err);
            }
            Ok(Redirect::to("/inventory"))
        }
        Err(err) => {
            log::error!("failed to create item: {}", err);
            Ok(flash("/inventory", &err.to_string()))
        }
    }
}

// Handler to show the edit form for an existing item
pub async fn item_edit_form(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };
    if !current_user.can_edit {
        return Err(StatusCode::FORBIDDEN);
    }

    let items = state.stores.inventory.list().await.map_err(|err| {
        log::error!("inventory list failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let item = items
        .iter()
        .find(|i| i.id == id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;

    let template = ItemFormTemplate {
        item,
        notice: String::new(),
    };
    Ok(Html(template.render().unwrap()).into_response())
}

// Handler to apply a partial update to an item
pub async fn update_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Form(form): Form<ItemEditForm>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/inventory"));
    };
    if !current_user.can_edit {
        return Err(StatusCode::FORBIDDEN);
    }

    let back = format!("/inventory/{}/edit", id);

    let price = match clean(form.price).map(|v| parse_price(&v)) {
        Some(None) => return Ok(flash(&back, "Price must be a non-negative number")),
        Some(parsed) => parsed,
        None => None,
    };
    let stock = match clean(form.stock).map(|v| parse_count(&v)) {
        Some(None) => return Ok(flash(&back, "Stock must be a non-negative whole number")),
        Some(parsed) => parsed,
        None => None,
    };
    let threshold = match clean(form.threshold).map(|v| parse_count(&v)) {
        Some(None) => return Ok(flash(&back, "Threshold must be a non-negative whole number")),
        Some(parsed) => parsed,
        None => None,
    };

    let patch = ItemPatch {
        name: clean(form.name),
        sku: clean(form.sku),
        category: clean(form.category),
        price,
        stock,
        threshold,
    };

    match state.stores.inventory.update(id, patch).await {
        Ok(item) => {
            if let Err(err) = state
                .stores
                .activities
                .record(
                    ActivityKind::Inventory,
                    &format!("Inventory item updated: {}", item.name),
                )
                .await
            {
                log::warn!("failed to record activity: {}", err);
            }
            Ok(Redirect::to("/inventory"))
        }
        Err(StoreError::NotFound) => Ok(flash("/inventory", "Inventory item no longer exists")),
        Err(err) => {
            log::error!("failed to update item {}: {}", id, err);
            Ok(flash(&back, &err.to_string()))
        }
    }
}

// Handler to delete an item; a missing id surfaces as an error notice and
// leaves the visible list unchanged
pub async fn delete_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect("/inventory"));
    };
    if !current_user.can_delete {
        return Err(StatusCode::FORBIDDEN);
    }

    match state.stores.inventory.delete(id).await {
        Ok(()) => {
            if let Err(err) = state
                .stores
                .activities
                .record(ActivityKind::Inventory, "Inventory item deleted")
                .await
            {
                log::warn!("failed to record activity: {}", err);
            }
            Ok(Redirect::to("/inventory"))
        }
        Err(StoreError::NotFound) => Ok(flash("/inventory", "Inventory item no longer exists")),
        Err(err) => {
            log::error!("failed to delete item {}: {}", id, err);
            Ok(flash("/inventory", &err.to_string()))
        }
    }
}
