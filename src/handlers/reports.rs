use askama::Template;
use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    handlers::query_string,
    listing::{column_links, filter_sort, ColumnLink, SortConfig},
    middleware::{get_current_user, login_redirect, CurrentUser},
    models::{report_catalog, ReportEntry, ReportFormat, ReportKind},
    AppState,
};

#[derive(Template)]
#[template(path = "reports.html")]
struct ReportsTemplate<'a> {
    current_user: &'a CurrentUser,
    reports: Vec<ReportEntry>,
    columns: Vec<ColumnLink>,
    kinds: Vec<ReportKind>,
    formats: Vec<ReportFormat>,
    selected_kind: String,
    selected_format: String,
    search: String,
}

#[derive(Deserialize)]
pub struct ReportsQuery {
    q: Option<String>,
    kind: Option<String>,
    format: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
}

const SORTABLE_COLUMNS: [(&str, &str); 2] = [("name", "Report"), ("date", "Generated")];

// Handler to display the report catalog with search, type and format
// filters
pub async fn reports_list(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
    Query(query): Query<ReportsQuery>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };

    let search = query.q.unwrap_or_default();
    let selected_kind = query.kind.filter(|k| !k.is_empty()).unwrap_or_default();
    let selected_format = query.format.filter(|f| !f.is_empty()).unwrap_or_default();
    let sort = SortConfig::from_params(query.sort.as_deref(), query.dir.as_deref());

    let kind_filter = (!selected_kind.is_empty()).then_some(selected_kind.as_str());
    let format_filter = (!selected_format.is_empty()).then_some(selected_format.as_str());
    let reports = filter_sort(
        &report_catalog(),
        &search,
        &[("kind", kind_filter), ("format", format_filter)],
        &sort,
    );

    let base = query_string(&[
        ("q", &search),
        ("kind", &selected_kind),
        ("format", &selected_format),
    ]);
    let columns = column_links(&base, &SORTABLE_COLUMNS, &sort);

    let template = ReportsTemplate {
        current_user: &current_user,
        reports,
        columns,
        kinds: ReportKind::ALL.to_vec(),
        formats: ReportFormat::ALL.to_vec(),
        selected_kind,
        selected_format,
        search,
    };
    Ok(Html(template.render().unwrap()).into_response())
}
