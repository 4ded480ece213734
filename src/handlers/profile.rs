use askama::Template;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    middleware::{get_current_user, login_redirect, CurrentUser},
    AppState,
};

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate<'a> {
    current_user: &'a CurrentUser,
}

// Handler to display the signed-in user's account details and role
pub async fn profile(
    State(state): State<AppState>,
    cookies: Cookies,
    uri: OriginalUri,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(&cookies, &state).await else {
        return Ok(login_redirect(&uri.to_string()).into_response());
    };

    let template = ProfileTemplate {
        current_user: &current_user,
    };
    Ok(Html(template.render().unwrap()).into_response())
}
