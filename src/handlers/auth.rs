use askama::Template;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use crate::{
    database::Database,
    middleware::safe_next,
    models::{ActivityKind, Role, User},
    utils::{create_token, hash_password, verify_password},
    AppState,
};

#[derive(Template)]
#[template(path = "auth.html")]
struct AuthTemplate {
    next: String,
    error: String,
    notice: String,
}

#[derive(Deserialize)]
pub struct AuthPageQuery {
    next: Option<String>,
    error: Option<String>,
    registered: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    email: String,
    password: String,
    role: String,
    next: Option<String>,
}

fn render_auth(next: &str, error: &str, notice: &str) -> Html<String> {
    let template = AuthTemplate {
        next: next.to_string(),
        error: error.to_string(),
        notice: notice.to_string(),
    };
    Html(template.render().unwrap())
}

pub async fn auth_page(Query(query): Query<AuthPageQuery>) -> Html<String> {
    let notice = if query.registered.is_some() {
        "Account created. Please sign in to continue."
    } else {
        ""
    };
    render_auth(
        query.next.as_deref().unwrap_or_default(),
        query.error.as_deref().unwrap_or_default(),
        notice,
    )
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, (StatusCode, Html<String>)> {
    let next = form.next.as_deref().unwrap_or_default();

    match authenticate_user(&state.db, &form.email, &form.password).await {
        Ok(user) => {
            let token = create_token(user.id, user.email.clone()).map_err(|err| {
                log::error!("failed to issue token: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render_auth(next, "Authentication failed", ""),
                )
            })?;

            // Set secure HTTP-only cookie with JWT token
            let cookie = Cookie::build(("auth_token", token))
                .path("/")
                .http_only(true)
                .max_age(time::Duration::hours(24))
                .build();
            cookies.add(cookie);

            if let Err(err) = state
                .stores
                .activities
                .record(ActivityKind::User, &format!("User {} logged in", user.email))
                .await
            {
                log::warn!("failed to record login activity: {}", err);
            }

            Ok(Redirect::to(&safe_next(form.next.as_deref())))
        }
        Err(_) => Err((
            StatusCode::UNAUTHORIZED,
            render_auth(next, "Invalid email or password", ""),
        )),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let next = form.next.as_deref().unwrap_or_default();

    let password_hash = hash_password(&form.password).map_err(|err| {
        log::error!("failed to hash password: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            render_auth(next, "Failed to process password", ""),
        )
    })?;

    let user = match create_user_in_db(&state.db, &form.email, &password_hash).await {
        Ok(user) => user,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                render_auth(next, "Email already exists or registration failed", ""),
            ));
        }
    };

    // Unknown submitted role values resolve to the least-privileged default.
    let role = Role::parse(&form.role);
    if let Err(err) = state.stores.roles.assign(user.id, role).await {
        log::warn!("failed to store role for {}: {}", user.email, err);
    }

    let target = if next.is_empty() {
        "/auth?registered=1".to_string()
    } else {
        format!("/auth?registered=1&next={}", urlencoding::encode(next))
    };
    Ok(Redirect::to(&target))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(Cookie::from("auth_token"));
    Redirect::to("/auth")
}

async fn authenticate_user(db: &Database, email: &str, password: &str) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(db)
        .await?;

    if verify_password(password, &user.password_hash).unwrap_or(false) {
        Ok(user)
    } else {
        Err(sqlx::Error::RowNotFound)
    }
}

async fn create_user_in_db(
    db: &Database,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
}
