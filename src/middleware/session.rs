use axum::response::Redirect;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::models::{Role, User};
use crate::utils::verify_token;
use crate::AppState;

/// The resolved principal plus its role, rebuilt per request from the auth
/// cookie. The capability flags mirror `role.capabilities()` so templates
/// can branch without reaching into the enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    // Helper properties for templates
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl CurrentUser {
    pub fn from_user_and_role(user: User, role: Role) -> Self {
        let caps = role.capabilities();
        Self {
            id: user.id,
            email: user.email,
            role,
            can_create: caps.can_create,
            can_edit: caps.can_edit,
            can_delete: caps.can_delete,
        }
    }

    pub fn role_label(&self) -> &'static str {
        self.role.label()
    }
}

/// Resolves the session from the `auth_token` cookie. `None` covers the
/// whole unauthenticated family: missing cookie, bad or expired token,
/// deleted user, role lookup failure. Nothing here ever elevates.
pub async fn get_current_user(cookies: &Cookies, state: &AppState) -> Option<CurrentUser> {
    let token = cookies.get("auth_token")?.value().to_string();
    let claims = verify_token(&token).ok()?;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .ok()??;

    let role = state.stores.roles.role_for(user.id).await.ok()?;
    Some(CurrentUser::from_user_and_role(user, role))
}

/// Sends an unauthenticated visitor to the auth page, preserving where they
/// were headed so sign-in can return them there. Callers pass the request's
/// full path and query so active filters survive the round trip.
pub fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("/auth?next={}", urlencoding::encode(next)))
}

/// Post-login destination. Only same-site absolute paths are honored;
/// anything else falls back to the dashboard.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/dashboard".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_next_accepts_same_site_paths_only() {
        assert_eq!(safe_next(Some("/inventory")), "/inventory");
        assert_eq!(safe_next(Some("/sales?status=pending")), "/sales?status=pending");
        assert_eq!(safe_next(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_next(None), "/dashboard");
    }

    #[test]
    fn login_redirect_carries_the_full_requested_location() {
        use axum::http::header::LOCATION;
        use axum::response::IntoResponse;

        let response = login_redirect("/sales?status=pending&dir=desc").into_response();
        let location = response.headers()[LOCATION].to_str().unwrap();
        assert_eq!(
            location,
            "/auth?next=%2Fsales%3Fstatus%3Dpending%26dir%3Ddesc"
        );
        // The preserved location round-trips through the open-redirect guard.
        assert_eq!(
            safe_next(Some("/sales?status=pending&dir=desc")),
            "/sales?status=pending&dir=desc"
        );
    }

    #[test]
    fn capability_flags_mirror_the_role() {
        let user = User {
            id: Uuid::new_v4(),
            email: "clerk@example.com".into(),
            password_hash: String::new(),
            created_at: chrono::Utc::now(),
        };
        let current = CurrentUser::from_user_and_role(user, Role::StoreEmployee);
        assert!(!current.can_create && !current.can_edit && !current.can_delete);
    }
}
