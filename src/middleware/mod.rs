pub mod session;

pub use session::{get_current_user, login_redirect, safe_next, CurrentUser};
