//! Accounts, credentials, signed-cookie sessions and post authorization.
//! Keep the public surface thin and split implementation across sub-modules.

pub mod credential;
mod signed_cookie;
mod session;
mod user;
mod validation;
mod provider;
mod authorizer;

pub use signed_cookie::{CookieSigner, unverified_payload};
pub use session::{SessionManager, SessionState, SetCookie, parse_cookie, USER_ID_COOKIE, USER_NAME_COOKIE};
pub use user::Identity;
pub use validation::{validate_registration, valid_username, valid_password, valid_email};
pub use provider::{AccountService, RegisterRequest, LoginResponse};
pub use authorizer::{DeletePolicy, can_edit_post, can_create_post, can_delete_post};
