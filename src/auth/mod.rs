//! User authentication: the private token cookie, the auth guard middleware,
//! and redirect URL handling for the log-in flow.

mod cookie;
mod middleware;
mod redirect;
mod token;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub(crate) use middleware::{AuthState, auth_guard};
pub(crate) use redirect::normalize_redirect_url;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
