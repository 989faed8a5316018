//! The application's route URIs.

/// The root route which redirects to the log-in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users: the expense form, expense list, and
/// the category chart.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for the registration page and registration form submissions.
pub const REGISTER_VIEW: &str = "/register";
/// The route for the log-in page and log-in form submissions.
pub const LOG_IN_VIEW: &str = "/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for static files.
pub const STATIC: &str = "/static";
