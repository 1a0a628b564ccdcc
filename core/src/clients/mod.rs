//! One client per resource family.
//!
//! Each client holds a clone of the shared `Connection` and does nothing
//! but shape requests: a path, a query map, and an optional body.

mod analytics;
mod api_authentication;
mod events;
mod sessions;
mod users;

pub use analytics::AnalyticsClient;
pub use api_authentication::ApiAuthenticationClient;
pub use events::EventsClient;
pub use sessions::SessionsClient;
pub use users::UsersClient;
