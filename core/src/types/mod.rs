//! Request and response payloads for the Luno API.
//!
//! # Design
//! Every entity is generic over the caller's custom data: `User<T>` carries
//! it under `profile`, the others under `details`. Entities that belong to a
//! user also carry their owner as an `Expandable`, which is a bare id unless
//! the request asked for `expand=user`.
//!
//! "Create" shapes omit server-assigned fields. "Update" shapes borrow from
//! a full entity and serialize only its mutable fields.

mod analytics;
mod api_authentication;
mod common;
mod event;
mod session;
mod user;

pub use analytics::{AnalyticsOverview, AnalyticsPoint, AnalyticsReport};
pub use api_authentication::{ApiAuthentication, CreateApiAuthentication, UpdateApiAuthentication};
pub use common::{Expandable, LoginResponse, Page, PaginationResponse, SuccessResponse};
pub use event::{CreateEvent, Event, UpdateEvent};
pub use session::{CreateSession, Session, UpdateSession};
pub use user::{CreateUser, UpdateUser, User};
