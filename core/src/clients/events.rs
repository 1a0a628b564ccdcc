//! Top-level `/events` endpoints. Events are created under a user, see
//! `UsersClient::create_event`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::Result;
use crate::http::Query;
use crate::key::{Events, Key};
use crate::params::{expand_query, ListOptions, UpdateOptions};
use crate::types::{Event, PaginationResponse, SuccessResponse};

#[derive(Debug, Clone)]
pub struct EventsClient {
    connection: Connection,
}

impl EventsClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub async fn get<TEvent, TUser>(
        &self,
        event: impl Key<Events>,
        expand: &[&str],
    ) -> Result<Event<TEvent, TUser>>
    where
        TEvent: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = event_path(&event)?;
        self.connection.get(&path, expand_query(expand)).await
    }

    /// List recent events across all users.
    pub async fn list<TEvent, TUser>(
        &self,
        options: &ListOptions,
    ) -> Result<PaginationResponse<Event<TEvent, TUser>>>
    where
        TEvent: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        self.connection.get("/events", options.to_query()).await
    }

    pub async fn update<TEvent: Serialize, TUser>(
        &self,
        event: impl Key<Events>,
        changes: &Event<TEvent, TUser>,
        options: UpdateOptions,
    ) -> Result<SuccessResponse> {
        let path = event_path(&event)?;
        let body = changes.to_update();
        if options.destructive {
            self.connection.put(&path, &body, Query::new()).await
        } else {
            self.connection.patch(&path, &body, Query::new()).await
        }
    }
}

fn event_path(event: &impl Key<Events>) -> Result<String> {
    Ok(format!("/events/{}", event.segment()?))
}
