//! Aggregate client composing every resource client.
//!
//! # Design
//! `LunoClient` owns one `Connection` and one instance of each entity client,
//! all sharing that connection. It adds no behaviour of its own; cloning is
//! cheap and clones share the underlying transport.

use std::sync::Arc;

use tracing::debug;

use crate::clients::{
    AnalyticsClient, ApiAuthenticationClient, EventsClient, SessionsClient, UsersClient,
};
use crate::config::LunoConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct LunoClient {
    connection: Connection,
    users: UsersClient,
    sessions: SessionsClient,
    events: EventsClient,
    analytics: AnalyticsClient,
    api_authentication: ApiAuthenticationClient,
}

impl LunoClient {
    /// Build a client that talks to the API over HTTPS.
    pub fn new(config: LunoConfig) -> Result<Self> {
        Ok(Self::from_connection(Connection::new(config)?))
    }

    /// Build a client from `LUNO_API_KEY` / `LUNO_SECRET_KEY` / `LUNO_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(LunoConfig::from_env()?)
    }

    /// Build a client that sends every request through `transport`.
    pub fn with_transport(config: LunoConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_connection(Connection::with_transport(config, transport)?))
    }

    pub fn from_connection(connection: Connection) -> Self {
        debug!(base_url = %connection.config().base_url, "luno client ready");
        Self {
            users: UsersClient::new(connection.clone()),
            sessions: SessionsClient::new(connection.clone()),
            events: EventsClient::new(connection.clone()),
            analytics: AnalyticsClient::new(connection.clone()),
            api_authentication: ApiAuthenticationClient::new(connection.clone()),
            connection,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn users(&self) -> &UsersClient {
        &self.users
    }

    pub fn sessions(&self) -> &SessionsClient {
        &self.sessions
    }

    pub fn events(&self) -> &EventsClient {
        &self.events
    }

    pub fn analytics(&self) -> &AnalyticsClient {
        &self.analytics
    }

    pub fn api_authentication(&self) -> &ApiAuthenticationClient {
        &self.api_authentication
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::error::ApiError;
    use crate::params::ListOptions;
    use crate::transport::RecordingTransport;

    #[tokio::test]
    async fn entity_clients_share_one_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let config = LunoConfig::new("key", "secret").with_base_url("http://localhost:3000");
        let client = LunoClient::with_transport(config, transport.clone()).unwrap();

        transport.respond_json(200, json!({"success": true}));
        transport.respond_json(200, json!({"success": true}));
        transport.respond_json(200, json!({"success": true}));
        transport.respond_json(200, json!({"list": []}));

        client.users().deactivate("usr_1").await.unwrap();
        client.sessions().delete("sess_1").await.unwrap();
        client.api_authentication().delete("api_1").await.unwrap();
        let page = client
            .events()
            .list::<Value, Value>(&ListOptions::default())
            .await
            .unwrap();
        assert!(page.is_empty());

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:3000/users/usr_1",
                "http://localhost:3000/sessions/sess_1",
                "http://localhost:3000/api_authentication/api_1",
                "http://localhost:3000/events",
            ]
        );
    }

    #[test]
    fn new_rejects_empty_credentials() {
        let err = LunoClient::new(LunoConfig::new("", "")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn clones_point_at_the_same_base_url() {
        let client = LunoClient::new(LunoConfig::new("key", "secret")).unwrap();
        let clone = client.clone();
        assert_eq!(
            clone.connection().config().base_url,
            client.connection().config().base_url
        );
    }
}
