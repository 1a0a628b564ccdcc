//! Top-level `/api_authentication` endpoints. Keys are issued under a user,
//! see `UsersClient::create_api_authentication`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::Result;
use crate::http::Query;
use crate::key::{ApiAuthentications, Key};
use crate::params::{expand_query, ListOptions, UpdateOptions};
use crate::types::{ApiAuthentication, PaginationResponse, SuccessResponse};

#[derive(Debug, Clone)]
pub struct ApiAuthenticationClient {
    connection: Connection,
}

impl ApiAuthenticationClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub async fn get<TApi, TUser>(
        &self,
        api_authentication: impl Key<ApiAuthentications>,
        expand: &[&str],
    ) -> Result<ApiAuthentication<TApi, TUser>>
    where
        TApi: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = api_authentication_path(&api_authentication)?;
        self.connection.get(&path, expand_query(expand)).await
    }

    pub async fn list<TApi, TUser>(
        &self,
        options: &ListOptions,
    ) -> Result<PaginationResponse<ApiAuthentication<TApi, TUser>>>
    where
        TApi: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        self.connection
            .get("/api_authentication", options.to_query())
            .await
    }

    pub async fn update<TApi: Serialize, TUser>(
        &self,
        api_authentication: impl Key<ApiAuthentications>,
        changes: &ApiAuthentication<TApi, TUser>,
        options: UpdateOptions,
    ) -> Result<SuccessResponse> {
        let path = api_authentication_path(&api_authentication)?;
        let body = changes.to_update();
        if options.destructive {
            self.connection.put(&path, &body, Query::new()).await
        } else {
            self.connection.patch(&path, &body, Query::new()).await
        }
    }

    /// Revoke the key pair. Requests signed with it fail from then on.
    pub async fn delete(
        &self,
        api_authentication: impl Key<ApiAuthentications>,
    ) -> Result<SuccessResponse> {
        let path = api_authentication_path(&api_authentication)?;
        self.connection.delete(&path, Query::new()).await
    }
}

fn api_authentication_path(key: &impl Key<ApiAuthentications>) -> Result<String> {
    Ok(format!("/api_authentication/{}", key.segment()?))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::clients::test_support::{connection, url};
    use crate::http::HttpMethod;

    #[tokio::test]
    async fn crud_paths() {
        let (conn, transport) = connection();
        let keys = ApiAuthenticationClient::new(conn);
        transport.respond_json(
            200,
            json!({"id": "api_1", "key": "k", "details": {"label": "ci"}, "user": {"id": "usr_1"}}),
        );
        transport.respond_json(200, json!({"list": []}));

        let key: ApiAuthentication<Value, Value> = keys.get("api_1", &["user"]).await.unwrap();
        assert!(key.user.as_ref().is_some_and(|u| u.is_expanded()));
        let page: PaginationResponse<ApiAuthentication<Value, Value>> =
            keys.list(&ListOptions::default()).await.unwrap();
        assert!(page.is_empty());
        keys.update(&key, &key, UpdateOptions::default()).await.unwrap();
        keys.delete(&key).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, url("/api_authentication/api_1"));
        assert_eq!(requests[0].query["expand"], "user");
        assert_eq!(requests[1].url, url("/api_authentication"));
        assert_eq!(requests[2].method, HttpMethod::Patch);
        assert_eq!(requests[2].json_body().unwrap(), json!({"details": {"label": "ci"}}));
        assert_eq!(requests[3].method, HttpMethod::Delete);
    }
}
