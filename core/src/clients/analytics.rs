//! Read-only `/analytics` endpoints.

use crate::connection::Connection;
use crate::error::Result;
use crate::http::Query;
use crate::params::AnalyticsRange;
use crate::types::{AnalyticsOverview, AnalyticsReport};

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    connection: Connection,
}

impl AnalyticsClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Project-wide totals.
    pub async fn overview(&self) -> Result<AnalyticsOverview> {
        self.connection.get("/analytics", Query::new()).await
    }

    /// Users created per day within `range`.
    pub async fn users(&self, range: &AnalyticsRange) -> Result<AnalyticsReport> {
        self.report("users", range).await
    }

    /// Sessions opened per day within `range`.
    pub async fn sessions(&self, range: &AnalyticsRange) -> Result<AnalyticsReport> {
        self.report("sessions", range).await
    }

    /// Events recorded per day within `range`.
    pub async fn events(&self, range: &AnalyticsRange) -> Result<AnalyticsReport> {
        self.report("events", range).await
    }

    async fn report(&self, resource: &str, range: &AnalyticsRange) -> Result<AnalyticsReport> {
        let path = format!("/analytics/{resource}");
        self.connection.get(&path, range.to_query()).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::clients::test_support::{connection, url};

    #[tokio::test]
    async fn overview_and_reports() {
        let (conn, transport) = connection();
        let analytics = AnalyticsClient::new(conn);
        transport.respond_json(200, json!({"users": 3, "sessions": 5, "events": 8}));
        transport.respond_json(
            200,
            json!({"total": 2, "timeline": [{"date": "2017-06-01", "count": 2}]}),
        );
        transport.respond_json(200, json!({"total": 0}));

        let overview = analytics.overview().await.unwrap();
        assert_eq!(overview.events, 8);

        let june = AnalyticsRange::between(
            NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2017, 6, 30).unwrap(),
        );
        let users = analytics.users(&june).await.unwrap();
        assert_eq!(users.total, 2);
        assert_eq!(users.timeline[0].count, 2);

        let events = analytics.events(&AnalyticsRange::default()).await.unwrap();
        assert!(events.timeline.is_empty());

        let requests = transport.requests();
        assert_eq!(requests[0].url, url("/analytics"));
        assert_eq!(requests[1].url, url("/analytics/users"));
        assert_eq!(requests[1].query["from"], "2017-06-01");
        assert_eq!(requests[2].url, url("/analytics/events"));
        assert!(requests[2].query.is_empty());
    }
}
