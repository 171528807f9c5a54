use log::info;

use super::core::{parse_url, GerritClient};
use crate::error::Result;
use crate::providers::gerrit::types::RawChange;

impl GerritClient {
    /// Fetch changes matching `query` from the list-changes endpoint.
    ///
    /// # Arguments
    /// * `query` - Optional Gerrit search expression (e.g. "status:open"),
    ///   appended verbatim as `?q=<query>`. An empty query is treated as no query.
    ///
    /// # Returns
    /// * `Result<Vec<RawChange>>` - Changes in the order the server returned them
    ///
    /// # Errors
    /// Returns an error if:
    /// * The request fails or the server answers with a non-success status
    /// * The body lacks the anti-XSSI prefix
    /// * The body is not a list of changes with `id` and `project`
    pub async fn list_changes(&self, query: Option<&str>) -> Result<Vec<RawChange>> {
        let url = match query.filter(|q| !q.is_empty()) {
            Some(query) => parse_url(&format!("{}?q={query}", self.endpoint()))?,
            None => parse_url(self.endpoint())?,
        };

        let changes: Vec<RawChange> = self.get_decoded(url).await?;
        info!("Fetched {} changes", changes.len());

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GerritLabelError;
    use mockito::Matcher;

    const CHANGES_BODY: &str = r#")]}'
[
  {"id": "proj-a~master~I1", "project": "proj-a", "branch": "master", "subject": "First"},
  {"id": "proj-b~master~I2", "project": "proj-b", "branch": "master", "subject": "Second"}
]"#;

    #[tokio::test]
    async fn test_list_changes_with_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/changes")
            .match_query(Matcher::UrlEncoded("q".into(), "status:open project:proj-a".into()))
            .with_status(200)
            .with_body(CHANGES_BODY)
            .create_async()
            .await;

        let client = GerritClient::new(&format!("{}/changes", server.url()), None).unwrap();
        let changes = client
            .list_changes(Some("status:open project:proj-a"))
            .await
            .unwrap();

        mock.assert_async().await;
        let ids: Vec<_> = changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["proj-a~master~I1", "proj-b~master~I2"]);
        assert_eq!(changes[1].subject.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn test_list_changes_without_query_uses_endpoint_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/changes")
            .with_status(200)
            .with_body(CHANGES_BODY)
            .create_async()
            .await;

        let client = GerritClient::new(&format!("{}/changes", server.url()), None).unwrap();
        let changes = client.list_changes(Some("")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(changes.len(), 2);
    }

    #[tokio::test]
    async fn test_list_changes_rejects_malformed_records() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/changes")
            .with_status(200)
            .with_body(")]}'\n[{\"id\": \"no-project\"}]")
            .create_async()
            .await;

        let client = GerritClient::new(&format!("{}/changes", server.url()), None).unwrap();
        let result = client.list_changes(None).await;

        assert!(matches!(result, Err(GerritLabelError::Json(_))));
    }

    #[tokio::test]
    async fn test_list_changes_appends_query_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/changes/")
            .match_query(Matcher::Exact("q=status:open+project:foo".into()))
            .with_status(200)
            .with_body(CHANGES_BODY)
            .create_async()
            .await;

        let client = GerritClient::new(&format!("{}/changes/", server.url()), None).unwrap();
        let changes = client
            .list_changes(Some("status:open+project:foo"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(changes.len(), 2);
    }

    #[tokio::test]
    async fn test_list_changes_keeps_trailing_slash_of_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let with_slash = server
            .mock("GET", "/changes/")
            .with_status(200)
            .with_body(CHANGES_BODY)
            .expect(1)
            .create_async()
            .await;
        let without_slash = server
            .mock("GET", "/changes")
            .expect(0)
            .create_async()
            .await;

        let client = GerritClient::new(&format!("{}/changes/", server.url()), None).unwrap();
        client.list_changes(None).await.unwrap();

        with_slash.assert_async().await;
        without_slash.assert_async().await;
    }
}
