//! Sheet title listing.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;

use rsheets_domain::{AliasTable, DomainError, SpreadsheetRef, TitleFilter};
use rsheets_upstream::{SheetsClient, UpstreamError};

/// Errors that can occur while listing sheet titles.
#[derive(Debug, thiserror::Error)]
pub enum TitlesError {
    #[error(transparent)]
    Resolution(#[from] DomainError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Result type for title operations.
pub type TitlesResult<T> = Result<T, TitlesError>;

/// Sheet titles of one spreadsheet, in sheet order, after filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetTitles {
    /// Symbolic name, present when the identifier has a configured alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: String,
    pub titles: Vec<String>,
}

/// Handler for sheet title listing, single or batched.
pub struct TitlesHandler<C: SheetsClient> {
    client: Arc<C>,
    aliases: Arc<AliasTable>,
}

impl<C: SheetsClient> TitlesHandler<C> {
    pub fn new(client: Arc<C>, aliases: Arc<AliasTable>) -> Self {
        Self { client, aliases }
    }

    /// Lists the sheet titles of one spreadsheet, applying `filter` when
    /// given.
    pub async fn list_titles(
        &self,
        spreadsheet: &SpreadsheetRef,
        filter: Option<&TitleFilter>,
    ) -> TitlesResult<SpreadsheetTitles> {
        let spreadsheet_id = self.aliases.resolve(spreadsheet)?;
        let mut titles = self.client.list_titles(&spreadsheet_id).await?;

        if let Some(filter) = filter {
            titles = filter.apply(titles);
        }

        Ok(SpreadsheetTitles {
            spreadsheet: self.aliases.alias_for(&spreadsheet_id).map(String::from),
            spreadsheet_id,
            titles,
        })
    }

    /// Lists titles for several spreadsheets concurrently.
    ///
    /// All references are resolved up front, so an unknown alias fails the
    /// call before any upstream request. Results come back in input order;
    /// the first upstream failure fails the whole call.
    pub async fn batch_titles(
        &self,
        spreadsheets: &[SpreadsheetRef],
        filter: Option<&TitleFilter>,
    ) -> TitlesResult<Vec<SpreadsheetTitles>> {
        let spreadsheets = spreadsheets
            .iter()
            .map(|s| self.aliases.resolve(s))
            .collect::<Result<Vec<_>, _>>()?;

        let title_futures: Vec<_> = spreadsheets
            .iter()
            .map(|id| self.client.list_titles(id))
            .collect();
        let title_lists = try_join_all(title_futures).await?;

        Ok(spreadsheets
            .into_iter()
            .zip(title_lists)
            .map(|(spreadsheet_id, titles)| {
                let titles = match filter {
                    Some(filter) => filter.apply(titles),
                    None => titles,
                };
                SpreadsheetTitles {
                    spreadsheet: self.aliases.alias_for(&spreadsheet_id).map(String::from),
                    spreadsheet_id,
                    titles,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;

    use rsheets_domain::{BatchPayload, ValueRange};
    use rsheets_upstream::{
        BatchGetResponse, GetRangeParams, UpstreamResult, WriteRangeParams,
    };

    /// Mock upstream serving fixed title lists per spreadsheet.
    struct MockTitlesClient {
        titles: HashMap<String, Vec<String>>,
    }

    impl MockTitlesClient {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            Self {
                titles: entries
                    .iter()
                    .map(|(id, titles)| {
                        (
                            id.to_string(),
                            titles.iter().map(|t| t.to_string()).collect(),
                        )
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SheetsClient for MockTitlesClient {
        async fn get_range(&self, _params: &GetRangeParams) -> UpstreamResult<ValueRange> {
            unimplemented!("not used by title tests")
        }

        async fn batch_get_ranges(
            &self,
            _payload: &BatchPayload,
        ) -> UpstreamResult<BatchGetResponse> {
            unimplemented!("not used by title tests")
        }

        async fn update_range(
            &self,
            _params: &WriteRangeParams,
        ) -> UpstreamResult<Vec<Vec<String>>> {
            unimplemented!("not used by title tests")
        }

        async fn append_range(
            &self,
            _params: &WriteRangeParams,
        ) -> UpstreamResult<Vec<Vec<String>>> {
            unimplemented!("not used by title tests")
        }

        async fn list_titles(&self, spreadsheet_id: &str) -> UpstreamResult<Vec<String>> {
            self.titles
                .get(spreadsheet_id)
                .cloned()
                .ok_or_else(|| UpstreamError::api(404, "Requested entity was not found."))
        }
    }

    fn handler() -> TitlesHandler<MockTitlesClient> {
        let client = Arc::new(MockTitlesClient::new(&[
            ("sheet-roster-id", &["Roster", "Archive", "Roster 2024"]),
            ("sheet-b", &["Inventory"]),
        ]));
        let mut aliases = HashMap::new();
        aliases.insert("roster".to_string(), "sheet-roster-id".to_string());
        TitlesHandler::new(client, Arc::new(AliasTable::new(aliases)))
    }

    #[tokio::test]
    async fn test_list_titles_by_alias_reattaches_name() {
        let result = handler()
            .list_titles(&SpreadsheetRef::Alias("roster".to_string()), None)
            .await
            .unwrap();

        assert_eq!(result.spreadsheet.as_deref(), Some("roster"));
        assert_eq!(result.spreadsheet_id, "sheet-roster-id");
        assert_eq!(result.titles, vec!["Roster", "Archive", "Roster 2024"]);
    }

    #[tokio::test]
    async fn test_list_titles_applies_filter() {
        let filter: TitleFilter =
            serde_json::from_value(serde_json::json!({ "include": ["roster"] })).unwrap();

        let result = handler()
            .list_titles(&SpreadsheetRef::Id("sheet-roster-id".to_string()), Some(&filter))
            .await
            .unwrap();

        assert_eq!(result.titles, vec!["Roster", "Roster 2024"]);
    }

    #[tokio::test]
    async fn test_batch_titles_preserves_input_order() {
        let results = handler()
            .batch_titles(
                &[
                    SpreadsheetRef::Id("sheet-b".to_string()),
                    SpreadsheetRef::Alias("roster".to_string()),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].spreadsheet_id, "sheet-b");
        assert_eq!(results[0].spreadsheet, None);
        assert_eq!(results[1].spreadsheet.as_deref(), Some("roster"));
    }

    #[tokio::test]
    async fn test_batch_titles_unknown_alias_fails_whole_call() {
        let err = handler()
            .batch_titles(
                &[
                    SpreadsheetRef::Id("sheet-b".to_string()),
                    SpreadsheetRef::Alias("unconfigured".to_string()),
                ],
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TitlesError::Resolution(_)));
    }

    #[tokio::test]
    async fn test_unknown_spreadsheet_surfaces_upstream_error() {
        let err = handler()
            .list_titles(&SpreadsheetRef::Id("missing".to_string()), None)
            .await
            .unwrap_err();

        match err {
            TitlesError::Upstream(UpstreamError::Api { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected upstream error, got {other:?}"),
        }
    }
}
