//! Range-request coalescing.
//!
//! Groups an unordered list of range requests into one batch payload per
//! distinct `(spreadsheet id, dimension)` pair, so the reconciler can issue
//! a single upstream call per group no matter how many original requests
//! fed it.

use crate::alias::AliasTable;
use crate::error::DomainResult;
use crate::grouping::GroupingStore;
use crate::types::{BatchPayload, CompositeKey, RangeRequest};

/// Coalesces raw range requests into a [`GroupingStore`].
///
/// Requests are scanned in input order. For each request the spreadsheet
/// reference is resolved to a concrete identifier, the matching payload is
/// fetched (or synthesized empty on first sight of the key), and the range
/// is appended unless an identical range string is already present for that
/// key. Duplicate ranges are silently dropped, so idempotent request lists
/// produce the same payloads.
///
/// Group order in the store reflects the order keys were first encountered.
///
/// Resolution failure fails the whole call: it is a caller input error, not
/// a per-item skip, and no upstream work may start after it.
pub fn coalesce(aliases: &AliasTable, requests: &[RangeRequest]) -> DomainResult<GroupingStore> {
    let mut store = GroupingStore::new();

    for request in requests {
        let spreadsheet_id = aliases.resolve(&request.spreadsheet)?;
        let key = CompositeKey::new(spreadsheet_id.clone(), request.dimension);

        let mut payload = store
            .get(&key)
            .cloned()
            .unwrap_or_else(|| BatchPayload::empty(spreadsheet_id, request.dimension));

        if !payload.contains_range(&request.range) {
            payload.ranges.push(request.range.clone());
            store.insert(key, payload);
        }
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::types::{Dimension, SpreadsheetRef};
    use std::collections::HashMap;

    fn request(id: &str, range: &str, dimension: Dimension) -> RangeRequest {
        RangeRequest {
            spreadsheet: SpreadsheetRef::Id(id.to_string()),
            range: range.to_string(),
            dimension,
        }
    }

    #[test]
    fn test_one_group_per_distinct_key() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("A", "Sheet1!C1:D2", Dimension::Rows),
            request("B", "Sheet1!A1:B2", Dimension::Rows),
            request("A", "Sheet1!A1:B2", Dimension::Columns),
        ];

        let store = coalesce(&AliasTable::default(), &requests).unwrap();
        assert_eq!(store.len(), 3);

        let group_a = store
            .get(&CompositeKey::new("A", Dimension::Rows))
            .unwrap();
        assert_eq!(group_a.ranges, vec!["Sheet1!A1:B2", "Sheet1!C1:D2"]);
    }

    #[test]
    fn test_duplicate_ranges_are_dropped() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("B", "Sheet1!C1:D2", Dimension::Rows),
        ];

        let store = coalesce(&AliasTable::default(), &requests).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store
                .get(&CompositeKey::new("A", Dimension::Rows))
                .unwrap()
                .ranges,
            vec!["Sheet1!A1:B2"]
        );
        assert_eq!(
            store
                .get(&CompositeKey::new("B", Dimension::Rows))
                .unwrap()
                .ranges,
            vec!["Sheet1!C1:D2"]
        );
    }

    #[test]
    fn test_coalesce_is_idempotent() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("A", "Sheet1!C1:D2", Dimension::Rows),
        ];
        let doubled: Vec<RangeRequest> = requests
            .iter()
            .chain(requests.iter())
            .cloned()
            .collect();

        let once = coalesce(&AliasTable::default(), &requests).unwrap();
        let twice = coalesce(&AliasTable::default(), &doubled).unwrap();

        assert_eq!(once.len(), twice.len());
        let key = CompositeKey::new("A", Dimension::Rows);
        assert_eq!(once.get(&key).unwrap(), twice.get(&key).unwrap());
    }

    #[test]
    fn test_same_id_different_dimension_splits_groups() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("A", "Sheet1!A1:B2", Dimension::Columns),
        ];

        let store = coalesce(&AliasTable::default(), &requests).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_same_dimension_different_id_splits_groups() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            request("B", "Sheet1!A1:B2", Dimension::Rows),
        ];

        let store = coalesce(&AliasTable::default(), &requests).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_store() {
        let store = coalesce(&AliasTable::default(), &[]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_group_order_is_first_encounter_order() {
        let requests = vec![
            request("B", "Sheet1!A1", Dimension::Rows),
            request("A", "Sheet1!A1", Dimension::Rows),
            request("B", "Sheet1!B1", Dimension::Rows),
        ];

        let store = coalesce(&AliasTable::default(), &requests).unwrap();
        let ids: Vec<&str> = store
            .all_values()
            .map(|p| p.spreadsheet_id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_alias_resolution_feeds_the_grouping_key() {
        let mut aliases = HashMap::new();
        aliases.insert("roster".to_string(), "A".to_string());
        let table = AliasTable::new(aliases);

        // One request by alias, one by raw id, both for the same spreadsheet.
        let requests = vec![
            RangeRequest {
                spreadsheet: SpreadsheetRef::Alias("roster".to_string()),
                range: "Sheet1!A1:B2".to_string(),
                dimension: Dimension::Rows,
            },
            request("A", "Sheet1!C1:D2", Dimension::Rows),
        ];

        let store = coalesce(&table, &requests).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store
                .get(&CompositeKey::new("A", Dimension::Rows))
                .unwrap()
                .ranges,
            vec!["Sheet1!A1:B2", "Sheet1!C1:D2"]
        );
    }

    #[test]
    fn test_unknown_alias_fails_the_whole_call() {
        let requests = vec![
            request("A", "Sheet1!A1:B2", Dimension::Rows),
            RangeRequest {
                spreadsheet: SpreadsheetRef::Alias("unknown-alias".to_string()),
                range: "A1:B2".to_string(),
                dimension: Dimension::Rows,
            },
        ];

        let err = coalesce(&AliasTable::default(), &requests).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownAlias {
                alias: "unknown-alias".to_string()
            }
        );
    }
}
