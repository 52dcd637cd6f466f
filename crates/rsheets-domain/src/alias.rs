//! Symbolic spreadsheet aliases.
//!
//! Callers may address a spreadsheet either by its raw identifier or by a
//! symbolic name configured at startup. The table also carries the reverse
//! mapping so results can be annotated with the name the caller used.

use std::collections::HashMap;

use crate::error::{DomainError, DomainResult};
use crate::types::SpreadsheetRef;

/// Bidirectional mapping between symbolic spreadsheet names and identifiers.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    by_alias: HashMap<String, String>,
    by_id: HashMap<String, String>,
}

impl AliasTable {
    /// Builds the table from an alias → identifier mapping.
    ///
    /// If two aliases map to the same identifier, the reverse lookup keeps
    /// the last one inserted.
    pub fn new(aliases: HashMap<String, String>) -> Self {
        let by_id = aliases
            .iter()
            .map(|(alias, id)| (id.clone(), alias.clone()))
            .collect();
        Self {
            by_alias: aliases,
            by_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }

    /// Resolves a caller-supplied reference to a concrete identifier.
    ///
    /// An unknown alias is a caller input error: callers treat it as fatal
    /// for the whole operation, never as a per-item skip.
    pub fn resolve(&self, spreadsheet: &SpreadsheetRef) -> DomainResult<String> {
        match spreadsheet {
            SpreadsheetRef::Id(id) if id.is_empty() => Err(DomainError::EmptySpreadsheetId),
            SpreadsheetRef::Id(id) => Ok(id.clone()),
            SpreadsheetRef::Alias(alias) => self
                .by_alias
                .get(alias)
                .cloned()
                .ok_or_else(|| DomainError::UnknownAlias {
                    alias: alias.clone(),
                }),
        }
    }

    /// Reverse lookup used to reattach the symbolic name to results.
    pub fn alias_for(&self, spreadsheet_id: &str) -> Option<&str> {
        self.by_id.get(spreadsheet_id).map(String::as_str)
    }
}
