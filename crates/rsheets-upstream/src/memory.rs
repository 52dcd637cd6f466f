//! In-memory spreadsheet client for development and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use rsheets_domain::{BatchPayload, Dimension, ValueRange};

use crate::error::{UpstreamError, UpstreamResult};
use crate::traits::{BatchGetResponse, GetRangeParams, SheetsClient, WriteRangeParams};

type Grid = Vec<Vec<String>>;

/// One spreadsheet: named sheets in insertion order.
#[derive(Debug, Default)]
struct Spreadsheet {
    sheets: Vec<(String, Grid)>,
}

impl Spreadsheet {
    fn sheet(&self, title: Option<&str>) -> Option<&Grid> {
        match title {
            Some(t) => self.sheets.iter().find(|(name, _)| name == t).map(|(_, g)| g),
            None => self.sheets.first().map(|(_, g)| g),
        }
    }

    fn sheet_mut(&mut self, title: Option<&str>) -> Option<&mut Grid> {
        match title {
            Some(t) => self
                .sheets
                .iter_mut()
                .find(|(name, _)| name == t)
                .map(|(_, g)| g),
            None => self.sheets.first_mut().map(|(_, g)| g),
        }
    }
}

/// In-memory implementation of [`SheetsClient`] over A1-notation ranges.
///
/// Supports quoted and unquoted sheet prefixes (`'My Sheet'!A1:B2`), single
/// cells, and bare sheet references. Reads clip to the populated grid the way
/// the real service omits trailing empty cells.
#[derive(Debug, Default)]
pub struct MemorySheetsClient {
    spreadsheets: RwLock<HashMap<String, Spreadsheet>>,
}

/// A parsed A1 range. Coordinates are zero-based and inclusive; `None` cell
/// bounds mean the whole sheet.
#[derive(Debug, PartialEq, Eq)]
struct ParsedRange {
    sheet: Option<String>,
    cells: Option<CellRect>,
}

#[derive(Debug, PartialEq, Eq)]
struct CellRect {
    start_row: usize,
    start_col: usize,
    end_row: usize,
    end_col: usize,
}

fn bad_range(range: &str) -> UpstreamError {
    UpstreamError::api(400, format!("Unable to parse range: {range}"))
}

fn not_found() -> UpstreamError {
    UpstreamError::api(404, "Requested entity was not found.")
}

/// Parses a cell reference like `B3` into zero-based (row, col).
fn parse_cell(cell: &str) -> Option<(usize, usize)> {
    let letters: String = cell.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &cell[letters.len()..];
    if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut col: usize = 0;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

fn parse_a1(range: &str) -> Option<ParsedRange> {
    let (sheet, rest) = if let Some(stripped) = range.strip_prefix('\'') {
        let (title, tail) = stripped.split_once('\'')?;
        match tail.strip_prefix('!') {
            Some(t) => (Some(title.to_string()), t),
            None if tail.is_empty() => {
                return Some(ParsedRange {
                    sheet: Some(title.to_string()),
                    cells: None,
                })
            }
            None => return None,
        }
    } else if let Some((title, tail)) = range.split_once('!') {
        (Some(title.to_string()), tail)
    } else {
        (None, range)
    };

    if rest.is_empty() {
        // Bare sheet reference means the whole sheet.
        return sheet.map(|s| ParsedRange {
            sheet: Some(s),
            cells: None,
        });
    }

    let cells = match rest.split_once(':') {
        Some((start, end)) => match (parse_cell(start), parse_cell(end)) {
            (Some((start_row, start_col)), Some((end_row, end_col))) => Some(CellRect {
                start_row: start_row.min(end_row),
                start_col: start_col.min(end_col),
                end_row: start_row.max(end_row),
                end_col: start_col.max(end_col),
            }),
            _ => None,
        },
        None => parse_cell(rest).map(|(row, col)| CellRect {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }),
    };

    match cells {
        Some(cells) => Some(ParsedRange {
            sheet,
            cells: Some(cells),
        }),
        // An unprefixed string that is not a cell reference names a whole
        // sheet, matching how the real service treats a bare sheet title.
        None if sheet.is_none() => Some(ParsedRange {
            sheet: Some(rest.to_string()),
            cells: None,
        }),
        None => None,
    }
}

/// Reads a rectangle out of a grid, clipping to populated cells.
fn read_rect(grid: &Grid, cells: Option<&CellRect>) -> Grid {
    match cells {
        None => grid.clone(),
        Some(rect) => grid
            .iter()
            .skip(rect.start_row)
            .take(rect.end_row - rect.start_row + 1)
            .map(|row| {
                row.iter()
                    .skip(rect.start_col)
                    .take(rect.end_col - rect.start_col + 1)
                    .cloned()
                    .collect()
            })
            .collect(),
    }
}

fn transpose(grid: Grid) -> Grid {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            grid.iter()
                .filter_map(|row| row.get(col).cloned())
                .collect()
        })
        .collect()
}

impl MemorySheetsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds (or replaces) a sheet. Creates the spreadsheet on first use.
    pub fn insert_sheet(&self, spreadsheet_id: &str, title: &str, values: Grid) {
        let mut guard = self
            .spreadsheets
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let spreadsheet = guard.entry(spreadsheet_id.to_string()).or_default();
        match spreadsheet.sheets.iter_mut().find(|(name, _)| name == title) {
            Some((_, grid)) => *grid = values,
            None => spreadsheet.sheets.push((title.to_string(), values)),
        }
    }

    fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        dimension: Dimension,
    ) -> UpstreamResult<ValueRange> {
        let parsed = parse_a1(range).ok_or_else(|| bad_range(range))?;
        let guard = self.spreadsheets.read().unwrap_or_else(|e| e.into_inner());
        let spreadsheet = guard.get(spreadsheet_id).ok_or_else(not_found)?;
        let grid = spreadsheet
            .sheet(parsed.sheet.as_deref())
            .ok_or_else(|| bad_range(range))?;

        let mut values = read_rect(grid, parsed.cells.as_ref());
        if dimension == Dimension::Columns {
            values = transpose(values);
        }

        Ok(ValueRange {
            range: range.to_string(),
            major_dimension: dimension,
            values,
        })
    }
}

#[async_trait]
impl SheetsClient for MemorySheetsClient {
    async fn get_range(&self, params: &GetRangeParams) -> UpstreamResult<ValueRange> {
        self.read_range(&params.spreadsheet_id, &params.range, params.dimension)
    }

    async fn batch_get_ranges(&self, payload: &BatchPayload) -> UpstreamResult<BatchGetResponse> {
        let value_ranges = payload
            .ranges
            .iter()
            .map(|range| self.read_range(&payload.spreadsheet_id, range, payload.dimension))
            .collect::<UpstreamResult<Vec<_>>>()?;

        Ok(BatchGetResponse {
            spreadsheet_id: payload.spreadsheet_id.clone(),
            value_ranges,
        })
    }

    async fn update_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>> {
        let parsed = parse_a1(&params.range).ok_or_else(|| bad_range(&params.range))?;
        let rect = parsed.cells.as_ref().map_or((0, 0), |r| (r.start_row, r.start_col));

        let values = if params.dimension == Dimension::Columns {
            transpose(params.values.clone())
        } else {
            params.values.clone()
        };

        let mut guard = self
            .spreadsheets
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let spreadsheet = guard.get_mut(&params.spreadsheet_id).ok_or_else(not_found)?;
        let grid = spreadsheet
            .sheet_mut(parsed.sheet.as_deref())
            .ok_or_else(|| bad_range(&params.range))?;

        let (start_row, start_col) = rect;
        for (r, row) in values.iter().enumerate() {
            let target_row = start_row + r;
            if grid.len() <= target_row {
                grid.resize(target_row + 1, Vec::new());
            }
            let target = &mut grid[target_row];
            for (c, cell) in row.iter().enumerate() {
                let target_col = start_col + c;
                if target.len() <= target_col {
                    target.resize(target_col + 1, String::new());
                }
                target[target_col] = cell.clone();
            }
        }

        Ok(params.values.clone())
    }

    async fn append_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>> {
        let parsed = parse_a1(&params.range).ok_or_else(|| bad_range(&params.range))?;

        let rows = if params.dimension == Dimension::Columns {
            transpose(params.values.clone())
        } else {
            params.values.clone()
        };

        let mut guard = self
            .spreadsheets
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let spreadsheet = guard.get_mut(&params.spreadsheet_id).ok_or_else(not_found)?;
        let grid = spreadsheet
            .sheet_mut(parsed.sheet.as_deref())
            .ok_or_else(|| bad_range(&params.range))?;

        grid.extend(rows);
        Ok(params.values.clone())
    }

    async fn list_titles(&self, spreadsheet_id: &str) -> UpstreamResult<Vec<String>> {
        let guard = self.spreadsheets.read().unwrap_or_else(|e| e.into_inner());
        let spreadsheet = guard.get(spreadsheet_id).ok_or_else(not_found)?;
        Ok(spreadsheet
            .sheets
            .iter()
            .map(|(title, _)| title.clone())
            .collect())
    }
}
