use serde::{Deserialize, Serialize};

/// Unix epoch timestamp in seconds.
pub fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// One row of the form sheet, keyed by fixed column position.
///
/// Columns A-F: code, name, stored-location, view-location, table-location,
/// report-location. The report column is optional; sheets without it produce
/// records with an empty `report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub code: String,
    pub name: String,
    pub stored: String,
    pub view: String,
    pub table: String,
    pub report: String,
}

impl FormRecord {
    /// Build a record from a raw sheet row. Missing trailing cells become
    /// empty strings.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| {
            row.get(i)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            code: cell(0),
            name: cell(1),
            stored: cell(2),
            view: cell(3),
            table: cell(4),
            report: cell(5),
        }
    }
}

/// Drop the header row and build records from the remaining rows.
/// A grid with fewer than 2 rows (header only, or nothing) yields no records.
pub fn parse_table(grid: &[Vec<String>]) -> Vec<FormRecord> {
    if grid.len() < 2 {
        return Vec::new();
    }
    grid[1..].iter().map(|row| FormRecord::from_row(row)).collect()
}

/// A selectable candidate card: activating it resubmits `action_text`
/// (the code itself) as the next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub code: String,
    pub name: String,
    pub action_text: String,
}

/// A display-ready outbound message, independent of the chat platform's
/// wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum OutMessage {
    Text(String),
    Carousel {
        alt_text: String,
        cards: Vec<Card>,
        /// Action text of the "next page" affordance, when more pages exist.
        next: Option<String>,
    },
}

/// Format the inbound directive that requests page `index` of an earlier
/// multi-candidate search.
pub fn page_directive(index: usize) -> String {
    format!("next:{index}")
}

/// Parse a `next:<integer>` page directive. Anything else returns None.
pub fn parse_page_directive(text: &str) -> Option<usize> {
    text.trim().strip_prefix("next:")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_from_short_row() {
        let r = FormRecord::from_row(&row(&["F001", "Leave Form"]));
        assert_eq!(r.code, "F001");
        assert_eq!(r.name, "Leave Form");
        assert_eq!(r.stored, "");
        assert_eq!(r.report, "");
    }

    #[test]
    fn test_record_trims_cells() {
        let r = FormRecord::from_row(&row(&[" F001 ", "  Leave Form"]));
        assert_eq!(r.code, "F001");
        assert_eq!(r.name, "Leave Form");
    }

    #[test]
    fn test_parse_table_drops_header() {
        let grid = vec![
            row(&["Code", "Name", "Stored", "View", "Table"]),
            row(&["F001", "Leave Form", "HR Drive", "HR Portal", "Tbl_Leave"]),
        ];
        let records = parse_table(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "F001");
        assert_eq!(records[0].table, "Tbl_Leave");
    }

    #[test]
    fn test_parse_table_header_only_is_empty() {
        let grid = vec![row(&["Code", "Name"])];
        assert!(parse_table(&grid).is_empty());
        assert!(parse_table(&[]).is_empty());
    }

    #[test]
    fn test_page_directive_round_trip() {
        assert_eq!(parse_page_directive(&page_directive(3)), Some(3));
    }

    #[test]
    fn test_parse_page_directive_rejects_other_text() {
        assert_eq!(parse_page_directive("next:"), None);
        assert_eq!(parse_page_directive("next:abc"), None);
        assert_eq!(parse_page_directive("F001"), None);
        assert_eq!(parse_page_directive("next:-1"), None);
        assert_eq!(parse_page_directive(" next:2 "), Some(2));
    }
}
