use formdesk_core::types::FormRecord;
use strsim::normalized_levenshtein;

/// Classification of a keyword lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The upstream table had no data rows.
    EmptyTable,
    /// Neither the exact nor the fuzzy pass matched anything.
    NotFound,
    /// The query equalled a code; all rows sharing that code, in row order.
    Detail(Vec<FormRecord>),
    /// Distinct codes surviving the fuzzy pass, sorted, duplicate-free.
    Candidates(Vec<String>),
}

/// Resolve a free-text query against the form table.
///
/// The exact pass compares the query to the code column case-insensitively
/// and wins outright. The fuzzy pass runs only when the exact pass is empty:
/// both the code and name columns participate, matching is case-insensitive
/// and location within the field is ignored.
pub fn resolve(query: &str, records: &[FormRecord], threshold: f64) -> Outcome {
    if records.is_empty() {
        return Outcome::EmptyTable;
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Outcome::NotFound;
    }

    let exact: Vec<FormRecord> = records
        .iter()
        .filter(|r| r.code.to_lowercase() == needle)
        .cloned()
        .collect();
    if !exact.is_empty() {
        return Outcome::Detail(exact);
    }

    let mut codes: Vec<String> = records
        .iter()
        .filter(|r| {
            field_distance(&needle, &r.code) <= threshold
                || field_distance(&needle, &r.name) <= threshold
        })
        .map(|r| r.code.clone())
        .collect();
    codes.sort();
    codes.dedup();

    if codes.is_empty() {
        Outcome::NotFound
    } else {
        Outcome::Candidates(codes)
    }
}

/// Distance of an already-lowercased needle to a record field, in [0, 1].
///
/// Containment counts as a perfect hit (location is ignored); otherwise the
/// best normalized Levenshtein distance over the whole field and each of its
/// whitespace tokens.
fn field_distance(needle: &str, field: &str) -> f64 {
    let hay = field.to_lowercase();
    if hay.is_empty() {
        return 1.0;
    }
    if hay.contains(needle) {
        return 0.0;
    }

    let mut best = 1.0 - normalized_levenshtein(needle, &hay);
    for token in hay.split_whitespace() {
        let d = 1.0 - normalized_levenshtein(needle, token);
        if d < best {
            best = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, name: &str) -> FormRecord {
        FormRecord {
            code: code.to_string(),
            name: name.to_string(),
            stored: String::new(),
            view: String::new(),
            table: String::new(),
            report: String::new(),
        }
    }

    fn sample_table() -> Vec<FormRecord> {
        vec![
            FormRecord {
                code: "F001".to_string(),
                name: "Leave Form".to_string(),
                stored: "HR Drive".to_string(),
                view: "HR Portal".to_string(),
                table: "Tbl_Leave".to_string(),
                report: String::new(),
            },
            FormRecord {
                code: "F002".to_string(),
                name: "Expense Form".to_string(),
                stored: "Fin Drive".to_string(),
                view: "Fin Portal".to_string(),
                table: "Tbl_Exp".to_string(),
                report: String::new(),
            },
        ]
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(resolve("F001", &[], 0.4), Outcome::EmptyTable);
    }

    #[test]
    fn test_exact_match_returns_detail() {
        match resolve("F001", &sample_table(), 0.4) {
            Outcome::Detail(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name, "Leave Form");
            }
            other => panic!("expected Detail, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(
            resolve("f001", &sample_table(), 0.4),
            resolve("F001", &sample_table(), 0.4)
        );
    }

    #[test]
    fn test_exact_match_groups_shared_codes() {
        let mut records = sample_table();
        records.push(FormRecord {
            code: "F001".to_string(),
            name: "Leave Form".to_string(),
            stored: "Archive Drive".to_string(),
            view: String::new(),
            table: String::new(),
            report: String::new(),
        });
        match resolve("F001", &records, 0.4) {
            Outcome::Detail(matched) => {
                assert_eq!(matched.len(), 2);
                assert_eq!(matched[0].stored, "HR Drive");
                assert_eq!(matched[1].stored, "Archive Drive");
            }
            other => panic!("expected Detail, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_match_never_yields_candidates() {
        // "F001" also fuzzy-matches "F002", but the exact pass wins outright.
        let outcome = resolve("F001", &sample_table(), 0.4);
        assert!(matches!(outcome, Outcome::Detail(_)));
    }

    #[test]
    fn test_fuzzy_match_through_name_column() {
        // No code equals "form"; both names contain it.
        match resolve("form", &sample_table(), 0.4) {
            Outcome::Candidates(codes) => {
                assert_eq!(codes, vec!["F001".to_string(), "F002".to_string()]);
            }
            other => panic!("expected Candidates, got {other:?}"),
        }
    }

    #[test]
    fn test_fuzzy_match_typo_in_code() {
        // One deletion away from "F001": distance 0.25, within 0.4.
        match resolve("F01", &sample_table(), 0.4) {
            Outcome::Candidates(codes) => assert!(codes.contains(&"F001".to_string())),
            other => panic!("expected Candidates, got {other:?}"),
        }
    }

    #[test]
    fn test_fuzzy_is_case_commutative() {
        let table = sample_table();
        assert_eq!(resolve("FORM", &table, 0.4), resolve("form", &table, 0.4));
    }

    #[test]
    fn test_candidates_sorted_and_deduped() {
        let records = vec![
            record("B-10", "Budget Form"),
            record("A-10", "Audit Form"),
            record("A-10", "Audit Form"),
        ];
        match resolve("form", &records, 0.4) {
            Outcome::Candidates(codes) => {
                assert_eq!(codes, vec!["A-10".to_string(), "B-10".to_string()]);
            }
            other => panic!("expected Candidates, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match_is_not_found() {
        assert_eq!(resolve("zzz", &sample_table(), 0.4), Outcome::NotFound);
    }

    #[test]
    fn test_blank_query_is_not_found() {
        assert_eq!(resolve("   ", &sample_table(), 0.4), Outcome::NotFound);
    }

    #[test]
    fn test_threshold_zero_disables_fuzzy() {
        assert_eq!(resolve("F01", &sample_table(), 0.0), Outcome::NotFound);
        // Containment still scores 0.0, so substrings survive.
        assert!(matches!(
            resolve("form", &sample_table(), 0.0),
            Outcome::Candidates(_)
        ));
    }

    #[test]
    fn test_field_distance_containment_is_zero() {
        assert_eq!(field_distance("form", "Leave Form"), 0.0);
        assert_eq!(field_distance("f001", "F001"), 0.0);
    }

    #[test]
    fn test_field_distance_rejects_distant() {
        assert!(field_distance("zzz", "F001") > 0.4);
        assert!(field_distance("zzz", "Leave Form") > 0.4);
    }
}
