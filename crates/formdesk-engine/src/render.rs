use formdesk_core::types::{page_directive, Card, FormRecord, OutMessage};

use crate::resolver::Outcome;

pub const EMPTY_TABLE_TEXT: &str = "❌ No data found in the table.";
pub const NOT_FOUND_TEXT: &str = "❌ No results match this keyword.";

pub const PICK_ALT_TEXT: &str = "📌 Select a form";
pub const MORE_ALT_TEXT: &str = "📌 More forms";

/// A rendered outcome: the messages to send now, plus the full page set
/// when the outcome was multi-candidate (to be stored in the session store).
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub messages: Vec<OutMessage>,
    pub pages: Option<Vec<Vec<Card>>>,
}

/// Convert a resolver outcome into display-ready messages.
///
/// `records` is the same table the resolver ran against; candidate cards
/// take their display name from the first record carrying the code.
pub fn render(outcome: &Outcome, records: &[FormRecord], page_size: usize) -> Rendered {
    match outcome {
        Outcome::EmptyTable => text(EMPTY_TABLE_TEXT),
        Outcome::NotFound => text(NOT_FOUND_TEXT),
        Outcome::Detail(matched) => Rendered {
            messages: vec![OutMessage::Text(detail_block(matched))],
            pages: None,
        },
        Outcome::Candidates(codes) => {
            let cards: Vec<Card> = codes
                .iter()
                .map(|code| {
                    let name = records
                        .iter()
                        .find(|r| &r.code == code)
                        .map(|r| r.name.clone())
                        .unwrap_or_default();
                    Card {
                        code: code.clone(),
                        name,
                        action_text: code.clone(),
                    }
                })
                .collect();

            let pages: Vec<Vec<Card>> = cards
                .chunks(page_size.max(1))
                .map(|chunk| chunk.to_vec())
                .collect();

            // The resolver never emits an empty candidate set; treat one as
            // not-found rather than index past the end.
            if pages.is_empty() {
                return text(NOT_FOUND_TEXT);
            }

            let first = render_page(&pages[0], 0, pages.len());
            Rendered {
                messages: vec![first],
                pages: Some(pages),
            }
        }
    }
}

/// Render one page of candidate cards. Pages before the last carry a
/// "next page" affordance bound to the following page's directive.
pub fn render_page(page: &[Card], index: usize, total: usize) -> OutMessage {
    let next = if index + 1 < total {
        Some(page_directive(index + 1))
    } else {
        None
    };
    let alt_text = if index == 0 { PICK_ALT_TEXT } else { MORE_ALT_TEXT };
    OutMessage::Carousel {
        alt_text: alt_text.to_string(),
        cards: page.to_vec(),
        next,
    }
}

/// One text block for a group of rows sharing a code: header line with code
/// and name, then the non-code columns, deduplicated and empties dropped,
/// each entry prefixed by its column's marker glyph.
fn detail_block(records: &[FormRecord]) -> String {
    let mut out = String::new();
    if let Some(first) = records.first() {
        out.push_str(&format!("📄 {} {}", first.code, first.name));
    }

    let columns: [(&str, fn(&FormRecord) -> &str); 4] = [
        ("📁", |r| r.stored.as_str()),
        ("🔗", |r| r.view.as_str()),
        ("📋", |r| r.table.as_str()),
        ("🧾", |r| r.report.as_str()),
    ];

    for (glyph, pick) in columns {
        for value in column_values(records, pick) {
            out.push_str(&format!("\n{glyph} {value}"));
        }
    }
    out
}

/// Distinct non-empty values of one column, in first-seen order.
fn column_values<'a>(records: &'a [FormRecord], pick: fn(&FormRecord) -> &str) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for r in records {
        let v = pick(r);
        if !v.is_empty() && !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

fn text(msg: &str) -> Rendered {
    Rendered {
        messages: vec![OutMessage::Text(msg.to_string())],
        pages: None,
    }
}
