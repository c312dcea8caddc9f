use formdesk_core::types::{Card, OutMessage};
use serde_json::{json, Value};

pub const DETAIL_BUTTON_LABEL: &str = "🔍 Details";
pub const NEXT_PAGE_LABEL: &str = "➡️ Next page";

/// Convert a domain message into a LINE message object.
pub fn to_line_message(msg: &OutMessage) -> Value {
    match msg {
        OutMessage::Text(text) => json!({
            "type": "text",
            "text": text,
        }),
        OutMessage::Carousel {
            alt_text,
            cards,
            next,
        } => {
            let mut bubbles: Vec<Value> = cards.iter().map(card_bubble).collect();
            if let Some(directive) = next {
                bubbles.push(next_bubble(directive));
            }
            json!({
                "type": "flex",
                "altText": alt_text,
                "contents": {
                    "type": "carousel",
                    "contents": bubbles,
                },
            })
        }
    }
}

/// A selectable candidate bubble: code, name, and a button that resubmits
/// the code as the next query.
fn card_bubble(card: &Card) -> Value {
    let name = if card.name.is_empty() {
        card.code.as_str()
    } else {
        card.name.as_str()
    };
    json!({
        "type": "bubble",
        "size": "kilo",
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [
                {
                    "type": "text",
                    "text": format!("📄 {}", card.code),
                    "weight": "bold",
                    "size": "md",
                },
                {
                    "type": "text",
                    "text": name,
                    "size": "sm",
                    "color": "#555555",
                    "wrap": true,
                },
                {
                    "type": "button",
                    "style": "primary",
                    "height": "sm",
                    "color": "#0FA3B1",
                    "action": {
                        "type": "message",
                        "label": DETAIL_BUTTON_LABEL,
                        "text": card.action_text.as_str(),
                    },
                },
            ],
        },
    })
}

/// The trailing "next page" bubble; its button resubmits the page directive.
fn next_bubble(directive: &str) -> Value {
    json!({
        "type": "bubble",
        "size": "kilo",
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [
                {
                    "type": "text",
                    "text": "➡️ More results",
                    "weight": "bold",
                    "size": "md",
                },
                {
                    "type": "button",
                    "style": "secondary",
                    "height": "sm",
                    "action": {
                        "type": "message",
                        "label": NEXT_PAGE_LABEL,
                        "text": directive,
                    },
                },
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: &str, name: &str) -> Card {
        Card {
            code: code.to_string(),
            name: name.to_string(),
            action_text: code.to_string(),
        }
    }

    #[test]
    fn test_text_message_shape() {
        let msg = to_line_message(&OutMessage::Text("hello".to_string()));
        assert_eq!(msg["type"], "text");
        assert_eq!(msg["text"], "hello");
    }

    #[test]
    fn test_carousel_bubbles_carry_code_and_action() {
        let msg = to_line_message(&OutMessage::Carousel {
            alt_text: "pick one".to_string(),
            cards: vec![card("F001", "Leave Form"), card("F002", "Expense Form")],
            next: None,
        });
        assert_eq!(msg["type"], "flex");
        assert_eq!(msg["altText"], "pick one");
        let bubbles = msg["contents"]["contents"].as_array().unwrap();
        assert_eq!(bubbles.len(), 2);
        let first = &bubbles[0]["body"]["contents"];
        assert_eq!(first[0]["text"], "📄 F001");
        assert_eq!(first[1]["text"], "Leave Form");
        assert_eq!(first[2]["action"]["type"], "message");
        assert_eq!(first[2]["action"]["text"], "F001");
    }

    #[test]
    fn test_next_affordance_appends_bubble() {
        let msg = to_line_message(&OutMessage::Carousel {
            alt_text: "pick one".to_string(),
            cards: vec![card("F001", "Leave Form")],
            next: Some("next:1".to_string()),
        });
        let bubbles = msg["contents"]["contents"].as_array().unwrap();
        assert_eq!(bubbles.len(), 2);
        let last = &bubbles[1]["body"]["contents"];
        assert_eq!(last[1]["action"]["text"], "next:1");
    }

    #[test]
    fn test_empty_name_falls_back_to_code() {
        let msg = to_line_message(&OutMessage::Carousel {
            alt_text: "pick one".to_string(),
            cards: vec![card("F001", "")],
            next: None,
        });
        let first = &msg["contents"]["contents"][0]["body"]["contents"];
        assert_eq!(first[1]["text"], "F001");
    }
}
