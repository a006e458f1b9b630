use serde_json::{json, Value};

/// Persistent reply keyboard with the three main actions.
pub fn main_menu() -> Value {
    json!({
        "keyboard": [
            [{ "text": "🔎 Qidiruv" }, { "text": "📊 Statistika" }],
            [{ "text": "📉 Grafik" }],
        ],
        "resize_keyboard": true,
        "one_time_keyboard": false,
    })
}

/// Prev/next page buttons plus export, mirroring the current cursor.
/// Buttons that would leave the valid page range are simply not shown.
pub fn pagination_keyboard(page: usize, total_pages: usize) -> Value {
    let mut row = Vec::new();
    if page > 1 {
        row.push(json!({ "text": "⬅️ Oldingi", "callback_data": format!("pg|{}", page - 1) }));
    }
    if page < total_pages {
        row.push(json!({ "text": "Keyingi ➡️", "callback_data": format!("pg|{}", page + 1) }));
    }
    row.push(json!({ "text": "📤 Eksport", "callback_data": "export" }));

    json!({ "inline_keyboard": [row] })
}

/// Admin panel entry menu.
pub fn admin_menu() -> Value {
    json!({
        "inline_keyboard": [
            [{ "text": "📊 Statistika ma'lumotlari", "callback_data": "admin_stats" }],
            [{ "text": "📝 Qatorlarni tahrirlash", "callback_data": "admin_edit_row" }],
            [{ "text": "🔙 Chiqish", "callback_data": "admin_exit" }],
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_payloads(markup: &Value) -> Vec<String> {
        markup["inline_keyboard"][0]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["callback_data"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn first_page_has_no_prev_button() {
        let payloads = button_payloads(&pagination_keyboard(1, 3));
        assert_eq!(payloads, vec!["pg|2", "export"]);
    }

    #[test]
    fn last_page_has_no_next_button() {
        let payloads = button_payloads(&pagination_keyboard(3, 3));
        assert_eq!(payloads, vec!["pg|2", "export"]);
    }

    #[test]
    fn middle_page_has_both() {
        let payloads = button_payloads(&pagination_keyboard(2, 3));
        assert_eq!(payloads, vec!["pg|1", "pg|3", "export"]);
    }

    #[test]
    fn single_page_still_offers_export() {
        let payloads = button_payloads(&pagination_keyboard(1, 1));
        assert_eq!(payloads, vec!["export"]);
    }
}
