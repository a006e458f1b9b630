use std::collections::BTreeMap;

use crate::data::record::Record;
use crate::data::summary::Summary;
use crate::state::pager::PageView;

/// Telegram caps messages at 4096 chars; stay under it with headroom
/// for Markdown entities.
pub const MESSAGE_LIMIT: usize = 3900;

/// Minimal Markdown escape for cell-derived text (asterisk, underscore,
/// backtick, backslash).
pub fn escape_md(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('`', "\\`")
}

/// One student as a Markdown card.
pub fn format_record_card(record: &Record) -> String {
    let mut lines = vec![format!("👤 *{}*", escape_md(&record.full_name))];
    if !record.hemis_id.is_empty() {
        lines.push(format!("🆔 HEMIS: `{}`", escape_md(&record.hemis_id)));
    }
    if !record.personal_number.is_empty() {
        lines.push(format!("🔑 JSHSHIR: `{}`", escape_md(&record.personal_number)));
    }
    if !record.faculty.is_empty() {
        lines.push(format!("🏫 Fakultet: {}", escape_md(&record.faculty)));
    }
    if !record.specialization.is_empty() {
        lines.push(format!("📚 Yo'nalish: {}", escape_md(&record.specialization)));
    }
    if !record.group.is_empty() {
        lines.push(format!("👥 Guruh: {}", escape_md(&record.group)));
    }
    if !record.status.is_empty() {
        lines.push(format!("📌 Holati: {}", escape_md(&record.status)));
    }
    if let Some(emp) = &record.employment {
        lines.push(format!("💼 Lavozim: {}", escape_md(&emp.position)));
        lines.push(format!("🏢 Tashkilot: {}", escape_md(&emp.organization)));
        lines.push(format!("📅 Shartnoma sanasi: {}", escape_md(&emp.contract_date)));
    }
    lines.join("\n")
}

/// Cards for the records on one page, separated by rules.
pub fn format_results_block(records: &[Record]) -> String {
    records
        .iter()
        .map(format_record_card)
        .collect::<Vec<_>>()
        .join("\n— — —\n")
}

/// Full page text: whole-search headline counts, the cursor position,
/// then the cards.
pub fn format_page(view: &PageView) -> String {
    format!(
        "📋 *Jami topilgan talabalar soni:* {} ta\n\
         🟢 *Mehnat shartnomasiga ega talabalar soni:* {} ta ({}%)\n\
         📄 *Sahifa:* {}/{}\n\n{}",
        view.summary.total,
        view.summary.active,
        view.summary.percentage,
        view.page,
        view.total_pages,
        format_results_block(&view.records)
    )
}

/// The /stat report: overall counts plus the per-group breakdown.
pub fn format_grouped_stats(overall: &Summary, groups: &[(String, Summary)]) -> String {
    let mut lines = vec![
        "📊 *Statistika (yo'nalishlar bo'yicha):*\n".to_string(),
        format!("👥 *Jami talabalar soni:* {} ta", overall.total),
        format!(
            "🟢 *Faol shartnomaga ega talabalar soni:* {} ta ({}%)\n",
            overall.active, overall.percentage
        ),
    ];
    for (label, summary) in groups {
        lines.push(format!(
            "✅ *{}:* jami {} | faol: {} ({}%)",
            escape_md(label),
            summary.total,
            summary.active,
            summary.percentage
        ));
    }
    lines.join("\n")
}

/// Admin view of the action-log aggregate.
pub fn format_action_stats(stats: &BTreeMap<String, usize>) -> String {
    let mut lines = vec!["📊 *Bot statistikasi*\n".to_string()];
    for (action, count) in stats {
        lines.push(format!("✅ *{}*: {} marta", escape_md(action), count));
    }
    lines.join("\n")
}

/// Split a long report into transport-sized chunks on line boundaries.
/// A single line longer than the limit becomes its own chunk rather
/// than being cut mid-entity.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.len() + line.len() > limit {
            parts.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
