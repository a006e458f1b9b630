//! Event handlers
//!
//! One struct owning every collaborator, one method per user-facing
//! flow. `handle_update` is the per-event error boundary: a failure in
//! one conversation is logged and answered there, and never escapes to
//! the polling loop.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::data::exporter::ResultExporter;
use crate::data::schema::SheetSchema;
use crate::data::search::RecordFilter;
use crate::data::snapshot::Snapshot;
use crate::data::source::RowSource;
use crate::data::summary::{distribution, summarize_grouped, summarize_snapshot};
use crate::error::BotError;
use crate::services::{ActionLogger, ChartArtifact, ChartRenderer};
use crate::state::pager::{PageView, Pager};
use crate::state::session::AdminAction;
use crate::state::store::SessionStore;
use crate::telegram::api::{ChatAction, TelegramClient, Update};
use crate::telegram::events::{BotEvent, CallbackAction};
use crate::telegram::format;
use crate::telegram::keyboards;

const MSG_GENERIC_ERROR: &str = "❌ Xatolik yuz berdi. Iltimos, qaytadan urinib ko'ring.";
const MSG_SOURCE_ERROR: &str =
    "❌ Jadvaldan ma'lumot olishda xato. Birozdan so'ng qayta urinib ko'ring.";
const MSG_NO_RESULTS: &str = "❌ *Hech qanday ma'lumot topilmadi.*";
const MSG_EMPTY_SHEET: &str = "❌ *Jadval bo'sh.*";
const MSG_EXPORT_EMPTY: &str = "❌ Eksport qilish uchun natijalar topilmadi.";
const MSG_EXPORT_TOO_LARGE: &str =
    "❌ Fayl hajmi juda katta (50 MB dan ortiq). Iltimos, qidiruvni qisqartiring.";
const MSG_UNAUTHORIZED: &str = "❌ Sizda admin paneliga kirish huquqi yo'q.";
const MSG_SEARCH_PROMPT: &str =
    "🔎 Qidiruvni boshlash uchun: *ism/familiya (qismi)* yoki *HEMIS ID / JSHSHIR* yuboring.";
const MSG_TEXT_PROMPT: &str = "📝 Iltimos, qidirish uchun matn yuboring.";

const ADMIN_EDIT_PROMPT: &str = "📝 Tahrir qilmoqchi bo'lgan qator indeksini va yangi \
     ma'lumotlarni kiriting.\n\
     Format: `row_index|hemisuid|fio|hemis|jshshir|status|lavozim|tashkilot|sanasi`";

pub struct BotHandlers {
    config: Config,
    schema: SheetSchema,
    telegram: TelegramClient,
    cache: Arc<SnapshotCache>,
    source: Arc<dyn RowSource>,
    sessions: SessionStore,
    actions: ActionLogger,
    chart: Box<dyn ChartRenderer>,
}

impl BotHandlers {
    pub fn new(
        config: Config,
        schema: SheetSchema,
        telegram: TelegramClient,
        cache: Arc<SnapshotCache>,
        source: Arc<dyn RowSource>,
        actions: ActionLogger,
        chart: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            schema,
            telegram,
            cache,
            source,
            sessions: SessionStore::new(),
            actions,
            chart,
        }
    }

    /// Entry point for one update. Never returns an error: failures are
    /// logged and answered to the affected chat only.
    pub async fn handle_update(&self, update: Update) {
        let Some(event) = BotEvent::from_update(&update) else {
            return;
        };
        let chat_id = match &event {
            BotEvent::Command { chat_id, .. }
            | BotEvent::Text { chat_id, .. }
            | BotEvent::Callback { chat_id, .. } => *chat_id,
        };

        if let Err(e) = self.dispatch(event).await {
            error!(target: "handlers", chat_id, "event failed: {e}");
            let user_message = match &e {
                BotError::SourceUnavailable(_) | BotError::SchemaMismatch { .. } => {
                    MSG_SOURCE_ERROR
                }
                BotError::ExportTooLarge { .. } => MSG_EXPORT_TOO_LARGE,
                BotError::Unauthorized => MSG_UNAUTHORIZED,
                _ => MSG_GENERIC_ERROR,
            };
            self.notify(chat_id, user_message).await;
        }
    }

    async fn dispatch(&self, event: BotEvent) -> Result<(), BotError> {
        match event {
            BotEvent::Command { chat_id, name } => match name.as_str() {
                "start" => self.cmd_start(chat_id).await,
                "stat" => self.cmd_stat(chat_id).await,
                "grafik" => self.cmd_chart(chat_id).await,
                "admin" => self.cmd_admin(chat_id).await,
                other => {
                    info!(target: "handlers", chat_id, command = other, "unknown command ignored");
                    Ok(())
                }
            },
            BotEvent::Text { chat_id, text } => self.on_text(chat_id, &text).await,
            BotEvent::Callback {
                chat_id,
                callback_id,
                message_id,
                payload,
            } => {
                self.on_callback(chat_id, &callback_id, message_id, &payload)
                    .await
            }
        }
    }

    // ---------------- commands ----------------

    async fn cmd_start(&self, chat_id: i64) -> Result<(), BotError> {
        self.sessions.clear(chat_id);
        self.telegram
            .send_message(
                chat_id,
                "👋 *Assalomu alaykum!*\n\n\
                 Ism/familiya (qismi bo'lsa ham), HEMIS ID yoki JSHSHIR yuboring — \
                 men jadvaldan topib beraman.\n\n\
                 📌 Pastdagi tugmalardan foydalanishingiz mumkin:",
                Some(keyboards::main_menu()),
            )
            .await?;
        self.actions.record_lossy(chat_id, "start");
        Ok(())
    }

    async fn cmd_stat(&self, chat_id: i64) -> Result<(), BotError> {
        self.chat_action(chat_id, ChatAction::Typing).await;

        let snapshot = self.load_snapshot().await?;
        if snapshot.is_empty() {
            self.notify(chat_id, MSG_EMPTY_SHEET).await;
            return Ok(());
        }

        let required = &self.config.sheet.required_status;
        let overall = summarize_snapshot(&snapshot, &self.schema, required);
        let groups =
            summarize_grouped(&snapshot, &self.schema, self.schema.specialization, required);
        let report = format::format_grouped_stats(&overall, &groups);

        self.invalidate_previous_render(chat_id).await;
        for part in format::split_message(&report, format::MESSAGE_LIMIT) {
            self.telegram.send_message(chat_id, &part, None).await?;
        }
        self.actions.record_lossy(chat_id, "stat");
        Ok(())
    }

    async fn cmd_chart(&self, chat_id: i64) -> Result<(), BotError> {
        self.chat_action(chat_id, ChatAction::UploadPhoto).await;

        let snapshot = self.load_snapshot().await?;
        let counts = distribution(&snapshot, self.schema.specialization);
        if counts.is_empty() {
            self.notify(chat_id, "❌ Grafik uchun ma'lumot topilmadi.").await;
            return Ok(());
        }

        match self.chart.render("Yo'nalishlar bo'yicha taqsimot", &counts) {
            ChartArtifact::Photo { bytes, caption } => {
                self.telegram
                    .send_photo(chat_id, "taqsimot.png", bytes, &caption)
                    .await?;
            }
            ChartArtifact::Text(text) => {
                for part in format::split_message(&text, format::MESSAGE_LIMIT) {
                    self.telegram.send_message(chat_id, &part, None).await?;
                }
            }
        }
        self.actions.record_lossy(chat_id, "grafik");
        Ok(())
    }

    async fn cmd_admin(&self, chat_id: i64) -> Result<(), BotError> {
        self.require_admin(chat_id)?;
        self.chat_action(chat_id, ChatAction::Typing).await;
        self.telegram
            .send_message(
                chat_id,
                "🛠 *Admin paneli*\n\nQuyidagi amallarni tanlang:",
                Some(keyboards::admin_menu()),
            )
            .await?;
        self.actions.record_lossy(chat_id, "admin_panel");
        Ok(())
    }

    // ---------------- free text ----------------

    async fn on_text(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        // Reply-keyboard buttons arrive as plain text; route them to
        // their handlers instead of searching for the label.
        match text {
            "🔎 Qidiruv" | "Qidiruv" => {
                self.telegram
                    .send_message(chat_id, MSG_SEARCH_PROMPT, None)
                    .await?;
                return Ok(());
            }
            "📊 Statistika" | "Statistika" => return self.cmd_stat(chat_id).await,
            "📉 Grafik" | "Grafik" | "grafik" => return self.cmd_chart(chat_id).await,
            _ => {}
        }

        let pending = self.sessions.get(chat_id).pending_admin_action;
        if pending == Some(AdminAction::EditRow) {
            return self.admin_apply_edit(chat_id, text).await;
        }

        if text.is_empty() {
            self.telegram
                .send_message(chat_id, MSG_TEXT_PROMPT, None)
                .await?;
            return Ok(());
        }

        self.run_search(chat_id, text).await
    }

    async fn run_search(&self, chat_id: i64, query: &str) -> Result<(), BotError> {
        self.chat_action(chat_id, ChatAction::Typing).await;

        let snapshot = self.load_snapshot().await?;
        let required = &self.config.sheet.required_status;
        let results = RecordFilter::search(&snapshot, query, &self.schema, required);
        let found = results.len();

        let view = self.sessions.update(chat_id, |session| {
            session.set_results(query.to_string(), results);
            Pager::render_page(session, 1, self.config.behavior.page_size, required)
        });

        match view {
            Some(view) if found > 0 => {
                self.send_page(chat_id, view).await?;
                self.actions.record_lossy(chat_id, &format!("search_{query}"));
            }
            _ => {
                self.invalidate_previous_render(chat_id).await;
                self.notify(chat_id, MSG_NO_RESULTS).await;
            }
        }
        Ok(())
    }

    /// Send a freshly rendered page as a new message, replacing the
    /// previous one.
    async fn send_page(&self, chat_id: i64, view: PageView) -> Result<(), BotError> {
        let text = format::format_page(&view);
        self.invalidate_previous_render(chat_id).await;

        let sent = self
            .telegram
            .send_message(
                chat_id,
                &text,
                Some(keyboards::pagination_keyboard(view.page, view.total_pages)),
            )
            .await?;
        self.sessions.update(chat_id, |session| {
            session.page_message_id = Some(sent.message_id);
        });
        Ok(())
    }

    // ---------------- callbacks ----------------

    async fn on_callback(
        &self,
        chat_id: i64,
        callback_id: &str,
        message_id: Option<i64>,
        payload: &str,
    ) -> Result<(), BotError> {
        if let Err(e) = self.telegram.answer_callback_query(callback_id).await {
            warn!(target: "telegram", chat_id, "answerCallbackQuery failed: {e}");
        }

        let action = match CallbackAction::parse(payload) {
            Ok(action) => action,
            Err(e) => {
                // Stale or forged button: drop the event, keep the chat alive.
                warn!(target: "handlers", chat_id, "{e}");
                return Ok(());
            }
        };

        match action {
            CallbackAction::Page(requested) => self.navigate(chat_id, message_id, requested).await,
            CallbackAction::Export => self.export_results(chat_id).await,
            CallbackAction::AdminStats => self.admin_stats(chat_id, message_id).await,
            CallbackAction::AdminEditRow => self.admin_edit_prompt(chat_id, message_id).await,
            CallbackAction::AdminExit => self.admin_exit(chat_id, message_id).await,
        }
    }

    /// Page navigation edits the rendered message in place.
    async fn navigate(
        &self,
        chat_id: i64,
        message_id: Option<i64>,
        requested: i64,
    ) -> Result<(), BotError> {
        let required = &self.config.sheet.required_status;
        let view = self.sessions.update(chat_id, |session| {
            Pager::render_page(session, requested, self.config.behavior.page_size, required)
        });

        let Some(view) = view else {
            warn!(target: "handlers", chat_id, "page navigation without an active search");
            return Ok(());
        };

        let text = format::format_page(&view);
        let markup = keyboards::pagination_keyboard(view.page, view.total_pages);
        match message_id {
            Some(message_id) => {
                self.telegram
                    .edit_message_text(chat_id, message_id, &text, Some(markup))
                    .await?;
                self.sessions.update(chat_id, |session| {
                    session.page_message_id = Some(message_id);
                });
            }
            None => self.send_page(chat_id, view.clone()).await?,
        }

        self.actions
            .record_lossy(chat_id, &format!("page_{}", view.page));
        Ok(())
    }

    async fn export_results(&self, chat_id: i64) -> Result<(), BotError> {
        let results = self.sessions.get(chat_id).results;
        let Some(results) = results.filter(|r| !r.is_empty()) else {
            self.notify(chat_id, MSG_EXPORT_EMPTY).await;
            return Ok(());
        };

        self.chat_action(chat_id, ChatAction::UploadDocument).await;
        let file = ResultExporter::to_csv(&results)?;
        self.telegram
            .send_document(
                chat_id,
                &file.filename,
                file.bytes,
                "📤 Qidiruv natijalarini fayl sifatida yuklab oling.",
            )
            .await?;
        self.actions.record_lossy(chat_id, "export");
        Ok(())
    }

    // ---------------- admin ----------------

    async fn admin_stats(&self, chat_id: i64, message_id: Option<i64>) -> Result<(), BotError> {
        self.require_admin(chat_id)?;

        let stats = self.actions.aggregate();
        let text = if stats.is_empty() {
            "❌ Hozircha statistika mavjud emas.".to_string()
        } else {
            format::format_action_stats(&stats)
        };
        self.edit_or_send(chat_id, message_id, &text, None).await?;
        self.actions.record_lossy(chat_id, "admin_stats");
        Ok(())
    }

    async fn admin_edit_prompt(
        &self,
        chat_id: i64,
        message_id: Option<i64>,
    ) -> Result<(), BotError> {
        self.require_admin(chat_id)?;

        self.edit_or_send(chat_id, message_id, ADMIN_EDIT_PROMPT, None)
            .await?;
        self.sessions.update(chat_id, |session| {
            session.pending_admin_action = Some(AdminAction::EditRow);
        });
        self.actions.record_lossy(chat_id, "admin_edit_row");
        Ok(())
    }

    async fn admin_exit(&self, chat_id: i64, message_id: Option<i64>) -> Result<(), BotError> {
        self.require_admin(chat_id)?;

        self.edit_or_send(chat_id, message_id, "🛠 Admin panelidan chiqildi.", None)
            .await?;
        self.sessions.update(chat_id, |session| {
            session.pending_admin_action = None;
        });
        self.actions.record_lossy(chat_id, "admin_exit");
        Ok(())
    }

    /// Apply a pending row edit: `row_index|` followed by the 8 field
    /// values, pipe-separated.
    async fn admin_apply_edit(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        self.require_admin(chat_id)?;

        let parts: Vec<&str> = text.split('|').collect();
        if parts.len() != 9 {
            self.notify(
                chat_id,
                "❌ Noto'g'ri format. Iltimos, to'g'ri formatda kiriting: \
                 `row_index|hemisuid|fio|hemis|jshshir|status|lavozim|tashkilot|sanasi`",
            )
            .await;
            return Ok(());
        }

        let row_index: usize = match parts[0].trim().parse() {
            Ok(n) => n,
            Err(_) => {
                self.notify(chat_id, "❌ Qator indeksi raqam bo'lishi kerak.").await;
                return Ok(());
            }
        };
        let values: Vec<String> = parts[1..].iter().map(|s| s.trim().to_string()).collect();

        self.source
            .update_row(
                &self.config.sheet.sheet_id,
                &self.config.sheet.worksheet_title,
                row_index,
                &values,
            )
            .await?;
        // The sheet changed under the cache; force the next read to refetch.
        self.cache.invalidate().await;

        self.sessions.update(chat_id, |session| {
            session.pending_admin_action = None;
        });
        self.telegram
            .send_message(
                chat_id,
                &format!("✅ Qator {row_index} muvaffaqiyatli yangilandi."),
                None,
            )
            .await?;
        self.actions
            .record_lossy(chat_id, &format!("edit_row_{row_index}"));
        Ok(())
    }

    // ---------------- helpers ----------------

    fn require_admin(&self, chat_id: i64) -> Result<(), BotError> {
        if self.config.telegram.admin_ids.contains(&chat_id) {
            Ok(())
        } else {
            Err(BotError::Unauthorized)
        }
    }

    async fn load_snapshot(&self) -> Result<Arc<Snapshot>, BotError> {
        self.cache
            .get(
                &self.config.sheet.sheet_id,
                &self.config.sheet.worksheet_title,
            )
            .await
    }

    /// Delete the previously rendered page message, if any. Deletion is
    /// best-effort: a transport refusal (already deleted, too old) is
    /// logged and the transition proceeds.
    async fn invalidate_previous_render(&self, chat_id: i64) {
        let previous = self.sessions.update(chat_id, |session| {
            session.page_message_id.take()
        });
        if let Some(message_id) = previous {
            if let Err(e) = self.telegram.delete_message(chat_id, message_id).await {
                warn!(target: "telegram", chat_id, message_id, "could not delete previous page: {e}");
            }
        }
    }

    async fn edit_or_send(
        &self,
        chat_id: i64,
        message_id: Option<i64>,
        text: &str,
        reply_markup: Option<serde_json::Value>,
    ) -> Result<(), BotError> {
        match message_id {
            Some(message_id) => {
                self.telegram
                    .edit_message_text(chat_id, message_id, text, reply_markup)
                    .await?;
            }
            None => {
                self.telegram.send_message(chat_id, text, reply_markup).await?;
            }
        }
        Ok(())
    }

    /// Fire-and-forget user notification; a failed send is only logged.
    async fn notify(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.telegram.send_message(chat_id, text, None).await {
            warn!(target: "telegram", chat_id, "notification failed: {e}");
        }
    }

    async fn chat_action(&self, chat_id: i64, action: ChatAction) {
        if let Err(e) = self.telegram.send_chat_action(chat_id, action).await {
            warn!(target: "telegram", chat_id, "chat action failed: {e}");
        }
    }
}
