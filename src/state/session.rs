use crate::data::record::Record;

/// Multi-step admin flow the next text message should complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    EditRow,
}

/// Ephemeral per-conversation state: the active search and its
/// pagination cursor.
///
/// `results: None` means "not yet searched"; `Some(vec![])` means the
/// last search matched nothing. Every new search replaces the stored
/// result set, including with an empty one.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub last_query: String,
    pub results: Option<Vec<Record>>,
    pub current_page: usize,
    pub page_message_id: Option<i64>,
    pub pending_admin_action: Option<AdminAction>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            last_query: String::new(),
            results: None,
            // The cursor is always a valid page, even before a search.
            current_page: 1,
            page_message_id: None,
            pending_admin_action: None,
        }
    }
}

impl SessionState {
    /// Install a fresh result set and reset the cursor to page 1.
    pub fn set_results(&mut self, query: String, results: Vec<Record>) {
        self.last_query = query;
        self.results = Some(results);
        self.current_page = 1;
        self.page_message_id = None;
    }
}
