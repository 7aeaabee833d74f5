use chrono::NaiveDate;

/// Knobs for a page instance. Every field has the value the production
/// page hard-codes as its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// URL the document was loaded from; redirects resolve against it.
    pub document_url: String,
    /// Where the assessment form posts its payload.
    pub submit_endpoint: String,
    /// Fixed header height subtracted when a nav link scrolls to its section.
    pub nav_header_offset: i64,
    /// Offset subtracted from each section's top before scroll-spy matching.
    pub scroll_spy_offset: i64,
    /// Date the report renders; `None` reads the local clock.
    pub today: Option<NaiveDate>,
    /// Upper bound on tasks a single `flush` may run.
    pub task_step_limit: usize,
    /// Entries retained by the trace log.
    pub trace_log_limit: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            document_url: "about:blank".into(),
            submit_endpoint: "/submit".into(),
            nav_header_offset: 100,
            scroll_spy_offset: 150,
            today: None,
            task_step_limit: 10_000,
            trace_log_limit: 10_000,
        }
    }
}

impl PageConfig {
    pub fn with_document_url(mut self, url: &str) -> Self {
        self.document_url = url.to_string();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}
