use super::*;

use chrono::NaiveDate;
use url::Url;

/// A request the page issued through `fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl FetchCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchMock {
    Respond { status: u16, body: String },
    Fail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

/// A scroll the page asked the browser to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollRequest {
    Window {
        top: i64,
        behavior: ScrollBehavior,
    },
    IntoView {
        /// `tag#id.class` label of the element brought into view.
        element: String,
        block: ScrollBlock,
        behavior: ScrollBehavior,
    },
}

#[derive(Debug)]
pub(crate) struct PlatformState {
    pub(crate) scroll_y: i64,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
    pub(crate) location_url: String,
    pub(crate) location_navigations: Vec<LocationNavigation>,
    pub(crate) alert_messages: Vec<String>,
    pub(crate) print_count: usize,
    pub(crate) console_errors: Vec<String>,
    pub(crate) today: Option<NaiveDate>,
    pub(crate) fetch_mocks: HashMap<String, FetchMock>,
    pub(crate) fetch_calls: Vec<FetchCall>,
}

impl PlatformState {
    pub(crate) fn new(config: &PageConfig) -> Self {
        Self {
            scroll_y: 0,
            scroll_requests: Vec::new(),
            location_url: config.document_url.clone(),
            location_navigations: Vec::new(),
            alert_messages: Vec::new(),
            print_count: 0,
            console_errors: Vec::new(),
            today: config.today,
            fetch_mocks: HashMap::new(),
            fetch_calls: Vec::new(),
        }
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Settles a request against the registered mocks. An unmocked URL
    /// fails the way an unreachable host does.
    pub(crate) fn respond(&self, call: &FetchCall) -> std::result::Result<FetchResponse, String> {
        match self.fetch_mocks.get(&call.url) {
            Some(FetchMock::Respond { status, body }) => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(FetchMock::Fail(message)) => Err(message.clone()),
            None => Err(format!("Failed to fetch {}", call.url)),
        }
    }
}

/// Resolves a navigation target against the document URL. Opaque bases
/// such as `about:blank` leave relative targets as written.
pub(crate) fn resolve_url(base: &str, target: &str) -> String {
    if let Ok(base) = Url::parse(base) {
        if !base.cannot_be_a_base() {
            if let Ok(joined) = base.join(target) {
                return joined.into();
            }
        }
    }
    target.to_string()
}
