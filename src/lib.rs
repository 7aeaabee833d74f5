//! Deterministic page controllers for the student assessment site.
//!
//! A [`Page`] parses the hosting HTML into an in-memory DOM, wires the
//! form, report and navigation controllers the way the browser script does
//! on page-ready, and then lets callers act as the user (fill fields, click,
//! submit, scroll) while every platform side effect (fetch, alert, print,
//! location changes, scrolling) is recorded instead of performed.
//!
//! ```
//! use assessment_page::Page;
//!
//! let html = r#"
//! <form id="assessmentForm">
//!   <input id="name" name="name" required>
//!   <button id="send" type="submit">Send</button>
//! </form>
//! <div id="progressBar"></div>
//! <div id="loadingOverlay"></div>
//! "#;
//!
//! let mut page = Page::from_html(html)?;
//! page.set_fetch_mock("/submit", r#"{"success":true,"redirect":"/report"}"#);
//! page.fill("#name", "Mei")?;
//! page.assert_attr("#progressBar", "aria-valuenow", "100")?;
//! page.click("#send")?;
//! page.flush()?;
//! assert_eq!(page.current_url(), "/report");
//! # Ok::<(), assessment_page::Error>(())
//! ```

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod config;
mod context;
mod controllers;
mod dom;
mod events;
mod html;
mod intl;
mod page;
mod payload;
mod platform;
mod selector;
mod trace;
mod window;

pub use config::PageConfig;
pub use controllers::{FormState, SubmitFailure};
pub use events::{EventKind, Subscription, SubscriptionId};
pub use intl::{REQUIRED_FIELD_MESSAGE, SUBMIT_ERROR_MESSAGE, SUBMIT_FAILED_MESSAGE, format_long_date};
pub use page::Page;
pub use payload::{SubmissionPayload, SubmitResponse};
pub use platform::{FetchCall, LocationNavigation, ScrollBehavior, ScrollBlock, ScrollRequest};
pub use window::MockWindow;

pub(crate) use context::*;
pub(crate) use controllers::*;
pub(crate) use dom::*;
pub(crate) use events::*;
pub(crate) use html::*;
pub(crate) use platform::*;
pub(crate) use selector::*;
pub(crate) use trace::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    Runtime(String),
    Payload(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::Payload(msg) => write!(f, "payload error: {msg}"),
        }
    }
}

impl StdError for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

#[cfg(test)]
mod tests;
