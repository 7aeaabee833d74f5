use super::*;

use chrono::NaiveDate;

/// A browser window holding the pages it visited.
///
/// Register the documents the server would return with
/// [`MockWindow::set_mock_page`]; when the current page navigates and the
/// target is registered, [`MockWindow::flush`] loads it as a fresh page
/// with its own controllers.
#[derive(Debug, Default)]
pub struct MockWindow {
    pages: Vec<Page>,
    current: usize,
    mock_pages: HashMap<String, String>,
    config: PageConfig,
}

impl MockWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PageConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Pins the clock for every page opened from now on.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.config.today = Some(today);
    }

    pub fn open_page(&mut self, url: &str, html: &str) -> Result<usize> {
        let page = Page::from_html_with_config(html, self.config.clone().with_document_url(url))?;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        Ok(self.current)
    }

    /// Registers the HTML served at `url`. Relative URLs resolve against
    /// the current page, as a navigation to them would.
    pub fn set_mock_page(&mut self, url: &str, html: &str) {
        let key = match self.pages.get(self.current) {
            Some(page) => resolve_url(page.current_url(), url),
            None => url.to_string(),
        };
        self.mock_pages.insert(key, html.to_string());
    }

    pub fn clear_mock_pages(&mut self) {
        self.mock_pages.clear();
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn switch_to_index(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(Error::Runtime(format!("page index out of range: {index}")));
        }
        self.current = index;
        Ok(())
    }

    pub fn current_url(&self) -> Result<&str> {
        Ok(self.current_page()?.current_url())
    }

    pub fn current_page(&self) -> Result<&Page> {
        self.pages
            .get(self.current)
            .ok_or_else(|| Error::Runtime("window has no pages".into()))
    }

    pub fn current_page_mut(&mut self) -> Result<&mut Page> {
        self.pages
            .get_mut(self.current)
            .ok_or_else(|| Error::Runtime("window has no pages".into()))
    }

    pub fn with_current_page<R>(&mut self, f: impl FnOnce(&mut Page) -> Result<R>) -> Result<R> {
        f(self.current_page_mut()?)
    }

    /// Loads the registered page if the current one navigated to it.
    /// Returns whether a new page was opened.
    pub fn follow_navigation(&mut self) -> Result<bool> {
        let page = self.current_page()?;
        if !page.is_unloaded() {
            return Ok(false);
        }
        let url = page.current_url().to_string();
        let Some(html) = self.mock_pages.get(&url).cloned() else {
            return Ok(false);
        };
        self.open_page(&url, &html)?;
        Ok(true)
    }

    /// Flushes the current page and follows the navigation it made, if
    /// the target is registered.
    pub fn flush(&mut self) -> Result<()> {
        self.current_page_mut()?.flush()?;
        self.follow_navigation()?;
        Ok(())
    }

    pub fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        self.with_current_page(|page| page.fill(selector, value))
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.with_current_page(|page| page.type_text(selector, text))
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        self.with_current_page(|page| page.select_option(selector, value))
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        self.with_current_page(|page| page.set_checked(selector, checked))
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        self.with_current_page(|page| page.click(selector))
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        self.with_current_page(|page| page.submit(selector))
    }

    pub fn assert_text(&mut self, selector: &str, expected: &str) -> Result<()> {
        self.with_current_page(|page| page.assert_text(selector, expected))
    }

    pub fn assert_exists(&mut self, selector: &str) -> Result<()> {
        self.with_current_page(|page| page.assert_exists(selector))
    }

    pub fn set_fetch_mock(&mut self, url: &str, body: &str) -> Result<()> {
        self.with_current_page(|page| {
            page.set_fetch_mock(url, body);
            Ok(())
        })
    }

    pub fn take_alert_messages(&mut self) -> Result<Vec<String>> {
        self.with_current_page(|page| Ok(page.take_alert_messages()))
    }

    pub fn take_trace_logs(&mut self) -> Result<Vec<String>> {
        self.with_current_page(|page| Ok(page.take_trace_logs()))
    }
}
