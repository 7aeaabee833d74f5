use super::*;

use chrono::NaiveDate;

impl Page {
    /// Answers requests to `url` with status 200 and `body`.
    pub fn set_fetch_mock(&mut self, url: &str, body: &str) {
        self.set_fetch_mock_with_status(url, 200, body);
    }

    pub fn set_fetch_mock_with_status(&mut self, url: &str, status: u16, body: &str) {
        self.ctx.platform.fetch_mocks.insert(
            url.to_string(),
            FetchMock::Respond {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Makes requests to `url` reject with `message`, as a dropped
    /// connection does.
    pub fn set_fetch_failure(&mut self, url: &str, message: &str) {
        self.ctx
            .platform
            .fetch_mocks
            .insert(url.to_string(), FetchMock::Fail(message.to_string()));
    }

    pub fn clear_fetch_mocks(&mut self) {
        self.ctx.platform.fetch_mocks.clear();
    }

    pub fn take_fetch_calls(&mut self) -> Vec<FetchCall> {
        std::mem::take(&mut self.ctx.platform.fetch_calls)
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ctx.platform.alert_messages)
    }

    pub fn take_console_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ctx.platform.console_errors)
    }

    pub fn take_location_navigations(&mut self) -> Vec<LocationNavigation> {
        std::mem::take(&mut self.ctx.platform.location_navigations)
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.ctx.platform.scroll_requests)
    }

    pub fn current_url(&self) -> &str {
        &self.ctx.platform.location_url
    }

    pub fn print_count(&self) -> usize {
        self.ctx.platform.print_count
    }

    /// Fixes the platform clock. Only affects dates rendered afterwards;
    /// the report date is written once on page-ready.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.ctx.platform.today = Some(today);
    }
}
