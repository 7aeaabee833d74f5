use super::*;

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) network: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl TraceState {
    pub(crate) fn new(log_limit: usize) -> Self {
        Self {
            enabled: false,
            events: true,
            network: true,
            logs: VecDeque::new(),
            log_limit: log_limit.max(1),
            to_stderr: true,
        }
    }

    pub(crate) fn event_line(&mut self, line: String) {
        if self.enabled && self.events {
            self.line(line);
        }
    }

    pub(crate) fn network_line(&mut self, line: String) {
        if self.enabled && self.network {
            self.line(line);
        }
    }

    /// Warnings always reach the `log` facade; the in-memory trace only
    /// keeps them while tracing is enabled.
    pub(crate) fn warn_line(&mut self, line: String) {
        log::warn!(target: "assessment_page", "{line}");
        if self.enabled {
            self.push(line);
        }
    }

    fn line(&mut self, line: String) {
        log::debug!(target: "assessment_page", "{line}");
        if self.to_stderr {
            eprintln!("{line}");
        }
        self.push(line);
    }

    fn push(&mut self, line: String) {
        self.logs.push_back(line);
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
    }

    pub(crate) fn set_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs).into_iter().collect()
    }
}
