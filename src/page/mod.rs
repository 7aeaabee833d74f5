use super::*;

mod actions;
mod assertions;
mod mocks;

const ACTION_STACK: usize = 32 * 1024 * 1024;

/// One loaded document with its controllers wired.
///
/// Construction runs the page-ready step: the form, report and navigation
/// controllers attach to whatever root elements the HTML contains. After
/// that the page is driven like a browser tab: user actions dispatch
/// events synchronously, deferred work (the submission request and scroll
/// events caused by programmatic scrolling) waits until [`Page::flush`].
#[derive(Debug)]
pub struct Page {
    pub(crate) ctx: PageContext,
    pub(crate) controllers: Controllers,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, PageConfig::default())
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        Self::from_html_with_config(html, PageConfig::default().with_document_url(url))
    }

    pub fn from_html_with_config(html: &str, config: PageConfig) -> Result<Self> {
        if config.task_step_limit == 0 {
            return Err(Error::Runtime(
                "task_step_limit requires at least 1 step".into(),
            ));
        }
        let dom = parse_html(html)?;
        let mut ctx = PageContext::new(dom, config);
        let controllers = Controllers::wire(&mut ctx)?;
        ctx.trace.event_line(format!(
            "[ready] form={} report={} nav={}",
            controllers.form.is_some(),
            controllers.report.is_some(),
            controllers.nav.is_some()
        ));
        Ok(Self { ctx, controllers })
    }

    pub fn config(&self) -> &PageConfig {
        &self.ctx.config
    }

    /// Runs deferred work until none is left. Tasks still queued when the
    /// page navigates away are dropped with the document.
    pub fn flush(&mut self) -> Result<()> {
        let mut steps = 0usize;
        while !self.ctx.tasks.is_empty() {
            if self.ctx.unloaded {
                let dropped = self.ctx.tasks.len();
                self.ctx.tasks.clear();
                self.ctx
                    .trace
                    .event_line(format!("[task] unloaded, dropped={dropped}"));
                break;
            }
            steps += 1;
            if steps > self.ctx.config.task_step_limit {
                return Err(Error::Runtime(format!(
                    "flush exceeded task step limit: limit={}, pending={}",
                    self.ctx.config.task_step_limit,
                    self.ctx.tasks.len()
                )));
            }
            self.run_next_task()?;
        }
        Ok(())
    }

    /// Runs one deferred task; `false` when the queue was empty.
    pub fn run_next_task(&mut self) -> Result<bool> {
        if self.ctx.unloaded {
            self.ctx.tasks.clear();
            return Ok(false);
        }
        let Some(task) = self.ctx.tasks.pop_front() else {
            return Ok(false);
        };
        match task {
            Task::Fetch(PendingFetch { call, continuation }) => {
                let outcome = self.ctx.platform.respond(&call);
                self.controllers
                    .settle_fetch(continuation, &mut self.ctx, outcome)?;
            }
            Task::ScrollEvent => {
                self.dispatch_event(EventTarget::Window, EventKind::Scroll)?;
            }
        }
        Ok(true)
    }

    pub fn pending_task_count(&self) -> usize {
        self.ctx.tasks.len()
    }

    /// Whether the page navigated away. An unloaded page keeps its last DOM
    /// for inspection but runs no further tasks.
    pub fn is_unloaded(&self) -> bool {
        self.ctx.unloaded
    }

    pub fn form_state(&self) -> Option<&FormState> {
        self.controllers.form.as_ref().map(FormController::state)
    }

    /// Recomputes and writes the progress bar, returning the percentage.
    pub fn update_progress(&mut self) -> Result<u8> {
        let form = self
            .controllers
            .form
            .as_mut()
            .ok_or_else(|| Error::Runtime("assessment form is not wired".into()))?;
        form.update_progress(&mut self.ctx)
    }

    pub fn validate_form(&mut self) -> Result<bool> {
        let form = self
            .controllers
            .form
            .as_mut()
            .ok_or_else(|| Error::Runtime("assessment form is not wired".into()))?;
        form.validate_form(&mut self.ctx)
    }

    /// The payload a submit would post right now.
    pub fn submission_payload(&self) -> Result<SubmissionPayload> {
        let form = self
            .controllers
            .form
            .as_ref()
            .ok_or_else(|| Error::Runtime("assessment form is not wired".into()))?;
        form.build_payload(&self.ctx)
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.ctx
            .listeners
            .entries()
            .into_iter()
            .map(|(target, event, listener)| Subscription {
                id: listener.id,
                event,
                target: self.ctx.target_label(target),
                handler: listener.handler.name(),
            })
            .collect()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.ctx.listeners.remove(id);
        if removed {
            self.ctx.trace.event_line(format!("[unlisten] {id}"));
        }
        removed
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.ctx.trace.enabled = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.ctx.trace.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.ctx.trace.events = enabled;
    }

    pub fn set_trace_network(&mut self, enabled: bool) {
        self.ctx.trace.network = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.ctx.trace.set_log_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.ctx.trace.take()
    }

    /// Delivers an event along its path: the target, then (for bubbling
    /// kinds) each ancestor and finally the window. Listeners removed by an
    /// earlier handler in the same dispatch are skipped.
    pub(crate) fn dispatch_event(
        &mut self,
        target: EventTarget,
        kind: EventKind,
    ) -> Result<EventState> {
        let mut event = EventState::new(kind, target);
        let label = self.ctx.target_label(target);
        self.ctx
            .trace
            .event_line(format!("[event] {kind} target={label}"));

        for current in self.event_path(target, kind) {
            event.current_target = current;
            for listener in self.ctx.listeners.get(current, kind) {
                if self.ctx.unloaded {
                    return Ok(event);
                }
                if !self.ctx.listeners.is_live(listener.id) {
                    continue;
                }
                self.ctx.trace.event_line(format!(
                    "[event] {} {} -> {}",
                    event.kind,
                    listener.id,
                    listener.handler.name()
                ));
                self.controllers
                    .handle(listener.handler, &mut self.ctx, &mut event)?;
            }
        }
        event.current_target = event.target;
        Ok(event)
    }

    fn event_path(&self, target: EventTarget, kind: EventKind) -> Vec<EventTarget> {
        let EventTarget::Node(node) = target else {
            return vec![EventTarget::Window];
        };
        let mut path = vec![EventTarget::Node(node)];
        if !kind.bubbles() {
            return path;
        }
        let mut cursor = self.ctx.dom.parent(node);
        while let Some(ancestor) = cursor {
            path.push(EventTarget::Node(ancestor));
            cursor = self.ctx.dom.parent(ancestor);
        }
        if self.ctx.dom.is_connected(node) {
            path.push(EventTarget::Window);
        }
        path
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.ctx
            .dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub(crate) fn node_snippet(&self, node: NodeId) -> String {
        truncate_chars(&self.ctx.dom.dump_node(node), 200)
    }
}
