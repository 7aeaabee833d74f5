use super::*;

/// Work the page deferred until the next `flush`.
#[derive(Debug, Clone)]
pub(crate) enum Task {
    Fetch(PendingFetch),
    /// A `scroll` event on the window, queued by a programmatic scroll.
    ScrollEvent,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingFetch {
    pub(crate) call: FetchCall,
    pub(crate) continuation: Continuation,
}

/// Who receives a fetch result once it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    SubmissionSettled,
}

/// Everything a controller handler may touch: the document, the listener
/// table, the mocked window and the deferred task queue.
#[derive(Debug)]
pub(crate) struct PageContext {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) platform: PlatformState,
    pub(crate) trace: TraceState,
    pub(crate) config: PageConfig,
    pub(crate) tasks: VecDeque<Task>,
    /// Set once the location changed; the document is gone after that.
    pub(crate) unloaded: bool,
}

impl PageContext {
    pub(crate) fn new(dom: Dom, config: PageConfig) -> Self {
        Self {
            dom,
            listeners: ListenerStore::default(),
            platform: PlatformState::new(&config),
            trace: TraceState::new(config.trace_log_limit),
            config,
            tasks: VecDeque::new(),
            unloaded: false,
        }
    }

    pub(crate) fn subscribe(
        &mut self,
        target: EventTarget,
        event: EventKind,
        handler: Handler,
    ) -> SubscriptionId {
        let id = self.listeners.add(target, event, handler);
        let label = self.target_label(target);
        self.trace.event_line(format!(
            "[listen] {id} {event} on {label} -> {}",
            handler.name()
        ));
        id
    }

    pub(crate) fn target_label(&self, target: EventTarget) -> String {
        match target {
            EventTarget::Window => "window".into(),
            EventTarget::Node(node) => self.dom.node_label(node),
        }
    }

    pub(crate) fn fetch(&mut self, call: FetchCall, continuation: Continuation) {
        self.trace.network_line(format!(
            "[fetch] {} {} queued body_bytes={}",
            call.method,
            call.url,
            call.body.len()
        ));
        self.platform.fetch_calls.push(call.clone());
        self.tasks
            .push_back(Task::Fetch(PendingFetch { call, continuation }));
    }

    pub(crate) fn alert(&mut self, message: &str) {
        self.trace.event_line(format!("[alert] {message}"));
        self.platform.alert_messages.push(message.to_string());
    }

    pub(crate) fn console_error(&mut self, line: String) {
        log::error!(target: "assessment_page", "{line}");
        self.platform.console_errors.push(line);
    }

    pub(crate) fn navigate(&mut self, target: &str) {
        let from = self.platform.location_url.clone();
        let to = resolve_url(&from, target);
        self.trace
            .event_line(format!("[location] navigate from={from} to={to}"));
        self.platform.location_navigations.push(LocationNavigation {
            from,
            to: to.clone(),
        });
        self.platform.location_url = to;
        self.unloaded = true;
    }

    /// Moves the window immediately and queues the resulting `scroll` event.
    pub(crate) fn scroll_window_to(&mut self, top: i64, behavior: ScrollBehavior) {
        let top = top.max(0);
        self.platform.scroll_y = top;
        self.platform
            .scroll_requests
            .push(ScrollRequest::Window { top, behavior });
        self.tasks.push_back(Task::ScrollEvent);
    }

    pub(crate) fn scroll_into_view(
        &mut self,
        node: NodeId,
        block: ScrollBlock,
        behavior: ScrollBehavior,
    ) {
        let element = self.dom.node_label(node);
        self.trace
            .event_line(format!("[scroll] into_view {element} block={block:?}"));
        self.platform.scroll_requests.push(ScrollRequest::IntoView {
            element,
            block,
            behavior,
        });
    }

    pub(crate) fn print(&mut self) {
        self.trace.event_line("[print] dialog opened".into());
        self.platform.print_count += 1;
    }

    pub(crate) fn today(&self) -> chrono::NaiveDate {
        self.platform.today()
    }

    pub(crate) fn warn_missing(&mut self, what: &str, selector: &str) {
        self.trace
            .warn_line(format!("[warn] {what}: {selector} not found, skipped"));
    }
}
