use super::*;

/// Event types the page controllers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Input,
    Scroll,
    Submit,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::Input => "input",
            Self::Scroll => "scroll",
            Self::Submit => "submit",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "click" => Some(Self::Click),
            "change" => Some(Self::Change),
            "input" => Some(Self::Input),
            "scroll" => Some(Self::Scroll),
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }

    /// Whether dispatch continues to ancestors after the target.
    pub(crate) fn bubbles(self) -> bool {
        !matches!(self, Self::Scroll)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventTarget {
    Window,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Controller entry points a subscription can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    UpdateProgress,
    SubmitAssessment,
    PrintReport,
    ActivateNavLink,
    ScrollSpy,
}

impl Handler {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::UpdateProgress => "update-progress",
            Self::SubmitAssessment => "submit-assessment",
            Self::PrintReport => "print-report",
            Self::ActivateNavLink => "activate-nav-link",
            Self::ScrollSpy => "scroll-spy",
        }
    }
}

/// Public view of a live subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub event: EventKind,
    /// `window` or the `tag#id.class` label of the element listened on.
    pub target: String,
    pub handler: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Listener {
    pub(crate) id: SubscriptionId,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<EventTarget, HashMap<EventKind, Vec<Listener>>>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn add(
        &mut self,
        target: EventTarget,
        event: EventKind,
        handler: Handler,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.map
            .entry(target)
            .or_default()
            .entry(event)
            .or_default()
            .push(Listener { id, handler });
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for events in self.map.values_mut() {
            for listeners in events.values_mut() {
                if let Some(pos) = listeners.iter().position(|listener| listener.id == id) {
                    listeners.remove(pos);
                    removed = true;
                    break;
                }
            }
            if removed {
                events.retain(|_, listeners| !listeners.is_empty());
                break;
            }
        }
        if removed {
            self.map.retain(|_, events| !events.is_empty());
        }
        removed
    }

    /// Listeners in subscription order; a snapshot, so handlers may
    /// subscribe or unsubscribe while it is being walked.
    pub(crate) fn get(&self, target: EventTarget, event: EventKind) -> Vec<Listener> {
        self.map
            .get(&target)
            .and_then(|events| events.get(&event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn is_live(&self, id: SubscriptionId) -> bool {
        self.map
            .values()
            .flat_map(|events| events.values())
            .flatten()
            .any(|listener| listener.id == id)
    }

    pub(crate) fn entries(&self) -> Vec<(EventTarget, EventKind, Listener)> {
        let mut out = self
            .map
            .iter()
            .flat_map(|(target, events)| {
                events.iter().flat_map(move |(event, listeners)| {
                    listeners
                        .iter()
                        .map(move |listener| (*target, *event, *listener))
                })
            })
            .collect::<Vec<_>>();
        out.sort_by_key(|(_, _, listener)| listener.id);
        out
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) kind: EventKind,
    pub(crate) target: EventTarget,
    pub(crate) current_target: EventTarget,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn current_node(&self) -> Option<NodeId> {
        match self.current_target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_keep_subscription_order() {
        let mut store = ListenerStore::default();
        let target = EventTarget::Node(NodeId(3));
        let first = store.add(target, EventKind::Click, Handler::ActivateNavLink);
        let second = store.add(target, EventKind::Click, Handler::PrintReport);
        store.add(target, EventKind::Change, Handler::UpdateProgress);

        let ids = store
            .get(target, EventKind::Click)
            .into_iter()
            .map(|listener| listener.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn remove_drops_only_the_named_subscription() {
        let mut store = ListenerStore::default();
        let a = store.add(EventTarget::Window, EventKind::Scroll, Handler::ScrollSpy);
        let b = store.add(EventTarget::Window, EventKind::Scroll, Handler::ScrollSpy);
        assert!(store.remove(a));
        assert!(!store.remove(a));
        assert!(!store.is_live(a));
        assert!(store.is_live(b));
        assert_eq!(store.get(EventTarget::Window, EventKind::Scroll).len(), 1);
        assert!(store.remove(b));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn event_kind_round_trips_names() {
        for kind in [
            EventKind::Click,
            EventKind::Change,
            EventKind::Input,
            EventKind::Scroll,
            EventKind::Submit,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("keydown"), None);
        assert!(!EventKind::Scroll.bubbles());
        assert!(EventKind::Submit.bubbles());
    }
}
