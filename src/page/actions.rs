use super::*;

impl Page {
    /// Replaces a text control's value and fires `input`. Progress only
    /// listens to `change`, so typing alone leaves the bar untouched.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.ctx.dom.has_attr(target, "disabled") || self.ctx.dom.has_attr(target, "readonly") {
            return Ok(());
        }
        self.expect_tag(selector, target, &["input", "textarea"])?;

        stacker::grow(ACTION_STACK, || {
            self.ctx.dom.set_value(target, text)?;
            self.dispatch_event(EventTarget::Node(target), EventKind::Input)?;
            Ok(())
        })
    }

    /// Types into a control and commits it (`input`, then `change`), the
    /// way a user edit followed by blur does. Selects delegate to
    /// [`Page::select_option`].
    pub fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.ctx.dom.has_tag(target, "select") {
            return self.select_option(selector, value);
        }
        if self.ctx.dom.has_attr(target, "disabled") || self.ctx.dom.has_attr(target, "readonly") {
            return Ok(());
        }
        self.expect_tag(selector, target, &["input", "textarea"])?;

        stacker::grow(ACTION_STACK, || {
            self.ctx.dom.set_value(target, value)?;
            self.dispatch_event(EventTarget::Node(target), EventKind::Input)?;
            self.dispatch_event(EventTarget::Node(target), EventKind::Change)?;
            Ok(())
        })
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.expect_tag(selector, target, &["select"])?;
        if self.ctx.dom.has_attr(target, "disabled") {
            return Ok(());
        }
        let known = self
            .ctx
            .dom
            .select_options(target)
            .into_iter()
            .any(|option| self.ctx.dom.option_value(option) == value);
        if !known {
            return Err(Error::Runtime(format!(
                "{selector} has no option with value {value:?}"
            )));
        }

        stacker::grow(ACTION_STACK, || {
            self.ctx.dom.set_value(target, value)?;
            self.dispatch_event(EventTarget::Node(target), EventKind::Input)?;
            self.dispatch_event(EventTarget::Node(target), EventKind::Change)?;
            Ok(())
        })
    }

    /// Checks or unchecks a checkbox or radio. `input` and `change` fire
    /// only when the state actually flips; the control's value is untouched.
    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.ctx.dom.has_attr(target, "disabled") {
            return Ok(());
        }
        self.expect_tag(selector, target, &["input"])?;
        let kind = self
            .ctx
            .dom
            .attr(target, "type")
            .unwrap_or_else(|| "text".into())
            .to_ascii_lowercase();
        if kind != "checkbox" && kind != "radio" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: format!("input[type={kind}]"),
            });
        }

        stacker::grow(ACTION_STACK, || {
            if self.ctx.dom.checked(target)? != checked {
                self.ctx.dom.set_checked(target, checked)?;
                self.dispatch_event(EventTarget::Node(target), EventKind::Input)?;
                self.dispatch_event(EventTarget::Node(target), EventKind::Change)?;
            }
            Ok(())
        })
    }

    /// Clicks an element. A submit control inside a form then submits that
    /// form unless a click listener prevented it.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.ctx.dom.has_attr(target, "disabled") {
            return Ok(());
        }

        stacker::grow(ACTION_STACK, || {
            let click = self.dispatch_event(EventTarget::Node(target), EventKind::Click)?;
            if click.default_prevented || self.ctx.unloaded {
                return Ok(());
            }
            if !self.is_submit_control(target) {
                return Ok(());
            }
            let Some(form) = self.ctx.dom.find_ancestor_by_tag(target, "form") else {
                return Ok(());
            };
            self.submit_node(form)
        })
    }

    /// Fires `submit` on a form, as `requestSubmit()` would.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let form = self.select_one(selector)?;
        self.expect_tag(selector, form, &["form"])?;
        stacker::grow(ACTION_STACK, || self.submit_node(form))
    }

    /// Fires a bare event of the named kind on the first match.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let kind = EventKind::parse(event)
            .ok_or_else(|| Error::Runtime(format!("unsupported event type: {event}")))?;
        let target = self.select_one(selector)?;
        stacker::grow(ACTION_STACK, || {
            self.dispatch_event(EventTarget::Node(target), kind)?;
            Ok(())
        })
    }

    /// The user scrolls the window: the offset changes and `scroll` fires
    /// right away.
    pub fn scroll_to(&mut self, y: i64) -> Result<()> {
        self.ctx.platform.scroll_y = y.max(0);
        stacker::grow(ACTION_STACK, || {
            self.dispatch_event(EventTarget::Window, EventKind::Scroll)?;
            Ok(())
        })
    }

    pub fn scroll_y(&self) -> i64 {
        self.ctx.platform.scroll_y
    }

    /// Assigns the mocked geometry (`offsetTop`, `offsetHeight`) of the
    /// first match.
    pub fn set_layout_box(&mut self, selector: &str, top: i64, height: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.ctx
            .dom
            .set_layout_box(target, LayoutBox { top, height })
    }

    fn submit_node(&mut self, form: NodeId) -> Result<()> {
        let submit = self.dispatch_event(EventTarget::Node(form), EventKind::Submit)?;
        if !submit.default_prevented && !self.ctx.unloaded {
            let label = self.ctx.dom.node_label(form);
            self.ctx
                .trace
                .event_line(format!("[submit] {label} default action not performed"));
        }
        Ok(())
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .ctx
            .dom
            .attr(node, "type")
            .map(|kind| kind.to_ascii_lowercase());
        if self.ctx.dom.has_tag(node, "button") {
            return kind.is_none_or(|kind| kind == "submit");
        }
        self.ctx.dom.has_tag(node, "input") && kind.as_deref() == Some("submit")
    }

    fn expect_tag(&self, selector: &str, node: NodeId, tags: &[&str]) -> Result<()> {
        let tag = self
            .ctx
            .dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "non-element".into());
        if tags.contains(&tag.as_str()) {
            return Ok(());
        }
        Err(Error::TypeMismatch {
            selector: selector.to_string(),
            expected: tags.join(" or "),
            actual: tag,
        })
    }
}
