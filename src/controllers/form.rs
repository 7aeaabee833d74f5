use super::*;

const FORM_ID: &str = "assessmentForm";
const PROGRESS_BAR_ID: &str = "progressBar";
const OVERLAY_ID: &str = "loadingOverlay";
const FIELD_SELECTOR: &str = "input, select";
const INVALID_CLASS: &str = "is-invalid";
const FEEDBACK_CLASS: &str = "invalid-feedback";

/// Where the assessment form is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    /// The last submit attempt stopped at client validation.
    Invalid,
    /// A request is in flight; the overlay is shown.
    Submitting,
    /// The server accepted the payload and the location moved on.
    Redirecting { target: String },
    /// The last request settled without a redirect; the form is editable.
    Failed(SubmitFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The server answered without accepting the submission.
    Rejected,
    /// No usable answer: network error or an undecodable body.
    Transport(String),
}

#[derive(Debug)]
pub(crate) struct FormController {
    form: NodeId,
    progress_bar: Option<NodeId>,
    overlay: Option<NodeId>,
    /// Captured once; fields added later are neither counted nor posted.
    fields: Vec<NodeId>,
    state: FormState,
}

impl FormController {
    pub(crate) fn init(ctx: &mut PageContext) -> Result<Option<Self>> {
        let Some(form) = ctx.dom.by_id(FORM_ID) else {
            return Ok(None);
        };
        let fields = ctx.dom.query_selector_all_from(form, FIELD_SELECTOR)?;
        for field in &fields {
            ctx.subscribe(
                EventTarget::Node(*field),
                EventKind::Change,
                Handler::UpdateProgress,
            );
        }
        ctx.subscribe(
            EventTarget::Node(form),
            EventKind::Submit,
            Handler::SubmitAssessment,
        );
        Ok(Some(Self {
            form,
            progress_bar: ctx.dom.by_id(PROGRESS_BAR_ID),
            overlay: ctx.dom.by_id(OVERLAY_ID),
            fields,
            state: FormState::Idle,
        }))
    }

    pub(crate) fn state(&self) -> &FormState {
        &self.state
    }

    /// Recomputes the filled percentage and writes it to the progress bar.
    pub(crate) fn update_progress(&mut self, ctx: &mut PageContext) -> Result<u8> {
        let filled = self
            .fields
            .iter()
            .filter(|field| !is_blank(&field_value(&ctx.dom, **field)))
            .count();
        let percent = progress_percent(filled, self.fields.len());
        ctx.trace.event_line(format!(
            "[progress] filled={filled} total={} percent={percent}",
            self.fields.len()
        ));

        let Some(bar) = self.progress_bar else {
            ctx.warn_missing("progress bar", "#progressBar");
            return Ok(percent);
        };
        ctx.dom.style_set(bar, "width", &format!("{percent}%"))?;
        ctx.dom.set_attr(bar, "aria-valuenow", &percent.to_string())?;
        Ok(percent)
    }

    /// Marks every empty required field and clears marks from the rest.
    /// Values are never touched, so repeated calls leave the same DOM.
    pub(crate) fn validate_form(&mut self, ctx: &mut PageContext) -> Result<bool> {
        let mut is_valid = true;
        for field in self.fields.clone() {
            let feedback = ctx
                .dom
                .next_element_sibling(field)
                .filter(|next| ctx.dom.class_contains(*next, FEEDBACK_CLASS));

            let missing =
                ctx.dom.has_attr(field, "required") && is_blank(&field_value(&ctx.dom, field));
            if missing {
                is_valid = false;
                ctx.dom.class_add(field, INVALID_CLASS)?;
                if feedback.is_none() {
                    let message = ctx.dom.create_detached_element("div");
                    ctx.dom.set_attr(message, "class", FEEDBACK_CLASS)?;
                    ctx.dom.set_text_content(message, REQUIRED_FIELD_MESSAGE)?;
                    ctx.dom.insert_after(field, message)?;
                }
            } else {
                ctx.dom.class_remove(field, INVALID_CLASS)?;
                if let Some(feedback) = feedback {
                    ctx.dom.remove_node(feedback)?;
                }
            }
        }

        if !is_valid {
            let first_invalid = ctx
                .dom
                .query_selector_from(self.form, &format!(".{INVALID_CLASS}"))?;
            if let Some(first_invalid) = first_invalid {
                ctx.scroll_into_view(first_invalid, ScrollBlock::Center, ScrollBehavior::Smooth);
            }
        }
        Ok(is_valid)
    }

    pub(crate) fn on_submit(&mut self, ctx: &mut PageContext, event: &mut EventState) -> Result<()> {
        event.prevent_default();

        if !self.validate_form(ctx)? {
            ctx.trace.event_line("[submit] blocked by validation".into());
            self.state = FormState::Invalid;
            return Ok(());
        }

        self.set_overlay(ctx, "flex")?;
        let payload = self.build_payload(ctx)?;
        let call = FetchCall {
            method: "POST".into(),
            url: ctx.config.submit_endpoint.clone(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: payload.to_json()?,
        };
        ctx.fetch(call, Continuation::SubmissionSettled);
        self.state = FormState::Submitting;
        Ok(())
    }

    pub(crate) fn build_payload(&self, ctx: &PageContext) -> Result<SubmissionPayload> {
        let mut payload = SubmissionPayload::new();
        for field in &self.fields {
            let name = ctx.dom.attr(*field, "name").unwrap_or_default();
            payload.insert(name, ctx.dom.value(*field)?);
        }
        Ok(payload)
    }

    pub(crate) fn on_submission_settled(
        &mut self,
        ctx: &mut PageContext,
        outcome: std::result::Result<FetchResponse, String>,
    ) -> Result<()> {
        let decoded = match outcome {
            Ok(response) => {
                ctx.trace.network_line(format!(
                    "[fetch] settled status={} body_bytes={}",
                    response.status,
                    response.body.len()
                ));
                SubmitResponse::from_body(&response.body).map_err(|err| match err {
                    Error::Payload(detail) => detail,
                    other => other.to_string(),
                })
            }
            Err(detail) => {
                ctx.trace
                    .network_line(format!("[fetch] failed detail={detail}"));
                Err(detail)
            }
        };

        match decoded {
            Ok(response) => match response.redirect_target() {
                Some(target) => {
                    let target = target.to_string();
                    ctx.navigate(&target);
                    self.state = FormState::Redirecting { target };
                }
                None => {
                    ctx.alert(SUBMIT_FAILED_MESSAGE);
                    self.set_overlay(ctx, "none")?;
                    self.state = FormState::Failed(SubmitFailure::Rejected);
                }
            },
            Err(detail) => {
                ctx.console_error(format!("Error: {detail}"));
                ctx.alert(SUBMIT_ERROR_MESSAGE);
                self.set_overlay(ctx, "none")?;
                self.state = FormState::Failed(SubmitFailure::Transport(detail));
            }
        }
        Ok(())
    }

    fn set_overlay(&self, ctx: &mut PageContext, display: &str) -> Result<()> {
        match self.overlay {
            Some(overlay) => ctx.dom.style_set(overlay, "display", display),
            None => {
                ctx.warn_missing("loading overlay", "#loadingOverlay");
                Ok(())
            }
        }
    }
}

fn field_value(dom: &Dom, field: NodeId) -> String {
    dom.value(field).unwrap_or_default()
}

/// Blank after trimming the way `String.prototype.trim` does: Unicode
/// spaces, line terminators and the byte-order mark, but not U+0085.
fn is_blank(value: &str) -> bool {
    value
        .chars()
        .all(|c| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

/// `Math.round(filled / total * 100)`, evaluated in `f64` so ratios such as
/// 23/40 (57.49999999999999) round down as they do in a browser.
pub(crate) fn progress_percent(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = filled.min(total) as f64 / total as f64;
    let percent = (ratio * 100.0 + 0.5).floor().clamp(0.0, 100.0);
    percent as u8
}
