use super::*;

mod form;
mod nav;
mod report;

pub(crate) use form::FormController;
pub use form::{FormState, SubmitFailure};
pub(crate) use nav::NavController;
pub(crate) use report::ReportController;

/// The controllers wired on page-ready. Each is present only when its root
/// element exists in the document.
#[derive(Debug, Default)]
pub(crate) struct Controllers {
    pub(crate) form: Option<FormController>,
    pub(crate) report: Option<ReportController>,
    pub(crate) nav: Option<NavController>,
}

impl Controllers {
    pub(crate) fn wire(ctx: &mut PageContext) -> Result<Self> {
        Ok(Self {
            form: FormController::init(ctx)?,
            report: ReportController::init(ctx)?,
            nav: NavController::init(ctx)?,
        })
    }

    /// Routes one listener invocation to the controller that owns it.
    pub(crate) fn handle(
        &mut self,
        handler: Handler,
        ctx: &mut PageContext,
        event: &mut EventState,
    ) -> Result<()> {
        match handler {
            Handler::UpdateProgress => {
                if let Some(form) = self.form.as_mut() {
                    form.update_progress(ctx)?;
                }
            }
            Handler::SubmitAssessment => {
                if let Some(form) = self.form.as_mut() {
                    form.on_submit(ctx, event)?;
                }
            }
            Handler::PrintReport => {
                if let Some(report) = self.report.as_ref() {
                    report.on_print_click(ctx);
                }
            }
            Handler::ActivateNavLink => {
                if let Some(nav) = self.nav.as_ref() {
                    nav.on_link_click(ctx, event)?;
                }
            }
            Handler::ScrollSpy => {
                if let Some(nav) = self.nav.as_ref() {
                    nav.on_scroll(ctx)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn settle_fetch(
        &mut self,
        continuation: Continuation,
        ctx: &mut PageContext,
        outcome: std::result::Result<FetchResponse, String>,
    ) -> Result<()> {
        match continuation {
            Continuation::SubmissionSettled => {
                if let Some(form) = self.form.as_mut() {
                    form.on_submission_settled(ctx, outcome)?;
                }
            }
        }
        Ok(())
    }
}
