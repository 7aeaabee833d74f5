use super::*;

#[derive(Debug)]
pub(crate) struct ReportController {
    print_button: Option<NodeId>,
}

impl ReportController {
    pub(crate) fn init(ctx: &mut PageContext) -> Result<Option<Self>> {
        if ctx.dom.by_id("summary").is_none() {
            return Ok(None);
        }

        if let Some(date) = ctx.dom.by_id("reportDate") {
            let text = format_long_date(ctx.today());
            ctx.dom.set_text_content(date, &text)?;
        }

        let print_button = ctx.dom.query_selector(".print-btn")?;
        if let Some(button) = print_button {
            ctx.subscribe(EventTarget::Node(button), EventKind::Click, Handler::PrintReport);
        }
        Ok(Some(Self { print_button }))
    }

    pub(crate) fn on_print_click(&self, ctx: &mut PageContext) {
        if let Some(button) = self.print_button {
            let label = ctx.dom.node_label(button);
            ctx.trace.event_line(format!("[report] print requested by {label}"));
        }
        ctx.print();
    }
}
