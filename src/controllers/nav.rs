use super::*;

const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = ".section-card, .report-section";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug)]
pub(crate) struct NavController {
    links: Vec<NodeId>,
}

impl NavController {
    pub(crate) fn init(ctx: &mut PageContext) -> Result<Option<Self>> {
        let links = ctx.dom.query_selector_all(NAV_LINK_SELECTOR)?;
        if links.is_empty() {
            return Ok(None);
        }
        for link in &links {
            ctx.subscribe(
                EventTarget::Node(*link),
                EventKind::Click,
                Handler::ActivateNavLink,
            );
        }
        ctx.subscribe(EventTarget::Window, EventKind::Scroll, Handler::ScrollSpy);
        Ok(Some(Self { links }))
    }

    /// In-page links scroll to their section under the fixed header;
    /// any other href keeps its default navigation.
    pub(crate) fn on_link_click(&self, ctx: &mut PageContext, event: &mut EventState) -> Result<()> {
        let Some(link) = event.current_node() else {
            return Ok(());
        };
        let href = ctx.dom.attr(link, "href").unwrap_or_default();
        if !href.starts_with('#') {
            return Ok(());
        }
        event.prevent_default();

        self.activate(ctx, Some(link))?;

        // A bare `#` or a fragment that is not a valid selector resolves to nothing.
        let section = ctx.dom.query_selector(&href).ok().flatten();
        if let Some(section) = section {
            let top = ctx.dom.offset_top(section) - ctx.config.nav_header_offset;
            ctx.trace.event_line(format!("[nav] {href} scroll_to top={top}"));
            ctx.scroll_window_to(top, ScrollBehavior::Smooth);
        }
        Ok(())
    }

    pub(crate) fn on_scroll(&self, ctx: &mut PageContext) -> Result<()> {
        let scroll_y = ctx.platform.scroll_y;
        let offset = ctx.config.scroll_spy_offset;

        let mut current = None;
        for section in ctx.dom.query_selector_all(SECTION_SELECTOR)? {
            let top = ctx.dom.offset_top(section) - offset;
            let height = ctx.dom.offset_height(section);
            if scroll_y >= top && scroll_y < top + height {
                current = Some(section);
            }
        }
        let Some(section) = current else {
            return Ok(());
        };

        let fragment = format!("#{}", ctx.dom.attr(section, "id").unwrap_or_else(|| "null".into()));
        let link = self
            .links
            .iter()
            .copied()
            .find(|link| ctx.dom.attr(*link, "href").as_deref() == Some(fragment.as_str()));
        ctx.trace
            .event_line(format!("[nav] scroll_y={scroll_y} current={fragment}"));
        self.activate(ctx, link)
    }

    fn activate(&self, ctx: &mut PageContext, link: Option<NodeId>) -> Result<()> {
        for other in &self.links {
            ctx.dom.class_remove(*other, ACTIVE_CLASS)?;
        }
        if let Some(link) = link {
            ctx.dom.class_add(link, ACTIVE_CLASS)?;
        }
        Ok(())
    }
}
