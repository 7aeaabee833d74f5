use super::*;

use chrono::NaiveDate;

const FORM_HTML: &str = r#"
<form id="assessmentForm">
  <div class="mb-3"><input id="name" name="name" required></div>
  <div class="mb-3">
    <select id="grade" name="grade" required>
      <option value="">请选择</option>
      <option value="高一">高一</option>
      <option value="高二">高二</option>
    </select>
  </div>
  <div class="mb-3"><input id="hobby" name="hobby"></div>
  <button id="send" type="submit">提交</button>
</form>
<div class="progress">
  <div id="progressBar" class="progress-bar" style="width: 0%;" aria-valuenow="0"></div>
</div>
<div id="loadingOverlay" style="display: none;"></div>
"#;

const NAV_HTML: &str = r##"
<nav>
  <a id="l1" class="nav-link active" href="#section1">一</a>
  <a id="l2" class="nav-link" href="#section2">二</a>
  <a id="l3" class="nav-link" href="/about">关于</a>
</nav>
<div id="section1" class="section-card">one</div>
<div id="section2" class="report-section">two</div>
"##;

const REPORT_HTML: &str = r#"
<section id="summary">
  <p>报告日期：<span id="reportDate"></span></p>
  <button class="btn print-btn">打印</button>
</section>
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn fill_all(page: &mut Page) -> Result<()> {
    page.fill("#name", "李梅")?;
    page.select_option("#grade", "高二")?;
    page.fill("#hobby", "绘画")?;
    Ok(())
}

#[test]
fn change_updates_progress_width_and_aria() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.fill("#name", "李梅")?;
    page.assert_style("#progressBar", "width", "33%")?;
    page.assert_attr("#progressBar", "aria-valuenow", "33")?;

    page.select_option("#grade", "高一")?;
    page.assert_attr("#progressBar", "aria-valuenow", "67")?;

    page.fill("#name", "   ")?;
    page.assert_style("#progressBar", "width", "33%")?;
    Ok(())
}

#[test]
fn typing_without_commit_leaves_progress_alone() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.type_text("#name", "李")?;
    page.assert_attr("#progressBar", "aria-valuenow", "0")?;
    page.dispatch("#name", "change")?;
    page.assert_attr("#progressBar", "aria-valuenow", "33")?;
    Ok(())
}

#[test]
fn empty_required_fields_block_submission() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.click("#send")?;

    assert_eq!(page.count(".invalid-feedback")?, 2);
    page.assert_class("#name", "is-invalid", true)?;
    page.assert_class("#grade", "is-invalid", true)?;
    page.assert_class("#hobby", "is-invalid", false)?;
    page.assert_text("#name + .invalid-feedback", REQUIRED_FIELD_MESSAGE)?;
    assert_eq!(page.form_state(), Some(&FormState::Invalid));
    assert!(page.take_fetch_calls().is_empty());
    assert_eq!(page.pending_task_count(), 0);
    page.assert_style("#loadingOverlay", "display", "none")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest::IntoView {
            element: "input#name.is-invalid".into(),
            block: ScrollBlock::Center,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    Ok(())
}

#[test]
fn validation_is_idempotent_and_keeps_values() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.type_text("#hobby", "  ")?;
    assert!(!page.validate_form()?);
    let first = page.dump_dom("#assessmentForm")?;
    assert!(!page.validate_form()?);
    assert_eq!(page.dump_dom("#assessmentForm")?, first);
    assert_eq!(page.count(".invalid-feedback")?, 2);
    page.assert_value("#hobby", "  ")?;
    Ok(())
}

#[test]
fn validation_clears_stale_messages() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    assert!(!page.validate_form()?);
    page.fill("#name", "李梅")?;
    assert!(!page.validate_form()?);
    page.assert_class("#name", "is-invalid", false)?;
    assert_eq!(page.count(".invalid-feedback")?, 1);

    page.select_option("#grade", "高一")?;
    assert!(page.validate_form()?);
    assert_eq!(page.count(".invalid-feedback")?, 0);
    Ok(())
}

#[test]
fn accepted_submission_navigates_to_redirect() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.set_fetch_mock("/submit", r#"{"success": true, "redirect": "/report/42"}"#);
    fill_all(&mut page)?;
    page.click("#send")?;

    assert_eq!(page.form_state(), Some(&FormState::Submitting));
    page.assert_style("#loadingOverlay", "display", "flex")?;
    assert_eq!(page.current_url(), "about:blank");

    let calls = page.take_fetch_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].url, "/submit");
    assert_eq!(calls[0].header("content-type"), Some("application/json"));
    assert_eq!(
        calls[0].json_body()?,
        serde_json::json!({"name": "李梅", "grade": "高二", "hobby": "绘画"})
    );

    page.flush()?;
    assert_eq!(page.current_url(), "/report/42");
    assert_eq!(
        page.take_location_navigations(),
        vec![LocationNavigation {
            from: "about:blank".into(),
            to: "/report/42".into(),
        }]
    );
    assert_eq!(
        page.form_state(),
        Some(&FormState::Redirecting {
            target: "/report/42".into()
        })
    );
    page.assert_style("#loadingOverlay", "display", "flex")?;
    assert!(page.take_alert_messages().is_empty());
    assert!(page.is_unloaded());
    Ok(())
}

#[test]
fn rejected_submission_alerts_and_keeps_form_editable() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.set_fetch_mock("/submit", r#"{"success": false, "error": "duplicate"}"#);
    fill_all(&mut page)?;
    page.submit("#assessmentForm")?;
    page.flush()?;

    assert_eq!(page.take_alert_messages(), vec![SUBMIT_FAILED_MESSAGE.to_string()]);
    assert!(page.take_console_errors().is_empty());
    page.assert_style("#loadingOverlay", "display", "none")?;
    assert!(page.take_location_navigations().is_empty());
    assert_eq!(
        page.form_state(),
        Some(&FormState::Failed(SubmitFailure::Rejected))
    );

    page.fill("#hobby", "")?;
    page.assert_attr("#progressBar", "aria-valuenow", "67")?;
    Ok(())
}

#[test]
fn success_without_redirect_counts_as_rejected() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.set_fetch_mock("/submit", r#"{"success": true}"#);
    fill_all(&mut page)?;
    page.click("#send")?;
    page.flush()?;
    assert_eq!(page.take_alert_messages(), vec![SUBMIT_FAILED_MESSAGE.to_string()]);
    assert_eq!(page.current_url(), "about:blank");
    Ok(())
}

#[test]
fn network_failure_logs_and_alerts() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.set_fetch_failure("/submit", "TypeError: connection refused");
    fill_all(&mut page)?;
    page.click("#send")?;
    page.flush()?;

    assert_eq!(
        page.take_console_errors(),
        vec!["Error: TypeError: connection refused".to_string()]
    );
    assert_eq!(page.take_alert_messages(), vec![SUBMIT_ERROR_MESSAGE.to_string()]);
    page.assert_style("#loadingOverlay", "display", "none")?;
    assert_eq!(
        page.form_state(),
        Some(&FormState::Failed(SubmitFailure::Transport(
            "TypeError: connection refused".into()
        )))
    );
    Ok(())
}

#[test]
fn malformed_and_null_bodies_take_the_error_path() -> Result<()> {
    for body in ["<html>500</html>", "null"] {
        let mut page = Page::from_html(FORM_HTML)?;
        page.set_fetch_mock_with_status("/submit", 500, body);
        fill_all(&mut page)?;
        page.click("#send")?;
        page.flush()?;

        let errors = page.take_console_errors();
        assert_eq!(errors.len(), 1, "{body}");
        assert!(errors[0].starts_with("Error: "), "{errors:?}");
        assert_eq!(page.take_alert_messages(), vec![SUBMIT_ERROR_MESSAGE.to_string()]);
        page.assert_style("#loadingOverlay", "display", "none")?;
    }
    Ok(())
}

#[test]
fn unmocked_endpoint_is_a_network_error() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    fill_all(&mut page)?;
    page.click("#send")?;
    page.flush()?;
    assert_eq!(
        page.take_console_errors(),
        vec!["Error: Failed to fetch /submit".to_string()]
    );
    Ok(())
}

#[test]
fn resubmitting_while_in_flight_sends_again() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.set_fetch_mock("/submit", r#"{"success": true, "redirect": "/report/42"}"#);
    fill_all(&mut page)?;
    page.click("#send")?;
    page.click("#send")?;
    assert_eq!(page.pending_task_count(), 2);
    assert_eq!(page.take_fetch_calls().len(), 2);

    page.flush()?;
    assert_eq!(page.take_location_navigations().len(), 1);
    assert_eq!(page.pending_task_count(), 0);
    Ok(())
}

#[test]
fn configured_endpoint_is_used() -> Result<()> {
    let config = PageConfig {
        submit_endpoint: "/api/assessments".into(),
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(FORM_HTML, config)?;
    page.set_fetch_mock("/api/assessments", r#"{"success": 1, "redirect": "/r/1"}"#);
    fill_all(&mut page)?;
    page.click("#send")?;
    page.flush()?;
    assert_eq!(page.current_url(), "/r/1");
    Ok(())
}

#[test]
fn nav_click_activates_and_scrolls_under_header() -> Result<()> {
    let mut page = Page::from_html(NAV_HTML)?;
    page.set_layout_box("#section1", 0, 600)?;
    page.set_layout_box("#section2", 600, 400)?;

    page.click("#l2")?;
    page.assert_class("#l2", "active", true)?;
    page.assert_class("#l1", "active", false)?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest::Window {
            top: 500,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    assert_eq!(page.scroll_y(), 500);

    assert_eq!(page.pending_task_count(), 1);
    page.flush()?;
    page.assert_class("#l2", "active", true)?;
    assert_eq!(page.count(".nav-link.active")?, 1);
    Ok(())
}

#[test]
fn nav_click_on_missing_fragment_only_activates() -> Result<()> {
    let html = r##"<a id="a" class="nav-link" href="#nowhere">x</a><a id="b" class="nav-link" href="#">y</a>"##;
    let mut page = Page::from_html(html)?;
    page.click("#a")?;
    page.assert_class("#a", "active", true)?;
    page.click("#b")?;
    page.assert_class("#b", "active", true)?;
    page.assert_class("#a", "active", false)?;
    assert!(page.take_scroll_requests().is_empty());
    Ok(())
}

#[test]
fn external_nav_link_is_not_prevented() -> Result<()> {
    let mut page = Page::from_html(NAV_HTML)?;
    let link = page.select_one("#l3")?;
    let event = page.dispatch_event(EventTarget::Node(link), EventKind::Click)?;
    assert!(!event.default_prevented);
    page.assert_class("#l1", "active", true)?;
    page.assert_class("#l3", "active", false)?;
    assert!(page.take_scroll_requests().is_empty());
    Ok(())
}

#[test]
fn scroll_spy_picks_last_overlapping_section() -> Result<()> {
    let mut page = Page::from_html(NAV_HTML)?;
    page.set_layout_box("#section1", 0, 1000)?;
    page.set_layout_box("#section2", 300, 400)?;

    page.scroll_to(200)?;
    page.assert_class("#l2", "active", true)?;
    page.assert_class("#l1", "active", false)?;

    page.scroll_to(700)?;
    page.assert_class("#l1", "active", true)?;
    page.assert_class("#l2", "active", false)?;
    Ok(())
}

#[test]
fn scroll_spy_without_match_leaves_links() -> Result<()> {
    let mut page = Page::from_html(NAV_HTML)?;
    page.set_layout_box("#section1", 0, 100)?;
    page.set_layout_box("#section2", 100, 100)?;
    page.scroll_to(4000)?;
    page.assert_class("#l1", "active", true)?;
    assert_eq!(page.count(".nav-link.active")?, 1);
    Ok(())
}

#[test]
fn report_renders_date_and_prints() -> Result<()> {
    let config = PageConfig::default().with_today(today());
    let mut page = Page::from_html_with_config(REPORT_HTML, config)?;
    page.assert_text("#reportDate", "2026年10月19日")?;
    assert_eq!(page.print_count(), 0);
    page.click(".print-btn")?;
    page.click(".print-btn")?;
    assert_eq!(page.print_count(), 2);
    Ok(())
}

#[test]
fn controllers_wire_only_for_present_roots() -> Result<()> {
    let page = Page::from_html(REPORT_HTML)?;
    assert_eq!(page.form_state(), None);
    let handlers = page
        .subscriptions()
        .into_iter()
        .map(|sub| sub.handler)
        .collect::<Vec<_>>();
    assert_eq!(handlers, vec!["print-report"]);
    Ok(())
}

#[test]
fn unsubscribed_handler_stops_running() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    let name_sub = page
        .subscriptions()
        .into_iter()
        .find(|sub| sub.event == EventKind::Change && sub.target == "input#name")
        .expect("name change subscription");
    assert!(page.unsubscribe(name_sub.id));
    assert!(!page.unsubscribe(name_sub.id));

    page.fill("#name", "李梅")?;
    page.assert_attr("#progressBar", "aria-valuenow", "0")?;
    page.fill("#hobby", "绘画")?;
    page.assert_attr("#progressBar", "aria-valuenow", "67")?;
    Ok(())
}

#[test]
fn subscriptions_are_listed_in_subscription_order() -> Result<()> {
    let page = Page::from_html(&format!("{FORM_HTML}{NAV_HTML}"))?;
    let subs = page.subscriptions();
    assert!(subs.windows(2).all(|pair| pair[0].id < pair[1].id));
    let handlers = subs.iter().map(|sub| sub.handler).collect::<Vec<_>>();
    assert_eq!(
        handlers,
        vec![
            "update-progress",
            "update-progress",
            "update-progress",
            "submit-assessment",
            "activate-nav-link",
            "activate-nav-link",
            "activate-nav-link",
            "scroll-spy",
        ]
    );
    assert_eq!(subs.last().map(|sub| sub.target.as_str()), Some("window"));
    Ok(())
}

#[test]
fn missing_progress_bar_and_overlay_are_skipped_with_warning() -> Result<()> {
    let html = r#"<form id="assessmentForm"><input id="name" name="name" required></form>"#;
    let mut page = Page::from_html(html)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_fetch_mock("/submit", r#"{"success": false}"#);

    page.fill("#name", "李梅")?;
    assert_eq!(page.update_progress()?, 100);
    page.submit("#assessmentForm")?;
    page.flush()?;

    let logs = page.take_trace_logs();
    assert!(
        logs.iter().any(|line| line.contains("progress bar: #progressBar not found")),
        "{logs:?}"
    );
    assert!(
        logs.iter().any(|line| line.contains("loading overlay: #loadingOverlay not found")),
        "{logs:?}"
    );
    assert_eq!(page.take_alert_messages(), vec![SUBMIT_FAILED_MESSAGE.to_string()]);
    Ok(())
}

#[test]
fn trace_records_events_and_fetches() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_fetch_mock("/submit", r#"{"success": false}"#);
    fill_all(&mut page)?;
    page.click("#send")?;
    page.flush()?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[event] change")));
    assert!(logs.iter().any(|line| line.starts_with("[fetch] POST /submit queued")));
    assert!(logs.iter().any(|line| line.starts_with("[fetch] settled status=200")));

    page.set_trace_network(false);
    page.click("#send")?;
    page.flush()?;
    let logs = page.take_trace_logs();
    assert!(!logs.iter().any(|line| line.starts_with("[fetch]")));
    Ok(())
}

#[test]
fn input_actions_reject_wrong_targets() -> Result<()> {
    let mut page = Page::from_html(FORM_HTML)?;
    assert!(matches!(
        page.type_text("#grade", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        page.submit("#name"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        page.select_option("#grade", "高三"),
        Err(Error::Runtime(_))
    ));
    assert!(matches!(
        page.click("#missing"),
        Err(Error::SelectorNotFound(_))
    ));
    assert!(matches!(
        page.dispatch("#name", "keydown"),
        Err(Error::Runtime(_))
    ));
    Ok(())
}

#[test]
fn mock_window_follows_redirect_to_report() -> Result<()> {
    let mut win = MockWindow::new();
    win.set_today(today());
    win.open_page("https://school.example/assessment", FORM_HTML)?;
    win.set_mock_page("/report/42", REPORT_HTML);
    win.set_fetch_mock("/submit", r#"{"success": true, "redirect": "/report/42"}"#)?;

    win.fill("#name", "李梅")?;
    win.select_option("#grade", "高一")?;
    win.click("#send")?;
    win.flush()?;

    assert_eq!(win.page_count(), 2);
    assert_eq!(win.current_url()?, "https://school.example/report/42");
    win.assert_text("#reportDate", "2026年10月19日")?;
    win.click(".print-btn")?;
    assert_eq!(win.current_page()?.print_count(), 1);
    Ok(())
}
