use assessment_page::{
    Error, FormState, Page, PageConfig, ScrollBehavior, ScrollRequest, SubmissionPayload,
    SubmitFailure, SubmitResponse,
};

#[test]
fn duplicate_field_names_post_the_last_value() -> assessment_page::Result<()> {
    let html = r#"
    <form id="assessmentForm">
      <input id="p1a" name="p1" value="16-17岁">
      <input id="p1b" name="p1" value="18-19岁">
      <input id="anon" value="无名">
    </form>
    "#;

    let mut page = Page::from_html(html)?;
    page.set_fetch_mock("/submit", r#"{"success": false}"#);
    page.submit("#assessmentForm")?;

    let calls = page.take_fetch_calls();
    assert_eq!(calls.len(), 1);
    let payload = SubmissionPayload::from_json(&calls[0].body)?;
    assert_eq!(payload.len(), 2);
    assert_eq!(payload.get("p1"), Some("18-19岁"));
    assert_eq!(payload.get(""), Some("无名"));
    Ok(())
}

#[test]
fn textarea_and_buttons_are_not_tracked_fields() -> assessment_page::Result<()> {
    let html = r#"
    <form id="assessmentForm">
      <input id="a" name="a">
      <textarea id="notes" name="notes"></textarea>
      <button id="send">提交</button>
    </form>
    <div id="progressBar"></div>
    "#;

    let mut page = Page::from_html(html)?;
    page.fill("#notes", "备注")?;
    page.assert_attr("#progressBar", "aria-valuenow", "<absent>")?;
    page.fill("#a", "x")?;
    page.assert_attr("#progressBar", "aria-valuenow", "100")?;

    let payload = page.submission_payload()?;
    assert_eq!(payload.iter().collect::<Vec<_>>(), vec![("a", "x")]);
    Ok(())
}

#[test]
fn preselected_option_counts_once_progress_runs() -> assessment_page::Result<()> {
    let html = r#"
    <form id="assessmentForm">
      <select id="s" name="s"><option value="">-</option><option value="b" selected>B</option></select>
      <input id="t" name="t">
    </form>
    <div id="progressBar" style="width: 0%;"></div>
    "#;

    let mut page = Page::from_html(html)?;
    page.assert_value("#s", "b")?;
    page.assert_style("#progressBar", "width", "0%")?;
    assert_eq!(page.update_progress()?, 50);
    page.assert_style("#progressBar", "width", "50%")?;
    Ok(())
}

#[test]
fn empty_form_reports_zero_progress() -> assessment_page::Result<()> {
    let html = r#"<form id="assessmentForm"></form><div id="progressBar"></div>"#;
    let mut page = Page::from_html(html)?;
    assert_eq!(page.update_progress()?, 0);
    page.assert_style("#progressBar", "width", "0%")?;
    assert!(page.validate_form()?);
    Ok(())
}

#[test]
fn redirect_resolves_against_document_url() -> assessment_page::Result<()> {
    let html = r#"<form id="assessmentForm"><input id="n" name="n" value="1"></form>"#;
    let mut page = Page::from_html_with_url("https://school.example/assessment/start", html)?;
    page.set_fetch_mock("/submit", r#"{"success": true, "redirect": "result?id=9"}"#);
    page.submit("#assessmentForm")?;
    page.flush()?;

    assert_eq!(
        page.current_url(),
        "https://school.example/assessment/result?id=9"
    );
    let navigations = page.take_location_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].from, "https://school.example/assessment/start");
    Ok(())
}

#[test]
fn flush_stops_at_task_step_limit() -> assessment_page::Result<()> {
    let html = r#"<form id="assessmentForm"><input id="n" name="n" value="1"></form>"#;
    let config = PageConfig {
        task_step_limit: 1,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(html, config)?;
    page.set_fetch_mock("/submit", r#"{"success": false}"#);
    page.submit("#assessmentForm")?;
    page.submit("#assessmentForm")?;

    match page.flush() {
        Err(Error::Runtime(message)) => {
            assert!(
                message.contains("task step limit"),
                "unexpected runtime error message: {message}"
            );
        }
        other => panic!("expected flush to hit the step limit, got: {other:?}"),
    }
    assert_eq!(page.pending_task_count(), 1);
    assert!(page.run_next_task()?);
    assert!(!page.run_next_task()?);
    assert_eq!(page.take_alert_messages().len(), 2);
    Ok(())
}

#[test]
fn zero_task_step_limit_is_rejected() {
    let config = PageConfig {
        task_step_limit: 0,
        ..PageConfig::default()
    };
    assert!(matches!(
        Page::from_html_with_config("<p></p>", config),
        Err(Error::Runtime(_))
    ));
}

#[test]
fn nav_scroll_clamps_at_top_of_page() -> assessment_page::Result<()> {
    let html = r##"
    <a id="top" class="nav-link" href="#intro">intro</a>
    <section id="intro" class="section-card">intro</section>
    "##;
    let mut page = Page::from_html(html)?;
    page.set_layout_box("#intro", 40, 500)?;
    page.click("#top")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest::Window {
            top: 0,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    page.flush()?;
    page.assert_class("#top", "active", true)?;
    Ok(())
}

#[test]
fn trace_log_limit_rejects_zero() -> assessment_page::Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    assert!(page.set_trace_log_limit(0).is_err());
    page.set_trace_log_limit(1)?;
    Ok(())
}

#[test]
fn failure_state_carries_transport_detail() -> assessment_page::Result<()> {
    let html = r#"<form id="assessmentForm"><input name="n" value="1"></form>"#;
    let mut page = Page::from_html(html)?;
    page.set_fetch_failure("/submit", "timeout");
    page.submit("#assessmentForm")?;
    assert_eq!(page.form_state(), Some(&FormState::Submitting));
    page.flush()?;
    assert_eq!(
        page.form_state(),
        Some(&FormState::Failed(SubmitFailure::Transport("timeout".into())))
    );
    Ok(())
}

#[test]
fn response_decoding_is_public() -> assessment_page::Result<()> {
    let accepted = SubmitResponse::from_body(r#"{"success": "yes", "redirect": "/r"}"#)?;
    assert_eq!(accepted.redirect_target(), Some("/r"));
    let rejected = SubmitResponse::from_body(r#"{"success": true, "redirect": 42}"#)?;
    assert_eq!(rejected.redirect_target(), None);
    Ok(())
}

#[test]
fn error_messages_name_the_failure() {
    assert_eq!(
        Error::SelectorNotFound("#x".into()).to_string(),
        "selector not found: #x"
    );
    assert_eq!(
        Error::Payload("bad".into()).to_string(),
        "payload error: bad"
    );
}

const CONSENT_HTML: &str = r#"
<form id="assessmentForm">
  <input id="n" name="n" required>
  <input id="agree" type="checkbox" name="agree" required>
  <input id="pick" type="radio" name="pick" value="b">
  <button id="send">提交</button>
</form>
<div id="progressBar"></div>
<div id="loadingOverlay" style="display: none;"></div>
"#;

#[test]
fn checkbox_without_value_reads_on_and_passes_required() -> assessment_page::Result<()> {
    let mut page = Page::from_html(CONSENT_HTML)?;
    page.assert_value("#agree", "on")?;
    page.fill("#n", "x")?;
    page.assert_attr("#progressBar", "aria-valuenow", "100")?;

    page.set_fetch_mock("/submit", r#"{"success": false}"#);
    page.click("#send")?;
    assert_eq!(page.count(".invalid-feedback")?, 0);
    assert_eq!(page.form_state(), Some(&FormState::Submitting));

    let calls = page.take_fetch_calls();
    assert_eq!(calls.len(), 1);
    let payload = SubmissionPayload::from_json(&calls[0].body)?;
    assert_eq!(payload.get("agree"), Some("on"));
    assert_eq!(payload.get("pick"), Some("b"));
    Ok(())
}

#[test]
fn set_checked_flips_state_and_keeps_value() -> assessment_page::Result<()> {
    let mut page = Page::from_html(CONSENT_HTML)?;
    page.assert_checked("#agree", false)?;
    page.set_checked("#agree", true)?;
    page.assert_checked("#agree", true)?;
    page.assert_value("#agree", "on")?;
    page.assert_attr("#progressBar", "aria-valuenow", "67")?;

    page.set_checked("#pick", true)?;
    page.assert_checked("#pick", true)?;
    page.set_checked("#agree", false)?;
    page.assert_checked("#agree", false)?;

    let err = page
        .set_checked("#n", true)
        .expect_err("text inputs cannot be checked");
    match err {
        Error::TypeMismatch { expected, actual, .. } => {
            assert_eq!(expected, "input[type=checkbox|radio]");
            assert_eq!(actual, "input[type=text]");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn progress_rounds_like_math_round() -> assessment_page::Result<()> {
    let mut html = String::from(r#"<form id="assessmentForm">"#);
    for index in 0..40 {
        html.push_str(&format!(r#"<input id="f{index}" name="f{index}">"#));
    }
    html.push_str(r#"</form><div id="progressBar"></div>"#);

    let mut page = Page::from_html(&html)?;
    for index in 0..23 {
        page.fill(&format!("#f{index}"), "x")?;
    }
    page.assert_attr("#progressBar", "aria-valuenow", "57")?;
    page.assert_style("#progressBar", "width", "57%")?;
    Ok(())
}

#[test]
fn byte_order_mark_alone_counts_as_empty() -> assessment_page::Result<()> {
    let mut page = Page::from_html(CONSENT_HTML)?;
    page.fill("#n", "\u{FEFF}")?;
    page.assert_attr("#progressBar", "aria-valuenow", "67")?;
    assert!(!page.validate_form()?);
    page.assert_class("#n", "is-invalid", true)?;
    page.assert_class("#agree", "is-invalid", false)?;
    Ok(())
}
