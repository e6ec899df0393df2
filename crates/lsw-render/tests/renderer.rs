//! Renderer tests against page-shaped documents
//!
//! Untrusted strings, container replacement and the JSON the admin API sends.

use std::time::Duration;

use lsw_render::*;

fn page_with(id: &str) -> (SecureDom, NodeId) {
    let mut doc = Document::new("https://example.com/admin.html");
    let body = doc.body();
    let container = doc.append_element_with_id(body, "div", id).unwrap();
    (SecureDom::new(doc), container)
}

// ============================================================================
// UNTRUSTED TEXT
// ============================================================================

#[test]
fn test_markup_characters_stay_text() {
    let samples = [
        "<script>alert(1)</script>",
        "a & b",
        "\"quoted\" <b>",
        "</div><div onclick=\"x\">",
        "&lt;already escaped&gt;",
        "",
    ];
    let (mut dom, c) = page_with("c");

    for sample in samples {
        dom.set_text(c, Some(sample)).unwrap();
        let children = dom.children(c);
        assert!(children.len() <= 1, "{sample:?} produced {} children", children.len());
        if let Some(child) = children.first() {
            assert!(dom.tree().get(*child).unwrap().is_text());
        }
        assert_eq!(dom.text_content(c), sample);
        assert_eq!(dom.inner_html(c), sanitize_html(sample));
    }
}

#[test]
fn test_attribute_values_never_break_out() {
    let (mut dom, c) = page_with("c");
    let attrs = Attributes::new()
        .class_name("\" onmouseover=\"alert(1)")
        .data("name", "\"><script>")
        .unwrap()
        .attr("title", "it's <fine>")
        .unwrap();
    let node = dom.create_element("span", &attrs, None).unwrap();
    dom.replace_content(c, [node]).unwrap();

    let html = dom.inner_html(c);
    assert!(!html.contains("<script>"));
    assert!(!html.contains("=\"alert"));
    assert_eq!(
        dom.element(node).unwrap().attribute("data-name").as_deref(),
        Some("\"><script>")
    );
}

#[test]
fn test_attribute_names_never_break_out() {
    let hostile = [
        ("data-x\"><script>alert(1)</script><i y", "v"),
        ("title x onerror=alert(2) z", "v"),
    ];
    for (key, value) in hostile {
        assert_eq!(
            Attributes::from_pairs([(key, value)]),
            Err(RenderError::InvalidAttribute(key.to_string()))
        );
    }
    assert!(Attributes::from_pairs(hostile).is_err());
    assert!(Attributes::new().data("x\"><script>alert(1)</script><i y", "v").is_err());
    assert!(Attributes::new().attr("src onerror", "alert(3)").is_err());

    let (mut dom, c) = page_with("c");
    let attrs = Attributes::from_pairs([("data-x", "\"><script>alert(1)</script>"), ("title", "x onerror=alert(2)")]).unwrap();
    let img = dom.create_element("img", &attrs, None).unwrap();
    dom.replace_content(c, [img]).unwrap();

    let html = dom.outer_html(img);
    assert!(!html.contains("<script>"), "{html}");
    assert!(html.contains("title=\"x onerror=alert(2)\""), "{html}");
    assert_eq!(dom.element(img).unwrap().attribute("onerror"), None);
    assert_eq!(dom.children(c), vec![img]);
}

// ============================================================================
// CONTENT REPLACEMENT
// ============================================================================

#[test]
fn test_replace_regardless_of_prior_content() {
    let (mut dom, c) = page_with("c");
    for prior in 0..3 {
        let filler: Vec<String> = (0..prior).map(|i| format!("old {i}")).collect();
        dom.append_content(c, filler).unwrap();

        let a = dom.create_element("p", &Attributes::new(), Some("a")).unwrap();
        let b = dom.create_element("p", &Attributes::new(), Some("b")).unwrap();
        dom.replace_content(c, [a, b]).unwrap();
        assert_eq!(dom.children(c), vec![a, b]);
    }
}

#[test]
fn test_style_map_element() {
    let (mut dom, _) = page_with("c");
    let attrs = Attributes::from_pairs([(
        "style",
        AttrValue::Map(vec![("color".to_string(), "red".to_string())]),
    )])
    .unwrap();
    let div = dom.create_element("div", &attrs, Some("hi")).unwrap();
    assert_eq!(dom.element(div).unwrap().style.get_property_value("color"), Some("red"));
    assert_eq!(dom.text_content(div), "hi");
}

#[test]
fn test_style_text_element() {
    let (mut dom, _) = page_with("c");
    let div = dom
        .create_element("div", &Attributes::new().style_text("font-size: 18px; color: red"), None)
        .unwrap();
    assert_eq!(dom.outer_html(div), "<div style=\"font-size: 18px; color: red;\"></div>");
}

#[test]
fn test_unknown_tags_fail_fast() {
    let (mut dom, _) = page_with("c");
    for tag in ["script", "iframe", "object", "x-widget", "di v"] {
        assert_eq!(
            dom.create_element(tag, &Attributes::new(), None),
            Err(RenderError::InvalidTag(tag.to_string()))
        );
    }
}

// ============================================================================
// TEMPLATES AND TIMERS
// ============================================================================

#[test]
fn test_template_escapes_values_only() {
    let html = create_template("<li class=\"flag\">{{ reason }}</li>", [("reason", "<b>bad</b>")]);
    assert_eq!(html, "<li class=\"flag\">&lt;b&gt;bad&lt;/b&gt;</li>");
}

#[test]
fn test_timer_clamping() {
    assert_eq!(clamp_timeout(-5, DEFAULT_MAX_DELAY_MS), Duration::ZERO);
    assert_eq!(clamp_timeout(999_999, DEFAULT_MAX_DELAY_MS), Duration::from_millis(30_000));
    assert_eq!(clamp_interval(DEFAULT_INTERVAL_MS, DEFAULT_MAX_DELAY_MS), Duration::from_secs(1));
    assert_eq!(clamp_interval(5, DEFAULT_MAX_DELAY_MS), Duration::from_millis(MIN_INTERVAL_MS as u64));
}

// ============================================================================
// API PAYLOADS
// ============================================================================

#[test]
fn test_user_records_from_json() {
    let json = r#"[
        {"ID": 1, "Username": "root", "Email": null, "UserType": "Admin",
         "ParentUsername": null, "CreatedOn": "Fri, 01 Mar 2024 10:00:00 GMT",
         "SubscriptionDaysLeft": null},
        {"ID": 2, "Username": "kid", "UserType": "Student", "ParentUsername": "mum",
         "CreatedOn": "2024-04-02", "SubscriptionDaysLeft": 30}
    ]"#;
    let users: Vec<UserRecord> = serde_json::from_str(json).unwrap();
    assert!(users[0].is_admin());
    assert_eq!(users[0].created_date(), "01 Mar 2024");
    assert_eq!(users[0].subscription_label(), "None");
    assert_eq!(users[1].email, None);
    assert_eq!(users[1].created_date(), "2024-04-02");

    let (mut dom, tbody) = page_with("user-table-body");
    let filter = UserFilter::new("mum", "ParentUsername".parse().unwrap());
    dom.render_user_rows(tbody, filter.apply(&users)).unwrap();
    assert_eq!(dom.children(tbody).len(), 1);
}

#[test]
fn test_open_flags_from_json() {
    let json = r#"[{"ItemType": "Question", "ItemName": null, "FlaggedItemID": 4, "Reason": "typo"}]"#;
    let flags: Vec<OpenFlag> = serde_json::from_str(json).unwrap();
    assert_eq!(flags[0].title(), "Question: ID: 4");
}
