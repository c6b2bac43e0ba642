use flow_recorder::element::element_model::{ElementDescriptor, TestAttr};
use flow_recorder::locator::generator::{generate, ranked_locators};
use flow_recorder::locator::locator_model::{Locator, Strategy};
use flow_recorder::locator::ranker::rank;
use flow_recorder::locator::scoring::ScoringConfig;

// =========================================================================
// Helpers
// =========================================================================

fn email_input() -> ElementDescriptor {
    let mut el = ElementDescriptor::for_tag("input");
    el.type_attr = Some("text".into());
    el.id = Some("ng-x93fa1".into());
    el.name = Some("email".into());
    el.placeholder = Some("you@example.com".into());
    el.label = Some("Email".into());
    el.css_path = "form > div:nth-of-type(1) > input".into();
    el.xpath = "/html/body/div[1]/form/div[1]/input[1]".into();
    el
}

fn submit_button() -> ElementDescriptor {
    let mut el = ElementDescriptor::for_tag("button");
    el.type_attr = Some("submit".into());
    el.id = Some("submit-btn".into());
    el.text = Some("Sign in".into());
    el.classes = vec!["btn".into(), "btn-primary".into(), "css-1a2b3c".into()];
    el.css_path = "form > button".into();
    el.xpath = "/html/body/div[1]/form/button[1]".into();
    el
}

fn find(locators: &[Locator], strategy: Strategy) -> Option<&Locator> {
    locators.iter().find(|l| l.strategy == strategy)
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn dynamic_id_is_excluded_from_identifier_family() {
    let config = ScoringConfig::default();
    let locators = generate(&email_input(), &config);

    // name survives, the Angular-hashed id does not appear at all
    let name = find(&locators, Strategy::Name).expect("name locator");
    assert_eq!(name.value, "email");
    assert!(find(&locators, Strategy::Id).is_none());
    assert!(locators.iter().all(|l| l.value != "ng-x93fa1"));
}

#[test]
fn stable_id_is_generated() {
    let config = ScoringConfig::default();
    let locators = generate(&submit_button(), &config);
    assert_eq!(find(&locators, Strategy::Id).map(|l| l.value.as_str()), Some("submit-btn"));
}

#[test]
fn test_attribute_becomes_attribute_selector() {
    let config = ScoringConfig::default();
    let mut el = email_input();
    el.test_attr = Some(TestAttr {
        name: "data-testid".into(),
        value: "login-email".into(),
    });

    let locators = generate(&el, &config);
    let attr = find(&locators, Strategy::TestAttribute).expect("test attribute locator");
    assert_eq!(attr.value, "[data-testid='login-email']");
}

#[test]
fn composed_selector_drops_dynamic_classes() {
    let config = ScoringConfig::default();
    let locators = generate(&submit_button(), &config);

    let css = find(&locators, Strategy::Css).expect("composed css locator");
    assert_eq!(css.value, "button.btn.btn-primary[type='submit']");
}

#[test]
fn role_composes_with_aria_label() {
    let config = ScoringConfig::default();
    let mut el = ElementDescriptor::for_tag("div");
    el.role = Some("button".into());
    el.aria_label = Some("Close".into());

    let locators = generate(&el, &config);
    let role = find(&locators, Strategy::Role).expect("role locator");
    assert_eq!(role.value, "button[name='Close']");
}

#[test]
fn indexed_text_emitted_for_duplicate_text() {
    let config = ScoringConfig::default();
    let mut el = ElementDescriptor::for_tag("button");
    el.text = Some("Add to Cart".into());
    el.text_matches = 3;
    el.text_index = Some(2);

    let locators = generate(&el, &config);
    assert!(find(&locators, Strategy::ContentText).is_some());
    let indexed = find(&locators, Strategy::IndexedText).expect("indexed text locator");
    assert_eq!(indexed.value, "Add to Cart[2]");
}

#[test]
fn unique_text_has_no_indexed_variant() {
    let config = ScoringConfig::default();
    let mut el = ElementDescriptor::for_tag("a");
    el.text = Some("Terms of Service".into());
    el.href = Some("/terms".into());

    let locators = generate(&el, &config);
    assert!(find(&locators, Strategy::ContentText).is_some());
    assert!(find(&locators, Strategy::IndexedText).is_none());
}

// =========================================================================
// Ranking
// =========================================================================

#[test]
fn confidence_is_non_increasing() {
    let config = ScoringConfig::default();
    let locators = ranked_locators(&submit_button(), &config);

    assert!(locators.len() >= 4);
    for pair in locators.windows(2) {
        assert!(
            pair[0].confidence >= pair[1].confidence,
            "ranked list must be sorted descending: {:?}",
            locators
        );
    }
}

#[test]
fn stable_id_outranks_structural_strategies() {
    let config = ScoringConfig::default();
    let locators = ranked_locators(&submit_button(), &config);
    assert_eq!(locators[0].strategy, Strategy::Id);
}

#[test]
fn bare_tag_selector_is_depressed() {
    let config = ScoringConfig::default();
    let ranked = rank(
        vec![
            Locator::new(Strategy::Css, "button"),
            Locator::new(Strategy::Css, "button.btn-primary"),
        ],
        &config,
    );

    let bare = ranked.iter().find(|l| l.value == "button").unwrap();
    let classed = ranked.iter().find(|l| l.value == "button.btn-primary").unwrap();
    assert!(bare.confidence < classed.confidence);
    assert!(bare.confidence < 0.4);
}

#[test]
fn long_values_are_penalized() {
    let config = ScoringConfig::default();
    let long_value = format!("div.wrapper > {}", "section.content > ".repeat(8));
    assert!(long_value.len() > 100);

    let ranked = rank(
        vec![
            Locator::new(Strategy::CssPath, long_value.clone()),
            Locator::new(Strategy::CssPath, "form > input"),
        ],
        &config,
    );

    let long = ranked.iter().find(|l| l.value == long_value).unwrap();
    let short = ranked.iter().find(|l| l.value == "form > input").unwrap();
    assert!(long.confidence < short.confidence);
}

#[test]
fn dynamic_value_outside_identifier_family_loses_stability() {
    let config = ScoringConfig::default();
    let ranked = rank(
        vec![
            Locator::new(Strategy::Css, "div.widget-8f3a9c1d2e4b"),
            Locator::new(Strategy::Css, "div.widget"),
        ],
        &config,
    );

    let hashed = ranked.iter().find(|l| l.value.contains("8f3a9c1d2e4b")).unwrap();
    let plain = ranked.iter().find(|l| l.value == "div.widget").unwrap();
    assert!(hashed.confidence < plain.confidence);
}

#[test]
fn ranking_is_deterministic() {
    let config = ScoringConfig::default();
    let first = ranked_locators(&email_input(), &config);
    let second = ranked_locators(&email_input(), &config);
    assert_eq!(first, second);
}

#[test]
fn confidence_stays_in_unit_interval() {
    let config = ScoringConfig::default();
    for locator in ranked_locators(&submit_button(), &config) {
        assert!((0.0..=1.0).contains(&locator.confidence), "{:?}", locator);
    }
}

// =========================================================================
// Dynamic-value filter
// =========================================================================

#[test]
fn dynamic_filter_catches_framework_values() {
    let config = ScoringConfig::default();
    for value in [
        "ng-x93fa1",
        "ember472",
        "react-select-3-input",
        ":r1a:",
        "css-1x2y3z",
        "sc-bdfBwQ",
        "item-1699999999",
        "a1b2c3d4e5f6a7b8",
    ] {
        assert!(config.is_dynamic(value), "expected dynamic: {}", value);
    }
}

#[test]
fn dynamic_filter_passes_stable_values() {
    let config = ScoringConfig::default();
    for value in ["email", "submit-btn", "login-form", "Add to Cart", "nav-main"] {
        assert!(!config.is_dynamic(value), "expected stable: {}", value);
    }
}
