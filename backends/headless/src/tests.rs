use std::{cell::RefCell, rc::Rc};

use elementa_core::{
    ComponentBase, CustomEvent, DEFAULT_TEMPLATE, Definition, Element, ElementConfig,
    ElementError, FetchError, Host, MountState, Render, RenderRoot, ShadowMode, TemplateOrigin,
    TemplateSource, define, resolve_template,
};
use futures::{FutureExt, executor::block_on};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{HeadlessDocument, HeadlessHost, HeadlessRegistry, HeadlessRoot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CardData {
    title: String,
}

#[derive(Debug, Default)]
struct UserCard {
    renders: Vec<Option<CardData>>,
}

impl Element for UserCard {
    const TAG: &'static str = "user-card";
    type Data = CardData;
}

impl Render<HeadlessHost> for UserCard {
    fn render(
        &mut self,
        data: Option<&CardData>,
        root: &mut HeadlessRoot,
    ) -> Result<(), ElementError> {
        self.renders.push(data.cloned());
        if let Some(data) = data {
            root.set_text(".title", &data.title)?;
        }
        Ok(())
    }
}

fn card_with(
    document: &HeadlessDocument,
    source: TemplateSource,
) -> ComponentBase<UserCard, HeadlessHost> {
    ComponentBase::with_config(
        UserCard::default(),
        document.create_host(UserCard::TAG),
        ElementConfig::new().template(source),
    )
    .unwrap()
}

fn default_html() -> String {
    crate::dom::to_html(&crate::markup::parse_fragment(DEFAULT_TEMPLATE))
}

#[test]
fn every_template_origin_is_injected() {
    let document = HeadlessDocument::new();
    document.add_template("card-template", r#"<section class="title"></section>"#);
    document.serve("/parts/card.html", r#"<div class="title"></div>"#);

    let cases = [
        (
            TemplateSource::inline(r#"<p class="title"></p>"#),
            r#"<p class="title"></p>"#.to_string(),
        ),
        (
            TemplateSource::by_id("card-template"),
            r#"<section class="title"></section>"#.to_string(),
        ),
        (
            TemplateSource::by_url("/parts/card.html"),
            r#"<div class="title"></div>"#.to_string(),
        ),
        (TemplateSource::Default, default_html()),
    ];

    for (source, expected) in cases {
        let mut card = card_with(&document, source.clone());
        block_on(card.connected_callback()).unwrap();
        assert_eq!(card.root().inner_html(), expected, "{source:?}");

        card.disconnected_callback();
        block_on(card.connected_callback()).unwrap();
        assert_eq!(card.root().inner_html(), expected, "remount of {source:?}");
    }
}

#[test]
fn styled_templates_are_injected_as_a_browser_parses_them() {
    let document = HeadlessDocument::new();
    document.add_template(
        "styled-card",
        "<style>.title > b { color: red }</style><p class=title>a<p>b",
    );
    let mut card = card_with(&document, TemplateSource::by_id("styled-card"));
    block_on(card.connected_callback()).unwrap();

    assert_eq!(
        card.root().inner_html(),
        r#"<style>.title > b { color: red }</style><p class="title">a</p><p>b</p>"#
    );

    card.set_data(CardData {
        title: "Hello".into(),
    })
    .unwrap();
    assert_eq!(card.root().query_all("p").unwrap().len(), 2);
    assert_eq!(card.root().query(".title").unwrap().unwrap().text_content(), "Hello");
    assert_eq!(
        card.root().text_content(),
        ".title > b { color: red }Hellob"
    );
}

#[test]
fn broken_sources_fall_back_to_default_block() {
    let document = HeadlessDocument::new();
    document.add_element("not-a-template", "div", "<p>wrong</p>");
    document.fail("/offline.html", "connection refused");
    document.serve_status("/broken.html", 500);

    for source in [
        TemplateSource::by_id("missing"),
        TemplateSource::by_id("not-a-template"),
        TemplateSource::by_url("/offline.html"),
        TemplateSource::by_url("/broken.html"),
        TemplateSource::by_url("/never-registered.html"),
    ] {
        let mut card = card_with(&document, source.clone());
        block_on(card.connected_callback()).unwrap();
        assert_eq!(card.state(), MountState::Rendered, "{source:?}");
        assert_eq!(card.root().inner_html(), default_html(), "{source:?}");
    }
}

#[test]
fn resolution_reports_the_origin() {
    let document = HeadlessDocument::new();
    document.serve_status("/broken.html", 503);
    let host = document.create_host("user-card");

    let resolved = block_on(resolve_template(&host, &TemplateSource::by_url("/broken.html")));
    assert_eq!(resolved.unwrap().origin(), TemplateOrigin::Default);

    let resolved = block_on(resolve_template(&host, &TemplateSource::inline("<b></b>")));
    assert_eq!(resolved.unwrap().origin(), TemplateOrigin::Inline);
}

#[test]
fn templates_are_fetched_on_every_mount() {
    let document = HeadlessDocument::new();
    document.serve("/parts/card.html", "<div></div>");
    let mut card = card_with(&document, TemplateSource::by_url("/parts/card.html"));

    block_on(card.connected_callback()).unwrap();
    card.disconnected_callback();
    block_on(card.connected_callback()).unwrap();

    assert_eq!(document.requests(), ["/parts/card.html", "/parts/card.html"]);
}

#[test]
fn card_scenario_renders_fetched_template() {
    let document = HeadlessDocument::new();
    document.serve("/parts/card.html", r#"<div class="title"></div>"#);
    let mut card = card_with(&document, TemplateSource::by_url("/parts/card.html"));

    block_on(card.connected_callback()).unwrap();
    card.set_data(CardData {
        title: "Hello".into(),
    })
    .unwrap();

    let title = card.root().query(".title").unwrap().unwrap();
    assert_eq!(title.text_content(), "Hello");
    assert_eq!(card.root().inner_html(), r#"<div class="title">Hello</div>"#);
}

#[test]
fn each_write_renders_exactly_once() {
    let document = HeadlessDocument::new();
    let mut card = card_with(&document, TemplateSource::inline(r#"<h1 class="title"></h1>"#));
    block_on(card.connected_callback()).unwrap();

    let first = CardData { title: "a".into() };
    let second = CardData { title: "b".into() };
    card.set_data(first.clone()).unwrap();
    card.set_data(first.clone()).unwrap();
    card.set_data(second.clone()).unwrap();

    assert_eq!(
        card.element().renders,
        [None, Some(first.clone()), Some(first), Some(second.clone())]
    );
    assert_eq!(card.data(), Some(&second));
    assert_eq!(card.root().text_content(), "b");
}

#[test]
fn render_before_mount_reports_the_tag() {
    let document = HeadlessDocument::new();
    let mut card = card_with(&document, TemplateSource::Default);
    let error = card.render().unwrap_err();
    assert!(matches!(error, ElementError::NotMounted { tag: "user-card" }));
    assert!(error.to_string().contains("user-card"));
}

#[test]
fn fetch_completing_after_unmount_is_ignored() {
    let document = HeadlessDocument::new();
    let responder = document.defer("/slow.html");
    let mut card = card_with(&document, TemplateSource::by_url("/slow.html"));

    let ticket = card.begin_mount();
    let host = card.host().clone();
    let source = card.source().clone();
    let mut pending = Box::pin(resolve_template(&host, &source));
    assert!(pending.as_mut().now_or_never().is_none());

    card.disconnected_callback();
    responder.send(Ok("<p>late</p>".into())).unwrap();
    let resolved = block_on(pending).unwrap();
    assert_eq!(resolved.origin(), TemplateOrigin::ByUrl);

    assert!(!card.finish_mount(ticket, resolved).unwrap());
    assert!(card.root().is_empty());
    assert!(card.element().renders.is_empty());
    assert_eq!(card.state(), MountState::Disconnected);
}

#[test]
fn dropped_deferred_request_falls_back() {
    let document = HeadlessDocument::new();
    drop(document.defer("/slow.html"));
    let host = document.create_host("user-card");
    assert_eq!(
        block_on(host.document().fetch("/slow.html")),
        Err(FetchError::Transport("request was dropped".into()))
    );
}

#[test]
fn shadow_root_is_attached_once_per_host() {
    let document = HeadlessDocument::new();
    let host = document.create_host("user-card");
    let card = ComponentBase::new(UserCard::default(), host.clone()).unwrap();
    assert_eq!(card.root().shadow_mode(), Some(ShadowMode::Open));

    let again = ComponentBase::new(UserCard::default(), host);
    assert!(matches!(again, Err(ElementError::Dom(_))));
}

#[test]
fn light_dom_rendering() {
    let document = HeadlessDocument::new();
    let card = ComponentBase::with_config(
        UserCard::default(),
        document.create_host("user-card"),
        ElementConfig::new().use_shadow(false),
    )
    .unwrap();
    assert!(!card.uses_shadow());
    assert_eq!(card.root().shadow_mode(), None);
}

#[test]
fn double_registration_keeps_first_definition() {
    let registry = HeadlessRegistry::new();
    assert_eq!(
        define::<UserCard, _>(&registry, ()).unwrap(),
        Definition::Defined
    );
    assert_eq!(
        define::<UserCard, _>(&registry, ()).unwrap(),
        Definition::AlreadyDefined
    );
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("user-card").unwrap().tag(), "user-card");
}

#[test]
fn emitted_events_reach_listeners_outside_the_shadow_tree() {
    let document = HeadlessDocument::new();
    let seen: Rc<RefCell<Vec<(String, Value)>>> = Rc::default();
    document.add_event_listener("card-selected", {
        let seen = Rc::clone(&seen);
        move |event| {
            seen.borrow_mut()
                .push((event.name().to_string(), event.detail().clone()));
        }
    });

    let card = ComponentBase::new(
        UserCard::default(),
        document.create_nested_host("user-card"),
    )
    .unwrap();
    let payload = CardData {
        title: "Hello".into(),
    };
    assert!(card.emit("card-selected", &payload).unwrap());
    assert!(card.emit("other-event", 1).unwrap());

    assert_eq!(
        &*seen.borrow(),
        &[("card-selected".to_string(), json!({ "title": "Hello" }))]
    );
}

#[test]
fn non_composed_events_stop_at_the_shadow_boundary() {
    let document = HeadlessDocument::new();
    let outside = Rc::new(RefCell::new(0));
    let on_host = Rc::new(RefCell::new(0));
    document.add_event_listener("ping", {
        let outside = Rc::clone(&outside);
        move |_| *outside.borrow_mut() += 1
    });

    let host = document.create_nested_host("user-card");
    host.add_event_listener("ping", {
        let on_host = Rc::clone(&on_host);
        move |_| *on_host.borrow_mut() += 1
    });

    host.dispatch_event(&CustomEvent::local("ping", ()).unwrap())
        .unwrap();
    assert_eq!((*outside.borrow(), *on_host.borrow()), (0, 1));

    host.dispatch_event(&CustomEvent::new("ping", ()).unwrap())
        .unwrap();
    assert_eq!((*outside.borrow(), *on_host.borrow()), (1, 2));
}

#[test]
fn render_root_updates_matching_elements() {
    let document = HeadlessDocument::new();
    let mut card = card_with(
        &document,
        TemplateSource::inline(r#"<ul><li class="item">a</li><li class="item">b</li></ul>"#),
    );
    block_on(card.connected_callback()).unwrap();

    let mut root = card.root().clone();
    assert_eq!(root.set_attribute(".item", "data-state", "done").unwrap(), 2);
    assert_eq!(root.set_text("li", "x").unwrap(), 2);
    assert_eq!(
        root.inner_html(),
        r#"<ul><li class="item" data-state="done">x</li><li class="item" data-state="done">x</li></ul>"#
    );
    assert_eq!(root.set_text("ul > li:first-child", "first").unwrap(), 1);
    assert!(root.set_text("li[", "x").is_err());

    root.set_inner_html("<p>plain</p>").unwrap();
    assert_eq!(root.query_all("p").unwrap().len(), 1);
}
