//! Browser tests, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use pagewire::dom::Platform;
use pagewire::{Application, Element};
use pagewire_web::BrowserPlatform;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(platform: &BrowserPlatform, id: &str) -> Element {
    let el = platform.create_element("div");
    el.set_attribute("id", id);
    platform.body().append(&el);
    el
}

#[wasm_bindgen_test]
fn test_nodes_round_trip_through_document() {
    let platform = BrowserPlatform::new().unwrap();
    let root = mount(&platform, "nodes");
    let child = platform.create_element("p");
    child.set_text("hello").add_class("greeting");
    root.append(&child);

    let found = platform.query_selector(".greeting").unwrap();
    assert_eq!(found.text(), "hello");
    assert_eq!(found.tag_name(), "p");
    assert!(found.parent().unwrap().id().as_deref() == Some("nodes"));

    child.remove();
    assert!(platform.query_selector(".greeting").is_none());
}

#[wasm_bindgen_test]
fn test_style_blocks_are_replaced() {
    let platform = BrowserPlatform::new().unwrap();
    platform.inject_style("pagewire-test-style", "body { color: red; }");
    platform.inject_style("pagewire-test-style", "body { color: blue; }");

    let style = platform.query_selector("#pagewire-test-style").unwrap();
    assert_eq!(style.text(), "body { color: blue; }");
}

#[wasm_bindgen_test]
fn test_application_renders_into_mount() {
    let platform = BrowserPlatform::new().unwrap();
    let root = mount(&platform, "app");
    let app = Application::new(platform.clone(), "#app").unwrap();
    app.render_text("rendered");
    assert_eq!(root.text(), "rendered");
}
