//! Integration tests for the application shell
//!
//! Organized by feature area:
//! - Construction
//! - Routing and rendering
//! - Error views
//! - History events and links
//! - Loader, client and background work
//! - Lifecycle

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use pagewire::dom::{element, MemoryPlatform, Platform};
use pagewire::router::UrlRegistry;
use pagewire::*;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use url::Url;

fn platform_at(location: &str) -> Rc<MemoryPlatform> {
    MemoryPlatform::new(Url::parse(&format!("https://app.test{}", location)).unwrap())
}

fn start(platform: &Rc<MemoryPlatform>, app: &Application) -> Rc<RefCell<Option<i32>>> {
    let code = Rc::new(RefCell::new(None));
    let (runner, c) = (app.clone(), code.clone());
    platform.spawn_local(Box::pin(async move {
        *c.borrow_mut() = runner.run().await.ok();
    }));
    platform.run_until_stalled();
    code
}

/// An app with `/`, `/about` and `/users/:id`, each rendering a heading
fn demo_app(platform: &Rc<MemoryPlatform>) -> Application {
    let app = Application::new(platform.clone(), "").unwrap();
    app.register("Home", "/", |app, _, _| {
        app.render(["home"]);
        Ok(())
    })
    .unwrap();
    app.register("About", "/about", |app, _, _| {
        app.render_html("<h1>About</h1>");
        Ok(())
    })
    .unwrap();
    app.register("User", "/users/:id", |app, vars, _| {
        app.render_text(&format!("user {}", vars.get("id").unwrap_or("?")));
        Ok(())
    })
    .unwrap();
    app
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_empty_selector_mounts_on_body() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    assert!(app.root().ptr_eq(&platform.body()));
}

#[test]
fn test_selector_mounts_on_match() {
    let platform = platform_at("/");
    let mount = element(platform.as_ref(), "main", Some("app"), "");
    platform.body().append(&mount);

    let app = Application::new(platform.clone(), "#app").unwrap();
    assert!(app.root().ptr_eq(&mount));
}

#[test]
fn test_missing_root_fails_fast() {
    let platform = platform_at("/");
    let err = Application::new(platform, "#nope").unwrap_err();
    assert!(matches!(err, AppError::RootNotFound { ref selector } if selector == "#nope"));
}

#[test]
fn test_from_config() {
    let platform = platform_at("/ABOUT");
    let mount = element(platform.as_ref(), "div", Some("root"), "");
    platform.body().append(&mount);
    let config = PagewireConfig::from_toml_str(
        r##"
        [app]
        root_selector = "#root"
        title = "Configured"

        [router]
        case_insensitive = true
        name_to_title = false
        "##,
    )
    .unwrap();

    let app = Application::from_config(platform.clone(), &config).unwrap();
    app.register("About", "/about", |app, _, _| {
        app.render_text("about");
        Ok(())
    })
    .unwrap();
    start(&platform, &app);

    assert_eq!(mount.text(), "about");
    assert_eq!(platform.title(), "Configured");
}

// ============================================================================
// Routing and rendering
// ============================================================================

#[test]
fn test_initial_route_renders_and_sets_title() {
    let platform = platform_at("/users/42");
    let app = demo_app(&platform);
    start(&platform, &app);

    assert_eq!(platform.body().text(), "user 42");
    assert_eq!(platform.title(), "User");
}

#[test]
fn test_trailing_slash_is_skipped_by_default() {
    let platform = platform_at("/about/");
    let app = demo_app(&platform);
    start(&platform, &app);

    assert_eq!(platform.body().text(), "About");
}

#[test]
fn test_navbar_first_and_footer_last() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    app.set_navbar(element(platform.as_ref(), "nav", Some("nav"), "menu"));
    app.set_footer(element(platform.as_ref(), "footer", Some("foot"), "bye"));
    start(&platform, &app);

    let ids = |root: &Element| -> Vec<Option<String>> {
        root.children().iter().map(|c| c.id()).collect()
    };
    let body = platform.body();
    assert_eq!(body.first_child().unwrap().id().as_deref(), Some("nav"));
    assert_eq!(body.last_child().unwrap().id().as_deref(), Some("foot"));
    assert_eq!(body.text(), "menuhomebye");

    let extra = element(platform.as_ref(), "p", Some("extra"), "more");
    app.append_child([extra]);
    assert_eq!(
        ids(&body),
        vec![
            Some("nav".to_string()),
            None,
            Some("extra".to_string()),
            Some("foot".to_string()),
        ]
    );

    app.redirect("/about").unwrap();
    assert_eq!(body.first_child().unwrap().id().as_deref(), Some("nav"));
    assert_eq!(body.last_child().unwrap().id().as_deref(), Some("foot"));
    assert_eq!(body.text(), "menuAboutbye");
}

#[test]
fn test_render_mixed_items() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    let card = Renderable::component(|p: &dyn Platform| element(p, "div", Some("card"), "card"));
    app.render(vec![
        Renderable::from("text "),
        Renderable::from(element(platform.as_ref(), "b", None, "bold ")),
        card,
    ]);

    assert_eq!(platform.body().text(), "text bold card");
    assert!(platform.body().find_by_id("card").is_some());
}

#[test]
fn test_page_change_hooks_wrap_handler() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let platform = platform_at("/users/7");
    let app = Application::new(platform.clone(), "").unwrap();

    let l = log.clone();
    app.register("user", "/users/:id", move |_, _, _| {
        l.borrow_mut().push("handler".to_string());
        Ok(())
    })
    .unwrap();
    let l = log.clone();
    app.on_page_change(move |_, vars, _| {
        l.borrow_mut()
            .push(format!("on_page_change:{}", vars.get("id").unwrap_or("")))
    });
    let l = log.clone();
    app.after_page_change(move |_, _, url| l.borrow_mut().push(format!("after:{}", url.path())));
    let l = log.clone();
    app.before_load(move || l.borrow_mut().push("before_load".to_string()));
    let l = log.clone();
    app.on_router_load(move || l.borrow_mut().push("router_load".to_string()));
    let l = log.clone();
    app.on_load(move || l.borrow_mut().push("on_load".to_string()));
    start(&platform, &app);

    assert_eq!(
        *log.borrow(),
        vec![
            "before_load",
            "on_page_change:7",
            "handler",
            "after:/users/7",
            "router_load",
            "on_load",
        ]
    );
}

#[test]
fn test_style_and_classes_on_root() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    app.set_style("color: red; margin: 0").set_classes("dark wide");

    let body = platform.body();
    assert_eq!(body.style("color").as_deref(), Some("red"));
    assert!(body.has_class("dark"));
    assert!(body.has_class("wide"));
}

#[test]
fn test_data_map() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
    }

    let platform = platform_at("/");
    let app = Application::new(platform, "").unwrap();
    app.set_data("user", serde_json::json!({ "name": "ada" }));

    assert_eq!(
        app.data_as::<User>("user"),
        Some(User {
            name: "ada".to_string()
        })
    );
    assert_eq!(app.data_as::<u32>("user"), None);
    assert!(app.remove_data("user").is_some());
    assert!(app.data("user").is_none());
}

// ============================================================================
// Error views
// ============================================================================

#[test]
fn test_unknown_route_renders_not_found_view() {
    let platform = platform_at("/missing");
    let app = demo_app(&platform);
    app.set_navbar(element(platform.as_ref(), "nav", Some("nav"), ""));
    start(&platform, &app);

    let body = platform.body();
    assert_eq!(body.text(), NOT_FOUND_TEXT);
    assert_eq!(body.first_child().unwrap().id().as_deref(), Some("nav"));
}

#[test]
fn test_handler_error_renders_error_view() {
    let platform = platform_at("/boom");
    let app = Application::new(platform.clone(), "").unwrap();
    app.register("boom", "/boom", |_, _, _| Err(anyhow::anyhow!("kaboom")))
        .unwrap();
    start(&platform, &app);

    let text = platform.body().text();
    assert!(text.starts_with("500"));
    assert!(text.contains("kaboom"));
}

#[test]
fn test_custom_error_view() {
    let platform = platform_at("/missing");
    let app = demo_app(&platform);
    app.on_error(|app, err| {
        app.render_text(&format!("custom: {}", err.is_not_found()));
    });
    start(&platform, &app);

    assert_eq!(platform.body().text(), "custom: true");
}

// ============================================================================
// History events and links
// ============================================================================

#[test]
fn test_redirect_pushes_history() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    start(&platform, &app);

    app.redirect("/users/9").unwrap();
    assert_eq!(platform.location().path(), "/users/9");
    assert_eq!(platform.history().len(), 2);
    assert_eq!(platform.body().text(), "user 9");
}

#[test]
fn test_back_re_resolves_router() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    start(&platform, &app);

    app.redirect("/about").unwrap();
    platform.back();
    assert_eq!(platform.body().text(), "home");
    assert_eq!(platform.title(), "Home");
}

#[test]
fn test_hash_routes_follow_hash_changes() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    app.register("Doc", "#/docs/:page", |app, vars, _| {
        app.render_text(&format!("doc {}", vars.get("page").unwrap_or("")));
        Ok(())
    })
    .unwrap();
    start(&platform, &app);

    platform.set_hash("#/docs/intro");
    assert_eq!(platform.body().text(), "doc intro");
}

#[test]
fn test_follow_link() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    start(&platform, &app);

    assert!(app.follow_link("router:/about"));
    assert_eq!(platform.body().text(), "About");
    assert!(!app.follow_link("https://elsewhere.test/"));
    assert!(app.follow_link("router:/nowhere"));
    assert_eq!(platform.body().text(), NOT_FOUND_TEXT);
}

#[test]
fn test_registry_links_route_on_click() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    start(&platform, &app);

    let mut registry = UrlRegistry::new();
    let link = platform.create_element("a");
    link.set_attribute("href", "/users/3");
    registry.set("Profile", link.clone()).unwrap();
    app.route_links(&registry);

    platform.click(&link);
    assert_eq!(platform.location().path(), "/users/3");
    assert!(platform.body().text().ends_with("user 3"));
}

// ============================================================================
// Loader, client and background work
// ============================================================================

#[test]
fn test_load_shows_loader_until_task_finishes() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    app.load(async move {
        let _ = rx.await;
    });
    platform.run_until_stalled();
    assert_eq!(app.loader().pending(), 1);
    assert!(platform.body().find_by_id(loader::LOADER_ID).is_some());

    tx.send(()).unwrap();
    platform.run_until_stalled();
    assert_eq!(app.loader().pending(), 0);
    assert!(platform.body().find_by_id(loader::LOADER_ID).is_none());
}

#[test]
fn test_footer_stays_last_while_loading() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    app.set_footer("footer");
    app.render_text("content");
    let (tx, rx) = oneshot::channel::<()>();

    app.load(async move {
        let _ = rx.await;
    });
    let root = app.root();
    assert_eq!(root.last_child().unwrap().text(), "footer");
    assert!(root.find_by_id(loader::LOADER_ID).is_some());

    app.render_text("other");
    assert_eq!(root.last_child().unwrap().text(), "footer");
    assert!(root.find_by_id(loader::LOADER_ID).is_some());

    tx.send(()).unwrap();
    platform.run_until_stalled();
    assert!(root.find_by_id(loader::LOADER_ID).is_none());
}

#[test]
fn test_client_wraps_calls_with_loader() {
    let platform = platform_at("/");
    let app = Application::new(platform.clone(), "").unwrap();
    let built = Rc::new(RefCell::new(0));
    let b = built.clone();
    app.set_client_factory(move || {
        *b.borrow_mut() += 1;
        reqwest::Client::new()
    });

    let client = app.client();
    assert_eq!(*built.borrow(), 1);

    let loader = app.loader();
    let pending_inside =
        futures::executor::block_on(client.call(|_| async move { loader.pending() }));
    assert_eq!(pending_inside, 1);
    assert_eq!(app.loader().pending(), 0);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_exit_returns_code_zero_once() {
    let platform = platform_at("/");
    let preloader = element(platform.as_ref(), "div", Some("pagewire-preload-container"), "");
    platform.body().append(&preloader);
    let app = demo_app(&platform);

    let code = start(&platform, &app);
    assert!(preloader.parent().is_none());
    assert_eq!(*code.borrow(), None);

    app.exit().unwrap();
    platform.run_until_stalled();
    assert_eq!(*code.borrow(), Some(0));
    assert!(matches!(app.exit(), Err(AppError::AlreadySignalled)));
}

#[test]
fn test_exit_signal_handle_stops_run() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    let signal = app.exit_signal();

    let code = start(&platform, &app);
    signal.fire().unwrap();
    platform.run_until_stalled();
    assert_eq!(*code.borrow(), Some(0));
    assert!(matches!(app.exit(), Err(AppError::AlreadySignalled)));
}

#[test]
fn test_second_run_is_rejected() {
    let platform = platform_at("/");
    let app = demo_app(&platform);
    start(&platform, &app);

    let second = futures::executor::block_on(app.run());
    assert!(matches!(second, Err(AppError::AlreadyRunning)));
}
