use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use std::cell::Cell;
use std::sync::mpsc;
use std::thread;
use taskdeck_core::{
    FetchError, FetchResult, HttpPostSource, LoadState, PostSource, RemoteItem, RemoteListViewer,
};
use tokio::net::TcpListener;
use url::Url;

struct StaticSource {
    items: Vec<RemoteItem>,
    calls: Cell<usize>,
}

impl StaticSource {
    fn with_posts(count: i64) -> Self {
        Self {
            items: (1..=count)
                .map(|id| RemoteItem::new(id, format!("post {id}"), format!("body {id}")))
                .collect(),
            calls: Cell::new(0),
        }
    }
}

impl PostSource for StaticSource {
    fn fetch_posts(&self) -> FetchResult<Vec<RemoteItem>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.items.clone())
    }
}

struct FailingSource;

impl PostSource for FailingSource {
    fn fetch_posts(&self) -> FetchResult<Vec<RemoteItem>> {
        Err(FetchError::Decode("expected array".to_string()))
    }
}

fn ids(items: &[&RemoteItem]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}

#[test]
fn viewer_starts_loading() {
    let viewer = RemoteListViewer::new();
    assert!(viewer.is_loading());
    assert!(viewer.items().is_empty());
    assert_eq!(viewer.total_pages(), 0);
    assert_eq!(viewer.current_page(), 1);
}

#[test]
fn twenty_five_posts_paginate_into_three_pages() {
    let source = StaticSource::with_posts(25);
    let mut viewer = RemoteListViewer::new();
    viewer.load(&source);

    assert_eq!(viewer.total_pages(), 3);
    assert_eq!(ids(&viewer.page_items()), (1..=10).collect::<Vec<_>>());

    assert_eq!(viewer.prev_page(), 1);
    assert!(!viewer.has_prev_page());

    viewer.next_page();
    assert_eq!(viewer.next_page(), 3);
    assert_eq!(viewer.page_items().len(), 5);
    assert_eq!(viewer.page_label(), "Page 3 of 3");

    assert_eq!(viewer.next_page(), 3);
    assert!(!viewer.has_next_page());
    assert_eq!(ids(&viewer.page_items()), (21..=25).collect::<Vec<_>>());
}

#[test]
fn go_to_page_is_clamped() {
    let source = StaticSource::with_posts(25);
    let mut viewer = RemoteListViewer::new();
    viewer.load(&source);

    assert_eq!(viewer.go_to_page(99), 3);
    assert_eq!(viewer.go_to_page(0), 1);
}

#[test]
fn search_is_case_insensitive_over_title_and_body() {
    let source = StaticSource {
        items: vec![
            RemoteItem::new(1, "Alpha", "x"),
            RemoteItem::new(2, "Beta", "alpha inside"),
        ],
        calls: Cell::new(0),
    };
    let mut viewer = RemoteListViewer::new();
    viewer.load(&source);

    viewer.set_query("alpha");
    assert_eq!(ids(&viewer.matches()), vec![1, 2]);
    assert_eq!(viewer.summary_label(), "Found 2 posts");

    viewer.set_query("INSIDE");
    assert_eq!(ids(&viewer.matches()), vec![2]);
    assert_eq!(viewer.summary_label(), "Found 1 post");
}

#[test]
fn query_change_resets_to_first_page() {
    let source = StaticSource::with_posts(25);
    let mut viewer = RemoteListViewer::new();
    viewer.load(&source);
    viewer.go_to_page(3);

    viewer.set_query("post 2");
    assert_eq!(viewer.current_page(), 1);
    // "post 2" and "post 20".."post 25"
    assert_eq!(viewer.match_count(), 7);
    assert_eq!(viewer.total_pages(), 1);

    viewer.set_query("no such post");
    assert_eq!(viewer.total_pages(), 0);
    assert!(viewer.page_items().is_empty());
    assert_eq!(viewer.next_page(), 1);
    assert_eq!(viewer.page_label(), "Page 1 of 1");
}

#[test]
fn failed_fetch_exposes_message_and_reload_recovers() {
    let mut viewer = RemoteListViewer::new();
    viewer.load(&FailingSource);
    assert_eq!(
        viewer.error(),
        Some("unexpected response payload: expected array")
    );
    assert!(viewer.items().is_empty());

    let source = StaticSource::with_posts(3);
    viewer.set_query("post");
    let state = viewer.reload(&source);
    assert!(matches!(state, LoadState::Ready(items) if items.len() == 3));
    assert_eq!(viewer.query(), "");
    assert_eq!(viewer.error(), None);
    assert_eq!(source.calls.get(), 1);
}

/// Serves one canned `/posts` response from a background tokio runtime.
///
/// The blocking reqwest client must not run inside a runtime, so the server
/// owns its own thread.
fn spawn_posts_server(status: StatusCode, body: &'static str) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let (addr_tx, addr_rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build server runtime");
        runtime.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            addr_tx
                .send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            let app = Router::new().route(
                "/posts",
                get(move || async move {
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }),
            );
            let _ = axum::serve(listener, app).await;
        });
    });
    let addr = addr_rx.recv().expect("server addr");
    Url::parse(&format!("http://{addr}/posts")).expect("server url")
}

#[test]
fn http_source_decodes_posts_and_ignores_extra_fields() {
    let url = spawn_posts_server(
        StatusCode::OK,
        r#"[{"userId":1,"id":1,"title":"first","body":"one"},{"userId":1,"id":2,"title":"second","body":"two"}]"#,
    );
    let source = HttpPostSource::new(url).unwrap();

    let posts = source.fetch_posts().unwrap();
    assert_eq!(posts, vec![RemoteItem::new(1, "first", "one"), RemoteItem::new(2, "second", "two")]);
}

#[test]
fn http_source_reports_non_success_status() {
    let url = spawn_posts_server(StatusCode::SERVICE_UNAVAILABLE, "{}");
    let source = HttpPostSource::new(url).unwrap();

    let err = source.fetch_posts().unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert!(err.to_string().contains("503"));
}

#[test]
fn http_source_reports_malformed_payload() {
    let url = spawn_posts_server(StatusCode::OK, r#"{"posts": []}"#);
    let source = HttpPostSource::new(url).unwrap();

    let mut viewer = RemoteListViewer::new();
    viewer.load(&source);
    assert!(viewer
        .error()
        .unwrap()
        .starts_with("unexpected response payload"));
}
