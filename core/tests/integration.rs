//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation shape over real HTTP using ureq as the host. Validates that the
//! core's request building and response parsing agree with the server's
//! JSON, status codes and query handling.

use mock_server::MockState;
use serde_json::json;
use wp_core::{
    ApiError, HttpRequest, HttpResponse, ListQuery, Media, Plugin, PluginCategory, PluginFilter,
    Post, PostFilter, Tag, WordPressClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut builder = agent.get(&req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }
    let mut response = builder.call().expect("HTTP transport error");

    let status = response.status();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        url: req.url,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

fn plugin(id: u64, slug: &str, title: &str, categories: &[u64]) -> serde_json::Value {
    json!({
        "id": id, "slug": slug, "status": "publish",
        "date": "2024-03-01T09:15:00", "modified": "2024-04-02T10:00:00",
        "title": {"rendered": title}, "excerpt": {"rendered": ""},
        "featured_media": 0, "meta": {"version": "1.0"},
        "fv_category": categories
    })
}

fn catalog() -> MockState {
    MockState::new()
        .with(
            "fv_plugin",
            vec![
                plugin(3, "cache-boost", "Cache Boost", &[40]),
                plugin(1, "seo-pack", "SEO Pack", &[41]),
                plugin(7, "twin", "Twin A", &[40]),
                plugin(8, "twin", "Twin B", &[40]),
            ],
        )
        .with(
            "fv_category",
            vec![json!({"id": 40, "name": "Performance", "slug": "performance", "count": 3})],
        )
        .with(
            "posts",
            vec![json!({
                "id": 11, "slug": "launch", "status": "publish",
                "date": "2024-01-01T00:00:00", "modified": "2024-01-01T00:00:00",
                "title": {"rendered": "Launch day"}, "author": 2,
                "categories": [4], "tags": [9]
            })],
        )
        .with("tags", vec![json!({"id": 9, "name": "launch", "slug": "launch"})])
        .with("media", vec![])
}

/// Start the mock server on a random port and return its base URL.
fn start(state: MockState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn recorded(state: &MockState) -> Vec<String> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(state.requests())
}

#[test]
fn list_get_and_slug_lookups() {
    let state = catalog();
    let client = WordPressClient::new(&start(state.clone())).unwrap();

    // list keeps server order
    let req = client.build_list::<Plugin>(&ListQuery::from(&PluginFilter::default()));
    let plugins = client.parse_list::<Plugin>(execute(req)).unwrap();
    let ids: Vec<u64> = plugins.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 1, 7, 8]);

    // get by id returns the exact record
    let req = client.build_get::<Plugin>(1);
    let fetched = client.parse_get::<Plugin>(execute(req)).unwrap();
    assert_eq!(fetched, plugins[1]);

    // unknown id carries the server's status
    let req = client.build_get::<Plugin>(999);
    let err = client.parse_get::<Plugin>(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    assert!(err.url().ends_with("/wp-json/wp/v2/fv_plugin/999"));

    // unique slug
    let req = client.build_get_by_slug::<Plugin>("seo-pack");
    let found = client.parse_get_by_slug::<Plugin>("seo-pack", execute(req)).unwrap();
    assert_eq!(found.id, 1);

    // duplicated slug: first in server order
    let req = client.build_get_by_slug::<Plugin>("twin");
    let twin = client.parse_get_by_slug::<Plugin>("twin", execute(req)).unwrap();
    assert_eq!(twin.id, 7);

    // missing slug
    let req = client.build_get_by_slug::<Plugin>("ghost");
    let err = client.parse_get_by_slug::<Plugin>("ghost", execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref slug, .. } if slug == "ghost"));

    // related entity lookup
    let req = client.build_get::<PluginCategory>(40);
    let category = client.parse_get::<PluginCategory>(execute(req)).unwrap();
    assert_eq!(category.name, "Performance");

    let req = client.build_get::<Media>(5);
    let err = client.parse_get::<Media>(execute(req)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn search_and_taxonomy_filters_reach_the_server() {
    let state = catalog();
    let client = WordPressClient::new(&start(state.clone())).unwrap();

    let filter = PluginFilter {
        search: Some("cache".to_string()),
        category: Some(40),
        ..PluginFilter::default()
    };
    let req = client.build_list::<Plugin>(&ListQuery::from(&filter));
    let plugins = client.parse_list::<Plugin>(execute(req)).unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].slug, "cache-boost");

    let filter = PostFilter {
        search: Some("launch".to_string()),
        author: Some(2),
        tag: Some(9),
        ..PostFilter::default()
    };
    let req = client.build_list::<Post>(&ListQuery::from(&filter));
    let posts = client.parse_list::<Post>(execute(req)).unwrap();
    assert_eq!(posts.len(), 1);

    let seen = recorded(&state);
    assert_eq!(seen.len(), 2);
    assert!(seen[0].contains("search=cache"));
    assert!(seen[0].contains("fv_category=40"));
    assert!(seen[0].contains("per_page=100"));
    assert!(seen[1].contains("search=launch"));
    assert!(seen[1].contains("author=2"));
    assert!(seen[1].contains("tags=9"));
}

#[test]
fn terms_for_a_post() {
    let state = catalog();
    let client = WordPressClient::new(&start(state)).unwrap();

    let req = client.build_list::<Tag>(&ListQuery::for_post(11));
    let tags = client.parse_list::<Tag>(execute(req)).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug, "launch");
}

#[test]
fn server_failure_is_an_http_error() {
    let state = catalog().failing("fv_plugin", 503);
    let client = WordPressClient::new(&start(state)).unwrap();

    let req = client.build_list::<Plugin>(&ListQuery::new());
    let err = client.parse_list::<Plugin>(execute(req)).unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_not_found());
}
