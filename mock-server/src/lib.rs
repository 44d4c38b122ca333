use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Records per resource path (`posts`, `fv_plugin`, ...), in server order.
pub type Db = Arc<HashMap<String, Vec<Value>>>;

/// Default page size WordPress applies when `per_page` is absent.
pub const SERVER_PER_PAGE: usize = 10;

const TERM_FILTERS: &[&str] = &[
    "categories",
    "tags",
    "fv_access_level",
    "fv_category",
    "original_author_tax",
    "fv_tag",
];

/// Seeded content, forced failures and the log of every request URI seen.
#[derive(Clone, Default)]
pub struct MockState {
    db: Db,
    failures: Arc<HashMap<String, u16>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `resource` with `records`, replacing anything already there.
    pub fn with(mut self, resource: &str, records: Vec<Value>) -> Self {
        Arc::make_mut(&mut self.db).insert(resource.to_string(), records);
        self
    }

    /// Make every request for `resource` answer `status`.
    pub fn failing(mut self, resource: &str, status: u16) -> Self {
        Arc::make_mut(&mut self.failures).insert(resource.to_string(), status);
        self
    }

    /// Request URIs (path and query) in arrival order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/wp-json/wp/v2/{resource}", get(list_items))
        .route("/wp-json/wp/v2/{resource}/{id}", get(get_item))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

async fn record_request(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let uri = request.uri().to_string();
    debug!(%uri, "mock request");
    state.requests.write().await.push(uri);
    next.run(request).await
}

async fn list_items(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let records = collection(&state, &resource)?;
    let per_page = match params.get("per_page") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| invalid_param("per_page"))?,
        None => SERVER_PER_PAGE,
    };
    let page = match params.get("page") {
        Some(raw) => raw.parse::<usize>().map_err(|_| invalid_param("page"))?.max(1),
        None => 1,
    };
    let post_terms = match params.get("post") {
        Some(raw) => Some(terms_of_post(&state, &resource, raw)?),
        None => None,
    };

    let matched = records
        .iter()
        .filter(|record| matches_filters(record, &params))
        .filter(|record| match &post_terms {
            Some(ids) => record["id"].as_u64().is_some_and(|id| ids.contains(&id)),
            None => true,
        })
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    Ok(Json(matched))
}

async fn get_item(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, u64)>,
) -> ApiResult<Value> {
    let records = collection(&state, &resource)?;
    records
        .iter()
        .find(|record| record["id"].as_u64() == Some(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            wp_error(
                StatusCode::NOT_FOUND,
                "rest_post_invalid_id",
                "Invalid post ID.",
            )
        })
}

fn collection<'a>(state: &'a MockState, resource: &str) -> Result<&'a Vec<Value>, (StatusCode, Json<Value>)> {
    if let Some(status) = state.failures.get(resource) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(wp_error(status, "mock_failure", "Forced failure."));
    }
    state.db.get(resource).ok_or_else(|| {
        wp_error(
            StatusCode::NOT_FOUND,
            "rest_no_route",
            "No route was found matching the URL and request method.",
        )
    })
}

fn matches_filters(record: &Value, params: &HashMap<String, String>) -> bool {
    if let Some(slug) = params.get("slug") {
        if record["slug"].as_str() != Some(slug.as_str()) {
            return false;
        }
    }
    if let Some(author) = params.get("author") {
        if record["author"].to_string() != *author {
            return false;
        }
    }
    if let Some(search) = params.get("search") {
        if !matches_search(record, search) {
            return false;
        }
    }
    TERM_FILTERS.iter().all(|param| match params.get(*param) {
        Some(raw) => {
            let wanted: Vec<u64> = raw.split(',').filter_map(|id| id.trim().parse().ok()).collect();
            record[*param]
                .as_array()
                .is_some_and(|ids| ids.iter().any(|id| id.as_u64().is_some_and(|id| wanted.contains(&id))))
        }
        None => true,
    })
}

fn matches_search(record: &Value, search: &str) -> bool {
    let needle = search.to_lowercase();
    [
        &record["title"]["rendered"],
        &record["content"]["rendered"],
        &record["excerpt"]["rendered"],
        &record["name"],
    ]
    .iter()
    .filter_map(|field| field.as_str())
    .any(|text| text.to_lowercase().contains(&needle))
}

/// Term ids a post carries for the taxonomy `resource` (`tags` for
/// `/tags?post=1`).
fn terms_of_post(state: &MockState, resource: &str, raw: &str) -> Result<Vec<u64>, (StatusCode, Json<Value>)> {
    let post_id: u64 = raw.parse().map_err(|_| invalid_param("post"))?;
    let post = state
        .db
        .get("posts")
        .and_then(|posts| posts.iter().find(|p| p["id"].as_u64() == Some(post_id)));
    Ok(post
        .and_then(|p| p[resource].as_array())
        .map(|ids| ids.iter().filter_map(Value::as_u64).collect())
        .unwrap_or_default())
}

fn invalid_param(name: &str) -> (StatusCode, Json<Value>) {
    wp_error(
        StatusCode::BAD_REQUEST,
        "rest_invalid_param",
        &format!("Invalid parameter(s): {name}"),
    )
}

fn wp_error(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "code": code,
            "message": message,
            "data": { "status": status.as_u16() },
        })),
    )
}

/// A small catalog for running the server by hand.
pub fn demo_state() -> MockState {
    let post = |id: u64, slug: &str, title: &str, categories: Vec<u64>, tags: Vec<u64>| {
        json!({
            "id": id, "slug": slug, "status": "publish",
            "date": "2024-05-01T08:00:00", "modified": "2024-05-02T08:00:00",
            "title": {"rendered": title},
            "content": {"rendered": format!("<p>{title}</p>")},
            "excerpt": {"rendered": format!("<p>{title}</p>")},
            "author": 1, "featured_media": 10,
            "categories": categories, "tags": tags, "meta": []
        })
    };
    let term = |id: u64, name: &str, slug: &str, taxonomy: &str| {
        json!({"id": id, "name": name, "slug": slug, "taxonomy": taxonomy, "count": 1, "description": "", "parent": 0})
    };
    MockState::new()
        .with(
            "posts",
            vec![
                post(2, "second-post", "Second post", vec![1], vec![5]),
                post(1, "hello-world", "Hello world", vec![1], vec![]),
            ],
        )
        .with(
            "pages",
            vec![json!({
                "id": 20, "slug": "about", "status": "publish",
                "date": "2024-01-01T00:00:00", "modified": "2024-01-01T00:00:00",
                "title": {"rendered": "About"}, "content": {"rendered": "<p>About us</p>"}
            })],
        )
        .with(
            "fv_plugin",
            vec![json!({
                "id": 100, "slug": "seo-pack", "status": "publish",
                "date": "2024-03-01T09:15:00", "modified": "2024-04-02T10:00:00",
                "title": {"rendered": "SEO Pack"},
                "excerpt": {"rendered": "<p>Rank higher</p>"},
                "featured_media": 10,
                "meta": {"version": "2.1.0"},
                "fv_access_level": [30], "fv_category": [40], "original_author_tax": [50], "fv_tag": [60]
            })],
        )
        .with("categories", vec![term(1, "News", "news", "category")])
        .with("tags", vec![term(5, "Release", "release", "post_tag")])
        .with("fv_access_level", vec![term(30, "Gold", "gold", "fv_access_level")])
        .with("fv_category", vec![term(40, "SEO", "seo", "fv_category")])
        .with("original_author_tax", vec![term(50, "Acme", "acme", "original_author_tax")])
        .with("fv_tag", vec![term(60, "Marketing", "marketing", "fv_tag")])
        .with(
            "users",
            vec![json!({"id": 1, "name": "Admin", "slug": "admin", "description": "", "avatar_urls": {}})],
        )
        .with(
            "media",
            vec![json!({
                "id": 10, "slug": "cover", "source_url": "http://localhost/cover.png",
                "mime_type": "image/png", "media_type": "image",
                "media_details": {"width": 1200, "height": 630, "sizes": {}}
            })],
        )
}
