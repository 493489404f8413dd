//! Tests for the client module

use super::*;
use crate::auth::Credentials;
use crate::config::RateLimitConfig;
use crate::error::Error;
use crate::http::ResponseBody;
use crate::pagination::{PaginationConfig, Pager};
use crate::types::JsonValue;
use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use test_case::test_case;

// ============================================================================
// Mock adapter
// ============================================================================

/// Adapter that records every request and replays queued responses.
///
/// Once the queue is empty it answers `{}`.
#[derive(Default)]
struct MockAdapter {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<crate::Result<HttpResponse>>>,
}

impl MockAdapter {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn respond(&self, body: JsonValue) {
        self.responses.lock().push_back(Ok(HttpResponse::json(body)));
    }

    fn fail(&self, error: Error) {
        self.responses.lock().push_back(Err(error));
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockAdapter {
    async fn send(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::json(json!({}))))
    }
}

fn config() -> ClientConfig {
    ClientConfig::builder()
        .endpoint("https://api.example.com/v1")
        .build()
}

fn client(config: ClientConfig) -> (ApiClient, Arc<MockAdapter>) {
    let adapter = MockAdapter::new();
    let client = ApiClient::with_adapter(config, adapter.clone()).unwrap();
    (client, adapter)
}

fn options(value: JsonValue) -> RequestOptions {
    value.as_object().cloned().unwrap_or_default()
}

/// Pager serving a fixed number of numbered pages
struct FixedPages {
    pages: u32,
    page: u32,
}

impl Pager for FixedPages {
    fn more_pages(&self) -> bool {
        self.page <= self.pages
    }

    fn next_page(&mut self, _body: &JsonValue) {
        self.page += 1;
    }

    fn page_options(&self) -> RequestOptions {
        options(json!({"page": self.page}))
    }
}

fn fixed_pages(pages: u32) -> PaginationConfig {
    PaginationConfig::custom(move |_| -> Box<dyn Pager> { Box::new(FixedPages { pages, page: 1 }) })
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_missing_endpoint_fails_before_io() {
    let (client, adapter) = client(ClientConfig::default());

    let err = client.get("users", &RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "endpoint"));
    assert!(err.is_configuration());
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_blank_endpoint_is_missing() {
    let (client, adapter) = client(ClientConfig::builder().endpoint("  ").build());

    let err = client.post("users", &RequestOptions::new()).await.unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_default_headers() {
    let config = ClientConfig::builder()
        .endpoint("https://api.example.com/v1")
        .user_agent("wrapper/2.0")
        .access_token("tok123")
        .client("my-id", "my-secret")
        .header("X-Tenant", "acme")
        .build();
    let (client, adapter) = client(config);

    client.get("users", &RequestOptions::new()).await.unwrap();

    let request = &adapter.requests()[0];
    assert_eq!(request.header("accept"), Some("application/json; charset=utf-8"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("user-agent"), Some("wrapper/2.0"));
    assert_eq!(request.header("authorization"), Some("Bearer tok123"));
    assert_eq!(request.header("client-id"), Some("my-id"));
    assert_eq!(request.header("client-secret"), Some("my-secret"));
    assert_eq!(request.header("x-tenant"), Some("acme"));
}

#[tokio::test]
async fn test_get_options_become_query() {
    let (client, adapter) = client(config());

    client
        .get("search", &options(json!({"q": "rust lang", "tags": ["a", "b"]})))
        .await
        .unwrap();

    let request = &adapter.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url.as_str(),
        "https://api.example.com/v1/search?q=rust+lang&tags%5B%5D=a&tags%5B%5D=b"
    );
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_path_query_kept_and_extended() {
    let (client, adapter) = client(config());

    client
        .delete("items/a b?force=true", &options(json!({"reason": "dup"})))
        .await
        .unwrap();

    assert_eq!(
        adapter.requests()[0].url.as_str(),
        "https://api.example.com/v1/items/a%20b?force=true&reason=dup"
    );
}

#[test_case(Method::POST, "json", json!({"name": "x"}), Some(r#"{"name":"x"}"#); "post json")]
#[test_case(Method::PUT, "json", json!({"name": "x", "n": 1}), Some(r#"{"name":"x","n":1}"#); "put json")]
#[test_case(Method::POST, "xml", json!({"name": "a b"}), Some("name=a+b"); "post form")]
#[test_case(Method::POST, "json", json!({}), None; "post empty options")]
#[test_case(Method::GET, "json", json!({"name": "x"}), None; "get never has body")]
#[test_case(Method::DELETE, "json", json!({"name": "x"}), None; "delete never has body")]
fn test_body_policy(method: Method, format: &str, opts: JsonValue, expected: Option<&str>) {
    let config = ClientConfig::builder()
        .endpoint("https://api.example.com")
        .format(format)
        .build();
    let (client, _) = client(config);

    let request = client
        .build_request(method, "items", &options(opts), None)
        .unwrap();

    assert_eq!(request.body.as_deref(), expected);
    assert_eq!(
        request.header("content-type"),
        Some(format!("application/{format}").as_str())
    );
}

#[test]
fn test_hook_body_and_content_type_kept() {
    let (client, _) = client(config());
    let hook: &RequestHook<'_> = &|request: &mut HttpRequest| {
        request.body = Some("raw=payload".to_string());
        request
            .set_header("Content-Type", "application/x-www-form-urlencoded")
            .unwrap();
    };

    let request = client
        .build_request(Method::POST, "upload", &RequestOptions::new(), Some(hook))
        .unwrap();

    assert_eq!(request.body.as_deref(), Some("raw=payload"));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[test]
fn test_hook_sees_url_and_default_headers() {
    let (client, _) = client(config());
    let seen = Mutex::new(None);
    let hook: &RequestHook<'_> = &|request: &mut HttpRequest| {
        *seen.lock() = Some((
            request.url.to_string(),
            request.header("accept").map(str::to_string),
            request.header("content-type").map(str::to_string),
        ));
    };

    client
        .build_request(Method::GET, "users", &options(json!({"page": 2})), Some(hook))
        .unwrap();

    let (url, accept, content_type) = seen.lock().clone().unwrap();
    assert_eq!(url, "https://api.example.com/v1/users?page=2");
    assert_eq!(accept.as_deref(), Some("application/json; charset=utf-8"));
    assert!(content_type.is_none());
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let (client, adapter) = client(config());
    adapter.fail(Error::http_status(500, "boom"));

    let err = client.get("users", &RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

// ============================================================================
// Projection
// ============================================================================

#[tokio::test]
async fn test_get_defaults_to_data() {
    let (client, adapter) = client(config());
    adapter.respond(json!({"id": 7, "name": "Ada"}));

    let reply = client.get("users/7", &RequestOptions::new()).await.unwrap();

    let user = reply.into_data().unwrap().into_entity().unwrap();
    assert_eq!(user.get_str("name"), Some("Ada"));
}

#[tokio::test]
async fn test_post_defaults_to_raw() {
    let (client, adapter) = client(config());
    adapter.respond(json!({"id": 8}));

    let reply = client
        .post("users", &options(json!({"name": "Bob"})))
        .await
        .unwrap();

    let response = reply.into_raw().unwrap();
    assert_eq!(response.body.as_json(), Some(&json!({"id": 8})));
}

#[tokio::test]
async fn test_raw_override() {
    let (client, adapter) = client(config());
    adapter.respond(json!({"id": 1}));
    adapter.respond(json!({"id": 2}));

    let get = client
        .call(Method::GET, "users/1", &RequestOptions::new(), Call::new().raw(true))
        .await
        .unwrap();
    assert!(get.is_raw());

    let put = client
        .call(Method::PUT, "users/2", &RequestOptions::new(), Call::new().raw(false))
        .await
        .unwrap();
    assert_eq!(put.data().and_then(|d| d.as_entity()).and_then(|e| e.get_i64("id")), Some(2));
}

#[tokio::test]
async fn test_list_response_wraps_items() {
    let (client, adapter) = client(config());
    adapter.respond(json!([{"id": 1}, {"id": 2}]));

    let reply = client.get("users", &RequestOptions::new()).await.unwrap();

    let users = reply.into_data().unwrap().into_list().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|user| user.as_entity().is_some()));
}

#[tokio::test]
async fn test_empty_body_is_no_data() {
    let (client, adapter) = client(config());
    adapter
        .responses
        .lock()
        .push_back(Ok(HttpResponse::new(204, ResponseBody::Empty)));

    let reply = client.delete("users/1", &RequestOptions::new()).await.unwrap();
    assert!(!reply.is_raw());
    assert!(reply.data().is_none());
}

// ============================================================================
// Paged requests
// ============================================================================

#[tokio::test]
async fn test_paged_requires_json() {
    let config = ClientConfig::builder()
        .endpoint("https://api.example.com")
        .format("xml")
        .build();
    let (client, adapter) = client(config);

    let err = client
        .get_paged("items", &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedFormat { ref format } if format == "xml"));
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_paged_single_page_by_default() {
    let (client, adapter) = client(config());
    adapter.respond(json!([{"id": 1}, {"id": 2}]));

    let items = client
        .get_paged("items", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(adapter.calls(), 1);
}

#[tokio::test]
async fn test_paged_concatenates_pages_in_order() {
    let mut config = config();
    config.pagination = fixed_pages(3);
    let (client, adapter) = client(config);
    adapter.respond(json!([{"id": "a"}, {"id": "b"}]));
    adapter.respond(json!([{"id": "c"}]));
    adapter.respond(json!([{"id": "d"}]));

    let items = client
        .get_paged("items", &options(json!({"sort": "id"})))
        .await
        .unwrap();

    let ids: Vec<&str> = items
        .iter()
        .filter_map(|item| item.as_entity()?.get_str("id"))
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);

    let urls: Vec<String> = adapter
        .requests()
        .iter()
        .map(|request| request.url.to_string())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://api.example.com/v1/items?sort=id&page=1",
            "https://api.example.com/v1/items?sort=id&page=2",
            "https://api.example.com/v1/items?sort=id&page=3",
        ]
    );
}

#[tokio::test]
async fn test_paged_stops_after_empty_page() {
    let mut config = config();
    config.page_size = 2;
    config.pagination = PaginationConfig::Offset {
        offset_param: "offset".into(),
        limit_param: "limit".into(),
        data_path: None,
    };
    let (client, adapter) = client(config);
    adapter.respond(json!([{"id": "a"}, {"id": "b"}]));
    adapter.respond(json!([{"id": "c"}, {"id": "d"}]));
    adapter.respond(json!([]));

    let items = client
        .get_paged("items", &RequestOptions::new())
        .await
        .unwrap();

    let ids: Vec<&str> = items
        .iter()
        .filter_map(|item| item.as_entity()?.get_str("id"))
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(adapter.calls(), 3);
    assert_eq!(
        adapter.requests()[2].url.as_str(),
        "https://api.example.com/v1/items?offset=4&limit=2"
    );
}

#[tokio::test]
async fn test_paged_pager_options_override_caller() {
    let mut config = config();
    config.pagination = fixed_pages(1);
    let (client, adapter) = client(config);

    client
        .get_paged("items", &options(json!({"page": 99, "q": "x"})))
        .await
        .unwrap();

    assert_eq!(
        adapter.requests()[0].url.as_str(),
        "https://api.example.com/v1/items?page=1&q=x"
    );
}

#[tokio::test]
async fn test_paged_appends_non_list_pages() {
    let mut config = config();
    config.pagination = fixed_pages(3);
    let (client, adapter) = client(config);
    adapter.respond(json!({"id": 1}));
    adapter.respond(JsonValue::Null);
    adapter.respond(json!([1, 2]));

    let items = client
        .get_paged("items", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert!(items[0].as_entity().is_some());
    assert_eq!(items[1].as_i64(), Some(1));
    assert_eq!(items[2].as_i64(), Some(2));
}

#[tokio::test]
async fn test_each_page_streams_payloads() {
    let mut config = config();
    config.pagination = fixed_pages(3);
    let (client, adapter) = client(config);
    adapter.respond(json!([{"id": 1}]));
    adapter.respond(JsonValue::Null);
    adapter.respond(json!([{"id": 2}, {"id": 3}]));

    let mut pages = Vec::new();
    client
        .each_page("items", &RequestOptions::new(), None, |page| {
            pages.push(page.len());
            Ok(())
        })
        .await
        .unwrap();

    // The null page is skipped
    assert_eq!(pages, vec![1, 2]);
    assert_eq!(adapter.calls(), 3);
}

#[tokio::test]
async fn test_paged_error_aborts_loop() {
    let mut config = config();
    config.pagination = fixed_pages(5);
    let (client, adapter) = client(config);
    adapter.respond(json!([{"id": 1}]));
    adapter.fail(Error::http_status(503, "unavailable"));

    let mut streamed = 0;
    let err = client
        .each_page("items", &RequestOptions::new(), None, |_| {
            streamed += 1;
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(streamed, 1);
    assert_eq!(adapter.calls(), 2);
}

#[tokio::test]
async fn test_consumer_error_aborts_loop() {
    let mut config = config();
    config.pagination = fixed_pages(5);
    let (client, adapter) = client(config);
    adapter.respond(json!([{"id": 1}]));

    let err = client
        .each_page("items", &RequestOptions::new(), None, |_| {
            Err(anyhow::anyhow!("consumer gave up").into())
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "consumer gave up");
    assert_eq!(adapter.calls(), 1);
}

#[tokio::test]
async fn test_hook_runs_once_per_page() {
    let mut config = config();
    config.pagination = fixed_pages(3);
    let (client, _) = client(config);
    let count = AtomicUsize::new(0);
    let hook: &RequestHook<'_> = &|_: &mut HttpRequest| {
        count.fetch_add(1, Ordering::SeqCst);
    };

    client
        .get_paged_with("items", &RequestOptions::new(), Some(hook))
        .await
        .unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_hook_borrows_caller_state() {
    let (client, adapter) = client(config());
    let request_id = String::from("req-7");
    let runs = AtomicUsize::new(0);
    let hook = |request: &mut HttpRequest| {
        request.set_header("X-Request-Id", &request_id).unwrap();
        runs.fetch_add(1, Ordering::SeqCst);
    };

    client
        .call(
            Method::GET,
            "users/1",
            &RequestOptions::new(),
            Call::new().customize(&hook),
        )
        .await
        .unwrap();
    client
        .get_paged_with("users", &RequestOptions::new(), Some(&hook))
        .await
        .unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(adapter
        .requests()
        .iter()
        .all(|request| request.header("x-request-id") == Some("req-7")));
}

#[tokio::test]
async fn test_paged_with_page_number_envelope() {
    let mut config = config();
    config.page_size = 2;
    config.pagination = PaginationConfig::PageNumber {
        page_param: "page".into(),
        start_page: 1,
        page_size_param: Some("per_page".into()),
        total_pages_path: Some("meta.pages".into()),
        data_path: Some("items".into()),
    };
    let (client, adapter) = client(config);
    adapter.respond(json!({"items": [{"id": 1}, {"id": 2}], "meta": {"pages": 2}}));
    adapter.respond(json!({"items": [{"id": 3}, {"id": 4}], "meta": {"pages": 2}}));

    let items = client
        .get_paged("items", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
    assert_eq!(adapter.calls(), 2);
    assert_eq!(
        adapter.requests()[1].url.as_str(),
        "https://api.example.com/v1/items?page=2&per_page=2"
    );
}

// ============================================================================
// Stages and configuration
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limit_stage_installed() {
    let config = ClientConfig::builder()
        .endpoint("https://api.example.com")
        .rate_limit(2, Duration::from_secs(1))
        .log_requests(true)
        .build();
    let (client, adapter) = client(config);
    let start = tokio::time::Instant::now();

    for _ in 0..5 {
        client.get("ping", &RequestOptions::new()).await.unwrap();
    }

    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(adapter.calls(), 5);
}

#[test]
fn test_unusable_rate_limit_period_fails_construction() {
    let mut config = config();
    config.rate_limit = Some(RateLimitConfig {
        limit: 5,
        period_secs: f64::INFINITY,
    });

    let err = ApiClient::with_adapter(config, MockAdapter::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidConfigValue { ref field, .. } if field == "rate_limit.period_secs"
    ));
}

#[tokio::test]
async fn test_config_mut_between_requests() {
    let (mut client, adapter) = client(config());
    client.get("a", &RequestOptions::new()).await.unwrap();

    client.config_mut().credentials = Credentials::bearer("fresh");
    client.get("b", &RequestOptions::new()).await.unwrap();

    let requests = adapter.requests();
    assert!(requests[0].header("authorization").is_none());
    assert_eq!(requests[1].header("authorization"), Some("Bearer fresh"));
}

#[test]
fn test_client_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
}

// ============================================================================
// Facade
// ============================================================================

struct Users {
    client: ApiClient,
}

impl ApiWrapper for Users {
    fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[tokio::test]
async fn test_wrapper_forwards_to_client() {
    let (client, adapter) = client(config());
    adapter.respond(json!({"id": 1}));
    adapter.respond(json!([{"id": 1}, {"id": 2}]));
    let users = Users { client };

    let one = ApiWrapper::get(&users, "users/1", &RequestOptions::new())
        .await
        .unwrap();
    assert!(one.data().is_some());

    let all = ApiWrapper::get_paged(&users, "users", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    ApiWrapper::delete(&users, "users/1", &RequestOptions::new())
        .await
        .unwrap();
    let methods: Vec<Method> = adapter.requests().iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::GET, Method::DELETE]);
}
