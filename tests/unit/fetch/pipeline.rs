use super::*;
use crate::fetch::cache::MemoryCacheStore;
use crate::fetch::transport::HttpResponse;
use crate::foundation::error::{WdgtError, WdgtResult};
use crate::schema::model::SizeClass;

const HELLO: &[u8] = include_bytes!("../../data/hello_world.json");
const FULL: &[u8] = include_bytes!("../../data/full_widget.json");

type Handler = Box<dyn Fn(&str) -> WdgtResult<HttpResponse> + Send + Sync>;

struct ScriptedTransport {
    handler: Handler,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    fn new(handler: impl Fn(&str) -> WdgtResult<HttpResponse> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> WdgtResult<HttpResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), headers.to_vec()));
        (self.handler)(url)
    }
}

struct BrokenCache;

impl CacheStore for BrokenCache {
    fn get(&self, _id: &str) -> WdgtResult<Option<Vec<u8>>> {
        Err(WdgtError::storage("disk on fire"))
    }
    fn put(&self, _id: &str, _bytes: &[u8]) -> WdgtResult<()> {
        Err(WdgtError::storage("disk on fire"))
    }
    fn delete(&self, _id: &str) -> WdgtResult<()> {
        Err(WdgtError::storage("disk on fire"))
    }
}

fn pipeline(transport: Arc<ScriptedTransport>, cache: Arc<dyn CacheStore>) -> FetchPipeline {
    FetchPipeline::new(transport, cache, PipelineOpts::default())
}

const URL: &str = "https://example.com/widget.json";

#[tokio::test]
async fn ok_response_is_stamped_with_final_url_and_cached() {
    let transport = ScriptedTransport::new(|_| {
        Ok(HttpResponse::ok("https://cdn.example.com/widget.json", HELLO))
    });
    let cache = Arc::new(MemoryCacheStore::new());
    let p = pipeline(transport.clone(), cache.clone());

    let out = p.resolve(&format!("  {URL}\n"), None, None, false, true).await;
    assert_eq!(out.requested_id, URL);
    assert_eq!(out.error_text, "");
    let (w, source) = out.result.as_ref().unwrap();
    assert_eq!(*source, Source::Network);
    assert_eq!(w.id(), "https://cdn.example.com/widget.json");
    assert_eq!(w.name(), "Hello World");

    assert_eq!(transport.calls()[0].0, URL);
    assert_eq!(
        cache.get("https://cdn.example.com/widget.json").unwrap().as_deref(),
        Some(HELLO)
    );
    assert_eq!(cache.get(URL).unwrap(), None);
}

#[tokio::test]
async fn no_caching_when_not_requested_or_undecodable() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let cache = Arc::new(MemoryCacheStore::new());
    let p = pipeline(transport, cache.clone());
    let out = p.resolve(URL, None, None, false, false).await;
    assert!(out.widget().is_some());
    assert!(cache.is_empty());

    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, &b"{\"data\":{}}"[..])));
    let p = pipeline(transport, cache.clone());
    let out = p.resolve(URL, None, None, false, true).await;
    assert!(out.widget().is_none());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn unauthorized_signals_credentials_with_generic_text() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::status(url, 401)));
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));

    let out = p.resolve(URL, Some("ann"), Some("pw"), false, true).await;
    assert!(out.needs_credentials());
    assert_eq!(out.error(), Some(&ResolveError::AuthenticationRequired));
    let (widget, text) = out.into_parts();
    assert!(widget.is_none());
    assert_eq!(text, GENERIC_ERROR);
}

#[tokio::test]
async fn other_statuses_are_generic_http_errors() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::status(url, 503)));
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));
    let out = p.resolve(URL, None, None, false, true).await;
    assert_eq!(out.error(), Some(&ResolveError::HttpError { status: 503 }));
    assert!(!out.needs_credentials());
    assert_eq!(out.error_text, GENERIC_ERROR);
}

#[tokio::test]
async fn transport_failure_is_network_unavailable() {
    let transport = ScriptedTransport::new(|_| Err(WdgtError::transport("offline")));
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));
    let out = p.resolve(URL, None, None, false, true).await;
    assert_eq!(out.error(), Some(&ResolveError::NetworkUnavailable));
    assert_eq!(out.error_text, "Please check URL and try again.");
}

#[tokio::test]
async fn missing_name_reports_field() {
    let transport = ScriptedTransport::new(|url| {
        Ok(HttpResponse::ok(url, &br#"{"data":{},"layouts":{}}"#[..]))
    });
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));
    let out = p.resolve(URL, None, None, false, true).await;
    assert!(out.error_text.contains("name"));
    assert!(out.error_text.starts_with("Malformed widget definition\n\n"));
}

#[tokio::test]
async fn cached_row_short_circuits_the_network() {
    let transport = ScriptedTransport::new(|_| panic!("transport must not be called"));
    let cache = Arc::new(MemoryCacheStore::new());
    cache.put(URL, HELLO).unwrap();
    let p = pipeline(transport.clone(), cache);

    let out = p.resolve(URL, None, None, true, true).await;
    let (w, source) = out.result.unwrap();
    assert_eq!(source, Source::Cache);
    assert_eq!(w.id(), URL);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn cache_is_ignored_without_fallback_flag() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::status(url, 500)));
    let cache = Arc::new(MemoryCacheStore::new());
    cache.put(URL, HELLO).unwrap();
    let p = pipeline(transport.clone(), cache);

    let out = p.resolve(URL, None, None, false, true).await;
    assert!(out.widget().is_none());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn corrupt_or_unreadable_cache_falls_through_to_network() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let cache = Arc::new(MemoryCacheStore::new());
    cache.put(URL, b"not json").unwrap();
    let p = pipeline(transport.clone(), cache.clone());
    let out = p.resolve(URL, None, None, true, true).await;
    assert_eq!(out.result.as_ref().unwrap().1, Source::Network);
    assert_eq!(cache.get(URL).unwrap().as_deref(), Some(HELLO));

    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let p = pipeline(transport.clone(), Arc::new(BrokenCache));
    let out = p.resolve(URL, None, None, true, true).await;
    assert!(out.widget().is_some(), "cache errors must not fail the resolve");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn unrequestable_ids_never_reach_the_transport() {
    let transport = ScriptedTransport::new(|_| panic!("transport must not be called"));
    let p = pipeline(transport.clone(), Arc::new(MemoryCacheStore::new()));
    for id in ["", "   ", "example.com/widget.json", "://nothing"] {
        let out = p.resolve(id, None, None, false, true).await;
        assert_eq!(out.error(), Some(&ResolveError::NetworkUnavailable), "{id:?}");
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn basic_auth_only_with_both_credentials() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let p = pipeline(transport.clone(), Arc::new(MemoryCacheStore::new()));
    p.resolve(URL, Some("ann"), Some("secret"), false, false).await;
    p.resolve(URL, Some("ann"), Some(""), false, false).await;
    p.resolve(URL, None, Some("secret"), false, false).await;

    let calls = transport.calls();
    assert_eq!(
        calls[0].1,
        vec![
            ("Accept".to_owned(), "application/json".to_owned()),
            ("Authorization".to_owned(), "Basic YW5uOnNlY3JldA==".to_owned()),
        ]
    );
    assert_eq!(calls[1].1.len(), 1);
    assert_eq!(calls[2].1.len(), 1);
}

#[tokio::test]
async fn extra_large_layouts_follow_the_capability_flag() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, FULL)));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());

    let p = FetchPipeline::new(transport.clone(), cache.clone(), PipelineOpts::default());
    let w = p.resolve(URL, None, None, false, false).await.into_parts().0.unwrap();
    assert!(w.layouts().values().all(|l| l.size != SizeClass::ExtraLarge));
    assert!(!w.display_order().contains(&"board_xl"));

    let opts = PipelineOpts {
        supports_extra_large: true,
        ..PipelineOpts::default()
    };
    let p = FetchPipeline::new(transport, cache, opts);
    let w = p.resolve(URL, None, None, false, false).await.into_parts().0.unwrap();
    assert!(w.layout("board_xl").is_some());
}

#[tokio::test]
async fn tokens_identify_the_latest_request_per_id() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));

    let first = p.resolve(URL, None, None, false, false).await;
    let other = p.resolve("https://example.com/other.json", None, None, false, false).await;
    let second = p.resolve(URL, None, None, false, false).await;

    assert!(first.token < second.token);
    assert!(!p.is_latest(URL, first.token));
    assert!(p.is_latest(URL, second.token));
    assert!(p.is_latest("https://example.com/other.json", other.token));
}

#[tokio::test]
async fn forgetting_an_id_releases_its_token() {
    let transport = ScriptedTransport::new(|url| Ok(HttpResponse::ok(url, HELLO)));
    let p = pipeline(transport, Arc::new(MemoryCacheStore::new()));

    let a = p.resolve(URL, None, None, false, false).await;
    p.resolve("https://example.com/other.json", None, None, false, false)
        .await;
    p.resolve(URL, None, None, false, false).await;
    assert_eq!(p.tracked_ids(), 2);

    p.forget(&format!(" {URL} "));
    assert_eq!(p.tracked_ids(), 1);
    assert!(!p.is_latest(URL, a.token));

    let b = p.resolve(URL, None, None, false, false).await;
    assert!(p.is_latest(URL, b.token));
    assert_eq!(p.tracked_ids(), 2);
}

#[test]
fn requestable_ids_need_a_scheme() {
    assert!(is_requestable("https://a.b/c"));
    assert!(is_requestable("file:///tmp/x.json"));
    assert!(!is_requestable("a.b/c"));
    assert!(!is_requestable("1http://a"));
    assert!(!is_requestable("https://"));
}
