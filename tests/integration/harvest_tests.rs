//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small gallery (listing pages and
//! product pages) and test the full crawl cycle end-to-end.

use gallery_harvest::config::{Config, FailurePolicy};
use gallery_harvest::crawler::{Harvester, HttpFetcher};
use gallery_harvest::output::write_records_json;
use gallery_harvest::progress::{ChannelPublisher, NullPublisher, ProgressEvent};
use gallery_harvest::{FetchError, HarvestError, ProductRecord};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GALLERY_PATH: &str = "/profile/jane";

/// Listing page in the photo-gallery layout
fn listing_page(names: &[&str]) -> String {
    let cards: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<div class="col-sm-4">
                     <a class="gridPhotoGallery__link" href="/artwork/{0}.html?from=gallery" title="{0}">
                       <img src="/thumbs/{0}.jpg">
                     </a>
                   </div>"#,
                name
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Gallery</title></head><body>
           <div class="gallery-area"><div class="container"><div class="hg_section">
             <div class="container"><div class="row">{}</div></div>
           </div></div></div>
           </body></html>"#,
        cards
    )
}

/// Product page with `images` carousel slides, a tag and a description
fn product_page(tag: u32, images: usize) -> String {
    let slides: String = (0..images)
        .map(|i| format!(r#"<li><img src="https://cdn.example.com/{}/small{}.jpg"></li>"#, tag, i))
        .collect();

    format!(
        r#"<html><body>
           <div class="container"><div class="row">
             <ol class="carousel-indicators">{}</ol>
             <div class="fadein2s"><div><div><font>Tag</font> <font>{}</font></div></div></div>
           </div></div>
           <div class="container-full"><div class="container"><div class="row">
             <div class="col"><font>Artist</font></div>
             <div class="col"><font>  Oil on
                 canvas  </font></div>
           </div></div></div>
           </body></html>"#,
        slides, tag
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts one listing page addressed by `?records=<index>`
async fn mount_listing_page(server: &MockServer, index: u32, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .and(query_param("records", index.to_string()))
        .respond_with(html(listing_page(names)))
        .mount(server)
        .await;
}

/// Mounts the bare gallery URL
///
/// Mounted last, it also answers every `?records=N` without a dedicated
/// mock, which is how the site wraps around past its last page.
async fn mount_gallery(server: &MockServer, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .respond_with(html(listing_page(names)))
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, name: &str, tag: u32, images: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/artwork/{}.html", name)))
        .respond_with(html(product_page(tag, images)))
        .mount(server)
        .await;
}

fn http_harvester(config: Config) -> Harvester {
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build HTTP client");
    Harvester::new(config, Arc::new(fetcher), Arc::new(NullPublisher))
}

fn sorted_by_name(mut records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

#[tokio::test]
async fn test_full_gallery_crawl() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 2, &["harbour", "orchard"]).await;
    mount_gallery(&server, &["dune", "meadow"]).await;
    mount_product(&server, "dune", 101, 5).await;
    mount_product(&server, "meadow", 102, 6).await;
    mount_product(&server, "harbour", 103, 5).await;
    mount_product(&server, "orchard", 104, 2).await;

    let harvester = http_harvester(Config::default());
    let outcome = harvester
        .run_crawl(&gallery_url, "job-full")
        .await
        .expect("Crawl failed");

    // Page 3 wraps around to page 1 and is not counted.
    assert_eq!(outcome.pages_iterated, 2);

    let records = sorted_by_name(outcome.records);
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["dune", "harbour", "meadow", "orchard"]);

    let dune = &records[0];
    assert_eq!(dune.tag_id, "#101");
    assert_eq!(dune.link, format!("{}/artwork/dune", server.uri()));
    assert_eq!(dune.images.len(), 5);
    assert_eq!(dune.images[0], "https://cdn.example.com/101/0.jpg");
    assert_eq!(dune.description, "Oil on canvas");

    assert!(harvester.jobs().is_empty());
}

#[tokio::test]
async fn test_wrap_around_on_second_page() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    let names: Vec<String> = (1..=12).map(|i| format!("piece-{}", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    // Page 1 and the wrapped-around page 2, nothing more.
    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .respond_with(html(listing_page(&names)))
        .expect(2)
        .mount(&server)
        .await;

    let harvester = http_harvester(Config::default());
    let pagination = harvester
        .discover_pages(&gallery_url)
        .await
        .expect("Discovery failed");

    assert_eq!(pagination.pages_iterated, 1);
    assert_eq!(pagination.references.len(), 12);
    assert_eq!(pagination.references[0].name, "piece-1");
    assert_eq!(
        pagination.references[0].url,
        format!("{}/artwork/piece-1.html?from=gallery", server.uri())
    );
}

#[tokio::test]
async fn test_missing_listing_page_ends_discovery() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 2, &["b"]).await;
    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .and(query_param("records", "3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_gallery(&server, &["a"]).await;

    let harvester = http_harvester(Config::default());
    let pagination = harvester
        .discover_pages(&gallery_url)
        .await
        .expect("Discovery failed");

    assert_eq!(pagination.pages_iterated, 2);
    let names: Vec<_> = pagination.references.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn test_failed_product_page_fails_crawl() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 2, &[]).await;
    mount_gallery(&server, &["dune", "meadow", "orchard"]).await;
    mount_product(&server, "dune", 101, 5).await;
    mount_product(&server, "orchard", 104, 5).await;
    Mock::given(method("GET"))
        .and(path("/artwork/meadow.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harvester = http_harvester(Config::default());
    let result = harvester.run_crawl(&gallery_url, "job-fail").await;

    match result {
        Err(HarvestError::Fetch(FetchError::Status { url, status })) => {
            assert_eq!(status, 500);
            assert!(url.contains("/artwork/meadow.html"));
        }
        other => panic!("Expected a fetch error, got {:?}", other),
    }
    assert!(harvester.tracker().fetch_job("job-fail").is_none());
}

#[tokio::test]
async fn test_skip_failed_policy_over_http() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 2, &[]).await;
    mount_gallery(&server, &["dune", "gone"]).await;
    mount_product(&server, "dune", 101, 5).await;
    // No mock for /artwork/gone.html, so wiremock answers 404.

    let mut config = Config::default();
    config.crawler.failure_policy = FailurePolicy::SkipFailed;
    let harvester = http_harvester(config);

    let outcome = harvester
        .run_crawl(&gallery_url, "job-skip")
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name, "dune");
}

#[tokio::test]
async fn test_single_listing_page_mode() {
    let server = MockServer::start().await;
    let page_url = format!("{}{}?records=3", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 3, &["lighthouse"]).await;
    mount_product(&server, "lighthouse", 311, 5).await;
    // Discovery must not touch any other listing page.
    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .respond_with(html(listing_page(&["other"])))
        .expect(0)
        .mount(&server)
        .await;

    let harvester = http_harvester(Config::default());
    let outcome = harvester
        .run_crawl(&page_url, "job-single")
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.pages_iterated, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].tag_id, "#311");
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    let mut config = Config::default();
    config.user_agent.crawler_name = "TestHarvest".to_string();
    config.user_agent.crawler_version = "2.1.0".to_string();
    config.user_agent.contact_url = "https://example.com/bot".to_string();

    Mock::given(method("GET"))
        .and(path(GALLERY_PATH))
        .and(header("user-agent", "TestHarvest/2.1.0 (+https://example.com/bot)"))
        .respond_with(html(listing_page(&["a"])))
        .expect(2)
        .mount(&server)
        .await;

    let harvester = http_harvester(config);
    let pagination = harvester
        .discover_pages(&gallery_url)
        .await
        .expect("Discovery failed");

    assert_eq!(pagination.references.len(), 1);
}

#[tokio::test]
async fn test_progress_events_published() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    let names: Vec<String> = (0..10).map(|i| format!("work-{}", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    mount_listing_page(&server, 2, &[]).await;
    mount_gallery(&server, &names).await;
    for (i, name) in names.iter().enumerate() {
        mount_product(&server, name, 500 + i as u32, 5).await;
    }

    let config = Config::default();
    let publisher = ChannelPublisher::new(1024);
    let mut events = publisher.subscribe();
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build HTTP client");
    let harvester = Harvester::new(config, Arc::new(fetcher), Arc::new(publisher));

    let outcome = harvester
        .run_crawl(&gallery_url, "job-events")
        .await
        .expect("Crawl failed");
    assert_eq!(outcome.records.len(), 10);

    let mut progress = Vec::new();
    let mut resolved = 0;
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.job_id(), "job-events");
        match event {
            ProgressEvent::Progress {
                progress: value,
                max_progress,
                ..
            } => {
                assert_eq!(max_progress, 10);
                progress.push(value);
            }
            ProgressEvent::Console { message, .. } => {
                if message.starts_with("Resolved data for:") {
                    resolved += 1;
                }
            }
        }
    }

    assert_eq!(resolved, 10);
    assert_eq!(progress.last(), Some(&10));
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn test_crawl_to_json_file() {
    let server = MockServer::start().await;
    let gallery_url = format!("{}{}", server.uri(), GALLERY_PATH);

    mount_listing_page(&server, 2, &[]).await;
    mount_gallery(&server, &["dune"]).await;
    mount_product(&server, "dune", 101, 3).await;

    let harvester = http_harvester(Config::default());
    let outcome = harvester
        .run_crawl(&gallery_url, "job-json")
        .await
        .expect("Crawl failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("records.json");
    write_records_json(&outcome.records, &output_path).expect("Failed to write records");

    let written = std::fs::read_to_string(&output_path).expect("Failed to read records");
    let json: serde_json::Value = serde_json::from_str(&written).expect("Invalid JSON");
    assert_eq!(json[0]["name"], "dune");
    assert_eq!(json[0]["tagId"], "#101");
    assert_eq!(json[0]["images"].as_array().map(Vec::len), Some(3));
}
