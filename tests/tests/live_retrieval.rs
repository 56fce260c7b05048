use application::context_service::{ContextOptions, ContextService};
use domain::models::{ContextSnippet, Provenance, Query, LOCAL_CONTEXT_LINK};
use domain::provider::LiveSource;
use infrastructure::corpus::JsonFileCorpus;
use infrastructure::wikipedia::{WikipediaClient, WIKIPEDIA_SOURCE};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tests::{news_corpus_json, MockWiki, WikiFixture, WikiPage};

const ARTICLE_URL: &str = "https://en.wikipedia.org/wiki/";

fn wiki_client(server: &MockWiki, timeout: Duration) -> WikipediaClient {
    WikipediaClient::new(server.api_url(), ARTICLE_URL, timeout).unwrap()
}

fn corpus_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(news_corpus_json().as_bytes()).unwrap();
    file
}

fn cat_pages() -> Vec<WikiPage> {
    vec![
        WikiPage::new(6678, "Cat", "The cat is a small domesticated carnivorous mammal."),
        WikiPage::new(220913, "Kitten", "A kitten is a juvenile cat."),
        WikiPage::new(99, "Cat (disambiguation)", "Cat may refer to several things."),
        WikiPage::new(100, "Lion", "The lion is a large cat."),
    ]
}

#[tokio::test]
async fn live_results_are_normalized_in_search_order() {
    let server = MockWiki::start(WikiFixture {
        pages: cat_pages(),
        ..WikiFixture::default()
    })
    .await;
    let wiki = wiki_client(&server, Duration::from_secs(5));

    let articles = wiki.fetch_live("cats", 3).await.unwrap();
    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Cat", "Kitten", "Cat (disambiguation)"]);
    assert_eq!(server.search_requests(), 1);
    assert_eq!(server.extract_requests(), 3);

    let cat = &articles[0];
    assert_eq!(cat.content, "The cat is a small domesticated carnivorous mammal.");
    assert_eq!(cat.url.as_deref(), Some("https://en.wikipedia.org/wiki/Cat"));
    assert_eq!(cat.provenance, Provenance::External);
    assert_eq!(
        cat.source.as_ref().map(|s| s.display_name()),
        Some(WIKIPEDIA_SOURCE)
    );
    assert_eq!(
        articles[2].link(),
        "https://en.wikipedia.org/wiki/Cat_(disambiguation)"
    );
}

#[tokio::test]
async fn failing_extract_is_skipped() {
    let mut pages = cat_pages();
    pages[1] = pages[1].clone().broken();
    pages[2].extract = None;
    let server = MockWiki::start(WikiFixture {
        pages,
        ..WikiFixture::default()
    })
    .await;
    let wiki = wiki_client(&server, Duration::from_secs(5));

    let articles = wiki.fetch_live("cats", 4).await.unwrap();
    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Cat", "Lion"]);
    assert_eq!(server.extract_requests(), 4);
}

#[tokio::test]
async fn no_search_hits_skips_extract_requests() {
    let server = MockWiki::start(WikiFixture::default()).await;
    let wiki = wiki_client(&server, Duration::from_secs(5));

    assert!(wiki.fetch_live("zzzz", 3).await.unwrap().is_empty());
    assert_eq!(server.search_requests(), 1);
    assert_eq!(server.extract_requests(), 0);
}

#[tokio::test]
async fn search_error_status_degrades_to_empty() {
    let server = MockWiki::start(WikiFixture {
        pages: cat_pages(),
        search_status: 503,
        ..WikiFixture::default()
    })
    .await;
    let wiki = wiki_client(&server, Duration::from_secs(5));

    assert!(wiki.fetch_live("cats", 3).await.unwrap().is_empty());
    assert_eq!(server.extract_requests(), 0);
}

#[tokio::test]
async fn slow_upstream_times_out_to_empty() {
    let server = MockWiki::start(WikiFixture {
        pages: cat_pages(),
        delay: Duration::from_secs(3),
        ..WikiFixture::default()
    })
    .await;
    let wiki = wiki_client(&server, Duration::from_millis(200));

    let started = std::time::Instant::now();
    assert!(wiki.fetch_live("cats", 3).await.unwrap().is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn extracts_are_fetched_concurrently() {
    let delay = Duration::from_millis(500);
    let server = MockWiki::start(WikiFixture {
        pages: cat_pages(),
        delay,
        ..WikiFixture::default()
    })
    .await;
    let wiki = wiki_client(&server, Duration::from_secs(10));

    let started = std::time::Instant::now();
    let articles = wiki.fetch_live("cats", 4).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(articles.len(), 4);
    assert_eq!(server.extract_requests(), 4);
    // One search round-trip plus one for all extracts; sequential would take five.
    assert!(elapsed >= delay * 2, "{elapsed:?}");
    assert!(elapsed < delay * 4, "{elapsed:?}");
}

#[tokio::test]
async fn enriched_pipeline_mixes_live_and_local() {
    let long_extract = format!("Cats are small mammals. {}", "Purring is common. ".repeat(20));
    let server = MockWiki::start(WikiFixture {
        pages: vec![
            WikiPage::new(6678, "Cat", &long_extract),
            WikiPage::new(5, "Stock market", "A stock market is where shares are traded."),
        ],
        ..WikiFixture::default()
    })
    .await;
    let file = corpus_file();
    let service = ContextService::new(
        JsonFileCorpus::new(file.path()),
        wiki_client(&server, Duration::from_secs(5)),
        ContextOptions::ENRICHED,
    );

    let snippets = service
        .fetch_context(&Query::new("Cats", "Cats are small mammals kept as pets"))
        .await;

    // 2 live + 3 valid local records, top 5.
    assert_eq!(snippets.len(), 5);
    let scores: Vec<f64> = snippets.iter().map(|s| s.similarity.unwrap()).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]), "{scores:?}");

    let local_cats = snippets
        .iter()
        .find(|s| s.snippet.starts_with("Cats: Cats are small mammals"))
        .unwrap();
    assert_eq!(local_cats.link, LOCAL_CONTEXT_LINK);

    let wiki_cat = snippets
        .iter()
        .find(|s| s.link == "https://en.wikipedia.org/wiki/Cat")
        .unwrap();
    assert!(wiki_cat.snippet.ends_with("..."));
    assert_eq!(wiki_cat.snippet.chars().count(), "Cat: ".len() + 300 + 3);

    assert!(snippets.iter().any(|s| s.link == "Reuters"));
    assert!(snippets.iter().any(|s| s.link == "https://example.org/mars-rover"));
}

#[tokio::test]
async fn missing_corpus_and_dead_wiki_yield_no_context() {
    let server = MockWiki::start(WikiFixture {
        search_status: 500,
        ..WikiFixture::default()
    })
    .await;
    let service = ContextService::new(
        JsonFileCorpus::new("/nonexistent/contextArticle.json"),
        wiki_client(&server, Duration::from_secs(5)),
        ContextOptions::ENRICHED,
    );

    let snippets = service.fetch_context(&Query::new("Cats", "pets")).await;
    assert_eq!(snippets, vec![ContextSnippet::no_context()]);
}

#[tokio::test]
async fn local_variant_reads_corpus_file() {
    let file = corpus_file();
    let service = ContextService::local(JsonFileCorpus::new(file.path()));

    let snippets = service
        .fetch_context(&Query::new("Inflation", "central banks raise interest rates"))
        .await;
    assert_eq!(snippets.len(), 3);
    assert_eq!(
        snippets[0].snippet,
        "Central banks: Central banks raise interest rates to fight inflation"
    );
    assert_eq!(snippets[0].link, "Reuters");
}
