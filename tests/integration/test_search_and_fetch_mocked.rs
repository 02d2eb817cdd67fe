//! Integration tests for the combined search, summary and abstract pipeline
//!
//! Request counts on the mocks stand in for call-count assertions: `expect(0)`
//! proves a leg was never issued.

mod common;

use common::{create_test_client, efetch_article, efetch_xml, esearch_json, esummary_json};
use pubmed_proxy::{PubMedError, SearchParams};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_zero_hits_short_circuits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&[], 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let merged = client
        .search_and_fetch(&SearchParams::new("no such topic"))
        .await
        .unwrap();

    assert_eq!(merged.count, 0);
    assert!(merged.records.is_empty());
    assert_eq!(merged.query, "no such topic");
}

#[tokio::test]
async fn test_in_band_search_error_short_circuits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"esearchresult": {"count": "0", "idlist": [], "ERROR": "Empty term"}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let merged = client
        .search_and_fetch(&SearchParams::new("broken"))
        .await
        .unwrap();

    assert_eq!(merged.count, 0);
    assert!(merged.records.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_merge_by_pmid_in_summary_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["1", "2", "3"], 250)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("id", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(&["1", "2", "3"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Abstracts only for 1 and 3, and in a different order
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&[
            efetch_article("3", "Three", "Abstract three"),
            efetch_article("1", "One", "Abstract one"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let merged = client
        .search_and_fetch(&SearchParams::new("topic").with_retmax(10))
        .await
        .unwrap();

    assert_eq!(merged.count, 250);
    assert_eq!(merged.records.len(), 3);

    let pmids: Vec<&str> = merged
        .records
        .iter()
        .map(|r| r.summary.pmid.as_str())
        .collect();
    assert_eq!(pmids, vec!["1", "2", "3"]);

    assert_eq!(merged.records[0].abstract_text, "Abstract one");
    assert_eq!(merged.records[1].abstract_text, "");
    assert_eq!(merged.records[2].abstract_text, "Abstract three");
    assert_eq!(
        merged.records[1].summary.title.as_deref(),
        Some("Summary title 2")
    );
}

#[tokio::test]
async fn test_record_count_matches_search_ids() {
    let mock_server = MockServer::start().await;
    let ids = ["10", "20", "30", "40"];

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&ids, 4)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(&ids)))
        .mount(&mock_server)
        .await;

    let articles: Vec<String> = ids
        .iter()
        .map(|id| efetch_article(id, "T", "A"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&articles)))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let merged = client
        .search_and_fetch(&SearchParams::new("four"))
        .await
        .unwrap();

    assert_eq!(merged.records.len(), ids.len());
    assert!(merged.records.iter().all(|r| r.abstract_text == "A"));
}

#[tokio::test]
async fn test_search_failure_aborts_before_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let err = client
        .search_and_fetch(&SearchParams::new("down"))
        .await
        .unwrap_err();

    assert!(matches!(err, PubMedError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_abstract_not_found_fails_whole_pipeline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["1"], 1)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(&["1"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<PubmedArticleSet></PubmedArticleSet>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let err = client
        .search_and_fetch(&SearchParams::new("one"))
        .await
        .unwrap_err();

    assert!(matches!(err, PubMedError::AbstractsNotFound { .. }));
}

#[tokio::test]
async fn test_summary_failure_fails_whole_pipeline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["1"], 1)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(efetch_xml(&[efetch_article("1", "T", "A")])),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let err = client
        .search_and_fetch(&SearchParams::new("one"))
        .await
        .unwrap_err();

    assert!(matches!(err, PubMedError::ApiError { status: 404, .. }));
}
