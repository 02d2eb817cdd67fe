//! Integration tests for the ESummary fetcher using mocked HTTP responses

mod common;

use common::{create_test_client, esummary_json};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_fetch_summaries_batches_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "111,222"))
        .and(query_param("retmode", "json"))
        .and(query_param("tool", "test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(&["111", "222"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result = client.fetch_summaries(&["111", "222"]).await.unwrap();

    assert_eq!(result.records.len(), 2);

    let first = &result.records[0];
    assert_eq!(first.pmid, "111");
    assert_eq!(first.title.as_deref(), Some("Summary title 111"));
    assert_eq!(first.journal.as_deref(), Some("Journal 111"));
    assert_eq!(first.pubdate.as_deref(), Some("2020 Feb"));
    assert_eq!(first.authors, vec!["Author 111"]);
    assert_eq!(first.doi, "doi: 10.1000/111");
}

#[tokio::test]
async fn test_fetch_summaries_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(&["1", "2"])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let first = client.fetch_summaries(&["1", "2"]).await.unwrap();
    let second = client.fetch_summaries(&["1", "2"]).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_fetch_summaries_journal_fallback_and_author_filter() {
    let mock_server = MockServer::start().await;

    let body = r#"{"result": {"uids": ["9"], "9": {
        "uid": "9",
        "title": "Fallback",
        "source": "Lancet",
        "authors": [{"authtype": "CollectiveName", "clusterid": ""}, {"name": "Doe J", "authtype": "Author"}]
    }}}"#;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result = client.fetch_summaries(&["9"]).await.unwrap();

    assert_eq!(result.records[0].journal.as_deref(), Some("Lancet"));
    assert_eq!(result.records[0].authors, vec!["Doe J"]);
    assert_eq!(result.records[0].doi, "");
}

#[tokio::test]
async fn test_fetch_summaries_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let err = client.fetch_summaries(&["1"]).await.unwrap_err();

    assert!(err.is_upstream_failure());
}
