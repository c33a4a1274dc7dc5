//! Integration tests for the ingestion workflow
//!
//! A mockito server stands in for the search index and each test gets its own
//! on-disk store.

mod common;

use common::{doc, select_body, test_config, CapturedLogs};
use icesium::adapters::solr::SolrClient;
use icesium::adapters::sqlite::SqliteStore;
use icesium::core::ingest::{IngestCoordinator, IngestRequest};
use icesium::domain::{GeoHash, IcesiumError, SampleId};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_ingest_dedups_locations_and_rejects_invalid() {
    let logs = CapturedLogs::default();
    let _subscriber = logs.install();

    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);

    let docs = [
        doc("s1", "37.87,-122.27", "2022-03-01T00:00:00Z", "2023-01-01T00:00:00Z"),
        doc("s2", "37.87,-122.27", "2021-07-15T08:30:00.5Z", "2023-01-02T00:00:00Z"),
        doc("bad", "200,10", "2022-01-01T00:00:00Z", "2023-01-03T00:00:00Z"),
    ];
    let mock = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "q".into(),
                "producedBy_samplingSite_location_ll:[* TO *]".into(),
            ),
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("rows".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(select_body(3, &docs))
        .expect(1)
        .create_async()
        .await;

    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();
    let summary = IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.locations_created, 1);
    assert!(summary.watermark.is_initial());

    assert_eq!(store.count_samples().await.unwrap(), 2);
    assert_eq!(store.count_locations().await.unwrap(), 1);
    assert!(store
        .find_sample(&SampleId::new("bad").unwrap())
        .await
        .unwrap()
        .is_none());

    let s2 = store
        .find_sample(&SampleId::new("s2").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(s2.source, 2);
    assert_eq!(s2.year, Some(2021));
    assert_eq!(s2.day, Some(196));
    assert_eq!(s2.vocabs.unpack(), (4, 3, 6));

    let location = store
        .find_location(&GeoHash::encode(-122.27, 37.87).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(location.elevation_missing());

    let warnings = logs.contents();
    assert!(warnings.contains("Document rejected"));
    assert!(warnings.contains("bad"));
    assert!(warnings.contains("200,10"));
}

#[tokio::test]
async fn test_odd_typed_document_skipped_alone() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);

    let mut odd_source = doc("odd", "5.0,6.0", "2022-01-01T00:00:00Z", "2023-01-02T00:00:00Z");
    odd_source["source"] = json!(["SESAR"]);
    odd_source["context"] = json!("Marine biome");
    let docs = [
        doc("valid", "1.0,2.0", "2022-01-01T00:00:00Z", "2023-01-01T00:00:00Z"),
        odd_source,
        json!({"id": 99, "XY": "7.0,8.0"}),
        json!("not a document"),
    ];
    let _mock = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(select_body(docs.len(), &docs))
        .create_async()
        .await;

    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();
    let summary = IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await
        .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.rejected, 2);

    let odd = store
        .find_sample(&SampleId::new("odd").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(odd.source, 0);
    assert_eq!(odd.vocabs.unpack().0, 12);
    assert!(store
        .find_sample(&SampleId::new("valid").unwrap())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_rerun_resumes_from_watermark() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);
    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();

    let first_docs = [
        doc("s1", "10.0,20.0", "2022-01-01T00:00:00Z", "2023-01-01T00:00:00Z"),
        doc("s2", "11.0,21.0", "2022-01-02T00:00:00Z", "2023-02-01T10:11:12.345Z"),
    ];
    let first = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(select_body(2, &first_docs))
        .expect(1)
        .create_async()
        .await;

    IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await
        .unwrap();
    first.assert_async().await;
    first.remove_async().await;

    // the overlapping document is returned again alongside a new one
    let second_docs = [
        doc("s2", "11.0,21.0", "2022-01-02T00:00:00Z", "2023-02-01T10:11:12.345Z"),
        doc("s3", "12.0,22.0", "2022-01-03T00:00:00Z", "2023-03-01T00:00:00Z"),
    ];
    let second = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "fq".into(),
                "indexUpdatedTime:[2023-02-01T10:11:12.345Z TO *]".into(),
            ),
            Matcher::UrlEncoded("sort".into(), "indexUpdatedTime asc".into()),
        ]))
        .with_status(200)
        .with_body(select_body(2, &second_docs))
        .expect(1)
        .create_async()
        .await;

    let summary = IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await
        .unwrap();

    second.assert_async().await;
    assert!(!summary.watermark.is_initial());
    assert_eq!(summary.stored, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(store.count_samples().await.unwrap(), 3);
}

#[tokio::test]
async fn test_paginates_until_num_found() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);

    let all: Vec<_> = (0..25)
        .map(|i| {
            doc(
                &format!("s{i}"),
                &format!("{}.5,{}.25", i, i + 1),
                "2022-06-01T00:00:00Z",
                "2023-01-01T00:00:00Z",
            )
        })
        .collect();

    let mut mocks = Vec::new();
    for (start, chunk) in all.chunks(10).enumerate() {
        let mock = server
            .mock("GET", "/thing/select")
            .match_query(Matcher::UrlEncoded("start".into(), (start * 10).to_string()))
            .with_status(200)
            .with_body(select_body(25, chunk))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();
    let summary = IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await
        .unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.processed, 25);
    assert_eq!(summary.stored, 25);
    assert_eq!(summary.locations_created, 25);
}

#[tokio::test]
async fn test_max_records_stops_early() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);

    let docs: Vec<_> = (0..10)
        .map(|i| {
            doc(
                &format!("s{i}"),
                &format!("1.{i},2.{i}"),
                "2022-06-01T00:00:00Z",
                "2023-01-01T00:00:00Z",
            )
        })
        .collect();
    let _mock = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(select_body(1000, &docs))
        .create_async()
        .await;

    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();
    let request = IngestRequest {
        query: "*:*".to_string(),
        max_records: 4,
    };
    let summary = IngestCoordinator::new(&config, &index, &store)
        .run(&request)
        .await
        .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(store.count_samples().await.unwrap(), 4);
}

#[tokio::test]
async fn test_fetch_failure_keeps_committed_samples() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.url(), &dir);

    let docs: Vec<_> = (0..10)
        .map(|i| {
            doc(
                &format!("s{i}"),
                &format!("3.{i},4.{i}"),
                "2022-06-01T00:00:00Z",
                "2023-01-01T00:00:00Z",
            )
        })
        .collect();
    let _page = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
        .with_status(200)
        .with_body(select_body(20, &docs))
        .create_async()
        .await;
    let _failure = server
        .mock("GET", "/thing/select")
        .match_query(Matcher::UrlEncoded("start".into(), "10".into()))
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let index = SolrClient::new(&config.source).unwrap();
    let store = SqliteStore::open(&config.store).await.unwrap();
    let result = IngestCoordinator::new(&config, &index, &store)
        .run(&IngestRequest::from_config(&config))
        .await;

    assert!(matches!(result, Err(IcesiumError::SearchIndex(_))));
    assert_eq!(store.count_samples().await.unwrap(), 10);
}
