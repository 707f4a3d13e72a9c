//! Fixture server tests over a real socket

mod common;

use common::{client, start_server, DEFAULT_DATE};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = client().get(url).send().await.expect("request failed");
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content type '{content_type}' for {url}"
    );
    (status, response.json().await.expect("body is not JSON"))
}

#[tokio::test]
async fn test_apod_requires_api_key() {
    let server = start_server().await;
    let base = server.base_url();

    let (status, body) = get_json(&format!("{base}/planetary/apod")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "API key missing");
    assert!(body["message"].as_str().unwrap().contains("api_key"));

    let (status, body) = get_json(&format!("{base}/planetary/apod?api_key=anything")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], DEFAULT_DATE);
    for field in ["media_type", "title", "explanation", "url"] {
        assert!(body[field].is_string(), "missing {field}");
    }

    let (_, body) = get_json(&format!("{base}/planetary/apod?api_key=k&date=2020-02-20")).await;
    assert_eq!(body["date"], "2020-02-20");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_neo_feed_with_two_dates() {
    let server = start_server().await;
    let url = format!(
        "{}/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-03",
        server.base_url()
    );

    let (status, body) = get_json(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["element_count"], 2);

    let objects = body["near_earth_objects"].as_object().unwrap();
    let mut keys: Vec<&String> = objects.keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["2024-01-01", "2024-01-03"]);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_neo_feed_defaults_to_default_date() {
    let server = start_server().await;
    let (_, body) = get_json(&format!("{}/neo/rest/v1/feed", server.base_url())).await;

    assert_eq!(body["element_count"], 1);
    assert_eq!(
        body["near_earth_objects"][DEFAULT_DATE][0]["name"],
        "Mock Object 2"
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_curiosity_photos_echo_earth_date() {
    let server = start_server().await;
    let base = server.base_url();

    let (status, body) = get_json(&format!(
        "{base}/mars-photos/api/v1/rovers/curiosity/photos?earth_date=2015-06-03"
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    let photos = body["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["earth_date"], "2015-06-03");
    assert_eq!(photos[0]["rover"]["landing_date"], "2012-08-06");

    let (_, body) = get_json(&format!("{base}/mars-photos/api/v1/rovers/curiosity/photos")).await;
    assert_eq!(body["photos"][0]["earth_date"], DEFAULT_DATE);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_epic_endpoints() {
    let server = start_server().await;
    let base = server.base_url();

    let (status, body) = get_json(&format!("{base}/EPIC/api/natural")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["date"], format!("{DEFAULT_DATE} 00:00:00"));

    let (status, body) = get_json(&format!("{base}/EPIC/api/natural/date/2019-05-30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["identifier"], "mock-epic-2019-05-30");
    assert_eq!(body[0]["date"], "2019-05-30 00:00:00");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_donki_endpoints_return_one_record() {
    let server = start_server().await;
    let base = server.base_url();

    let cases = [
        ("FLR", "flrID", "beginTime", "T00:00Z"),
        ("CME", "activityID", "startTime", "T01:00Z"),
        ("GST", "gstID", "startTime", "T02:00Z"),
        ("RBE", "rbeID", "startTime", "T04:00Z"),
    ];
    for (event, id_field, time_field, suffix) in cases {
        let (status, body) = get_json(&format!("{base}/DONKI/{event}")).await;
        assert_eq!(status, StatusCode::OK, "{event}");
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1, "{event}");
        assert!(records[0][id_field].as_str().unwrap().ends_with(event));
        assert_eq!(records[0][time_field], format!("{DEFAULT_DATE}{suffix}"));
    }

    let (status, body) = get_json(&format!("{base}/DONKI/notifications")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["messageIssueTime"], format!("{DEFAULT_DATE}T06:00Z"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let server = start_server().await;
    let base = server.base_url();

    for path in ["/", "/planetary", "/DONKI/XYZ", "/neo/rest/v1/feed/extra"] {
        let (status, body) = get_json(&format!("{base}{path}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, json!({ "error": "Not Found" }));
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_non_get_is_405_on_any_path() {
    let server = start_server().await;
    let base = server.base_url();
    let client = client();

    for path in ["/planetary/apod?api_key=k", "/DONKI/FLR", "/does/not/exist"] {
        let url = format!("{base}{path}");
        for method in [reqwest::Method::POST, reqwest::Method::PUT, reqwest::Method::DELETE] {
            let response = client.request(method.clone(), &url).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
            assert!(response.text().await.unwrap().is_empty());
        }
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_releases_port() {
    let server = start_server().await;
    let port = server.addr().port();

    // Leave a keep-alive connection open while stopping
    let client = client();
    let response = client
        .get(format!("{}/DONKI/FLR", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await.unwrap();

    server.stop().await.unwrap();
    assert!(common::port_is_free(port), "port {port} still bound after stop");
}
