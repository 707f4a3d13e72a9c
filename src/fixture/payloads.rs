//! Canned JSON bodies for each route
//!
//! Field names and types are the contract the bundled collections assert
//! on. The literal values are fixtures.

use axum::http::StatusCode;
use serde_json::{json, Map, Value};

use super::routes::{DonkiEvent, QueryParams, Route};

/// Build the status and body for a resolved GET route
///
/// `default_date` substitutes for omitted date parameters and seeds the
/// timestamps of the DONKI records.
pub fn respond(route: &Route, params: &QueryParams, default_date: &str) -> (StatusCode, Value) {
    match route {
        Route::Apod => apod(params, default_date),
        Route::NeoFeed => (
            StatusCode::OK,
            neo_feed(
                params.get_or("start_date", default_date),
                params.get_or("end_date", default_date),
            ),
        ),
        Route::CuriosityPhotos => (
            StatusCode::OK,
            curiosity_photos(params.get_or("earth_date", default_date)),
        ),
        Route::EpicNatural => (StatusCode::OK, epic_natural(default_date)),
        Route::EpicByDate(segment) => (StatusCode::OK, epic_by_date(segment)),
        Route::Donki(event) => (StatusCode::OK, donki_event(*event, default_date)),
        Route::DonkiNotifications => (StatusCode::OK, donki_notifications(default_date)),
        Route::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not Found" })),
    }
}

fn apod(params: &QueryParams, default_date: &str) -> (StatusCode, Value) {
    if params.get("api_key").is_none() {
        return (
            StatusCode::FORBIDDEN,
            json!({
                "error": "API key missing",
                "message": "A valid api_key query parameter is required."
            }),
        );
    }

    (
        StatusCode::OK,
        json!({
            "date": params.get_or("date", default_date),
            "media_type": "image",
            "title": "Mock Astronomy Picture of the Day",
            "explanation": "Static mock payload used for offline testing.",
            "url": "https://example.com/mock-apod.jpg"
        }),
    )
}

/// One object keyed by the start date and one by the end date. Equal dates
/// collapse into a single entry holding the end-date object.
fn neo_feed(start: &str, end: &str) -> Value {
    let mut objects = Map::new();
    objects.insert(
        start.to_string(),
        json!([{
            "id": "3726710",
            "name": "Mock Object 1",
            "is_potentially_hazardous_asteroid": false
        }]),
    );
    objects.insert(
        end.to_string(),
        json!([{
            "id": "3726711",
            "name": "Mock Object 2",
            "is_potentially_hazardous_asteroid": true
        }]),
    );

    let element_count: usize = objects
        .values()
        .filter_map(Value::as_array)
        .map(Vec::len)
        .sum();

    json!({
        "element_count": element_count,
        "near_earth_objects": objects
    })
}

fn curiosity_photos(earth_date: &str) -> Value {
    json!({
        "photos": [{
            "id": 102693,
            "sol": 1000,
            "camera": {
                "id": 20,
                "name": "FHAZ",
                "rover_id": 5,
                "full_name": "Front Hazard Avoidance Camera"
            },
            "img_src": "https://example.com/mock-mars.jpg",
            "earth_date": earth_date,
            "rover": {
                "id": 5,
                "name": "Curiosity",
                "landing_date": "2012-08-06",
                "launch_date": "2011-11-26",
                "status": "active"
            }
        }]
    })
}

fn epic_natural(default_date: &str) -> Value {
    json!([{
        "identifier": "mock-epic-item",
        "caption": "Mock EPIC entry",
        "image": "epic_1b_20220101000000",
        "version": "02",
        "centroid_coordinates": { "lat": 12.34, "lon": 56.78 },
        "date": format!("{default_date} 00:00:00")
    }])
}

fn epic_by_date(segment: &str) -> Value {
    json!([{
        "identifier": format!("mock-epic-{segment}"),
        "caption": "Mock EPIC archive entry",
        "image": "epic_1b_archive",
        "version": "02",
        "date": format!("{segment} 00:00:00"),
        "centroid_coordinates": { "lat": -12.34, "lon": 156.78 }
    }])
}

fn donki_event(event: DonkiEvent, date: &str) -> Value {
    match event {
        DonkiEvent::Flare => json!([{
            "flrID": "2022-01-01T00:00:00-FLR",
            "beginTime": format!("{date}T00:00Z"),
            "classType": "M1.2",
            "sourceLocation": "N20W10"
        }]),
        DonkiEvent::CoronalMassEjection => json!([{
            "activityID": "2022-01-01T00:00:00-CME",
            "startTime": format!("{date}T01:00Z"),
            "sourceLocation": "N18W07",
            "instruments": [{ "displayName": "SOHO/LASCO C2" }],
            "link": "https://example.com/mock-cme"
        }]),
        DonkiEvent::GeomagneticStorm => json!([{
            "gstID": "2022-01-01T00:00:00-GST",
            "startTime": format!("{date}T02:00Z"),
            "link": "https://example.com/mock-gst",
            "allKpIndex": [{ "kpIndex": "5", "observedTime": format!("{date}T03:00Z") }]
        }]),
        DonkiEvent::RadiationBeltEnhancement => json!([{
            "rbeID": "2022-01-01T00:00:00-RBE",
            "startTime": format!("{date}T04:00Z"),
            "eventTime": format!("{date}T05:00Z"),
            "link": "https://example.com/mock-rbe"
        }]),
    }
}

fn donki_notifications(date: &str) -> Value {
    json!([{
        "messageType": "Report",
        "messageIssueTime": format!("{date}T06:00Z"),
        "messageURL": "https://example.com/mock-notification",
        "messageBody": "Mock DONKI notification body."
    }])
}
