use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use parcelgeo_api::{create_router, AppState};
use parcelgeo_catalog::{Catalog, ImageCache, ImageSource};
use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{Property, PropertyId, PropertyMeasurements, RadiusQuery};
use parcelgeo_store::{GeometryStore, MemoryGeometryStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/properties.json");
const SAMPLE_ID: &str = "f853874999424ad2a5b6f37af6b56610";

/// Serves a small PNG for every URL and counts fetches
#[derive(Default)]
struct PngSource {
    fetches: AtomicUsize,
}

#[async_trait]
impl ImageSource for PngSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let image = image::RgbImage::from_pixel(8, 8, image::Rgb([12, 120, 48]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        Ok(bytes.into_inner())
    }
}

/// Store whose backend refuses every call
struct DownStore;

#[async_trait]
impl GeometryStore for DownStore {
    async fn list_ids(&self, _limit: u32, _offset: u64) -> Result<Vec<PropertyId>> {
        Err(ParcelError::StoreUnavailable("connection refused".into()))
    }

    async fn get_property(&self, _id: &PropertyId) -> Result<Option<Property>> {
        Err(ParcelError::StoreUnavailable("connection refused".into()))
    }

    async fn find_within(&self, _query: &RadiusQuery) -> Result<Vec<Property>> {
        Err(ParcelError::StoreUnavailable("connection refused".into()))
    }

    async fn measure(
        &self,
        _id: &PropertyId,
        _zone_radius_m: f64,
    ) -> Result<Option<PropertyMeasurements>> {
        Err(ParcelError::StoreUnavailable("connection refused".into()))
    }

    async fn health_check(&self) -> Result<()> {
        Err(ParcelError::StoreUnavailable("connection refused".into()))
    }

    fn backend(&self) -> &'static str {
        "down"
    }
}

struct TestApp {
    router: Router,
    source: Arc<PngSource>,
    _images: TempDir,
}

fn test_app() -> TestApp {
    let store = MemoryGeometryStore::from_fixture_file(FIXTURE).unwrap();
    let images = TempDir::new().unwrap();
    let source = Arc::new(PngSource::default());
    let cache = ImageCache::new(images.path(), source.clone());
    let state = AppState::new(Catalog::new(Arc::new(store), cache), 10.0);

    TestApp {
        router: create_router(Arc::new(state)),
        source,
        _images: images,
    }
}

fn down_app() -> TestApp {
    let images = TempDir::new().unwrap();
    let source = Arc::new(PngSource::default());
    let cache = ImageCache::new(images.path(), source.clone());
    let state = AppState::new(Catalog::new(Arc::new(DownStore), cache), 10.0);

    TestApp {
        router: create_router(Arc::new(state)),
        source,
        _images: images,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_find(router: &Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/find")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["store"]["reachable"], true);
}

#[tokio::test]
async fn test_unreachable_store_is_service_unavailable() {
    let app = down_app();

    let (status, body) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["store"]["reachable"], false);

    for uri in ["/list", "/statistics/abc", "/display/abc"] {
        let (status, body) = get_json(&app.router, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["error"], "Geometry store unavailable", "{}", uri);
    }

    let (status, _) = post_find(
        &app.router,
        json!({
            "distance": 500,
            "location": { "type": "Point", "coordinates": [-80.0782213, 26.8849731] }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_list_defaults_returns_sorted_ids() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/list").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            "3290ec7dd190478aab124f6f2f32bdd7",
            "5e25c841f0ca47ac8215b5fd0076259a",
            "622088210a6f43fca2a1824e8610df03",
            "f1650f2a99824f349643ad234abff6a2",
            "f853874999424ad2a5b6f37af6b56610",
        ])
    );
}

#[tokio::test]
async fn test_list_pagination() {
    let app = test_app();

    let (status, body) = get_json(&app.router, "/list?size=2&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!(["622088210a6f43fca2a1824e8610df03", "f1650f2a99824f349643ad234abff6a2"])
    );

    let (status, body) = get_json(&app.router, "/list?size=2&page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["f853874999424ad2a5b6f37af6b56610"]));
}

#[tokio::test]
async fn test_list_past_end_is_not_found() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/list?size=100&page=100").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No properties found");
}

#[tokio::test]
async fn test_list_rejects_bad_paging() {
    let app = test_app();

    for uri in [
        "/list?page=0",
        "/list?size=0",
        "/list?size=1001",
        "/list?page=-1",
        "/list?size=abc",
    ] {
        let (status, _) = get_json(&app.router, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
    }
}

#[tokio::test]
async fn test_statistics_for_sample_property() {
    let app = test_app();
    let (status, body) = get_json(&app.router, &format!("/statistics/{}", SAMPLE_ID)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], SAMPLE_ID);
    let parcel = body["parcel_area_sqm"].as_f64().unwrap();
    let building = body["building_area_sqm"].as_f64().unwrap();
    let distance = body["building_distance_m"].as_f64().unwrap();
    let density = body["zone_density"].as_f64().unwrap();

    assert!((parcel - 1494.0).abs() < 15.0, "parcel {}", parcel);
    assert!((building - 729.0).abs() < 8.0, "building {}", building);
    assert!((distance - 42.5_f64.sqrt()).abs() < 0.1, "distance {}", distance);
    assert!((density - 2.3355).abs() < 0.01, "density {}", density);
}

#[tokio::test]
async fn test_statistics_zone_size_changes_only_density() {
    let app = test_app();
    let uri = format!("/statistics/{}", SAMPLE_ID);
    let (_, small) = get_json(&app.router, &format!("{}?zone_size_m=10", uri)).await;
    let (status, large) = get_json(&app.router, &format!("{}?zone_size_m=100", uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(small["parcel_area_sqm"], large["parcel_area_sqm"]);
    assert_eq!(small["building_area_sqm"], large["building_area_sqm"]);
    let ratio = small["zone_density"].as_f64().unwrap() / large["zone_density"].as_f64().unwrap();
    assert!((ratio - 100.0).abs() < 1e-6, "ratio {}", ratio);
}

#[tokio::test]
async fn test_statistics_unknown_property() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/statistics/invalid").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Property not found");
}

#[tokio::test]
async fn test_statistics_rejects_non_positive_zone() {
    let app = test_app();

    for zone in ["0", "-5", "abc", "10.5", "1e-200"] {
        let uri = format!("/statistics/{}?zone_size_m={}", SAMPLE_ID, zone);
        let (status, _) = get_json(&app.router, &uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "zone {}", zone);
    }

    // Validation happens before the id lookup
    let (status, _) = get_json(&app.router, "/statistics/invalid?zone_size_m=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_display_serves_jpeg_and_caches() {
    let app = test_app();
    let uri = format!("/display/{}", SAMPLE_ID);

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 8));

    let (status, second) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, bytes.to_vec());
    assert_eq!(app.source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_display_unknown_property() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/display/invalid").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Image not found");
    assert_eq!(app.source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_find_nearby_properties() {
    let app = test_app();
    let (status, body) = post_find(
        &app.router,
        json!({
            "distance": 500,
            "location": { "type": "Point", "coordinates": [-80.0782213, 26.8849731] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let found = body.as_array().unwrap();
    assert!(!found.is_empty());
    assert_eq!(found[0]["id"], "3290ec7dd190478aab124f6f2f32bdd7");
    assert_eq!(
        found[0]["image_bounds"],
        json!([-80.07864028215408, 26.88459934588957, -80.07780209183693, 26.885346941040712])
    );
    assert_eq!(found[0]["geocode_geo"]["type"], "Point");
}

#[tokio::test]
async fn test_find_far_away_is_empty() {
    let app = test_app();
    let (status, body) = post_find(
        &app.router,
        json!({
            "distance": 1000,
            "location": { "type": "Point", "coordinates": [2.3522, 48.8566] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_find_rejects_invalid_body() {
    let app = test_app();
    let point = json!({ "type": "Point", "coordinates": [-80.0782213, 26.8849731] });

    let cases = [
        json!({ "distance": -1, "location": point }),
        json!({ "distance": 0, "location": point }),
        json!({ "location": point }),
        json!({ "distance": 100, "location": { "type": "Point", "coordinates": [] } }),
        json!({ "distance": 100, "location": { "type": "Point", "coordinates": [200.0, 0.0] } }),
    ];

    for body in cases {
        let (status, _) = post_find(&app.router, body.clone()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    }
}

#[tokio::test]
async fn test_find_rejects_non_point_location() {
    let app = test_app();
    let (status, body) = post_find(
        &app.router,
        json!({
            "distance": 100,
            "location": { "type": "Polygon", "coordinates": [-80.0782213, 26.8849731] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid location type");
}

#[tokio::test]
async fn test_find_checks_type_before_coordinate_range() {
    let app = test_app();

    let (status, body) = post_find(
        &app.router,
        json!({
            "distance": 100,
            "location": { "type": "Polygon", "coordinates": [200.0, 0.0] }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid location type");

    // distance is checked first of all
    let (status, _) = post_find(
        &app.router,
        json!({
            "distance": -1,
            "location": { "type": "Polygon", "coordinates": [200.0, 0.0] }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
