//! HTTP-level tests against an in-memory database and stub providers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;

use van_niti_server::{
    app,
    assist::{AssistError, CompletionProvider, PattaAssistant},
    config::Config,
    db,
    ocr::{OcrError, OcrImage, OcrProvider, OcrProviderTrait, OcrService},
    state::AppState,
};

struct StubOcr;

#[async_trait]
impl OcrProviderTrait for StubOcr {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::NemoRetriever
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn recognize(&self, image: &OcrImage, encoded: &str) -> Result<Value, OcrError> {
        Ok(json!({
            "data": [{
                "text_detections": [
                    { "text_prediction": { "text": format!("mime: {}", image.mime) } },
                    { "text_prediction": { "text": format!("length: {}", encoded.len()) } }
                ]
            }]
        }))
    }
}

/// Completion provider that always fails, or echoes a fixed object
struct StubModel(Option<&'static str>);

#[async_trait]
impl CompletionProvider for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AssistError> {
        self.0
            .map(str::to_string)
            .ok_or_else(|| AssistError::Api("model offline".to_string()))
    }
}

async fn state_with_model(model: StubModel) -> AppState {
    let pool = db::create_memory_pool().await.unwrap();
    AppState::with_services(
        Config::default(),
        pool,
        OcrService::with_provider(Arc::new(StubOcr)),
        PattaAssistant::with_provider(Arc::new(model)),
    )
}

async fn server() -> TestServer {
    TestServer::new(app(state_with_model(StubModel(None)).await)).unwrap()
}

fn patta_body(number: &str, name: &str, state: &str, lon: f64, lat: f64) -> Value {
    json!({
        "pattaNumber": number,
        "holder": {
            "name": name,
            "fatherName": "Suresh Kumar",
            "tribe": "Gond",
            "category": "Scheduled Tribe"
        },
        "location": {
            "village": "Bichhiya",
            "district": "Mandla",
            "state": state,
            "coordinates": { "type": "Point", "coordinates": [lon, lat] },
            "surveyNumber": "45/2",
            "area": { "value": 2.5, "unit": "acres" },
            "boundaries": { "north": "Nala", "south": "Road", "east": "Forest", "west": "Field" }
        },
        "rights": ["Right to cultivate"],
        "isHeritable": true,
        "issuedBy": {
            "authority": "District Tribal Welfare Office",
            "designation": "District Tribal Welfare Officer",
            "date": "2023-01-15"
        }
    })
}

fn resource_body(village: &str, district: &str, state: &str) -> Value {
    json!({
        "village": village,
        "district": district,
        "state": state,
        "population": 1000,
        "location": { "type": "Point", "coordinates": [91.5, 23.5] },
        "stPercentage": 60,
        "infrastructureStatus": 3,
        "roadConnectivity": "Kaccha",
        "distanceToPHC": 15,
        "electrificationStatus": "Partial",
        "waterAvailability": "Low",
        "foodAvailability": "Low",
        "povertyRatio": 45,
        "literacyRate": 55,
        "employmentRatio": 40,
        "housingType": { "kutcha": 50, "semiPacca": 30, "pacca": 20 }
    })
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let server = server().await;

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "ok");

    let missing = server.get("/api/nothing-here").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        missing.json::<Value>(),
        json!({ "success": false, "message": "Route not found" })
    );
}

#[tokio::test]
async fn test_patta_crud() {
    let server = server().await;

    let created = server
        .post("/api/pattas")
        .json(&patta_body("p/mp/2023/001", "Rajesh Kumar", "Madhya Pradesh", 80.37, 22.6))
        .await;
    created.assert_status(StatusCode::CREATED);
    let created: Value = created.json();
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["pattaNumber"], "P/MP/2023/001");
    assert_eq!(created["data"]["status"], "active");
    assert_eq!(created["data"]["createdBy"], "000000000000000000000000");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let fetched: Value = server.get(&format!("/api/pattas/{}", id)).await.json();
    assert_eq!(fetched["data"]["holder"]["name"], "Rajesh Kumar");

    let updated = server
        .put(&format!("/api/pattas/{}", id))
        .json(&json!({ "status": "under_dispute", "holder": { "tribe": "Baiga" } }))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["data"]["status"], "under_dispute");
    assert_eq!(updated["data"]["holder"]["tribe"], "Baiga");
    assert_eq!(updated["data"]["holder"]["name"], "Rajesh Kumar");

    let invalid = server
        .put(&format!("/api/pattas/{}", id))
        .json(&json!({ "status": "lost" }))
        .await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(invalid.json::<Value>()["errors"][0]["field"], "status");

    let deleted = server.delete(&format!("/api/pattas/{}", id)).await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["message"], "Patta deleted successfully");

    let gone = server.get(&format!("/api/pattas/{}", id)).await;
    gone.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["message"], "Patta not found");
}

#[tokio::test]
async fn test_patta_validation_and_duplicates() {
    let server = server().await;

    let mut body = patta_body("P-1", "A", "Odisha", 86.0, 22.0);
    body["holder"]["name"] = json!("");
    body["location"]["coordinates"]["coordinates"] = json!([86.0]);
    let invalid = server.post("/api/pattas").json(&body).await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    let invalid: Value = invalid.json();
    assert_eq!(invalid["message"], "Validation Error");
    let fields: Vec<&str> = invalid["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"holder.name"));
    assert!(fields.contains(&"location.coordinates.coordinates"));

    server
        .post("/api/pattas")
        .json(&patta_body("P-1", "A", "Odisha", 86.0, 22.0))
        .await
        .assert_status(StatusCode::CREATED);
    let duplicate = server
        .post("/api/pattas")
        .json(&patta_body("p-1", "B", "Odisha", 86.0, 22.0))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    let duplicate: Value = duplicate.json();
    assert_eq!(duplicate["message"], "Duplicate patta number");
    assert_eq!(duplicate["field"], "pattaNumber");
}

#[tokio::test]
async fn test_patta_listing_filters_and_pages() {
    let server = server().await;
    for (number, name, state) in [
        ("P-1", "Zara", "Odisha"),
        ("P-2", "Amit", "Odisha"),
        ("P-3", "Manoj", "Tripura"),
    ] {
        server
            .post("/api/pattas")
            .json(&patta_body(number, name, state, 86.0, 22.0))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let all: Value = server.get("/api/pattas").await.json();
    assert_eq!(all["count"], 3);
    assert_eq!(all["data"][0]["holder"]["name"], "Amit");
    assert!(all.get("pages").is_none());

    let odisha: Value = server.get("/api/pattas").add_query_param("state", "Odisha").await.json();
    assert_eq!(odisha["count"], 2);

    let search: Value = server.get("/api/pattas").add_query_param("search", "MANOJ").await.json();
    assert_eq!(search["count"], 1);

    let paged: Value = server
        .get("/api/pattas")
        .add_query_param("page", "2")
        .add_query_param("limit", "2")
        .await
        .json();
    assert_eq!(paged["count"], 1);
    assert_eq!(paged["total"], 3);
    assert_eq!(paged["pages"], 2);
    assert_eq!(paged["page"], 2);
    assert_eq!(paged["data"][0]["holder"]["name"], "Zara");

    let far: Value = server
        .get("/api/pattas")
        .add_query_param("page", "9223372036854775807")
        .add_query_param("limit", "10")
        .await
        .json();
    assert_eq!(far["count"], 0);
    assert_eq!(far["total"], 3);
    assert_eq!(far["pages"], 1);

    let wide = server
        .get("/api/pattas")
        .add_query_param("limit", "9223372036854775807")
        .await;
    wide.assert_status_ok();
    let wide: Value = wide.json();
    assert_eq!(wide["count"], 3);
    assert_eq!(wide["pages"], 1);

    let summaries: Value = server.get("/api/pattas/state/Odisha").await.json();
    assert_eq!(summaries["count"], 2);
    assert!(summaries["data"][0].get("rights").is_none());
    assert_eq!(summaries["data"][0]["location"]["area"]["unit"], "acres");
}

#[tokio::test]
async fn test_state_recommendations() {
    let server = server().await;
    server
        .post("/api/pattas")
        .json(&patta_body("P-1", "Amit", "Odisha", 86.0, 22.0))
        .await
        .assert_status(StatusCode::CREATED);

    let with: Value = server.get("/api/pattas/state/Odisha/recommendations").await.json();
    let schemes = with["data"][0]["recommendedSchemes"].as_array().unwrap();
    assert!(!schemes.is_empty() && schemes.len() <= 3);
    assert!(schemes[0].get("requiredDocuments").is_some());
    assert!(schemes[0].get("score").is_none());

    let without: Value = server
        .get("/api/pattas/state/Odisha/recommendations")
        .add_query_param("includeRecommendations", "false")
        .await
        .json();
    assert!(without["data"][0].get("recommendedSchemes").is_none());
}

#[tokio::test]
async fn test_location_search() {
    let server = server().await;
    server
        .post("/api/pattas")
        .json(&patta_body("FAR", "Far", "Odisha", 86.0, 22.05))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/pattas")
        .json(&patta_body("NEAR", "Near", "Odisha", 86.0, 22.01))
        .await
        .assert_status(StatusCode::CREATED);

    let found: Value = server
        .get("/api/pattas/location")
        .add_query_param("longitude", "86.0")
        .add_query_param("latitude", "22.0")
        .add_query_param("radius", "6000")
        .await
        .json();
    assert_eq!(found["count"], 2);
    assert_eq!(found["data"][0]["pattaNumber"], "NEAR");

    let narrow: Value = server
        .get("/api/pattas/location")
        .add_query_param("longitude", "86.0")
        .add_query_param("latitude", "22.0")
        .add_query_param("radius", "2000")
        .await
        .json();
    assert_eq!(narrow["count"], 1);

    let missing = server
        .get("/api/pattas/location")
        .add_query_param("longitude", "86.0")
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["message"], "Longitude and latitude are required");
}

#[tokio::test]
async fn test_resource_flow() {
    let server = server().await;

    let created = server
        .post("/api/resources")
        .json(&resource_body("Dukli", "West Tripura", "Tripura"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["data"]["id"].as_str().unwrap().to_string();

    let duplicate = server
        .post("/api/resources")
        .json(&resource_body("Dukli", "West Tripura", "Tripura"))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        duplicate.json::<Value>()["message"],
        "Resource with this village, district, and state already exists"
    );

    server
        .post("/api/resources")
        .json(&resource_body("Agartala", "West Tripura", "Tripura"))
        .await
        .assert_status(StatusCode::CREATED);

    let listed: Value = server.get("/api/resources").await.json();
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["data"][0]["village"], "Agartala");
    let schemes = listed["data"][0]["recommendedSchemes"].as_array().unwrap();
    assert!(!schemes.is_empty() && schemes.len() <= 5);
    assert!(schemes[0]["score"].as_i64().unwrap() > 0);

    let stats: Value = server
        .get("/api/resources/stats")
        .add_query_param("state", "Tripura")
        .await
        .json();
    assert_eq!(stats["data"][0]["_id"], "West Tripura");
    assert_eq!(stats["data"][0]["count"], 2);
    assert_eq!(stats["data"][0]["totalPopulation"], 2000.0);

    let rejected = server
        .patch(&format!("/api/resources/{}", id))
        .json(&json!({ "village": "Elsewhere" }))
        .await;
    rejected.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(rejected.json::<Value>()["message"], "Invalid updates!");

    let patched = server
        .patch(&format!("/api/resources/{}", id))
        .json(&json!({ "population": 1500, "waterAvailability": "High" }))
        .await;
    patched.assert_status_ok();
    let patched: Value = patched.json();
    assert_eq!(patched["data"]["population"], 1500.0);
    assert_eq!(patched["data"]["waterAvailability"], "High");

    let fetched: Value = server.get(&format!("/api/resources/{}", id)).await.json();
    assert!(fetched["data"]["recommendedSchemes"].is_array());

    let deleted: Value = server.delete(&format!("/api/resources/{}", id)).await.json();
    assert_eq!(deleted, json!({ "success": true, "data": {} }));
    server
        .get(&format!("/api/resources/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_individual_schemes() {
    let server = server().await;

    let catalog: Value = server.get("/api/individual-schemes/schemes").await.json();
    assert_eq!(catalog["data"].as_array().unwrap().len(), 11);

    let kcc: Value = server.get("/api/individual-schemes/schemes/kcc").await.json();
    assert_eq!(kcc["data"]["id"], "kcc");

    let missing = server.get("/api/individual-schemes/schemes/nope").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["message"], "Scheme not found");

    let mut body = patta_body("P-1", "Sunita Bai", "Madhya Pradesh", 81.0, 22.9);
    body["additionalInfo"] = json!({ "isBPL": true, "gender": "Female", "age": 30 });
    let recommended = server.post("/api/individual-schemes/recommend").json(&body).await;
    recommended.assert_status_ok();
    let recommended: Value = recommended.json();
    assert_eq!(recommended["data"]["profile"]["isST"], true);
    assert_eq!(recommended["data"]["profile"]["isBPL"], true);
    assert_eq!(recommended["data"]["profile"]["landArea"], 2.5);
    let schemes = recommended["data"]["recommendedSchemes"].as_array().unwrap();
    assert!(!schemes.is_empty() && schemes.len() <= 5);
    let scores: Vec<i64> = schemes.iter().map(|s| s["score"].as_i64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_ai_routes() {
    let ocr = json!({
        "data": [{
            "text_detections": [
                { "text_prediction": { "text": "Patta No: TR/7" } },
                { "text_prediction": { "text": "District: Dhalal" } }
            ]
        }]
    });

    // Model offline: the rule-based draft is returned
    let server = server().await;
    let draft: Value = server
        .post("/api/ai/patta-draft")
        .json(&json!({ "ocrResult": ocr }))
        .await
        .json();
    assert_eq!(draft["pattaNumber"], "TR/7");
    assert_eq!(draft["location"]["district"], "Dhalai");

    let form: Value = server
        .post("/api/ai/patta-form")
        .json(&json!({ "ocrResult": ocr }))
        .await
        .json();
    assert_eq!(form, draft);

    let failed = server
        .post("/api/ai/patta-mapper")
        .json(&json!({ "ocrResult": ocr, "draftFormData": draft }))
        .await;
    failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.json::<Value>()["error"], "Failed to process OCR result");

    // Model online: its answer wins
    let online = TestServer::new(app(state_with_model(StubModel(Some(r#"{"pattaNumber":"TR-7"}"#))).await)).unwrap();
    let mapped: Value = online
        .post("/api/ai/patta-mapper")
        .json(&json!({ "ocrResult": ocr, "draftFormData": {} }))
        .await
        .json();
    assert_eq!(mapped, json!({ "pattaNumber": "TR-7" }));
}

fn multipart_request(field: &str, filename: &str, content_type: Option<&str>, payload: &[u8]) -> Request<Body> {
    let boundary = "X-BOUNDARY";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
    );
    if let Some(ct) = content_type {
        body.push_str(&format!("Content-Type: {ct}\r\n"));
    }
    body.push_str("\r\n");
    let mut bytes = body.into_bytes();
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/ocr/process")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .header("content-length", bytes.len())
        .body(Body::from(bytes))
        .expect("Failed to build request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_ocr_upload() {
    let router = app(state_with_model(StubModel(None)).await);

    let response = router
        .clone()
        .oneshot(multipart_request("image", "scan.png", Some("image/png"), b"abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["data"][0]["text_detections"][0]["text_prediction"]["text"], "mime: image/png");
    assert_eq!(value["data"][0]["text_detections"][1]["text_prediction"]["text"], "length: 4");

    // No content type: guessed from the file name
    let response = router
        .clone()
        .oneshot(multipart_request("image", "scan.jpg", None, b"abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["data"][0]["text_detections"][0]["text_prediction"]["text"], "mime: image/jpeg");

    let response = router
        .clone()
        .oneshot(multipart_request("image", "notes.txt", Some("text/plain"), b"abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Only image files are allowed");

    let response = router
        .clone()
        .oneshot(multipart_request("file", "scan.png", Some("image/png"), b"abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "No image file provided");

    let large = vec![0u8; 200_000];
    let response = router
        .oneshot(multipart_request("image", "scan.png", Some("image/png"), &large))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["message"]
        .as_str()
        .unwrap()
        .starts_with("Image size too large"));
}

#[tokio::test]
async fn test_ocr_without_api_key() {
    let pool = db::create_memory_pool().await.unwrap();
    let router = app(AppState::new(Config::default(), pool));

    let response = router
        .oneshot(multipart_request("image", "scan.png", Some("image/png"), b"abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = json_body(response).await;
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "OCR processing failed");
    assert!(value["details"].as_str().unwrap().contains("No OCR providers available"));
}
