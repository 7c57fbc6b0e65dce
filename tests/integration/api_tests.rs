//! API integration tests
//!
//! Run against a live server started with a bootstrap administrator:
//! `INVENTORY_BOOTSTRAP_ADMIN__USERNAME=admin`,
//! `INVENTORY_BOOTSTRAP_ADMIN__EMAIL=admin@example.com`,
//! `INVENTORY_BOOTSTRAP_ADMIN__PASSWORD=Admin123!`.

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "Admin123!";

/// Suffix keeping names unique across runs
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn login(client: &Client, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

/// Helper to get an administrator token
async fn admin_token(client: &Client) -> String {
    let body: Value = login(client, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .json()
        .await
        .expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn post(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn get(client: &Client, token: &str, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn delete(client: &Client, token: &str, path: &str) -> StatusCode {
    client
        .delete(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

async fn create_unit(client: &Client, token: &str, body: Value) -> i64 {
    let (status, unit) = post(client, token, "/equipment/units", body).await;
    assert_eq!(status, StatusCode::CREATED);
    unit["id"].as_i64().unwrap()
}

async fn unit_total(client: &Client, token: &str, equipment_id: i64) -> i64 {
    let (status, page) = get(
        client,
        token,
        &format!("/equipment/units?equipment_id={}", equipment_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    page["total"].as_i64().unwrap()
}

/// Make + type + equipment, returns the equipment id
async fn create_equipment(client: &Client, token: &str) -> (i64, i64, i64) {
    let (status, make) = post(
        client,
        token,
        "/makes",
        json!({ "name": unique("Lenovo"), "description": "Laptops" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, equipment_type) = post(
        client,
        token,
        "/equipment/types",
        json!({ "name": unique("Laptop"), "description": "Portable computers" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, equipment) = post(
        client,
        token,
        "/equipment",
        json!({
            "name": unique("ThinkPad T14"),
            "description": "14 inch business laptop",
            "make_id": make["id"],
            "type_id": equipment_type["id"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        make["id"].as_i64().unwrap(),
        equipment_type["id"].as_i64().unwrap(),
        equipment["id"].as_i64().unwrap(),
    )
}

async fn unit_movements(client: &Client, token: &str, unit_id: i64) -> Vec<Value> {
    let (status, body) = get(client, token, &format!("/equipment/units/{}/movements", unit_id)).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_invalid_credentials_are_indistinguishable() {
    let client = Client::new();

    let wrong_password = login(&client, ADMIN_USERNAME, "Wrong123!").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = wrong_password.json().await.unwrap();

    let unknown_user = login(&client, &unique("ghost"), "Wrong123!").await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = unknown_user.json().await.unwrap();

    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
#[ignore]
async fn test_register_login_and_profile() {
    let client = Client::new();
    let username = unique("dana");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "Str0ng!pass",
            "roles": ["employee"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert!(body["token"].is_string());
    assert!(body["user"].get("password").is_none());

    let body: Value = login(&client, &username, "Str0ng!pass").await.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let (status, profile) = get(&client, &token, "/auth/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], username.as_str());
    assert_eq!(profile["roles"], json!(["employee"]));

    // Users cannot grant themselves roles
    let response = client
        .patch(format!("{}/auth/profile", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "roles": ["admin"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_self_registration_cannot_request_admin() {
    let client = Client::new();
    let username = unique("eve");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "Str0ng!pass",
            "roles": ["admin"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_unit_lifecycle_records_movements() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let (_, _, equipment_id) = create_equipment(&client, &token).await;

    let (status, organization) = post(
        &client,
        &token,
        "/organizations",
        json!({ "name": unique("Accounting"), "location": "Building 2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, unit) = post(
        &client,
        &token,
        "/equipment/units",
        json!({
            "equipment_id": equipment_id,
            "serial_number": Utc::now().timestamp(),
            "location": "Warehouse A",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let unit_id = unit["id"].as_i64().unwrap();

    let movements = unit_movements(&client, &token, unit_id).await;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["detail"]["kind"], "entry");

    // Delivery needs an organization
    let (status, _) = post(&client, &token, &format!("/equipment/units/{}/deliver", unit_id), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Same location: no transport
    let response = client
        .patch(format!("{}/equipment/units/{}", BASE_URL, unit_id))
        .bearer_auth(&token)
        .json(&json!({ "location": "Warehouse A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(unit_movements(&client, &token, unit_id).await.len(), 1);

    let response = client
        .patch(format!("{}/equipment/units/{}", BASE_URL, unit_id))
        .bearer_auth(&token)
        .json(&json!({ "location": "Office 12", "organization_id": organization["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["location"], "Office 12");

    let movements = unit_movements(&client, &token, unit_id).await;
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["detail"]["kind"], "transport");
    assert_eq!(movements[0]["detail"]["origin_location"], "Warehouse A");
    assert_eq!(movements[0]["detail"]["target_location"], "Office 12");

    let (status, delivery) =
        post(&client, &token, &format!("/equipment/units/{}/deliver", unit_id), json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(delivery["detail"]["kind"], "delivery");
    assert_eq!(delivery["detail"]["organization_id"], organization["id"]);

    let started_at = Utc::now();
    let (status, _) = post(
        &client,
        &token,
        &format!("/equipment/units/{}/maintenance", unit_id),
        json!({
            "started_at": started_at,
            "ended_at": started_at - Duration::days(1),
            "maintenance_location": "Workshop",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, maintenance) = post(
        &client,
        &token,
        &format!("/equipment/units/{}/maintenance", unit_id),
        json!({
            "started_at": started_at,
            "ended_at": started_at + Duration::days(2),
            "maintenance_location": "Workshop",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(maintenance["detail"]["kind"], "maintenance");
    assert_eq!(maintenance["detail"]["maintenance_location"], "Workshop");

    let (status, page) = get(
        &client,
        &token,
        &format!("/movements?type=transport&equipment_unit_id={}", unit_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["per_page"], 10);
}

#[tokio::test]
#[ignore]
async fn test_referenced_catalog_cannot_be_deleted() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let (make_id, type_id, equipment_id) = create_equipment(&client, &token).await;
    let unit_id = create_unit(
        &client,
        &token,
        json!({
            "equipment_id": equipment_id,
            "serial_number": Utc::now().timestamp(),
            "location": "Warehouse A",
        }),
    )
    .await;

    for path in [format!("/makes/{}", make_id), format!("/equipment/types/{}", type_id)] {
        assert_eq!(delete(&client, &token, &path).await, StatusCode::CONFLICT);
    }

    // Equipment with a live unit stays
    assert_eq!(
        delete(&client, &token, &format!("/equipment/{}", equipment_id)).await,
        StatusCode::CONFLICT
    );

    assert_eq!(
        delete(&client, &token, &format!("/equipment/units/{}", unit_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete(&client, &token, &format!("/equipment/{}", equipment_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete(&client, &token, &format!("/makes/{}", make_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete(&client, &token, &format!("/equipment/types/{}", type_id)).await,
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
#[ignore]
async fn test_organization_with_units_cannot_be_deleted() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let (_, _, equipment_id) = create_equipment(&client, &token).await;

    let (status, organization) = post(
        &client,
        &token,
        "/organizations",
        json!({ "name": unique("Legal"), "location": "Building 5" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let organization_path = format!("/organizations/{}", organization["id"]);

    let unit_id = create_unit(
        &client,
        &token,
        json!({
            "equipment_id": equipment_id,
            "organization_id": organization["id"],
            "serial_number": Utc::now().timestamp(),
            "location": "Office 3",
        }),
    )
    .await;

    assert_eq!(delete(&client, &token, &organization_path).await, StatusCode::CONFLICT);

    assert_eq!(
        delete(&client, &token, &format!("/equipment/units/{}", unit_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(delete(&client, &token, &organization_path).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_failed_unit_creation_leaves_nothing_behind() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let (make_id, type_id, equipment_id) = create_equipment(&client, &token).await;

    let (status, _) = post(
        &client,
        &token,
        "/equipment/units",
        json!({
            "equipment_id": equipment_id,
            "organization_id": i32::MAX,
            "serial_number": Utc::now().timestamp(),
            "location": "Warehouse A",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(unit_total(&client, &token, equipment_id).await, 0);

    // Second template fails: neither the equipment nor the first unit is kept
    let name = unique("OptiPlex 7010");
    let (status, _) = post(
        &client,
        &token,
        "/equipment",
        json!({
            "name": name,
            "description": "Desktop",
            "make_id": make_id,
            "type_id": type_id,
            "units": [
                { "serial_number": Utc::now().timestamp(), "location": "Warehouse A" },
                { "organization_id": i32::MAX, "serial_number": Utc::now().timestamp() + 1, "location": "Warehouse B" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listing) = get(&client, &token, &format!("/equipment?make_id={}", make_id)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listing
        .as_array()
        .map(|items| items.iter().filter_map(|e| e["name"].as_str()).collect())
        .unwrap_or_default();
    assert!(!names.contains(&name.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_deleted_user_token_cannot_record_movements() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, _, equipment_id) = create_equipment(&client, &admin).await;
    let username = unique("frank");

    let (status, user) = post(
        &client,
        &admin,
        "/users",
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "Str0ng!pass",
            "roles": ["employee"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let body: Value = login(&client, &username, "Str0ng!pass").await.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    assert_eq!(
        delete(&client, &admin, &format!("/users/{}", user["id"])).await,
        StatusCode::NO_CONTENT
    );

    let (status, _) = post(
        &client,
        &token,
        "/equipment/units",
        json!({
            "equipment_id": equipment_id,
            "serial_number": Utc::now().timestamp(),
            "location": "Warehouse A",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unit_total(&client, &admin, equipment_id).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_make_name_conflicts() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let name = unique("Dell");

    let (status, _) = post(&client, &token, "/makes", json!({ "name": name, "description": "x" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        &client,
        &token,
        "/makes",
        json!({ "name": name.to_uppercase(), "description": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
#[ignore]
async fn test_equipment_with_initial_units() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let (make_id, type_id, _) = create_equipment(&client, &token).await;
    let serial = Utc::now().timestamp();

    let (status, equipment) = post(
        &client,
        &token,
        "/equipment",
        json!({
            "name": unique("Latitude 5440"),
            "description": "Office laptop",
            "make_id": make_id,
            "type_id": type_id,
            "units": [
                { "serial_number": serial, "location": "Warehouse A" },
                { "serial_number": serial + 1, "location": "Warehouse B", "state": "needs_repair" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, page) = get(
        &client,
        &token,
        &format!("/equipment/units?equipment_id={}", equipment["id"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment/units", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
