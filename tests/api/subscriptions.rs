use chrono::{DateTime, Utc};
use fake::{faker::company::en::CompanyName, Fake};
use sqlx::Row;
use uuid::Uuid;

use crate::helpers::{subscription_body, TestApp};

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).expect("Timestamp was not RFC 3339.")
}

#[tokio::test]
async fn create_returns_201_with_the_new_subscription() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();
    let service_name: String = CompanyName().fake();
    let body = subscription_body(&service_name, 400, user_id, "07-2025", Some("12-2025"));

    let response = test_app.post_subscription(&body).await;

    assert_eq!(201, response.status().as_u16());

    let subscription: serde_json::Value = response.json().await.unwrap();

    assert!(Uuid::parse_str(subscription["id"].as_str().unwrap()).is_ok());
    assert_eq!(subscription["service_name"], service_name.as_str());
    assert_eq!(subscription["price"], 400);
    assert_eq!(subscription["user_id"], user_id.to_string());
    assert_eq!(subscription["start_date"], "07-2025");
    assert_eq!(subscription["end_date"], "12-2025");
    assert_eq!(
        timestamp(&subscription["created_at"]),
        timestamp(&subscription["updated_at"])
    );
}

#[tokio::test]
async fn create_persists_the_new_subscription() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();

    test_app
        .create_subscription(subscription_body("Yandex Plus", 400, user_id, "07-2025", None))
        .await;

    let row = sqlx::query("SELECT service_name, price, user_id, end_date FROM subscriptions;")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.");

    assert_eq!(row.get::<String, _>("service_name"), "Yandex Plus");
    assert_eq!(row.get::<i32, _>("price"), 400);
    assert_eq!(row.get::<Uuid, _>("user_id"), user_id);
    assert_eq!(row.get::<Option<chrono::NaiveDate>, _>("end_date"), None);
}

#[tokio::test]
async fn create_assigns_a_fresh_id_to_every_subscription() {
    let test_app = TestApp::spawn_app().await;
    let body = subscription_body("Yandex Plus", 400, Uuid::new_v4(), "07-2025", None);

    let first = test_app.create_subscription(body.clone()).await;
    let second = test_app.create_subscription(body).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn create_returns_400_when_body_is_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (
            subscription_body("Yandex Plus", -1, user_id, "07-2025", None),
            "invalid price",
        ),
        (
            serde_json::json!({
                "service_name": "Yandex Plus",
                "price": 400,
                "user_id": "not-a-uuid",
                "start_date": "07-2025"
            }),
            "invalid user_id",
        ),
        (
            subscription_body("Yandex Plus", 400, user_id, "2025-07-01", None),
            "invalid start_date",
        ),
        (
            subscription_body("Yandex Plus", 400, user_id, "07-2025", Some("july")),
            "invalid end_date",
        ),
        (
            subscription_body("Yandex Plus", 400, user_id, "07-2025", Some("06-2025")),
            "invalid date_range",
        ),
        (
            subscription_body("   ", 400, user_id, "07-2025", None),
            "invalid service_name",
        ),
    ];

    for (invalid_body, expected_error) in test_cases {
        let response = test_app.post_subscription(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            invalid_body
        );

        let error: serde_json::Value = response.json().await.unwrap();

        assert!(
            error["error"]
                .as_str()
                .unwrap()
                .starts_with(expected_error),
            "Expected '{}' but got {}",
            expected_error,
            error
        );
    }
}

#[tokio::test]
async fn create_returns_400_when_body_require_field_is_missing() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({}), "missing body parameters"),
        (
            serde_json::json!({ "price": 400, "user_id": Uuid::new_v4(), "start_date": "07-2025" }),
            "missing service_name",
        ),
        (
            serde_json::json!({ "service_name": "Yandex Plus", "user_id": Uuid::new_v4(), "start_date": "07-2025" }),
            "missing price",
        ),
        (
            serde_json::json!({ "service_name": "Yandex Plus", "price": 400, "user_id": Uuid::new_v4() }),
            "missing start_date",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn get_returns_what_was_created() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body(
            "Kinopoisk",
            299,
            Uuid::new_v4(),
            "01-2024",
            Some("03-2024"),
        ))
        .await;

    let response = test_app
        .get_subscription(created["id"].as_str().unwrap())
        .await;

    assert_eq!(200, response.status().as_u16());

    let fetched: serde_json::Value = response.json().await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_returns_404_for_an_unknown_id() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .get_subscription(&Uuid::new_v4().to_string())
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn get_returns_400_for_a_malformed_id() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_subscription("not-a-uuid").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn update_of_price_leaves_other_fields_untouched() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body(
            "Yandex Plus",
            400,
            Uuid::new_v4(),
            "07-2025",
            Some("12-2025"),
        ))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_app
        .put_subscription(id, &serde_json::json!({ "price": 550 }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let updated: serde_json::Value = test_app.get_subscription(id).await.json().await.unwrap();

    assert_eq!(updated["price"], 550);
    assert_eq!(updated["service_name"], created["service_name"]);
    assert_eq!(updated["end_date"], created["end_date"]);
    assert_eq!(updated["start_date"], created["start_date"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_with_identical_values_only_advances_updated_at() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body(
            "Yandex Plus",
            400,
            Uuid::new_v4(),
            "07-2025",
            Some("12-2025"),
        ))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_app
        .put_subscription(
            id,
            &serde_json::json!({
                "service_name": "Yandex Plus",
                "price": 400,
                "end_date": "12-2025"
            }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    let updated: serde_json::Value = test_app.get_subscription(id).await.json().await.unwrap();

    assert!(timestamp(&updated["updated_at"]) > timestamp(&created["updated_at"]));
    let unchanged = [
        "id",
        "service_name",
        "price",
        "user_id",
        "start_date",
        "end_date",
        "created_at",
    ];
    for field in unchanged {
        assert_eq!(updated[field], created[field], "{} changed", field);
    }
}

#[tokio::test]
async fn update_with_empty_end_date_clears_it() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body(
            "Yandex Plus",
            400,
            Uuid::new_v4(),
            "07-2025",
            Some("12-2025"),
        ))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_app
        .put_subscription(id, &serde_json::json!({ "end_date": "" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let updated: serde_json::Value = test_app.get_subscription(id).await.json().await.unwrap();

    assert!(updated.get("end_date").is_none());
    assert_eq!(updated["price"], 400);
}

#[tokio::test]
async fn update_without_fields_returns_400() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body("Yandex Plus", 400, Uuid::new_v4(), "07-2025", None))
        .await;

    let response = test_app
        .put_subscription(created["id"].as_str().unwrap(), &serde_json::json!({}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let error: serde_json::Value = response.json().await.unwrap();

    assert_eq!(error["error"], "No fields to update.");
}

#[tokio::test]
async fn update_and_delete_of_unknown_id_return_404() {
    let test_app = TestApp::spawn_app().await;
    let id = Uuid::new_v4().to_string();

    let update = test_app
        .put_subscription(&id, &serde_json::json!({ "price": 100 }))
        .await;
    let delete = test_app.delete_subscription(&id).await;

    assert_eq!(404, update.status().as_u16());
    assert_eq!(404, delete.status().as_u16());
}

#[tokio::test]
async fn update_with_negative_price_returns_400() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body("Yandex Plus", 400, Uuid::new_v4(), "07-2025", None))
        .await;

    let response = test_app
        .put_subscription(created["id"].as_str().unwrap(), &serde_json::json!({ "price": -5 }))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn update_rejected_by_the_store_does_not_leak_backend_errors() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body("Yandex Plus", 400, Uuid::new_v4(), "07-2025", None))
        .await;

    // The end date precedes the stored start date and violates the table check
    let response = test_app
        .put_subscription(
            created["id"].as_str().unwrap(),
            &serde_json::json!({ "end_date": "01-2025" }),
        )
        .await;

    assert_eq!(500, response.status().as_u16());

    let error: serde_json::Value = response.json().await.unwrap();

    assert_eq!(error["error"], "Failed to update subscription.");
}

#[tokio::test]
async fn delete_removes_the_subscription() {
    let test_app = TestApp::spawn_app().await;
    let created = test_app
        .create_subscription(subscription_body("Yandex Plus", 400, Uuid::new_v4(), "07-2025", None))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_app.delete_subscription(id).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(404, test_app.get_subscription(id).await.status().as_u16());
    assert_eq!(404, test_app.delete_subscription(id).await.status().as_u16());
}
