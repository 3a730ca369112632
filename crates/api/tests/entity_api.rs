//! End-to-end tests for the resource endpoints against a real database.
//!
//! Each test gets a fresh database from `#[sqlx::test]` (needs `DATABASE_URL`).

mod common;

use std::time::Duration;

use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, delete, get, send_json};
use serde_json::{json, Value};
use sqlx::PgPool;

fn shop_body(title: &str) -> Value {
    json!({
        "title": title,
        "year": 2015,
        "instagram": "kaftar.shop",
        "phone": "09123456789",
        "countries": ["Iran", "Turkey"],
        "categories": ["Shoes"],
        "img_urls": ["http://localhost:4000/v1/images/1.png"],
        "delivery_time": 3
    })
}

fn seller_body(phone: &str) -> Value {
    json!({
        "first_name": "Sara",
        "last_name": "Ahmadi",
        "phone": phone,
        "email": "sara@example.com",
        "password": "pa55word-long",
        "meli_code": "0012345678"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn healthcheck_reports_database(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/v1/healthcheck").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "available");
    assert_eq!(json["environment"], "test");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shop_lifecycle(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_json(app.app(), Method::POST, "/v1/shops", shop_body("Kaftar")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();
    let created = body_json(response).await;
    let id = created["shop"]["id"].as_i64().unwrap();
    assert_eq!(location, format!("/v1/shops/{id}"));
    assert_eq!(created["shop"]["delivery_time"], "3 هفته");
    assert_eq!(created["shop"]["countries"], json!(["Iran", "Turkey"]));
    assert!(created["shop"].get("created_at").is_none());

    let response = get(app.app(), &location).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["shop"]["title"], "Kaftar");

    let response = send_json(
        app.app(),
        Method::PATCH,
        &location,
        json!({"title": "Kaftar Shoes", "categories": ["Bags"], "instagram": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["shop"]["title"], "Kaftar Shoes");
    assert_eq!(updated["shop"]["categories"], json!(["Bags"]));
    assert_eq!(updated["shop"]["countries"], json!(["Iran", "Turkey"]));
    assert_eq!(updated["shop"]["instagram"], "kaftar.shop");

    let response = delete(app.app(), &location).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "shop successfully deleted"})
    );

    let response = get(app.app(), &location).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shop_list_paginates_and_filters(pool: PgPool) {
    let app = build_test_app(pool);
    for title in ["Alpha", "Beta", "Gamma"] {
        let response = send_json(app.app(), Method::POST, "/v1/shops", shop_body(title)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app.app(), "/v1/shops?page_size=2&sort=-title").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["shops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|shop| shop["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Gamma", "Beta"]);
    assert_eq!(
        json["metadata"],
        json!({
            "current_page": 1,
            "page_size": 2,
            "first_page": 1,
            "last_page": 2,
            "total_records": 3
        })
    );

    let json = body_json(get(app.app(), "/v1/shops?title=alp").await).await;
    assert_eq!(json["shops"].as_array().unwrap().len(), 1);

    let json = body_json(get(app.app(), "/v1/shops?verified=true").await).await;
    assert_eq!(json, json!({"shops": [], "metadata": {}}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_with_missing_shop_is_a_field_error(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/products",
        json!({
            "shop_id": 999,
            "name": "Runner",
            "price": 10.5,
            "sale_price": 9,
            "brand": "Acme",
            "category": "Shoes",
            "country": "Iran",
            "img_urls": ["http://localhost:4000/v1/images/2.png"]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["shop_id"],
        "must reference an existing shop"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_renders_discount_and_names(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/products",
        json!({
            "name": "Runner",
            "price": 10.5,
            "sale_price": 9,
            "off": 15,
            "brand": "Acme",
            "category": "Shoes",
            "country": "Iran",
            "img_urls": ["http://localhost:4000/v1/images/2.png"]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let product = body_json(response).await["product"].clone();
    assert_eq!(product["off"], "15%");
    assert_eq!(product["category"], "Shoes");
    assert_eq!(product["country"], "Iran");
    assert!(product.get("category_id").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_category_name_is_a_field_error(pool: PgPool) {
    let app = build_test_app(pool);
    let body = json!({"name": "Shoes", "img_url": "http://localhost:4000/v1/images/3.png"});

    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/product/categories",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(app.app(), Method::POST, "/v1/product/categories", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["name"],
        "a category with this name already exists"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shop_losing_category_insert_race_is_a_conflict(pool: PgPool) {
    let app = build_test_app(pool.clone());

    // Hold an uncommitted insert of the same name so the shop's insert
    // blocks on the unique index until the other writer commits.
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO categories (name) VALUES ('Bags')")
        .execute(&mut *tx)
        .await
        .unwrap();

    let mut body = shop_body("Racer");
    body["categories"] = json!(["Bags"]);
    let request = tokio::spawn(send_json(app.app(), Method::POST, "/v1/shops", body));

    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.commit().await.unwrap();

    let response = request.await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].get("name").is_none());

    let shops: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shops")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(shops, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_partial_update(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/product/comments",
        json!({"text": "Nice", "phone": "09123456789", "username": "sara", "rate": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["comment"]["id"].as_i64().unwrap();

    let uri = format!("/v1/product/comments/{id}");
    let response = send_json(app.app(), Method::PUT, &uri, json!({"rate": 2})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let comment = body_json(response).await["comment"].clone();
    assert_eq!(comment["rate"], 2);
    assert_eq!(comment["text"], "Nice");

    let response = delete(app.app(), &uri).await;
    assert_eq!(
        body_json(response).await,
        json!({"message": "comment successfully deleted"})
    );
    assert_eq!(
        delete(app.app(), &uri).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seller_register_show_and_update(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/sellers",
        seller_body("09120000001"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();
    let seller = body_json(response).await["seller"].clone();
    assert_eq!(seller["phone"], "09120000001");
    assert_eq!(seller["activated"], false);
    assert!(seller.get("password_hash").is_none());
    assert!(seller.get("version").is_none());

    let response = send_json(
        app.app(),
        Method::PATCH,
        &location,
        json!({"last_name": "Karimi", "password": "another-long-pass"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["seller"]["last_name"], "Karimi");

    let response = get(app.app(), &location).await;
    assert_eq!(
        body_json(response).await["seller"]["meli_code"],
        "0012345678"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_seller_phone_is_a_field_error(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/sellers",
        seller_body("09120000002"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(
        app.app(),
        Method::POST,
        "/v1/sellers",
        seller_body("09120000002"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["phone"],
        "a user with this phone number already exists"
    );
}
