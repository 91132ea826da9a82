use actix_web::{http::StatusCode, test, web, App};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use diamondband::{db, notify::MailConfig, routes, state::AppState};

async fn test_state() -> web::Data<AppState> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    web::Data::new(AppState {
        db: pool,
        mail: MailConfig::disabled(),
    })
}

fn valid_booking_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("client_name", "Test Client"),
        ("client_email", "test@example.com"),
        ("client_phone", "+1234567890"),
        ("event_type", "wedding"),
        ("event_title", "Test Wedding Event"),
        ("event_date", "2026-12-25"),
        ("event_start_time", "18:00"),
        ("event_end_time", "22:00"),
        ("event_location", "Test Venue, City"),
        ("expected_guests", "150"),
        ("service_requested", "Full band performance with sound system"),
        ("budget_range", "$5000-$10000"),
    ]
}

async fn insert_gallery_item(
    pool: &SqlitePool,
    title: &str,
    media_type: &str,
    event_type: &str,
    event_date: &str,
    is_public: i64,
) {
    sqlx::query(
        r#"INSERT INTO gallery_items
           (id, title, media_type, event_type, event_date, is_public, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(title)
    .bind(media_type)
    .bind(event_type)
    .bind(event_date)
    .bind(is_public)
    .bind("2025-01-01T00:00:00+00:00")
    .execute(pool)
    .await
    .expect("insert gallery item");
}

async fn insert_post(pool: &SqlitePool, title: &str, slug: &str, status: &str) {
    sqlx::query(
        r#"INSERT INTO blog_posts
           (id, title, slug, excerpt, content, status, published_at, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(title)
    .bind(slug)
    .bind("excerpt")
    .bind("content")
    .bind(status)
    .bind("2025-06-01T00:00:00+00:00")
    .bind("2025-06-01T00:00:00+00:00")
    .execute(pool)
    .await
    .expect("insert post");
}

#[actix_web::test]
async fn valid_booking_persists_row_and_assigns_reference() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::public::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/booking")
        .set_form(valid_booking_form())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/booking/success");

    let (count, reference, status): (i64, String, String) = sqlx::query_as(
        "SELECT COUNT(*), MAX(reference), MAX(status) FROM booking_inquiries",
    )
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert!(reference.starts_with("DB-"));
    assert_eq!(status, "pending");
}

#[actix_web::test]
async fn booking_missing_required_field_persists_nothing() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::public::configure),
    )
    .await;

    let form: Vec<(&str, &str)> = valid_booking_form()
        .into_iter()
        .filter(|(key, _)| *key != "client_name")
        .collect();

    let req = test::TestRequest::post()
        .uri("/booking")
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("client_name"));
    assert!(body.contains("This field is required."));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM booking_inquiries")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn gallery_filter_is_conjunctive_and_all_is_a_noop() {
    let state = test_state().await;
    insert_gallery_item(&state.db, "Wedding Photo", "image", "wedding", "2024-06-15", 1).await;
    insert_gallery_item(&state.db, "Wedding Clip", "video", "wedding", "2024-07-01", 1).await;
    insert_gallery_item(&state.db, "Old Wedding Photo", "image", "wedding", "2023-05-10", 1).await;
    insert_gallery_item(&state.db, "Festival Photo", "image", "festival", "2024-08-20", 1).await;
    insert_gallery_item(&state.db, "Hidden Photo", "image", "wedding", "2024-09-01", 0).await;

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::public::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/gallery/filter?event_type=wedding&media_type=image&year=2024")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Wedding Photo");
    assert_eq!(items[0]["event_type"], "Wedding");
    assert_eq!(items[0]["event_date"], "2024-06-15");

    // Every axis defaulting to "all" returns the full public set.
    let req = test::TestRequest::get().uri("/gallery/filter").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 4);

    let req = test::TestRequest::get()
        .uri("/gallery/filter?event_type=all&media_type=video&year=all")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Wedding Clip");
}

#[actix_web::test]
async fn draft_posts_are_invisible_to_public_surfaces() {
    let state = test_state().await;
    insert_post(&state.db, "Published Post", "published-post", "published").await;
    insert_post(&state.db, "Secret Draft", "secret-draft", "draft").await;

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::public::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/blog").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Published Post"));
    assert!(!body.contains("Secret Draft"));

    let req = test::TestRequest::get().uri("/blog/published-post").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Direct slug lookup must not leak drafts.
    let req = test::TestRequest::get().uri("/blog/secret-draft").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn contact_message_persists_unread() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::public::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_form([
            ("name", "A Listener"),
            ("email", "listener@example.com"),
            ("subject", "general"),
            ("message", "Loved the show last weekend."),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let (count, is_read): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), MAX(is_read) FROM contact_messages")
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert_eq!(count, 1);
    assert_eq!(is_read, 0);
}

async fn insert_inquiry(pool: &SqlitePool, reference: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        r#"INSERT INTO booking_inquiries
           (id, reference, client_name, client_email, client_phone, event_type, event_title,
            event_date, event_start_time, event_end_time, event_location, expected_guests,
            service_requested, status, created_at, updated_at)
           VALUES (?, ?, 'Client', 'client@example.com', '+1000000000', 'wedding', 'An Event',
                   '2026-05-01', '18:00', '22:00', 'Somewhere', 80,
                   'Live set', 'pending', '2025-01-01T00:00:00+00:00', '2025-01-01T00:00:00+00:00')"#,
    )
    .bind(&id)
    .bind(reference)
    .execute(pool)
    .await
    .expect("insert inquiry");
    id
}

#[actix_web::test]
async fn admin_bulk_action_confirms_selected_inquiries() {
    let state = test_state().await;
    db::seed_defaults(&state.db).await.expect("seed");
    let first = insert_inquiry(&state.db, "DB-AAAA0001").await;
    let second = insert_inquiry(&state.db, "DB-AAAA0002").await;
    let untouched = insert_inquiry(&state.db, "DB-AAAA0003").await;

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::admin::configure),
    )
    .await;

    // Seeded credentials default to admin/admin.
    let req = test::TestRequest::post()
        .uri("/admin/inquiries/bulk")
        .insert_header(("Authorization", "Basic YWRtaW46YWRtaW4="))
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(format!("action=mark_confirmed&ids={first}&ids={second}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("2 booking(s) marked as confirmed."));

    let confirmed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_inquiries WHERE status = 'confirmed'")
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert_eq!(confirmed, 2);

    let pending_status: String =
        sqlx::query_scalar("SELECT status FROM booking_inquiries WHERE id = ?")
            .bind(&untouched)
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert_eq!(pending_status, "pending");
}

#[actix_web::test]
async fn unique_slug_suffixes_on_collision() {
    let state = test_state().await;
    insert_post(&state.db, "Tour Diary", "tour-diary", "published").await;

    let slug = db::unique_slug(&state.db, "tour-diary", None).await.unwrap();
    assert_eq!(slug, "tour-diary-2");

    let free = db::unique_slug(&state.db, "different", None).await.unwrap();
    assert_eq!(free, "different");
}
