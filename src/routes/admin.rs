use actix_web::{http::header, middleware::from_fn, web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use askama::Template;
use serde::Deserialize;

use crate::{
    auth::{admin_validator, logout_guard, new_id, AuthUser},
    db,
    forms::{BlogPostForm, FormErrors, GalleryItemForm},
    models::{
        choice_label, is_valid_choice, BandMemberRow, BlogPostRow, BookingInquiryRow, Choice,
        ContactMessageRow, GalleryItemRow, ServiceRow, SiteSettingsRow, TestimonialRow,
        BOOKING_EVENT_TYPES, BOOKING_STATUSES, CONTACT_SUBJECTS, GALLERY_EVENT_TYPES, MEDIA_TYPES,
        POST_PUBLISHED, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING,
    },
    state::AppState,
    templates::render,
};

#[derive(Clone, Debug)]
struct StatCard {
    label: String,
    value: i64,
}

#[derive(Clone, Debug)]
struct InquiryView {
    id: String,
    reference: String,
    client_name: String,
    client_email: String,
    client_phone: String,
    client_company: String,
    has_company: bool,
    event_type_label: String,
    event_title: String,
    event_date: String,
    event_start_time: String,
    event_end_time: String,
    event_location: String,
    expected_guests: i64,
    service_requested: String,
    special_requirements: String,
    has_special_requirements: bool,
    budget_range: String,
    has_budget: bool,
    how_heard_about_us: String,
    has_how_heard: bool,
    status: String,
    admin_notes: String,
    quoted_price: String,
    has_quote: bool,
    created_at: String,
}

fn to_inquiry_view(row: BookingInquiryRow) -> InquiryView {
    let quoted_price = row
        .quoted_price
        .map(|price| format!("{price:.2}"))
        .unwrap_or_default();
    InquiryView {
        has_company: !row.client_company.trim().is_empty(),
        has_special_requirements: !row.special_requirements.trim().is_empty(),
        has_budget: !row.budget_range.trim().is_empty(),
        has_how_heard: !row.how_heard_about_us.trim().is_empty(),
        has_quote: !quoted_price.is_empty(),
        event_type_label: choice_label(BOOKING_EVENT_TYPES, &row.event_type),
        id: row.id,
        reference: row.reference,
        client_name: row.client_name,
        client_email: row.client_email,
        client_phone: row.client_phone,
        client_company: row.client_company,
        event_title: row.event_title,
        event_date: row.event_date,
        event_start_time: row.event_start_time,
        event_end_time: row.event_end_time,
        event_location: row.event_location,
        expected_guests: row.expected_guests,
        service_requested: row.service_requested,
        special_requirements: row.special_requirements,
        budget_range: row.budget_range,
        how_heard_about_us: row.how_heard_about_us,
        status: row.status,
        admin_notes: row.admin_notes,
        quoted_price,
        created_at: row.created_at,
    }
}

#[derive(Clone, Debug)]
struct MessageView {
    id: String,
    name: String,
    email: String,
    phone: String,
    has_phone: bool,
    subject_label: String,
    message: String,
    is_read: bool,
    created_at: String,
}

fn to_message_view(row: ContactMessageRow) -> MessageView {
    MessageView {
        has_phone: !row.phone.trim().is_empty(),
        subject_label: choice_label(CONTACT_SUBJECTS, &row.subject),
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        message: row.message,
        is_read: row.is_read == 1,
        created_at: row.created_at,
    }
}

#[derive(Clone, Debug)]
struct PostView {
    id: String,
    title: String,
    slug: String,
    status: String,
    is_published: bool,
    is_featured: bool,
    published_at: String,
}

fn to_post_view(row: &BlogPostRow) -> PostView {
    PostView {
        id: row.id.clone(),
        title: row.title.clone(),
        slug: row.slug.clone(),
        status: row.status.clone(),
        is_published: row.status == POST_PUBLISHED,
        is_featured: row.is_featured == 1,
        published_at: row.published_at.clone(),
    }
}

#[derive(Clone, Debug)]
struct GalleryAdminView {
    id: String,
    title: String,
    media_type_label: String,
    event_type_label: String,
    event_date: String,
    is_featured: bool,
    is_public: bool,
}

fn to_gallery_admin_view(row: &GalleryItemRow) -> GalleryAdminView {
    GalleryAdminView {
        id: row.id.clone(),
        title: row.title.clone(),
        media_type_label: choice_label(MEDIA_TYPES, &row.media_type),
        event_type_label: choice_label(GALLERY_EVENT_TYPES, &row.event_type),
        event_date: row.event_date.clone(),
        is_featured: row.is_featured == 1,
        is_public: row.is_public == 1,
    }
}

#[derive(Clone, Debug)]
struct StatusOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

fn status_options(current: &str) -> Vec<StatusOption> {
    BOOKING_STATUSES
        .iter()
        .map(|(value, label)| StatusOption {
            value,
            label,
            selected: *value == current,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    admin_name: String,
    stats: Vec<StatCard>,
    recent_inquiries: Vec<InquiryView>,
    recent_messages: Vec<MessageView>,
}

#[derive(Template)]
#[template(path = "admin_inquiries.html")]
struct AdminInquiriesTemplate {
    inquiries: Vec<InquiryView>,
    statuses: &'static [Choice],
    status_filter: String,
    success: String,
    has_success: bool,
}

#[derive(Template)]
#[template(path = "admin_inquiry_detail.html")]
struct AdminInquiryDetailTemplate {
    inquiry: InquiryView,
    statuses: Vec<StatusOption>,
}

#[derive(Template)]
#[template(path = "admin_messages.html")]
struct AdminMessagesTemplate {
    messages: Vec<MessageView>,
    subjects: &'static [Choice],
    subject_filter: String,
    unread_only: bool,
}

#[derive(Template)]
#[template(path = "admin_posts.html")]
struct AdminPostsTemplate {
    posts: Vec<PostView>,
    errors: FormErrors,
    success: String,
    has_success: bool,
}

#[derive(Clone, Debug, Default)]
struct PostFormView {
    title: String,
    slug: String,
    excerpt: String,
    content: String,
    featured_image_url: String,
    status: String,
    is_featured: bool,
    published_at: String,
}

#[derive(Template)]
#[template(path = "admin_post_edit.html")]
struct AdminPostEditTemplate {
    post_id: String,
    post: PostFormView,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "admin_gallery.html")]
struct AdminGalleryTemplate {
    items: Vec<GalleryAdminView>,
    media_types: &'static [Choice],
    event_types: &'static [Choice],
    errors: FormErrors,
    success: String,
    has_success: bool,
}

#[derive(Template)]
#[template(path = "admin_content.html")]
struct AdminContentTemplate {
    members: Vec<BandMemberRow>,
    services: Vec<ServiceRow>,
    testimonials: Vec<TestimonialRow>,
}

#[derive(Template)]
#[template(path = "admin_settings.html")]
struct AdminSettingsTemplate {
    settings: SiteSettingsRow,
    saved: bool,
}

#[derive(Deserialize)]
struct InquiryFilter {
    status: Option<String>,
}

#[derive(Deserialize)]
struct InquiryUpdateForm {
    status: String,
    admin_notes: Option<String>,
    quoted_price: Option<String>,
}

#[derive(Deserialize)]
struct MessageFilter {
    subject: Option<String>,
    unread: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SettingsForm {
    site_title: String,
    tagline: String,
    about_text: String,
    phone: String,
    email: String,
    address: String,
    facebook_url: String,
    instagram_url: String,
    youtube_url: String,
    twitter_url: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(HttpAuthentication::basic(admin_validator))
            .wrap(from_fn(logout_guard))
            .service(web::resource("").route(web::get().to(index)))
            .service(web::resource("/").route(web::get().to(index)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/inquiries").route(web::get().to(list_inquiries)))
            .service(web::resource("/inquiries/bulk").route(web::post().to(bulk_update_inquiries)))
            .service(
                web::resource("/inquiries/{id}")
                    .route(web::get().to(inquiry_detail))
                    .route(web::post().to(update_inquiry)),
            )
            .service(web::resource("/messages").route(web::get().to(list_messages)))
            .service(web::resource("/messages/{id}/read").route(web::post().to(toggle_message_read)))
            .service(
                web::resource("/posts")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(edit_post))
                    .route(web::post().to(update_post)),
            )
            .service(
                web::resource("/gallery")
                    .route(web::get().to(list_gallery))
                    .route(web::post().to(create_gallery_item)),
            )
            .service(web::resource("/content").route(web::get().to(content)))
            .service(
                web::resource("/settings")
                    .route(web::get().to(settings))
                    .route(web::post().to(save_settings)),
            ),
    );
}

async fn index() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/admin/dashboard"))
        .finish()
}

async fn dashboard(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
) -> Result<HttpResponse> {
    let total = count("SELECT COUNT(*) FROM booking_inquiries", &state).run().await;
    let pending = count(
        "SELECT COUNT(*) FROM booking_inquiries WHERE status = 'pending'",
        &state,
    )
    .run()
    .await;
    let confirmed = count(
        "SELECT COUNT(*) FROM booking_inquiries WHERE status = 'confirmed'",
        &state,
    )
    .run()
    .await;
    let completed = count(
        "SELECT COUNT(*) FROM booking_inquiries WHERE status = 'completed'",
        &state,
    )
    .run()
    .await;
    let unread = count(
        "SELECT COUNT(*) FROM contact_messages WHERE is_read = 0",
        &state,
    )
    .run()
    .await;
    let published = count(
        "SELECT COUNT(*) FROM blog_posts WHERE status = 'published'",
        &state,
    )
    .run()
    .await;

    let stats = vec![
        StatCard { label: "Total inquiries".to_string(), value: total },
        StatCard { label: "Pending review".to_string(), value: pending },
        StatCard { label: "Confirmed".to_string(), value: confirmed },
        StatCard { label: "Completed".to_string(), value: completed },
        StatCard { label: "Unread messages".to_string(), value: unread },
        StatCard { label: "Published posts".to_string(), value: published },
    ];

    let recent_inquiries = sqlx::query_as::<_, BookingInquiryRow>(&inquiry_select(
        "ORDER BY created_at DESC LIMIT 6",
        false,
    ))
    .fetch_all(&state.db)
    .await
    .unwrap_or_default()
    .into_iter()
    .map(to_inquiry_view)
    .collect();

    let recent_messages = sqlx::query_as::<_, ContactMessageRow>(
        r#"SELECT id, name, email, phone, subject, message, is_read, created_at
           FROM contact_messages
           ORDER BY created_at DESC
           LIMIT 5"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default()
    .into_iter()
    .map(to_message_view)
    .collect();

    Ok(render(AdminDashboardTemplate {
        admin_name: auth.display_name.clone(),
        stats,
        recent_inquiries,
        recent_messages,
    }))
}

fn inquiry_select(tail: &str, with_status: bool) -> String {
    let filter = if with_status { "WHERE status = ?" } else { "" };
    format!(
        "SELECT id, reference, client_name, client_email, client_phone, client_company, \
         event_type, event_title, event_date, event_start_time, event_end_time, event_location, \
         expected_guests, service_requested, special_requirements, budget_range, \
         how_heard_about_us, status, admin_notes, quoted_price, created_at, updated_at \
         FROM booking_inquiries {filter} {tail}"
    )
}

async fn list_inquiries(
    state: web::Data<AppState>,
    query: web::Query<InquiryFilter>,
) -> Result<HttpResponse> {
    let status_filter = query.status.clone().unwrap_or_default();
    let rows = if status_filter.is_empty() {
        sqlx::query_as::<_, BookingInquiryRow>(&inquiry_select("ORDER BY created_at DESC", false))
            .fetch_all(&state.db)
            .await
            .unwrap_or_default()
    } else {
        sqlx::query_as::<_, BookingInquiryRow>(&inquiry_select("ORDER BY created_at DESC", true))
            .bind(&status_filter)
            .fetch_all(&state.db)
            .await
            .unwrap_or_default()
    };

    let inquiries = rows.into_iter().map(to_inquiry_view).collect();

    Ok(render(AdminInquiriesTemplate {
        inquiries,
        statuses: BOOKING_STATUSES,
        status_filter,
        success: String::new(),
        has_success: false,
    }))
}

async fn inquiry_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let inquiry_id = path.into_inner();
    let row = sqlx::query_as::<_, BookingInquiryRow>(&inquiry_select("WHERE id = ? LIMIT 1", false))
        .bind(&inquiry_id)
        .fetch_optional(&state.db)
        .await
        .unwrap_or(None);

    let inquiry = match row {
        Some(row) => to_inquiry_view(row),
        None => return Ok(HttpResponse::NotFound().body("Inquiry not found")),
    };

    let statuses = status_options(&inquiry.status);

    Ok(render(AdminInquiryDetailTemplate { inquiry, statuses }))
}

async fn update_inquiry(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<InquiryUpdateForm>,
) -> Result<HttpResponse> {
    let inquiry_id = path.into_inner();
    let form = form.into_inner();

    if !is_valid_choice(BOOKING_STATUSES, &form.status) {
        return Ok(HttpResponse::BadRequest().body("Unknown status"));
    }

    let admin_notes = form.admin_notes.unwrap_or_default().trim().to_string();
    let quoted_price = form
        .quoted_price
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok());

    sqlx::query(
        "UPDATE booking_inquiries SET status = ?, admin_notes = ?, quoted_price = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&form.status)
    .bind(&admin_notes)
    .bind(quoted_price)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(&inquiry_id)
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, format!("/admin/inquiries/{inquiry_id}")))
        .finish())
}

/// Bulk status actions over checkbox selections. The form posts repeated
/// `ids` keys, which serde_urlencoded cannot collect, so the body is parsed
/// by hand.
async fn bulk_update_inquiries(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let mut action = String::new();
    let mut ids: Vec<String> = Vec::new();
    for (key, value) in url::form_urlencoded::parse(&body) {
        match key.as_ref() {
            "action" => action = value.into_owned(),
            "ids" => ids.push(value.into_owned()),
            _ => {}
        }
    }

    let status = match action.as_str() {
        "mark_confirmed" => STATUS_CONFIRMED,
        "mark_pending" => STATUS_PENDING,
        "mark_cancelled" => STATUS_CANCELLED,
        "mark_completed" => STATUS_COMPLETED,
        _ => return Ok(HttpResponse::BadRequest().body("Unknown action")),
    };

    let now = chrono::Utc::now().to_rfc3339();
    let mut changed = 0u64;
    for id in &ids {
        let result = sqlx::query(
            "UPDATE booking_inquiries SET status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(&now)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
        changed += result.rows_affected();
    }

    let rows = sqlx::query_as::<_, BookingInquiryRow>(&inquiry_select("ORDER BY created_at DESC", false))
        .fetch_all(&state.db)
        .await
        .unwrap_or_default();
    let inquiries = rows.into_iter().map(to_inquiry_view).collect();

    Ok(render(AdminInquiriesTemplate {
        inquiries,
        statuses: BOOKING_STATUSES,
        status_filter: String::new(),
        success: format!("{changed} booking(s) marked as {status}."),
        has_success: true,
    }))
}

async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<MessageFilter>,
) -> Result<HttpResponse> {
    let subject_filter = query.subject.clone().unwrap_or_default();
    let unread_only = query.unread.as_deref() == Some("1");

    let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, name, email, phone, subject, message, is_read, created_at \
         FROM contact_messages WHERE 1 = 1",
    );
    if !subject_filter.is_empty() {
        builder.push(" AND subject = ").push_bind(&subject_filter);
    }
    if unread_only {
        builder.push(" AND is_read = 0");
    }
    builder.push(" ORDER BY created_at DESC");

    let messages = builder
        .build_query_as::<ContactMessageRow>()
        .fetch_all(&state.db)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(to_message_view)
        .collect();

    Ok(render(AdminMessagesTemplate {
        messages,
        subjects: CONTACT_SUBJECTS,
        subject_filter,
        unread_only,
    }))
}

async fn toggle_message_read(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let message_id = path.into_inner();
    sqlx::query("UPDATE contact_messages SET is_read = 1 - is_read WHERE id = ?")
        .bind(&message_id)
        .execute(&state.db)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/admin/messages"))
        .finish())
}

async fn fetch_all_posts(state: &web::Data<AppState>) -> Vec<BlogPostRow> {
    sqlx::query_as::<_, BlogPostRow>(
        r#"SELECT id, title, slug, excerpt, content, featured_image_url, status, is_featured,
                  published_at, created_at
           FROM blog_posts
           ORDER BY published_at DESC"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default()
}

async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = fetch_all_posts(&state).await.iter().map(to_post_view).collect();
    Ok(render(AdminPostsTemplate {
        posts,
        errors: FormErrors::default(),
        success: String::new(),
        has_success: false,
    }))
}

async fn create_post(
    state: web::Data<AppState>,
    form: web::Form<BlogPostForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let posts = fetch_all_posts(&state).await.iter().map(to_post_view).collect();
            return Ok(render(AdminPostsTemplate {
                posts,
                errors,
                success: String::new(),
                has_success: false,
            }));
        }
    };

    let slug = db::unique_slug(&state.db, &input.slug_base, None)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    sqlx::query(
        r#"INSERT INTO blog_posts
           (id, title, slug, excerpt, content, featured_image_url, status, is_featured,
            published_at, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(new_id())
    .bind(&input.title)
    .bind(&slug)
    .bind(&input.excerpt)
    .bind(&input.content)
    .bind(&input.featured_image_url)
    .bind(&input.status)
    .bind(input.is_featured as i64)
    .bind(&input.published_at)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    let posts = fetch_all_posts(&state).await.iter().map(to_post_view).collect();
    Ok(render(AdminPostsTemplate {
        posts,
        errors: FormErrors::default(),
        success: format!("Post created with slug '{slug}'."),
        has_success: true,
    }))
}

async fn edit_post(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let row = sqlx::query_as::<_, BlogPostRow>(
        r#"SELECT id, title, slug, excerpt, content, featured_image_url, status, is_featured,
                  published_at, created_at
           FROM blog_posts
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(&post_id)
    .fetch_optional(&state.db)
    .await
    .unwrap_or(None);

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().body("Post not found"));
    };

    Ok(render(AdminPostEditTemplate {
        post_id,
        post: PostFormView {
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            featured_image_url: row.featured_image_url,
            status: row.status,
            is_featured: row.is_featured == 1,
            published_at: row.published_at,
        },
        errors: FormErrors::default(),
    }))
}

async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<BlogPostForm>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let form = form.into_inner();
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render(AdminPostEditTemplate {
                post_id,
                post: PostFormView {
                    title: form.title.clone(),
                    slug: form.slug.clone().unwrap_or_default(),
                    excerpt: form.excerpt.clone(),
                    content: form.content.clone(),
                    featured_image_url: form.featured_image_url.clone().unwrap_or_default(),
                    status: form.status.clone(),
                    is_featured: form.is_featured.is_some(),
                    published_at: form.published_at.clone().unwrap_or_default(),
                },
                errors,
            }));
        }
    };

    let slug = db::unique_slug(&state.db, &input.slug_base, Some(&post_id))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let result = sqlx::query(
        r#"UPDATE blog_posts
           SET title = ?, slug = ?, excerpt = ?, content = ?, featured_image_url = ?,
               status = ?, is_featured = ?, published_at = ?
           WHERE id = ?"#,
    )
    .bind(&input.title)
    .bind(&slug)
    .bind(&input.excerpt)
    .bind(&input.content)
    .bind(&input.featured_image_url)
    .bind(&input.status)
    .bind(input.is_featured as i64)
    .bind(&input.published_at)
    .bind(&post_id)
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().body("Post not found"));
    }

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, format!("/admin/posts/{post_id}")))
        .finish())
}

async fn fetch_all_gallery(state: &web::Data<AppState>) -> Vec<GalleryItemRow> {
    sqlx::query_as::<_, GalleryItemRow>(
        r#"SELECT id, title, description, media_type, event_type, event_date, event_location,
                  image_url, video_url, audio_url, is_featured, is_public, created_at
           FROM gallery_items
           ORDER BY event_date DESC, created_at DESC"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default()
}

async fn list_gallery(state: web::Data<AppState>) -> Result<HttpResponse> {
    let items = fetch_all_gallery(&state).await.iter().map(to_gallery_admin_view).collect();
    Ok(render(AdminGalleryTemplate {
        items,
        media_types: MEDIA_TYPES,
        event_types: GALLERY_EVENT_TYPES,
        errors: FormErrors::default(),
        success: String::new(),
        has_success: false,
    }))
}

async fn create_gallery_item(
    state: web::Data<AppState>,
    form: web::Form<GalleryItemForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let items = fetch_all_gallery(&state).await.iter().map(to_gallery_admin_view).collect();
            return Ok(render(AdminGalleryTemplate {
                items,
                media_types: MEDIA_TYPES,
                event_types: GALLERY_EVENT_TYPES,
                errors,
                success: String::new(),
                has_success: false,
            }));
        }
    };

    sqlx::query(
        r#"INSERT INTO gallery_items
           (id, title, description, media_type, event_type, event_date, event_location,
            image_url, video_url, audio_url, is_featured, is_public, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(new_id())
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.media_type)
    .bind(&input.event_type)
    .bind(&input.event_date)
    .bind(&input.event_location)
    .bind(&input.image_url)
    .bind(&input.video_url)
    .bind(&input.audio_url)
    .bind(input.is_featured as i64)
    .bind(input.is_public as i64)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    let items = fetch_all_gallery(&state).await.iter().map(to_gallery_admin_view).collect();
    Ok(render(AdminGalleryTemplate {
        items,
        media_types: MEDIA_TYPES,
        event_types: GALLERY_EVENT_TYPES,
        errors: FormErrors::default(),
        success: "Gallery item added.".to_string(),
        has_success: true,
    }))
}

async fn content(state: web::Data<AppState>) -> Result<HttpResponse> {
    let members = sqlx::query_as::<_, BandMemberRow>(
        r#"SELECT id, name, role, bio, image_url, instagram, facebook, twitter, sort_order, is_active
           FROM band_members
           ORDER BY sort_order, name"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    let services = sqlx::query_as::<_, ServiceRow>(
        r#"SELECT id, name, service_type, description, short_description, price_range, duration,
                  features, icon, image_url, is_featured, sort_order
           FROM services
           ORDER BY sort_order, name"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    let testimonials = sqlx::query_as::<_, TestimonialRow>(
        r#"SELECT id, client_name, client_company, quote, rating, event_type, event_date,
                  is_featured, created_at
           FROM testimonials
           ORDER BY created_at DESC"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    Ok(render(AdminContentTemplate {
        members,
        services,
        testimonials,
    }))
}

async fn settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = db::site_settings(&state.db).await;
    Ok(render(AdminSettingsTemplate {
        settings,
        saved: false,
    }))
}

async fn save_settings(
    state: web::Data<AppState>,
    form: web::Form<SettingsForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    sqlx::query(
        r#"INSERT INTO site_settings
           (id, site_title, tagline, about_text, phone, email, address,
            facebook_url, instagram_url, youtube_url, twitter_url, updated_at)
           VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
           ON CONFLICT(id) DO UPDATE SET
             site_title = excluded.site_title,
             tagline = excluded.tagline,
             about_text = excluded.about_text,
             phone = excluded.phone,
             email = excluded.email,
             address = excluded.address,
             facebook_url = excluded.facebook_url,
             instagram_url = excluded.instagram_url,
             youtube_url = excluded.youtube_url,
             twitter_url = excluded.twitter_url,
             updated_at = excluded.updated_at"#,
    )
    .bind(form.site_title.trim())
    .bind(form.tagline.trim())
    .bind(form.about_text.trim())
    .bind(form.phone.trim())
    .bind(form.email.trim())
    .bind(form.address.trim())
    .bind(form.facebook_url.trim())
    .bind(form.instagram_url.trim())
    .bind(form.youtube_url.trim())
    .bind(form.twitter_url.trim())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    let settings = db::site_settings(&state.db).await;
    Ok(render(AdminSettingsTemplate {
        settings,
        saved: true,
    }))
}

fn count(query: &str, state: &web::Data<AppState>) -> CountQuery {
    CountQuery {
        query: query.to_string(),
        state: state.clone(),
    }
}

struct CountQuery {
    query: String,
    state: web::Data<AppState>,
}

impl CountQuery {
    async fn run(self) -> i64 {
        sqlx::query_scalar::<_, i64>(&self.query)
            .fetch_one(&self.state.db)
            .await
            .unwrap_or(0)
    }
}
