use actix_web::{http::header, web, HttpRequest, HttpResponse, Result};
use actix_web::http::header::Header;
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use askama::Template;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{
        authenticate_credentials, clear_logout_cookie, logout_cookie, new_id, new_reference,
        AUTH_REALM,
    },
    db, filters,
    forms::{BookingForm, ContactForm, FormErrors},
    models::{
        choice_label, BandMemberRow, BlogPostRow, Choice, GalleryItemJson, GalleryItemRow,
        ServiceRow, SiteSettingsRow, TestimonialRow, BOOKING_EVENT_TYPES, CONTACT_SUBJECTS,
        GALLERY_EVENT_TYPES, MEDIA_TYPES, ROLE_ADMIN, STATUS_PENDING,
    },
    notify::{self, BookingEmail},
    state::AppState,
    templates::{render, render_status},
};

#[derive(Clone, Debug)]
struct StatItem {
    value: &'static str,
    label: &'static str,
}

#[derive(Clone, Debug)]
struct GalleryView {
    id: String,
    title: String,
    description: String,
    media_type: String,
    media_type_label: String,
    event_type_label: String,
    event_date: String,
    event_location: String,
    image_url: String,
    video_url: String,
    audio_url: String,
}

fn to_gallery_view(row: GalleryItemRow) -> GalleryView {
    GalleryView {
        media_type_label: choice_label(MEDIA_TYPES, &row.media_type),
        event_type_label: choice_label(GALLERY_EVENT_TYPES, &row.event_type),
        id: row.id,
        title: row.title,
        description: row.description,
        media_type: row.media_type,
        event_date: row.event_date,
        event_location: row.event_location,
        image_url: row.image_url,
        video_url: row.video_url,
        audio_url: row.audio_url,
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    settings: SiteSettingsRow,
    members: Vec<BandMemberRow>,
    featured_services: Vec<ServiceRow>,
    featured_gallery: Vec<GalleryView>,
    testimonials: Vec<TestimonialRow>,
    latest_posts: Vec<BlogPostRow>,
    stats: Vec<StatItem>,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    settings: SiteSettingsRow,
    members: Vec<BandMemberRow>,
}

#[derive(Template)]
#[template(path = "services.html")]
struct ServicesTemplate {
    services: Vec<ServiceRow>,
    featured_services: Vec<ServiceRow>,
}

#[derive(Template)]
#[template(path = "gallery.html")]
struct GalleryTemplate {
    items: Vec<GalleryView>,
    event_types: &'static [Choice],
    media_types: &'static [Choice],
    years: Vec<String>,
    current: db::GalleryFilter,
}

#[derive(Clone, Debug, Default)]
struct BookingFormView {
    client_name: String,
    client_email: String,
    client_phone: String,
    client_company: String,
    event_type: String,
    event_title: String,
    event_date: String,
    event_start_time: String,
    event_end_time: String,
    event_location: String,
    expected_guests: String,
    service_requested: String,
    special_requirements: String,
    budget_range: String,
    how_heard_about_us: String,
}

impl From<&BookingForm> for BookingFormView {
    fn from(form: &BookingForm) -> Self {
        Self {
            client_name: form.client_name.clone(),
            client_email: form.client_email.clone(),
            client_phone: form.client_phone.clone(),
            client_company: form.client_company.clone().unwrap_or_default(),
            event_type: form.event_type.clone(),
            event_title: form.event_title.clone(),
            event_date: form.event_date.clone(),
            event_start_time: form.event_start_time.clone(),
            event_end_time: form.event_end_time.clone(),
            event_location: form.event_location.clone(),
            expected_guests: form.expected_guests.clone(),
            service_requested: form.service_requested.clone(),
            special_requirements: form.special_requirements.clone().unwrap_or_default(),
            budget_range: form.budget_range.clone().unwrap_or_default(),
            how_heard_about_us: form.how_heard_about_us.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "booking.html")]
struct BookingTemplate {
    event_types: &'static [Choice],
    form: BookingFormView,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "booking_success.html")]
struct BookingSuccessTemplate;

#[derive(Clone, Debug, Default)]
struct ContactFormView {
    name: String,
    email: String,
    phone: String,
    subject: String,
    message: String,
}

impl From<&ContactForm> for ContactFormView {
    fn from(form: &ContactForm) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone().unwrap_or_default(),
            subject: form.subject.clone(),
            message: form.message.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    settings: SiteSettingsRow,
    subjects: &'static [Choice],
    form: ContactFormView,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "contact_success.html")]
struct ContactSuccessTemplate;

#[derive(Template)]
#[template(path = "blog.html")]
struct BlogTemplate {
    posts: Vec<BlogPostRow>,
    featured_posts: Vec<BlogPostRow>,
}

#[derive(Template)]
#[template(path = "blog_detail.html")]
struct BlogDetailTemplate {
    post: BlogPostRow,
    related_posts: Vec<BlogPostRow>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

#[derive(Deserialize)]
struct GalleryQuery {
    event_type: Option<String>,
    media_type: Option<String>,
    year: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/about").route(web::get().to(about)))
        .service(web::resource("/services").route(web::get().to(services)))
        .service(web::resource("/gallery").route(web::get().to(gallery)))
        .service(web::resource("/gallery/filter").route(web::get().to(gallery_filter)))
        .service(
            web::resource("/booking")
                .route(web::get().to(show_booking))
                .route(web::post().to(create_booking)),
        )
        .service(web::resource("/booking/success").route(web::get().to(booking_success)))
        .service(
            web::resource("/contact")
                .route(web::get().to(show_contact))
                .route(web::post().to(create_contact)),
        )
        .service(web::resource("/contact/success").route(web::get().to(contact_success)))
        .service(web::resource("/blog").route(web::get().to(blog_index)))
        .service(web::resource("/blog/{slug}").route(web::get().to(blog_detail)))
        .service(web::resource("/login").route(web::get().to(login)))
        .service(web::resource("/logout").route(web::get().to(logout)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn home(state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = db::site_settings(&state.db).await;
    let members = fetch_active_members(&state, Some(4)).await;
    let featured_services = sqlx::query_as::<_, ServiceRow>(
        r#"SELECT id, name, service_type, description, short_description, price_range, duration,
                  features, icon, image_url, is_featured, sort_order
           FROM services
           WHERE is_featured = 1
           ORDER BY sort_order, name
           LIMIT 3"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    let featured_gallery = sqlx::query_as::<_, GalleryItemRow>(
        r#"SELECT id, title, description, media_type, event_type, event_date, event_location,
                  image_url, video_url, audio_url, is_featured, is_public, created_at
           FROM gallery_items
           WHERE is_featured = 1 AND is_public = 1
           ORDER BY event_date DESC, created_at DESC
           LIMIT 6"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default()
    .into_iter()
    .map(to_gallery_view)
    .collect();

    let testimonials = sqlx::query_as::<_, TestimonialRow>(
        r#"SELECT id, client_name, client_company, quote, rating, event_type, event_date,
                  is_featured, created_at
           FROM testimonials
           WHERE is_featured = 1
           ORDER BY created_at DESC
           LIMIT 3"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    let latest_posts = db::published_posts(&state.db)
        .await
        .unwrap_or_default()
        .into_iter()
        .take(3)
        .collect();

    let stats = vec![
        StatItem { value: "500", label: "Events Performed" },
        StatItem { value: "50", label: "Cities Visited" },
        StatItem { value: "1000", label: "Happy Clients" },
        StatItem { value: "10", label: "Years Experience" },
    ];

    Ok(render(HomeTemplate {
        settings,
        members,
        featured_services,
        featured_gallery,
        testimonials,
        latest_posts,
        stats,
    }))
}

async fn about(state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = db::site_settings(&state.db).await;
    let members = fetch_active_members(&state, None).await;
    Ok(render(AboutTemplate { settings, members }))
}

async fn services(state: web::Data<AppState>) -> Result<HttpResponse> {
    let services = sqlx::query_as::<_, ServiceRow>(
        r#"SELECT id, name, service_type, description, short_description, price_range, duration,
                  features, icon, image_url, is_featured, sort_order
           FROM services
           ORDER BY sort_order, name"#,
    )
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    let featured_services = services
        .iter()
        .filter(|service| service.is_featured == 1)
        .cloned()
        .collect();

    Ok(render(ServicesTemplate {
        services,
        featured_services,
    }))
}

async fn gallery(
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let current = db::GalleryFilter::normalized(query.event_type, query.media_type, query.year);
    let items = db::fetch_gallery_items(&state.db, &current)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(to_gallery_view)
        .collect();
    let years = db::gallery_years(&state.db).await.unwrap_or_default();

    Ok(render(GalleryTemplate {
        items,
        event_types: GALLERY_EVENT_TYPES,
        media_types: MEDIA_TYPES,
        years,
        current,
    }))
}

async fn gallery_filter(
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let filter = db::GalleryFilter::normalized(query.event_type, query.media_type, query.year);
    let items: Vec<GalleryItemJson> = db::fetch_gallery_items(&state.db, &filter)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?
        .iter()
        .map(GalleryItemJson::from_row)
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

async fn show_booking() -> Result<HttpResponse> {
    Ok(render(BookingTemplate {
        event_types: BOOKING_EVENT_TYPES,
        form: BookingFormView::default(),
        errors: FormErrors::default(),
    }))
}

async fn create_booking(
    state: web::Data<AppState>,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render(BookingTemplate {
                event_types: BOOKING_EVENT_TYPES,
                form: BookingFormView::from(&form),
                errors,
            }));
        }
    };

    let inquiry_id = new_id();
    let reference = new_reference();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO booking_inquiries
           (id, reference, client_name, client_email, client_phone, client_company,
            event_type, event_title, event_date, event_start_time, event_end_time,
            event_location, expected_guests, service_requested, special_requirements,
            budget_range, how_heard_about_us, status, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&inquiry_id)
    .bind(&reference)
    .bind(&input.client_name)
    .bind(&input.client_email)
    .bind(&input.client_phone)
    .bind(&input.client_company)
    .bind(&input.event_type)
    .bind(&input.event_title)
    .bind(&input.event_date)
    .bind(&input.event_start_time)
    .bind(&input.event_end_time)
    .bind(&input.event_location)
    .bind(input.expected_guests)
    .bind(&input.service_requested)
    .bind(&input.special_requirements)
    .bind(&input.budget_range)
    .bind(&input.how_heard_about_us)
    .bind(STATUS_PENDING)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    let email = BookingEmail {
        reference,
        client_name: input.client_name,
        client_email: input.client_email,
        client_phone: input.client_phone,
        event_title: input.event_title,
        event_type_label: choice_label(BOOKING_EVENT_TYPES, &input.event_type),
        event_date: input.event_date,
        event_start_time: input.event_start_time,
        event_end_time: input.event_end_time,
        event_location: input.event_location,
        expected_guests: input.expected_guests,
        service_requested: input.service_requested,
    };
    notify::send_booking_emails(&state.mail, &email).await;

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/booking/success"))
        .finish())
}

async fn booking_success() -> Result<HttpResponse> {
    Ok(render(BookingSuccessTemplate))
}

async fn show_contact(state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = db::site_settings(&state.db).await;
    Ok(render(ContactTemplate {
        settings,
        subjects: CONTACT_SUBJECTS,
        form: ContactFormView::default(),
        errors: FormErrors::default(),
    }))
}

async fn create_contact(
    state: web::Data<AppState>,
    form: web::Form<ContactForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let settings = db::site_settings(&state.db).await;
            return Ok(render(ContactTemplate {
                settings,
                subjects: CONTACT_SUBJECTS,
                form: ContactFormView::from(&form),
                errors,
            }));
        }
    };

    sqlx::query(
        r#"INSERT INTO contact_messages (id, name, email, phone, subject, message, is_read, created_at)
           VALUES (?, ?, ?, ?, ?, ?, 0, ?)"#,
    )
    .bind(new_id())
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.subject)
    .bind(&input.message)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/contact/success"))
        .finish())
}

async fn contact_success() -> Result<HttpResponse> {
    Ok(render(ContactSuccessTemplate))
}

async fn blog_index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = db::published_posts(&state.db).await.unwrap_or_default();
    let featured_posts = posts
        .iter()
        .filter(|post| post.is_featured == 1)
        .take(3)
        .cloned()
        .collect();

    Ok(render(BlogTemplate {
        posts,
        featured_posts,
    }))
}

async fn blog_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let post = db::published_post_by_slug(&state.db, &slug)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let Some(post) = post else {
        return Ok(render_status(
            actix_web::http::StatusCode::NOT_FOUND,
            NotFoundTemplate,
        ));
    };

    let related_posts = db::related_posts(&state.db, &post.id, 3)
        .await
        .unwrap_or_default();

    Ok(render(BlogDetailTemplate {
        post,
        related_posts,
    }))
}

#[derive(Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LoginQuery>,
) -> HttpResponse {
    let auth = match Authorization::<Basic>::parse(&req) {
        Ok(auth) => auth,
        Err(_) => return auth_challenge(),
    };
    let credentials = auth.into_scheme();
    let username = credentials.user_id();
    let password = credentials.password().unwrap_or_default();

    let user = match authenticate_credentials(&state, username, password).await {
        Some(user) => user,
        None => return auth_challenge(),
    };
    if user.role != ROLE_ADMIN {
        return auth_challenge();
    }

    let requested = query.next.as_deref().unwrap_or("");
    let redirect = if requested.starts_with("/admin") {
        requested
    } else {
        "/admin/dashboard"
    };

    HttpResponse::SeeOther()
        .append_header((header::LOCATION, redirect))
        .cookie(clear_logout_cookie(&req))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

async fn logout(req: HttpRequest) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/"))
        .cookie(logout_cookie(&req))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

fn auth_challenge() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", AUTH_REALM)))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

async fn fetch_active_members(
    state: &web::Data<AppState>,
    limit: Option<i64>,
) -> Vec<BandMemberRow> {
    let base = r#"SELECT id, name, role, bio, image_url, instagram, facebook, twitter,
                         sort_order, is_active
                  FROM band_members
                  WHERE is_active = 1
                  ORDER BY sort_order, name"#;
    let rows = match limit {
        Some(limit) => {
            sqlx::query_as::<_, BandMemberRow>(&format!("{base} LIMIT ?"))
                .bind(limit)
                .fetch_all(&state.db)
                .await
        }
        None => sqlx::query_as::<_, BandMemberRow>(base).fetch_all(&state.db).await,
    };
    rows.unwrap_or_default()
}
