use std::{env, fs, path::Path};

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    auth::{hash_password, new_id},
    models::{BlogPostRow, GalleryItemRow, SiteSettingsRow, POST_PUBLISHED, ROLE_ADMIN},
};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    seed_admin(pool).await?;
    seed_site_settings(pool).await?;
    if env::var("SEED_DEMO").unwrap_or_default() == "true" {
        seed_demo_content(pool).await?;
    }
    Ok(())
}

async fn seed_admin(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (String,)>("SELECT id FROM users WHERE role = ? LIMIT 1")
        .bind(ROLE_ADMIN)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let username = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let display_name =
        env::var("ADMIN_DISPLAY_NAME").unwrap_or_else(|_| "Band Manager".to_string());

    if password == "admin" {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO users (id, username, display_name, role, password_hash, active, created_at)
           VALUES (?, ?, ?, ?, ?, 1, ?)"#,
    )
    .bind(new_id())
    .bind(username)
    .bind(display_name)
    .bind(ROLE_ADMIN)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_site_settings(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO site_settings
           (id, site_title, tagline, about_text, phone, email, address, updated_at)
           VALUES (1, ?, ?, ?, ?, ?, ?, ?)
           ON CONFLICT(id) DO NOTHING"#,
    )
    .bind("Diamond Band")
    .bind("Premium Live Music Experience")
    .bind("Professional live band for all occasions")
    .bind("+1 (234) 567-890")
    .bind("info@diamondband.com")
    .bind("Available Nationwide")
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_demo_content(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing =
        sqlx::query_as::<_, (String,)>("SELECT id FROM band_members LIMIT 1")
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Ok(());
    }

    let members = [
        ("Daniel Moore", "Lead Vocalist", 1),
        ("Grace Okafor", "Keyboardist", 2),
        ("Sam Rivera", "Guitarist", 3),
        ("Leah Chen", "Drummer", 4),
    ];
    for (name, role, order) in members {
        sqlx::query(
            r#"INSERT INTO band_members (id, name, role, bio, sort_order, is_active)
               VALUES (?, ?, ?, ?, ?, 1)"#,
        )
        .bind(new_id())
        .bind(name)
        .bind(role)
        .bind(format!("{name} has been performing with the band since its first season."))
        .bind(order)
        .execute(pool)
        .await?;
    }

    let services = [
        (
            "Full Live Performance",
            "live_performance",
            "A complete live set tailored to your event.",
            "Full band\nProfessional sound\nCustom set list",
            "fa-music",
            1,
            1,
        ),
        (
            "Studio Recording",
            "studio_recording",
            "Session recording with the full lineup.",
            "Tracking\nMixing support",
            "fa-microphone",
            0,
            2,
        ),
        (
            "Sound Setup",
            "sound_setup",
            "PA and stage sound handled end to end.",
            "PA system\nStage monitors\nSound engineer",
            "fa-sliders",
            1,
            3,
        ),
    ];
    for (name, kind, short, features, icon, featured, order) in services {
        sqlx::query(
            r#"INSERT INTO services
               (id, name, service_type, description, short_description, features, icon, is_featured, sort_order)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(new_id())
        .bind(name)
        .bind(kind)
        .bind(short)
        .bind(short)
        .bind(features)
        .bind(icon)
        .bind(featured)
        .bind(order)
        .execute(pool)
        .await?;
    }

    let gallery = [
        ("Riverside Wedding", "image", "wedding", "2024-06-15", 1),
        ("Summit Gala", "video", "corporate", "2024-09-20", 1),
        ("New Year Concert", "image", "concert", "2024-12-31", 0),
    ];
    for (title, media, event, date, featured) in gallery {
        sqlx::query(
            r#"INSERT INTO gallery_items
               (id, title, media_type, event_type, event_date, is_featured, is_public, created_at)
               VALUES (?, ?, ?, ?, ?, ?, 1, ?)"#,
        )
        .bind(new_id())
        .bind(title)
        .bind(media)
        .bind(event)
        .bind(date)
        .bind(featured)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"INSERT INTO testimonials (id, client_name, quote, rating, event_type, is_featured, created_at)
           VALUES (?, ?, ?, 5, ?, 1, ?)"#,
    )
    .bind(new_id())
    .bind("Amara Johnson")
    .bind("The band made our wedding unforgettable. Every guest asked who they were.")
    .bind("Wedding")
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"INSERT INTO blog_posts
           (id, title, slug, excerpt, content, status, is_featured, published_at, created_at)
           VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)"#,
    )
    .bind(new_id())
    .bind("A New Season of Live Shows")
    .bind("a-new-season-of-live-shows")
    .bind("Dates for the coming season are open for booking.")
    .bind("We are opening our calendar for the next season of weddings, galas and concerts. Reach out early to lock in your date.")
    .bind(POST_PUBLISHED)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

#[derive(Clone, Debug)]
pub struct GalleryFilter {
    pub event_type: String,
    pub media_type: String,
    pub year: String,
}

impl GalleryFilter {
    /// Missing or blank query values mean "all" (no constraint on that axis).
    pub fn normalized(
        event_type: Option<String>,
        media_type: Option<String>,
        year: Option<String>,
    ) -> Self {
        fn axis(value: Option<String>) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => "all".to_string(),
            }
        }
        Self {
            event_type: axis(event_type),
            media_type: axis(media_type),
            year: axis(year),
        }
    }
}

pub async fn fetch_gallery_items(
    pool: &SqlitePool,
    filter: &GalleryFilter,
) -> Result<Vec<GalleryItemRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, title, description, media_type, event_type, event_date, event_location, \
         image_url, video_url, audio_url, is_featured, is_public, created_at \
         FROM gallery_items WHERE is_public = 1",
    );
    if filter.event_type != "all" {
        builder.push(" AND event_type = ").push_bind(&filter.event_type);
    }
    if filter.media_type != "all" {
        builder.push(" AND media_type = ").push_bind(&filter.media_type);
    }
    if filter.year != "all" {
        builder
            .push(" AND strftime('%Y', event_date) = ")
            .push_bind(&filter.year);
    }
    builder.push(" ORDER BY event_date DESC, created_at DESC");

    builder.build_query_as::<GalleryItemRow>().fetch_all(pool).await
}

/// Distinct years with at least one public gallery item, newest first.
pub async fn gallery_years(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT strftime('%Y', event_date) FROM gallery_items WHERE is_public = 1 ORDER BY 1 DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn published_posts(pool: &SqlitePool) -> Result<Vec<BlogPostRow>, sqlx::Error> {
    sqlx::query_as::<_, BlogPostRow>(
        r#"SELECT id, title, slug, excerpt, content, featured_image_url, status, is_featured,
                  published_at, created_at
           FROM blog_posts
           WHERE status = ?
           ORDER BY published_at DESC"#,
    )
    .bind(POST_PUBLISHED)
    .fetch_all(pool)
    .await
}

pub async fn published_post_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<BlogPostRow>, sqlx::Error> {
    sqlx::query_as::<_, BlogPostRow>(
        r#"SELECT id, title, slug, excerpt, content, featured_image_url, status, is_featured,
                  published_at, created_at
           FROM blog_posts
           WHERE slug = ? AND status = ?
           LIMIT 1"#,
    )
    .bind(slug)
    .bind(POST_PUBLISHED)
    .fetch_optional(pool)
    .await
}

pub async fn related_posts(
    pool: &SqlitePool,
    exclude_id: &str,
    limit: i64,
) -> Result<Vec<BlogPostRow>, sqlx::Error> {
    sqlx::query_as::<_, BlogPostRow>(
        r#"SELECT id, title, slug, excerpt, content, featured_image_url, status, is_featured,
                  published_at, created_at
           FROM blog_posts
           WHERE status = ? AND id != ?
           ORDER BY published_at DESC
           LIMIT ?"#,
    )
    .bind(POST_PUBLISHED)
    .bind(exclude_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Derives a slug that no other post uses, suffixing -2, -3, ... on collision.
pub async fn unique_slug(
    pool: &SqlitePool,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<String, sqlx::Error> {
    let base = if base.is_empty() { "post" } else { base };
    let mut candidate = base.to_string();
    let mut suffix = 2;
    loop {
        let taken = match exclude_id {
            Some(id) => {
                sqlx::query_as::<_, (String,)>(
                    "SELECT id FROM blog_posts WHERE slug = ? AND id != ? LIMIT 1",
                )
                .bind(&candidate)
                .bind(id)
                .fetch_optional(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, (String,)>("SELECT id FROM blog_posts WHERE slug = ? LIMIT 1")
                    .bind(&candidate)
                    .fetch_optional(pool)
                    .await?
            }
        };
        if taken.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

/// The single settings row, falling back to the seeded defaults when the row
/// has not been created yet (fresh database before seeding).
pub async fn site_settings(pool: &SqlitePool) -> SiteSettingsRow {
    sqlx::query_as::<_, SiteSettingsRow>(
        r#"SELECT id, site_title, tagline, about_text, phone, email, address,
                  facebook_url, instagram_url, youtube_url, twitter_url, updated_at
           FROM site_settings
           WHERE id = 1"#,
    )
    .fetch_optional(pool)
    .await
    .unwrap_or(None)
    .unwrap_or_else(default_site_settings)
}

pub fn default_site_settings() -> SiteSettingsRow {
    SiteSettingsRow {
        id: 1,
        site_title: "Diamond Band".to_string(),
        tagline: "Premium Live Music Experience".to_string(),
        about_text: "Professional live band for all occasions".to_string(),
        phone: "+1 (234) 567-890".to_string(),
        email: "info@diamondband.com".to_string(),
        address: "Available Nationwide".to_string(),
        facebook_url: String::new(),
        instagram_url: String::new(),
        youtube_url: String::new(),
        twitter_url: String::new(),
        updated_at: String::new(),
    }
}
