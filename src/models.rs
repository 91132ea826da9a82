use serde::Serialize;

pub const ROLE_ADMIN: &str = "admin";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_COMPLETED: &str = "completed";

pub const POST_DRAFT: &str = "draft";
pub const POST_PUBLISHED: &str = "published";

pub type Choice = (&'static str, &'static str);

pub const BOOKING_STATUSES: &[Choice] = &[
    (STATUS_PENDING, "Pending"),
    (STATUS_CONFIRMED, "Confirmed"),
    (STATUS_CANCELLED, "Cancelled"),
    (STATUS_COMPLETED, "Completed"),
];

pub const BOOKING_EVENT_TYPES: &[Choice] = &[
    ("wedding", "Wedding"),
    ("corporate", "Corporate Event"),
    ("party", "Private Party"),
    ("ceremony", "Official Ceremony"),
    ("concert", "Concert/Show"),
    ("festival", "Festival"),
    ("other", "Other"),
];

pub const GALLERY_EVENT_TYPES: &[Choice] = &[
    ("wedding", "Wedding"),
    ("corporate", "Corporate Event"),
    ("concert", "Concert"),
    ("ceremony", "Official Ceremony"),
    ("party", "Party"),
    ("festival", "Festival"),
    ("other", "Other"),
];

pub const MEDIA_TYPES: &[Choice] = &[
    ("image", "Image"),
    ("video", "Video"),
    ("audio", "Audio"),
];

pub const CONTACT_SUBJECTS: &[Choice] = &[
    ("general", "General Inquiry"),
    ("booking", "Booking Inquiry"),
    ("collaboration", "Collaboration"),
    ("media", "Media/Press"),
    ("feedback", "Feedback"),
    ("other", "Other"),
];

pub const SERVICE_TYPES: &[Choice] = &[
    ("live_performance", "Live Performance"),
    ("studio_recording", "Studio Recording"),
    ("carpet_band", "Carpet Band"),
    ("sound_setup", "Sound Setup"),
];

pub fn is_valid_choice(choices: &[Choice], value: &str) -> bool {
    choices.iter().any(|(v, _)| *v == value)
}

pub fn choice_label(choices: &[Choice], value: &str) -> String {
    choices
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| value.to_string())
}

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub password_hash: String,
    pub active: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BandMemberRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: String,
    pub instagram: String,
    pub facebook: String,
    pub twitter: String,
    pub sort_order: i64,
    pub is_active: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    pub service_type: String,
    pub description: String,
    pub short_description: String,
    pub price_range: String,
    pub duration: String,
    pub features: String,
    pub icon: String,
    pub image_url: String,
    pub is_featured: i64,
    pub sort_order: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GalleryItemRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub event_type: String,
    pub event_date: String,
    pub event_location: String,
    pub image_url: String,
    pub video_url: String,
    pub audio_url: String,
    pub is_featured: i64,
    pub is_public: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingInquiryRow {
    pub id: String,
    pub reference: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_company: String,
    pub event_type: String,
    pub event_title: String,
    pub event_date: String,
    pub event_start_time: String,
    pub event_end_time: String,
    pub event_location: String,
    pub expected_guests: i64,
    pub service_requested: String,
    pub special_requirements: String,
    pub budget_range: String,
    pub how_heard_about_us: String,
    pub status: String,
    pub admin_notes: String,
    pub quoted_price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactMessageRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub is_read: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image_url: String,
    pub status: String,
    pub is_featured: i64,
    pub published_at: String,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TestimonialRow {
    pub id: String,
    pub client_name: String,
    pub client_company: String,
    pub quote: String,
    pub rating: i64,
    pub event_type: String,
    pub event_date: String,
    pub is_featured: i64,
    pub created_at: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SiteSettingsRow {
    pub id: i64,
    pub site_title: String,
    pub tagline: String,
    pub about_text: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub twitter_url: String,
    pub updated_at: String,
}

/// JSON shape answered by the gallery filter endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryItemJson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub event_type: String,
    pub event_date: String,
    pub image_url: String,
    pub video_url: String,
}

impl GalleryItemJson {
    pub fn from_row(row: &GalleryItemRow) -> Self {
        Self {
            id: row.id.clone(),
            title: row.title.clone(),
            description: row.description.clone(),
            media_type: row.media_type.clone(),
            event_type: choice_label(GALLERY_EVENT_TYPES, &row.event_type),
            event_date: row.event_date.clone(),
            image_url: row.image_url.clone(),
            video_url: row.video_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_label_falls_back_to_raw_value() {
        assert_eq!(choice_label(MEDIA_TYPES, "video"), "Video");
        assert_eq!(choice_label(MEDIA_TYPES, "hologram"), "hologram");
    }

    #[test]
    fn choice_membership() {
        assert!(is_valid_choice(BOOKING_EVENT_TYPES, "wedding"));
        assert!(!is_valid_choice(BOOKING_EVENT_TYPES, "Wedding"));
    }
}
