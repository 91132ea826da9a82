use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::models::{
    is_valid_choice, BOOKING_EVENT_TYPES, CONTACT_SUBJECTS, GALLERY_EVENT_TYPES, MEDIA_TYPES,
    POST_DRAFT, POST_PUBLISHED,
};

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation outcome keyed by originating field, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub fields: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

fn required(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) -> String {
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.push(field, "This field is required.");
    } else if value.chars().count() > max {
        errors.push(field, format!("Ensure this value has at most {max} characters."));
    }
    value
}

fn optional(errors: &mut FormErrors, field: &'static str, value: &Option<String>, max: usize) -> String {
    let value = value.as_deref().unwrap_or_default().trim().to_string();
    if value.chars().count() > max {
        errors.push(field, format!("Ensure this value has at most {max} characters."));
    }
    value
}

fn valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn parse_date(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => {
            errors.push(field, "Enter a valid date.");
            String::new()
        }
    }
}

fn parse_time(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    let parsed = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"));
    match parsed {
        Ok(time) => time.format("%H:%M").to_string(),
        Err(_) => {
            errors.push(field, "Enter a valid time.");
            String::new()
        }
    }
}

pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_company: Option<String>,
    pub event_type: String,
    pub event_title: String,
    pub event_date: String,
    pub event_start_time: String,
    pub event_end_time: String,
    pub event_location: String,
    pub expected_guests: String,
    pub service_requested: String,
    pub special_requirements: Option<String>,
    pub budget_range: Option<String>,
    pub how_heard_about_us: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingInput {
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
}

impl BookingForm {
    pub fn validate(&self) -> Result<BookingInput, FormErrors> {
        let mut errors = FormErrors::default();

        let client_name = required(&mut errors, "client_name", &self.client_name, 200);
        let client_email = required(&mut errors, "client_email", &self.client_email, 254);
        if !client_email.is_empty() && !valid_email(&client_email) {
            errors.push("client_email", "Enter a valid email address.");
        }
        let client_phone = required(&mut errors, "client_phone", &self.client_phone, 20);
        let client_company = optional(&mut errors, "client_company", &self.client_company, 200);

        let event_type = required(&mut errors, "event_type", &self.event_type, 20);
        if !event_type.is_empty() && !is_valid_choice(BOOKING_EVENT_TYPES, &event_type) {
            errors.push("event_type", "Select a valid choice.");
        }
        let event_title = required(&mut errors, "event_title", &self.event_title, 200);
        let event_date = required(&mut errors, "event_date", &self.event_date, 10);
        let event_date = if event_date.is_empty() {
            event_date
        } else {
            parse_date(&mut errors, "event_date", &event_date)
        };
        let event_start_time = required(&mut errors, "event_start_time", &self.event_start_time, 8);
        let event_start_time = if event_start_time.is_empty() {
            event_start_time
        } else {
            parse_time(&mut errors, "event_start_time", &event_start_time)
        };
        let event_end_time = required(&mut errors, "event_end_time", &self.event_end_time, 8);
        let event_end_time = if event_end_time.is_empty() {
            event_end_time
        } else {
            parse_time(&mut errors, "event_end_time", &event_end_time)
        };
        let event_location = required(&mut errors, "event_location", &self.event_location, 1000);

        let guests_raw = required(&mut errors, "expected_guests", &self.expected_guests, 10);
        let expected_guests = if guests_raw.is_empty() {
            0
        } else {
            match guests_raw.parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    errors.push("expected_guests", "Enter a whole number greater than zero.");
                    0
                }
            }
        };

        let service_requested = required(&mut errors, "service_requested", &self.service_requested, 4000);
        let special_requirements =
            optional(&mut errors, "special_requirements", &self.special_requirements, 4000);
        let budget_range = optional(&mut errors, "budget_range", &self.budget_range, 100);
        let how_heard_about_us =
            optional(&mut errors, "how_heard_about_us", &self.how_heard_about_us, 200);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookingInput {
            client_name,
            client_email,
            client_phone,
            client_company,
            event_type,
            event_title,
            event_date,
            event_start_time,
            event_end_time,
            event_location,
            expected_guests,
            service_requested,
            special_requirements,
            budget_range,
            how_heard_about_us,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactInput, FormErrors> {
        let mut errors = FormErrors::default();

        let name = required(&mut errors, "name", &self.name, 200);
        let email = required(&mut errors, "email", &self.email, 254);
        if !email.is_empty() && !valid_email(&email) {
            errors.push("email", "Enter a valid email address.");
        }
        let phone = optional(&mut errors, "phone", &self.phone, 20);
        let subject = required(&mut errors, "subject", &self.subject, 20);
        if !subject.is_empty() && !is_valid_choice(CONTACT_SUBJECTS, &subject) {
            errors.push("subject", "Select a valid choice.");
        }
        let message = required(&mut errors, "message", &self.message, 8000);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactInput {
            name,
            email,
            phone,
            subject,
            message,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogPostForm {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub featured_image_url: Option<String>,
    pub status: String,
    pub is_featured: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlogPostInput {
    pub title: String,
    /// Slugified, pre-uniqueness. Derived from the title when the slug box was left blank.
    pub slug_base: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image_url: String,
    pub status: String,
    pub is_featured: bool,
    pub published_at: String,
}

impl BlogPostForm {
    pub fn validate(&self) -> Result<BlogPostInput, FormErrors> {
        let mut errors = FormErrors::default();

        let title = required(&mut errors, "title", &self.title, 200);
        let excerpt = required(&mut errors, "excerpt", &self.excerpt, 300);
        let content = required(&mut errors, "content", &self.content, 100_000);
        let featured_image_url =
            optional(&mut errors, "featured_image_url", &self.featured_image_url, 500);

        let status = required(&mut errors, "status", &self.status, 20);
        if !status.is_empty() && status != POST_DRAFT && status != POST_PUBLISHED {
            errors.push("status", "Select a valid choice.");
        }

        let slug_raw = self.slug.as_deref().unwrap_or_default().trim();
        let slug_base = if slug_raw.is_empty() {
            slugify(&title)
        } else {
            slugify(slug_raw)
        };

        // Accepts the datetime-local widget, a bare date, and the stored
        // value round-tripped through the edit form.
        let published_raw = self.published_at.as_deref().unwrap_or_default().trim();
        let published_at = if published_raw.is_empty() {
            Utc::now().to_rfc3339()
        } else if chrono::DateTime::parse_from_rfc3339(published_raw).is_ok() {
            published_raw.to_string()
        } else if let Ok(dt) = NaiveDateTime::parse_from_str(published_raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(published_raw, "%Y-%m-%dT%H:%M"))
        {
            dt.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else if let Ok(date) = NaiveDate::parse_from_str(published_raw, "%Y-%m-%d") {
            format!("{}T00:00:00", date.format("%Y-%m-%d"))
        } else {
            errors.push("published_at", "Enter a valid date.");
            String::new()
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BlogPostInput {
            title,
            slug_base,
            excerpt,
            content,
            featured_image_url,
            status,
            is_featured: self.is_featured.is_some(),
            published_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryItemForm {
    pub title: String,
    pub description: Option<String>,
    pub media_type: String,
    pub event_type: String,
    pub event_date: String,
    pub event_location: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub is_featured: Option<String>,
    pub is_public: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GalleryItemInput {
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub event_type: String,
    pub event_date: String,
    pub event_location: String,
    pub image_url: String,
    pub video_url: String,
    pub audio_url: String,
    pub is_featured: bool,
    pub is_public: bool,
}

impl GalleryItemForm {
    pub fn validate(&self) -> Result<GalleryItemInput, FormErrors> {
        let mut errors = FormErrors::default();

        let title = required(&mut errors, "title", &self.title, 100);
        let description = optional(&mut errors, "description", &self.description, 4000);
        let media_type = required(&mut errors, "media_type", &self.media_type, 10);
        if !media_type.is_empty() && !is_valid_choice(MEDIA_TYPES, &media_type) {
            errors.push("media_type", "Select a valid choice.");
        }
        let event_type = required(&mut errors, "event_type", &self.event_type, 20);
        if !event_type.is_empty() && !is_valid_choice(GALLERY_EVENT_TYPES, &event_type) {
            errors.push("event_type", "Select a valid choice.");
        }
        let event_date = required(&mut errors, "event_date", &self.event_date, 10);
        let event_date = if event_date.is_empty() {
            event_date
        } else {
            parse_date(&mut errors, "event_date", &event_date)
        };
        let event_location = optional(&mut errors, "event_location", &self.event_location, 200);
        let image_url = optional(&mut errors, "image_url", &self.image_url, 500);
        let video_url = optional(&mut errors, "video_url", &self.video_url, 500);
        let audio_url = optional(&mut errors, "audio_url", &self.audio_url, 500);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(GalleryItemInput {
            title,
            description,
            media_type,
            event_type,
            event_date,
            event_location,
            image_url,
            video_url,
            audio_url,
            is_featured: self.is_featured.is_some(),
            is_public: self.is_public.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_booking() -> BookingForm {
        BookingForm {
            client_name: "Test Client".into(),
            client_email: "test@example.com".into(),
            client_phone: "+1234567890".into(),
            client_company: None,
            event_type: "wedding".into(),
            event_title: "Test Wedding Event".into(),
            event_date: "2026-12-25".into(),
            event_start_time: "18:00".into(),
            event_end_time: "22:00".into(),
            event_location: "Test Venue, City".into(),
            expected_guests: "150".into(),
            service_requested: "Full band performance with sound system".into(),
            special_requirements: Some("Outdoor stage".into()),
            budget_range: Some("$5000-$10000".into()),
            how_heard_about_us: Some("social_media".into()),
        }
    }

    #[test]
    fn booking_accepts_valid_submission() {
        let input = valid_booking().validate().expect("should validate");
        assert_eq!(input.expected_guests, 150);
        assert_eq!(input.event_start_time, "18:00");
        assert_eq!(input.client_company, "");
    }

    #[test]
    fn booking_reports_missing_required_field() {
        let mut form = valid_booking();
        form.client_name = "  ".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("client_name"), Some("This field is required."));
        assert!(!errors.has("client_email"));
    }

    #[test]
    fn booking_rejects_bad_email_and_guest_count() {
        let mut form = valid_booking();
        form.client_email = "not-an-address".into();
        form.expected_guests = "many".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("client_email"));
        assert!(errors.has("expected_guests"));
        assert_eq!(errors.fields.len(), 2);
    }

    #[test]
    fn booking_rejects_unknown_event_type() {
        let mut form = valid_booking();
        form.event_type = "rave".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("event_type"), Some("Select a valid choice."));
    }

    #[test]
    fn booking_accepts_seconds_in_time() {
        let mut form = valid_booking();
        form.event_start_time = "18:30:00".into();
        let input = form.validate().unwrap();
        assert_eq!(input.event_start_time, "18:30");
    }

    #[test]
    fn contact_requires_known_subject() {
        let form = ContactForm {
            name: "A Person".into(),
            email: "person@example.com".into(),
            phone: None,
            subject: "complaints".into(),
            message: "Hello there".into(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("subject"));
    }

    #[test]
    fn blog_post_derives_slug_from_title_when_blank() {
        let form = BlogPostForm {
            title: "Our First Show!".into(),
            slug: Some("   ".into()),
            excerpt: "First show recap".into(),
            content: "It went great.".into(),
            status: "published".into(),
            ..Default::default()
        };
        let input = form.validate().unwrap();
        assert_eq!(input.slug_base, "our-first-show");
    }

    #[test]
    fn blog_post_accepts_stored_publish_date_on_edit() {
        let form = BlogPostForm {
            title: "Tour Diary".into(),
            excerpt: "Notes from the road".into(),
            content: "Long drive, great crowd.".into(),
            status: "draft".into(),
            published_at: Some("2025-06-01T00:00:00+00:00".into()),
            ..Default::default()
        };
        let input = form.validate().unwrap();
        assert_eq!(input.published_at, "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Hello,  World!"), "hello-world");
        assert_eq!(slugify("--Already--Slugged--"), "already-slugged");
        assert_eq!(slugify("***"), "");
    }
}
