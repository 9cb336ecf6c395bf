use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::testimonial::PersistedTestimonial;

/// Testimonial response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialDto {
    pub id: i64,
    pub name: String,
    pub quote: String,
    pub course: String,
    pub stars: u8,
    pub avatar_url: Option<String>,
    /// Shown in place of a missing or broken avatar
    pub initials: String,
    pub drawing_urls: Vec<String>,
    pub drawing_titles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PersistedTestimonial> for TestimonialDto {
    fn from(testimonial: PersistedTestimonial) -> Self {
        let initials = testimonial.initials();
        Self {
            id: testimonial.id,
            name: testimonial.name,
            quote: testimonial.quote,
            course: testimonial.course,
            stars: testimonial.stars,
            avatar_url: testimonial.avatar_url,
            initials,
            drawing_urls: testimonial.drawing_urls,
            drawing_titles: testimonial.drawing_titles,
            created_at: testimonial.created_at,
        }
    }
}
