use serde::{Deserialize, Serialize};

use crate::domain::models::testimonial::{DEFAULT_STARS, PersistedTestimonial};

/// One drawing shown in the gallery, taken from a testimonial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub src: String,
    pub title: String,
    pub student_name: String,
    pub course: String,
    pub stars: u8,
    pub quote: String,
}

/// Flatten testimonials into gallery items, keeping testimonial then drawing order
pub fn gallery_items(testimonials: &[PersistedTestimonial]) -> Vec<GalleryItem> {
    testimonials
        .iter()
        .flat_map(|testimonial| {
            testimonial
                .drawing_urls
                .iter()
                .enumerate()
                .map(move |(index, url)| GalleryItem {
                    src: url.clone(),
                    title: testimonial
                        .drawing_titles
                        .get(index)
                        .filter(|title| !title.is_empty())
                        .cloned()
                        .unwrap_or_else(|| format!("Drawing {}", index + 1)),
                    student_name: non_empty_or(&testimonial.name, "Student"),
                    course: non_empty_or(&testimonial.course, "Artwork"),
                    stars: if testimonial.stars == 0 {
                        DEFAULT_STARS
                    } else {
                        testimonial.stars
                    },
                    quote: testimonial.quote.clone(),
                })
        })
        .collect()
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
