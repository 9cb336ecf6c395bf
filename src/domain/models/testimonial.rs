use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::selected_file::SelectedFile;

/// Course option that asks for a free-text course name
pub const OTHER_COURSE: &str = "Other";
pub const DEFAULT_COURSE: &str = "Watercolor";
pub const DEFAULT_STARS: u8 = 5;

/// Testimonial being edited in the submission form
#[derive(Debug, Clone, PartialEq)]
pub struct TestimonialDraft {
    pub name: String,
    pub quote: String,
    /// Selected course option
    pub course: String,
    /// Free-text course, used when `course` is "Other"
    pub custom_course: String,
    pub stars: u8,
    pub profile_image: Option<SelectedFile>,
    /// Drawings in selection order
    pub drawing_files: Vec<DrawingFile>,
    /// One title per drawing, matched by index
    pub drawing_titles: Vec<String>,
}

impl Default for TestimonialDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            quote: String::new(),
            course: DEFAULT_COURSE.to_string(),
            custom_course: String::new(),
            stars: DEFAULT_STARS,
            profile_image: None,
            drawing_files: Vec::new(),
            drawing_titles: Vec::new(),
        }
    }
}

impl TestimonialDraft {
    /// Course that will be stored, resolving the "Other" option
    pub fn resolved_course(&self) -> String {
        if self.course == OTHER_COURSE {
            self.custom_course.trim().to_string()
        } else {
            self.course.trim().to_string()
        }
    }

    /// Check every precondition of a submission
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError("Please enter your name.".to_string()));
        }

        if self.quote.trim().is_empty() {
            return Err(DomainError::ValidationError("Please enter your review.".to_string()));
        }

        if self.resolved_course().is_empty() {
            let message = if self.course == OTHER_COURSE {
                "Please enter your custom drawing type."
            } else {
                "Please choose a course."
            };
            return Err(DomainError::ValidationError(message.to_string()));
        }

        if !(1..=5).contains(&self.stars) {
            return Err(DomainError::ValidationError(format!(
                "Rating must be between 1 and 5 stars, got {}",
                self.stars
            )));
        }

        if !self.drawing_files.is_empty() {
            let has_empty = self.drawing_titles.iter().any(|title| title.trim().is_empty());
            if has_empty || self.drawing_titles.len() != self.drawing_files.len() {
                return Err(DomainError::ValidationError(
                    "Please enter a name for each uploaded drawing.".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Titles as they will be stored
    pub fn trimmed_titles(&self) -> Vec<String> {
        self.drawing_titles
            .iter()
            .map(|title| title.trim().to_string())
            .collect()
    }
}

/// Row written to the `testimonials` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTestimonial {
    pub name: String,
    pub quote: String,
    pub course: String,
    pub stars: u8,
    pub avatar_url: Option<String>,
    pub drawing_urls: Vec<String>,
    pub drawing_titles: Vec<String>,
}

/// Testimonial as confirmed by the content store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTestimonial {
    pub id: i64,
    pub name: String,
    pub quote: String,
    pub course: String,
    pub stars: u8,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub drawing_urls: Vec<String>,
    #[serde(default)]
    pub drawing_titles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PersistedTestimonial {
    /// Initials shown when there is no avatar
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Up to two upper-case initials for a display name ("U" when empty)
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => "U".to_string(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let mut result = String::new();
            result.extend(first.chars().next());
            result.extend(last.chars().next());
            result.to_uppercase()
        }
    }
}
