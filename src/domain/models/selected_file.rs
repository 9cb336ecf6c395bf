use bytes::Bytes;

/// A file picked by the user, as received from the file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name, including its extension
    pub name: String,
    /// MIME type reported by the picker (or guessed from the name)
    pub content_type: String,
    /// Raw file contents
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Create a new SelectedFile, guessing the content type from the name when none is given
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        Self {
            name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Whether the picker reported an `image/*` type
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// File name without its final extension, used as the default drawing title
    pub fn default_title(&self) -> String {
        match self.name.rfind('.') {
            Some(index) if index > 0 => self.name[..index].to_string(),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectedFile;

    #[test]
    fn default_title_strips_only_the_last_extension() {
        let file = SelectedFile::new("sunset.final.png", None, vec![1, 2, 3]);
        assert_eq!(file.default_title(), "sunset.final");

        let no_extension = SelectedFile::new("sketch", None, Vec::new());
        assert_eq!(no_extension.default_title(), "sketch");

        let hidden = SelectedFile::new(".png", None, Vec::new());
        assert_eq!(hidden.default_title(), ".png");
    }

    #[test]
    fn content_type_is_guessed_from_the_name() {
        let file = SelectedFile::new("portrait.JPG", None, Vec::new());
        assert_eq!(file.content_type, "image/jpeg");
        assert!(file.is_image());

        let explicit = SelectedFile::new("blob", Some("image/webp".to_string()), Vec::new());
        assert_eq!(explicit.content_type, "image/webp");
    }
}
