use bytes::Bytes;

use crate::domain::models::crop::CroppedFile;
use crate::domain::models::selected_file::SelectedFile;

/// A drawing ready for upload: either the cropped output of the queue or,
/// with cropping disabled, the file exactly as selected
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingFile {
    Original(SelectedFile),
    Cropped(CroppedFile),
}

impl DrawingFile {
    pub fn name(&self) -> &str {
        match self {
            DrawingFile::Original(file) => &file.name,
            DrawingFile::Cropped(file) => &file.name,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            DrawingFile::Original(file) => &file.content_type,
            DrawingFile::Cropped(file) => &file.content_type,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        match self {
            DrawingFile::Original(file) => &file.bytes,
            DrawingFile::Cropped(file) => &file.bytes,
        }
    }
}

impl From<SelectedFile> for DrawingFile {
    fn from(file: SelectedFile) -> Self {
        DrawingFile::Original(file)
    }
}

impl From<CroppedFile> for DrawingFile {
    fn from(file: CroppedFile) -> Self {
        DrawingFile::Cropped(file)
    }
}
