use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::models::selected_file::SelectedFile;

/// `data:` URL of a selected file, shown by the crop tool while it is open
pub fn preview_data_url(file: &SelectedFile) -> String {
    format!(
        "data:{};base64,{}",
        file.content_type,
        STANDARD.encode(&file.bytes)
    )
}
