use axum::extract::Multipart;
use docchat_core::{Controller, UploadedFile};

/// Pull the `file` part out of a multipart upload.
///
/// The part's declared content type selects the extractor. Browsers send
/// `application/octet-stream` (or nothing) for types they don't know, in
/// which case the type is guessed from the file name.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, String> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.txt").to_string();
                let declared = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                let mime = match declared {
                    Some(m) if !m.is_empty() && m != "application/octet-stream" => m,
                    _ => Controller::declared_mime_for(&filename).to_string(),
                };

                file = Some(UploadedFile {
                    name: filename,
                    mime,
                    data,
                });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "No file uploaded".to_string())
}
