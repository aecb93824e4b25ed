use crate::IngestError;

/// Decode raw upload bytes as UTF-8.
pub fn extract_text(data: &[u8]) -> Result<String, IngestError> {
    let text = std::str::from_utf8(data)?;
    Ok(text.to_owned())
}
