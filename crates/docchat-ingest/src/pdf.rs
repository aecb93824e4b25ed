use mupdf::TextPageFlags;
use mupdf::pdf::PdfDocument;

use crate::IngestError;

/// Extract the text of every page of an in-memory PDF.
///
/// Pages are visited in order and their text is concatenated with no
/// separator between pages. Within a page, each text line is followed by a
/// newline, matching mupdf's block/line reading order.
///
/// A file mupdf could only open by rebuilding its cross-reference table
/// (truncated or otherwise damaged) is rejected rather than partially read.
pub fn extract_pdf(data: &[u8]) -> Result<String, IngestError> {
    let document = PdfDocument::from_bytes(data).map_err(|e| IngestError::Pdf(e.to_string()))?;
    ensure_intact(&document)?;

    if document
        .needs_password()
        .map_err(|e| IngestError::Pdf(e.to_string()))?
    {
        return Err(IngestError::Pdf("document is encrypted".into()));
    }

    let mut text = String::new();

    for page_result in document
        .pages()
        .map_err(|e| IngestError::Pdf(e.to_string()))?
    {
        let page = page_result.map_err(|e| IngestError::Pdf(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| IngestError::Pdf(e.to_string()))?;

        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                text.push_str(&line_text);
                text.push('\n');
            }
        }
    }

    // Objects load lazily, so a broken xref can also surface mid-read.
    ensure_intact(&document)?;

    Ok(text)
}

/// mupdf refuses incremental saves exactly when it had to repair the file.
fn ensure_intact(document: &PdfDocument) -> Result<(), IngestError> {
    if document.can_be_saved_incrementally() {
        Ok(())
    } else {
        Err(IngestError::Pdf(
            "file is damaged or truncated (cross-reference table needed repair)".into(),
        ))
    }
}
