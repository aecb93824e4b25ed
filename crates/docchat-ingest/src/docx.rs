//! DOCX paragraph extraction.
//!
//! A `.docx` file is a zip container; the body text lives in
//! `word/document.xml`. Only paragraphs that are direct children of
//! `<w:body>` are read, so table cells, headers and text boxes are not part
//! of the output.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::IngestError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body paragraphs from an in-memory DOCX container, each followed by `\n`.
pub fn extract_docx(data: &[u8]) -> Result<String, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| IngestError::Docx(format!("not a DOCX container: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::Docx(format!("missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Docx(format!("failed to read {}: {}", DOCUMENT_PART, e)))?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    // Local names of the currently open elements.
    let mut stack: Vec<String> = Vec::new();
    // Stack depth at which the open body paragraph started.
    let mut paragraph: Option<usize> = None;
    let mut current = String::new();
    let mut out = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = local_name(e.local_name().as_ref());
                if tag == "p" && paragraph.is_none() && parent_is(&stack, "body") {
                    paragraph = Some(stack.len());
                    current.clear();
                }
                stack.push(tag);
            }
            Ok(Event::Empty(ref e)) => {
                let tag = local_name(e.local_name().as_ref());
                if tag == "p" && paragraph.is_none() && parent_is(&stack, "body") {
                    // <w:p/> is an empty paragraph
                    out.push('\n');
                } else if parent_is(&stack, "r") && in_own_paragraph(&stack, paragraph) {
                    match tag.as_str() {
                        "tab" => current.push('\t'),
                        "br" | "cr" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if parent_is(&stack, "t") && in_own_paragraph(&stack, paragraph) {
                    let text = e
                        .unescape()
                        .map_err(|err| IngestError::Docx(format!("bad text escape: {}", err)))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
                if paragraph == Some(stack.len()) {
                    out.push_str(&current);
                    out.push('\n');
                    current.clear();
                    paragraph = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::Docx(format!(
                    "malformed {} at byte {}: {}",
                    DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(out)
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn parent_is(stack: &[String], tag: &str) -> bool {
    stack.last().is_some_and(|t| t == tag)
}

/// True when inside the open body paragraph and not inside a paragraph
/// nested within it (text boxes carry their own `<w:p>` elements).
fn in_own_paragraph(stack: &[String], paragraph: Option<usize>) -> bool {
    match paragraph {
        Some(depth) => stack
            .get(depth + 1..)
            .is_some_and(|inner| inner.iter().all(|t| t != "p")),
        None => false,
    }
}
