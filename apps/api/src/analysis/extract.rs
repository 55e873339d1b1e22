//! Text extraction from submitted resume documents.
//!
//! File dispatch is on the declared content type only; bytes are never
//! sniffed. PDF goes through `pdf_extract`, DOCX is unpacked as a zip
//! archive and `word/document.xml` is walked with a streaming XML reader.

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

use crate::errors::{AnalysisError, SourceFormat};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Resume content as handed to the pipeline: either text pasted by the
/// caller or the bytes of an uploaded file.
#[derive(Debug, Clone)]
pub enum InputDocument {
    Text(String),
    File { content_type: String, bytes: Bytes },
}

/// Extracts plain text from one input document.
///
/// Pasted text is returned unchanged. Files are dispatched on their declared
/// MIME type; content-type parameters (`; charset=...`) are ignored for
/// dispatch but the original string is preserved in the unsupported-format
/// error.
pub fn extract(doc: InputDocument) -> Result<String, AnalysisError> {
    match doc {
        InputDocument::Text(content) => Ok(content),
        InputDocument::File {
            content_type,
            bytes,
        } => {
            let essence = content_type.split(';').next().unwrap_or("").trim();
            match essence {
                PDF_MIME => extract_pdf(&bytes),
                DOCX_MIME => extract_docx(&bytes),
                _ => Err(AnalysisError::UnsupportedFormat(content_type)),
            }
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AnalysisError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| AnalysisError::CorruptDocument {
        format: SourceFormat::Pdf,
        reason: format!("failed to extract text: {}", e),
    })
}

/// Decompressed ceiling for `word/document.xml`. The request body limit
/// bounds the compressed upload only; inflation is bounded here.
const MAX_DOCUMENT_XML_BYTES: u64 = 4 * 1024 * 1024;

fn extract_docx(bytes: &[u8]) -> Result<String, AnalysisError> {
    let corrupt = |reason: String| AnalysisError::CorruptDocument {
        format: SourceFormat::Docx,
        reason,
    };

    let cursor = Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| corrupt(format!("not a zip archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| corrupt(format!("missing word/document.xml: {}", e)))?
        .take(MAX_DOCUMENT_XML_BYTES + 1)
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(format!("unreadable word/document.xml: {}", e)))?;
    if xml.len() as u64 > MAX_DOCUMENT_XML_BYTES {
        return Err(corrupt(format!(
            "word/document.xml exceeds {} bytes decompressed",
            MAX_DOCUMENT_XML_BYTES
        )));
    }

    document_xml_to_text(&xml).map_err(corrupt)
}

/// Walks the WordprocessingML body and flattens it to plain text.
///
/// Text lives in `w:t` elements; paragraph ends become newlines, explicit
/// breaks (`w:br`) newlines, and tab runs (`w:tab`) tab characters. Tab stop
/// definitions under `w:tabs` reuse the `tab` element name and are skipped.
fn document_xml_to_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;
    let mut in_tab_stops = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tabs" => in_tab_stops = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"br" => out.push('\n'),
                b"tab" if !in_tab_stops => out.push('\t'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| format!("invalid document XML: {}", e))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("invalid document XML: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn file_doc(content_type: &str, bytes: impl Into<Bytes>) -> InputDocument {
        InputDocument::File {
            content_type: content_type.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Builds an in-memory DOCX containing the given document.xml body.
    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body>
</w:document>"#,
            body
        );

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        cursor.into_inner()
    }

    /// Builds a single-page PDF with one text run, computing the xref table
    /// from the assembled object offsets.
    fn pdf_with_text(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }
        let xref_start = pdf.len();
        pdf.push_str(&format!(
            "xref\n0 {}\n0000000000 65535 f \n",
            objects.len() + 1
        ));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        pdf.into_bytes()
    }

    #[test]
    fn test_pasted_text_passes_through_unchanged() {
        let text = "  resume body, spacing preserved \n".to_string();
        let extracted = extract(InputDocument::Text(text.clone())).unwrap();
        assert_eq!(extracted, text);
    }

    #[test]
    fn test_pdf_text_extracted() {
        let doc = file_doc(PDF_MIME, pdf_with_text("Senior Rust engineer, nine years"));
        let text = extract(doc).unwrap();
        assert!(text.contains("Senior Rust engineer"), "got: {:?}", text);
    }

    #[test]
    fn test_docx_paragraphs_become_newlines() {
        let doc = file_doc(
            DOCX_MIME,
            docx_with_body(
                "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
                 <w:p><w:r><w:t>Platform Engineer</w:t></w:r></w:p>",
            ),
        );
        assert_eq!(extract(doc).unwrap(), "Jane Doe\nPlatform Engineer\n");
    }

    #[test]
    fn test_docx_breaks_and_tabs() {
        let doc = file_doc(
            DOCX_MIME,
            docx_with_body(
                "<w:p><w:r><w:t>Rust</w:t><w:tab/><w:t>Tokio</w:t><w:br/><w:t>Axum</w:t></w:r></w:p>",
            ),
        );
        assert_eq!(extract(doc).unwrap(), "Rust\tTokio\nAxum\n");
    }

    #[test]
    fn test_docx_tab_stop_definitions_ignored() {
        let doc = file_doc(
            DOCX_MIME,
            docx_with_body(
                "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
                 <w:r><w:t>Skills</w:t></w:r></w:p>",
            ),
        );
        assert_eq!(extract(doc).unwrap(), "Skills\n");
    }

    #[test]
    fn test_docx_entities_unescaped() {
        let doc = file_doc(
            DOCX_MIME,
            docx_with_body("<w:p><w:r><w:t>C&amp;C++ &lt;intern&gt;</w:t></w:r></w:p>"),
        );
        assert_eq!(extract(doc).unwrap(), "C&C++ <intern>\n");
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let err = extract(file_doc("text/plain", &b"hello"[..])).unwrap_err();
        match err {
            AnalysisError::UnsupportedFormat(mime) => assert_eq!(mime, "text/plain"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        let with_param = format!("{}; charset=utf-8", DOCX_MIME);
        let doc = file_doc(&with_param, docx_with_body("<w:p><w:r><w:t>ok</w:t></w:r></w:p>"));
        assert!(extract(doc).is_ok());
    }

    #[test]
    fn test_garbage_pdf_is_corrupt() {
        let err = extract(file_doc(PDF_MIME, &b"definitely not a pdf"[..])).unwrap_err();
        match err {
            AnalysisError::CorruptDocument { format, .. } => {
                assert_eq!(format, SourceFormat::Pdf)
            }
            other => panic!("expected CorruptDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_docx_upload_is_corrupt() {
        let err = extract(file_doc(DOCX_MIME, Bytes::new())).unwrap_err();
        assert!(matches!(err, AnalysisError::CorruptDocument { .. }));
    }

    #[test]
    fn test_oversized_document_xml_is_corrupt() {
        // A few KiB compressed, inflating past the decompressed ceiling.
        let filler = "x".repeat(MAX_DOCUMENT_XML_BYTES as usize + 1024);
        let body = format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", filler);
        let err = extract(file_doc(DOCX_MIME, docx_with_body(&body))).unwrap_err();
        match err {
            AnalysisError::CorruptDocument { format, reason } => {
                assert_eq!(format, SourceFormat::Docx);
                assert!(reason.contains("decompressed"), "reason: {}", reason);
            }
            other => panic!("expected CorruptDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_zip_without_document_xml_is_corrupt() {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("unrelated.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nothing here").unwrap();
        writer.finish().unwrap();

        let err = extract(file_doc(DOCX_MIME, cursor.into_inner())).unwrap_err();
        match err {
            AnalysisError::CorruptDocument { format, reason } => {
                assert_eq!(format, SourceFormat::Docx);
                assert!(reason.contains("word/document.xml"));
            }
            other => panic!("expected CorruptDocument, got {:?}", other),
        }
    }
}
