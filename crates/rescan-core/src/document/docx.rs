//! DOCX text extraction from the WordprocessingML part of the ZIP container.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use super::DocumentDecoder;
use crate::error::{DocumentError, Result};
use crate::models::config::DocumentConfig;
use crate::models::document::{DecodedText, DocumentKind};

const DOCUMENT_PART: &str = "word/document.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const HYPERLINK_TYPE_SUFFIX: &str = "/hyperlink";
/// Largest uncompressed part read from the container.
const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;

/// DOCX decoder: one line per paragraph, hyperlink targets appended.
pub struct DocxDecoder {
    config: DocumentConfig,
}

impl DocxDecoder {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }
}

impl Default for DocxDecoder {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl DocumentDecoder for DocxDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedText> {
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(docx_error)?;

        let xml = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| DocumentError::Docx(format!("missing {}", DOCUMENT_PART)))?;
        let mut text = paragraphs_text(&xml)?;

        if self.config.append_hyperlinks {
            if let Some(rels) = read_part(&mut archive, RELS_PART)? {
                let links = hyperlink_targets(&rels)?;
                if !links.is_empty() {
                    debug!("Appending {} hyperlink targets", links.len());
                    text.push('\n');
                    text.push_str(&links.join("\n"));
                }
            }
        }

        Ok(DecodedText::new(text, false))
    }
}

fn docx_error(e: impl std::fmt::Display) -> DocumentError {
    DocumentError::Docx(e.to_string())
}

/// Read a part of the container; `None` when it does not exist.
fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<String>> {
    read_part_limited(archive, name, MAX_PART_BYTES)
}

fn read_part_limited(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
    limit: u64,
) -> Result<Option<String>> {
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(docx_error(e).into()),
    };

    let mut bytes = Vec::new();
    file.take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(docx_error)?;
    if bytes.len() as u64 > limit {
        return Err(DocumentError::Docx(format!("{} exceeds {} bytes", name, limit)).into());
    }

    let content = String::from_utf8(bytes).map_err(docx_error)?;
    Ok(Some(content))
}

/// Paragraph text joined with newlines; `w:tab` becomes a tab, `w:br` and `w:cr` a newline.
fn paragraphs_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(docx_error)?),
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

/// External hyperlink targets declared in the document relationships.
fn hyperlink_targets(rels: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(rels);
    let mut targets = Vec::new();

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let kind = attribute(&e, "Type")?.unwrap_or_default();
                let mode = attribute(&e, "TargetMode")?.unwrap_or_default();
                if kind.ends_with(HYPERLINK_TYPE_SUFFIX) && mode == "External" {
                    if let Some(target) = attribute(&e, "Target")? {
                        targets.push(target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let Some(attr) = element.try_get_attribute(name).map_err(docx_error)? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(docx_error)?;
    Ok(Some(value.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Smith</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Email:</w:t><w:tab/><w:t>jane&amp;co@example.com</w:t></w:r></w:p>
    <w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://www.linkedin.com/in/jane-smith" TargetMode="External"/>
</Relationships>"#;

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_and_runs() {
        let text = paragraphs_text(BODY).unwrap();
        assert_eq!(
            text,
            "Jane Smith\n\nEmail:\tjane&co@example.com\nLine one\nLine two"
        );
    }

    #[test]
    fn test_decode_appends_hyperlinks() {
        let data = build_docx(&[(DOCUMENT_PART, BODY), (RELS_PART, RELS)]);
        let decoded = DocxDecoder::default().decode(&data).unwrap();

        assert!(!decoded.ocr_used);
        assert!(decoded.text.starts_with("Jane Smith\n"));
        assert!(decoded.text.ends_with("\nhttps://www.linkedin.com/in/jane-smith"));
    }

    #[test]
    fn test_hyperlinks_can_be_disabled() {
        let data = build_docx(&[(DOCUMENT_PART, BODY), (RELS_PART, RELS)]);
        let decoder = DocxDecoder::new(DocumentConfig {
            append_hyperlinks: false,
            ..DocumentConfig::default()
        });

        let decoded = decoder.decode(&data).unwrap();
        assert!(!decoded.text.contains("linkedin"));
    }

    #[test]
    fn test_missing_rels_is_fine() {
        let data = build_docx(&[(DOCUMENT_PART, BODY)]);
        assert!(DocxDecoder::default().decode(&data).is_ok());
    }

    #[test]
    fn test_missing_document_part() {
        let data = build_docx(&[("word/styles.xml", "<styles/>")]);
        let err = DocxDecoder::default().decode(&data).unwrap_err();
        assert!(err.to_string().contains("missing word/document.xml"));
    }

    #[test]
    fn test_oversized_part_is_rejected() {
        let data = build_docx(&[(DOCUMENT_PART, &"x".repeat(64))]);
        let mut archive = ZipArchive::new(Cursor::new(data.as_slice())).unwrap();

        let err = read_part_limited(&mut archive, DOCUMENT_PART, 16).unwrap_err();
        assert!(err.to_string().contains("exceeds 16 bytes"));

        let content = read_part_limited(&mut archive, DOCUMENT_PART, 64).unwrap();
        assert_eq!(content.map(|c| c.len()), Some(64));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(DocxDecoder::default().decode(b"plain text").is_err());
    }
}
