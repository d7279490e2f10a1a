//! PDF text extraction using lopdf and pdf-extract, with OCR over embedded page images.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::DocumentDecoder;
use crate::error::{DocumentError, OcrError, Result};
use crate::extract::panic_message;
use crate::models::config::DocumentConfig;
use crate::models::document::{DecodedText, DocumentKind};
use crate::ocr::OcrEngine;

/// PDF decoder.
///
/// Reads the text layer, appends link annotation targets, and falls back to
/// OCR when the text layer is missing or too short to trust.
pub struct PdfDecoder {
    config: DocumentConfig,
    ocr: Option<Arc<dyn OcrEngine>>,
}

/// A loaded PDF and the bytes the text extractor should read.
struct LoadedPdf {
    document: Document,
    bytes: Vec<u8>,
}

impl PdfDecoder {
    pub fn new(config: DocumentConfig, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        Self { config, ocr }
    }

    fn load(&self, data: &[u8]) -> Result<LoadedPdf> {
        let mut document =
            Document::load_mem(data).map_err(|e| DocumentError::Pdf(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let bytes = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(DocumentError::Encrypted.into());
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| DocumentError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(DocumentError::NoPages.into());
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(LoadedPdf { document, bytes })
    }

    /// Text layer plus appended link targets.
    fn primary_text(&self, pdf: &LoadedPdf) -> std::result::Result<String, String> {
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&pdf.bytes)
        }));

        let mut text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(e.to_string()),
            Err(payload) => return Err(panic_message(payload.as_ref())),
        };

        if self.config.append_hyperlinks {
            let links = collect_link_uris(&pdf.document);
            if !links.is_empty() {
                debug!("Appending {} link annotation targets", links.len());
                text.push('\n');
                text.push_str(&links.join("\n"));
            }
        }

        Ok(text)
    }

    fn ocr_pages(&self, engine: &dyn OcrEngine, document: &Document) -> std::result::Result<String, OcrError> {
        let images = page_images(document);
        if images.is_empty() {
            return Err(OcrError::NoImages);
        }

        let mut parts = Vec::with_capacity(images.len());
        for image in &images {
            parts.push(engine.recognize(image)?.text);
        }

        debug!("{} recognized {} page images", engine.name(), images.len());
        Ok(parts.join("\n"))
    }
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self::new(DocumentConfig::default(), None)
    }
}

impl DocumentDecoder for PdfDecoder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedText> {
        let pdf = self.load(data)?;
        let primary = self.primary_text(&pdf);

        let document = &pdf.document;
        let ocr = self
            .ocr
            .as_deref()
            .map(|engine| move || self.ocr_pages(engine, document));

        resolve_fallback(primary, self.config.min_text_length, ocr)
    }
}

/// Decide between the text layer and OCR.
///
/// OCR runs when the primary text failed or is shorter than `min_len` stripped
/// characters. A failing OCR pass keeps usable primary text; with no primary
/// text at all the document fails.
fn resolve_fallback<F>(
    primary: std::result::Result<String, String>,
    min_len: usize,
    ocr: Option<F>,
) -> Result<DecodedText>
where
    F: FnOnce() -> std::result::Result<String, OcrError>,
{
    match primary {
        Ok(text) if !needs_ocr(&text, min_len) => Ok(DecodedText::new(text, false)),
        Ok(text) => {
            debug!(
                "Text layer has {} chars, below {}; trying OCR",
                text.trim().chars().count(),
                min_len
            );
            match ocr.map(|run| run()) {
                Some(Ok(ocr_text)) => Ok(DecodedText::new(ocr_text, true)),
                Some(Err(e)) => {
                    warn!("OCR fallback failed, keeping text layer: {}", e);
                    Ok(DecodedText::new(text, false))
                }
                None => Ok(DecodedText::new(text, false)),
            }
        }
        Err(primary_error) => {
            debug!("Text extraction failed: {}; trying OCR", primary_error);
            match ocr.map(|run| run()) {
                Some(Ok(ocr_text)) => Ok(DecodedText::new(ocr_text, true)),
                Some(Err(e)) => Err(DocumentError::TextExtraction(format!(
                    "{}; OCR fallback failed: {}",
                    primary_error, e
                ))
                .into()),
                None => Err(DocumentError::TextExtraction(primary_error).into()),
            }
        }
    }
}

/// Whether decoded text is too short to trust.
pub fn needs_ocr(text: &str, min_len: usize) -> bool {
    text.trim().chars().count() < min_len
}

/// URI of every link annotation, in page order.
pub fn collect_link_uris(document: &Document) -> Vec<String> {
    let mut uris = Vec::new();

    for page_id in document.get_pages().values() {
        let Ok(page) = document.get_dictionary(*page_id) else {
            continue;
        };
        let Some(annots) = resolve(document, page.get(b"Annots").ok()).and_then(|o| o.as_array().ok())
        else {
            continue;
        };

        for annot in annots {
            let uri = resolve(document, Some(annot))
                .and_then(|o| o.as_dict().ok())
                .and_then(|annot| resolve(document, annot.get(b"A").ok()))
                .and_then(|o| o.as_dict().ok())
                .and_then(|action| resolve(document, action.get(b"URI").ok()));

            if let Some(Object::String(bytes, _)) = uri {
                uris.push(String::from_utf8_lossy(bytes).into_owned());
            }
        }
    }

    uris
}

fn resolve<'a>(document: &'a Document, object: Option<&'a Object>) -> Option<&'a Object> {
    document.dereference(object?).ok().map(|(_, object)| object)
}

/// Images drawn on each page, in page order; a document-wide scan when pages reference none.
fn page_images(document: &Document) -> Vec<DynamicImage> {
    let mut images = Vec::new();
    let mut seen: HashSet<ObjectId> = HashSet::new();

    for (number, page_id) in document.get_pages() {
        let Some(resources) = page_resources(document, page_id) else {
            continue;
        };
        let Some(Object::Dictionary(xobjects)) = resolve(document, resources.get(b"XObject").ok())
        else {
            continue;
        };

        for (_name, reference) in xobjects.iter() {
            let Ok((id, object)) = document.dereference(reference) else {
                continue;
            };
            if let Some(id) = id {
                if !seen.insert(id) {
                    continue;
                }
            }
            if let Some(image) = decode_image(document, object) {
                trace!("Found image on page {}", number);
                images.push(image);
            }
        }
    }

    if images.is_empty() {
        debug!("No XObject images referenced by pages, scanning all objects");
        images = document
            .objects
            .values()
            .filter_map(|object| decode_image(document, object))
            .collect();
    }

    debug!("Found {} images in document", images.len());
    images
}

/// Resources dictionary for a page, following `/Parent` inheritance.
///
/// A node seen twice ends the walk; malformed trees may contain parent cycles.
fn page_resources(document: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut visited: HashSet<ObjectId> = HashSet::new();
    let mut node_id = page_id;

    loop {
        if !visited.insert(node_id) {
            warn!("Cycle in page tree at object {:?}", node_id);
            return None;
        }

        let Ok(Object::Dictionary(node)) = document.get_object(node_id) else {
            return None;
        };

        if let Some(Object::Dictionary(resources)) = resolve(document, node.get(b"Resources").ok()) {
            return Some(resources.clone());
        }

        match node.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => node_id = *parent_id,
            _ => return None,
        }
    }
}

fn decode_image(document: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("Found image object: {}x{}", width, height);

    let filter = dict.get(b"Filter").ok().and_then(|filter| match filter {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) => filters.first().and_then(|o| o.as_name().ok()),
        _ => None,
    });

    match filter {
        Some(b"DCTDecode") => {
            // JPEG data is used as stored
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            trace!("Skipping image with unsupported filter");
            return None;
        }
        _ => {}
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(parts) => parts.first().and_then(|o| o.as_name().ok()),
            Object::Reference(id) => document.get_object(*id).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    image_from_raw(&data, width, height, color_space, bits)
}

fn image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: i64,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let pixels = (width as usize).checked_mul(height as usize)?;
    let channels = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => return None,
    };
    if data.len() < pixels * channels {
        trace!("Image data too short: {} < {}", data.len(), pixels * channels);
        return None;
    }

    let mut rgba = Vec::with_capacity(pixels * 4);
    for px in data[..pixels * channels].chunks_exact(channels) {
        match px {
            [r, g, b] => rgba.extend_from_slice(&[*r, *g, *b, 255]),
            [gray] => rgba.extend_from_slice(&[*gray, *gray, *gray, 255]),
            _ => return None,
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};
    use pretty_assertions::assert_eq;

    /// One-page document whose page carries a link annotation and, optionally, an image.
    fn build_pdf(uri: &str, with_image: bool) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let action = dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(uri),
        };
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
            "A" => action,
        });

        let mut resources = Dictionary::new();
        if with_image {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 2,
                    "Height" => 2,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0, 64, 128, 255],
            );
            let image_id = doc.add_object(image);
            resources.set("XObject", dictionary! { "Im0" => image_id });
        }

        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Annots" => vec![annot_id.into()],
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    struct FixedOcr(&'static str);

    impl OcrEngine for FixedOcr {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, image: &DynamicImage) -> std::result::Result<crate::ocr::OcrResult, OcrError> {
            Ok(crate::ocr::OcrResult {
                text: self.0.to_string(),
                processing_time_ms: 0,
                image_size: (image.width(), image.height()),
            })
        }
    }

    #[test]
    fn test_collect_link_uris() {
        let doc = build_pdf("https://github.com/octocat", false);
        assert_eq!(collect_link_uris(&doc), vec!["https://github.com/octocat".to_string()]);
    }

    #[test]
    fn test_page_images_follow_inherited_resources() {
        let doc = build_pdf("https://example.com", true);
        let images = page_images(&doc);

        assert_eq!(images.len(), 1);
        assert_eq!((images[0].width(), images[0].height()), (2, 2));
    }

    #[test]
    fn test_parent_cycle_ends_resource_lookup() {
        let mut doc = build_pdf("https://example.com", false);
        let page_id = *doc.get_pages().values().next().unwrap();
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Parent", page_id);

        assert!(page_resources(&doc, page_id).is_none());
        assert!(page_images(&doc).is_empty());
    }

    #[test]
    fn test_ocr_pages_joins_engine_output() {
        let doc = build_pdf("https://example.com", true);
        let decoder = PdfDecoder::default();

        let text = decoder.ocr_pages(&FixedOcr("Jane Doe"), &doc).unwrap();
        assert_eq!(text, "Jane Doe");

        let empty = build_pdf("https://example.com", false);
        assert!(matches!(
            decoder.ocr_pages(&FixedOcr("x"), &empty),
            Err(OcrError::NoImages)
        ));
    }

    #[test]
    fn test_invalid_bytes_are_a_pdf_error() {
        let err = PdfDecoder::default().decode(b"not a pdf").unwrap_err();
        assert!(err.to_string().contains("failed to parse PDF"));
    }

    #[test]
    fn test_needs_ocr_counts_stripped_chars() {
        assert!(needs_ocr("   short   ", 50));
        assert!(!needs_ocr(&"x".repeat(50), 50));
        assert!(needs_ocr(&format!("  {}  ", "x".repeat(49)), 50));
    }

    fn ocr_ok() -> Option<impl FnOnce() -> std::result::Result<String, OcrError>> {
        Some(|| Ok("scanned text".to_string()))
    }

    fn ocr_err() -> Option<impl FnOnce() -> std::result::Result<String, OcrError>> {
        Some(|| Err(OcrError::NoImages))
    }

    fn no_ocr() -> Option<fn() -> std::result::Result<String, OcrError>> {
        None
    }

    #[test]
    fn test_long_text_skips_ocr() {
        let text = "x".repeat(60);
        let decoded = resolve_fallback(Ok(text.clone()), 50, ocr_ok()).unwrap();
        assert_eq!(decoded, DecodedText::new(text, false));
    }

    #[test]
    fn test_short_text_uses_ocr() {
        let decoded = resolve_fallback(Ok("tiny".to_string()), 50, ocr_ok()).unwrap();
        assert_eq!(decoded, DecodedText::new("scanned text", true));
    }

    #[test]
    fn test_short_text_kept_when_ocr_fails_or_is_disabled() {
        let decoded = resolve_fallback(Ok("tiny".to_string()), 50, ocr_err()).unwrap();
        assert_eq!(decoded, DecodedText::new("tiny", false));

        let decoded = resolve_fallback(Ok("tiny".to_string()), 50, no_ocr()).unwrap();
        assert_eq!(decoded, DecodedText::new("tiny", false));
    }

    #[test]
    fn test_extraction_failure_uses_ocr() {
        let decoded = resolve_fallback(Err("bad font".to_string()), 50, ocr_ok()).unwrap();
        assert_eq!(decoded, DecodedText::new("scanned text", true));

        let err = resolve_fallback(Err("bad font".to_string()), 50, ocr_err()).unwrap_err();
        assert!(err.to_string().contains("bad font"));
        assert!(err.to_string().contains("OCR fallback failed"));

        assert!(resolve_fallback(Err("bad font".to_string()), 50, no_ocr()).is_err());
    }
}
