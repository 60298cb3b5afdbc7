//! lopdf-backed page source
//!
//! Thin wrapper around the external PDF collaborator. Everything the pipeline
//! needs from a document comes through here: per-page text, the Info
//! dictionary, and the raster image XObjects of each page. The `Document` is
//! owned by the wrapper, so the handle is released on every exit path.

use anyhow::{Context, Result, anyhow};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Document-level fields read from the trailer Info dictionary.
///
/// Absent or malformed entries degrade to empty strings; a PDF without an
/// Info dictionary is normal.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
}

/// One decoded raster image from a page's XObject resources
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: i64,
    pub height: i64,
    /// Non-alpha color channels, derived from the colorspace
    pub channel_count: u32,
    pub has_alpha: bool,
    pub colorspace_name: String,
    /// The stream's encoded bytes, as stored in the document
    pub encoded_bytes: Vec<u8>,
    /// jpeg, jpx, tiff, or raw, from the stream filter
    pub encoded_format: String,
}

pub struct PdfSource {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfSource {
    /// Open and parse a PDF document
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("failed to parse {:?}", path))?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based page numbers in ascending order
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// PDF format version, e.g. "1.7"
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Raw text of one page
    pub fn page_text(&self, page_number: u32) -> Result<String> {
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("text extraction failed on page {}", page_number))
    }

    /// Read the trailer Info dictionary
    pub fn document_info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::default();

        let Ok(info_obj) = self.doc.trailer.get(b"Info") else {
            return info;
        };
        let Ok(dict) = self.resolve(info_obj).as_dict() else {
            return info;
        };

        info.title = self.info_string(dict, b"Title");
        info.author = self.info_string(dict, b"Author");
        info.subject = self.info_string(dict, b"Subject");
        info.creator = self.info_string(dict, b"Creator");
        info.producer = self.info_string(dict, b"Producer");
        info
    }

    fn info_string(&self, dict: &lopdf::Dictionary, key: &[u8]) -> String {
        dict.get(key)
            .ok()
            .map(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    /// Decode every image XObject on one page.
    ///
    /// Failures are per-image: a corrupt stream yields an `Err` entry without
    /// affecting the other images on the page.
    pub fn page_images(&self, page_number: u32) -> Vec<Result<DecodedImage>> {
        let Some(&page_id) = self.pages.get(&page_number) else {
            return Vec::new();
        };
        let Some(xobjects) = self.page_xobjects(page_id) else {
            return Vec::new();
        };

        let mut images = Vec::new();
        for (_name, value) in xobjects.iter() {
            let stream = match self.resolve(value).as_stream() {
                Ok(s) => s,
                // Non-stream XObject entries are malformed; surface them
                Err(e) => {
                    images.push(Err(anyhow!("XObject is not a stream: {}", e)));
                    continue;
                }
            };
            let is_image = stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(|s| s.as_name().ok())
                .map(|name| name == b"Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            images.push(self.decode_image(stream));
        }
        images
    }

    /// Locate the page's XObject dictionary, following the Parent chain for
    /// inherited Resources entries.
    fn page_xobjects(&self, page_id: ObjectId) -> Option<&lopdf::Dictionary> {
        let mut dict = self.doc.get_object(page_id).ok()?.as_dict().ok()?;
        let mut depth = 0;
        loop {
            if let Ok(resources) = dict.get(b"Resources") {
                return self.resolve(resources).as_dict().ok()?.get(b"XObject").ok().and_then(
                    |x| self.resolve(x).as_dict().ok(),
                );
            }
            let parent = dict.get(b"Parent").ok()?;
            dict = self.resolve(parent).as_dict().ok()?;
            depth += 1;
            if depth > 32 {
                return None;
            }
        }
    }

    fn decode_image(&self, stream: &lopdf::Stream) -> Result<DecodedImage> {
        let width = self.dict_i64(&stream.dict, b"Width").context("image has no Width")?;
        let height = self.dict_i64(&stream.dict, b"Height").context("image has no Height")?;
        let has_alpha = stream.dict.has(b"SMask");
        let (colorspace_name, channel_count) = self.colorspace(&stream.dict);
        let encoded_format = self.encoded_format(&stream.dict);

        Ok(DecodedImage {
            width,
            height,
            channel_count,
            has_alpha,
            colorspace_name,
            encoded_bytes: stream.content.clone(),
            encoded_format,
        })
    }

    fn dict_i64(&self, dict: &lopdf::Dictionary, key: &[u8]) -> Option<i64> {
        dict.get(key).ok().and_then(|obj| self.resolve(obj).as_i64().ok())
    }

    /// Colorspace name and its non-alpha channel count.
    ///
    /// Indexed and Separation spaces carry one component; ICCBased streams
    /// declare their component count in `N`. Unrecognized spaces are treated
    /// as 3-channel so only the CMYK class gets filtered downstream.
    fn colorspace(&self, dict: &lopdf::Dictionary) -> (String, u32) {
        let Some(obj) = dict.get(b"ColorSpace").ok().map(|o| self.resolve(o)) else {
            return ("unknown".to_string(), 3);
        };

        match obj {
            Object::Name(name) => {
                let name = String::from_utf8_lossy(name).into_owned();
                let channels = Self::named_channel_count(&name);
                (name, channels)
            }
            Object::Array(items) => {
                let Some(first) = items.first().map(|o| self.resolve(o)) else {
                    return ("unknown".to_string(), 3);
                };
                let name = first
                    .as_name()
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_else(|_| "unknown".to_string());
                let channels = match name.as_str() {
                    "ICCBased" => items
                        .get(1)
                        .map(|o| self.resolve(o))
                        .and_then(|o| o.as_stream().ok())
                        .and_then(|s| self.dict_i64(&s.dict, b"N"))
                        .map(|n| n as u32)
                        .unwrap_or(3),
                    _ => Self::named_channel_count(&name),
                };
                (name, channels)
            }
            _ => ("unknown".to_string(), 3),
        }
    }

    fn named_channel_count(name: &str) -> u32 {
        match name {
            "DeviceGray" | "CalGray" | "Indexed" | "Separation" => 1,
            "DeviceRGB" | "CalRGB" | "Lab" => 3,
            "DeviceCMYK" => 4,
            _ => 3,
        }
    }

    fn encoded_format(&self, dict: &lopdf::Dictionary) -> String {
        let filter = match dict.get(b"Filter").ok().map(|o| self.resolve(o)) {
            Some(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
            Some(Object::Array(items)) => items
                .last()
                .and_then(|o| self.resolve(o).as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned())
                .unwrap_or_default(),
            _ => String::new(),
        };

        match filter.as_str() {
            "DCTDecode" => "jpeg",
            "JPXDecode" => "jpx",
            "CCITTFaxDecode" => "tiff",
            _ => "raw",
        }
        .to_string()
    }

    /// Follow reference chains to the pointed-to object
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        let mut current = obj;
        let mut depth = 0;
        while let Ok(id) = current.as_reference() {
            match self.doc.get_object(id) {
                Ok(next) => current = next,
                Err(_) => break,
            }
            depth += 1;
            if depth > 16 {
                break;
            }
        }
        current
    }
}
