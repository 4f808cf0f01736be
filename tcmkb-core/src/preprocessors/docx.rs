use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::{Cursor, Read};
use std::path::Path;

use super::traits::Preprocessor;
use crate::error::ImportError;
use crate::normalizer::clean_text;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const WORDPROCESSING_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Reads the text runs (`w:t`) of a Word document in document order.
#[derive(Debug, Default)]
pub struct DocxPreprocessor;

impl DocxPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for DocxPreprocessor {
    fn extract_markup(&self, document_bytes: &[u8]) -> Result<String> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(document_bytes)).map_err(ImportError::Archive)?;

        let mut part = match archive.by_name(DOCUMENT_PART) {
            Ok(part) => part,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ImportError::MissingPart(DOCUMENT_PART.to_string()).into())
            }
            Err(err) => return Err(ImportError::Archive(err).into()),
        };

        let mut bytes = Vec::new();
        part.read_to_end(&mut bytes)
            .map_err(|source| ImportError::PartRead {
                part: DOCUMENT_PART.to_string(),
                source,
            })?;

        let markup = std::str::from_utf8(&bytes).map_err(|source| ImportError::PartEncoding {
            part: DOCUMENT_PART.to_string(),
            source,
        })?;
        Ok(markup.to_string())
    }

    fn parse_markup(&self, markup: &str) -> Result<Vec<String>> {
        let mut reader = NsReader::from_str(markup);
        let mut fragments = Vec::new();
        let mut current: Option<String> = None;

        loop {
            match reader.read_resolved_event().map_err(ImportError::Xml)? {
                (ResolveResult::Bound(Namespace(ns)), Event::Start(e))
                    if ns == WORDPROCESSING_NS && e.local_name().as_ref() == b"t" =>
                {
                    current = Some(String::new());
                }
                (_, Event::Text(e)) => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&e.unescape().map_err(ImportError::Xml)?);
                    }
                }
                (_, Event::CData(e)) => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                (ResolveResult::Bound(Namespace(ns)), Event::End(e))
                    if ns == WORDPROCESSING_NS && e.local_name().as_ref() == b"t" =>
                {
                    if let Some(text) = current.take() {
                        let cleaned = clean_text(&text);
                        if !cleaned.is_empty() {
                            fragments.push(cleaned);
                        }
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        Ok(fragments)
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
    }
}
