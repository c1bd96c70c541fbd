//! Text extraction from various file formats

use crate::error::{ExtractionError, Result};
use lopdf::Document;
use log::warn;
use pulldown_cmark::{html, Parser};
use std::io::Cursor;
use std::path::Path;
use tokio::fs;

/// Extract plain text from an in-memory PDF document.
///
/// Pages are decoded in document order and joined with a single space.
/// A byte stream that is not a PDF yields `MalformedDocument`; a valid
/// PDF with no text layer (e.g. scanned images) yields `EmptyContent`.
pub fn extract_pdf_text(bytes: &[u8]) -> std::result::Result<String, ExtractionError> {
    let cursor = Cursor::new(bytes);
    let doc = Document::load_from(cursor)
        .map_err(|e| ExtractionError::MalformedDocument(e.to_string()))?;

    let pages = doc.get_pages();
    let mut page_texts = Vec::with_capacity(pages.len());

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                let trimmed = page_text.trim();
                if !trimmed.is_empty() {
                    page_texts.push(trimmed.to_string());
                }
            }
            Err(e) => {
                warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    let text = page_texts.join(" ");
    if text.is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(text)
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(extract_pdf_text(&bytes)?)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let re = regex::Regex::new(r"<[^>]*>").unwrap();
        let clean_text = re.replace_all(&text, "");

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}
