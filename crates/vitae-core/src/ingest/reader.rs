use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Could not read {format} document: {message}")]
    Malformed {
        format: DocumentFormat,
        message: String,
    },
}

impl ReadError {
    fn malformed(format: DocumentFormat, message: impl ToString) -> Self {
        Self::Malformed {
            format,
            message: message.to_string(),
        }
    }
}

pub type ReadResult<T> = Result<T, ReadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Docx, Self::PlainText];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            _ => None,
        }
    }

    /// Resolves the format from a path's extension.
    pub fn from_path(path: &Path) -> ReadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ReadError::UnsupportedFormat("no extension".into()))?;

        Self::from_extension(ext).ok_or_else(|| ReadError::UnsupportedFormat(ext.into()))
    }

    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Document bytes with their declared format. Dropped once text is extracted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub data: Vec<u8>,
    pub format: DocumentFormat,
}

impl RawDocument {
    #[must_use]
    pub const fn new(data: Vec<u8>, format: DocumentFormat) -> Self {
        Self { data, format }
    }
}

#[async_trait::async_trait]
pub trait Reader: Send + Sync {
    fn supported_formats(&self) -> &[DocumentFormat];

    fn can_read(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    async fn read_bytes(&self, data: &[u8], format: DocumentFormat) -> ReadResult<String>;

    async fn read_document(&self, document: RawDocument) -> ReadResult<String> {
        self.read_bytes(&document.data, document.format).await
    }

    async fn read_file(&self, path: &Path) -> ReadResult<String> {
        let format = DocumentFormat::from_path(path)?;

        if !self.can_read(format) {
            return Err(ReadError::UnsupportedFormat(format.to_string()));
        }

        let data = tokio::fs::read(path).await?;
        self.read_document(RawDocument::new(data, format)).await
    }
}

pub struct PlainTextReader;

impl PlainTextReader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PlainTextReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Reader for PlainTextReader {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::PlainText]
    }

    async fn read_bytes(&self, data: &[u8], _format: DocumentFormat) -> ReadResult<String> {
        String::from_utf8(data.to_vec()).map_err(|e| ReadError::Encoding(e.to_string()))
    }
}

/// Text layer of a PDF, page by page.
pub struct PdfReader;

impl PdfReader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Joins page texts with single spaces, skipping pages without text.
    fn join_pages(pages: Vec<String>) -> String {
        let total = pages.len();
        let kept: Vec<String> = pages
            .into_iter()
            .filter(|page| !page.trim().is_empty())
            .collect();

        if kept.len() < total {
            tracing::warn!(
                skipped = total - kept.len(),
                pages = total,
                "PDF pages without extractable text"
            );
        }

        kept.join(" ")
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Reader for PdfReader {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    async fn read_bytes(&self, data: &[u8], format: DocumentFormat) -> ReadResult<String> {
        let bytes = data.to_vec();

        // pdf-extract can panic on hostile input; the join error catches it.
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|e| ReadError::malformed(format, e))?
        .map_err(|e| ReadError::malformed(format, e))?;

        Ok(Self::join_pages(pages))
    }
}

/// Upper bound on the XML a single DOCX may inflate to, across all parts read.
pub const DEFAULT_MAX_DOCX_XML_BYTES: u64 = 64 * 1024 * 1024;

const DOCX_BODY: &str = "word/document.xml";

/// Text of a Word (OOXML) document: headers, then the body, then footers.
pub struct DocxReader {
    max_xml_bytes: u64,
}

impl DocxReader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_xml_bytes: DEFAULT_MAX_DOCX_XML_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_xml_bytes(mut self, max_xml_bytes: u64) -> Self {
        self.max_xml_bytes = max_xml_bytes;
        self
    }

    fn extract(data: &[u8], max_xml_bytes: u64) -> ReadResult<String> {
        let fmt = DocumentFormat::Docx;

        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| ReadError::malformed(fmt, e))?;

        let headers = part_names(&archive, "word/header");
        let footers = part_names(&archive, "word/footer");
        let parts = headers
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(DOCX_BODY))
            .chain(footers.iter().map(String::as_str));

        let mut budget = max_xml_bytes;
        let mut text = String::new();
        for name in parts {
            let xml = read_part(&mut archive, name, &mut budget)?;
            text.push_str(&document_xml_text(&xml).map_err(|e| ReadError::malformed(fmt, e))?);
        }

        Ok(text)
    }
}

/// Names of `<prefix>N.xml` parts directly under `prefix`, sorted.
fn part_names<R: Read + std::io::Seek>(archive: &zip::ZipArchive<R>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(".xml"))
                .is_some_and(|stem| !stem.contains('/'))
        })
        .map(String::from)
        .collect();
    names.sort();
    names
}

/// Inflates one archive entry, charging its size against `budget`.
///
/// The declared size is checked first and the read itself is capped, so an
/// entry lying about its size still cannot exceed the budget.
fn read_part<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
    budget: &mut u64,
) -> ReadResult<String> {
    let fmt = DocumentFormat::Docx;
    let too_large = || ReadError::malformed(fmt, format!("{name} inflates past the size limit"));

    let entry = archive
        .by_name(name)
        .map_err(|e| ReadError::malformed(fmt, e))?;
    if entry.size() > *budget {
        return Err(too_large());
    }

    let mut xml = String::new();
    entry
        .take(budget.saturating_add(1))
        .read_to_string(&mut xml)
        .map_err(|e| ReadError::malformed(fmt, e))?;

    let read = xml.len() as u64;
    if read > *budget {
        return Err(too_large());
    }
    *budget -= read;

    Ok(xml)
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Reader for DocxReader {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    async fn read_bytes(&self, data: &[u8], format: DocumentFormat) -> ReadResult<String> {
        let bytes = data.to_vec();
        let limit = self.max_xml_bytes;
        tokio::task::spawn_blocking(move || Self::extract(&bytes, limit))
            .await
            .map_err(|e| ReadError::malformed(format, e))?
    }
}

/// Flattens a WordprocessingML part into text: one line per paragraph, `w:tab`
/// as a tab, `w:br`/`w:cr` as a newline.
fn document_xml_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Dispatches to the reader registered for each format.
pub struct CompositeReader {
    readers: Vec<Box<dyn Reader>>,
}

impl CompositeReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: Box<dyn Reader>) -> Self {
        self.readers.push(reader);
        self
    }

    pub fn add_reader(&mut self, reader: Box<dyn Reader>) {
        self.readers.push(reader);
    }

    fn find_reader(&self, format: DocumentFormat) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.can_read(format))
            .map(|r| r.as_ref())
    }
}

impl Default for CompositeReader {
    fn default() -> Self {
        Self::new()
            .with_reader(Box::new(PlainTextReader::new()))
            .with_reader(Box::new(PdfReader::new()))
            .with_reader(Box::new(DocxReader::new()))
    }
}

#[async_trait::async_trait]
impl Reader for CompositeReader {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &DocumentFormat::ALL
    }

    fn can_read(&self, format: DocumentFormat) -> bool {
        self.find_reader(format).is_some()
    }

    async fn read_bytes(&self, data: &[u8], format: DocumentFormat) -> ReadResult<String> {
        let reader = self
            .find_reader(format)
            .ok_or_else(|| ReadError::UnsupportedFormat(format.to_string()))?;

        reader.read_bytes(data, format).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn make_archive(parts: &[(&str, String)], method: zip::CompressionMethod) -> Vec<u8> {
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(method);
        for (name, xml) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn header_xml(root: &str, body: &str) -> String {
        format!(r#"<w:{root} xmlns:w="{W_NS}">{body}</w:{root}>"#)
    }

    fn make_docx(body: &str) -> Vec<u8> {
        make_archive(
            &[("word/document.xml", document_xml(body))],
            zip::CompressionMethod::Stored,
        )
    }

    /// Minimal PDF with one page per entry; `None` is a page without text.
    fn make_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let font_id = 3 + 2 * pages.len();
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        ];
        for (i, page) in pages.iter().enumerate() {
            let content = page.map_or_else(
                || "q Q".to_string(),
                |text| format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET"),
            );
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{object}\nendobj\n", i + 1));
        }

        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_plain_text_reader() {
        let reader = PlainTextReader::new();
        let text = reader
            .read_bytes("Jane Doe\nEngineer".as_bytes(), DocumentFormat::PlainText)
            .await
            .unwrap();

        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[tokio::test]
    async fn test_plain_text_rejects_invalid_utf8() {
        let reader = PlainTextReader::new();
        let result = reader.read_bytes(&[0xff, 0xfe, 0x00], DocumentFormat::PlainText).await;

        assert!(matches!(result, Err(ReadError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_docx_reader() {
        let data = make_docx(
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p><w:r><w:t xml:space="preserve">B.Tech </w:t><w:tab/><w:t>XYZ University &amp; Co</w:t></w:r></w:p>"#,
        );

        let text = DocxReader::new()
            .read_bytes(&data, DocumentFormat::Docx)
            .await
            .unwrap();

        assert_eq!(text, "Jane Doe\nB.Tech \tXYZ University & Co\n");
    }

    #[tokio::test]
    async fn test_docx_reader_includes_headers_and_footers() {
        let data = make_archive(
            &[
                ("word/document.xml", document_xml(&paragraph("Experience"))),
                ("word/footer1.xml", header_xml("ftr", &paragraph("Page footer"))),
                ("word/header2.xml", header_xml("hdr", &paragraph("+1 555-123-4567"))),
                ("word/header1.xml", header_xml("hdr", &paragraph("jane@example.com"))),
                ("word/headers/ignored.xml", header_xml("hdr", &paragraph("nested"))),
            ],
            zip::CompressionMethod::Deflated,
        );

        let text = DocxReader::new()
            .read_bytes(&data, DocumentFormat::Docx)
            .await
            .unwrap();

        assert_eq!(
            text,
            "jane@example.com\n+1 555-123-4567\nExperience\nPage footer\n"
        );
    }

    #[tokio::test]
    async fn test_docx_reader_requires_body() {
        let data = make_archive(
            &[("word/header1.xml", header_xml("hdr", &paragraph("jane@example.com")))],
            zip::CompressionMethod::Stored,
        );

        let result = DocxReader::new().read_bytes(&data, DocumentFormat::Docx).await;
        assert!(matches!(result, Err(ReadError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_docx_reader_caps_inflated_size() {
        let body = "<w:p/>".repeat(100_000);
        let data = make_archive(
            &[("word/document.xml", document_xml(&body))],
            zip::CompressionMethod::Deflated,
        );
        assert!(data.len() < 64 * 1024);

        let result = DocxReader::new()
            .with_max_xml_bytes(64 * 1024)
            .read_bytes(&data, DocumentFormat::Docx)
            .await;

        assert!(
            matches!(result, Err(ReadError::Malformed { ref message, .. }) if message.contains("size limit"))
        );
    }

    #[tokio::test]
    async fn test_docx_size_limit_spans_all_parts() {
        let header = header_xml("hdr", &paragraph(&"x".repeat(600)));
        let body = document_xml(&paragraph(&"y".repeat(600)));
        let limit = (header.len() + body.len() - 1) as u64;
        let data = make_archive(
            &[("word/header1.xml", header), ("word/document.xml", body)],
            zip::CompressionMethod::Stored,
        );

        let reader = DocxReader::new().with_max_xml_bytes(limit);
        let result = reader.read_bytes(&data, DocumentFormat::Docx).await;
        assert!(matches!(result, Err(ReadError::Malformed { .. })));

        let reader = DocxReader::new().with_max_xml_bytes(limit + 1);
        assert!(reader.read_bytes(&data, DocumentFormat::Docx).await.is_ok());
    }

    #[tokio::test]
    async fn test_docx_reader_rejects_garbage() {
        let result = DocxReader::new()
            .read_bytes(b"not a zip archive", DocumentFormat::Docx)
            .await;

        assert!(matches!(result, Err(ReadError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_pdf_reader_rejects_garbage() {
        let result = PdfReader::new()
            .read_bytes(b"%PDF-1.4 truncated", DocumentFormat::Pdf)
            .await;

        assert!(matches!(result, Err(ReadError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_pdf_reader_skips_blank_pages() {
        let data = make_pdf(&[Some("Jane Doe"), None, Some("Built a compiler")]);

        let pages = pdf_extract::extract_text_from_mem_by_pages(&data).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[1].trim().is_empty());

        let text = PdfReader::new()
            .read_bytes(&data, DocumentFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(text, PdfReader::join_pages(pages));
        assert_eq!(
            crate::ingest::normalize(&text),
            "Jane Doe Built a compiler"
        );
    }

    #[test]
    fn test_pdf_pages_joined_without_blank_pages() {
        let pages = vec!["Page one".into(), "  \n".into(), "Page three".into()];
        assert_eq!(PdfReader::join_pages(pages), "Page one Page three");
    }

    #[tokio::test]
    async fn test_composite_dispatches_by_format() {
        let reader = CompositeReader::default();
        let text = reader
            .read_bytes(b"hello", DocumentFormat::PlainText)
            .await
            .unwrap();
        assert_eq!(text, "hello");

        let empty = CompositeReader::new();
        let result = empty.read_bytes(b"hello", DocumentFormat::PlainText).await;
        assert!(matches!(result, Err(ReadError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_read_file_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.rtf");
        std::fs::write(&path, "{\\rtf1 hello}").unwrap();

        let result = CompositeReader::default().read_file(&path).await;
        assert!(matches!(result, Err(ReadError::UnsupportedFormat(ext)) if ext == "rtf"));
    }

    #[tokio::test]
    async fn test_read_file_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.TXT");
        std::fs::write(&path, "Jane Doe").unwrap();

        let text = CompositeReader::default().read_file(&path).await.unwrap();
        assert_eq!(text, "Jane Doe");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension(".DOCX"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_extension("rtf"), None);
        assert_eq!(DocumentFormat::from_extension("doc"), None);
    }

    #[test]
    fn test_format_from_mime() {
        assert_eq!(
            DocumentFormat::from_mime("application/pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_mime("text/rtf"), None);
    }
}
