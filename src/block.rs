//! Extracted document content: the chunker's input.
//!
//! Format-specific extraction (PDF, Office, HTML, Markdown, EPUB) happens
//! elsewhere. Its output is a [`ParsedDocument`]: identity metadata plus an
//! ordered list of typed [`ContentBlock`]s.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Running prose.
    #[default]
    Paragraph,
    /// A section heading. Headings open a new accumulation.
    Heading,
    /// A bulleted or numbered list.
    List,
    /// A table rendered to text.
    Table,
    /// Source code or preformatted text.
    Code,
    /// A block quotation.
    Quote,
    /// A caption attached to a figure.
    ImageCaption,
    /// A footnote or endnote.
    Footnote,
    /// Anything extraction could not classify.
    Unknown,
}

impl ContentType {
    /// The wire name of this content type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::List => "list",
            Self::Table => "table",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::ImageCaption => "image_caption",
            Self::Footnote => "footnote",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire name produced by [`ContentType::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "list" => Self::List,
            "table" => Self::Table,
            "code" => Self::Code,
            "quote" => Self::Quote,
            "image_caption" => Self::ImageCaption,
            "footnote" => Self::Footnote,
            "unknown" => Self::Unknown,
            _ => return None,
        })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The format a document was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// Portable Document Format.
    #[serde(rename = "pdf")]
    Pdf,
    /// Word processing document.
    #[serde(rename = "docx")]
    Word,
    /// Spreadsheet.
    #[serde(rename = "xlsx")]
    Excel,
    /// Markdown source.
    #[serde(rename = "markdown")]
    Markdown,
    /// Plain text.
    #[serde(rename = "text")]
    Text,
    /// HTML page.
    #[serde(rename = "html")]
    Html,
    /// EPUB e-book.
    #[serde(rename = "epub")]
    Epub,
    /// Unrecognized format.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl DocumentType {
    /// The wire name of this document type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "docx",
            Self::Excel => "xlsx",
            Self::Markdown => "markdown",
            Self::Text => "text",
            Self::Html => "html",
            Self::Epub => "epub",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire name produced by [`DocumentType::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "pdf" => Self::Pdf,
            "docx" => Self::Word,
            "xlsx" => Self::Excel,
            "markdown" => Self::Markdown,
            "text" => Self::Text,
            "html" => Self::Html,
            "epub" => Self::Epub,
            "unknown" => Self::Unknown,
            _ => return None,
        })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One semantic unit produced by extraction.
///
/// Blocks handed to the chunker must already be ordered by `position`;
/// they are never reordered.
///
/// ```rust
/// use strata::{ContentBlock, ContentType};
///
/// let block = ContentBlock::paragraph("Some text.", 3)
///     .with_page(2)
///     .with_section_hierarchy(["Chapter 1", "Overview"]);
///
/// assert_eq!(block.content_type, ContentType::Paragraph);
/// assert_eq!(block.page_number, Some(2));
/// assert_eq!(block.section.as_deref(), Some("Overview"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// The extracted text.
    pub text: String,
    /// What kind of block this is.
    #[serde(default)]
    pub content_type: ContentType,
    /// 1-indexed page, when the format has pages.
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Innermost section name, if known.
    #[serde(default)]
    pub section: Option<String>,
    /// Heading path from outermost to innermost; empty if unknown.
    #[serde(default)]
    pub section_hierarchy: Vec<String>,
    /// Order of this block within the document.
    #[serde(default)]
    pub position: usize,
    /// Format-specific hints (font size, list depth, ...). Opaque to the chunker.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ContentBlock {
    /// Create a block of the given type.
    #[must_use]
    pub fn new(text: impl Into<String>, content_type: ContentType, position: usize) -> Self {
        Self {
            text: text.into(),
            content_type,
            page_number: None,
            section: None,
            section_hierarchy: Vec::new(),
            position,
            extra: BTreeMap::new(),
        }
    }

    /// Create a heading block.
    #[must_use]
    pub fn heading(text: impl Into<String>, position: usize) -> Self {
        Self::new(text, ContentType::Heading, position)
    }

    /// Create a paragraph block.
    #[must_use]
    pub fn paragraph(text: impl Into<String>, position: usize) -> Self {
        Self::new(text, ContentType::Paragraph, position)
    }

    /// Set the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    /// Set the section path. The innermost entry also becomes `section`.
    #[must_use]
    pub fn with_section_hierarchy<I, S>(mut self, hierarchy: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section_hierarchy = hierarchy.into_iter().map(Into::into).collect();
        self.section = self.section_hierarchy.last().cloned();
        self
    }

    /// Attach a format-specific hint.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Whether this block is a heading.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.content_type == ContentType::Heading
    }
}

/// Identity and descriptive metadata of a source document.
///
/// The chunker copies identity fields into every chunk verbatim; it does
/// not validate or re-derive them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Unique document identifier.
    pub document_id: String,
    /// Original file path or URL.
    pub source_path: String,
    /// Content hash of the source file.
    pub source_hash: String,
    /// Original file name.
    #[serde(default)]
    pub filename: String,
    /// Format the document was extracted from.
    #[serde(default)]
    pub document_type: DocumentType,
    /// Title, if the document declares one.
    #[serde(default)]
    pub title: Option<String>,
    /// Author, if known.
    #[serde(default)]
    pub author: Option<String>,
    /// Total pages, for paged formats.
    #[serde(default)]
    pub page_count: Option<u32>,
    /// Approximate word count.
    #[serde(default)]
    pub word_count: Option<usize>,
    /// Detected language.
    #[serde(default)]
    pub language: Option<String>,
    /// Document version, if the source carries one.
    #[serde(default)]
    pub version: Option<String>,
    /// Caller-supplied metadata.
    #[serde(default)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    /// Create metadata with the required identity fields.
    #[must_use]
    pub fn new(
        document_id: impl Into<String>,
        source_path: impl Into<String>,
        source_hash: impl Into<String>,
        document_type: DocumentType,
    ) -> Self {
        let source_path = source_path.into();
        let filename = source_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            document_id: document_id.into(),
            source_path,
            source_hash: source_hash.into(),
            filename,
            document_type,
            ..Self::default()
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// The result of extracting one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document identity.
    pub metadata: DocumentMetadata,
    /// Extracted blocks in document order.
    #[serde(default)]
    pub content_blocks: Vec<ContentBlock>,
    /// Full raw text, when the extractor provides it.
    #[serde(default)]
    pub raw_text: Option<String>,
    /// Non-fatal problems hit during extraction.
    #[serde(default)]
    pub parsing_errors: Vec<String>,
}

impl ParsedDocument {
    /// Create a document from metadata and blocks.
    #[must_use]
    pub fn new(metadata: DocumentMetadata, content_blocks: Vec<ContentBlock>) -> Self {
        Self {
            metadata,
            content_blocks,
            raw_text: None,
            parsing_errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_names() {
        for ct in [
            ContentType::Paragraph,
            ContentType::Heading,
            ContentType::List,
            ContentType::Table,
            ContentType::Code,
            ContentType::Quote,
            ContentType::ImageCaption,
            ContentType::Footnote,
            ContentType::Unknown,
        ] {
            assert_eq!(ContentType::from_name(ct.as_str()), Some(ct));
            let json = serde_json::to_string(&ct).unwrap();
            assert_eq!(json, format!("\"{}\"", ct.as_str()));
        }
        assert_eq!(ContentType::from_name("sidebar"), None);
    }

    #[test]
    fn test_document_type_names() {
        assert_eq!(DocumentType::Word.as_str(), "docx");
        assert_eq!(DocumentType::from_name("xlsx"), Some(DocumentType::Excel));
        assert_eq!(
            serde_json::to_string(&DocumentType::Markdown).unwrap(),
            "\"markdown\""
        );
    }

    #[test]
    fn test_block_defaults_from_json() {
        let block: ContentBlock = serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(block.content_type, ContentType::Paragraph);
        assert_eq!(block.position, 0);
        assert!(block.section_hierarchy.is_empty());
        assert!(block.extra.is_empty());
    }

    #[test]
    fn test_block_builders() {
        let block = ContentBlock::heading("Intro", 0)
            .with_page(1)
            .with_extra("font_size", serde_json::json!(18));
        assert!(block.is_heading());
        assert_eq!(block.page_number, Some(1));
        assert_eq!(block.extra["font_size"], serde_json::json!(18));
    }

    #[test]
    fn test_metadata_filename() {
        let meta = DocumentMetadata::new("d1", "/docs/guide.md", "abc", DocumentType::Markdown);
        assert_eq!(meta.filename, "guide.md");
        let meta = DocumentMetadata::new("d2", "report.pdf", "abc", DocumentType::Pdf);
        assert_eq!(meta.filename, "report.pdf");
    }
}
