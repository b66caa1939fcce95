//! The Chunk type: retrieval-sized text with full provenance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::{ContentBlock, ContentType, DocumentMetadata, DocumentType};
use crate::{Error, Result};

/// A retrieval-sized span of block text with the metadata needed to find
/// where it came from.
///
/// ## Character Offsets
///
/// `char_start` and `char_end` are character (not byte) offsets into the
/// document's logically concatenated block text, recorded when the chunk
/// is created:
///
/// ```text
/// char_end - char_start == text.chars().count()
/// ```
///
/// Offsets are approximate across flush boundaries: text that was merged
/// forward or dropped below `min_size` does not advance them.
///
/// ## Numbering
///
/// `chunk_index` and `total_chunks` are only meaningful after the whole
/// document has been chunked. For one document the indices form the range
/// `0..total_chunks` in output order.
///
/// ```rust
/// use strata::{Chunk, ChunkConfig, ContentBlock, DocumentMetadata, DocumentType, SemanticChunker};
///
/// let meta = DocumentMetadata::new("doc-1", "notes.md", "abc123", DocumentType::Markdown);
/// let blocks = vec![ContentBlock::paragraph("A paragraph long enough to keep. ".repeat(5), 0)];
///
/// let chunks = SemanticChunker::default().chunk_blocks(&blocks, &meta);
/// let chunk: &Chunk = &chunks[0];
///
/// assert_eq!(chunk.document_id, "doc-1");
/// assert_eq!((chunk.chunk_index, chunk.total_chunks), (0, 1));
/// assert_eq!(chunk.span().len(), chunk.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text; never empty.
    pub text: String,
    /// Owning document's id.
    pub document_id: String,
    /// Owning document's source path.
    pub source_path: String,
    /// Owning document's content hash.
    pub source_hash: String,
    /// Owning document's title.
    pub document_title: Option<String>,
    /// Owning document's format.
    pub document_type: DocumentType,
    /// Owning document's version.
    pub document_version: Option<String>,
    /// Page of the first contributing block.
    pub page_number: Option<u32>,
    /// Section path of the first contributing block.
    pub section_hierarchy: Vec<String>,
    /// Position of the first contributing block.
    pub paragraph_index: usize,
    /// Type of the first contributing block.
    pub content_type: ContentType,
    /// Start character offset in the document.
    pub char_start: usize,
    /// End character offset (exclusive) in the document.
    pub char_end: usize,
    /// Zero-based position in the document's chunk list.
    pub chunk_index: usize,
    /// Number of chunks produced for the document.
    pub total_chunks: usize,
}

impl Chunk {
    /// Build an unnumbered chunk.
    ///
    /// Block-level fields come from the first block in `contributing`; with
    /// no contributing block they fall back to an unpaged, unsectioned
    /// paragraph at position 0.
    pub(crate) fn new(
        text: String,
        contributing: &[&ContentBlock],
        document: &DocumentMetadata,
        char_start: usize,
    ) -> Self {
        let first = contributing.first();
        let char_end = char_start + text.chars().count();

        Self {
            document_id: document.document_id.clone(),
            source_path: document.source_path.clone(),
            source_hash: document.source_hash.clone(),
            document_title: document.title.clone(),
            document_type: document.document_type,
            document_version: document.version.clone(),
            page_number: first.and_then(|b| b.page_number),
            section_hierarchy: first
                .map(|b| b.section_hierarchy.clone())
                .unwrap_or_default(),
            paragraph_index: first.map_or(0, |b| b.position),
            content_type: first.map_or(ContentType::Paragraph, |b| b.content_type),
            char_start,
            char_end,
            chunk_index: 0,
            total_chunks: 0,
            text,
        }
    }

    /// Stable identifier derived from the document id and chunk index.
    #[must_use]
    pub fn chunk_id(&self) -> String {
        format!("{}#{}", self.document_id, self.chunk_index)
    }

    /// The length of this chunk in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The character span of this chunk in the document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.char_start..self.char_end
    }

    /// Human-readable source reference: title (or path), page, section path.
    ///
    /// ```rust
    /// # use strata::{ContentBlock, DocumentMetadata, DocumentType, SemanticChunker};
    /// let meta = DocumentMetadata::new("d", "/docs/guide.pdf", "h", DocumentType::Pdf)
    ///     .with_title("User Guide");
    /// let block = ContentBlock::paragraph("Setup takes a few steps. ".repeat(8), 0)
    ///     .with_page(4)
    ///     .with_section_hierarchy(["Install", "Linux"]);
    ///
    /// let chunks = SemanticChunker::default().chunk_blocks(&[block], &meta);
    /// assert_eq!(chunks[0].citation(), "User Guide, p. 4, Install > Linux");
    /// ```
    #[must_use]
    pub fn citation(&self) -> String {
        let mut parts = vec![self
            .document_title
            .clone()
            .unwrap_or_else(|| self.source_path.clone())];
        if let Some(page) = self.page_number {
            parts.push(format!("p. {page}"));
        }
        if !self.section_hierarchy.is_empty() {
            parts.push(self.section_hierarchy.join(" > "));
        }
        parts.join(", ")
    }

    /// Flatten provenance into scalar values only.
    ///
    /// Vector stores commonly reject nulls and nested values, so an absent
    /// page becomes `-1`, absent title and version become `""`, and the
    /// section path is joined with `|`. The text itself is not included.
    #[must_use]
    pub fn to_flat_metadata(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("document_id".into(), self.document_id.clone().into());
        map.insert("source_path".into(), self.source_path.clone().into());
        map.insert("source_hash".into(), self.source_hash.clone().into());
        map.insert(
            "document_title".into(),
            self.document_title.clone().unwrap_or_default().into(),
        );
        map.insert("document_type".into(), self.document_type.as_str().into());
        map.insert(
            "page_number".into(),
            self.page_number.map_or(-1, i64::from).into(),
        );
        map.insert(
            "section_hierarchy".into(),
            self.section_hierarchy.join("|").into(),
        );
        map.insert("paragraph_index".into(), self.paragraph_index.into());
        map.insert("chunk_index".into(), self.chunk_index.into());
        map.insert("total_chunks".into(), self.total_chunks.into());
        map.insert("content_type".into(), self.content_type.as_str().into());
        map.insert("char_start".into(), self.char_start.into());
        map.insert("char_end".into(), self.char_end.into());
        map.insert(
            "document_version".into(),
            self.document_version.clone().unwrap_or_default().into(),
        );
        map
    }

    /// Rebuild a chunk from its text and [`Chunk::to_flat_metadata`] output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metadata`] if a required key is missing or has the
    /// wrong type, or if a type name is unknown.
    pub fn from_flat_metadata(text: impl Into<String>, map: &Map<String, Value>) -> Result<Self> {
        let document_type = DocumentType::from_name(required_str(map, "document_type")?)
            .ok_or_else(|| Error::Metadata("unknown document_type".into()))?;
        let content_type = match map.get("content_type").and_then(Value::as_str) {
            Some(name) => ContentType::from_name(name)
                .ok_or_else(|| Error::Metadata(format!("unknown content_type {name:?}")))?,
            None => ContentType::Paragraph,
        };
        let page_number = match map.get("page_number").and_then(Value::as_i64) {
            Some(page) if page > 0 => u32::try_from(page).ok(),
            _ => None,
        };
        let section_hierarchy = match map.get("section_hierarchy").and_then(Value::as_str) {
            Some(joined) if !joined.is_empty() => joined.split('|').map(String::from).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            text: text.into(),
            document_id: required_str(map, "document_id")?.to_string(),
            source_path: required_str(map, "source_path")?.to_string(),
            source_hash: required_str(map, "source_hash")?.to_string(),
            document_title: non_empty(map, "document_title"),
            document_type,
            document_version: non_empty(map, "document_version"),
            page_number,
            section_hierarchy,
            paragraph_index: optional_usize(map, "paragraph_index"),
            content_type,
            char_start: optional_usize(map, "char_start"),
            char_end: optional_usize(map, "char_end"),
            chunk_index: required_usize(map, "chunk_index")?,
            total_chunks: required_usize(map, "total_chunks")?,
        })
    }
}

fn required_str<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Metadata(format!("missing string field {key:?}")))
}

fn required_usize(map: &Map<String, Value>, key: &str) -> Result<usize> {
    map.get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .ok_or_else(|| Error::Metadata(format!("missing integer field {key:?}")))
}

fn optional_usize(map: &Map<String, Value>, key: &str) -> usize {
    map.get(key).and_then(Value::as_u64).map_or(0, |v| v as usize)
}

fn non_empty(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ document: {}, index: {}/{}, span: {}..{}, len: {} }}",
            self.document_id,
            self.chunk_index,
            self.total_chunks,
            self.char_start,
            self.char_end,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> DocumentMetadata {
        DocumentMetadata::new("doc", "/a/b.md", "hash", DocumentType::Markdown)
            .with_title("Title")
            .with_version("v2")
    }

    #[test]
    fn test_new_copies_first_block() {
        let first = ContentBlock::new("Table text", ContentType::Table, 7)
            .with_page(3)
            .with_section_hierarchy(["A", "B"]);
        let second = ContentBlock::paragraph("Other", 8).with_page(4);

        let chunk = Chunk::new("Table text".into(), &[&first, &second], &meta(), 40);

        assert_eq!(chunk.page_number, Some(3));
        assert_eq!(chunk.section_hierarchy, vec!["A", "B"]);
        assert_eq!(chunk.paragraph_index, 7);
        assert_eq!(chunk.content_type, ContentType::Table);
        assert_eq!(chunk.span(), 40..50);
        assert_eq!(chunk.document_version.as_deref(), Some("v2"));
    }

    #[test]
    fn test_new_without_blocks() {
        let chunk = Chunk::new("text".into(), &[], &meta(), 0);
        assert_eq!(chunk.page_number, None);
        assert!(chunk.section_hierarchy.is_empty());
        assert_eq!(chunk.paragraph_index, 0);
        assert_eq!(chunk.content_type, ContentType::Paragraph);
    }

    #[test]
    fn test_offsets_count_chars() {
        let chunk = Chunk::new("日本語".into(), &[], &meta(), 5);
        assert_eq!(chunk.char_end, 8);
        assert_eq!(chunk.len(), 3);
    }

    #[test]
    fn test_citation_without_title() {
        let mut m = meta();
        m.title = None;
        let chunk = Chunk::new("x".into(), &[], &m, 0);
        assert_eq!(chunk.citation(), "/a/b.md");
    }

    #[test]
    fn test_flat_metadata_round_trip() {
        let block = ContentBlock::new("Quoted", ContentType::Quote, 2)
            .with_page(9)
            .with_section_hierarchy(["Part 1", "Notes"]);
        let mut chunk = Chunk::new("Quoted".into(), &[&block], &meta(), 12);
        chunk.chunk_index = 1;
        chunk.total_chunks = 3;

        let flat = chunk.to_flat_metadata();
        assert!(flat.values().all(|v| !v.is_null() && !v.is_array() && !v.is_object()));
        assert_eq!(flat["section_hierarchy"], "Part 1|Notes");

        let restored = Chunk::from_flat_metadata("Quoted", &flat).unwrap();
        assert_eq!(restored, chunk);
    }

    #[test]
    fn test_flat_metadata_absent_fields() {
        let mut m = meta();
        m.title = None;
        m.version = None;
        let chunk = Chunk::new("x".into(), &[], &m, 0);
        let flat = chunk.to_flat_metadata();
        assert_eq!(flat["page_number"], -1);
        assert_eq!(flat["document_title"], "");

        let restored = Chunk::from_flat_metadata("x", &flat).unwrap();
        assert_eq!(restored.page_number, None);
        assert_eq!(restored.document_title, None);
        assert_eq!(restored.document_version, None);
    }

    #[test]
    fn test_flat_metadata_missing_key() {
        let chunk = Chunk::new("x".into(), &[], &meta(), 0);
        let mut flat = chunk.to_flat_metadata();
        flat.remove("chunk_index");
        assert!(matches!(
            Chunk::from_flat_metadata("x", &flat),
            Err(Error::Metadata(_))
        ));
    }
}
