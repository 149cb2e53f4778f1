//! ALTO document parsing and text block reconstruction

use crate::error::{ContentError, Result};
use crate::{HYPHEN_PART_1, HYPHEN_PART_2, TAB_EXPANSION};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Word string inside a text block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltoString {
    /// Literal recognized content (`CONTENT`)
    pub content: Option<String>,

    /// Hyphenation marker (`SUBS_TYPE`)
    pub subs_type: Option<String>,

    /// Unsplit word of a hyphenated pair (`SUBS_CONTENT`)
    pub subs_content: Option<String>,
}

/// Text block with its word strings in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub id: Option<String>,
    pub strings: Vec<AltoString>,
}

impl TextBlock {
    /// Rebuild the block's text.
    ///
    /// The first half of a hyphenated pair contributes its unsplit
    /// substitute content, the second half is dropped. Tabs are expanded and
    /// words joined by single spaces.
    ///
    /// # Errors
    ///
    /// `ContentError::UnsupportedHyphenation` for any other marker,
    /// `ContentError::MissingAttribute` for a word without the content it
    /// should contribute.
    pub fn text(&self, document: &str) -> Result<String> {
        let location_id = self.id.as_deref().unwrap_or_default();
        let missing = |attribute: &'static str| ContentError::MissingAttribute {
            attribute,
            location_id: location_id.to_string(),
            document: document.to_string(),
        };

        let mut words = Vec::with_capacity(self.strings.len());
        for string in &self.strings {
            let word = match string.subs_type.as_deref() {
                None | Some("") => string.content.as_deref().ok_or_else(|| missing("CONTENT"))?,
                Some(HYPHEN_PART_1) => string
                    .subs_content
                    .as_deref()
                    .ok_or_else(|| missing("SUBS_CONTENT"))?,
                Some(HYPHEN_PART_2) => continue,
                Some(other) => {
                    return Err(ContentError::UnsupportedHyphenation {
                        subs_type: other.to_string(),
                        content: string.content.clone().unwrap_or_default(),
                        location_id: location_id.to_string(),
                        document: document.to_string(),
                    })
                }
            };
            words.push(word.replace('\t', TAB_EXPANSION));
        }

        Ok(words.join(" "))
    }
}

/// Parsed ALTO document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltoDocument {
    /// File name, used in errors
    pub name: String,

    /// Text blocks in document order
    pub blocks: Vec<TextBlock>,
}

impl AltoDocument {
    /// Read and parse an ALTO file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read (`ContentError::Io`) or is
    /// not well-formed XML (`ContentError::Xml`).
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let xml = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&xml, &name)
    }

    /// Parse ALTO XML, keeping every `TextBlock` and its `String`s.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Xml` on malformed XML.
    pub fn parse(xml: &str, name: &str) -> Result<Self> {
        let xml_error = |source: quick_xml::Error| ContentError::Xml {
            document: name.to_string(),
            source,
        };

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut blocks: Vec<TextBlock> = Vec::new();
        // indices of blocks still open; a String belongs to all of them
        let mut open: Vec<usize> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_error)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"TextBlock" => {
                        blocks.push(block_from(&e).map_err(xml_error)?);
                        open.push(blocks.len() - 1);
                    }
                    b"String" => push_string(&mut blocks, &open, &e).map_err(xml_error)?,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"TextBlock" => blocks.push(block_from(&e).map_err(xml_error)?),
                    b"String" => push_string(&mut blocks, &open, &e).map_err(xml_error)?,
                    _ => {}
                },
                Event::End(e) => {
                    if e.local_name().as_ref() == b"TextBlock" {
                        open.pop();
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::debug!("{name}: {} text blocks", blocks.len());
        Ok(Self {
            name: name.to_string(),
            blocks,
        })
    }

    /// Text of the unique block with `ID == location_id`.
    ///
    /// # Errors
    ///
    /// `ContentError::MissingBlock` / `DuplicateBlock` if zero or several
    /// blocks carry the id, or the errors of [`TextBlock::text`].
    pub fn text_for(&self, location_id: &str) -> Result<String> {
        let matching: Vec<&TextBlock> = self
            .blocks
            .iter()
            .filter(|block| block.id.as_deref() == Some(location_id))
            .collect();

        match matching.as_slice() {
            [] => Err(ContentError::MissingBlock {
                location_id: location_id.to_string(),
                document: self.name.clone(),
            }),
            [block] => block.text(&self.name),
            _ => Err(ContentError::DuplicateBlock {
                location_id: location_id.to_string(),
                document: self.name.clone(),
                count: matching.len(),
            }),
        }
    }
}

fn block_from(e: &BytesStart) -> std::result::Result<TextBlock, quick_xml::Error> {
    let mut block = TextBlock::default();
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"ID" {
            block.id = Some(attr.unescape_value()?.into_owned());
        }
    }
    Ok(block)
}

fn push_string(
    blocks: &mut [TextBlock],
    open: &[usize],
    e: &BytesStart,
) -> std::result::Result<(), quick_xml::Error> {
    if open.is_empty() {
        return Ok(());
    }

    let mut string = AltoString::default();
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"CONTENT" => string.content = Some(value),
            b"SUBS_TYPE" => string.subs_type = Some(value),
            b"SUBS_CONTENT" => string.subs_content = Some(value),
            _ => {}
        }
    }

    for &idx in open {
        blocks[idx].strings.push(string.clone());
    }
    Ok(())
}
