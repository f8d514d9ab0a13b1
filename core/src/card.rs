//! The immutable result tree produced by one scan: card, files, records.

use time::OffsetDateTime;

/// One fixed-slot record read out of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Record {
    index: u8,
    data: Vec<u8>,
}

impl Record {
    pub fn new(index: u8, data: Vec<u8>) -> Self {
        Self { index, data }
    }

    /// 1-based index of the record within its file.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// One successfully selected on-card file and the records read from it.
///
/// A file with an empty record list is a real result: selection succeeded
/// and the first read already signalled end-of-data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct File {
    folder_id: u16,
    file_id: u16,
    records: Vec<Record>,
}

impl File {
    pub fn new(folder_id: u16, file_id: u16, records: Vec<Record>) -> Self {
        Self {
            folder_id,
            file_id,
            records,
        }
    }

    /// Identifier of the enclosing folder, or 0 for a root-level file.
    pub fn folder_id(&self) -> u16 {
        self.folder_id
    }

    pub fn file_id(&self) -> u16 {
        self.file_id
    }

    /// Records in ascending index order, contiguous from 1.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// The dump of one physical card.
///
/// Only catalog entries whose selection succeeded appear in `files`; entries
/// that failed selection leave no placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Card {
    tag_id: Vec<u8>,
    scanned_at: OffsetDateTime,
    files: Vec<File>,
}

impl Card {
    pub fn new(tag_id: Vec<u8>, scanned_at: OffsetDateTime, files: Vec<File>) -> Self {
        Self {
            tag_id,
            scanned_at,
            files,
        }
    }

    /// Identifier of the physical tag, as reported by the reader.
    pub fn tag_id(&self) -> &[u8] {
        &self.tag_id
    }

    pub fn scanned_at(&self) -> OffsetDateTime {
        self.scanned_at
    }

    /// Files in catalog order.
    pub fn files(&self) -> &[File] {
        &self.files
    }
}
