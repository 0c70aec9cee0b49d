//! The sub-block repository: what the tile accessor needs from a document.
//!
//! A repository exposes a finalized [`SubBlockDirectory`] and fetches the
//! payloads of individual sub-blocks. Payloads are returned as owned
//! [`Bytes`], which stay valid for as long as the caller holds them.

use async_trait::async_trait;
use bytes::Bytes;

use crate::directory::{SubBlockDescriptor, SubBlockDirectory};
use crate::error::CziError;

/// Which payload of a sub-block to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemBlkType {
    Data,
    Metadata,
    Attachment,
}

/// One sub-block read from a repository.
#[derive(Debug, Clone)]
pub struct SubBlock {
    /// Directory index
    pub index: usize,

    /// Effective descriptor (after applying the repository's precedence
    /// policy between directory and sub-block header)
    pub descriptor: SubBlockDescriptor,

    /// Pixel payload, still compressed
    pub data: Bytes,

    /// Sub-block metadata (XML), possibly empty
    pub metadata: Bytes,

    /// Sub-block attachment, possibly empty
    pub attachment: Bytes,
}

impl SubBlock {
    /// The payload of the given kind.
    pub fn payload(&self, kind: MemBlkType) -> &Bytes {
        match kind {
            MemBlkType::Data => &self.data,
            MemBlkType::Metadata => &self.metadata,
            MemBlkType::Attachment => &self.attachment,
        }
    }
}

/// Source of sub-blocks for the tile accessor.
///
/// Implementations must be safe to call from several tasks at once.
#[async_trait]
pub trait SubBlockRepository: Send + Sync {
    /// The finalized directory of this document.
    fn directory(&self) -> &SubBlockDirectory;

    /// Read the sub-block at `index`.
    ///
    /// Returns `Ok(None)` if no sub-block has that index. I/O failures and
    /// corrupt framing are errors.
    async fn read_sub_block(&self, index: usize) -> Result<Option<SubBlock>, CziError>;

    /// Read one payload of the sub-block at `index`.
    async fn read_raw_bytes(
        &self,
        index: usize,
        kind: MemBlkType,
    ) -> Result<Option<Bytes>, CziError> {
        Ok(self
            .read_sub_block(index)
            .await?
            .map(|block| block.payload(kind).clone()))
    }

    /// Whether a sub-block with `index` exists.
    fn contains(&self, index: usize) -> bool {
        index < self.directory().len()
    }
}
