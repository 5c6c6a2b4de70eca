use std::sync::Arc;

use strata_chunk::Chunk;

/// The four orthogonal neighbors of a chunk column. Absent slots are chunks
/// that are not loaded.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    /// `cx + 1`
    pub right: Option<Arc<Chunk>>,
    /// `cx - 1`
    pub left: Option<Arc<Chunk>>,
    /// `cz + 1`
    pub front: Option<Arc<Chunk>>,
    /// `cz - 1`
    pub back: Option<Arc<Chunk>>,
}

impl Neighbors {
    pub fn all_present(&self) -> bool {
        self.right.is_some() && self.left.is_some() && self.front.is_some() && self.back.is_some()
    }

    pub fn present(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        [&self.right, &self.left, &self.front, &self.back]
            .into_iter()
            .flatten()
    }

    pub fn count(&self) -> usize {
        self.present().count()
    }
}
