use std::collections::HashSet;
use serde_derive::{Deserialize, Serialize};

pub type PeerId = usize;
pub type PieceId = usize;
pub type Bandwidth = f64;

/// Snapshot of a remote peer as seen by the local node in the current round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeerView {
    pub id: PeerId,
    pub up_bw: Bandwidth,
    pub available_pieces: HashSet<PieceId>,
}

impl PeerView {
    pub fn new(id: PeerId, up_bw: Bandwidth, available_pieces: impl IntoIterator<Item=PieceId>) -> Self {
        return PeerView {
            id,
            up_bw,
            available_pieces: available_pieces.into_iter().collect(),
        };
    }

    pub fn has_piece(&self, piece_id: PieceId) -> bool {
        return self.available_pieces.contains(&piece_id);
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub requester_id: PeerId,
    pub peer_id: PeerId,
    pub piece_id: PieceId,
    pub start_block: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub from_id: PeerId,
    pub to_id: PeerId,
    pub bandwidth: Bandwidth,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Download {
    pub from_id: PeerId,
    pub to_id: PeerId,
    pub piece_id: PieceId,
    pub blocks: usize,
}

/// Per-piece received block counts of the local node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalPieces {
    blocks_per_piece: usize,
    received: Vec<usize>,
}

impl LocalPieces {
    pub fn init(num_of_pieces: usize, blocks_per_piece: usize) -> Self {
        return LocalPieces { blocks_per_piece, received: vec![0; num_of_pieces] };
    }

    pub fn complete(num_of_pieces: usize, blocks_per_piece: usize) -> Self {
        return LocalPieces { blocks_per_piece, received: vec![blocks_per_piece; num_of_pieces] };
    }

    pub fn from_counts(counts: Vec<usize>, blocks_per_piece: usize) -> Self {
        assert!(counts.iter().all(|count| *count <= blocks_per_piece),
                "block count exceeds {} blocks per piece", blocks_per_piece);
        return LocalPieces { blocks_per_piece, received: counts };
    }

    pub fn num_of_pieces(&self) -> usize {
        return self.received.len();
    }

    pub fn blocks_per_piece(&self) -> usize {
        return self.blocks_per_piece;
    }

    pub fn blocks_received(&self, piece_id: PieceId) -> usize {
        assert!(piece_id < self.received.len(), "piece {} out of range", piece_id);
        return self.received[piece_id];
    }

    pub fn is_complete(&self, piece_id: PieceId) -> bool {
        return self.blocks_received(piece_id) == self.blocks_per_piece;
    }

    pub fn needed_pieces(&self) -> Vec<PieceId> {
        return (0..self.received.len())
            .filter(|piece_id| !self.is_complete(*piece_id))
            .collect();
    }

    pub fn completed_pieces(&self) -> Vec<PieceId> {
        return (0..self.received.len())
            .filter(|piece_id| self.is_complete(*piece_id))
            .collect();
    }

    pub fn is_seed(&self) -> bool {
        return self.received.iter().all(|count| *count == self.blocks_per_piece);
    }

    /// Adds `blocks` to a piece and returns how many were actually stored.
    pub fn add_blocks(&mut self, piece_id: PieceId, blocks: usize) -> usize {
        assert!(piece_id < self.received.len(), "piece {} out of range", piece_id);
        let missing = self.blocks_per_piece - self.received[piece_id];
        let stored = blocks.min(missing);
        self.received[piece_id] += stored;
        return stored;
    }
}

#[cfg(test)]
mod tests {
    use crate::core_models::entities::LocalPieces;

    #[test]
    fn test_needed_pieces() {
        let pieces = LocalPieces::from_counts(vec![0, 2, 1, 2], 2);
        assert_eq!(pieces.needed_pieces(), vec![0, 2]);
        assert_eq!(pieces.completed_pieces(), vec![1, 3]);
        assert!(!pieces.is_seed());
    }

    #[test]
    fn test_add_blocks_saturates_at_piece_size() {
        let mut pieces = LocalPieces::init(2, 3);
        assert_eq!(pieces.add_blocks(0, 2), 2);
        assert_eq!(pieces.add_blocks(0, 5), 1);
        assert!(pieces.is_complete(0));
        assert_eq!(pieces.blocks_received(1), 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_piece_panics() {
        let pieces = LocalPieces::init(2, 2);
        pieces.blocks_received(2);
    }

    #[test]
    #[should_panic]
    fn test_overfull_counts_rejected() {
        LocalPieces::from_counts(vec![3], 2);
    }
}
