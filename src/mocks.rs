use std::ops::Range;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::core_models::entities::{Download, LocalPieces, PeerId, PeerView, PieceId, Request};
use crate::core_models::history::RoundHistory;

/// Local node needs all 4 pieces; peer 1 holds {0, 1}, peer 2 holds {1, 2}, peer 3 holds {2, 3}.
pub fn three_peer_scenario() -> (LocalPieces, Vec<PeerView>) {
    let peers = vec![
        PeerView::new(1, 4.0, vec![0, 1]),
        PeerView::new(2, 4.0, vec![1, 2]),
        PeerView::new(3, 4.0, vec![2, 3]),
    ];
    return (LocalPieces::init(4, 2), peers);
}

/// Peer `id` holds pieces `0..=id % num_of_pieces`.
pub fn peer_views(ids: Range<PeerId>, num_of_pieces: usize) -> Vec<PeerView> {
    return ids.map(|id| PeerView::new(id, 4.0, 0..=(id % num_of_pieces)))
        .collect();
}

pub fn request(requester_id: PeerId, peer_id: PeerId, piece_id: PieceId) -> Request {
    return Request { requester_id, peer_id, piece_id, start_block: 0 };
}

/// Download events from `(from, to, blocks)` triples.
pub fn downloads_from(transfers: &[(PeerId, PeerId, usize)]) -> Vec<Download> {
    return transfers.iter()
        .map(|(from_id, to_id, blocks)| Download { from_id: *from_id, to_id: *to_id, piece_id: 0, blocks: *blocks })
        .collect();
}

/// History of `rounds` completed rounds that all saw the same transfers.
pub fn history_with_rounds(rounds: usize, transfers: &[(PeerId, PeerId, usize)]) -> RoundHistory {
    let mut history = RoundHistory::new();
    for _ in 0..rounds {
        history.push_round(downloads_from(transfers));
    }
    return history;
}

/// Partially downloaded local node plus `num_of_peers` peers (ids starting at 1) holding random pieces.
pub fn random_swarm(num_of_peers: usize, num_of_pieces: usize, blocks_per_piece: usize, seed: u64)
                    -> (LocalPieces, Vec<PeerView>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let counts: Vec<usize> = (0..num_of_pieces)
        .map(|_| rng.gen_range(0..=blocks_per_piece))
        .collect();
    let peers: Vec<PeerView> = (1..=num_of_peers)
        .map(|id| {
            let pieces: Vec<PieceId> = (0..num_of_pieces).filter(|_| rng.gen_bool(0.3)).collect();
            PeerView::new(id, rng.gen_range(1..20) as f64, pieces)
        })
        .collect();
    return (LocalPieces::from_counts(counts, blocks_per_piece), peers);
}
