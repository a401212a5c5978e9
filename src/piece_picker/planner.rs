use std::collections::HashSet;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use crate::core_models::entities::{LocalPieces, PeerId, PeerView, PieceId, Request};
use crate::piece_picker::availability::AvailabilityIndex;

/// Rarest-first request planning with a per-peer request cap.
pub struct RequestPlanner {
    max_requests: usize,
}

impl RequestPlanner {
    pub fn init(max_requests: usize) -> Self {
        return RequestPlanner { max_requests };
    }

    pub fn plan<R: Rng + ?Sized>(&self,
                                 requester_id: PeerId,
                                 local: &LocalPieces,
                                 peers: &[PeerView],
                                 rng: &mut R) -> Vec<Request> {
        let needed: HashSet<PieceId> = local.needed_pieces().into_iter().collect();
        if needed.is_empty() {
            return vec![];
        }

        let index = match AvailabilityIndex::compute(peers, &needed) {
            Some(index) => index,
            None => {
                info!("Peer {} :: none of the {} needed pieces are available", requester_id, needed.len());
                return vec![];
            }
        };
        let mut buckets = index.rarity_buckets();

        let mut peer_order: Vec<&PeerView> = peers.iter().collect();
        peer_order.shuffle(rng);

        let mut requests: Vec<Request> = vec![];
        for peer in peer_order {
            let intersection = peer.available_pieces.iter()
                .filter(|piece_id| needed.contains(piece_id))
                .count();
            let mut quota = self.max_requests.min(intersection);

            'buckets: for bucket in buckets.iter_mut() {
                bucket.pieces.shuffle(rng);
                for piece_id in bucket.pieces.iter() {
                    if quota == 0 {
                        break 'buckets;
                    }
                    if !peer.has_piece(*piece_id) {
                        continue;
                    }
                    requests.push(Request {
                        requester_id,
                        peer_id: peer.id,
                        piece_id: *piece_id,
                        start_block: local.blocks_received(*piece_id),
                    });
                    quota -= 1;
                }
            }
        }

        debug!("Peer {} :: planned {} requests across {} peers", requester_id, requests.len(), peers.len());
        return requests;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::core_models::entities::{LocalPieces, PeerView};
    use crate::mocks;
    use crate::piece_picker::planner::RequestPlanner;

    #[test]
    fn test_rarest_pieces_requested_first() {
        let (local, peers) = mocks::three_peer_scenario();
        let planner = RequestPlanner::init(2);
        let requests = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(1));

        // each peer holds one rare piece and one common piece, the rare one must come first
        let mut first_per_peer: HashMap<usize, usize> = HashMap::new();
        for request in requests.iter() {
            first_per_peer.entry(request.peer_id).or_insert(request.piece_id);
        }
        assert_eq!(first_per_peer.get(&1), Some(&0));
        assert_eq!(first_per_peer.get(&3), Some(&3));

        let requested: HashSet<usize> = requests.iter().map(|request| request.piece_id).collect();
        assert!(requested.contains(&0) && requested.contains(&3));
    }

    #[test]
    fn test_rare_pieces_take_the_only_slot() {
        let (local, peers) = mocks::three_peer_scenario();
        let planner = RequestPlanner::init(1);
        let requests = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(3));

        let from_a: Vec<usize> = requests.iter().filter(|r| r.peer_id == 1).map(|r| r.piece_id).collect();
        let from_c: Vec<usize> = requests.iter().filter(|r| r.peer_id == 3).map(|r| r.piece_id).collect();
        assert_eq!(from_a, vec![0]);
        assert_eq!(from_c, vec![3]);
    }

    #[test]
    fn test_per_peer_cap_respected() {
        let local = LocalPieces::init(10, 2);
        let peers = vec![
            PeerView::new(1, 4.0, 0..10),
            PeerView::new(2, 4.0, 0..5),
        ];
        let planner = RequestPlanner::init(3);
        let requests = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(5));

        assert_eq!(requests.iter().filter(|r| r.peer_id == 1).count(), 3);
        assert_eq!(requests.iter().filter(|r| r.peer_id == 2).count(), 3);
    }

    #[test]
    fn test_complete_pieces_never_requested() {
        let local = LocalPieces::from_counts(vec![2, 1, 2, 0], 2);
        let peers = vec![PeerView::new(1, 4.0, 0..4)];
        let planner = RequestPlanner::init(10);
        let requests = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(9));

        let requested: HashSet<usize> = requests.iter().map(|r| r.piece_id).collect();
        assert_eq!(requested, vec![1, 3].into_iter().collect());
        let piece_1 = requests.iter().find(|r| r.piece_id == 1).unwrap();
        assert_eq!(piece_1.start_block, 1);
    }

    #[test]
    fn test_every_available_needed_piece_requested() {
        let (local, peers) = mocks::random_swarm(12, 40, 4, 11);
        let planner = RequestPlanner::init(usize::MAX);
        let requests = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(11));

        let requested: HashSet<usize> = requests.iter().map(|r| r.piece_id).collect();
        for piece_id in local.needed_pieces() {
            if !requested.contains(&piece_id) {
                assert!(peers.iter().all(|peer| !peer.has_piece(piece_id)));
            }
        }
    }

    #[test]
    fn test_nothing_available_yields_no_requests() {
        let local = LocalPieces::init(4, 2);
        let peers = vec![PeerView::new(1, 4.0, vec![]), PeerView::new(2, 4.0, vec![])];
        let planner = RequestPlanner::init(4);
        assert!(planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(0)).is_empty());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (local, peers) = mocks::random_swarm(8, 30, 4, 21);
        let planner = RequestPlanner::init(5);
        let first = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(99));
        let second = planner.plan(0, &local, &peers, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}
