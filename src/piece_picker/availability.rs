use std::collections::{BTreeMap, HashMap, HashSet};
use crate::core_models::entities::{PeerView, PieceId};

/// Number of peers advertising each needed piece. Pieces nobody holds are left out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityIndex {
    counts: HashMap<PieceId, usize>,
}

/// Needed pieces sharing the same availability count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RarityBucket {
    pub availability: usize,
    pub pieces: Vec<PieceId>,
}

impl AvailabilityIndex {
    /// Returns `None` when no needed piece is held by any peer.
    pub fn compute(peers: &[PeerView], needed: &HashSet<PieceId>) -> Option<Self> {
        let mut counts: HashMap<PieceId, usize> = HashMap::new();
        for peer in peers {
            for piece_id in peer.available_pieces.iter().filter(|piece_id| needed.contains(piece_id)) {
                *counts.entry(*piece_id).or_insert(0) += 1;
            }
        }

        if counts.is_empty() {
            return None;
        }
        return Some(AvailabilityIndex { counts });
    }

    pub fn availability(&self, piece_id: PieceId) -> usize {
        return self.counts.get(&piece_id).copied().unwrap_or(0);
    }

    pub fn len(&self) -> usize {
        return self.counts.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.counts.is_empty();
    }

    /// Groups pieces by availability, rarest bucket first, pieces ascending within a bucket.
    /// Callers shuffle inside a bucket when they need tie-breaking.
    pub fn rarity_buckets(&self) -> Vec<RarityBucket> {
        let mut grouped: BTreeMap<usize, Vec<PieceId>> = BTreeMap::new();
        for (piece_id, count) in self.counts.iter() {
            grouped.entry(*count).or_insert_with(Vec::new).push(*piece_id);
        }

        let mut buckets: Vec<RarityBucket> = Vec::with_capacity(grouped.len());
        for (availability, mut pieces) in grouped {
            pieces.sort_unstable();
            buckets.push(RarityBucket { availability, pieces });
        }
        return buckets;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::core_models::entities::PeerView;
    use crate::piece_picker::availability::AvailabilityIndex;

    fn peers() -> Vec<PeerView> {
        return vec![
            PeerView::new(1, 4.0, vec![0, 1]),
            PeerView::new(2, 4.0, vec![1, 2]),
            PeerView::new(3, 4.0, vec![2, 3]),
        ];
    }

    #[test]
    fn test_counts_only_needed_pieces() {
        let needed: HashSet<usize> = vec![0, 1, 2].into_iter().collect();
        let index = AvailabilityIndex::compute(&peers(), &needed).unwrap();

        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
        assert_eq!(index.availability(0), 1);
        assert_eq!(index.availability(1), 2);
        assert_eq!(index.availability(2), 2);
        assert_eq!(index.availability(3), 0);
    }

    #[test]
    fn test_no_needed_piece_available() {
        let needed: HashSet<usize> = vec![7].into_iter().collect();
        assert!(AvailabilityIndex::compute(&peers(), &needed).is_none());
        assert!(AvailabilityIndex::compute(&[], &needed).is_none());
    }

    #[test]
    fn test_rarity_buckets_ordered_rarest_first() {
        let needed: HashSet<usize> = (0..4).collect();
        let index = AvailabilityIndex::compute(&peers(), &needed).unwrap();
        let buckets = index.rarity_buckets();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].availability, 1);
        assert_eq!(buckets[1].availability, 2);
        let rarest: HashSet<usize> = buckets[0].pieces.iter().copied().collect();
        assert_eq!(rarest, vec![0, 3].into_iter().collect());
        let common: HashSet<usize> = buckets[1].pieces.iter().copied().collect();
        assert_eq!(common, vec![1, 2].into_iter().collect());
    }

    #[test]
    fn test_rarity_buckets_sorted_within_bucket() {
        let needed: HashSet<usize> = (0..4).collect();
        let index = AvailabilityIndex::compute(&peers(), &needed).unwrap();
        let buckets = index.rarity_buckets();
        assert_eq!(buckets[0].pieces, vec![0, 3]);
        assert_eq!(buckets[1].pieces, vec![1, 2]);
        assert_eq!(buckets, index.rarity_buckets());
    }
}
