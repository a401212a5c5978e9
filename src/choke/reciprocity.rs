use std::collections::HashMap;
use crate::core_models::entities::PeerId;
use crate::core_models::history::{downloads_to, HistoryProvider};

/// Rolling per-peer statistics about what other peers uploaded to this node.
#[derive(Clone, Debug)]
pub struct ReciprocityTracker {
    rate_window: usize,
    reciprocation_window: usize,
    next_round_to_observe: usize,
    // blocks received per peer over the trailing rate window
    download_rates: HashMap<PeerId, usize>,
    // blocks received per peer in the latest completed round
    last_round_blocks: HashMap<PeerId, usize>,
    // consecutive reciprocating rounds, capped at the reciprocation window
    reciprocation_counts: HashMap<PeerId, usize>,
}

impl ReciprocityTracker {
    pub fn init(rate_window: usize, reciprocation_window: usize) -> Self {
        assert!(rate_window > 0 && reciprocation_window > 0, "tracker windows must be positive");
        return ReciprocityTracker {
            rate_window,
            reciprocation_window,
            next_round_to_observe: 0,
            download_rates: HashMap::new(),
            last_round_blocks: HashMap::new(),
            reciprocation_counts: HashMap::new(),
        };
    }

    /// Folds every completed round not seen yet. Calling it again within the same round is a no-op.
    pub fn observe(&mut self, agent_id: PeerId, history: &dyn HistoryProvider) {
        let current_round = history.current_round();
        if current_round <= self.next_round_to_observe {
            return;
        }

        for round in self.next_round_to_observe..current_round {
            let received = blocks_by_sender(history, round, agent_id);
            self.reciprocation_counts.retain(|peer_id, _count| received.contains_key(peer_id));
            for peer_id in received.keys() {
                let count = self.reciprocation_counts.entry(*peer_id).or_insert(0);
                *count = (*count + 1).min(self.reciprocation_window);
            }
            self.last_round_blocks = received;
        }

        self.download_rates = download_rate_in_last_n_rounds(history, agent_id, self.rate_window);
        self.next_round_to_observe = current_round;
    }

    pub fn download_rate(&self, peer_id: PeerId) -> usize {
        return self.download_rates.get(&peer_id).copied().unwrap_or(0);
    }

    pub fn blocks_last_round(&self, peer_id: PeerId) -> usize {
        return self.last_round_blocks.get(&peer_id).copied().unwrap_or(0);
    }

    pub fn reciprocated_last_round(&self, peer_id: PeerId) -> bool {
        return self.blocks_last_round(peer_id) > 0;
    }

    pub fn reciprocation_count(&self, peer_id: PeerId) -> usize {
        return self.reciprocation_counts.get(&peer_id).copied().unwrap_or(0);
    }
}

/// Total blocks `agent_id` received from each peer over the last `n` completed rounds.
pub fn download_rate_in_last_n_rounds(history: &dyn HistoryProvider, agent_id: PeerId, n: usize) -> HashMap<PeerId, usize> {
    let current_round = history.current_round();
    let first_round = current_round.saturating_sub(n);
    let mut totals: HashMap<PeerId, usize> = HashMap::new();
    for round in first_round..current_round {
        for (peer_id, blocks) in blocks_by_sender(history, round, agent_id) {
            *totals.entry(peer_id).or_insert(0) += blocks;
        }
    }
    return totals;
}

fn blocks_by_sender(history: &dyn HistoryProvider, round: usize, agent_id: PeerId) -> HashMap<PeerId, usize> {
    let mut received: HashMap<PeerId, usize> = HashMap::new();
    for download in downloads_to(history, round, agent_id) {
        if download.blocks > 0 {
            *received.entry(download.from_id).or_insert(0) += download.blocks;
        }
    }
    return received;
}

#[cfg(test)]
mod tests {
    use crate::choke::reciprocity::{download_rate_in_last_n_rounds, ReciprocityTracker};
    use crate::core_models::entities::Download;
    use crate::core_models::history::{MockHistoryProvider, RoundHistory};

    fn download(from_id: usize, to_id: usize, blocks: usize) -> Download {
        return Download { from_id, to_id, piece_id: 0, blocks };
    }

    #[test]
    fn test_download_rate_sums_trailing_window() {
        let mut history = RoundHistory::new();
        history.push_round(vec![download(1, 0, 5)]);
        history.push_round(vec![download(1, 0, 2), download(2, 0, 3)]);
        history.push_round(vec![download(1, 0, 1), download(2, 9, 7)]);

        let rates = download_rate_in_last_n_rounds(&history, 0, 2);
        assert_eq!(rates.get(&1), Some(&3));
        assert_eq!(rates.get(&2), Some(&3));

        let rates = download_rate_in_last_n_rounds(&history, 0, 10);
        assert_eq!(rates.get(&1), Some(&8));
    }

    #[test]
    fn test_reciprocation_count_capped_and_reset() {
        let mut history = RoundHistory::new();
        let mut tracker = ReciprocityTracker::init(2, 3);
        for _ in 0..4 {
            history.push_round(vec![download(1, 0, 1), download(2, 0, 1)]);
        }
        tracker.observe(0, &history);
        assert_eq!(tracker.reciprocation_count(1), 3);
        assert_eq!(tracker.reciprocation_count(2), 3);

        history.push_round(vec![download(1, 0, 2)]);
        tracker.observe(0, &history);
        assert_eq!(tracker.reciprocation_count(1), 3);
        assert_eq!(tracker.reciprocation_count(2), 0);
        assert!(tracker.reciprocated_last_round(1));
        assert!(!tracker.reciprocated_last_round(2));
        assert_eq!(tracker.blocks_last_round(1), 2);
        assert_eq!(tracker.download_rate(1), 3);
    }

    #[test]
    fn test_observe_reads_each_round_once() {
        let mut history = MockHistoryProvider::new();
        history.expect_current_round().return_const(2usize);
        history.expect_downloads_in_round()
            .times(4)
            .returning(|_round| vec![Download { from_id: 4, to_id: 0, piece_id: 1, blocks: 2 }]);

        let mut tracker = ReciprocityTracker::init(2, 3);
        tracker.observe(0, &history);
        tracker.observe(0, &history);

        assert_eq!(tracker.reciprocation_count(4), 2);
        assert_eq!(tracker.download_rate(4), 4);
    }

    #[test]
    fn test_nothing_observed_before_first_round_completes() {
        let history = RoundHistory::new();
        let mut tracker = ReciprocityTracker::init(2, 3);
        tracker.observe(0, &history);
        assert_eq!(tracker.download_rate(1), 0);
        assert_eq!(tracker.reciprocation_count(1), 0);
    }
}
