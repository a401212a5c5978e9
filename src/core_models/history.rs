use mockall::automock;
use crate::core_models::entities::{Download, PeerId};

/// Read access to completed rounds. The round currently in progress is never visible.
#[automock]
pub trait HistoryProvider {
    fn current_round(&self) -> usize;
    fn downloads_in_round(&self, round: usize) -> Vec<Download>;
}

/// Downloads received by `peer_id` in a completed round.
pub fn downloads_to(history: &dyn HistoryProvider, round: usize, peer_id: PeerId) -> Vec<Download> {
    return history.downloads_in_round(round).into_iter()
        .filter(|download| download.to_id == peer_id)
        .collect();
}

/// Append-only log of download events, one entry per completed round.
#[derive(Clone, Debug, Default)]
pub struct RoundHistory {
    rounds: Vec<Vec<Download>>,
}

impl RoundHistory {
    pub fn new() -> Self {
        return RoundHistory { rounds: vec![] };
    }

    pub fn push_round(&mut self, downloads: Vec<Download>) {
        self.rounds.push(downloads);
    }
}

impl HistoryProvider for RoundHistory {
    fn current_round(&self) -> usize {
        return self.rounds.len();
    }

    fn downloads_in_round(&self, round: usize) -> Vec<Download> {
        assert!(round < self.rounds.len(), "round {} has not completed yet", round);
        return self.rounds[round].clone();
    }
}
