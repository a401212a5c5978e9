use std::collections::HashMap;
use serde_derive::{Deserialize, Serialize};
use crate::core_models::entities::{Bandwidth, PeerId};

/// Bandwidth allocation policies a participant can be configured with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    UniformRandom,
    RankByRate,
    ThresholdReciprocity,
    ProportionalShare,
    NeedRanked,
}

impl AllocationPolicy {
    pub const ALL: [AllocationPolicy; 5] = [
        AllocationPolicy::UniformRandom,
        AllocationPolicy::RankByRate,
        AllocationPolicy::ThresholdReciprocity,
        AllocationPolicy::ProportionalShare,
        AllocationPolicy::NeedRanked,
    ];
}

/// Allocator memory carried from one round to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChokeState {
    // expected download rate from a peer once it is unchoked
    pub rate_estimates: HashMap<PeerId, f64>,
    // upload a peer needs before it reciprocates
    pub thresholds: HashMap<PeerId, Bandwidth>,
    pub current_optimistic_peer: Option<PeerId>,
    pub last_threshold_update: Option<usize>,
}

impl ChokeState {
    pub fn new() -> Self {
        return ChokeState::default();
    }

    pub fn threshold(&self, peer_id: PeerId) -> Option<Bandwidth> {
        return self.thresholds.get(&peer_id).copied();
    }

    pub fn rate_estimate(&self, peer_id: PeerId) -> Option<f64> {
        return self.rate_estimates.get(&peer_id).copied();
    }

    pub fn seed_peer(&mut self, peer_id: PeerId, value: f64) {
        self.rate_estimates.entry(peer_id).or_insert(value);
        self.thresholds.entry(peer_id).or_insert(value);
    }

    pub fn is_seeded(&self) -> bool {
        return self.last_threshold_update.is_some();
    }
}
