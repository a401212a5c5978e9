use serde_derive::{Deserialize, Serialize};

pub type BidderId = usize;

/// Outcome of one generalized second-price round. Slots are ordered best first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuctionRound {
    pub bids: Vec<(BidderId, f64)>,
    pub clicks: Vec<f64>,
    // winner of each filled slot, best slot first
    pub occupants: Vec<BidderId>,
    pub per_click_payments: Vec<f64>,
}

impl AuctionRound {
    pub fn other_bids(&self, bidder_id: BidderId) -> Vec<f64> {
        return self.bids.iter()
            .filter(|(id, _bid)| *id != bidder_id)
            .map(|(_id, bid)| *bid)
            .collect();
    }

    pub fn slot_of(&self, bidder_id: BidderId) -> Option<usize> {
        return self.occupants.iter().position(|id| *id == bidder_id);
    }

    /// Total amount paid by whoever held `slot`.
    pub fn slot_spend(&self, slot: usize) -> f64 {
        return self.clicks[slot] * self.per_click_payments[slot];
    }
}

#[derive(Clone, Debug, Default)]
pub struct AuctionHistory {
    rounds: Vec<AuctionRound>,
}

impl AuctionHistory {
    pub fn new() -> Self {
        return AuctionHistory { rounds: vec![] };
    }

    pub fn push_round(&mut self, round: AuctionRound) {
        self.rounds.push(round);
    }

    pub fn current_round(&self) -> usize {
        return self.rounds.len();
    }

    pub fn round(&self, t: usize) -> &AuctionRound {
        assert!(t < self.rounds.len(), "auction round {} has not completed yet", t);
        return &self.rounds[t];
    }
}
