use log::debug;
use crate::auction::gsp::{bid_range_for_slot, payment_for_slot};
use crate::auction::models::{AuctionHistory, AuctionRound, BidderId};
use crate::util::argmax_index;

/// Slot a bidder would aim for, with the bid range that lands there.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotTarget {
    pub slot: usize,
    pub min_bid: f64,
    pub max_bid: f64,
    pub payment: f64,
}

/// Balanced bidding: target the slot with the best utility against last round's bids, then bid so
/// that winning the next slot up would be worth exactly as much.
#[derive(Clone, Debug)]
pub struct BalancedBidder {
    pub id: BidderId,
    pub value: f64,
}

impl BalancedBidder {
    pub fn new(id: BidderId, value: f64) -> Self {
        assert!(value >= 0.0, "bidder value must be non-negative");
        return BalancedBidder { id, value };
    }

    pub fn initial_bid(&self) -> f64 {
        return self.value / 2.0;
    }

    /// Per-slot (min, max) bid ranges, assuming the other bidders repeat last round's bids.
    pub fn slot_info(&self, prev_round: &AuctionRound, reserve: f64) -> Vec<(usize, f64, f64)> {
        let others = prev_round.other_bids(self.id);
        return (0..prev_round.clicks.len())
            .map(|slot| {
                let (min, max) = bid_range_for_slot(slot, reserve, &others);
                (slot, min, max.unwrap_or(2.0 * min))
            })
            .collect();
    }

    /// Utility of winning each slot. Slots whose payment reaches `spend_cap` are ruled out.
    pub fn expected_utils(&self, prev_round: &AuctionRound, reserve: f64, spend_cap: Option<f64>) -> Vec<f64> {
        let others = prev_round.other_bids(self.id);
        return prev_round.clicks.iter()
            .enumerate()
            .map(|(slot, clicks)| {
                let payment = payment_for_slot(slot, reserve, &others);
                match spend_cap {
                    Some(cap) if payment >= cap => f64::NEG_INFINITY,
                    _ => clicks * (self.value - payment),
                }
            })
            .collect();
    }

    pub fn target_slot(&self, prev_round: &AuctionRound, reserve: f64, spend_cap: Option<f64>) -> Option<SlotTarget> {
        let slot = argmax_index(&self.expected_utils(prev_round, reserve, spend_cap))?;
        let (_slot, min_bid, max_bid) = self.slot_info(prev_round, reserve)[slot];
        let payment = payment_for_slot(slot, reserve, &prev_round.other_bids(self.id));
        return Some(SlotTarget { slot, min_bid, max_bid, payment });
    }

    pub fn bid(&self, t: usize, history: &AuctionHistory, reserve: f64) -> f64 {
        if t == 0 {
            return self.initial_bid();
        }
        return self.balanced_bid(history.round(t - 1), reserve, None);
    }

    pub(crate) fn balanced_bid(&self, prev_round: &AuctionRound, reserve: f64, spend_cap: Option<f64>) -> f64 {
        let target = match self.target_slot(prev_round, reserve, spend_cap) {
            Some(target) => target,
            None => return self.initial_bid(),
        };

        let bid = if target.payment > self.value || target.slot == 0 {
            self.value
        } else {
            let target_clicks = prev_round.clicks[target.slot];
            let better_clicks = prev_round.clicks[target.slot - 1];
            if better_clicks <= 0.0 {
                target.payment
            } else {
                self.value - target_clicks * (self.value - target.payment) / better_clicks
            }
        };

        debug!("Bidder {} :: targeting slot {} at payment {:.2}, bidding {:.2}", self.id, target.slot, target.payment, bid);
        return bid.max(0.0).min(self.value);
    }
}

#[cfg(test)]
mod tests {
    use crate::auction::bidder::BalancedBidder;
    use crate::auction::gsp::GspAuction;
    use crate::auction::models::{AuctionHistory, AuctionRound};

    fn history_with(bids: &[(usize, f64)], clicks: &[f64], reserve: f64) -> AuctionHistory {
        let mut history = AuctionHistory::new();
        history.push_round(GspAuction::run(bids, clicks, reserve));
        return history;
    }

    #[test]
    fn test_first_round_bids_half_value() {
        let bidder = BalancedBidder::new(0, 13.0);
        assert_eq!(bidder.bid(0, &AuctionHistory::new(), 1.0), 6.5);
    }

    #[test]
    fn test_targets_best_utility_slot() {
        let bidder = BalancedBidder::new(0, 10.0);
        let history = history_with(&[(0, 4.0), (1, 9.0), (2, 3.0)], &[100.0, 80.0, 10.0], 1.0);
        let prev = history.round(0);

        // slot 0 pays 9 -> 100, slot 1 pays 3 -> 560, slot 2 pays 1 -> 90
        assert_eq!(bidder.expected_utils(prev, 1.0, None), vec![100.0, 560.0, 90.0]);
        let target = bidder.target_slot(prev, 1.0, None).unwrap();
        assert_eq!(target.slot, 1);
        assert_eq!(target.min_bid, 3.0);
        assert_eq!(target.max_bid, 9.0);

        // 80 * (10 - 3) = 100 * (10 - b)  =>  b = 4.4
        let bid = bidder.bid(1, &history, 1.0);
        assert!((bid - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_top_slot_bids_value() {
        let bidder = BalancedBidder::new(0, 10.0);
        let history = history_with(&[(0, 4.0), (1, 2.0)], &[100.0, 10.0], 1.0);
        assert_eq!(bidder.bid(1, &history, 1.0), 10.0);
    }

    #[test]
    fn test_unaffordable_slots_bid_value() {
        let bidder = BalancedBidder::new(0, 5.0);
        let history = history_with(&[(1, 20.0), (2, 15.0), (3, 12.0)], &[50.0, 40.0, 30.0], 1.0);
        assert_eq!(bidder.bid(1, &history, 1.0), 5.0);
    }

    #[test]
    fn test_reserve_above_value() {
        let bidder = BalancedBidder::new(0, 5.0);
        let history = history_with(&[(1, 3.0)], &[50.0, 40.0], 6.0);
        let bid = bidder.bid(1, &history, 6.0);
        assert!(bid >= 0.0 && bid <= 5.0);
    }

    #[test]
    fn test_no_slots_falls_back_to_initial_bid() {
        let bidder = BalancedBidder::new(0, 8.0);
        let mut history = AuctionHistory::new();
        history.push_round(AuctionRound::default());
        assert_eq!(bidder.bid(1, &history, 1.0), 4.0);
    }
}
