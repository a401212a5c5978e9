use std::cmp::Ordering;
use crate::auction::models::{AuctionRound, BidderId};

/// Generalized second-price mechanism: slot winners pay the next bid down, never less than the reserve.
pub struct GspAuction;

impl GspAuction {
    pub fn run(bids: &[(BidderId, f64)], clicks: &[f64], reserve: f64) -> AuctionRound {
        let mut eligible: Vec<(BidderId, f64)> = bids.iter()
            .filter(|(_id, bid)| *bid >= reserve)
            .copied()
            .collect();
        eligible.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        let filled = eligible.len().min(clicks.len());
        let occupants: Vec<BidderId> = eligible.iter().take(filled).map(|(id, _bid)| *id).collect();
        let per_click_payments: Vec<f64> = (0..filled)
            .map(|slot| eligible.get(slot + 1).map_or(reserve, |(_id, bid)| bid.max(reserve)))
            .collect();

        return AuctionRound {
            bids: bids.to_vec(),
            clicks: clicks.to_vec(),
            occupants,
            per_click_payments,
        };
    }
}

fn sorted_descending(other_bids: &[f64]) -> Vec<f64> {
    let mut sorted = other_bids.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    return sorted;
}

/// Per-click price of taking `slot` if every other bid stays put.
pub fn payment_for_slot(slot: usize, reserve: f64, other_bids: &[f64]) -> f64 {
    let sorted = sorted_descending(other_bids);
    return sorted.get(slot).map_or(reserve, |bid| bid.max(reserve));
}

/// Bids in `[min, max)` land in `slot` given the other bids. The top slot has no upper bound.
pub fn bid_range_for_slot(slot: usize, reserve: f64, other_bids: &[f64]) -> (f64, Option<f64>) {
    let sorted = sorted_descending(other_bids);
    let min = sorted.get(slot).map_or(reserve, |bid| bid.max(reserve));
    let max = if slot == 0 { None } else { sorted.get(slot - 1).copied() };
    return (min, max);
}
