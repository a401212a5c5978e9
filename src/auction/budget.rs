use std::collections::HashMap;
use log::debug;
use crate::auction::bidder::BalancedBidder;
use crate::auction::models::{AuctionHistory, BidderId};
use crate::auction::pacing::pacing_share;
use crate::config::AuctionConfig;

/// Balanced bidder that paces its spending over the auction with a per-round cap.
#[derive(Clone, Debug)]
pub struct BudgetBidder {
    bidder: BalancedBidder,
    budget: f64,
    config: AuctionConfig,
    spent: f64,
    clicks_won: f64,
    competitor_spend: HashMap<BidderId, f64>,
    market_spend: f64,
    market_clicks: f64,
    next_round_to_observe: usize,
}

impl BudgetBidder {
    pub fn new(id: BidderId, value: f64, budget: f64, config: AuctionConfig) -> Self {
        assert!(budget >= 0.0, "budget must be non-negative");
        return BudgetBidder {
            bidder: BalancedBidder::new(id, value),
            budget,
            config,
            spent: 0.0,
            clicks_won: 0.0,
            competitor_spend: HashMap::new(),
            market_spend: 0.0,
            market_clicks: 0.0,
            next_round_to_observe: 0,
        };
    }

    pub fn id(&self) -> BidderId {
        return self.bidder.id;
    }

    pub fn value(&self) -> f64 {
        return self.bidder.value;
    }

    pub fn spent(&self) -> f64 {
        return self.spent;
    }

    pub fn clicks_won(&self) -> f64 {
        return self.clicks_won;
    }

    pub fn remaining_budget(&self) -> f64 {
        return (self.budget - self.spent).max(0.0);
    }

    /// Folds every finished round up to `t - 1` into the spend and click totals.
    pub fn observe(&mut self, t: usize, history: &AuctionHistory) {
        let my_id = self.id();
        let observe_until = t.min(history.current_round());
        for round_idx in self.next_round_to_observe..observe_until {
            let round = history.round(round_idx);
            for (bidder_id, _bid) in round.bids.iter().filter(|(id, _bid)| *id != my_id) {
                self.competitor_spend.entry(*bidder_id).or_insert(0.0);
            }
            for (slot, occupant) in round.occupants.iter().enumerate() {
                let spend = round.slot_spend(slot);
                self.market_spend += spend;
                self.market_clicks += round.clicks[slot];
                if *occupant == my_id {
                    self.spent += spend;
                    self.clicks_won += round.clicks[slot];
                } else {
                    *self.competitor_spend.entry(*occupant).or_insert(0.0) += spend;
                }
            }
        }
        self.next_round_to_observe = self.next_round_to_observe.max(observe_until);
    }

    /// Spending allowed in round `t`: the pacing curve's share of the remaining budget, scaled by how
    /// this bidder has fared against the market so far.
    pub fn target_budget(&self, t: usize) -> f64 {
        let remaining = self.remaining_budget();
        let share = match pacing_share(t, self.config.num_rounds) {
            Some(share) => share,
            None => return 0.0,
        };
        let target = remaining * share * self.spend_factor() * self.click_factor();
        return target.min(remaining);
    }

    pub fn bid(&mut self, t: usize, history: &AuctionHistory, reserve: f64) -> f64 {
        if t == 0 {
            return self.bidder.initial_bid();
        }
        self.observe(t, history);

        let cap = self.target_budget(t);
        let bid = self.bidder.balanced_bid(history.round(t - 1), reserve, Some(cap));
        debug!("Bidder {} :: round {} cap {:.2}, spent {:.2} of {:.2}", self.id(), t, cap, self.spent, self.budget);
        return bid.min(cap).max(0.0);
    }

    // own spend relative to the average competitor
    fn spend_factor(&self) -> f64 {
        if self.competitor_spend.is_empty() {
            return 1.0;
        }
        let average = self.competitor_spend.values().sum::<f64>() / self.competitor_spend.len() as f64;
        if average <= 0.0 || self.spent <= 0.0 {
            return 1.0;
        }
        return self.clamp_factor(self.spent / average);
    }

    // own clicks per unit spent relative to the whole market
    fn click_factor(&self) -> f64 {
        if self.spent <= 0.0 || self.market_spend <= 0.0 || self.market_clicks <= 0.0 {
            return 1.0;
        }
        let own = self.clicks_won / self.spent;
        let market = self.market_clicks / self.market_spend;
        return self.clamp_factor(own / market);
    }

    fn clamp_factor(&self, factor: f64) -> f64 {
        return factor.max(self.config.min_pacing_factor).min(self.config.max_pacing_factor);
    }
}
