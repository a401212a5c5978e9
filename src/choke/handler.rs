use std::collections::HashSet;
use log::debug;
use rand::Rng;
use crate::choke::models::{AllocationPolicy, ChokeState};
use crate::choke::policies::{need_ranked, proportional, rank_by_rate, threshold, uniform};
use crate::choke::reciprocity::ReciprocityTracker;
use crate::config::StrategyConfig;
use crate::core_models::entities::{Bandwidth, LocalPieces, PeerId, PeerView, Request, Upload};
use crate::core_models::history::HistoryProvider;

/// Everything about the local node a policy may look at in one round.
pub struct RoundContext<'a> {
    pub agent_id: PeerId,
    pub round: usize,
    pub capacity: Bandwidth,
    pub local: &'a LocalPieces,
    pub config: &'a StrategyConfig,
}

/// Decides which requesters are unchoked each round and how much bandwidth each one gets.
pub struct BandwidthAllocator {
    policy: AllocationPolicy,
    state: ChokeState,
    tracker: ReciprocityTracker,
}

impl BandwidthAllocator {
    pub fn init(config: &StrategyConfig) -> Self {
        return BandwidthAllocator {
            policy: config.policy,
            state: ChokeState::new(),
            tracker: ReciprocityTracker::init(config.rate_window_rounds, config.reciprocation_rounds),
        };
    }

    pub fn policy(&self) -> AllocationPolicy {
        return self.policy;
    }

    pub fn state(&self) -> &ChokeState {
        return &self.state;
    }

    pub fn tracker(&self) -> &ReciprocityTracker {
        return &self.tracker;
    }

    pub fn allocate<R: Rng + ?Sized>(&mut self,
                                     ctx: &RoundContext,
                                     requests: &[Request],
                                     peers: &[PeerView],
                                     history: &dyn HistoryProvider,
                                     rng: &mut R) -> Vec<Upload> {
        self.tracker.observe(ctx.agent_id, history);
        if self.policy == AllocationPolicy::ThresholdReciprocity {
            threshold::update(ctx, peers, &self.tracker, &mut self.state);
        }

        let requesters = unique_requesters(requests);
        if requesters.is_empty() || ctx.capacity <= 0.0 {
            debug!("Peer {} :: round {}: nobody to upload to", ctx.agent_id, ctx.round);
            return vec![];
        }

        let grants: Vec<(PeerId, Bandwidth)> = match self.policy {
            AllocationPolicy::UniformRandom => {
                uniform::allocate(ctx, &requesters, rng)
            }
            AllocationPolicy::RankByRate => {
                rank_by_rate::allocate(ctx, &requesters, &self.tracker, &mut self.state, rng)
            }
            AllocationPolicy::ThresholdReciprocity => {
                threshold::allocate(ctx, &requesters, &mut self.state)
            }
            AllocationPolicy::ProportionalShare => {
                proportional::allocate(ctx, &requesters, &self.tracker, rng)
            }
            AllocationPolicy::NeedRanked => {
                need_ranked::allocate(ctx, &requesters, peers, rng)
            }
        };

        let uploads: Vec<Upload> = grants.into_iter()
            .filter(|(_peer_id, bandwidth)| bandwidth.is_finite() && *bandwidth > 0.0)
            .map(|(peer_id, bandwidth)| Upload { from_id: ctx.agent_id, to_id: peer_id, bandwidth })
            .collect();

        debug_assert!(uploads.iter().map(|upload| upload.bandwidth).sum::<f64>() <= ctx.capacity + 1e-9);
        debug!("Peer {} :: round {}: {:?} unchoked {:?}",
            ctx.agent_id, ctx.round, self.policy,
            uploads.iter().map(|upload| (upload.to_id, upload.bandwidth)).collect::<Vec<_>>());
        return uploads;
    }
}

/// Requesters in first-seen order, each listed once.
pub fn unique_requesters(requests: &[Request]) -> Vec<PeerId> {
    let mut seen: HashSet<PeerId> = HashSet::new();
    return requests.iter()
        .map(|request| request.requester_id)
        .filter(|requester_id| seen.insert(*requester_id))
        .collect();
}
