use rand::Rng;
use rand::seq::SliceRandom;
use crate::choke::handler::RoundContext;
use crate::choke::reciprocity::ReciprocityTracker;
use crate::core_models::entities::{Bandwidth, PeerId};

/// Splits the configured share of capacity in proportion to what each requester sent last round.
/// The rest goes to one random requester that sent nothing.
pub fn allocate<R: Rng + ?Sized>(ctx: &RoundContext,
                                 requesters: &[PeerId],
                                 tracker: &ReciprocityTracker,
                                 rng: &mut R) -> Vec<(PeerId, Bandwidth)> {
    if ctx.round == 0 {
        return vec![];
    }

    let pool = ctx.capacity * ctx.config.proportional_share;
    let contributions: Vec<(PeerId, usize)> = requesters.iter()
        .map(|peer_id| (*peer_id, tracker.blocks_last_round(*peer_id)))
        .collect();
    let total: usize = contributions.iter().map(|(_peer_id, blocks)| *blocks).sum();

    let mut grants: Vec<(PeerId, Bandwidth)> = vec![];
    if total > 0 {
        for (peer_id, blocks) in contributions.iter().filter(|(_peer_id, blocks)| *blocks > 0) {
            let share = (pool * *blocks as f64 / total as f64).floor();
            grants.push((*peer_id, share));
        }
    }

    let non_contributors: Vec<PeerId> = contributions.iter()
        .filter(|(_peer_id, blocks)| *blocks == 0)
        .map(|(peer_id, _blocks)| *peer_id)
        .collect();
    if let Some(peer_id) = non_contributors.choose(rng) {
        grants.push((*peer_id, (ctx.capacity - pool).floor()));
    }

    return grants;
}
