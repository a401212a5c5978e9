use std::cmp::Ordering;
use crate::choke::handler::RoundContext;
use crate::choke::models::ChokeState;
use crate::choke::reciprocity::ReciprocityTracker;
use crate::core_models::entities::{Bandwidth, PeerId, PeerView};
use crate::util::unchoke_slots;

/// Seeds or updates per-peer rate estimates and reciprocation thresholds. Runs at most once per round.
pub fn update(ctx: &RoundContext,
              peers: &[PeerView],
              tracker: &ReciprocityTracker,
              state: &mut ChokeState) {
    if state.last_threshold_update == Some(ctx.round) {
        return;
    }
    let seed = seed_value(ctx.capacity);

    if !state.is_seeded() || ctx.round == 0 {
        peers.iter().for_each(|peer| state.seed_peer(peer.id, seed));
        state.last_threshold_update = Some(ctx.round);
        return;
    }

    for peer in peers {
        if state.threshold(peer.id).is_none() {
            state.seed_peer(peer.id, seed);
            continue;
        }

        if tracker.reciprocated_last_round(peer.id) {
            state.rate_estimates.insert(peer.id, tracker.blocks_last_round(peer.id) as f64);
            if tracker.reciprocation_count(peer.id) >= ctx.config.reciprocation_rounds {
                if let Some(threshold) = state.thresholds.get_mut(&peer.id) {
                    *threshold *= 1.0 - ctx.config.gamma;
                }
            }
        } else {
            if let Some(threshold) = state.thresholds.get_mut(&peer.id) {
                *threshold *= 1.0 + ctx.config.alpha;
            }
            state.rate_estimates.insert(peer.id, availability_rate(ctx, peer));
        }
    }
    state.last_threshold_update = Some(ctx.round);
}

/// Admits requesters by best rate-per-threshold; each gets exactly its threshold.
/// A requester whose threshold exceeds the capacity left is rejected and the next one is tried.
pub fn allocate(ctx: &RoundContext, requesters: &[PeerId], state: &mut ChokeState) -> Vec<(PeerId, Bandwidth)> {
    let seed = seed_value(ctx.capacity);
    requesters.iter().for_each(|peer_id| state.seed_peer(*peer_id, seed));

    let mut ranked: Vec<(PeerId, f64, Bandwidth)> = requesters.iter()
        .filter_map(|peer_id| {
            let threshold = state.threshold(*peer_id)?;
            let rate = state.rate_estimate(*peer_id)?;
            if threshold <= 0.0 {
                return None;
            }
            Some((*peer_id, rate / threshold, threshold))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

    let mut remaining = ctx.capacity;
    let mut grants: Vec<(PeerId, Bandwidth)> = vec![];
    for (peer_id, _score, threshold) in ranked {
        if threshold > remaining {
            continue;
        }
        remaining -= threshold;
        grants.push((peer_id, threshold));
    }
    return grants;
}

fn seed_value(capacity: Bandwidth) -> Bandwidth {
    let slots = unchoke_slots(capacity);
    if slots == 0 {
        return capacity;
    }
    return capacity / slots as f64;
}

// blocks per round the peer could send us: its collection rate, bounded by one of its upload slots
fn availability_rate(ctx: &RoundContext, peer: &PeerView) -> f64 {
    if ctx.round == 0 {
        return 0.0;
    }
    let blocks = peer.available_pieces.len() * ctx.config.blocks_per_piece;
    let collected = blocks as f64 / ctx.round as f64;
    return collected.min(per_slot_upload(peer.up_bw));
}

fn per_slot_upload(up_bw: Bandwidth) -> Bandwidth {
    let slots = unchoke_slots(up_bw);
    if slots == 0 {
        return up_bw.max(0.0);
    }
    return up_bw / slots as f64;
}
