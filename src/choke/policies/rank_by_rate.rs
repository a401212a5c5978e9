use rand::Rng;
use rand::seq::SliceRandom;
use crate::choke::handler::RoundContext;
use crate::choke::models::ChokeState;
use crate::choke::reciprocity::ReciprocityTracker;
use crate::core_models::entities::{Bandwidth, PeerId};
use crate::util::{even_split, unchoke_slots};

// rounds before download rates are trusted for ranking
const WARMUP_ROUNDS: usize = 2;

/// Fixed `floor(sqrt(capacity))` slots filled by the fastest uploaders, plus a sticky optimistic slot.
pub fn allocate<R: Rng + ?Sized>(ctx: &RoundContext,
                                 requesters: &[PeerId],
                                 tracker: &ReciprocityTracker,
                                 state: &mut ChokeState,
                                 rng: &mut R) -> Vec<(PeerId, Bandwidth)> {
    let slots = unchoke_slots(ctx.capacity);
    if slots == 0 {
        return vec![];
    }

    let mut unchoked: Vec<PeerId> = if ctx.round < WARMUP_ROUNDS {
        requesters.choose_multiple(rng, slots).copied().collect()
    } else {
        let mut ranked: Vec<PeerId> = requesters.to_vec();
        ranked.shuffle(rng);
        ranked.sort_by(|a, b| tracker.download_rate(*b).cmp(&tracker.download_rate(*a)));
        ranked.into_iter().take(slots).collect()
    };

    if ctx.config.is_optimistic_round(ctx.round) {
        let outsiders: Vec<PeerId> = requesters.iter()
            .filter(|peer_id| !unchoked.contains(peer_id))
            .copied()
            .collect();
        if let Some(peer_id) = outsiders.choose(rng) {
            state.current_optimistic_peer = Some(*peer_id);
        }
    }

    if let Some(optimistic) = state.current_optimistic_peer {
        if requesters.contains(&optimistic) && !unchoked.contains(&optimistic) {
            unchoked.push(optimistic);
        }
    }

    let shares = even_split(ctx.capacity, unchoked.len());
    return unchoked.into_iter().zip(shares).collect();
}
