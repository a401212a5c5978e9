use std::collections::{HashMap, HashSet};
use rand::Rng;
use rand::seq::SliceRandom;
use crate::choke::handler::RoundContext;
use crate::core_models::entities::{Bandwidth, PeerId, PeerView, PieceId};
use crate::util::{even_split, unchoke_slots};

/// Unchokes the requesters holding the most pieces this node still needs.
pub fn allocate<R: Rng + ?Sized>(ctx: &RoundContext,
                                 requesters: &[PeerId],
                                 peers: &[PeerView],
                                 rng: &mut R) -> Vec<(PeerId, Bandwidth)> {
    let slots = unchoke_slots(ctx.capacity);
    if slots == 0 {
        return vec![];
    }

    let needed: HashSet<PieceId> = ctx.local.needed_pieces().into_iter().collect();
    let views: HashMap<PeerId, &PeerView> = peers.iter().map(|peer| (peer.id, peer)).collect();
    let useful_pieces = |peer_id: &PeerId| -> usize {
        return views.get(peer_id)
            .map_or(0, |peer| peer.available_pieces.iter().filter(|piece_id| needed.contains(piece_id)).count());
    };

    let mut ranked: Vec<PeerId> = requesters.to_vec();
    ranked.shuffle(rng);
    ranked.sort_by_key(|peer_id| std::cmp::Reverse(useful_pieces(peer_id)));

    let mut unchoked: Vec<PeerId> = ranked.iter().take(slots).copied().collect();
    if ctx.config.is_optimistic_round(ctx.round) {
        if let Some(peer_id) = ranked[unchoked.len()..].choose(rng) {
            unchoked.push(*peer_id);
        }
    }

    let shares = even_split(ctx.capacity, unchoked.len());
    return unchoked.into_iter().zip(shares).collect();
}
