use rand::Rng;
use rand::seq::SliceRandom;
use crate::choke::handler::RoundContext;
use crate::core_models::entities::{Bandwidth, PeerId};

/// Hands the whole capacity to one requester picked at random.
pub fn allocate<R: Rng + ?Sized>(ctx: &RoundContext, requesters: &[PeerId], rng: &mut R) -> Vec<(PeerId, Bandwidth)> {
    return requesters.choose(rng)
        .map_or_else(|| vec![], |peer_id| vec![(*peer_id, ctx.capacity)]);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::choke::handler::RoundContext;
    use crate::choke::models::AllocationPolicy;
    use crate::choke::policies::uniform::allocate;
    use crate::config::StrategyConfig;
    use crate::core_models::entities::LocalPieces;

    #[test]
    fn test_single_requester_gets_everything() {
        let local = LocalPieces::init(2, 2);
        let config = StrategyConfig::init(AllocationPolicy::UniformRandom);
        let ctx = RoundContext { agent_id: 0, round: 0, capacity: 12.0, local: &local, config: &config };
        let grants = allocate(&ctx, &[4, 5, 6], &mut StdRng::seed_from_u64(2));

        assert_eq!(grants.len(), 1);
        assert!([4, 5, 6].contains(&grants[0].0));
        assert_eq!(grants[0].1, 12.0);
    }

    #[test]
    fn test_no_requesters() {
        let local = LocalPieces::init(2, 2);
        let config = StrategyConfig::init(AllocationPolicy::UniformRandom);
        let ctx = RoundContext { agent_id: 0, round: 0, capacity: 12.0, local: &local, config: &config };
        assert!(allocate(&ctx, &[], &mut StdRng::seed_from_u64(2)).is_empty());
    }
}
