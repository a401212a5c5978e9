use log::info;
use swarm_strategies::agent::{PeerStrategy, SwarmAgent};
use swarm_strategies::auction::budget::BudgetBidder;
use swarm_strategies::auction::gsp::GspAuction;
use swarm_strategies::auction::models::AuctionHistory;
use swarm_strategies::auction::pacing::expected_clicks;
use swarm_strategies::choke::models::AllocationPolicy;
use swarm_strategies::config::{AuctionConfig, StrategyConfig};
use swarm_strategies::core_models::entities::LocalPieces;
use swarm_strategies::simulation::Swarm;

const NUM_OF_PIECES: usize = 32;
const MAX_ROUNDS: usize = 500;
const AUCTION_SLOTS: usize = 4;
const AUCTION_RESERVE: f64 = 1.0;

fn main() {
    env_logger::init();
    run_swarm();
    run_auction();
}

fn run_swarm() {
    info!("starting swarm at... {}", chrono::prelude::Utc::now());
    let config = StrategyConfig::default();
    let mut swarm = Swarm::new();
    swarm.add_agent(SwarmAgent::init(
        0, 32.0, LocalPieces::complete(NUM_OF_PIECES, config.blocks_per_piece),
        StrategyConfig::init(AllocationPolicy::UniformRandom), 0,
    ));
    for (idx, policy) in AllocationPolicy::ALL.iter().enumerate() {
        let id = idx + 1;
        swarm.add_agent(SwarmAgent::init(
            id, 16.0, LocalPieces::init(NUM_OF_PIECES, config.blocks_per_piece),
            StrategyConfig::init(*policy), id as u64,
        ));
    }

    let rounds = swarm.run(MAX_ROUNDS);
    for agent in swarm.agents() {
        let done = swarm.pieces_of(agent.id()).map_or(0, |pieces| pieces.completed_pieces().len());
        info!("peer {} ({:?}): {} of {} pieces", agent.id(), agent.config().policy, done, NUM_OF_PIECES);
    }
    info!("swarm finished after {} rounds at... {}", rounds, chrono::prelude::Utc::now());
}

fn run_auction() {
    let config = AuctionConfig::default();
    let mut bidders: Vec<BudgetBidder> = (0..5)
        .map(|id| BudgetBidder::new(id, 10.0 + 5.0 * id as f64, 2000.0, config.clone()))
        .collect();
    let mut history = AuctionHistory::new();

    for t in 0..config.num_rounds {
        let bids: Vec<(usize, f64)> = bidders.iter_mut()
            .map(|bidder| (bidder.id(), bidder.bid(t, &history, AUCTION_RESERVE)))
            .collect();
        let clicks: Vec<f64> = (0..AUCTION_SLOTS).map(|slot| expected_clicks(t, slot)).collect();
        history.push_round(GspAuction::run(&bids, &clicks, AUCTION_RESERVE));
    }

    for bidder in bidders.iter_mut() {
        bidder.observe(config.num_rounds, &history);
        info!("bidder {} (value {}): spent {:.1}, won {:.0} clicks",
            bidder.id(), bidder.value(), bidder.spent(), bidder.clicks_won());
    }
}
