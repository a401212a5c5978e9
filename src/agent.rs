use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::choke::handler::{BandwidthAllocator, RoundContext};
use crate::config::StrategyConfig;
use crate::core_models::entities::{Bandwidth, LocalPieces, PeerId, PeerView, Request, Upload};
use crate::core_models::history::HistoryProvider;
use crate::piece_picker::planner::RequestPlanner;

/// The two per-round decisions the simulation engine asks every participant for.
pub trait PeerStrategy {
    fn id(&self) -> PeerId;
    fn up_bw(&self) -> Bandwidth;
    fn update_pieces(&mut self, pieces: LocalPieces);
    fn requests(&mut self, peers: &[PeerView], history: &dyn HistoryProvider) -> Vec<Request>;
    fn uploads(&mut self, requests: &[Request], peers: &[PeerView], history: &dyn HistoryProvider) -> Vec<Upload>;
}

/// One swarm participant. Owns its random source and allocator state.
pub struct SwarmAgent {
    id: PeerId,
    up_bw: Bandwidth,
    pieces: LocalPieces,
    config: StrategyConfig,
    planner: RequestPlanner,
    allocator: BandwidthAllocator,
    rng: StdRng,
}

impl SwarmAgent {
    pub fn init(id: PeerId, up_bw: Bandwidth, pieces: LocalPieces, config: StrategyConfig, seed: u64) -> Self {
        assert_eq!(pieces.blocks_per_piece(), config.blocks_per_piece, "piece layout does not match the configuration");
        return SwarmAgent {
            id,
            up_bw,
            pieces,
            planner: RequestPlanner::init(config.max_requests),
            allocator: BandwidthAllocator::init(&config),
            config,
            rng: StdRng::seed_from_u64(seed),
        };
    }

    pub fn pieces(&self) -> &LocalPieces {
        return &self.pieces;
    }

    pub fn allocator(&self) -> &BandwidthAllocator {
        return &self.allocator;
    }

    pub fn config(&self) -> &StrategyConfig {
        return &self.config;
    }
}

impl PeerStrategy for SwarmAgent {
    fn id(&self) -> PeerId {
        return self.id;
    }

    fn up_bw(&self) -> Bandwidth {
        return self.up_bw;
    }

    fn update_pieces(&mut self, pieces: LocalPieces) {
        assert_eq!(pieces.num_of_pieces(), self.pieces.num_of_pieces(), "piece count changed between rounds");
        self.pieces = pieces;
    }

    fn requests(&mut self, peers: &[PeerView], history: &dyn HistoryProvider) -> Vec<Request> {
        debug!("Peer {} :: round {}: still need {} pieces",
            self.id, history.current_round(), self.pieces.needed_pieces().len());
        return self.planner.plan(self.id, &self.pieces, peers, &mut self.rng);
    }

    fn uploads(&mut self, requests: &[Request], peers: &[PeerView], history: &dyn HistoryProvider) -> Vec<Upload> {
        let ctx = RoundContext {
            agent_id: self.id,
            round: history.current_round(),
            capacity: self.up_bw,
            local: &self.pieces,
            config: &self.config,
        };
        return self.allocator.allocate(&ctx, requests, peers, history, &mut self.rng);
    }
}
