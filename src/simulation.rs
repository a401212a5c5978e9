use std::collections::HashMap;
use log::{debug, info};
use crate::agent::{PeerStrategy, SwarmAgent};
use crate::core_models::entities::{Download, LocalPieces, PeerId, PeerView, Request, Upload};
use crate::core_models::history::{HistoryProvider, RoundHistory};

/// What happened in one simulated round.
#[derive(Debug)]
pub struct RoundReport {
    pub round: usize,
    pub requests: Vec<Request>,
    pub uploads: Vec<Upload>,
    pub downloads: Vec<Download>,
}

impl RoundReport {
    pub fn uploaded_by(&self, peer_id: PeerId) -> f64 {
        return self.uploads.iter()
            .filter(|upload| upload.from_id == peer_id)
            .map(|upload| upload.bandwidth)
            .sum();
    }
}

/// Minimal round driver: shows every agent the others' completed pieces, routes requests,
/// and turns granted bandwidth into block transfers.
pub struct Swarm {
    agents: Vec<SwarmAgent>,
    pieces: Vec<LocalPieces>,
    history: RoundHistory,
}

impl Swarm {
    pub fn new() -> Self {
        return Swarm { agents: vec![], pieces: vec![], history: RoundHistory::new() };
    }

    pub fn add_agent(&mut self, agent: SwarmAgent) {
        assert!(self.agents.iter().all(|other| other.id() != agent.id()), "duplicate agent id {}", agent.id());
        if let Some(first) = self.pieces.first() {
            assert_eq!(first.num_of_pieces(), agent.pieces().num_of_pieces(), "agents disagree on the piece count");
        }
        self.pieces.push(agent.pieces().clone());
        self.agents.push(agent);
    }

    pub fn history(&self) -> &RoundHistory {
        return &self.history;
    }

    pub fn pieces_of(&self, peer_id: PeerId) -> Option<&LocalPieces> {
        return self.agents.iter()
            .position(|agent| agent.id() == peer_id)
            .map(|idx| &self.pieces[idx]);
    }

    pub fn agents(&self) -> &[SwarmAgent] {
        return &self.agents;
    }

    pub fn all_complete(&self) -> bool {
        return self.pieces.iter().all(|pieces| pieces.is_seed());
    }

    pub fn step(&mut self) -> RoundReport {
        let round = self.history.current_round();
        let views: Vec<PeerView> = self.agents.iter().zip(self.pieces.iter())
            .map(|(agent, pieces)| PeerView::new(agent.id(), agent.up_bw(), pieces.completed_pieces()))
            .collect();

        let mut requests: Vec<Request> = vec![];
        for (idx, agent) in self.agents.iter_mut().enumerate() {
            agent.update_pieces(self.pieces[idx].clone());
            let others = views_without(&views, agent.id());
            requests.extend(agent.requests(&others, &self.history));
        }

        let mut uploads: Vec<Upload> = vec![];
        for agent in self.agents.iter_mut() {
            let incoming: Vec<Request> = requests.iter()
                .filter(|request| request.peer_id == agent.id())
                .cloned()
                .collect();
            let others = views_without(&views, agent.id());
            uploads.extend(agent.uploads(&incoming, &others, &self.history));
        }

        let downloads = self.transfer(&requests, &uploads);
        debug!("Swarm :: round {}: {} requests, {} uploads, {} downloads",
            round, requests.len(), uploads.len(), downloads.len());
        self.history.push_round(downloads.clone());

        return RoundReport { round, requests, uploads, downloads };
    }

    /// Runs until every agent holds the whole file or `max_rounds` pass. Returns the rounds played.
    pub fn run(&mut self, max_rounds: usize) -> usize {
        let mut played = 0;
        while played < max_rounds && !self.all_complete() {
            self.step();
            played += 1;
        }
        info!("Swarm :: finished after {} rounds, complete: {}", played, self.all_complete());
        return played;
    }

    // serves each recipient's requests to an uploader in order, one block per bandwidth unit
    fn transfer(&mut self, requests: &[Request], uploads: &[Upload]) -> Vec<Download> {
        let index: HashMap<PeerId, usize> = self.agents.iter()
            .enumerate()
            .map(|(idx, agent)| (agent.id(), idx))
            .collect();

        let mut downloads: Vec<Download> = vec![];
        for upload in uploads {
            let (from_idx, to_idx) = match (index.get(&upload.from_id), index.get(&upload.to_id)) {
                (Some(from_idx), Some(to_idx)) => (*from_idx, *to_idx),
                _ => continue,
            };
            let mut budget = upload.bandwidth.floor() as usize;
            let wanted = requests.iter()
                .filter(|request| request.requester_id == upload.to_id && request.peer_id == upload.from_id);
            for request in wanted {
                if budget == 0 {
                    break;
                }
                if !self.pieces[from_idx].is_complete(request.piece_id) {
                    continue;
                }
                let stored = self.pieces[to_idx].add_blocks(request.piece_id, budget);
                if stored > 0 {
                    budget -= stored;
                    downloads.push(Download {
                        from_id: upload.from_id,
                        to_id: upload.to_id,
                        piece_id: request.piece_id,
                        blocks: stored,
                    });
                }
            }
        }
        return downloads;
    }
}

fn views_without(views: &[PeerView], peer_id: PeerId) -> Vec<PeerView> {
    return views.iter()
        .filter(|view| view.id != peer_id)
        .cloned()
        .collect();
}
