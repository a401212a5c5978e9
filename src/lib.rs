pub mod auction {
    pub mod bidder;
    pub mod budget;
    pub mod gsp;
    pub mod models;
    pub mod pacing;
}

pub mod choke {
    pub mod handler;
    pub mod models;
    pub mod reciprocity;

    pub mod policies {
        pub mod need_ranked;
        pub mod proportional;
        pub mod rank_by_rate;
        pub mod threshold;
        pub mod uniform;
    }
}

pub mod core_models {
    pub mod entities;
    pub mod history;
}

pub mod piece_picker {
    pub mod availability;
    pub mod planner;
}

pub mod agent;
pub mod config;
pub mod mocks;
pub mod simulation;
pub mod util;
