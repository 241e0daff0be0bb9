mod ranker;
mod ranking_model;

pub use ranker::rank;
pub use ranking_model::RankingSnapshot;
