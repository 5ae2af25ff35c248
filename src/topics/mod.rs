// Topic signals: entity tallies and the similarity used for ordering.

pub mod entity;
pub mod similarity;
pub mod traits;
