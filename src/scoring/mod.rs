// Conversation scoring: starting rank and the show/hide decision.

pub mod rank;
pub mod visibility;
