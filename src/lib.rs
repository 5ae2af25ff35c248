// Feedpaper: conversation grouping for a social timeline
//
// This is the library root. Each module corresponds to a stage of the
// pipeline that turns a flat list of posts into ordered conversations.

pub mod cluster;
pub mod config;
pub mod error;
pub mod feed;
pub mod ordering;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod topics;
