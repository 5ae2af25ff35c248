// Timeline input: the post model, key extraction, and loading.
//
// Posts arrive already fetched and (optionally) enriched. Nothing in here
// does network I/O; `load` only reads a JSON dump from disk.

pub mod keys;
pub mod load;
pub mod post;
pub mod timestamp;
pub mod window;
