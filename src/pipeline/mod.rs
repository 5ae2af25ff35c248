// Feed pipeline: posts in, ordered and filtered conversations out.

pub mod feed;
