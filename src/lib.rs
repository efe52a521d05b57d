//! A splay tree over borrowed values, ordered by an injected comparator, with its nodes held in a
//! chunked arena.

pub mod arena;
pub mod splay_tree;
