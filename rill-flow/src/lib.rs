#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Incremental, push-driven dataflow combinators with lookback accounting.

/// Type-erased transformers.
pub mod boxed;
/// Sliding-window extremum tracking.
pub mod extremum;
/// Fan-out routing and synchronized parallel composition.
pub mod fork;
/// Stateful primitive operators such as `scan`, `lag` and `mem_all`.
pub mod operators;
/// Fixed-capacity ring buffer.
pub mod rolling;
/// The `Transformer` and `Pipeline` traits plus sequential composition.
pub mod transformer;

/// Re-export of the boxed transformer types.
pub use crate::boxed::{BoxPipeline, BoxTransformer};
/// Re-export of the extremum constructors.
pub use crate::extremum::{
    match_distance, match_item, MatchDistance, MatchDistancePipeline, MatchItem,
    MatchItemPipeline,
};
/// Re-export of the fork constructors and routing traits.
pub use crate::fork::{
    fast_fork, fast_list_fork, fork, list_fork, map_fork, Branches, FastFork, Fork, Router,
};
/// Re-export of the primitive operators.
pub use crate::operators::{
    fork_with_lag, fork_with_lag_or, identity, lag, lag_or, map, map_indexed, map_with_last,
    map_with_last_or, mem_all, mem_all_full, scan, skip, ForkWithLag, Identity, Lag, Map,
    MapIndexed, MapWithLast, MemAll, Scan, Skip, Window,
};
/// Re-export of the ring buffer.
pub use crate::rolling::RollingList;
/// Re-export of the core traits and sequential composition.
pub use crate::transformer::{pipe, Pipe, Piped, Pipeline, Transformer};
