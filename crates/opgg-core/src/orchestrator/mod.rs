//! Composition of fetch primitives.
//!
//! Three shapes, each with its own failure policy:
//! - [`search_regions`]: fan-out/fan-in, a failing region contributes nothing
//! - [`fetch_batch`]: one request per identifier, first failure wins
//! - [`paginate_history`]: sequential pages, partial result after page one;
//!   [`paginate_many`] runs several chains without racing them again, so each
//!   keeps its own partial result
//!
//! Fan-out uses `futures` combinators on the caller's task; nothing here
//! spawns.

mod batch;
mod history;
mod search;

pub use batch::{fetch_batch, run_bounded};
pub use history::{paginate_history, paginate_many, HistoryOutcome, HistoryRequest, StopReason};
pub use search::{search_regions, RegionFailure, SearchMatch, SearchOutcome};
