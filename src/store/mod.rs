//! File-backed stores: encrypted registered users, plain anonymous visitors,
//! and aggregate stats. All access is serialized per key in-process.

pub mod crypto;
pub mod stats;
pub mod users;
pub mod visitors;

pub use stats::{Stats, StatsStore};
pub use users::{Reading, UserRecord, UserStore, UserView};
pub use visitors::{VisitorRecord, VisitorStore};
