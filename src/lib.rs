// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod article;
pub mod discussions;
pub mod headlines;
pub mod importance;
pub mod ingest;
pub mod rank;
pub mod reword;
pub mod tags;
pub mod teams;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{Aggregator, FeedQuery};
pub use crate::api::{router, AppState};
pub use crate::article::Article;
pub use crate::ingest::types::{RawRecord, SourceAdapter};
pub use crate::reword::{RandomSource, Rewriter, RngSource, SequenceSource};
