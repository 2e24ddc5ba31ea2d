//! Track records produced by the interpretation engine.
//!
//! A [`TrackRecordSet`] is the complete set of observations valid at one
//! instant. Each new set replaces the previous one wholesale; there is no
//! incremental diffing.

mod model;

pub use model::{TrackClass, TrackRecord, TrackRecordSet};
