//! mindscan-core
//!
//! Pure domain types shared by every MindScan crate: answers, response sets,
//! classification results and the persisted assessment record.
//! No I/O.

pub mod error;
pub mod models;
