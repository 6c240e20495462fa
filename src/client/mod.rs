// File: ./src/client/mod.rs
pub mod sync;

pub use crate::client::sync::{
    HealthResponse, SyncClient, SyncOutcome, SyncResponse, SyncResult, SyncStats, SyncStatus,
};
