//! warroom-core - Core library for War Room
//!
//! This crate contains the shared models, local record cache, remote object
//! store adapter, merge engine and sync scheduler used by War Room clients,
//! plus the actor network catalog, narrative analysis client and exports.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod network;
pub mod remote;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{RecordId, VoteRecord};
