//! ROR (Research Organization Registry) integration
//!
//! This module provides:
//! - API types for the affiliation matching endpoint
//! - Client for querying it with one free-text affiliation at a time

pub mod client;
pub mod types;

pub use client::RorClient;
pub use types::*;
