//! Paysage integration
//!
//! This module provides:
//! - API types for the structures collection
//! - Client for paging through a geographical category

pub mod client;
pub mod types;

pub use client::PaysageClient;
pub use types::*;
