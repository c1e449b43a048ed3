//! Brew/Koji hub client for the KSWEEP sweep engine.
//!
//! Implements [`ksweep_core::BuildTagApi`]: given build NVRs, report the
//! Brew tags currently applied to each. Tag membership is what decides
//! whether a kernel fix is still baking, in the candidate tag, or shipped.

pub mod client;
pub mod error;

pub use client::{BrewClient, BrewConfig};
pub use error::BrewError;
