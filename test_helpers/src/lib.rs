//! Test helpers shared across the icicle workspace.
//!
//! [`elements`] builds source-model fixtures and round manifests;
//! [`figment`] runs configuration tests inside an isolated jail.

pub mod elements;
pub mod figment;
