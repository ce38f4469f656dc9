//! C ABI and consumer-side ownership for provcap manifests.
//!
//! The `api` module is the producer half of the boundary. `handle` and
//! `consumer` are the Rust caller's half: they turn raw pointers back into
//! single-owner values and drive the validation workflow.

pub mod api;
pub mod consumer;
pub mod handle;

pub use consumer::{
    CheckKind, CheckOutcome, ConsumerConfig, LinkedLibrary, ManifestConsumer, ManifestSource,
    ProbeReport, ProviderReport,
};
pub use handle::{get_manifest, release_handle, ForeignString, ManifestView, ReleaseFn};
