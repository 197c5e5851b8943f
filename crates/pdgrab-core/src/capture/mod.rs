//! Capture registry.
//!
//! Tracks, per browser tab, the ordered list of unique progressive-download
//! candidates discovered so far:
//! - first discovery wins; later requests for the same logical asset are dropped
//! - labels are fixed at insertion time
//! - the whole list is dropped when the tab closes, activates or starts loading
//!
//! The registry is a plain `&mut self` state object. The request pipeline in
//! [`crate::service`] owns it behind a lock so record/clear stay atomic per tab.

mod entry;
mod label;
mod registry;

pub use entry::{capture_identity, Capture};
pub use label::preview_label;
pub use registry::{CaptureRegistry, RecordOutcome};
