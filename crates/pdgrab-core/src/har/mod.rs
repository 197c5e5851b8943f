//! HAR (HTTP Archive) import: replay the requests a browser session recorded.
//!
//! Dev tools can export a page's network log as HAR. Feeding its entries
//! through the capture pipeline gives the same candidates the live browser
//! would have produced for that page.

mod parse;
mod requests;

pub use requests::{load_har_requests, TabAssignment};
