//! CLI command handlers, one per file.

mod classify;
mod clear;
mod import_har;
mod list;
mod pick;
mod replay;

pub use classify::run_classify;
pub use clear::run_clear;
pub use import_har::run_import_har;
pub use list::run_list;
pub use pick::run_pick;
pub use replay::run_replay;

use pdgrab_core::capture::Capture;
use pdgrab_core::present::display_line;
use pdgrab_core::tab::TabId;

/// Print a tab's captures the way the picker lists them.
pub(super) fn print_tab(tab: TabId, captures: &[Capture]) {
    println!("Tab {tab}: {} candidate(s)", captures.len());
    for (i, capture) in captures.iter().enumerate() {
        println!("  {}", display_line(i, capture));
        println!("     {}", capture.url);
    }
}
