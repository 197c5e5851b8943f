//! `pdgrab classify <url>` – run the classifier on one URL.

use anyhow::Result;
use pdgrab_core::classify::classify;

pub fn run_classify(url: &str) -> Result<()> {
    match classify(url) {
        Some(c) => {
            println!("{}", c.download_url);
            println!("  type: {}", c.media_type);
        }
        None => println!("rejected"),
    }
    Ok(())
}
