//! `pandavote vote` — run the five-voter election sequence.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::ballot::Decision;
use crate::election::{self, ElectionConfig};

/// Run the vote command: submit all five votes, then record the result.
///
/// The result file is written only once every voter has an accepted vote.
pub async fn run(
    decision: Decision,
    config: ElectionConfig,
    results_dir: &Path,
) -> Result<()> {
    let report = election::run(&config, decision).await?;
    let path = report.write(results_dir)?;

    info!(path = %path.display(), "election complete");
    println!(
        "All five votes accepted. Result written to {}",
        path.display()
    );

    Ok(())
}
