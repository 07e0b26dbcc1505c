//! Election result recording.
//!
//! The report is assembled in memory while votes are submitted and only
//! touches disk after all five votes have been accepted.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ballot::Decision;

/// Outcome of one voter's run.
#[derive(Debug, Clone, Serialize)]
pub struct VoterOutcome {
    pub name: String,
    pub survive: String,
    /// Attempts spent, counting the successful one.
    pub attempts: u32,
}

/// The accumulated result of a full election run.
#[derive(Debug, Clone, Serialize)]
pub struct ElectionReport {
    pub decision: Decision,
    pub voters: Vec<VoterOutcome>,
    pub completed_at: String,
    /// Final tally JSON returned by the site, when the last vote closed
    /// the election.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<serde_json::Value>,
}

impl ElectionReport {
    pub fn new(
        decision: Decision,
        voters: Vec<VoterOutcome>,
        tally: Option<serde_json::Value>,
    ) -> Self {
        Self {
            decision,
            voters,
            completed_at: Local::now().format("%Y-%m-%d_%H-%M-%S").to_string(),
            tally,
        }
    }

    /// Write the report as pretty JSON into `results_dir`, creating the
    /// directory if needed. Returns the path of the written file.
    pub fn write(&self, results_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(results_dir).with_context(|| {
            format!("creating results directory '{}'", results_dir.display())
        })?;

        let file_name = format!("election-result-{}.json", self.completed_at);
        let path = results_dir.join(file_name);

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing result file '{}'", path.display()))?;

        Ok(path)
    }
}
