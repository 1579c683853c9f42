// src/data.rs - Per-update log of what the applier did, exportable as CSV
use crate::applier::ApplyOutcome;
use crate::skeleton::{AnchorUpdate, HandSide};
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
struct FrameRecord {
    frame: usize,
    timestamp: f64,
    side: HandSide,
    tracked: bool,
    outcome: &'static str,
    joints_written: usize,
}

pub struct FrameLog {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<FrameRecord>,
}

impl FrameLog {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            let suffix = Uuid::new_v4().simple().to_string();
            format!("session_{}_{}", Local::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&mut self, update: &AnchorUpdate, outcome: ApplyOutcome) {
        let (outcome, joints_written) = match outcome {
            ApplyOutcome::Ignored => ("ignored", 0),
            ApplyOutcome::Hidden => ("hidden", 0),
            ApplyOutcome::Applied { joints_written } => ("applied", joints_written),
        };

        self.records.push(FrameRecord {
            frame: self.records.len(),
            timestamp: update.timestamp,
            side: update.side,
            tracked: update.tracked,
            outcome,
            joints_written,
        });
    }

    // Share of updates for `side` that arrived tracked, in percent.
    pub fn tracking_success_rate(&self, side: HandSide) -> Option<f64> {
        let total = self.records.iter().filter(|r| r.side == side).count();
        if total == 0 {
            return None;
        }
        let tracked = self
            .records
            .iter()
            .filter(|r| r.side == side && r.tracked)
            .count();
        Some(tracked as f64 / total as f64 * 100.0)
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.output_dir.join(&self.session_name).join("frames.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(csv_path)
    }
}
