//! JSON Lines protocol between the external pose tracker and the counter.
//!
//! One input line = one frame of tracked people, one output line = the
//! per-person state after that frame.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::RepResult;
use crate::pose::Pose;
use crate::tracker::{PersonRegistry, PersonSnapshot, TrackId};

// --- Input ---

/// Tracker → counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Source frame number; the running frame index is used when absent.
    #[serde(default)]
    pub frame: Option<u64>,
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    /// Identities the tracker reports as no longer active.
    #[serde(default)]
    pub gone: Vec<TrackId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: TrackId,
    /// COCO order, `[x, y, confidence]` or `null` per keypoint.
    pub keypoints: Vec<Option<[f32; 3]>>,
}

impl PersonRecord {
    pub fn pose(&self, min_confidence: f32) -> Pose {
        Pose::from_scored(&self.keypoints, min_confidence)
    }
}

// --- Output ---

/// Counter → renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutput {
    pub frame: u64,
    /// People present in this input frame.
    pub total_tracks: usize,
    /// People whose state could not be advanced this frame.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<TrackId>,
    pub people: Vec<PersonSnapshot>,
}

pub fn parse_frame(line: &str) -> Result<FrameRecord> {
    serde_json::from_str(line).context("invalid frame record")
}

pub fn encode_output(output: &FrameOutput) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

// --- Processing ---

/// Feeds parsed frame records through a [`PersonRegistry`].
pub struct FrameProcessor {
    registry: PersonRegistry,
    min_confidence: f32,
    max_missing_frames: u64,
}

impl FrameProcessor {
    /// Validates the whole config, CLI overrides included.
    pub fn new(config: &Config) -> RepResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: PersonRegistry::new(&config.counter)?,
            min_confidence: config.input.min_confidence,
            max_missing_frames: config.registry.max_missing_frames,
        })
    }

    pub fn registry(&self) -> &PersonRegistry {
        &self.registry
    }

    pub fn process(&mut self, record: &FrameRecord) -> FrameOutput {
        let poses: Vec<(TrackId, Pose)> = record
            .people
            .iter()
            .map(|p| (p.id, p.pose(self.min_confidence)))
            .collect();

        let report = self
            .registry
            .process_frame(poses.iter().map(|(id, pose)| (*id, pose)));

        for id in &record.gone {
            self.registry.evict(*id);
        }
        if self.max_missing_frames > 0 {
            self.registry.evict_stale(self.max_missing_frames);
        }

        FrameOutput {
            frame: record.frame.unwrap_or(report.frame),
            total_tracks: record.people.len(),
            skipped: report.skipped.iter().map(|(id, _)| *id).collect(),
            people: self.registry.snapshots(),
        }
    }
}
