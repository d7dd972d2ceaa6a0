//! Tick snapshots and the derived population/food series.
//!
//! The driver appends one [`Snapshot`] per tick; external renderers and
//! analysis consume the whole [`Recording`] after the run. Nothing here can
//! mutate the driver's state.

use crate::agent::{Agent, Kind};
use crate::environment::Environment;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One agent's entry in a snapshot: position plus a prey flag
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub row: f32,
    pub col: f32,
    pub is_rabbit: bool,
}

impl From<&Agent> for AgentRecord {
    fn from(agent: &Agent) -> Self {
        Self {
            row: agent.position.row,
            col: agent.position.col,
            is_rabbit: agent.kind == Kind::Rabbit,
        }
    }
}

/// Immutable copy of the field and the live population at the end of a tick
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub grass: Array2<f32>,
    pub agents: Vec<AgentRecord>,
}

impl Snapshot {
    /// Copy out the current field and population state
    pub fn capture(env: &Environment, agents: &[Agent]) -> Self {
        Self {
            grass: env.grass().clone(),
            agents: agents.iter().map(AgentRecord::from).collect(),
        }
    }

    /// Reduce this snapshot to per-species counts and total food
    pub fn counts(&self) -> Counts {
        let rabbits = self.agents.iter().filter(|a| a.is_rabbit).count();
        Counts {
            foxes: self.agents.len() - rabbits,
            rabbits,
            grass: self.grass.sum(),
        }
    }
}

/// Per-tick summary triple
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub foxes: usize,
    pub rabbits: usize,
    pub grass: f32,
}

impl Counts {
    /// Format as a one-line progress summary
    pub fn summary(&self, time: u64) -> String {
        format!(
            "T:{:6} | Rabbits:{:5} | Foxes:{:5} | Grass:{:.0}",
            time, self.rabbits, self.foxes, self.grass
        )
    }
}

/// Append-only log of snapshots for a whole run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Recording {
    snapshots: Vec<Snapshot>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one tick's snapshot
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Per-tick (foxes, rabbits, grass) series; a pure view of the log
    pub fn counts(&self) -> Vec<Counts> {
        self.snapshots.iter().map(Snapshot::counts).collect()
    }

    /// Rabbit population over time
    pub fn rabbit_series(&self) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.counts().rabbits).collect()
    }

    /// Fox population over time
    pub fn fox_series(&self) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.counts().foxes).collect()
    }

    /// Total food over time
    pub fn grass_series(&self) -> Vec<f32> {
        self.snapshots.iter().map(|s| s.grass.sum()).collect()
    }

    /// Save the full recording as JSON for external rendering/analysis
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load a recording saved by [`Recording::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
