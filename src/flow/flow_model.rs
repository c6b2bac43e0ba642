use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flow::step_model::Step;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("flow file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("flow YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Interface the synthesizer records through. The surrounding flow
/// tooling owns the implementation; `Flow` below is the in-memory one
/// used by the CLI and tests.
pub trait FlowStore: Send {
    /// Append a step. The caller is responsible for assigning `order`.
    fn add(&mut self, step: Step);

    /// Replace the step with the same `order`. Returns false if absent.
    fn update(&mut self, step: Step) -> bool;

    /// Delete a step and close the ordering gap.
    fn remove(&mut self, order: u32) -> bool;

    /// Move a step from one position to another, renumbering the rest.
    fn reorder(&mut self, from: u32, to: u32) -> bool;

    fn get(&self, order: u32) -> Option<&Step>;

    fn steps(&self) -> &[Step];

    /// Order the next appended step should carry (1-based, contiguous).
    fn next_order(&self) -> u32 {
        self.steps().len() as u32 + 1
    }
}

/// A named, persisted sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,

    /// URL replay navigates to before the first step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Flow {
    pub fn new(name: &str) -> Self {
        Flow {
            name: name.to_string(),
            start_url: None,
            steps: Vec::new(),
        }
    }

    pub fn with_start_url(mut self, url: &str) -> Self {
        self.start_url = Some(url.to_string());
        self
    }

    /// Load a flow from a YAML file.
    pub fn load(path: &str) -> Result<Flow, FlowError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write the flow as YAML.
    pub fn save(&self, path: &str) -> Result<(), FlowError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Rename a step's human-readable description.
    pub fn rename_step(&mut self, order: u32, description: &str) -> bool {
        match self.step_mut(order) {
            Some(step) => {
                step.description = description.to_string();
                true
            }
            None => false,
        }
    }

    /// Enable or disable a step without deleting it.
    pub fn set_enabled(&mut self, order: u32, enabled: bool) -> bool {
        match self.step_mut(order) {
            Some(step) => {
                step.enabled = enabled;
                true
            }
            None => false,
        }
    }

    fn step_mut(&mut self, order: u32) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.order == order)
    }

    /// Restore the contiguous 1-based ordering invariant.
    fn renumber(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.order = i as u32 + 1;
        }
    }
}

impl FlowStore for Flow {
    fn add(&mut self, step: Step) {
        self.steps.push(step);
    }

    fn update(&mut self, step: Step) -> bool {
        match self.steps.iter_mut().find(|s| s.order == step.order) {
            Some(slot) => {
                *slot = step;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, order: u32) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.order != order);
        if self.steps.len() == before {
            return false;
        }
        self.renumber();
        true
    }

    fn reorder(&mut self, from: u32, to: u32) -> bool {
        let len = self.steps.len() as u32;
        if from == 0 || to == 0 || from > len || to > len {
            return false;
        }
        let step = self.steps.remove(from as usize - 1);
        self.steps.insert(to as usize - 1, step);
        self.renumber();
        true
    }

    fn get(&self, order: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.order == order)
    }

    fn steps(&self) -> &[Step] {
        &self.steps
    }
}
