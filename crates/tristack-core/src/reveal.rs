//! Frame-driven reveal of a submission: the selected grids are laid down one
//! layer at a time, then the verdict is shown. Purely presentational.

use crate::grid::Grid;
use crate::overlay::{overlay_grids, Verdict, SELECTION_SIZE};
use serde::{Deserialize, Serialize};

/// How long each reveal step lasts, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub frames_per_layer: u32,
    pub final_hold_frames: u32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            frames_per_layer: 12,
            final_hold_frames: 30,
        }
    }
}

/// A single step of the reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum RevealStep {
    /// The first `layer` selected grids stacked
    Layer { layer: usize, grid: Grid },
    /// Everything stacked, with the verdict
    Final { grid: Grid, verdict: Verdict },
}

impl RevealStep {
    pub fn grid(&self) -> &Grid {
        match self {
            RevealStep::Layer { grid, .. } | RevealStep::Final { grid, .. } => grid,
        }
    }
}

/// Reveal animation state
#[derive(Debug, Clone)]
pub struct RevealSequence {
    steps: Vec<RevealStep>,
    verdict: Verdict,
    timing: RevealTiming,
    frame: u32,
}

impl RevealSequence {
    pub fn new(selected: &[Grid], verdict: Verdict, timing: RevealTiming) -> Self {
        let layers = selected.len().min(SELECTION_SIZE);
        let mut steps: Vec<RevealStep> = (1..=layers)
            .map(|layer| RevealStep::Layer {
                layer,
                grid: overlay_grids(&selected[..layer]),
            })
            .collect();
        steps.push(RevealStep::Final {
            grid: overlay_grids(&selected[..layers]),
            verdict,
        });

        Self {
            steps,
            verdict,
            timing,
            frame: 0,
        }
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    /// Ticks per layer; a zero setting still shows each layer for one tick
    fn frames_per_layer(&self) -> u32 {
        self.timing.frames_per_layer.max(1)
    }

    fn total_frames(&self) -> u32 {
        let layers = self.steps.len() as u32 - 1;
        layers * self.frames_per_layer() + self.timing.final_hold_frames
    }

    fn step_index(&self) -> usize {
        let per_layer = self.frames_per_layer();
        let layers = self.steps.len() - 1;
        ((self.frame / per_layer) as usize).min(layers)
    }

    /// The step to draw for the current frame
    pub fn current(&self) -> &RevealStep {
        &self.steps[self.step_index()]
    }

    /// Advance one tick. Returns false once the sequence has finished.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.frame += 1;
        !self.is_finished()
    }

    /// Skip straight to the final step
    pub fn skip(&mut self) {
        self.frame = self.total_frames();
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames()
    }

    /// The verdict being revealed
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Progress through the whole sequence in `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        let total = self.total_frames();
        if total == 0 {
            1.0
        } else {
            (self.frame.min(total) as f32) / total as f32
        }
    }
}
