//! Self-playing tutorial shown on the title screen.
//!
//! The demo loops forever over one puzzle: it picks the solution grids one
//! at a time, plays the reveal, holds on the result, clears, and starts over.

use crate::catalog::Catalog;
use crate::puzzle::{Puzzle, PuzzleId};
use crate::reveal::{RevealSequence, RevealTiming};
use crate::round::Round;

/// Puzzle used by the tutorial when it is present in the catalog
pub const TUTORIAL_PUZZLE_ID: &str = "easy-1";

/// One beat of the scripted demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoBeat {
    /// Show the target and the candidates
    Intro,
    /// Move the cursor to a candidate and select it
    Pick(usize),
    /// Play the reveal of the current selection
    Reveal,
    /// Hold on the solved result
    Celebrate,
    /// Clear the selection before looping
    Clear,
}

impl DemoBeat {
    /// Caption shown under the demo
    pub fn caption(&self) -> &'static str {
        match self {
            DemoBeat::Intro => "Stack three grids to rebuild the target",
            DemoBeat::Pick(_) => "Pick grids whose colors never overlap",
            DemoBeat::Reveal => "The layers stack up...",
            DemoBeat::Celebrate => "A perfect match!",
            DemoBeat::Clear => "Your turn next",
        }
    }
}

/// Ticks spent on each beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoTiming {
    pub intro: u32,
    pub pick: u32,
    pub celebrate: u32,
    pub clear: u32,
    pub reveal: RevealTiming,
}

impl Default for DemoTiming {
    fn default() -> Self {
        Self {
            intro: 30,
            pick: 15,
            celebrate: 25,
            clear: 10,
            reveal: RevealTiming::default(),
        }
    }
}

/// Looping tutorial demo
#[derive(Debug, Clone)]
pub struct TutorialDemo {
    round: Round,
    script: Vec<DemoBeat>,
    beat: usize,
    frame: u32,
    timing: DemoTiming,
    reveal: Option<RevealSequence>,
    loops: u32,
}

impl TutorialDemo {
    pub fn new(puzzle: Puzzle, timing: DemoTiming) -> Self {
        let mut script = vec![DemoBeat::Intro];
        script.extend(puzzle.solution_indices.iter().map(|&i| DemoBeat::Pick(i)));
        script.extend([DemoBeat::Reveal, DemoBeat::Celebrate, DemoBeat::Clear]);

        let mut demo = Self {
            round: Round::new(puzzle),
            script,
            beat: 0,
            frame: 0,
            timing,
            reveal: None,
            loops: 0,
        };
        demo.enter_beat();
        demo
    }

    /// Demo over the tutorial puzzle, or the first easy puzzle if it is missing
    pub fn from_catalog(catalog: &Catalog, timing: DemoTiming) -> Option<Self> {
        let puzzle = catalog
            .get(&PuzzleId::from(TUTORIAL_PUZZLE_ID))
            .or_else(|| catalog.puzzles().first())?;
        Some(Self::new(puzzle.clone(), timing))
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.round.puzzle()
    }

    pub fn beat(&self) -> DemoBeat {
        self.script[self.beat]
    }

    pub fn caption(&self) -> &'static str {
        self.beat().caption()
    }

    /// Candidate indices selected so far
    pub fn selected(&self) -> &[usize] {
        self.round.selected()
    }

    /// Candidate the demo cursor is on, if any
    pub fn cursor(&self) -> Option<usize> {
        match self.beat() {
            DemoBeat::Pick(i) => Some(i),
            _ => None,
        }
    }

    pub fn reveal(&self) -> Option<&RevealSequence> {
        self.reveal.as_ref()
    }

    /// Completed passes through the script
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        if self.beat() == DemoBeat::Reveal {
            let running = self.reveal.as_mut().is_some_and(|r| r.advance());
            if !running {
                self.next_beat();
            }
            return;
        }

        self.frame += 1;
        if self.frame >= self.beat_length() {
            self.next_beat();
        }
    }

    fn beat_length(&self) -> u32 {
        match self.beat() {
            DemoBeat::Intro => self.timing.intro,
            DemoBeat::Pick(_) => self.timing.pick,
            DemoBeat::Reveal => 0,
            DemoBeat::Celebrate => self.timing.celebrate,
            DemoBeat::Clear => self.timing.clear,
        }
    }

    fn next_beat(&mut self) {
        // Picks take effect as the cursor leaves the candidate
        if let DemoBeat::Pick(index) = self.beat() {
            self.round.toggle(index);
        }

        self.beat += 1;
        if self.beat >= self.script.len() {
            self.beat = 0;
            self.loops += 1;
        }
        self.frame = 0;
        self.enter_beat();
    }

    fn enter_beat(&mut self) {
        match self.beat() {
            DemoBeat::Reveal => {
                let verdict = self.round.submit();
                self.reveal = Some(RevealSequence::new(
                    &self.round.selected_grids(),
                    verdict,
                    self.timing.reveal,
                ));
            }
            DemoBeat::Clear => {
                self.round.reset();
                self.reveal = None;
            }
            DemoBeat::Intro | DemoBeat::Pick(_) | DemoBeat::Celebrate => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> DemoTiming {
        DemoTiming {
            intro: 2,
            pick: 1,
            celebrate: 2,
            clear: 1,
            reveal: RevealTiming {
                frames_per_layer: 1,
                final_hold_frames: 1,
            },
        }
    }

    #[test]
    fn test_script_order() {
        let demo = TutorialDemo::from_catalog(&Catalog::bundled(), fast()).unwrap();
        assert_eq!(demo.puzzle().id.as_str(), TUTORIAL_PUZZLE_ID);
        assert_eq!(demo.beat(), DemoBeat::Intro);
        assert!(demo.selected().is_empty());
    }

    #[test]
    fn test_demo_solves_and_loops() {
        let mut demo = TutorialDemo::from_catalog(&Catalog::bundled(), fast()).unwrap();
        let solution = demo.puzzle().solution_indices;

        let mut saw_celebrate = false;
        for _ in 0..200 {
            demo.tick();
            if demo.beat() == DemoBeat::Celebrate {
                saw_celebrate = true;
                assert_eq!(demo.selected(), &solution);
                let reveal = demo.reveal().unwrap();
                assert!(reveal.verdict().is_solved());
                assert!(reveal.is_finished());
            }
            if demo.loops() >= 2 {
                break;
            }
        }

        assert!(saw_celebrate);
        assert_eq!(demo.loops(), 2);
        assert_eq!(demo.beat(), DemoBeat::Intro);
        assert!(demo.selected().is_empty());
        assert!(demo.reveal().is_none());
    }

    #[test]
    fn test_cursor_follows_picks() {
        let mut demo = TutorialDemo::from_catalog(&Catalog::bundled(), fast()).unwrap();
        assert_eq!(demo.cursor(), None);
        demo.tick();
        demo.tick();
        assert_eq!(demo.beat(), DemoBeat::Pick(demo.puzzle().solution_indices[0]));
        assert_eq!(demo.cursor(), Some(demo.puzzle().solution_indices[0]));
    }
}
