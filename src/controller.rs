// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The state behind the interactive viewer: which fractal is on
//! screen and how hard it is being iterated.  Whatever drives the
//! window translates its input events into `Command`s, hands them to
//! the controller, and asks it for a new frame whenever the selection
//! changes.

use crate::backend::Backend;
use crate::error::FractalError;
use crate::fractals::Fractal;

/// The iteration counts the viewer can step through, doubling each
/// time.
pub const ITERATION_LADDER: [usize; 13] = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// The input the controller understands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    /// Show the next fractal, wrapping around after the last.
    NextFractal,
    /// Show the previous fractal, wrapping around before the first.
    PreviousFractal,
    /// Climb one rung of the iteration ladder.
    MoreIterations,
    /// Descend one rung of the iteration ladder.
    FewerIterations,
    /// Stop the viewer.
    Quit,
}

/// What the viewer loop should do after a command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Flow {
    /// Keep going; redraw if anything changed.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Current selection.  Starts on the first fractal at the top of the
/// ladder.
#[derive(Debug)]
pub struct Controller {
    fractal: usize,
    rung: usize,
}

impl Default for Controller {
    fn default() -> Self {
        Controller {
            fractal: 0,
            rung: ITERATION_LADDER.len() - 1,
        }
    }
}

impl Controller {
    /// A controller in its starting state.
    pub fn new() -> Controller {
        Controller::default()
    }

    /// The fractal to draw.
    pub fn fractal(&self) -> Fractal {
        Fractal::ALL[self.fractal]
    }

    /// The iteration count to draw it with.
    pub fn iterations(&self) -> usize {
        ITERATION_LADDER[self.rung]
    }

    /// Apply one command.
    pub fn handle(&mut self, command: Command) -> Flow {
        let count = Fractal::ALL.len();
        match command {
            Command::NextFractal => self.fractal = (self.fractal + 1) % count,
            Command::PreviousFractal => self.fractal = (self.fractal + count - 1) % count,
            Command::MoreIterations => {
                self.rung = (self.rung + 1).min(ITERATION_LADDER.len() - 1)
            }
            Command::FewerIterations => self.rung = self.rung.saturating_sub(1),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Render the current selection and hand back the image to show.
    pub fn frame<'b>(&self, backend: &'b mut dyn Backend) -> Result<&'b [u8], FractalError> {
        debug!("frame: {} at {} iterations", self.fractal(), self.iterations());
        backend.render(self.fractal(), self.iterations())?;
        backend.image()
    }
}
