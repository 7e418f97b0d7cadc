// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interchangeable render engines behind one contract.
//!
//! A backend is built once for a screen-sized image, rendered as many
//! times as the viewer asks (with whatever fractal and iteration count
//! are currently selected), and read back after each render.  The
//! image is only valid after `render` has returned successfully; an
//! engine that computes somewhere else must have copied its result
//! back into host memory by then.

use itertools::iproduct;

use crate::buffer::ImageBuffer;
use crate::colors::{grayscale, CHANNELS};
use crate::error::FractalError;
use crate::fractals::{Budget, Fractal};
use crate::generator::Generator;
use crate::planes::{Pixel, PlaneMapper, Size};
use crate::render::Grain;

/// What the interactive viewer needs from a render engine.
pub trait Backend {
    /// The image dimensions this backend was built for.
    fn size(&self) -> Size;

    /// Draw `fractal` with `iterations` per point, replacing the
    /// previous image.  Blocks until the image is complete.
    fn render(&mut self, fractal: Fractal, iterations: usize) -> Result<(), FractalError>;

    /// The most recent image, or `NotRendered` if there is none.
    fn image(&self) -> Result<&[u8], FractalError>;
}

/// The parallel engine: a fresh `Generator` per frame, its work split
/// over a fixed number of threads.
pub struct CpuBackend {
    size: Size,
    threads: usize,
    frame: Option<Generator>,
}

impl CpuBackend {
    /// A backend for `size` images rendered on `threads` workers.
    pub fn new(size: Size, threads: usize) -> Result<CpuBackend, FractalError> {
        let size = Size::new(size.width, size.height)?;
        if threads == 0 {
            return Err(FractalError::NoThreads);
        }
        Ok(CpuBackend {
            size,
            threads,
            frame: None,
        })
    }
}

impl Backend for CpuBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn render(&mut self, fractal: Fractal, iterations: usize) -> Result<(), FractalError> {
        self.frame = None;
        let grain = Grain::for_threads(self.size, self.threads);
        let mut generator =
            Generator::new(fractal, self.size, grain, iterations)?.with_threads(self.threads)?;
        generator.render()?;
        self.frame = Some(generator);
        Ok(())
    }

    fn image(&self) -> Result<&[u8], FractalError> {
        match self.frame {
            Some(ref generator) => generator.image(),
            None => Err(FractalError::NotRendered),
        }
    }
}

/// The single-threaded reference engine.  Walks the image one pixel at
/// a time; every other backend must produce the same bytes.
pub struct ScalarBackend {
    size: Size,
    image: ImageBuffer,
    rendered: bool,
}

impl ScalarBackend {
    /// A backend for `size` images.
    pub fn new(size: Size) -> Result<ScalarBackend, FractalError> {
        let size = Size::new(size.width, size.height)?;
        Ok(ScalarBackend {
            size,
            image: ImageBuffer::new(size.len() * CHANNELS),
            rendered: false,
        })
    }
}

impl Backend for ScalarBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn render(&mut self, fractal: Fractal, iterations: usize) -> Result<(), FractalError> {
        self.rendered = false;
        let budget = Budget::new(iterations)?;
        let plane = PlaneMapper::new(self.size, fractal.default_window());
        let pixels = self.image.as_mut_slice();
        for (row, column) in iproduct!(0..self.size.height, 0..self.size.width) {
            let pixel = Pixel(column, row);
            let offset = plane.pixel_to_offset(pixel, CHANNELS);
            let value = fractal.generate(plane.pixel_to_point(pixel), &budget);
            pixels[offset..offset + CHANNELS].copy_from_slice(&grayscale(value));
        }
        self.rendered = true;
        Ok(())
    }

    fn image(&self) -> Result<&[u8], FractalError> {
        if !self.rendered {
            return Err(FractalError::NotRendered);
        }
        Ok(self.image.as_slice())
    }
}
