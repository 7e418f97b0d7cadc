// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Generator ties one fractal, one image geometry and one iteration
//! budget to the buffer they are rendered into.  Once built, none of
//! those change: rendering again recomputes the same image from
//! scratch, and the image cannot be read or saved until it has been
//! rendered at least once.

use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;

use crate::buffer::ImageBuffer;
use crate::colors::{grayscale, Palette, CHANNELS};
use crate::error::FractalError;
use crate::fractals::{Budget, Fractal};
use crate::planes::{PlaneMapper, PlaneWindow, Size};
use crate::render::{self, Grain};

/// Owns the image buffer and everything needed to fill it.
pub struct Generator {
    fractal: Fractal,
    plane: PlaneMapper,
    grain: Grain,
    threads: usize,
    budget: Budget,
    palette: Palette,
    image: ImageBuffer,
    rendered: bool,
}

impl Generator {
    /// Requires the fractal, the width and height of the image, the
    /// grain to split the work by, and the number of iterations to
    /// perform per point.  The fractal's default window is used and the
    /// work is spread over every available CPU.
    pub fn new(
        fractal: Fractal,
        size: Size,
        grain: Grain,
        max_iterations: usize,
    ) -> Result<Self, FractalError> {
        let size = Size::new(size.width, size.height)?;
        let grain = Grain::new(grain.rows, grain.cols)?;
        let budget = Budget::new(max_iterations)?;
        Ok(Generator {
            fractal,
            plane: PlaneMapper::new(size, fractal.default_window()),
            grain,
            threads: num_cpus::get(),
            budget,
            palette: grayscale,
            image: ImageBuffer::new(size.len() * CHANNELS),
            rendered: false,
        })
    }

    /// Look at a different part of the plane.
    pub fn with_window(mut self, window: PlaneWindow) -> Result<Self, FractalError> {
        let window = PlaneWindow::new(window.top_left, window.bottom_right)?;
        self.plane = PlaneMapper::new(self.plane.size(), window);
        Ok(self)
    }

    /// Use exactly `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Result<Self, FractalError> {
        if threads == 0 {
            return Err(FractalError::NoThreads);
        }
        self.threads = threads;
        Ok(self)
    }

    /// Color with something other than the grayscale palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// The fractal being drawn.
    pub fn fractal(&self) -> Fractal {
        self.fractal
    }

    /// Image dimensions in pixels.
    pub fn size(&self) -> Size {
        self.plane.size()
    }

    /// The unit of parallel work.
    pub fn grain(&self) -> Grain {
        self.grain
    }

    /// Number of render workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Iterations per point.
    pub fn max_iterations(&self) -> usize {
        self.budget.max()
    }

    /// True once `render` has completed.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Compute every pixel of the image.  Blocks until the whole buffer
    /// has been written.
    pub fn render(&mut self) -> Result<(), FractalError> {
        debug!(
            "rendering {} {}x{} with grain {}x{} on {} threads",
            self.fractal,
            self.plane.size().width,
            self.plane.size().height,
            self.grain.rows,
            self.grain.cols,
            self.threads
        );
        self.rendered = false;
        let fractal = self.fractal;
        let plane = self.plane;
        let budget = self.budget;
        let palette = self.palette;
        render::render(
            self.image.as_mut_slice(),
            plane.size(),
            self.grain,
            self.threads,
            |pixel| palette(fractal.generate(plane.pixel_to_point(pixel), &budget)),
        )?;
        self.rendered = true;
        debug!("rendered {}", self.fractal);
        Ok(())
    }

    /// The finished RGB bytes, row-major, three per pixel.
    pub fn image(&self) -> Result<&[u8], FractalError> {
        if !self.rendered {
            return Err(FractalError::NotRendered);
        }
        Ok(self.image.as_slice())
    }

    /// Write the finished image.  Files ending in `.pnm` or `.ppm` are
    /// written as binary pixmaps, everything else as PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FractalError> {
        let pixels = self.image()?;
        write_image(path.as_ref(), pixels, self.plane.size())?;
        info!("saved {} to {}", self.fractal, path.as_ref().display());
        Ok(())
    }
}

fn write_image(path: &Path, pixels: &[u8], size: Size) -> Result<(), std::io::Error> {
    let output = File::create(path)?;
    let (width, height) = (size.width as u32, size.height as u32);
    match path.extension().and_then(|e| e.to_str()) {
        Some("pnm") | Some("ppm") => {
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
            encoder.encode(pixels, width, height, ColorType::RGB(8))?;
        }
        _ => {
            PNGEncoder::new(output).encode(pixels, width, height, ColorType::RGB(8))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractals::JULIA_CONSTANT;
    use num::Complex;

    fn mandelbrot(width: usize, height: usize, iterations: usize) -> Generator {
        let size = Size::new(width, height).unwrap();
        Generator::new(Fractal::Mandelbrot, size, Grain::for_threads(size, 4), iterations).unwrap()
    }

    #[test]
    fn construction_rejects_degenerate_geometry() {
        let good = Size { width: 4, height: 4 };
        let grain = Grain { rows: 1, cols: 1 };
        let flat = Size { width: 4, height: 0 };
        assert!(Generator::new(Fractal::Mandelbrot, flat, grain, 10).is_err());
        let empty = Grain { rows: 0, cols: 2 };
        assert!(Generator::new(Fractal::Mandelbrot, good, empty, 10).is_err());
        assert!(Generator::new(Fractal::Mandelbrot, good, grain, 0).is_err());
        assert!(Generator::new(Fractal::Mandelbrot, good, grain, 10).is_ok());
    }

    #[test]
    fn construction_rejects_unaddressable_images() {
        let huge = u32::max_value() as usize;
        let size = Size { width: huge, height: huge };
        match Generator::new(Fractal::Mandelbrot, size, Grain { rows: 1, cols: 1 }, 10) {
            Err(FractalError::ImageTooLarge { .. }) => (),
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("a {}x{} image was accepted", huge, huge),
        }
    }

    #[test]
    fn buffer_is_sized_to_the_image() {
        for (w, h) in &[(1, 1), (4, 4), (17, 3), (640, 480)] {
            let mut g = mandelbrot(*w, *h, 1);
            g.render().unwrap();
            assert_eq!(g.image().unwrap().len(), w * h * 3);
        }
    }

    #[test]
    fn image_before_render_fails() {
        let g = mandelbrot(4, 4, 50);
        match g.image() {
            Err(FractalError::NotRendered) => (),
            _ => panic!("expected NotRendered"),
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.png");
        assert!(g.save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn small_mandelbrot_scenario() {
        let mut g = mandelbrot(4, 4, 50);
        g.render().unwrap();
        let image = g.image().unwrap();
        // Pixel 0,0 is -2+1.2i and escapes after a single step.
        let corner = Fractal::Mandelbrot.generate(Complex::new(-2.0, 1.2), &Budget::new(50).unwrap());
        assert_eq!(&image[0..3], &[corner, corner, corner]);
        assert!(corner < 64);
        // Pixel 2,2 is -0.5+0i, deep in the main cardioid.
        let offset = (2 * 4 + 2) * 3;
        assert_eq!(&image[offset..offset + 3], &[0, 0, 0]);
    }

    #[test]
    fn thread_and_grain_count_do_not_change_the_image() {
        let size = Size::new(37, 23).unwrap();
        let draw = |grain: Grain, threads: usize| {
            let mut g = Generator::new(Fractal::Julia(JULIA_CONSTANT), size, grain, 64)
                .unwrap()
                .with_threads(threads)
                .unwrap();
            g.render().unwrap();
            g.image().unwrap().to_vec()
        };
        let reference = draw(Grain::new(1, 1).unwrap(), 1);
        assert_eq!(draw(Grain::whole(size), 1), reference);
        assert_eq!(draw(Grain::new(1, 1).unwrap(), 8), reference);
        assert_eq!(draw(Grain::whole(size), 8), reference);
        assert_eq!(draw(Grain::for_threads(size, 3), 3), reference);
    }

    #[test]
    fn rendering_twice_gives_the_same_image() {
        let mut g = mandelbrot(32, 24, 100).with_palette(|v| [v, 255 - v, v / 2]);
        g.render().unwrap();
        let first = g.image().unwrap().to_vec();
        g.render().unwrap();
        assert_eq!(g.image().unwrap(), &first[..]);
        // The interior keeps the palette's color for 0.
        assert!(first.chunks(3).any(|rgb| rgb == [0, 255, 0]));
    }

    #[test]
    fn custom_window_is_validated() {
        let g = mandelbrot(4, 4, 10);
        let upside_down = PlaneWindow {
            top_left: Complex::new(-1.0, -1.0),
            bottom_right: Complex::new(1.0, 1.0),
        };
        assert!(g.with_window(upside_down).is_err());
    }

    #[test]
    fn custom_window_moves_the_view() {
        // The whole window sits inside the main cardioid, so nothing escapes.
        let inside = PlaneWindow::new(Complex::new(-0.2, 0.2), Complex::new(0.2, -0.2)).unwrap();
        let mut g = mandelbrot(8, 8, 50).with_window(inside).unwrap();
        g.render().unwrap();
        assert!(g.image().unwrap().iter().all(|b| *b == 0));
        assert_eq!(g.size(), Size::new(8, 8).unwrap());
    }

    #[test]
    fn zero_threads_are_rejected() {
        assert!(mandelbrot(4, 4, 10).with_threads(0).is_err());
    }

    #[test]
    fn saves_png_and_pnm() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = mandelbrot(8, 6, 20);
        g.render().unwrap();
        for name in &["out.png", "out.ppm"] {
            let path = dir.path().join(name);
            g.save(&path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
        let ppm = std::fs::read(dir.path().join("out.ppm")).unwrap();
        assert_eq!(&ppm[0..2], b"P6");
    }
}
