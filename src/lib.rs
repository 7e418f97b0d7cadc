#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal generator
//!
//! Four fractals (Mandelbrot, Julia, Tricorn and the cosine map) are
//! drawn the same way: every pixel of the image is mapped to a point on
//! the complex plane, a recurrence is iterated from that point until
//! it either runs away past a fixed radius or the iteration budget is
//! spent, and the iteration at which it ran away becomes the pixel's
//! brightness.  Points that never run away form the black heart of the
//! image.
//!
//! Every pixel is independent of every other, so the image is split
//! into rectangular blocks that worker threads fill in whatever order
//! they like, each writing only its own bytes.  The same image comes
//! out no matter how many threads or how large the blocks.

extern crate crossbeam;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod backend;
pub mod buffer;
pub mod cli;
pub mod colors;
pub mod controller;
pub mod error;
pub mod fractals;
pub mod generator;
pub mod planes;
pub mod render;

pub use backend::{Backend, CpuBackend, ScalarBackend};
pub use error::FractalError;
pub use fractals::{Budget, Fractal};
pub use generator::Generator;
pub use planes::{pixel_to_point, Pixel, PlaneWindow, Size};
pub use render::Grain;
