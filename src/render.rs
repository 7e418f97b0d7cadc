// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel render driver.
//!
//! The image is cut into rectangular blocks of `Grain` rows by columns.
//! Each block owns the mutable row segments it covers, borrowed out of
//! the one image buffer, so no two blocks can ever touch the same
//! byte.  Workers pull blocks off a shared queue until it is empty and
//! fill every pixel of each block independently; the only point of
//! synchronization is the join at the end of the scope.

use std::sync::{Arc, Mutex};

use crate::colors::CHANNELS;
use crate::error::FractalError;
use crate::planes::{Pixel, Size};

/// The size of one unit of parallel work, in rows and columns.  This
/// is a throughput knob: the rendered image does not depend on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grain {
    /// Rows per block.
    pub rows: usize,
    /// Columns per block.
    pub cols: usize,
}

impl Grain {
    /// Validating constructor.
    pub fn new(rows: usize, cols: usize) -> Result<Grain, FractalError> {
        if rows == 0 || cols == 0 {
            return Err(FractalError::DegenerateGrain { rows, cols });
        }
        Ok(Grain { rows, cols })
    }

    /// Split each axis into roughly as many strips as there are
    /// threads, never going below one pixel.
    pub fn for_threads(size: Size, threads: usize) -> Grain {
        let threads = threads.max(1);
        Grain {
            rows: (size.height / threads).max(1),
            cols: (size.width / threads).max(1),
        }
    }

    /// One block covering the whole image.
    pub fn whole(size: Size) -> Grain {
        Grain {
            rows: size.height.max(1),
            cols: size.width.max(1),
        }
    }
}

/// A rectangle of the image together with exclusive access to its
/// bytes, one slice per row.
pub struct Block<'a> {
    origin: Pixel,
    rows: Vec<&'a mut [u8]>,
}

impl<'a> Block<'a> {
    /// The upper left pixel of the block.
    pub fn origin(&self) -> Pixel {
        self.origin
    }

    /// Fill the block in row-major order.
    pub fn fill<F>(&mut self, shade: &F)
    where
        F: Fn(Pixel) -> [u8; CHANNELS],
    {
        let origin = self.origin;
        for (dy, row) in self.rows.iter_mut().enumerate() {
            for (dx, rgb) in row.chunks_mut(CHANNELS).enumerate() {
                rgb.copy_from_slice(&shade(Pixel(origin.0 + dx, origin.1 + dy)));
            }
        }
    }
}

/// Cut a row-major RGB buffer into grain-sized blocks.  Blocks at the
/// right and bottom edges are clipped to the image, and a grain larger
/// than the image is treated as the whole image.
pub fn partition(pixels: &mut [u8], size: Size, grain: Grain) -> Vec<Block> {
    let rows = grain.rows.min(size.height);
    let cols = grain.cols.min(size.width);
    let stride = size.width * CHANNELS;
    let mut blocks: Vec<Block> = vec![];
    for (band_index, band) in pixels.chunks_mut(stride * rows).enumerate() {
        let top = band_index * rows;
        let first = blocks.len();
        for (row_index, row) in band.chunks_mut(stride).enumerate() {
            for (col_index, segment) in row.chunks_mut(cols * CHANNELS).enumerate() {
                if row_index == 0 {
                    blocks.push(Block {
                        origin: Pixel(col_index * cols, top),
                        rows: Vec::with_capacity(rows),
                    });
                }
                blocks[first + col_index].rows.push(segment);
            }
        }
    }
    blocks
}

/// Fill every pixel of `pixels` with `shade(pixel)`, spreading the
/// blocks over `threads` scoped workers.  Returns once every block is
/// done.
pub fn render<F>(
    pixels: &mut [u8],
    size: Size,
    grain: Grain,
    threads: usize,
    shade: F,
) -> Result<(), FractalError>
where
    F: Fn(Pixel) -> [u8; CHANNELS] + Sync,
{
    if threads == 0 {
        return Err(FractalError::NoThreads);
    }
    let expected = size.len() * CHANNELS;
    if pixels.len() != expected {
        return Err(FractalError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }

    let blocks = partition(pixels, size, grain);
    let workers = threads.min(blocks.len());
    let queue = Arc::new(Mutex::new(blocks.into_iter()));
    let shade = &shade;

    crossbeam::scope(|spawner| {
        for _ in 0..workers {
            let queue = queue.clone();
            spawner.spawn(move |_| loop {
                let block = match queue.lock() {
                    Ok(mut pending) => pending.next(),
                    Err(_) => None,
                };
                match block {
                    Some(mut block) => block.fill(shade),
                    None => {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| FractalError::WorkerPanicked)
}
