// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong between parsing the command line and
//! writing the finished image.

use failure::Fail;
use std::io;

/// The single error type of the crate.  Every variant is fatal to the
/// run that produced it; there is nothing to retry in a pure,
/// in-memory computation.
#[derive(Debug, Fail)]
pub enum FractalError {
    /// The image has no pixels along at least one axis.
    #[fail(display = "image size must be at least 1x1, got {}x{}", width, height)]
    DegenerateImage {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The image has more bytes than the address space can hold.
    #[fail(display = "image size {}x{} is too large to allocate", width, height)]
    ImageTooLarge {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// A grain with no rows or no columns cannot cover anything.
    #[fail(display = "grain size must be at least 1x1, got {}x{}", rows, cols)]
    DegenerateGrain {
        /// Requested rows per block.
        rows: usize,
        /// Requested columns per block.
        cols: usize,
    },

    /// An iteration budget of zero renders nothing but black.
    #[fail(display = "the iteration budget must be at least 1")]
    NoIterations,

    /// The worker pool needs at least one thread.
    #[fail(display = "the thread count must be at least 1")]
    NoThreads,

    /// The top left corner must be left of and above the bottom right.
    #[fail(
        display = "the window corner {} is not to the upper left of {}",
        top_left, bottom_right
    )]
    InvalidWindow {
        /// The offending upper left corner, formatted.
        top_left: String,
        /// The offending lower right corner, formatted.
        bottom_right: String,
    },

    /// A pixel buffer does not match the image it is meant to hold.
    #[fail(display = "pixel buffer holds {} bytes, expected {}", actual, expected)]
    BufferSize {
        /// Bytes needed for the image.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The image was requested before anything was rendered into it.
    #[fail(display = "the image has not been rendered yet")]
    NotRendered,

    /// One of the render workers panicked; the buffer is incomplete.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// Writing the image file failed.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] io::Error),

    /// The command line could not be turned into settings.
    #[fail(display = "{}", _0)]
    Usage(#[cause] clap::Error),
}

impl From<io::Error> for FractalError {
    fn from(err: io::Error) -> Self {
        FractalError::Io(err)
    }
}

impl From<clap::Error> for FractalError {
    fn from(err: clap::Error) -> Self {
        FractalError::Usage(err)
    }
}
