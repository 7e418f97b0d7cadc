// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper left, and a window onto the complex plane defined by its
//! top-left and bottom-right corners.  Unlike the usual cartesian
//! convention, the imaginary axis decreases as the pixel row grows:
//! images are stored top row first.
use num::Complex;

use crate::colors::CHANNELS;
use crate::error::FractalError;

/// The x (column) and y (row) of a pixel in the image, both counted
/// from the upper left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The width and height of an image in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Size {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Size {
    /// Validating constructor: an image must have at least one pixel
    /// along each axis, and its RGB bytes must be addressable.
    pub fn new(width: usize, height: usize) -> Result<Size, FractalError> {
        if width == 0 || height == 0 {
            return Err(FractalError::DegenerateImage { width, height });
        }
        if width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .is_none()
        {
            return Err(FractalError::ImageTooLarge { width, height });
        }
        Ok(Size { width, height })
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when either axis is empty.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Describes the upper left and lower right corners of the visible
/// part of the complex plane, treating the real part of each value as
/// the x-component and the imaginary part as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    /// The point drawn at pixel 0,0.
    pub top_left: Complex<f64>,
    /// The point just beyond the last pixel.
    pub bottom_right: Complex<f64>,
}

impl PlaneWindow {
    /// Constructor.  The top left corner must be strictly left of and
    /// strictly above the bottom right one.
    pub fn new(
        top_left: Complex<f64>,
        bottom_right: Complex<f64>,
    ) -> Result<PlaneWindow, FractalError> {
        if !(top_left.re < bottom_right.re) || !(top_left.im > bottom_right.im) {
            return Err(FractalError::InvalidWindow {
                top_left: top_left.to_string(),
                bottom_right: bottom_right.to_string(),
            });
        }
        Ok(PlaneWindow {
            top_left,
            bottom_right,
        })
    }
}

/// Given the column and row of a pixel on the integral plane, return
/// the complex number at the equivalent location inside the window.
/// Pixel 0,0 lands exactly on `top_left`; pixel `width,height` (one
/// past the last) would land on `bottom_right`.
#[inline]
pub fn pixel_to_point(
    pixel: Pixel,
    size: Size,
    top_left: Complex<f64>,
    bottom_right: Complex<f64>,
) -> Complex<f64> {
    Complex::new(
        top_left.re + (pixel.0 as f64) * (bottom_right.re - top_left.re) / (size.width as f64),
        top_left.im + (pixel.1 as f64) * (bottom_right.im - top_left.im) / (size.height as f64),
    )
}

/// Binds an image size to a window so the pair can be shared,
/// read-only, by every render worker.  The distance between
/// neighbouring pixels on each axis is computed once, up front.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    size: Size,
    window: PlaneWindow,
    // Complex-plane width and height of one pixel.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Pair a size with a window.  Both have already been validated by
    /// their own constructors.
    pub fn new(size: Size, window: PlaneWindow) -> PlaneMapper {
        let steps = (
            (window.bottom_right.re - window.top_left.re) / (size.width as f64),
            (window.bottom_right.im - window.top_left.im) / (size.height as f64),
        );
        PlaneMapper {
            size,
            window,
            steps,
        }
    }

    /// The size of the integral plane.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The visible part of the complex plane.
    pub fn window(&self) -> PlaneWindow {
        self.window
    }

    /// Map a pixel to its sample point.
    #[inline]
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.window.top_left.re + (pixel.0 as f64) * self.steps.0,
            self.window.top_left.im + (pixel.1 as f64) * self.steps.1,
        )
    }

    /// The byte offset of a pixel in a buffer with `channels` bytes per
    /// pixel, rows stored top first.
    #[inline]
    pub fn pixel_to_offset(&self, pixel: Pixel, channels: usize) -> usize {
        (pixel.1 * self.size.width + pixel.0) * channels
    }
}
