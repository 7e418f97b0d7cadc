// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning a kernel's intensity into red, green and blue bytes.

/// Bytes per pixel in every image this crate produces.
pub const CHANNELS: usize = 3;

/// A pure mapping from intensity to color.  Intensity 0 is shared by
/// every interior point, so whatever it maps to is the color of the
/// set itself.
pub type Palette = fn(u8) -> [u8; CHANNELS];

/// The reference palette: the intensity repeated on all three
/// channels, leaving the interior black.
#[inline]
pub fn grayscale(value: u8) -> [u8; CHANNELS] {
    [value, value, value]
}
