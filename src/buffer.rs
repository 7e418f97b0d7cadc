// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A byte buffer that starts on a cache line boundary and never grows.

use bytemuck::{Pod, Zeroable};

const LINE: usize = 64;

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C, align(64))]
struct CacheLine([u8; LINE]);

/// Contiguous pixel storage allocated once, in whole cache lines, and
/// exposed as a plain byte slice of exactly the requested length.
pub struct ImageBuffer {
    lines: Vec<CacheLine>,
    len: usize,
}

impl ImageBuffer {
    /// Allocate `len` zeroed bytes.
    pub fn new(len: usize) -> ImageBuffer {
        let count = (len + LINE - 1) / LINE;
        ImageBuffer {
            lines: vec![CacheLine::zeroed(); count],
            len,
        }
    }

    /// The number of usable bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length buffer.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes, read-only.
    pub fn as_slice(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.lines)[..self.len]
    }

    /// The bytes, writable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.lines)[..self.len]
    }
}
