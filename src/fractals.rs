// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernels.
//!
//! Every variant shares the same shape: start from some `z`, apply a
//! recurrence up to a fixed number of times, and stop as soon as `z`
//! wanders further than a fixed radius from the origin.  How quickly
//! that happens is the "velocity" of the starting point, which is
//! turned into an intensity by logarithmic scaling so that the bands
//! near the boundary blend into one another.  Points that never escape
//! are interior points and get intensity 0.
//!
//! Note that the escape test comes *before* the recurrence on each
//! step, so a point that is already outside the radius escapes at
//! iteration 0, and `ln(1) == 0` makes it indistinguishable from an
//! interior point.

use num::Complex;
use std::f64::consts::PI;
use std::fmt;

use crate::error::FractalError;
use crate::planes::PlaneWindow;

const MAX_COLOR: f64 = 255.0;

/// The constant added on every step of the Julia recurrence.
pub const JULIA_CONSTANT: Complex<f64> = Complex {
    re: -0.7,
    im: 0.27015,
};

/// The iteration budget and its precomputed logarithm, so the
/// per-pixel path never pays for `ln(max)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Budget {
    max: usize,
    log_max: f64,
}

impl Budget {
    /// A budget of at least one iteration.
    pub fn new(max: usize) -> Result<Budget, FractalError> {
        if max == 0 {
            return Err(FractalError::NoIterations);
        }
        Ok(Budget {
            max,
            log_max: (max as f64).ln(),
        })
    }

    /// The maximum number of iterations per point.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Smooth coloring: map the iteration at which a point escaped to
    /// `255 * ln(i + 1) / ln(max)`, truncated.  A budget of one has
    /// `ln(max) == 0`; everything maps to 0 there.
    #[inline]
    pub fn intensity(&self, iteration: usize) -> u8 {
        if self.log_max == 0.0 {
            return 0;
        }
        let scaled = MAX_COLOR * ((iteration + 1) as f64).ln() / self.log_max;
        scaled.min(MAX_COLOR) as u8
    }
}

/// The four supported fractals.  Each variant carries its own
/// constants; the kernel itself holds no state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Fractal {
    /// `z = z² + c`, starting from 0.
    Mandelbrot,
    /// `z = z² + K`, starting from the sample point.
    Julia(Complex<f64>),
    /// `z = conj(z)² + c`, starting from 0.
    Tricorn,
    /// `z = cos(z) + c`, starting from 0.
    Cosine,
}

impl Fractal {
    /// Every fractal in the order the interactive viewer cycles them.
    pub const ALL: [Fractal; 4] = [
        Fractal::Mandelbrot,
        Fractal::Julia(JULIA_CONSTANT),
        Fractal::Tricorn,
        Fractal::Cosine,
    ];

    /// The name used for banners and default file names.
    pub fn name(&self) -> &'static str {
        match self {
            Fractal::Mandelbrot => "Mandelbrot",
            Fractal::Julia(_) => "Julia",
            Fractal::Tricorn => "Tricorn",
            Fractal::Cosine => "Cosine",
        }
    }

    /// Distance from the origin beyond which a point has escaped.
    pub fn radius(&self) -> f64 {
        match self {
            Fractal::Cosine => 10.0 * PI,
            _ => 2.0,
        }
    }

    /// The part of the plane where this fractal is worth looking at.
    pub fn default_window(&self) -> PlaneWindow {
        let (top_left, bottom_right) = match self {
            Fractal::Mandelbrot => (Complex::new(-2.0, 1.2), Complex::new(1.0, -1.2)),
            Fractal::Julia(_) => (Complex::new(-1.6, 1.2), Complex::new(1.6, -1.2)),
            Fractal::Tricorn => (Complex::new(-2.0, 1.6), Complex::new(2.0, -1.6)),
            Fractal::Cosine => (Complex::new(-2.0, 2.0), Complex::new(5.0, -2.0)),
        };
        PlaneWindow {
            top_left,
            bottom_right,
        }
    }

    #[inline]
    fn start(&self, point: Complex<f64>) -> Complex<f64> {
        match self {
            Fractal::Julia(_) => point,
            _ => Complex::new(0.0, 0.0),
        }
    }

    #[inline]
    fn step(&self, z: Complex<f64>, point: Complex<f64>) -> Complex<f64> {
        match self {
            Fractal::Mandelbrot => z * z + point,
            Fractal::Julia(k) => z * z + *k,
            Fractal::Tricorn => {
                let conjugate = z.conj();
                conjugate * conjugate + point
            }
            Fractal::Cosine => z.cos() + point,
        }
    }

    /// Run the recurrence for a sample point and return its intensity,
    /// 0 for points that never escape within the budget.
    pub fn generate(&self, point: Complex<f64>, budget: &Budget) -> u8 {
        let radius_sqr = self.radius() * self.radius();
        let mut z = self.start(point);
        for iteration in 0..budget.max() {
            if z.norm_sqr() > radius_sqr {
                return budget.intensity(iteration);
            }
            z = self.step(z, point);
        }
        0
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_rejects_zero() {
        assert!(Budget::new(0).is_err());
    }

    #[test]
    fn intensity_is_logarithmic_and_bounded() {
        let budget = Budget::new(100).unwrap();
        assert_eq!(budget.intensity(0), 0);
        assert_eq!(budget.intensity(9), (255.0 * 10f64.ln() / 100f64.ln()) as u8);
        assert_eq!(budget.intensity(99), 255);
        assert_eq!(budget.intensity(10_000), 255);
    }

    #[test]
    fn single_iteration_budget_is_black() {
        let budget = Budget::new(1).unwrap();
        for fractal in Fractal::ALL.iter() {
            assert_eq!(fractal.generate(Complex::new(100.0, 100.0), &budget), 0);
            assert_eq!(fractal.generate(Complex::new(0.0, 0.0), &budget), 0);
        }
    }

    #[test]
    fn origin_is_inside_the_mandelbrot() {
        for max in &[1, 2, 10, 50, 1000] {
            let budget = Budget::new(*max).unwrap();
            assert_eq!(Fractal::Mandelbrot.generate(Complex::new(0.0, 0.0), &budget), 0);
        }
    }

    #[test]
    fn main_cardioid_is_interior() {
        let budget = Budget::new(50).unwrap();
        assert_eq!(Fractal::Mandelbrot.generate(Complex::new(-0.5, 0.0), &budget), 0);
        assert_eq!(Fractal::Tricorn.generate(Complex::new(-0.1, 0.0), &budget), 0);
    }

    #[test]
    fn far_corner_escapes_quickly() {
        let budget = Budget::new(50).unwrap();
        // -2+1.2i lies outside the radius, so it escapes right after the first step.
        let value = Fractal::Mandelbrot.generate(Complex::new(-2.0, 1.2), &budget);
        assert_eq!(value, budget.intensity(1));
        assert!(value > 0 && value < 64);
    }

    #[test]
    fn julia_starts_from_the_sample_point() {
        let budget = Budget::new(50).unwrap();
        // Already outside the radius: escapes at iteration 0.
        assert_eq!(Fractal::Julia(JULIA_CONSTANT).generate(Complex::new(3.0, 0.0), &budget), 0);
        // Inside the radius, but escapes after three steps.
        let value = Fractal::Julia(JULIA_CONSTANT).generate(Complex::new(1.5, 0.0), &budget);
        assert!(value > 0);
    }

    #[test]
    fn tricorn_conjugates_before_squaring() {
        let z = Complex::new(1.0, 1.0);
        let origin = Complex::new(0.0, 0.0);
        assert_eq!(Fractal::Mandelbrot.step(z, origin), Complex::new(0.0, 2.0));
        assert_eq!(Fractal::Tricorn.step(z, origin), Complex::new(0.0, -2.0));
    }

    #[test]
    fn cosine_uses_a_wide_radius() {
        assert!((Fractal::Cosine.radius() - 31.41592653589793).abs() < 1e-12);
        let budget = Budget::new(50).unwrap();
        // 20 is inside the radius, so the first step is taken.
        assert!(Fractal::Cosine.generate(Complex::new(0.0, 20.0), &budget) > 0);
    }

    #[test]
    fn generate_is_deterministic() {
        let budget = Budget::new(256).unwrap();
        let c = Complex::new(-0.743_643_887, 0.131_825_904);
        for fractal in Fractal::ALL.iter() {
            let first = fractal.generate(c, &budget);
            for _ in 0..10 {
                assert_eq!(fractal.generate(c, &budget), first);
            }
        }
    }

    #[test]
    fn default_windows_are_valid() {
        for fractal in Fractal::ALL.iter() {
            let w = fractal.default_window();
            assert!(PlaneWindow::new(w.top_left, w.bottom_right).is_ok());
        }
    }
}
