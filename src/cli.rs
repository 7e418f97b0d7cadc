// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The command line shared by every fractal binary:
//!
//! ```text
//! <name> [OPTIONS] <width> <height> <max_iterations>
//! ```

use clap::{value_t, App, Arg, ArgMatches};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use crate::error::FractalError;
use crate::fractals::Fractal;
use crate::generator::Generator;
use crate::planes::Size;
use crate::render::Grain;

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "max_iterations";
const THREADS: &str = "threads";
const GRAIN: &str = "grain";
const OUTPUT: &str = "output";

/// Split `s` at the first `separator` and parse both halves.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    let left = s[..index].parse().ok()?;
    let right = s[index + separator.len_utf8()..].parse().ok()?;
    Some((left, right))
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    parse_pair::<T>(s, separator)
        .map(|_| ())
        .ok_or_else(|| err.to_string())
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    s.parse::<T>().map(|_| ()).map_err(|_| err.to_string())
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    parse_err: &str,
    range_err: &str,
) -> Result<(), String> {
    let value = s.parse::<T>().map_err(|_| parse_err.to_string())?;
    if value < low || value > high {
        return Err(range_err.to_string());
    }
    Ok(())
}

/// The argument parser for one fractal's binary.
pub fn app<'a, 'b>(fractal: Fractal) -> App<'a, 'b> {
    let max_threads = num_cpus::get() * 4;

    App::new(fractal.name().to_lowercase())
        .version(env!("CARGO_PKG_VERSION"))
        .about("Escape-time fractal generator")
        .arg(
            Arg::with_name(WIDTH)
                .required(true)
                .index(1)
                .validator(|s| validate_number::<u32>(&s, "Could not parse image width"))
                .help("Width of the output image in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .required(true)
                .index(2)
                .validator(|s| validate_number::<u32>(&s, "Could not parse image height"))
                .help("Height of the output image in pixels"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(true)
                .index(3)
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver [default: all CPUs]"),
        )
        .arg(
            Arg::with_name(GRAIN)
                .required(false)
                .long(GRAIN)
                .short("g")
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse grain size"))
                .help("Rows and columns per unit of work, as ROWSxCOLS"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file [default: <Name>.png]"),
        )
}

/// Everything a run needs, pulled out of the command line.
#[derive(Debug, PartialEq)]
pub struct Settings {
    /// Image dimensions.
    pub size: Size,
    /// Iterations per point.
    pub iterations: usize,
    /// Worker threads.
    pub threads: usize,
    /// Unit of parallel work.
    pub grain: Grain,
    /// Where the image goes.
    pub output: PathBuf,
}

impl Settings {
    /// Read settings from parsed arguments, filling in defaults.
    /// Zero-sized images and grains are passed through untouched so
    /// the Generator can reject them.
    pub fn from_matches(fractal: Fractal, matches: &ArgMatches) -> Result<Settings, FractalError> {
        let size = Size {
            width: value_t!(matches, WIDTH, usize)?,
            height: value_t!(matches, HEIGHT, usize)?,
        };
        let iterations = value_t!(matches, ITERATIONS, usize)?;
        let threads = match matches.value_of(THREADS) {
            Some(_) => value_t!(matches, THREADS, usize)?,
            None => num_cpus::get(),
        };
        let grain = match matches.value_of(GRAIN).and_then(|s| parse_pair(s, 'x')) {
            Some((rows, cols)) => Grain { rows, cols },
            None => Grain::for_threads(size, threads),
        };
        let output = match matches.value_of(OUTPUT) {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!("{}.png", fractal.name())),
        };
        Ok(Settings {
            size,
            iterations,
            threads,
            grain,
            output,
        })
    }
}

/// Render one image as described by `settings` and save it.
pub fn run(fractal: Fractal, settings: &Settings) -> Result<(), FractalError> {
    info!(
        "Generating {} fractal image with size {}×{} using {} iterations and grainsize {}×{} on {} threads",
        fractal,
        settings.size.width,
        settings.size.height,
        settings.iterations,
        settings.grain.rows,
        settings.grain.cols,
        settings.threads
    );

    let mut generator = Generator::new(fractal, settings.size, settings.grain, settings.iterations)?
        .with_threads(settings.threads)?;

    let start = Instant::now();
    generator.render()?;
    info!(
        "Time taken for {} fractal generation : {} ms",
        fractal,
        start.elapsed().as_millis()
    );

    generator.save(&settings.output)
}

/// The whole program for one fractal: parse the process arguments,
/// render, save.  Argument errors print clap's usage text; every other
/// failure prints the error.  Both exit with status 1.
pub fn main(fractal: Fractal) {
    let matches = match app(fractal).get_matches_safe() {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };
    let outcome = Settings::from_matches(fractal, &matches).and_then(|s| run(fractal, &s));
    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Result<Settings, FractalError> {
        let mut argv = vec!["mandelbrot"];
        argv.extend_from_slice(args);
        let matches = app(Fractal::Mandelbrot).get_matches_from_safe(argv)?;
        Settings::from_matches(Fractal::Mandelbrot, &matches)
    }

    #[test]
    fn parse_pair_splits_on_the_separator() {
        assert_eq!(parse_pair::<usize>("12x34", 'x'), Some((12, 34)));
        assert_eq!(parse_pair::<usize>("12x", 'x'), None);
        assert_eq!(parse_pair::<usize>("1234", 'x'), None);
        assert_eq!(parse_pair::<f64>("-1.5,2", ','), Some((-1.5, 2.0)));
    }

    #[test]
    fn validators_report_their_own_messages() {
        assert_eq!(validate_pair::<usize>("3x4", 'x', "bad"), Ok(()));
        assert_eq!(validate_pair::<usize>("3x", 'x', "bad"), Err("bad".to_string()));
        assert_eq!(validate_number::<u32>("-1", "nan"), Err("nan".to_string()));
        assert_eq!(validate_range("5", 1, 4, "nan", "range"), Err("range".to_string()));
        assert_eq!(validate_range("x", 1, 4, "nan", "range"), Err("nan".to_string()));
        assert_eq!(validate_range("4", 1, 4, "nan", "range"), Ok(()));
    }

    #[test]
    fn positional_arguments_and_defaults() {
        let s = settings(&["640", "480", "256"]).unwrap();
        assert_eq!(s.size, Size { width: 640, height: 480 });
        assert_eq!(s.iterations, 256);
        assert_eq!(s.threads, num_cpus::get());
        assert_eq!(s.grain, Grain::for_threads(s.size, s.threads));
        assert_eq!(s.output, PathBuf::from("Mandelbrot.png"));
    }

    #[test]
    fn options_override_defaults() {
        let s = settings(&["-t", "1", "-g", "8x16", "-o", "m.ppm", "64", "32", "10"]).unwrap();
        assert_eq!(s.threads, 1);
        assert_eq!(s.grain, Grain { rows: 8, cols: 16 });
        assert_eq!(s.output, PathBuf::from("m.ppm"));
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        assert!(settings(&["640", "480"]).is_err());
        assert!(settings(&["640", "480", "10", "4"]).is_err());
    }

    #[test]
    fn non_numeric_arguments_are_rejected() {
        assert!(settings(&["wide", "480", "10"]).is_err());
        assert!(settings(&["640", "-480", "10"]).is_err());
        assert!(settings(&["640", "480", "10", "-g", "8by8"]).is_err());
        assert!(settings(&["640", "480", "10", "-t", "0"]).is_err());
    }

    #[test]
    fn zero_sizes_reach_the_generator() {
        let s = settings(&["0", "480", "10"]).unwrap();
        assert_eq!(s.size.width, 0);
        match run(Fractal::Mandelbrot, &s) {
            Err(FractalError::DegenerateImage { width: 0, height: 480 }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
