// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate env_logger;
extern crate escapetime;

use env_logger::Env;
use escapetime::{cli, Fractal};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    cli::main(Fractal::Cosine);
}
