// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Vigil overlay entry point.
//!
//! Usage: `vigil [config.json]`. Without an argument the overlay runs the
//! default scripted scene over a 1920x1080 rectangle at the origin.

mod app;
mod config;

use crate::app::OverlayApp;
use crate::config::OverlayConfig;
use anyhow::Result;
use std::path::Path;
use vigil_infra::{ScriptedSource, TraceRenderer};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Vigil overlay v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => OverlayConfig::load(Path::new(&path))?,
        None => {
            log::info!("no config given, using defaults");
            OverlayConfig::default()
        }
    };

    let mut source = ScriptedSource::new(config.scene.clone());
    if let Some(pid) = config.target.pid {
        source = source.watching_pid(pid);
    }

    let app = OverlayApp::new(config, Box::new(source), Box::new(TraceRenderer::new()));
    app.run()
}
