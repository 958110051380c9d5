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

//! The winit application driving the overlay.
//!
//! The event loop is the only "thread" in the program: every scheduler tick
//! happens inside `RedrawRequested`, and `about_to_wait` immediately asks for
//! the next redraw, which turns winit's event loop into a continuous update
//! loop. A `Shutdown` tick (target process gone) or a `CloseRequested` event
//! exits the loop; `finish` then moves the scheduler to `Stopped`.

use crate::config::OverlayConfig;
use anyhow::Result;
use vigil_core::platform::window::OverlayWindow;
use vigil_core::renderer::OverlayRenderer;
use vigil_core::source::EntitySource;
use vigil_core::{compose_frame, TickOutcome, UpdateScheduler};
use vigil_infra::{OverlayWindowBuilder, WinitOverlayWindow};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

/// Owns the scheduler and its collaborators for the lifetime of the run.
pub struct OverlayApp {
    config: OverlayConfig,
    scheduler: UpdateScheduler,
    source: Box<dyn EntitySource>,
    renderer: Box<dyn OverlayRenderer>,
    window: Option<WinitOverlayWindow>,
}

impl OverlayApp {
    /// Wires up an app from a config and the two pluggable collaborators.
    pub fn new(
        config: OverlayConfig,
        source: Box<dyn EntitySource>,
        renderer: Box<dyn OverlayRenderer>,
    ) -> Self {
        let scheduler = UpdateScheduler::new(config.timing.scheduler_config());
        Self {
            config,
            scheduler,
            source,
            renderer,
            window: None,
        }
    }

    /// Runs the overlay until the target process dies or the window closes.
    ///
    /// Blocks the calling thread for the whole run.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;

        // Covers the window-closed path; after a Shutdown tick this is a
        // ShuttingDown -> Stopped transition.
        self.scheduler.finish();
        Ok(())
    }
}

impl ApplicationHandler for OverlayApp {
    /// First resume creates the window and runs the eager initial scan, so
    /// the first redraw already has entities to draw.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("event loop live, creating the overlay window");
        let window = match OverlayWindowBuilder::new()
            .with_target_bounds(self.config.target.bounds)
            .build(event_loop)
        {
            Ok(window) => window,
            Err(e) => {
                log::error!("overlay window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.scheduler.bootstrap(self.source.as_mut()) {
            log::error!("initial entity scan failed, aborting startup: {e}");
            event_loop.exit();
            return;
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("overlay window closed, exiting");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => match self.scheduler.tick(self.source.as_mut()) {
                TickOutcome::Frame(stats) => {
                    compose_frame(
                        self.renderer.as_mut(),
                        self.scheduler.registry().snapshot(),
                        stats,
                        window.inner_size(),
                    );
                }
                TickOutcome::Shutdown => event_loop.exit(),
                TickOutcome::Idle => {}
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
