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

//! A `winit`-based implementation of the `OverlayWindow` trait.
//!
//! The overlay is a transparent, undecorated, always-on-top window placed
//! over the target process's window once at startup. Placement is a
//! one-time act; nothing moves the window afterwards.

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vigil_core::platform::window::{OverlayWindow, OverlayWindowHandle};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    error::OsError,
    event_loop::ActiveEventLoop,
    window::{Window, WindowLevel},
};

/// Screen-space bounds of the target process's window, as configured or
/// discovered at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBounds {
    /// Left edge in screen pixels.
    pub x: i32,
    /// Top edge in screen pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for TargetBounds {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }
    }
}

/// A wrapper around a `winit::window::Window` that implements the
/// `OverlayWindow` trait.
#[derive(Debug, Clone)]
pub struct WinitOverlayWindow {
    inner: Arc<Window>,
}

/// A builder for creating `WinitOverlayWindow` instances.
pub struct OverlayWindowBuilder {
    title: String,
    bounds: TargetBounds,
}

impl OverlayWindowBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Vigil Overlay".to_string(),
            bounds: TargetBounds::default(),
        }
    }

    /// Sets the title of the overlay window.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the bounds the overlay is placed over (the target window's
    /// screen-space rectangle).
    pub fn with_target_bounds(mut self, bounds: TargetBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Builds the overlay window using the provided `winit` event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitOverlayWindow, OsError> {
        log::info!(
            "building overlay '{}' over target bounds {}x{} at ({}, {})",
            self.title,
            self.bounds.width,
            self.bounds.height,
            self.bounds.x,
            self.bounds.y
        );

        let window_attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(PhysicalSize::new(self.bounds.width, self.bounds.height))
            .with_position(PhysicalPosition::new(self.bounds.x, self.bounds.y))
            .with_transparent(true)
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop);

        let window = event_loop.create_window(window_attributes)?;

        // Let clicks fall through to the target window underneath. Not every
        // platform supports this; an overlay that eats clicks is still
        // usable, so failure is only logged.
        if let Err(e) = window.set_cursor_hittest(false) {
            log::warn!("could not make overlay click-through: {e}");
        }

        log::info!("overlay window created (id: {:?})", window.id());
        Ok(WinitOverlayWindow {
            inner: Arc::new(window),
        })
    }
}

impl Default for OverlayWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitOverlayWindow {
    /// The winit identifier of the underlying window, for event routing.
    pub fn id(&self) -> winit::window::WindowId {
        self.inner.id()
    }
}

impl HasWindowHandle for WinitOverlayWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for WinitOverlayWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl OverlayWindow for WinitOverlayWindow {
    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    fn clone_handle_arc(&self) -> OverlayWindowHandle {
        self.inner.clone()
    }
}
