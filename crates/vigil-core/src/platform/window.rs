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

//! The overlay window abstraction.
//!
//! A render backend only needs raw window/display handles and a couple of
//! geometry queries; this trait keeps the core independent of the windowing
//! library (`vigil-infra` provides the winit implementation).

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Combines the handle traits a graphics backend needs, so the pair can be
/// used behind one trait object.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

// Blanket impl: anything with both handle traits is a WindowHandle.
impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shared, thread-safe handle to the overlay window, for surface creation.
pub type OverlayWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// Behavior of the overlay window itself.
///
/// The window is placed over the target process's window once at startup;
/// the scheduler never moves it afterwards.
pub trait OverlayWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Physical dimensions (width, height) of the overlay's inner area.
    fn inner_size(&self) -> (u32, u32);

    /// The display scale factor, for HiDPI-aware backends.
    fn scale_factor(&self) -> f64;

    /// Requests that the overlay be redrawn.
    fn request_redraw(&self);

    /// Clones an `Arc`'d handle to the window for a renderer to keep.
    fn clone_handle_arc(&self) -> OverlayWindowHandle;
}
