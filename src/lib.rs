// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Dark mode for the NESMaker editor.
//!
//! Loaded once by the editor's plugin loader. On every idle tick of the UI
//! thread it picks up top-level windows it has not seen yet, gives them a
//! Mica backdrop with a dark titlebar, paints the whole control tree black on
//! white and keeps it that way on every repaint and tree-view selection.
//! With `DEV=1` a debug console is opened and every themed control is logged.
//!
//! Single-threaded by contract: all entry points run on the host's UI thread.

pub mod backdrop;
pub mod config;
pub mod console;
pub mod error;
pub mod host;
pub mod logging;
pub mod plugin;
pub mod registry;
pub mod scheduler;
pub mod theme;
pub mod visit;

#[cfg(test)]
mod mock;

pub use backdrop::{BackdropController, BackdropReport};
pub use config::Config;
pub use console::{attach_console, ConsoleHost, ConsoleStreams};
pub use error::{Error, Result};
pub use host::{Color, Host, HierarchicalList, NodeRef, TopLevelWindow, UiNode, WindowHandle};
pub use plugin::DarkModePlugin;
pub use scheduler::Scheduler;
pub use theme::{apply_dark_mode, apply_theme, TreeViewBinder};

#[cfg(windows)]
pub use backdrop::DwmBackdrop;
#[cfg(windows)]
pub use console::Win32Console;
