// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types. Nothing in here is ever allowed to reach the host as a panic.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // ── Konsole ──
    #[error("console allocation failed: {0}")]
    ConsoleAlloc(String),

    #[error("console device {device} unavailable: {reason}")]
    ConsoleDevice { device: &'static str, reason: String },

    #[error("SetStdHandle({stream}) failed: {reason}")]
    StdHandle { stream: &'static str, reason: String },

    // ── Host ──
    #[error("host refused {property} on '{node}': {reason}")]
    Property {
        property: &'static str,
        node: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(windows)]
    #[error(transparent)]
    Win32(#[from] windows::core::Error),
}
