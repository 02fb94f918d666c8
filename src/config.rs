// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

/// `DEV=1` turns on the debug console and verbose per-control logging.
pub const DEV_VAR: &str = "DEV";
pub const FILTER_VAR: &str = "RUST_LOG";
pub const DEFAULT_FILTER: &str = "debug";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub diagnostics: bool,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            diagnostics: lookup(DEV_VAR).as_deref() == Some("1"),
            log_filter: lookup(FILTER_VAR).filter(|f| !f.trim().is_empty()),
        }
    }

    /// Filter directive for the subscriber.
    pub fn filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }
}
