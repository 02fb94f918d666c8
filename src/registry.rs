// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::host::{SubscriptionId, TopLevelWindow, WindowHandle, WindowRef};

/// Invalidation hook attached to a tracked window.
#[derive(Clone)]
pub struct Hook {
    pub window: Weak<dyn TopLevelWindow>,
    pub invalidated: SubscriptionId,
}

/// Windows already wired for theming, keyed by native handle.
///
/// Insert-only while the plugin runs: a window is in here iff its invalidation
/// hook is attached and backdrop + theme ran once. Closed windows simply stop
/// showing up in the host's enumeration. [`WindowRegistry::drain`] is only
/// for teardown.
#[derive(Default)]
pub struct WindowRegistry {
    tracked: HashMap<WindowHandle, Hook>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracked(&self, handle: WindowHandle) -> bool {
        self.tracked.contains_key(&handle)
    }

    /// Records `window` with its invalidation hook. Returns false (and keeps
    /// the existing entry) if the handle was already tracked.
    pub fn track(&mut self, window: &WindowRef, invalidated: SubscriptionId) -> bool {
        let handle = window.handle();
        if self.is_tracked(handle) {
            return false;
        }
        self.tracked.insert(
            handle,
            Hook {
                window: Rc::downgrade(window),
                invalidated,
            },
        );
        true
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Empties the registry and hands back every hook for detaching.
    pub fn drain(&mut self) -> Vec<Hook> {
        self.tracked.drain().map(|(_, hook)| hook).collect()
    }
}
