// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Idle-driven window pickup.
//!
//! Every idle tick the full list of open windows is scanned. A window whose
//! handle exists and that is not tracked yet gets, in this order: an
//! invalidation hook, the DWM backdrop, the tree-view pass. From then on only
//! the invalidation hook re-themes it; DWM attributes stick to the HWND.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::backdrop::BackdropController;
use crate::host::WindowRef;
use crate::registry::WindowRegistry;
use crate::theme::{apply_dark_mode, TreeViewBinder};
use crate::visit;

pub struct Scheduler {
    registry: RefCell<WindowRegistry>,
    backdrop: Box<dyn BackdropController>,
    tree_views: TreeViewBinder,
}

impl Scheduler {
    pub fn new(backdrop: Box<dyn BackdropController>) -> Self {
        Self::with_registry(WindowRegistry::new(), backdrop)
    }

    pub fn with_registry(registry: WindowRegistry, backdrop: Box<dyn BackdropController>) -> Self {
        Self {
            registry: RefCell::new(registry),
            backdrop,
            tree_views: TreeViewBinder::new(),
        }
    }

    /// One idle tick over the host's current window list.
    /// Returns how many windows were picked up for the first time.
    pub fn on_idle(&self, windows: &[WindowRef]) -> usize {
        trace!("OnApplicationIdle called ({} open)", windows.len());

        let mut fresh = 0;
        for window in windows {
            if !window.is_handle_created() {
                continue;
            }
            if self.registry.borrow().is_tracked(window.handle()) {
                continue;
            }
            self.track(window);
            fresh += 1;
        }
        fresh
    }

    fn track(&self, window: &WindowRef) {
        let handle = window.handle();
        let root = window.root();

        let weak = Rc::downgrade(&root);
        let invalidated = window.subscribe_invalidated(Rc::new(move || {
            if let Some(root) = weak.upgrade() {
                apply_dark_mode(&root);
            }
        }));

        self.backdrop.enable_backdrop(handle);
        self.tree_views.find_tree_view(&root);

        self.registry.borrow_mut().track(window, invalidated);
        debug!(
            "window {handle} [{}] tracked: {} controls, {} tree view(s) hooked",
            root.name(),
            visit::count(Some(&root)),
            self.tree_views.bound()
        );
    }

    pub fn tracked_windows(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_tracked(&self, window: &WindowRef) -> bool {
        self.registry.borrow().is_tracked(window.handle())
    }

    /// Detaches every invalidation and selection hook still attached to a
    /// live window. Windows picked up afterwards start from scratch.
    pub fn release(&self) {
        let hooks = self.registry.borrow_mut().drain();
        let mut detached = 0;
        for hook in &hooks {
            if let Some(window) = hook.window.upgrade() {
                if window.unsubscribe_invalidated(hook.invalidated) {
                    detached += 1;
                }
            }
        }
        self.tree_views.release();
        debug!("scheduler released: {detached}/{} invalidation hook(s)", hooks.len());
    }
}
