// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Dark palette applied to control trees, plus the tree-view rebinding pass.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::{node_key, NodeRef, SubscriptionId, UiNode, BLACK, GRAY, WHITE};
use crate::visit::for_each;

// ── Einzelner Knoten ────────────────────────────────

/// Paints one node. A node the host refuses to recolor is logged and skipped.
pub fn apply_theme(node: &dyn UiNode) {
    if let Err(e) = paint(node) {
        warn!("apply_theme: [{}] {}: {e}", node.name(), node.type_name());
        return;
    }
    debug!(
        "Control: [{}] {}, BackColor: {}, ForeColor: {}",
        node.name(),
        node.type_name(),
        node.back_color(),
        node.fore_color()
    );
}

fn paint(node: &dyn UiNode) -> Result<()> {
    if node.is_text_entry() {
        node.set_back_color(BLACK)?;
        node.set_fore_color(GRAY)?;
    } else {
        node.set_back_color(BLACK)?;
    }
    // Unconditional, overrides the text field gray above. Kept as the editor shipped it.
    node.set_fore_color(WHITE)
}

/// Re-themes `root` and everything below it.
pub fn apply_dark_mode(root: &NodeRef) {
    for_each(Some(root), |node| apply_theme(node.as_ref()));
}

// ── TreeView ────────────────────────────────────────

/// Owns the selection-changed subscriptions of every tree view seen so far,
/// so a rescan replaces the previous handler instead of stacking a new one.
///
/// Entries hold the tree view weakly. Once the host frees a control its entry
/// is dropped on the next bind, and an address reused by a later control never
/// inherits the old subscription id.
#[derive(Default)]
pub struct TreeViewBinder {
    bindings: RefCell<HashMap<usize, (Weak<dyn UiNode>, SubscriptionId)>>,
}

impl TreeViewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks `root`; tree views get their colors and a selection hook,
    /// every other node is painted with [`apply_theme`].
    pub fn find_tree_view(&self, root: &NodeRef) {
        for_each(Some(root), |node| {
            if node.as_hierarchical_list().is_some() {
                self.bind(node);
            } else {
                apply_theme(node.as_ref());
            }
        });
    }

    /// Number of tree views currently holding a selection hook.
    pub fn bound(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Detaches every selection hook from the tree views that are still alive.
    pub fn release(&self) {
        let bindings: Vec<_> = self.bindings.borrow_mut().drain().collect();
        for (_, (weak, id)) in bindings {
            let Some(node) = weak.upgrade() else { continue };
            if let Some(list) = node.as_hierarchical_list() {
                list.unsubscribe_selection_changed(id);
            }
        }
    }

    fn bind(&self, node: &NodeRef) {
        let Some(list) = node.as_hierarchical_list() else { return };

        paint_tree_view(node.as_ref());
        debug!("TreeView: [{}] {}", node.name(), node.type_name());

        let key = node_key(node);
        let previous = {
            let mut bindings = self.bindings.borrow_mut();
            bindings.retain(|_, (weak, _)| weak.strong_count() > 0);
            bindings.remove(&key)
        };
        if let Some((weak, id)) = previous {
            let same = weak.upgrade().is_some_and(|old| Rc::ptr_eq(&old, node));
            if same && !list.unsubscribe_selection_changed(id) {
                debug!("TreeView: stale selection hook {:?} on [{}]", id, node.name());
            }
        }

        let weak = Rc::downgrade(node);
        let id = list.subscribe_selection_changed(Rc::new({
            let weak = weak.clone();
            move || {
                if let Some(node) = weak.upgrade() {
                    on_selection_changed(&node);
                }
            }
        }));
        self.bindings.borrow_mut().insert(key, (weak, id));
    }
}

fn paint_tree_view(node: &dyn UiNode) {
    let result = node
        .set_back_color(BLACK)
        .and_then(|_| node.set_fore_color(WHITE));
    if let Err(e) = result {
        warn!("TreeView: [{}] {}: {e}", node.name(), node.type_name());
    }
}

fn on_selection_changed(node: &NodeRef) {
    if let Some(window) = node.owning_window() {
        apply_dark_mode(&window);
    }
    paint_tree_view(node.as_ref());
    debug!("TreeView AfterSelect: [{}] {}", node.name(), node.type_name());
}
