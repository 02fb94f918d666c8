// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Host object model as seen from the theming layer.
//!
//! The editor owns every window and control. We only read the live tree,
//! write color properties and hook events; nodes are never created or
//! destroyed from this side. Everything here runs on the host's UI thread.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

// ── Farben ──────────────────────────────────────────

/// Plain 24-bit RGB color as the host toolkit stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const GRAY: Color = Color::rgb(128, 128, 128);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// ── Handles / Abonnements ───────────────────────────

/// Raw native window handle value (HWND as an integer). Zero means "none".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0 as usize)
    }
}

/// Token handed out by the host when a handler is attached; needed to detach it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

pub type EventHandler = Rc<dyn Fn()>;

pub type NodeRef = Rc<dyn UiNode>;
pub type WindowRef = Rc<dyn TopLevelWindow>;

// ── Knoten ──────────────────────────────────────────

pub trait UiNode {
    /// Designer name of the control, may be empty.
    fn name(&self) -> String;

    /// Type tag, e.g. "TreeView" or "TextBox".
    fn type_name(&self) -> String;

    fn back_color(&self) -> Color;
    fn set_back_color(&self, color: Color) -> Result<()>;

    fn fore_color(&self) -> Color;
    fn set_fore_color(&self, color: Color) -> Result<()>;

    /// Current children. Read again on every walk, the host tree mutates between ticks.
    fn children(&self) -> Vec<NodeRef>;

    fn is_text_entry(&self) -> bool {
        false
    }

    /// Selectable hierarchical list capability (tree views).
    fn as_hierarchical_list(&self) -> Option<&dyn HierarchicalList> {
        None
    }

    /// Top-level window containing this node, if the host can resolve it.
    fn owning_window(&self) -> Option<NodeRef> {
        None
    }
}

pub trait HierarchicalList {
    fn subscribe_selection_changed(&self, handler: EventHandler) -> SubscriptionId;

    /// Returns false if `id` was not attached (already gone).
    fn unsubscribe_selection_changed(&self, id: SubscriptionId) -> bool;
}

// ── Fenster ─────────────────────────────────────────

pub trait TopLevelWindow {
    fn handle(&self) -> WindowHandle;

    /// Native handle already realized by the host.
    fn is_handle_created(&self) -> bool;

    /// The window itself as the root of its control tree.
    fn root(&self) -> NodeRef;

    fn subscribe_invalidated(&self, handler: EventHandler) -> SubscriptionId;
    fn unsubscribe_invalidated(&self, id: SubscriptionId) -> bool;
}

pub trait Host {
    /// Fresh enumeration of the currently open top-level windows.
    fn open_windows(&self) -> Vec<WindowRef>;

    fn subscribe_idle(&self, handler: EventHandler) -> SubscriptionId;
    fn unsubscribe_idle(&self, id: SubscriptionId) -> bool;
}

/// Identity of a node for bookkeeping. Address of the shared allocation.
pub(crate) fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(node) as *const () as usize
}
