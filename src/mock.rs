// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory editor host for tests: controls, windows, idle loop, DWM and console fakes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::rc::{Rc, Weak};

use crate::backdrop::BackdropController;
use crate::console::{ConsoleDevice, ConsoleHost, StdStream};
use crate::error::{Error, Result};
use crate::host::{
    Color, EventHandler, HierarchicalList, Host, NodeRef, SubscriptionId, TopLevelWindow, UiNode,
    WindowHandle, WindowRef,
};

// ── Handler-Tabelle ─────────────────────────────────

#[derive(Default)]
pub struct Handlers {
    next: Cell<u64>,
    slots: RefCell<Vec<(SubscriptionId, EventHandler)>>,
}

impl Handlers {
    pub fn subscribe(&self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next.get());
        self.next.set(id.0 + 1);
        self.slots.borrow_mut().push((id, handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|(sid, _)| *sid != id);
        slots.len() != before
    }

    /// Fires every attached handler, returns how many ran.
    pub fn fire(&self) -> usize {
        let handlers: Vec<EventHandler> =
            self.slots.borrow().iter().map(|(_, h)| h.clone()).collect();
        for h in &handlers {
            h();
        }
        handlers.len()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

// ── Steuerelemente ──────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
    Generic,
    TextEntry,
    TreeList,
}

/// Stock control colors before theming.
const CONTROL_BACK: Color = Color::rgb(240, 240, 240);
const CONTROL_FORE: Color = Color::rgb(0, 0, 0);

pub struct MockNode {
    name: String,
    kind: Kind,
    back: Cell<Color>,
    fore: Cell<Color>,
    fore_history: RefCell<Vec<Color>>,
    writes: Cell<usize>,
    refuse: Cell<bool>,
    children: RefCell<Vec<Rc<MockNode>>>,
    window: RefCell<Weak<MockNode>>,
    selection: Handlers,
}

impl MockNode {
    fn build(name: &str, kind: Kind) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            kind,
            back: Cell::new(CONTROL_BACK),
            fore: Cell::new(CONTROL_FORE),
            fore_history: RefCell::new(Vec::new()),
            writes: Cell::new(0),
            refuse: Cell::new(false),
            children: RefCell::new(Vec::new()),
            window: RefCell::new(Weak::new()),
            selection: Handlers::default(),
        })
    }

    pub fn generic(name: &str) -> Rc<Self> {
        Self::build(name, Kind::Generic)
    }

    pub fn text_entry(name: &str) -> Rc<Self> {
        Self::build(name, Kind::TextEntry)
    }

    pub fn tree_list(name: &str) -> Rc<Self> {
        Self::build(name, Kind::TreeList)
    }

    pub fn as_node(self: &Rc<Self>) -> NodeRef {
        self.clone()
    }

    pub fn add_child(&self, child: Rc<MockNode>) {
        self.children.borrow_mut().push(child);
    }

    pub fn child_nodes(&self) -> Vec<Rc<MockNode>> {
        self.children.borrow().clone()
    }

    /// Self plus everything below, depth-first.
    pub fn descendants(self: &Rc<Self>) -> Vec<Rc<MockNode>> {
        let mut out = vec![self.clone()];
        for child in self.child_nodes() {
            out.extend(child.descendants());
        }
        out
    }

    pub fn refuse_colors(&self) {
        self.refuse.set(true);
    }

    /// Host-side recolor, not counted as a write.
    pub fn force_colors(&self, back: Color, fore: Color) {
        self.back.set(back);
        self.fore.set(fore);
    }

    pub fn fore_history(&self) -> Vec<Color> {
        self.fore_history.borrow().clone()
    }

    pub fn color_writes(&self) -> usize {
        self.writes.get()
    }

    pub fn selection_handlers(&self) -> usize {
        self.selection.len()
    }

    /// User clicks an item. Returns the number of handlers that ran.
    pub fn select(&self) -> usize {
        self.selection.fire()
    }

    fn adopt(self: &Rc<Self>, window: &Rc<MockNode>) {
        *self.window.borrow_mut() = Rc::downgrade(window);
        for child in self.child_nodes() {
            child.adopt(window);
        }
    }

    fn check(&self, property: &'static str) -> Result<()> {
        if self.refuse.get() {
            return Err(Error::Property {
                property,
                node: self.name.clone(),
                reason: "control is locked".into(),
            });
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl UiNode for MockNode {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn type_name(&self) -> String {
        match self.kind {
            Kind::Generic => "Panel",
            Kind::TextEntry => "TextBox",
            Kind::TreeList => "TreeView",
        }
        .to_string()
    }

    fn back_color(&self) -> Color {
        self.back.get()
    }

    fn set_back_color(&self, color: Color) -> Result<()> {
        self.check("BackColor")?;
        self.back.set(color);
        Ok(())
    }

    fn fore_color(&self) -> Color {
        self.fore.get()
    }

    fn set_fore_color(&self, color: Color) -> Result<()> {
        self.check("ForeColor")?;
        self.fore.set(color);
        self.fore_history.borrow_mut().push(color);
        Ok(())
    }

    fn children(&self) -> Vec<NodeRef> {
        self.children
            .borrow()
            .iter()
            .map(|c| c.clone() as NodeRef)
            .collect()
    }

    fn is_text_entry(&self) -> bool {
        self.kind == Kind::TextEntry
    }

    fn as_hierarchical_list(&self) -> Option<&dyn HierarchicalList> {
        match self.kind {
            Kind::TreeList => Some(self),
            _ => None,
        }
    }

    fn owning_window(&self) -> Option<NodeRef> {
        self.window.borrow().upgrade().map(|w| w as NodeRef)
    }
}

impl HierarchicalList for MockNode {
    fn subscribe_selection_changed(&self, handler: EventHandler) -> SubscriptionId {
        self.selection.subscribe(handler)
    }

    fn unsubscribe_selection_changed(&self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }
}

// ── Fenster ─────────────────────────────────────────

pub struct MockWindow {
    handle: WindowHandle,
    created: Cell<bool>,
    root: Rc<MockNode>,
    invalidated: Handlers,
}

impl MockWindow {
    /// Realized window; every node currently below `root` resolves to it.
    pub fn new(handle: isize, root: Rc<MockNode>) -> Rc<Self> {
        root.adopt(&root);
        Rc::new(Self {
            handle: WindowHandle(handle),
            created: Cell::new(true),
            root,
            invalidated: Handlers::default(),
        })
    }

    pub fn pending(handle: isize, root: Rc<MockNode>) -> Rc<Self> {
        let window = Self::new(handle, root);
        window.created.set(false);
        window
    }

    pub fn realize(&self) {
        self.created.set(true);
    }

    pub fn root_node(&self) -> Rc<MockNode> {
        self.root.clone()
    }

    /// Host repaints the window. Returns the number of handlers that ran.
    pub fn invalidate(&self) -> usize {
        self.invalidated.fire()
    }

    pub fn invalidation_handlers(&self) -> usize {
        self.invalidated.len()
    }
}

impl TopLevelWindow for MockWindow {
    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn is_handle_created(&self) -> bool {
        self.created.get()
    }

    fn root(&self) -> NodeRef {
        self.root.clone()
    }

    fn subscribe_invalidated(&self, handler: EventHandler) -> SubscriptionId {
        self.invalidated.subscribe(handler)
    }

    fn unsubscribe_invalidated(&self, id: SubscriptionId) -> bool {
        self.invalidated.unsubscribe(id)
    }
}

// ── Host ────────────────────────────────────────────

#[derive(Default)]
pub struct MockHost {
    windows: RefCell<Vec<Rc<MockWindow>>>,
    idle: Handlers,
}

impl MockHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn open(&self, window: Rc<MockWindow>) {
        self.windows.borrow_mut().push(window);
    }

    pub fn close(&self, handle: isize) {
        self.windows
            .borrow_mut()
            .retain(|w| w.handle != WindowHandle(handle));
    }

    /// One pass of the message loop with nothing to do.
    pub fn idle(&self) -> usize {
        self.idle.fire()
    }

    pub fn idle_handlers(&self) -> usize {
        self.idle.len()
    }
}

impl Host for MockHost {
    fn open_windows(&self) -> Vec<WindowRef> {
        self.windows
            .borrow()
            .iter()
            .map(|w| w.clone() as WindowRef)
            .collect()
    }

    fn subscribe_idle(&self, handler: EventHandler) -> SubscriptionId {
        self.idle.subscribe(handler)
    }

    fn unsubscribe_idle(&self, id: SubscriptionId) -> bool {
        self.idle.unsubscribe(id)
    }
}

// ── DWM ─────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum DwmStep {
    Material,
    DarkTitlebar,
    ExtendFrame,
}

/// Records every DWM call; steps listed in `failing` report an error.
#[derive(Clone, Default)]
pub struct RecordingBackdrop {
    calls: Rc<RefCell<Vec<(WindowHandle, DwmStep)>>>,
    failing: Rc<RefCell<Vec<DwmStep>>>,
}

impl RecordingBackdrop {
    pub fn fail(&self, step: DwmStep) {
        self.failing.borrow_mut().push(step);
    }

    pub fn calls(&self) -> Vec<(WindowHandle, DwmStep)> {
        self.calls.borrow().clone()
    }

    /// How often the material was requested for `handle`, i.e. backdrop passes.
    pub fn passes_for(&self, handle: isize) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(h, s)| *h == WindowHandle(handle) && *s == DwmStep::Material)
            .count()
    }

    fn record(&self, handle: WindowHandle, step: DwmStep) -> Result<()> {
        self.calls.borrow_mut().push((handle, step));
        if self.failing.borrow().contains(&step) {
            return Err(Error::Io(io::Error::other(format!("{step:?} rejected"))));
        }
        Ok(())
    }
}

impl BackdropController for RecordingBackdrop {
    fn set_backdrop_material(&self, handle: WindowHandle) -> Result<()> {
        self.record(handle, DwmStep::Material)
    }

    fn set_dark_titlebar(&self, handle: WindowHandle) -> Result<()> {
        self.record(handle, DwmStep::DarkTitlebar)
    }

    fn extend_frame(&self, handle: WindowHandle) -> Result<()> {
        self.record(handle, DwmStep::ExtendFrame)
    }
}

// ── Konsole ─────────────────────────────────────────

/// Console API double. `allocated` starts false, like a GUI process.
///
/// Devices are never closed, matching the borrowed streams of the real
/// console. Dropping a stream only lands in `released`; `bindings` keeps
/// whatever was installed as a standard handle.
#[derive(Default)]
pub struct FakeConsole {
    pub allocated: bool,
    pub fail_output: bool,
    pub fail_input: bool,
    pub fail_set_std: bool,
    pub broken_output: bool,
    pub input_data: Vec<u8>,
    pub bindings: HashMap<StdStream, ConsoleDevice>,
    pub alloc_calls: usize,
    pub written: Rc<RefCell<Vec<u8>>>,
    pub released: Rc<RefCell<Vec<ConsoleDevice>>>,
}

impl FakeConsole {
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.written.borrow()).into_owned()
    }
}

struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console went away"))
    }
}

/// Wraps a fake stream and notes when it is dropped.
struct Tracked<T> {
    inner: T,
    device: ConsoleDevice,
    released: Rc<RefCell<Vec<ConsoleDevice>>>,
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.released.borrow_mut().push(self.device);
    }
}

impl<T: Write> Write for Tracked<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<T: Read> Read for Tracked<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl FakeConsole {
    fn tracked<T>(&self, inner: T, device: ConsoleDevice) -> Tracked<T> {
        Tracked {
            inner,
            device,
            released: self.released.clone(),
        }
    }
}

impl ConsoleHost for FakeConsole {
    type Device = ConsoleDevice;

    fn alloc_console(&mut self) -> Result<()> {
        self.alloc_calls += 1;
        if self.allocated {
            return Err(Error::ConsoleAlloc("process already has a console".into()));
        }
        self.allocated = true;
        Ok(())
    }

    fn open_device(&mut self, device: ConsoleDevice) -> Result<ConsoleDevice> {
        let fail = match device {
            ConsoleDevice::Output => self.fail_output,
            ConsoleDevice::Input => self.fail_input,
        };
        if fail {
            return Err(Error::ConsoleDevice {
                device: device.path(),
                reason: "invalid handle".into(),
            });
        }
        Ok(device)
    }

    fn set_std_handle(&mut self, stream: StdStream, device: &ConsoleDevice) -> Result<()> {
        if self.fail_set_std {
            return Err(Error::StdHandle {
                stream: stream.name(),
                reason: "access denied".into(),
            });
        }
        self.bindings.insert(stream, *device);
        Ok(())
    }

    fn writer(&mut self, device: ConsoleDevice) -> Box<dyn Write> {
        if self.broken_output {
            Box::new(self.tracked(BrokenPipe, device))
        } else {
            Box::new(self.tracked(SharedBuf(self.written.clone()), device))
        }
    }

    fn reader(&mut self, device: ConsoleDevice) -> Box<dyn Read> {
        Box::new(self.tracked(Cursor::new(self.input_data.clone()), device))
    }
}
