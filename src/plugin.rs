// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Entry point the editor calls once after loading the plugin.

use std::rc::Rc;

use tracing::{debug, info};

use crate::backdrop::BackdropController;
use crate::config::Config;
use crate::console::{attach_console, ConsoleHost, ConsoleStreams};
use crate::host::Host;
use crate::logging;
use crate::scheduler::Scheduler;

/// Drops the idle hook from the host, if the host is still around.
type Detach = Box<dyn FnOnce()>;

/// Dropping the plugin detaches every hook it attached to the host. The debug
/// console stays allocated.
pub struct DarkModePlugin {
    config: Config,
    scheduler: Rc<Scheduler>,
    console: Option<ConsoleStreams>,
    idle: Option<Detach>,
}

impl DarkModePlugin {
    pub fn new<B>(config: Config, backdrop: B) -> Self
    where
        B: BackdropController + 'static,
    {
        Self {
            config,
            scheduler: Rc::new(Scheduler::new(Box::new(backdrop))),
            console: None,
            idle: None,
        }
    }

    /// DWM backdrop, settings from the environment.
    #[cfg(windows)]
    pub fn native() -> Self {
        Self::new(Config::from_env(), crate::backdrop::DwmBackdrop)
    }

    /// Arms the idle hook. With diagnostics on, installs logging and opens
    /// the debug console first. Later calls are no-ops.
    pub fn init<H, C>(&mut self, host: &Rc<H>, console: &mut C)
    where
        H: Host + ?Sized + 'static,
        C: ConsoleHost,
    {
        if self.idle.is_some() {
            debug!("init: already initialized");
            return;
        }

        if self.config.diagnostics {
            logging::init(&self.config);
            self.console = attach_console(console);
        }

        // The host owns the handler, so the handler only holds the host weakly.
        let scheduler = Rc::clone(&self.scheduler);
        let weak = Rc::downgrade(host);
        let id = host.subscribe_idle(Rc::new(move || {
            if let Some(host) = weak.upgrade() {
                scheduler.on_idle(&host.open_windows());
            }
        }));
        let weak = Rc::downgrade(host);
        self.idle = Some(Box::new(move || {
            if let Some(host) = weak.upgrade() {
                host.unsubscribe_idle(id);
            }
        }));
        info!(
            "dark mode armed (diagnostics: {}, console: {})",
            self.config.diagnostics,
            self.console.is_some()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.idle.is_some()
    }

    pub fn console_attached(&self) -> bool {
        self.console.is_some()
    }

    pub fn console(&mut self) -> Option<&mut ConsoleStreams> {
        self.console.as_mut()
    }

    pub fn tracked_windows(&self) -> usize {
        self.scheduler.tracked_windows()
    }
}

impl Drop for DarkModePlugin {
    fn drop(&mut self) {
        let Some(detach) = self.idle.take() else { return };
        detach();
        self.scheduler.release();
        debug!("dark mode detached");
    }
}
