// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Native window chrome: Mica backdrop, dark titlebar, frame extended into the client area.

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::WindowHandle;

/// Which of the three DWM requests went through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackdropReport {
    pub material: bool,
    pub dark_titlebar: bool,
    pub frame_extended: bool,
}

impl BackdropReport {
    pub fn is_complete(&self) -> bool {
        self.material && self.dark_titlebar && self.frame_extended
    }
}

/// One-shot native attribute calls on a top-level window.
pub trait BackdropController {
    fn set_backdrop_material(&self, handle: WindowHandle) -> Result<()>;
    fn set_dark_titlebar(&self, handle: WindowHandle) -> Result<()>;
    fn extend_frame(&self, handle: WindowHandle) -> Result<()>;

    /// Best effort: every step runs even if an earlier one failed.
    /// A null handle is skipped.
    fn enable_backdrop(&self, handle: WindowHandle) -> BackdropReport {
        if handle.is_null() {
            debug!("Form handle is not valid.");
            return BackdropReport::default();
        }

        let step = |name: &str, result: Result<()>| match result {
            Ok(()) => true,
            Err(e) => {
                warn!("backdrop: {name} on {handle} failed: {e}");
                false
            }
        };

        let report = BackdropReport {
            material: step("SYSTEMBACKDROP_TYPE", self.set_backdrop_material(handle)),
            dark_titlebar: step("USE_IMMERSIVE_DARK_MODE", self.set_dark_titlebar(handle)),
            frame_extended: step("ExtendFrameIntoClientArea", self.extend_frame(handle)),
        };
        debug!("backdrop: {handle} -> {report:?}");
        report
    }
}

// ── DWM (Windows 11) ────────────────────────────────

#[cfg(windows)]
pub use self::dwm::DwmBackdrop;

#[cfg(windows)]
mod dwm {
    use std::ffi::c_void;
    use std::mem;

    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{
        DwmExtendFrameIntoClientArea, DwmSetWindowAttribute, DWMWINDOWATTRIBUTE,
    };
    use windows::Win32::UI::Controls::MARGINS;

    use super::BackdropController;
    use crate::error::Result;
    use crate::host::WindowHandle;

    const DWMWA_USE_IMMERSIVE_DARK_MODE: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(20);
    const DWMWA_SYSTEMBACKDROP_TYPE: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(38);
    const DWMSBT_MAINWINDOW: i32 = 2; // Mica

    /// Talks to dwmapi directly.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct DwmBackdrop;

    fn hwnd(handle: WindowHandle) -> HWND {
        HWND(handle.0 as *mut _)
    }

    unsafe fn set_i32(handle: WindowHandle, attr: DWMWINDOWATTRIBUTE, value: i32) -> Result<()> {
        DwmSetWindowAttribute(
            hwnd(handle),
            attr,
            &value as *const i32 as *const c_void,
            mem::size_of::<i32>() as u32,
        )?;
        Ok(())
    }

    impl BackdropController for DwmBackdrop {
        fn set_backdrop_material(&self, handle: WindowHandle) -> Result<()> {
            unsafe { set_i32(handle, DWMWA_SYSTEMBACKDROP_TYPE, DWMSBT_MAINWINDOW) }
        }

        fn set_dark_titlebar(&self, handle: WindowHandle) -> Result<()> {
            unsafe { set_i32(handle, DWMWA_USE_IMMERSIVE_DARK_MODE, 1) }
        }

        fn extend_frame(&self, handle: WindowHandle) -> Result<()> {
            // -1 = "sheet of glass", whole client area
            let margins = MARGINS {
                cxLeftWidth: -1,
                ..Default::default()
            };
            unsafe { DwmExtendFrameIntoClientArea(hwnd(handle), &margins)? };
            Ok(())
        }
    }
}
