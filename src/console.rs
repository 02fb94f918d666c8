// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Debug console for a GUI process.
//!
//! The editor is a windows-subsystem process without a console, so stdout and
//! stderr go nowhere. [`attach_console`] allocates one and points the
//! process's standard handles at `CONOUT$` / `CONIN$`. The handles are kept for
//! the rest of the process lifetime and never closed.

use std::fmt;
use std::io::{BufReader, LineWriter, Read, Write};

use tracing::{debug, error, info, warn};

use crate::error::Result;

pub const BANNER: &str = "Debug Console Initialized.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsoleDevice {
    Output,
    Input,
}

impl ConsoleDevice {
    /// Reserved device name opened with CreateFileW.
    pub fn path(self) -> &'static str {
        match self {
            ConsoleDevice::Output => "CONOUT$",
            ConsoleDevice::Input => "CONIN$",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdStream {
    Input,
    Output,
    Error,
}

impl StdStream {
    pub fn name(self) -> &'static str {
        match self {
            StdStream::Input => "STD_INPUT_HANDLE",
            StdStream::Output => "STD_OUTPUT_HANDLE",
            StdStream::Error => "STD_ERROR_HANDLE",
        }
    }
}

/// The four kernel32 operations the redirect needs.
pub trait ConsoleHost {
    type Device;

    /// Fails when the process already has a console.
    fn alloc_console(&mut self) -> Result<()>;
    fn open_device(&mut self, device: ConsoleDevice) -> Result<Self::Device>;
    fn set_std_handle(&mut self, stream: StdStream, device: &Self::Device) -> Result<()>;

    /// Stream over a device that may already be installed as a standard
    /// handle. Dropping the stream must not close the device.
    fn writer(&mut self, device: Self::Device) -> Box<dyn Write>;
    /// Same contract as [`ConsoleHost::writer`].
    fn reader(&mut self, device: Self::Device) -> Box<dyn Read>;
}

/// Buffered views on the console devices, alive as long as the console is used.
#[derive(Default)]
pub struct ConsoleStreams {
    output: Option<LineWriter<Box<dyn Write>>>,
    input: Option<BufReader<Box<dyn Read>>>,
}

impl ConsoleStreams {
    pub fn output(&mut self) -> Option<&mut LineWriter<Box<dyn Write>>> {
        self.output.as_mut()
    }

    pub fn input(&mut self) -> Option<&mut BufReader<Box<dyn Read>>> {
        self.input.as_mut()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }
}

impl fmt::Debug for ConsoleStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleStreams")
            .field("output", &self.has_output())
            .field("input", &self.has_input())
            .finish()
    }
}

/// Allocates a console and rewires stdin/stdout/stderr to it.
///
/// `None` if allocation failed (nothing else is touched then) or if the
/// wiring hit an unexpected fault. A missing input or output device alone
/// is not a failure.
pub fn attach_console<C: ConsoleHost>(host: &mut C) -> Option<ConsoleStreams> {
    if let Err(e) = host.alloc_console() {
        debug!("attach_console: {e}");
        return None;
    }

    match redirect_io(host) {
        Ok(streams) => {
            info!("attach_console: {streams:?}");
            Some(streams)
        }
        Err(e) => {
            error!("Error redirecting console I/O: {e}");
            None
        }
    }
}

fn redirect_io<C: ConsoleHost>(host: &mut C) -> Result<ConsoleStreams> {
    let mut streams = ConsoleStreams::default();

    // stdout and stderr share one handle
    match host.open_device(ConsoleDevice::Output) {
        Ok(out) => {
            for stream in [StdStream::Output, StdStream::Error] {
                if let Err(e) = host.set_std_handle(stream, &out) {
                    warn!("redirect: {e}");
                }
            }
            streams.output = Some(LineWriter::new(host.writer(out)));
        }
        Err(e) => warn!("redirect: {e}"),
    }

    match host.open_device(ConsoleDevice::Input) {
        Ok(input) => {
            if let Err(e) = host.set_std_handle(StdStream::Input, &input) {
                warn!("redirect: {e}");
            }
            streams.input = Some(BufReader::new(host.reader(input)));
        }
        Err(e) => warn!("redirect: {e}"),
    }

    if let Some(out) = streams.output() {
        writeln!(out, "{BANNER}")?;
    }
    Ok(streams)
}

// ── kernel32 ────────────────────────────────────────

#[cfg(windows)]
pub use self::win32::Win32Console;

#[cfg(windows)]
mod win32 {
    use std::fs::File;
    use std::io::{self, Read, Write};
    use std::mem::ManuallyDrop;
    use std::os::windows::io::{FromRawHandle, RawHandle};

    use windows::core::w;
    use windows::Win32::Foundation::{GENERIC_READ, GENERIC_WRITE, HANDLE};
    use windows::Win32::Storage::FileSystem::{
        CreateFileW, FILE_FLAGS_AND_ATTRIBUTES, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
    };
    use windows::Win32::System::Console::{
        AllocConsole, SetStdHandle, STD_ERROR_HANDLE, STD_HANDLE, STD_INPUT_HANDLE,
        STD_OUTPUT_HANDLE,
    };

    use super::{ConsoleDevice, ConsoleHost, StdStream};
    use crate::error::{Error, Result};

    #[derive(Clone, Copy, Debug, Default)]
    pub struct Win32Console;

    fn std_id(stream: StdStream) -> STD_HANDLE {
        match stream {
            StdStream::Input => STD_INPUT_HANDLE,
            StdStream::Output => STD_OUTPUT_HANDLE,
            StdStream::Error => STD_ERROR_HANDLE,
        }
    }

    /// Borrowed view on a console handle. The handle stays installed as a
    /// standard handle after this is dropped, so it is never closed here.
    pub(super) struct ConsoleHandle(ManuallyDrop<File>);

    impl ConsoleHandle {
        pub(super) fn new(handle: HANDLE) -> Self {
            Self(ManuallyDrop::new(unsafe {
                File::from_raw_handle(handle.0 as RawHandle)
            }))
        }
    }

    impl Write for ConsoleHandle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            (&*self.0).write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            (&*self.0).flush()
        }
    }

    impl Read for ConsoleHandle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            (&*self.0).read(buf)
        }
    }

    impl ConsoleHost for Win32Console {
        type Device = HANDLE;

        fn alloc_console(&mut self) -> Result<()> {
            unsafe { AllocConsole() }.map_err(|e| Error::ConsoleAlloc(e.to_string()))
        }

        fn open_device(&mut self, device: ConsoleDevice) -> Result<HANDLE> {
            let (name, access, share) = match device {
                ConsoleDevice::Output => (w!("CONOUT$"), GENERIC_WRITE.0, FILE_SHARE_WRITE),
                ConsoleDevice::Input => (w!("CONIN$"), GENERIC_READ.0, FILE_SHARE_READ),
            };
            let handle = unsafe {
                CreateFileW(
                    name,
                    access,
                    share,
                    None,
                    OPEN_EXISTING,
                    FILE_FLAGS_AND_ATTRIBUTES(0),
                    HANDLE::default(),
                )
            }
            .map_err(|e| Error::ConsoleDevice {
                device: device.path(),
                reason: e.to_string(),
            })?;

            if handle.is_invalid() {
                return Err(Error::ConsoleDevice {
                    device: device.path(),
                    reason: "INVALID_HANDLE_VALUE".into(),
                });
            }
            Ok(handle)
        }

        fn set_std_handle(&mut self, stream: StdStream, device: &HANDLE) -> Result<()> {
            unsafe { SetStdHandle(std_id(stream), *device) }.map_err(|e| Error::StdHandle {
                stream: stream.name(),
                reason: e.to_string(),
            })
        }

        fn writer(&mut self, device: HANDLE) -> Box<dyn Write> {
            Box::new(ConsoleHandle::new(device))
        }

        fn reader(&mut self, device: HANDLE) -> Box<dyn Read> {
            Box::new(ConsoleHandle::new(device))
        }
    }

}
