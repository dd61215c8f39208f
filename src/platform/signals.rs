//! OS signal plumbing.
//!
//! Incoming signals are turned into [`ControlRequest`]s by one listener task
//! per signal. Listeners are installed once per process and outlive restarts.
//! Outgoing signals (`sb trigger`, `sb reload`) are sent to every other
//! running instance.

use std::ffi::OsString;
use std::io;

use libc::c_int;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::core::lifecycle::{ControlHandle, ControlRequest};
use crate::error::{Result, SbError};

/// Real-time signal that triggers block `index`, if the platform has one.
pub fn trigger_signal(index: usize) -> Option<c_int> {
    let offset = c_int::try_from(index).ok()?;
    let sig = libc::SIGRTMIN().checked_add(offset)?;
    (sig <= libc::SIGRTMAX()).then_some(sig)
}

/// Install listeners for terminate, restart and one trigger per block.
pub fn forward_signals(handle: &ControlHandle, blocks: usize) -> Result<Vec<JoinHandle<()>>> {
    let mut listeners = vec![
        listen(SignalKind::terminate(), ControlRequest::Terminate, handle.clone())?,
        listen(SignalKind::interrupt(), ControlRequest::Terminate, handle.clone())?,
        listen(SignalKind::user_defined1(), ControlRequest::Restart, handle.clone())?,
    ];

    for index in 0..blocks {
        match trigger_signal(index) {
            Some(sig) => listeners.push(listen(
                SignalKind::from_raw(sig),
                ControlRequest::Trigger(index),
                handle.clone(),
            )?),
            None => log::warn!("No real-time signal left for block {}", index),
        }
    }

    log::debug!("Installed {} signal listeners", listeners.len());
    Ok(listeners)
}

fn listen(
    kind: SignalKind,
    request: ControlRequest,
    handle: ControlHandle,
) -> Result<JoinHandle<()>> {
    let mut stream = signal(kind).map_err(|e| {
        SbError::signal(format!(
            "cannot listen for signal {}: {}",
            kind.as_raw_value(),
            e
        ))
    })?;

    Ok(tokio::spawn(async move {
        while stream.recv().await.is_some() {
            log::debug!("Signal {} -> {:?}", kind.as_raw_value(), request);
            if handle.send(request).await.is_err() {
                break;
            }
        }
    }))
}

fn own_process_name() -> OsString {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_os_string()))
        .unwrap_or_else(|| OsString::from("sb"))
}

/// Send `sig` to every other running instance. Returns how many were signalled.
pub fn send_to_running(sig: c_int) -> Result<usize> {
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::nothing());

    let name = own_process_name();
    let me = sysinfo::get_current_pid().ok();
    let mut sent = 0;

    for process in system.processes_by_exact_name(&name) {
        if Some(process.pid()) == me {
            continue;
        }
        let Ok(pid) = libc::pid_t::try_from(process.pid().as_u32()) else {
            continue;
        };

        // SAFETY: kill(2) has no memory-safety preconditions
        if unsafe { libc::kill(pid, sig) } == 0 {
            sent += 1;
        } else {
            log::warn!(
                "Failed to signal process {}: {}",
                pid,
                io::Error::last_os_error()
            );
        }
    }

    Ok(sent)
}
