//! Command orchestration helpers from the console loop to the backend queue.

use anyhow::{bail, Result};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` without blocking the console loop.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<()> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued console->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => bail!("backend command queue is full; {cmd_name} dropped"),
        Err(TrySendError::Disconnected(_)) => {
            bail!("backend worker disconnected (possible startup/runtime failure)")
        }
    }
}
