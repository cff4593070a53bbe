//! Command execution with prefix-argument repetition

use super::host::{CommandInvocation, Hook, Host, HookPayload};
use crate::keymap::{Action, KeyEvent};

/// Run `action` for `event`, bracketed by PreCommand and PostCommand
///
/// A positive `arg` repeats an ordinary action `arg` times, each call seeing
/// `Some(arg)`. A zero, negative or missing `arg` runs it once with `None`.
/// Actions marked `no_repeat` run once and receive `arg` unchanged.
pub fn execute<H: Host + ?Sized>(host: &mut H, action: &Action, event: &KeyEvent, arg: Option<i64>) {
    let invocation = CommandInvocation { action, event, arg };
    host.notify(Hook::PreCommand, HookPayload::Command(&invocation));

    if action.is_no_repeat() {
        tracing::debug!(command = action.name(), ?arg, "execute");
        action.invoke(event, arg);
    } else {
        match arg {
            Some(n) if n > 0 => {
                tracing::debug!(command = action.name(), times = n, "execute repeated");
                for _ in 0..n {
                    action.invoke(event, arg);
                }
            }
            _ => {
                tracing::debug!(command = action.name(), "execute");
                action.invoke(event, None);
            }
        }
    }

    host.notify(Hook::PostCommand, HookPayload::Command(&invocation));
}
