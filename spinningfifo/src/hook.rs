//! Entry point for hosts that invoke named hooks with a string argument.
//!
//! Hosts pass `<name>:<arg>`; the `spinningfifo` hook takes `<path> <message>`
//! as its argument and reports `0` on success, `-1` on failure.

use log::error;

use crate::open::Opener;
use crate::SpinningFifo;

pub const HOOK_NAME: &str = "spinningfifo";

pub type HookFn = fn(&str) -> i32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("invalid hook syntax `{0}`, must be: <name>:<arg>")]
    MissingSeparator(String),
    #[error("Unknown hook `{0}`")]
    UnknownHook(String),
}

/// Run the hook with the default unbounded retry policy
pub fn spinningfifo_hook(arg: &str) -> i32 {
    run_hook(&SpinningFifo::new(), arg)
}

/// Run `arg` through `writer`, logging any failure once
pub fn run_hook<O: Opener>(writer: &SpinningFifo<O>, arg: &str) -> i32 {
    match writer.execute(arg) {
        Ok(()) => 0,
        Err(err) => {
            error!("{}: {}", HOOK_NAME, err);
            -1
        }
    }
}

/// A parsed `<name>:<arg>` hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hook<'a> {
    name: &'a str,
    arg: &'a str,
}

impl<'a> Hook<'a> {
    pub fn parse(value: &'a str) -> Result<Self, HookError> {
        let Some((name, arg)) = value.split_once(':') else {
            return Err(HookError::MissingSeparator(value.to_string()));
        };
        match name {
            HOOK_NAME => Ok(Hook { name, arg }),
            _ => Err(HookError::UnknownHook(name.to_string())),
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn arg(&self) -> &'a str {
        self.arg
    }

    pub fn handler(&self) -> HookFn {
        spinningfifo_hook
    }

    pub fn run(&self) -> i32 {
        (self.handler())(self.arg)
    }
}

impl<'a> TryFrom<&'a str> for Hook<'a> {
    type Error = crate::Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(Hook::parse(value)?)
    }
}
