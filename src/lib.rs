//! A tiny interactive command interpreter.
//!
//! Each input line is split into a command and its arguments, `$NAME` references
//! are replaced with values from the interpreter's own variable list, and the
//! result is either handled in-process by a built-in (`exit`, `cd`, `pwd`, `echo`,
//! `export`) or launched as an external program, in the foreground or, with a
//! trailing `&`, in the background.
//!
//! The per-line pipeline is exposed piece by piece: [`lexer::tokenize`] builds an
//! [`command::Argv`], [`expand::expand`] rewrites it against an [`env::Environment`],
//! and [`dispatch::Dispatcher`] executes it. [`Interpreter`] ties these together
//! into a read-eval loop over any [`input::LineSource`].

mod builtin;
pub mod command;
pub mod dispatch;
pub mod env;
pub mod expand;
mod external;
pub mod input;
mod interpreter;
pub mod lexer;
pub mod reaper;
pub mod tokens;

/// Just a convenient re-export of the interactive loop.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Config, Interpreter};

/// Prefix used for every diagnostic written to standard error.
pub const DIAGNOSTIC_PREFIX: &str = "dollarsh";

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Tests that read or change the process working directory hold this lock.
    pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
