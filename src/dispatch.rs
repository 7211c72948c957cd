use crate::builtin;
use crate::command::{Argv, BuiltinCommand, Outcome, Streams};
use crate::env::Environment;
use crate::external::{Launcher, Mode};
use crate::reaper::ReaperHandle;
use anyhow::Result;

/// Decides how an expanded argument vector is executed.
///
/// A trailing `&` is stripped first and turns the invocation into a background
/// one. The command name is then looked up in the built-in table; anything not
/// found there is launched as an external program.
///
/// Example
/// ```
/// use dollarsh::command::{Argv, Outcome, Streams};
/// use dollarsh::dispatch::Dispatcher;
/// use dollarsh::env::Environment;
///
/// let mut dispatcher = Dispatcher::default();
/// let mut env = Environment::new();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let argv = Argv::new(vec!["echo".into(), "hi".into()]).unwrap();
/// let outcome = dispatcher
///     .dispatch(argv, &mut env, &mut Streams::new(&mut out, &mut err))
///     .unwrap();
/// assert_eq!(outcome, Outcome::Continue);
/// assert_eq!(out, b"hi\n");
/// ```
pub struct Dispatcher {
    builtins: Vec<Box<dyn BuiltinCommand>>,
    launcher: Launcher,
}

impl Dispatcher {
    /// Create a dispatcher over a custom built-in table. Background children go
    /// to `reaper` when one is given.
    pub fn new(builtins: Vec<Box<dyn BuiltinCommand>>, reaper: Option<ReaperHandle>) -> Self {
        Self {
            builtins,
            launcher: Launcher::new(reaper),
        }
    }

    /// The standard built-ins, reporting background children to `reaper`.
    pub fn with_reaper(reaper: Option<ReaperHandle>) -> Self {
        Self::new(builtin::standard(), reaper)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.find_builtin(name).is_some()
    }

    /// Execute `argv`. `Err` means the interpreter can't go on.
    pub fn dispatch(
        &mut self,
        mut argv: Argv,
        env: &mut Environment,
        io: &mut Streams<'_>,
    ) -> Result<Outcome> {
        let mode = if argv.take_background_marker() {
            Mode::Background
        } else {
            Mode::Foreground
        };

        match self.find_builtin(argv.command()) {
            Some(builtin) => builtin.execute(argv.args(), io, env),
            None => self.launcher.launch(&argv, mode, io),
        }
    }

    fn find_builtin(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.builtins
            .iter()
            .find(|builtin| builtin.name() == name)
            .map(|builtin| builtin.as_ref())
    }
}

impl Default for Dispatcher {
    /// Standard built-ins (`exit`, `cd`, `pwd`, `echo`, `export`), no reaper.
    fn default() -> Self {
        Self::with_reaper(None)
    }
}
