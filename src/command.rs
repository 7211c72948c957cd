use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Marker that, as the last of several tokens, sends a command to the background.
pub const BACKGROUND_MARKER: &str = "&";

/// What the interpreter loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read the next line.
    Continue,
    /// Stop the interpreter with the given status.
    Exit(ExitCode),
}

/// Argument vector of a single invocation.
///
/// Never empty: element 0 is the command name, the rest are its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argv(Vec<String>);

impl Argv {
    /// Wrap `tokens`, or return `None` when there is no command name.
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens))
        }
    }

    pub fn command(&self) -> &str {
        &self.0[0]
    }

    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, String> {
        self.0.iter_mut()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Drop a trailing [`BACKGROUND_MARKER`] and report whether one was there.
    ///
    /// A lone `&` is a command name, not a marker, so it is left alone.
    pub fn take_background_marker(&mut self) -> bool {
        if self.0.len() > 1 && self.0.last().is_some_and(|last| last == BACKGROUND_MARKER) {
            self.0.pop();
            true
        } else {
            false
        }
    }
}

/// Output streams a command writes to.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }

    /// Write a `dollarsh: <message>` diagnostic line to stderr.
    pub fn report(&mut self, message: std::fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.stderr, "{}: {}", crate::DIAGNOSTIC_PREFIX, message)?;
        Ok(())
    }
}

/// Commands executed in-process, without spawning a child.
///
/// `Err` from [`BuiltinCommand::execute`] is fatal for the interpreter; recoverable
/// problems are reported through [`Streams::report`] and answered with
/// [`Outcome::Continue`].
pub trait BuiltinCommand {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Runs the command with the arguments that follow the command name.
    fn execute(
        &self,
        args: &[String],
        io: &mut Streams<'_>,
        env: &mut Environment,
    ) -> Result<Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Argv {
        Argv::new(tokens.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    #[test]
    fn empty_token_list_is_not_an_argv() {
        assert_eq!(Argv::new(Vec::new()), None);
    }

    #[test]
    fn trailing_marker_is_stripped() {
        let mut a = argv(&["sleep", "1", "&"]);
        assert!(a.take_background_marker());
        assert_eq!(a.as_slice(), &["sleep", "1"]);
        assert!(!a.take_background_marker());
    }

    #[test]
    fn lone_marker_stays_a_command() {
        let mut a = argv(&["&"]);
        assert!(!a.take_background_marker());
        assert_eq!(a.command(), "&");
    }

    #[test]
    fn marker_must_be_exact_last_token() {
        let mut a = argv(&["sleep", "&", "1"]);
        assert!(!a.take_background_marker());
        let mut b = argv(&["sleep", "1&"]);
        assert!(!b.take_background_marker());
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn report_prefixes_diagnostics() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut io = Streams::new(&mut out, &mut err);
        io.report(format_args!("cd: {}", "nowhere")).unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "dollarsh: cd: nowhere\n");
        assert!(out.is_empty());
    }
}
