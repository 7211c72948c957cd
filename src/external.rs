use crate::command::{Argv, Outcome, Streams};
use crate::reaper::ReaperHandle;
use anyhow::{Context, Result};
use std::io::{self, ErrorKind, Write};
use std::process::{Child, Command};

/// Whether the interpreter waits for a launched program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Foreground,
    Background,
}

/// Starts programs that are not built-ins.
///
/// Children inherit the interpreter's standard streams and working directory.
/// Foreground children are waited for right here, on their own handle only;
/// background children are passed to the reaper, if there is one.
pub(crate) struct Launcher {
    reaper: Option<ReaperHandle>,
}

impl Launcher {
    pub(crate) fn new(reaper: Option<ReaperHandle>) -> Self {
        Self { reaper }
    }

    pub(crate) fn launch(&self, argv: &Argv, mode: Mode, io: &mut Streams<'_>) -> Result<Outcome> {
        io.stdout.flush()?;
        let child = match Command::new(argv.command()).args(argv.args()).spawn() {
            Ok(child) => child,
            Err(err) if is_user_mistake(&err) => {
                io.report(format_args!("{}: {}", argv.command(), err))?;
                return Ok(Outcome::Continue);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("{}: can't spawn", argv.command()));
            }
        };

        match mode {
            Mode::Foreground => wait_for(child, argv.command())?,
            Mode::Background => self.detach(child)?,
        }
        Ok(Outcome::Continue)
    }

    fn detach(&self, child: Child) -> Result<()> {
        match &self.reaper {
            Some(reaper) => reaper.adopt(child),
            // Without a reaper the child is simply forgotten until it exits.
            None => Ok(()),
        }
    }
}

/// Block until `child` terminates. Its exit status is discarded.
fn wait_for(mut child: Child, name: &str) -> Result<()> {
    child
        .wait()
        .with_context(|| format!("{}: can't wait for pid {}", name, child.id()))?;
    Ok(())
}

/// Spawn failures caused by what the user typed rather than by the system.
fn is_user_mistake(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn argv(tokens: &[&str]) -> Argv {
        Argv::new(tokens.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    fn launch(tokens: &[&str], mode: Mode) -> (Result<Outcome>, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = Launcher::new(None).launch(
            &argv(tokens),
            mode,
            &mut Streams::new(&mut out, &mut err),
        );
        (res, String::from_utf8(err).unwrap())
    }

    #[test]
    #[cfg(unix)]
    fn foreground_waits_for_child() {
        let start = Instant::now();
        let (res, err) = launch(&["sleep", "1"], Mode::Foreground);
        assert_eq!(res.unwrap(), Outcome::Continue);
        assert!(err.is_empty());
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[test]
    #[cfg(unix)]
    fn background_returns_immediately() {
        let start = Instant::now();
        let (res, _) = launch(&["sleep", "3"], Mode::Background);
        assert_eq!(res.unwrap(), Outcome::Continue);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    #[cfg(unix)]
    fn failing_child_status_is_discarded() {
        let (res, err) = launch(&["false"], Mode::Foreground);
        assert_eq!(res.unwrap(), Outcome::Continue);
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_program_is_reported_not_fatal() {
        let name = format!("no_such_program_{}", std::process::id());
        let (res, err) = launch(&[name.as_str()], Mode::Foreground);
        assert_eq!(res.unwrap(), Outcome::Continue);
        assert!(err.starts_with(&format!("dollarsh: {}: ", name)));
    }

    #[test]
    fn not_found_and_permission_are_user_mistakes() {
        assert!(is_user_mistake(&io::Error::from(ErrorKind::NotFound)));
        assert!(is_user_mistake(&io::Error::from(ErrorKind::PermissionDenied)));
        assert!(!is_user_mistake(&io::Error::from(ErrorKind::OutOfMemory)));
        assert!(!is_user_mistake(&io::Error::from(ErrorKind::WouldBlock)));
    }
}
