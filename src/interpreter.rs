use crate::command::{ExitCode, Outcome, Streams};
use crate::dispatch::Dispatcher;
use crate::env::Environment;
use crate::expand::expand;
use crate::input::LineSource;
use crate::lexer::{self, ParseError};
use crate::reaper::{Notice, Reaper};
use anyhow::{Context, Result};
use std::io::Write;

/// Settings of an interactive session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prompt shown before each command line.
    pub prompt: String,
    /// Write the token and expanded vectors of every line to stderr.
    pub trace: bool,
    /// Start the background reaper.
    pub reap: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            trace: false,
            reap: true,
        }
    }
}

/// The read-eval loop.
///
/// Each iteration reads one line, splits it into an argument vector, expands
/// variable references and dispatches the result. Only the variables defined with
/// `export` survive from one iteration to the next.
///
/// Example
/// ```
/// use dollarsh::input::ReaderSource;
/// use dollarsh::{Config, Interpreter};
///
/// let config = Config { reap: false, ..Config::default() };
/// let mut sh = Interpreter::new(config).unwrap();
/// let mut input = ReaderSource::new("export NAME=world\necho $NAME\n".as_bytes());
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let code = sh.run(&mut input, &mut out, &mut err).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap(), "world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    dispatcher: Dispatcher,
    reaper: Option<Reaper>,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Result<Self> {
        let reaper = if config.reap {
            Some(Reaper::start()?)
        } else {
            None
        };
        let dispatcher = Dispatcher::with_reaper(reaper.as_ref().map(Reaper::handle));
        Ok(Self {
            env: Environment::new(),
            dispatcher,
            reaper,
            config,
        })
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run until the input ends or `exit` is executed and return the exit status.
    ///
    /// `Err` is a fatal error; the caller reports it and exits with a failure status.
    pub fn run(
        &mut self,
        source: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitCode> {
        loop {
            self.report_reaped(stdout, stderr)?;
            let line = match source
                .read_line(&self.config.prompt)
                .context("read_line")?
            {
                Some(line) => line,
                None => return Ok(0),
            };

            let mut io = Streams::new(stdout, stderr);
            if let Outcome::Exit(code) = self.execute_line(&line, source, &mut io)? {
                return Ok(code);
            }
        }
    }

    /// Tokenize, expand and dispatch one line.
    ///
    /// `source` supplies continuation lines for quoted `export` values. Parse
    /// errors are reported and end the iteration.
    pub fn execute_line(
        &mut self,
        line: &str,
        source: &mut dyn LineSource,
        io: &mut Streams<'_>,
    ) -> Result<Outcome> {
        let mut argv = match lexer::tokenize(line, source) {
            Ok(argv) => argv,
            Err(ParseError::Input(err)) => {
                return Err(err).context("read_line");
            }
            Err(err) => {
                io.report(format_args!("parse_command: {}", err))?;
                return Ok(Outcome::Continue);
            }
        };
        self.trace(io, "tokens", argv.as_slice())?;

        expand(&self.env, &mut argv);
        self.trace(io, "expanded", argv.as_slice())?;

        self.dispatcher.dispatch(argv, &mut self.env, io)
    }

    fn trace(&self, io: &mut Streams<'_>, stage: &str, tokens: &[String]) -> Result<()> {
        if self.config.trace {
            writeln!(io.stderr, "+ {} {:?}", stage, tokens)?;
        }
        Ok(())
    }

    fn report_reaped(&self, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
        let Some(reaper) = &self.reaper else {
            return Ok(());
        };
        for notice in reaper.drain() {
            match notice {
                Notice::Terminated(pid) => {
                    writeln!(stdout, "Child process with pid {} terminated", pid)?;
                }
                Notice::Lost(pid, err) => {
                    Streams::new(stdout, stderr).report(format_args!("waitpid {}: {}", pid, err))?;
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }
}
