use crate::command::{BuiltinCommand, Outcome, Streams};
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use std::env;
use std::io::Write;

/// The built-ins every interpreter knows about.
pub(crate) fn standard() -> Vec<Box<dyn BuiltinCommand>> {
    vec![
        Box::new(Exit),
        Box::new(Cd),
        Box::new(Pwd),
        Box::new(Echo),
        Box::new(Export),
    ]
}

/// Stop the interpreter with a success status. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        _args: &[String],
        _io: &mut Streams<'_>,
        _env: &mut Environment,
    ) -> Result<Outcome> {
        Ok(Outcome::Exit(0))
    }
}

/// Change the working directory of the interpreter process.
///
/// Failures are reported and the interpreter keeps running.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        args: &[String],
        io: &mut Streams<'_>,
        _env: &mut Environment,
    ) -> Result<Outcome> {
        match args.first() {
            None => io.report(format_args!("cd: missing operand"))?,
            Some(target) => {
                if let Err(err) = env::set_current_dir(target) {
                    io.report(format_args!("cd: {}: {}", target, err))?;
                }
            }
        }
        Ok(Outcome::Continue)
    }
}

/// Print the working directory. Not being able to resolve it is fatal.
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(
        &self,
        _args: &[String],
        io: &mut Streams<'_>,
        _env: &mut Environment,
    ) -> Result<Outcome> {
        let cwd = env::current_dir().context("pwd: can't resolve the working directory")?;
        writeln!(io.stdout, "{}", cwd.display())?;
        Ok(Outcome::Continue)
    }
}

/// Print the verbatim text after `echo`, followed by a newline.
pub struct Echo;

impl BuiltinCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(
        &self,
        args: &[String],
        io: &mut Streams<'_>,
        _env: &mut Environment,
    ) -> Result<Outcome> {
        if let Some(text) = args.first() {
            writeln!(io.stdout, "{}", text)?;
        }
        Ok(Outcome::Continue)
    }
}

/// Define a variable. The value is stored exactly as given, without expansion.
pub struct Export;

impl BuiltinCommand for Export {
    fn name(&self) -> &'static str {
        "export"
    }

    fn execute(
        &self,
        args: &[String],
        _io: &mut Streams<'_>,
        env: &mut Environment,
    ) -> Result<Outcome> {
        let Some(identifier) = args.first() else {
            bail!("export: missing identifier");
        };
        let value = args.get(1).map(String::as_str).unwrap_or_default();
        env.define(identifier.as_str(), value);
        Ok(Outcome::Continue)
    }
}
