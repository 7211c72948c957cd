use anyhow::{Context, Result};
use argh::FromArgs;
use dollarsh::input::{EditorSource, LineSource, ReaderSource};
use dollarsh::{Config, DIAGNOSTIC_PREFIX, Interpreter};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Interactive command interpreter with the cd, pwd, echo, export and exit built-ins.
struct Args {
    #[argh(option)]
    /// directory to change to before reading the first line
    workdir: Option<PathBuf>,

    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt shown before each command line
    prompt: String,

    #[argh(switch)]
    /// read plain lines from stdin instead of using the line editor
    plain: bool,

    #[argh(switch)]
    /// do not reap background children asynchronously
    no_reap: bool,

    #[argh(switch)]
    /// print tokenized and expanded commands to stderr
    trace: bool,
}

fn run(args: Args) -> Result<i32> {
    if let Some(dir) = &args.workdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("chdir: can't change to {}", dir.display()))?;
    }

    let mut source: Box<dyn LineSource> = if args.plain || !io::stdin().is_terminal() {
        Box::new(ReaderSource::new(io::stdin().lock()))
    } else {
        Box::new(EditorSource::new().context("can't start the line editor")?)
    };

    let config = Config {
        prompt: args.prompt,
        trace: args.trace,
        reap: !args.no_reap,
    };
    let mut interpreter = Interpreter::new(config)?;
    interpreter.run(source.as_mut(), &mut io::stdout(), &mut io::stderr())
}

fn main() {
    let args: Args = argh::from_env();
    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{}: {:#}", DIAGNOSTIC_PREFIX, err);
            std::process::exit(1);
        }
    }
}
