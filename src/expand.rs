//! Variable reference expansion.

use crate::command::Argv;
use crate::env::Environment;

/// Marks a token as a variable reference.
pub const SIGIL: char = '$';

/// Replace every token that starts with [`SIGIL`] by the value of the named
/// variable, the command name included.
///
/// The whole token names the variable (`$A/b` looks up `A/b`). Undefined names
/// expand to `""`. Substituted values are not expanded again.
pub fn expand(env: &Environment, argv: &mut Argv) {
    for token in argv.iter_mut() {
        if let Some(identifier) = token.strip_prefix(SIGIL) {
            let value = env.lookup(identifier).to_owned();
            *token = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Argv {
        Argv::new(tokens.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    #[test]
    fn undefined_variable_expands_to_empty() {
        let env = Environment::new();
        let mut a = argv(&["echo", "$X"]);
        expand(&env, &mut a);
        assert_eq!(a.as_slice(), &["echo", ""]);
    }

    #[test]
    fn only_sigil_tokens_change() {
        let mut env = Environment::new();
        env.define("DIR", "/tmp");
        let mut a = argv(&["ls", "-l", "$DIR", "a$DIR"]);
        expand(&env, &mut a);
        assert_eq!(a.as_slice(), &["ls", "-l", "/tmp", "a$DIR"]);
    }

    #[test]
    fn command_name_is_expanded() {
        let mut env = Environment::new();
        env.define("CMD", "pwd");
        let mut a = argv(&["$CMD"]);
        expand(&env, &mut a);
        assert_eq!(a.command(), "pwd");
    }

    #[test]
    fn expansion_is_not_recursive() {
        let mut env = Environment::new();
        env.define("A", "$B");
        env.define("B", "deep");
        let mut a = argv(&["echo", "$A"]);
        expand(&env, &mut a);
        assert_eq!(a.args(), &["$B"]);
    }

    #[test]
    fn bare_sigil_looks_up_empty_identifier() {
        let mut env = Environment::new();
        let mut a = argv(&["echo", "$"]);
        expand(&env, &mut a);
        assert_eq!(a.args(), &[""]);

        env.define("", "odd");
        let mut b = argv(&["echo", "$"]);
        expand(&env, &mut b);
        assert_eq!(b.args(), &["odd"]);
    }
}
