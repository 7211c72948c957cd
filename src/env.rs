/// A single `export`ed variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub identifier: String,
    pub value: String,
}

/// Interpreter-level variables, kept in definition order.
///
/// The environment lives for the whole session and only grows: defining an
/// identifier again appends another entry instead of replacing the old one, and
/// [`Environment::lookup`] returns the earliest definition. Variables are private to
/// the interpreter and are not handed to child processes.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: Vec<Variable>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition of `identifier`.
    pub fn define(&mut self, identifier: impl Into<String>, value: impl Into<String>) {
        self.vars.push(Variable {
            identifier: identifier.into(),
            value: value.into(),
        });
    }

    /// Value of the first definition of `identifier`, if any.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|var| var.identifier == identifier)
            .map(|var| var.value.as_str())
    }

    /// Like [`Environment::get`], but an undefined identifier reads as `""`.
    pub fn lookup(&self, identifier: &str) -> &str {
        self.get(identifier).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All definitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_lookup_of_undefined_is_empty() {
        let env = Environment::new();
        assert!(env.is_empty());
        assert_eq!(env.get("SOME_RANDOM_VAR_12345"), None);
        assert_eq!(env.lookup("SOME_RANDOM_VAR_12345"), "");
    }

    #[test]
    fn test_define_and_lookup() {
        let mut env = Environment::new();
        env.define("KEY", "VALUE");
        assert_eq!(env.lookup("KEY"), "VALUE");
        assert_eq!(env.get("KEY"), Some("VALUE"));
    }

    #[test]
    fn test_first_definition_wins() {
        let mut env = Environment::new();
        env.define("X", "5");
        env.define("X", "6");
        assert_eq!(env.lookup("X"), "5");
        assert_eq!(env.len(), 2);

        let values: Vec<&str> = env.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["5", "6"]);
    }

    #[test]
    fn test_empty_value_is_still_defined() {
        let mut env = Environment::new();
        env.define("EMPTY", "");
        assert_eq!(env.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_process_environment_is_not_consulted() {
        let env = Environment::new();
        assert_eq!(env.lookup("PATH"), "");
    }
}
