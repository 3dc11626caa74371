//! User command parsing

/// Simple prefix command parser.
///
/// This is useful when you want to extract a command and some arguments from a users message.
///
/// # Example
///
/// ```rust
/// use holdbot::command::Command;
/// let command = Command::new(".", "hold");
/// assert_eq!(command.parse(".hold"), Some(""));
/// assert_eq!(command.parse(".hold a lamp"), Some("a lamp"));
/// assert_eq!(command.parse(".holding a lamp"), None);
/// assert_eq!(command.parse("!hold a lamp"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    /// The full trigger to match against, e.g. `.hold`.
    trigger: String,
}

impl Command {
    /// Creates a new parser for the command `name` triggered by `prefix`.
    #[must_use]
    pub fn new(prefix: &str, name: &str) -> Command {
        Command {
            trigger: format!("{prefix}{name}"),
        }
    }

    /// Returns the full trigger of the command, e.g. `.hold`.
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Checks if the supplied input starts with the command trigger, and if so, returns a string
    /// slice that makes up the arguments, if any.
    #[must_use]
    pub fn parse<'a>(&self, input: &'a str) -> Option<&'a str> {
        let suffix = input.strip_prefix(&self.trigger)?;

        match suffix.chars().next() {
            // The proceeding character is whitespace, so we return the rest skipping it
            Some(c) if c.is_whitespace() => Some(&suffix[c.len_utf8()..]),
            // The proceeding character is part of a longer word
            Some(_) => None,
            // The input is identical to the trigger
            None => Some(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_args() {
        let command = Command::new("!", "combine");

        assert_eq!(command.parse("!combine 3"), Some("3"));
    }

    #[test]
    fn parse_command_is_some() {
        let command = Command::new("!", "weight");

        assert_eq!(command.parse("!weight"), Some(""));
    }

    #[test]
    fn parse_preserves_whitespace() {
        let command = Command::new(".", "hold");

        assert_eq!(command.parse(".hold   a lamp"), Some("  a lamp"));
    }

    #[test]
    fn skip_on_non_whitespace_chars() {
        let command = Command::new(".", "hold");

        assert_eq!(command.parse(".holding a lamp"), None);
    }

    #[test]
    fn multi_character_prefix() {
        let command = Command::new("bag ", "hold");

        assert_eq!(command.trigger(), "bag hold");
        assert_eq!(command.parse("bag hold\ta lamp"), Some("a lamp"));
    }
}
