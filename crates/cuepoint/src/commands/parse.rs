//! Command line splitting.
//!
//! The grammar is deliberately small: the first whitespace-delimited token
//! is the command name and the trimmed remainder is opaque argument text.
//! There is no quoting or escaping.

/// Split a command line into `(name, arguments)`.
pub fn split_command(input: &str) -> (String, String) {
    let trimmed = input.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Split `:alias` arguments into the alias name and its expansion text.
pub fn split_alias_definition(args: &str) -> Option<(&str, &str)> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((name, expansion)) => Some((name, expansion.trim())),
        None => Some((trimmed, "")),
    }
}

/// Strip a leading `:` and surrounding whitespace from a startup line.
///
/// Returns `None` for blank lines and `"` comments.
pub fn startup_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('"') {
        return None;
    }
    let without_colon = trimmed.strip_prefix(':').unwrap_or(trimmed).trim();
    if without_colon.is_empty() {
        None
    } else {
        Some(without_colon)
    }
}

#[cfg(test)]
mod tests {
    use super::{split_alias_definition, split_command, startup_line};

    #[test]
    fn split_takes_first_token_and_trims_rest() {
        assert_eq!(
            split_command("set   polling=true  "),
            ("set".to_string(), "polling=true".to_string())
        );
        assert_eq!(
            split_command("  mpc add a b\tc "),
            ("mpc".to_string(), "add a b\tc".to_string())
        );
    }

    #[test]
    fn split_without_arguments() {
        assert_eq!(split_command("quit"), ("quit".to_string(), String::new()));
    }

    #[test]
    fn split_empty_input_yields_empty_name() {
        assert_eq!(split_command(""), (String::new(), String::new()));
        assert_eq!(split_command("   "), (String::new(), String::new()));
    }

    #[test]
    fn alias_definition_keeps_expansion_text() {
        assert_eq!(
            split_alias_definition("np  mpc current --format %title%"),
            Some(("np", "mpc current --format %title%"))
        );
        assert_eq!(split_alias_definition("np"), Some(("np", "")));
        assert_eq!(split_alias_definition("  "), None);
    }

    #[test]
    fn startup_lines_skip_comments_and_colons() {
        assert_eq!(startup_line(":set nopolling"), Some("set nopolling"));
        assert_eq!(startup_line("  connect localhost"), Some("connect localhost"));
        assert_eq!(startup_line("\" a comment"), None);
        assert_eq!(startup_line("   "), None);
        assert_eq!(startup_line(":"), None);
    }
}
