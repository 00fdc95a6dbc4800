#![warn(clippy::all, clippy::pedantic)]

/// Split a raw query into its command and argument string.
///
/// The whole input is trimmed, the command is everything up to the first run
/// of whitespace (lowercased) and the arguments are the rest, trimmed but
/// otherwise untouched.
///
/// ```
/// use froglol::parse_query;
///
/// assert_eq!(parse_query("GOOGLE Rust  Book"), ("google".to_string(), "Rust  Book".to_string()));
/// assert_eq!(parse_query("   "), (String::new(), String::new()));
/// ```
#[must_use]
pub fn parse_query(raw: &str) -> (String, String) {
    let trimmed = raw.trim();

    match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), rest.trim().to_string()),
        None => (trimmed.to_lowercase(), String::new()),
    }
}
