//! Parsing of one line of interactive input.

/// What the user asked for on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Free-text question for the index and the model.
    Query(String),
    /// `/help`
    Help,
    /// `/raw`: show the context assembled for the previous query.
    Raw,
    /// `/exit` or `/quit`
    Exit,
}

impl SessionCommand {
    /// Parse a raw input line. Blank input yields `None`.
    ///
    /// Commands are matched case-insensitively after trimming; anything else
    /// is a query, including unknown slash-prefixed text.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let command = match trimmed.to_lowercase().as_str() {
            "/exit" | "/quit" => Self::Exit,
            "/help" => Self::Help,
            "/raw" => Self::Raw,
            _ => Self::Query(trimmed.to_string()),
        };
        Some(command)
    }
}
