#[derive(thiserror::Error, Debug)]
pub enum PhoneticError {
    #[error("Malformed input: {0}")]
    Format(String),
    #[error(
        "Phoneme set '{0}' is not supported. Call NotationRegistry::names() to see available sets."
    )]
    UnsupportedNotation(String),
    #[error("Cannot find '{0}' in the dictionary")]
    NotFound(String),
    #[error("Too much recursion resolving entry '{entry}' (say-as depth {depth})")]
    RecursionLimit { entry: String, depth: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid phoneme set configuration: {0}")]
    Config(String),
}

impl PhoneticError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        PhoneticError::Format(msg.into())
    }
}
