use std::path::PathBuf;

pub const DEFAULT_ACCOUNTS_FILE: &str = "accounts.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub accounts_file: PathBuf,
}

impl Config {
    /// `args` excludes the program name. The first argument, if any, is the
    /// accounts file.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let accounts_file = args
            .into_iter()
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ACCOUNTS_FILE));

        Self { accounts_file }
    }
}
