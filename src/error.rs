use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not replace accounts file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Every way a bank operation can be refused. The `Display` text is what the
/// menu shows the user.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Invalid account number. Must be 6 digits.")]
    InvalidAccountNumber,

    #[error("Invalid password. Must be at least 6 characters.")]
    InvalidPassword,

    #[error("Invalid new password. Must be at least 6 characters.")]
    InvalidNewPassword,

    #[error("Account number already exists.")]
    DuplicateAccount,

    #[error("Account not found.")]
    NotFound,

    #[error("Invalid amount. Must be greater than 0.")]
    InvalidAmount,

    #[error("Invalid amount. Balance would exceed the maximum.")]
    BalanceOverflow,

    // Covers both wrong credentials and a short balance.
    #[error("Insufficient balance or account not found.")]
    InsufficientBalanceOrNotFound,

    #[error("Account not found or incorrect password.")]
    NotFoundOrIncorrectPassword,

    #[error("Failed to save accounts: {0}")]
    Storage(#[from] StorageError),
}
