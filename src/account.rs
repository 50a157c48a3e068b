use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the accounts file: `<account number> <password> <balance>`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    account_number: String,
    password: String,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
}

impl Account {
    pub fn new(account_number: &str, password: &str) -> Self {
        Self {
            account_number: account_number.to_owned(),
            password: password.to_owned(),
            balance: Decimal::ZERO,
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns false, leaving the balance alone, if the sum would overflow.
    pub fn deposit(&mut self, amount: Decimal) -> bool {
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// All or nothing: returns false and leaves the balance alone when the
    /// account can't cover `amount`.
    pub fn withdraw(&mut self, amount: Decimal) -> bool {
        match self.balance.checked_sub(amount) {
            Some(balance) if amount <= self.balance => {
                self.balance = balance;
                true
            }
            _ => false,
        }
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_owned();
    }

    pub(crate) fn matches(&self, account_number: &str, password: &str) -> bool {
        self.account_number == account_number && self.password == password
    }
}
