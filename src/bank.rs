use crate::account::Account;
use crate::error::{BankError, StorageError};
use crate::storage::AccountFile;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{info, warn};

const ACCOUNT_NUMBER_LEN: usize = 6;
const MIN_PASSWORD_LEN: usize = 6;

/// All accounts, in creation order, and the file they are kept in. Every
/// successful change rewrites the file.
pub struct Bank {
    accounts: Vec<Account>,
    file: AccountFile,
}

impl Bank {
    pub fn open<P>(path: P) -> Result<Self, StorageError>
    where
        P: AsRef<Path>,
    {
        let file = AccountFile::new(path);
        let accounts = file.load()?;

        Ok(Self { accounts, file })
    }

    /// Exactly six ASCII digits.
    pub fn is_valid_account_number(account_number: &str) -> bool {
        account_number.len() == ACCOUNT_NUMBER_LEN
            && account_number.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_valid_password(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LEN
    }

    pub fn account_exists(&self, account_number: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| account.account_number() == account_number)
    }

    pub fn add_account(&mut self, account_number: &str, password: &str) -> Result<(), BankError> {
        if !Self::is_valid_account_number(account_number) {
            return Err(BankError::InvalidAccountNumber);
        }
        if !Self::is_valid_password(password) {
            return Err(BankError::InvalidPassword);
        }
        if self.account_exists(account_number) {
            return Err(BankError::DuplicateAccount);
        }

        let previous = self.accounts.clone();
        self.accounts.push(Account::new(account_number, password));
        self.commit(previous)?;

        info!(account = account_number, "account created");
        Ok(())
    }

    pub fn find_account(&self, account_number: &str, password: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.matches(account_number, password))
    }

    pub fn view_account(&self, account_number: &str) -> Result<&Account, BankError> {
        self.accounts
            .iter()
            .find(|account| account.account_number() == account_number)
            .ok_or(BankError::NotFound)
    }

    /// Deposits need only the account number. Returns the new balance.
    pub fn deposit_amount(
        &mut self,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }

        let previous = self.accounts.clone();
        let account = self
            .accounts
            .iter_mut()
            .find(|account| account.account_number() == account_number)
            .ok_or(BankError::NotFound)?;
        if !account.deposit(amount) {
            return Err(BankError::BalanceOverflow);
        }
        let balance = account.balance();

        self.commit(previous)?;

        info!(account = account_number, %amount, %balance, "deposit");
        Ok(balance)
    }

    /// Returns the new balance. Wrong credentials and insufficient funds are
    /// reported the same way.
    pub fn withdraw_amount(
        &mut self,
        account_number: &str,
        password: &str,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }

        let previous = self.accounts.clone();
        let balance = self
            .find_account_mut(account_number, password)
            .and_then(|account| account.withdraw(amount).then_some(account.balance()))
            .ok_or(BankError::InsufficientBalanceOrNotFound)?;

        self.commit(previous)?;

        info!(account = account_number, %amount, %balance, "withdrawal");
        Ok(balance)
    }

    pub fn view_all_accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Removes every account matching both fields. Returns how many went.
    pub fn close_account(
        &mut self,
        account_number: &str,
        password: &str,
    ) -> Result<usize, BankError> {
        let previous = self.accounts.clone();
        self.accounts
            .retain(|account| !account.matches(account_number, password));
        let removed = previous.len() - self.accounts.len();

        if removed == 0 {
            return Err(BankError::NotFoundOrIncorrectPassword);
        }

        self.commit(previous)?;

        info!(account = account_number, "account closed");
        Ok(removed)
    }

    pub fn modify_account(
        &mut self,
        account_number: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), BankError> {
        if !Self::is_valid_password(new_password) {
            return Err(BankError::InvalidNewPassword);
        }

        let previous = self.accounts.clone();
        self.find_account_mut(account_number, old_password)
            .ok_or(BankError::NotFoundOrIncorrectPassword)?
            .set_password(new_password);

        self.commit(previous)?;

        info!(account = account_number, "password changed");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn find_account_mut(
        &mut self,
        account_number: &str,
        password: &str,
    ) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.matches(account_number, password))
    }

    /// Writes the accounts out, putting `previous` back if the write fails.
    fn commit(&mut self, previous: Vec<Account>) -> Result<(), StorageError> {
        if let Err(e) = self.save() {
            self.accounts = previous;
            return Err(e);
        }

        Ok(())
    }

    fn save(&self) -> Result<(), StorageError> {
        self.file.save(&self.accounts).map_err(|e| {
            warn!(path = %self.file.path().display(), error = %e, "failed to save accounts");
            e
        })
    }
}
