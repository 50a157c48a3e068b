use crate::account::Account;
use crate::error::StorageError;
use csv::{QuoteStyle, StringRecord};
use rust_decimal::Decimal;
use std::{
    fs::File,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const FIELDS: usize = 3;

/// The flat file behind the bank: one space separated account per line.
#[derive(Debug)]
pub struct AccountFile {
    path: PathBuf,
}

impl AccountFile {
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every account in file order. A missing file is created empty.
    pub fn load(&self) -> Result<Vec<Account>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                File::create(&self.path)?;
                debug!(path = %self.path.display(), "created empty accounts file");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // Passwords are written verbatim, so quotes carry no meaning here.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut accounts = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let record = match StringRecord::from_byte_record(record) {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "skipping account line that is not UTF-8");
                    continue;
                }
            };

            match split_line(&record).deserialize::<Account>(None) {
                Ok(account) => accounts.push(account),
                Err(e) => warn!(line, error = %e, "skipping malformed account line"),
            }
        }

        debug!(count = accounts.len(), path = %self.path.display(), "loaded accounts");
        Ok(accounts)
    }

    /// Replaces the whole file with `accounts`. The records go to a temporary
    /// file next to the target which is then renamed over it.
    pub fn save(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(NamedTempFile::new_in(dir)?);

        for account in accounts {
            wtr.serialize(account)?;
        }

        let file = wtr.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        debug!(count = accounts.len(), path = %self.path.display(), "saved accounts");
        Ok(())
    }
}

/// Turns one line into `[number, password, balance]`.
///
/// Saved lines are `<number> <password> <balance>` with the password written
/// as is, so the first and last fields are the number and balance and
/// everything between them, spaces included, is the password. Anything else
/// falls back to the first three words of the line.
fn split_line(record: &StringRecord) -> StringRecord {
    let fields: Vec<&str> = record.iter().collect();

    if let [number, password @ .., balance] = fields.as_slice() {
        let password = password.join(" ");
        if !number.is_empty() && !password.is_empty() && balance.parse::<Decimal>().is_ok() {
            return StringRecord::from(vec![*number, password.as_str(), *balance]);
        }
    }

    // Repeated or leading spaces show up as empty fields.
    fields
        .into_iter()
        .filter(|field| !field.is_empty())
        .take(FIELDS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, str::FromStr};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn account(account_number: &str, password: &str, balance: &str) -> Account {
        let mut account = Account::new(account_number, password);
        assert!(account.deposit(dec(balance)));
        account
    }

    #[test]
    fn missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let file = AccountFile::new(&path);

        assert_eq!(file.load().unwrap(), Vec::new());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn save_writes_one_line_per_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let file = AccountFile::new(&path);

        file.save(&[
            account("123456", "secret1", "100.0"),
            account("654321", "hunter22", "0.25"),
        ])
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "123456 secret1 100.0\n654321 hunter22 0.25\n"
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = AccountFile::new(dir.path().join("accounts.txt"));
        let accounts = vec![
            account("123456", "secret1", "100.0"),
            account("000001", "pass word", "12.3456789"),
            account("999999", "quo\"ted", "0"),
        ];

        file.save(&accounts).unwrap();

        assert_eq!(file.load().unwrap(), accounts);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let file = AccountFile::new(&path);

        file.save(&[
            account("123456", "secret1", "1"),
            account("654321", "secret2", "2"),
        ])
        .unwrap();
        file.save(&[account("654321", "secret2", "2")]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "654321 secret2 2\n");
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = AccountFile::new(dir.path().join("accounts.txt"));

        file.save(&[account("123456", "secret1", "1")]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn loads_fixed_point_balances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "123456 secret1 100.000000\n654321 secret2 50.500000\n").unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(
            accounts,
            vec![
                account("123456", "secret1", "100"),
                account("654321", "secret2", "50.5"),
            ]
        );
    }

    #[test]
    fn whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "  123456   secret1  7.5\n").unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(accounts, vec![account("123456", "secret1", "7.5")]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "123456 secret1 7.5 trailing junk\n").unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(accounts, vec![account("123456", "secret1", "7.5")]);
    }

    #[test]
    fn some_junk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(
            &path,
            "123456 secret1 1.5\nonly-one-field\n222222 secret2\n333333 secret3 lots\n444444 secret4 4\n",
        )
        .unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(
            accounts,
            vec![
                account("123456", "secret1", "1.5"),
                account("444444", "secret4", "4"),
            ]
        );
    }

    #[test]
    fn loaded_records_are_not_revalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "12a short 3\n").unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(accounts, vec![account("12a", "short", "3")]);
    }

    #[test]
    fn quote_in_password_does_not_swallow_later_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(
            &path,
            "111111 \"secret 1.000000\n222222 secret2 2.000000\n333333 secret3 3.000000\n",
        )
        .unwrap();
        let file = AccountFile::new(&path);

        let accounts = file.load().unwrap();

        assert_eq!(
            accounts,
            vec![
                account("111111", "\"secret", "1"),
                account("222222", "secret2", "2"),
                account("333333", "secret3", "3"),
            ]
        );

        file.save(&accounts).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "111111 \"secret 1.000000\n222222 secret2 2.000000\n333333 secret3 3.000000\n"
        );
    }

    #[test]
    fn passwords_keep_their_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let file = AccountFile::new(&path);
        let accounts = vec![
            account("111111", " leading", "1"),
            account("222222", "trailing ", "2"),
            account("333333", "two  spaces", "3"),
            account("444444", "12 34 56", "4"),
        ];

        file.save(&accounts).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "111111  leading 1\n222222 trailing  2\n333333 two  spaces 3\n444444 12 34 56 4\n"
        );
        assert_eq!(file.load().unwrap(), accounts);
    }

    #[test]
    fn line_that_is_not_utf8_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, b"123456 secret1 1\n\xff\xfe bad 2\n654321 secret2 3\n").unwrap();

        let accounts = AccountFile::new(&path).load().unwrap();

        assert_eq!(
            accounts,
            vec![
                account("123456", "secret1", "1"),
                account("654321", "secret2", "3"),
            ]
        );
    }
}
