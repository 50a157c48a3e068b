use crate::bank::Bank;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    io::{self, BufRead, Write},
    ops::ControlFlow,
    str::FromStr,
};

const BANNER: &str = "******************************";

type Step = io::Result<ControlFlow<()>>;

/// The numbered menu, reading one answer per line from `input`.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R, W> Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks "Exit" or the input ends.
    pub fn run(&mut self, bank: &mut Bank) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let Some(line) = self.prompt("Enter your choice (1-8): ")? else {
                return Ok(());
            };

            let choice = match line.trim().parse::<i64>() {
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(self.output, "Invalid input. Please enter a number.")?;
                    continue;
                }
            };

            let step = match choice {
                1 => self.add_account(bank)?,
                2 => self.view_account(bank)?,
                3 => self.deposit(bank)?,
                4 => self.withdraw(bank)?,
                5 => self.view_all_accounts(bank)?,
                6 => self.close_account(bank)?,
                7 => self.modify_account(bank)?,
                8 => {
                    writeln!(self.output, "Thank you for banking with us!")?;
                    ControlFlow::Break(())
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    ControlFlow::Continue(())
                }
            };

            if step.is_break() {
                self.output.flush()?;
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{BANNER}")?;
        writeln!(self.output, "Bank Account Management System")?;
        writeln!(self.output, "{BANNER}")?;
        writeln!(self.output, "1. Add New Account")?;
        writeln!(self.output, "2. View Account")?;
        writeln!(self.output, "3. Deposit Amount")?;
        writeln!(self.output, "4. Withdraw Amount")?;
        writeln!(self.output, "5. View All Accounts")?;
        writeln!(self.output, "6. Close An Account")?;
        writeln!(self.output, "7. Modify An Account")?;
        writeln!(self.output, "8. Exit")?;
        writeln!(self.output, "{BANNER}")
    }

    fn add_account(&mut self, bank: &mut Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number (6 digits): ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(password) = self.prompt("Enter Password (min 6 characters): ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match bank.add_account(&account_number, &password) {
            Ok(()) => writeln!(self.output, "Account created successfully!")?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    fn view_account(&mut self, bank: &Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match bank.view_account(&account_number) {
            Ok(account) => writeln!(
                self.output,
                "Account No: {}, Balance: ${}",
                account.account_number(),
                money(account.balance())
            )?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    fn deposit(&mut self, bank: &mut Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(amount) = self.prompt("Enter Deposit Amount: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(amount) = self.amount(&amount)? else {
            return Ok(ControlFlow::Continue(()));
        };

        match bank.deposit_amount(&account_number, amount) {
            Ok(balance) => writeln!(
                self.output,
                "Deposit successful! New balance: ${}",
                money(balance)
            )?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    fn withdraw(&mut self, bank: &mut Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(password) = self.prompt("Enter Password: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(amount) = self.prompt("Enter Withdraw Amount: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(amount) = self.amount(&amount)? else {
            return Ok(ControlFlow::Continue(()));
        };

        match bank.withdraw_amount(&account_number, &password, amount) {
            Ok(balance) => writeln!(
                self.output,
                "Withdrawal successful! New balance: ${}",
                money(balance)
            )?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    fn view_all_accounts(&mut self, bank: &Bank) -> Step {
        let accounts = bank.view_all_accounts();

        if accounts.is_empty() {
            writeln!(self.output, "No accounts exist.")?;
        }

        for account in accounts {
            writeln!(
                self.output,
                "Account No: {}, Balance: ${}",
                account.account_number(),
                money(account.balance())
            )?;
        }

        Ok(ControlFlow::Continue(()))
    }

    fn close_account(&mut self, bank: &mut Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(password) = self.prompt("Enter Password: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match bank.close_account(&account_number, &password) {
            Ok(_) => writeln!(self.output, "Account closed successfully.")?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    fn modify_account(&mut self, bank: &mut Bank) -> Step {
        let Some(account_number) = self.prompt("Enter Account Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(old_password) = self.prompt("Enter Old Password: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(new_password) = self.prompt("Enter New Password: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match bank.modify_account(&account_number, &old_password, &new_password) {
            Ok(()) => writeln!(self.output, "Password changed successfully.")?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Writes `prompt` and reads the answer without its line ending. `None`
    /// once the input is exhausted. Bytes that aren't UTF-8 become U+FFFD.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&line);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn amount(&mut self, input: &str) -> io::Result<Option<Decimal>> {
        match Decimal::from_str(input.trim()) {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "Invalid amount entered.")?;
                Ok(None)
            }
        }
    }
}

fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
