use std::fmt;

pub const ACCOUNT_NUMBER_LEN: usize = 10;
pub const MIN_TRANSACTION_AMOUNT: i64 = 1;
pub const MAX_TRANSACTION_AMOUNT: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_account_number(account_number: &str) -> ValidationResult {
    if account_number.len() != ACCOUNT_NUMBER_LEN
        || !account_number.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(ValidationError::new(
            "account_number",
            format!("must be exactly {} digits", ACCOUNT_NUMBER_LEN),
        ));
    }

    Ok(())
}

pub fn validate_amount(amount: i64) -> ValidationResult {
    if !(MIN_TRANSACTION_AMOUNT..=MAX_TRANSACTION_AMOUNT).contains(&amount) {
        return Err(ValidationError::new(
            "amount",
            format!(
                "must be between {} and {}",
                MIN_TRANSACTION_AMOUNT, MAX_TRANSACTION_AMOUNT
            ),
        ));
    }

    Ok(())
}

pub fn validate_initial_balance(initial_balance: i64) -> ValidationResult {
    if initial_balance < 0 {
        return Err(ValidationError::new(
            "initial_balance",
            "must not be negative",
        ));
    }

    Ok(())
}
