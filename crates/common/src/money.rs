use serde::{Deserialize, Serialize};

/// Money amount in the smallest currency unit (cents) with an ISO-4217 code.
///
/// Amounts are never held as floating point. Formatting splits the minor
/// units with integer arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawMoney")]
pub struct Money {
    /// Amount in minor units (e.g., 1000 = 10.00).
    amount: i64,

    /// Uppercase ISO-4217 currency code.
    currency: String,
}

impl Money {
    /// Creates a money value, normalizing the currency code to uppercase.
    pub fn new(amount: i64, currency: impl AsRef<str>) -> Self {
        Self {
            amount,
            currency: currency.as_ref().to_uppercase(),
        }
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the whole-unit portion.
    pub fn major_units(&self) -> i64 {
        self.amount / 100
    }

    /// Returns the minor-unit remainder (always non-negative).
    pub fn minor_units(&self) -> i64 {
        self.amount.abs() % 100
    }

    /// Returns a human-readable amount such as `"100.50 USD"`.
    pub fn format_amount(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        format!(
            "{sign}{}.{:02} {}",
            self.major_units().abs(),
            self.minor_units(),
            self.currency
        )
    }
}

/// Wire form of [`Money`]; decoding goes through [`Money::new`].
#[derive(Deserialize)]
struct RawMoney {
    amount: i64,
    currency: String,
}

impl From<RawMoney> for Money {
    fn from(raw: RawMoney) -> Self {
        Money::new(raw.amount, raw.currency)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_amount())
    }
}
