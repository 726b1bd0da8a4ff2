use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies a financial report can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Chinese Yuan Renminbi
    #[default]
    CNY,
    /// US Dollar
    USD,
}

impl Currency {
    /// Display precision for report figures
    pub const SCALE: u32 = 2;

    /// Symbol prefixed to formatted amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CNY => "¥",
            Currency::USD => "$",
        }
    }

    /// Rounds half-up (away from zero) to two decimal places
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Formats an amount as `<symbol><grouped integer>.<2 decimals>`,
    /// e.g. `¥1,234,567.80`. A negative sign goes after the symbol.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = self.round(amount);
        let digits = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!("{}{}{}.{}", self.symbol(), sign, grouped, frac_part)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::CNY => write!(f, "CNY"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CNY" | "RMB" => Ok(Currency::CNY),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
