use std::{
    fmt::{Debug, Display},
    iter::Sum,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Four fractional digits internally: money is rendered at two, but the
// discount percent must survive a currency<->percent round trip without drift.
const DECIMALS: u8 = 4;
const SCALE: i64 = 10_000;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(i64);

impl Decimal {
    pub fn int(value: i64) -> Decimal {
        Decimal(value * SCALE)
    }

    pub fn zero() -> Decimal {
        Decimal(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn inner(&self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Rounds to two fractional digits, half away from zero. Monetary
    /// aggregates are rounded once here, never per line.
    pub fn round2(self) -> Decimal {
        const STEP: i64 = 100;
        let rem = self.0 % STEP;
        if rem == 0 {
            return self;
        }
        let base = self.0 - rem;
        if rem.abs() * 2 >= STEP {
            Decimal(base + STEP * self.0.signum())
        } else {
            Decimal(base)
        }
    }

    /// Form inputs arrive as free text; anything that does not parse as a
    /// number counts as zero instead of failing the calculator.
    pub fn parse_or_zero(value: &str) -> Decimal {
        let normalized = value.trim().replace(',', ".");
        normalized.parse::<f64>().map(Decimal::from).unwrap_or_default()
    }
}

impl Debug for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0 as f64 / SCALE as f64;
        write!(f, "{:.2}", value)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0 as f64 / SCALE as f64;
        write!(f, "{:.2}", value)
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Decimal((value * SCALE as f64).round() as i64)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal::int(value as i64)
    }
}

impl TryFrom<&str> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let val = value.parse::<f64>().map_err(|_| ParseDecimalError)?;
        Ok(Decimal::from(val))
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::try_from(s)
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, other: Decimal) -> Decimal {
        Decimal(self.0 + other.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, other: Decimal) -> Decimal {
        Decimal(self.0 - other.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, other: Decimal) -> Decimal {
        Decimal((self.0 * other.0) / SCALE)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, other: Decimal) -> Decimal {
        Decimal((self.0 * SCALE) / other.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, other: Decimal) {
        self.0 += other.0;
    }
}

impl std::ops::SubAssign for Decimal {
    fn sub_assign(&mut self, other: Decimal) {
        self.0 -= other.0;
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}

#[derive(Debug)]
pub struct ParseDecimalError;

impl std::fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse decimal value")
    }
}

impl std::error::Error for ParseDecimalError {}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(Decimal(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!("150.00", format!("{}", Decimal::int(150)));
        assert_eq!("-150.00", format!("{}", Decimal::int(-150)));
        assert_eq!("0.00", format!("{}", Decimal::zero()));
        assert_eq!("12.34", format!("{}", Decimal::from(12.34)));
        assert_eq!("-12.34", format!("{}", Decimal::from(-12.34)));
    }

    #[test]
    fn test_arithmetic() {
        let a = Decimal::from(123.45);
        let b = Decimal::from(678.90);
        assert_eq!("802.35", format!("{}", a + b));
        assert_eq!("-555.45", format!("{}", a - b));

        let rate = Decimal::from(12.5);
        let total = Decimal::from(200.0);
        assert_eq!("25.00", format!("{}", total * rate / Decimal::int(100)));
    }

    #[test]
    fn test_keeps_four_digits() {
        // 20 / 200 * 100 must come back as exactly 10
        let percent = Decimal::from(20.0) / Decimal::from(200.0) * Decimal::int(100);
        assert_eq!(Decimal::int(10), percent);

        // 1 / 3 keeps four digits of the quotient
        let third = Decimal::int(1) / Decimal::int(3);
        assert_eq!(3333, third.inner());
    }

    #[test]
    fn test_round2() {
        assert_eq!(Decimal::from(785.40), Decimal::from(785.3981).round2());
        assert_eq!(Decimal::from(785.39), Decimal::from(785.3949).round2());
        assert_eq!(Decimal::from(-785.40), Decimal::from(-785.3981).round2());
        assert_eq!(Decimal::from(1.01), Decimal::from(1.005).round2());
        assert_eq!(Decimal::from(200.0), Decimal::from(200.0).round2());
    }

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(Decimal::from(10.5), Decimal::parse_or_zero("10.5"));
        assert_eq!(Decimal::from(10.5), Decimal::parse_or_zero(" 10,5 "));
        assert_eq!(Decimal::zero(), Decimal::parse_or_zero(""));
        assert_eq!(Decimal::zero(), Decimal::parse_or_zero("abc"));
        assert_eq!(Decimal::from(-3.0), Decimal::parse_or_zero("-3"));
    }

    #[test]
    fn test_sum_and_sign() {
        let sum: Decimal = [Decimal::int(1), Decimal::int(2), Decimal::int(-5)]
            .into_iter()
            .sum();
        assert_eq!(Decimal::int(-2), sum);
        assert!(sum.is_negative());
        assert!(!sum.is_positive());
        assert!(Decimal::zero().is_zero());
    }
}
