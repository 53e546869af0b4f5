//! Rupee amounts.

use serde::{Deserialize, Serialize};

/// An amount in Indian rupees, stored as whole paise.
///
/// Serialized as the integer number of paise. Displayed with two decimals and
/// a `₹` prefix in both storefront languages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    paise: i64,
}

impl Money {
    pub fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees.saturating_mul(100),
        }
    }

    pub fn zero() -> Self {
        Self { paise: 0 }
    }

    pub fn paise(&self) -> i64 {
        self.paise
    }

    pub fn is_positive(&self) -> bool {
        self.paise > 0
    }

    pub fn is_negative(&self) -> bool {
        self.paise < 0
    }

    /// Price of `quantity` units at this unit price, saturating at the
    /// representable range.
    pub fn multiply(&self, quantity: u32) -> Self {
        Self {
            paise: self.paise.saturating_mul(i64::from(quantity)),
        }
    }

    pub fn checked_multiply(&self, quantity: u32) -> Option<Self> {
        self.paise
            .checked_mul(i64::from(quantity))
            .map(Self::from_paise)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.paise.checked_add(other.paise).map(Self::from_paise)
    }

    /// Sum of `amounts`, or `None` if it leaves the representable range.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, m| acc.checked_add(m))
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            paise: self.paise.saturating_add(other.paise),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.paise = self.paise.saturating_add(other.paise);
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            paise: self.paise.saturating_sub(other.paise),
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.paise < 0 { "-" } else { "" };
        let abs = self.paise.unsigned_abs();
        write!(f, "{sign}₹{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_rupee_prefix_and_two_decimals() {
        assert_eq!(Money::from_rupees(240).to_string(), "₹240.00");
        assert_eq!(Money::from_paise(12_345).to_string(), "₹123.45");
        assert_eq!(Money::from_paise(5).to_string(), "₹0.05");
        assert_eq!(Money::from_paise(-250).to_string(), "-₹2.50");
    }

    #[test]
    fn multiply_by_quantity() {
        assert_eq!(Money::from_rupees(120).multiply(2), Money::from_rupees(240));
        assert_eq!(Money::from_rupees(120).multiply(0), Money::zero());
    }

    #[test]
    fn sum_of_amounts() {
        let total: Money = [Money::from_rupees(100), Money::from_paise(50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_paise(10_050));
    }

    #[test]
    fn overflow_is_reported_by_checked_ops() {
        let huge = Money::from_paise(i64::MAX / 2);

        assert_eq!(huge.checked_multiply(3), None);
        let almost_max = huge.checked_add(huge).unwrap();
        assert_eq!(almost_max.checked_add(huge), None);
        assert_eq!(Money::checked_sum([huge, huge, huge]), None);
        assert_eq!(
            Money::checked_sum([Money::from_rupees(1), Money::from_rupees(2)]),
            Some(Money::from_rupees(3))
        );
    }

    #[test]
    fn plain_arithmetic_saturates_instead_of_panicking() {
        let huge = Money::from_paise(i64::MAX);

        assert_eq!(huge.multiply(u32::MAX), huge);
        assert_eq!(huge + Money::from_rupees(1), huge);
        let total: Money = [huge, huge].into_iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn serializes_as_paise() {
        assert_eq!(serde_json::to_string(&Money::from_rupees(230)).unwrap(), "23000");
        let m: Money = serde_json::from_str("12000").unwrap();
        assert_eq!(m, Money::from_rupees(120));
    }
}
