use std::fmt;

/// Non-negative amount of money in minor currency units (cents).
///
/// Used for balances, prices and coin denominations alike. Negative money
/// does not exist in this machine, so subtraction is only exposed through
/// [`Cents::checked_sub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Cents(u64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(value: u64) -> Self {
        Cents(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self - rhs`, or `None` if the result would be negative.
    pub fn checked_sub(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_sub(rhs.0).map(Cents)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        write!(f, "{whole}.{frac:02}")
    }
}

impl std::ops::Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Cents(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Cents {
    /// Panics if the result would be negative; callers guard with
    /// [`Cents::checked_sub`] or an explicit comparison first.
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_preserves_value() {
        assert_eq!(Cents::new(125).value(), 125);
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Cents::default(), Cents::ZERO);
        assert!(Cents::default().is_zero());
    }

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Cents::new(125).to_string(), "1.25");
        assert_eq!(Cents::new(5).to_string(), "0.05");
        assert_eq!(Cents::new(0).to_string(), "0.00");
        assert_eq!(Cents::new(10_000).to_string(), "100.00");
    }

    #[test]
    fn add() {
        assert_eq!(Cents::new(100) + Cents::new(25), Cents::new(125));
    }

    #[test]
    fn add_assign() {
        let mut c = Cents::new(100);
        c += Cents::new(50);
        assert_eq!(c, Cents::new(150));
    }

    #[test]
    fn sub_assign() {
        let mut c = Cents::new(100);
        c -= Cents::new(30);
        assert_eq!(c, Cents::new(70));
    }

    #[test]
    fn checked_sub_underflow_is_none() {
        assert_eq!(Cents::new(30).checked_sub(Cents::new(100)), None);
        assert_eq!(
            Cents::new(100).checked_sub(Cents::new(30)),
            Some(Cents::new(70))
        );
    }

    #[test]
    fn ordering() {
        assert!(Cents::new(5) < Cents::new(10));
        assert!(Cents::new(25) > Cents::new(10));
    }

    #[test]
    fn sum() {
        let total: Cents = [Cents::new(25), Cents::new(10), Cents::new(5)]
            .into_iter()
            .sum();
        assert_eq!(total, Cents::new(40));
    }
}
