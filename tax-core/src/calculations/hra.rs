//! House rent allowance exemption.
//!
//! The exempt portion is the least of the HRA actually received, rent paid
//! in excess of 10% of basic salary, and 50% (metro) or 40% (non-metro) of
//! basic salary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::{floor_at_zero, round_to_rupee};

/// Share of gross salary assumed to be basic when the caller does not say.
pub const DEFAULT_BASIC_SHARE: Decimal = dec!(0.50);

const RENT_OFFSET_SHARE: Decimal = dec!(0.10);
const METRO_SHARE: Decimal = dec!(0.50);
const NON_METRO_SHARE: Decimal = dec!(0.40);

/// Annual figures for the HRA computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HraInput {
    pub annual_rent: Decimal,
    pub basic_salary: Decimal,
    /// HRA component of the salary, when known. Unknown means it does not
    /// limit the exemption.
    pub hra_received: Option<Decimal>,
    pub metro: bool,
}

pub fn default_basic_salary(gross_salary: Decimal) -> Decimal {
    round_to_rupee(gross_salary * DEFAULT_BASIC_SHARE)
}

/// Exempt HRA, never negative.
pub fn exempt_hra(input: &HraInput) -> Decimal {
    let rent_excess = input.annual_rent - input.basic_salary * RENT_OFFSET_SHARE;
    let share = if input.metro {
        METRO_SHARE
    } else {
        NON_METRO_SHARE
    };
    let salary_limit = input.basic_salary * share;

    let mut exempt = rent_excess.min(salary_limit);
    if let Some(received) = input.hra_received {
        exempt = exempt.min(received);
    }
    round_to_rupee(floor_at_zero(exempt))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn input(
        rent: Decimal,
        basic: Decimal,
    ) -> HraInput {
        HraInput {
            annual_rent: rent,
            basic_salary: basic,
            hra_received: None,
            metro: false,
        }
    }

    #[test]
    fn rent_excess_is_the_limit() {
        assert_eq!(exempt_hra(&input(dec!(240000), dec!(600000))), dec!(180000));
    }

    #[test]
    fn salary_share_is_the_limit() {
        // Non-metro cap: 40% of 3,00,000.
        assert_eq!(exempt_hra(&input(dec!(300000), dec!(300000))), dec!(120000));
    }

    #[test]
    fn metro_raises_salary_share() {
        let mut hra = input(dec!(300000), dec!(300000));
        hra.metro = true;

        assert_eq!(exempt_hra(&hra), dec!(150000));
    }

    #[test]
    fn hra_received_caps_exemption() {
        let mut hra = input(dec!(240000), dec!(600000));
        hra.hra_received = Some(dec!(96000));

        assert_eq!(exempt_hra(&hra), dec!(96000));
    }

    #[test]
    fn low_rent_gives_zero() {
        assert_eq!(exempt_hra(&input(dec!(30000), dec!(600000))), dec!(0));
    }

    #[test]
    fn default_basic_is_half_of_gross() {
        assert_eq!(default_basic_salary(dec!(1200000)), dec!(600000));
    }
}
