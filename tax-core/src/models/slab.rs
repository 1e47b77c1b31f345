use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// One income range taxed at a single marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slab {
    pub lower: Decimal,
    /// `None` for the open-ended top slab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl Slab {
    pub fn bounded(
        lower: Decimal,
        upper: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower,
            upper: Some(upper),
            rate,
        }
    }

    pub fn unbounded(
        lower: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower,
            upper: None,
            rate,
        }
    }
}

/// A progressive marginal-rate schedule.
///
/// Construction enforces the table invariants: starts at zero, contiguous,
/// strictly increasing bounds, non-decreasing rates in [0, 1], and an
/// unbounded last slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Slab>", into = "Vec<Slab>")]
pub struct SlabTable {
    slabs: Vec<Slab>,
}

impl SlabTable {
    pub fn new(slabs: Vec<Slab>) -> Result<Self, RulesError> {
        let table = Self { slabs };
        table.validate()?;
        Ok(table)
    }

    /// Builds a table the caller knows to be valid. Used for the built-in
    /// rule sets, which are checked by tests instead.
    pub(crate) fn from_slabs(slabs: Vec<Slab>) -> Self {
        Self { slabs }
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Income up to which the first slab applies (the basic exemption limit
    /// when that slab's rate is zero).
    pub fn first_upper(&self) -> Option<Decimal> {
        self.slabs.first().and_then(|slab| slab.upper)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        let first = self.slabs.first().ok_or(RulesError::EmptySlabTable)?;
        if !first.lower.is_zero() {
            return Err(RulesError::FirstSlabNotZero(first.lower));
        }

        let mut previous: Option<&Slab> = None;
        for slab in &self.slabs {
            if slab.rate.is_sign_negative() || slab.rate > Decimal::ONE {
                return Err(RulesError::RateOutOfRange {
                    what: "slab rate",
                    rate: slab.rate,
                });
            }
            if let Some(upper) = slab.upper {
                if upper <= slab.lower {
                    return Err(RulesError::EmptySlab {
                        lower: slab.lower,
                        upper,
                    });
                }
            }
            if let Some(prev) = previous {
                let previous_upper = prev
                    .upper
                    .ok_or(RulesError::UnboundedSlabNotLast(prev.lower))?;
                if previous_upper != slab.lower {
                    return Err(RulesError::NonContiguousSlabs {
                        previous_upper,
                        lower: slab.lower,
                    });
                }
                if slab.rate < prev.rate {
                    return Err(RulesError::DecreasingRate {
                        lower: slab.lower,
                        rate: slab.rate,
                        previous_rate: prev.rate,
                    });
                }
            }
            previous = Some(slab);
        }

        match previous.and_then(|last| last.upper) {
            Some(upper) => Err(RulesError::LastSlabBounded(upper)),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<Slab>> for SlabTable {
    type Error = RulesError;

    fn try_from(slabs: Vec<Slab>) -> Result<Self, Self::Error> {
        Self::new(slabs)
    }
}

impl From<SlabTable> for Vec<Slab> {
    fn from(table: SlabTable) -> Self {
        table.slabs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn valid_slabs() -> Vec<Slab> {
        vec![
            Slab::bounded(dec!(0), dec!(250000), dec!(0)),
            Slab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
            Slab::unbounded(dec!(500000), dec!(0.20)),
        ]
    }

    #[test]
    fn new_accepts_valid_table() {
        let table = SlabTable::new(valid_slabs()).unwrap();

        assert_eq!(table.slabs().len(), 3);
        assert_eq!(table.first_upper(), Some(dec!(250000)));
    }

    #[test]
    fn new_rejects_empty_table() {
        assert_eq!(SlabTable::new(vec![]), Err(RulesError::EmptySlabTable));
    }

    #[test]
    fn new_rejects_nonzero_start() {
        let mut slabs = valid_slabs();
        slabs[0].lower = dec!(100);

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::FirstSlabNotZero(dec!(100)))
        );
    }

    #[test]
    fn new_rejects_gap_between_slabs() {
        let mut slabs = valid_slabs();
        slabs[1].lower = dec!(260000);

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::NonContiguousSlabs {
                previous_upper: dec!(250000),
                lower: dec!(260000),
            })
        );
    }

    #[test]
    fn new_rejects_decreasing_rate() {
        let mut slabs = valid_slabs();
        slabs[2].rate = dec!(0.01);

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::DecreasingRate {
                lower: dec!(500000),
                rate: dec!(0.01),
                previous_rate: dec!(0.05),
            })
        );
    }

    #[test]
    fn new_rejects_bounded_last_slab() {
        let mut slabs = valid_slabs();
        slabs[2].upper = Some(dec!(1000000));

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::LastSlabBounded(dec!(1000000)))
        );
    }

    #[test]
    fn new_rejects_unbounded_slab_in_the_middle() {
        let mut slabs = valid_slabs();
        slabs[1].upper = None;

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::UnboundedSlabNotLast(dec!(250000)))
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let mut slabs = valid_slabs();
        slabs[2].rate = dec!(1.5);

        assert_eq!(
            SlabTable::new(slabs),
            Err(RulesError::RateOutOfRange {
                what: "slab rate",
                rate: dec!(1.5),
            })
        );
    }
}
