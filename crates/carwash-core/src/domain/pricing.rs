//! Billing arithmetic. Every total the system persists is computed here.
//!
//! Parking time is billed in whole fractions of the tariff, rounded up, with
//! one fraction as the minimum charge:
//!
//! ```text
//! billable = max(f, ceil(hours / f) * f)
//! total    = billable * hourly_rate
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    DomainError,
    entities::{ParkingTariff, ServiceSnapshot},
};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Hours charged for a stay, already rounded to the tariff's fraction.
pub fn billable_hours(
    tariff: &ParkingTariff,
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
) -> Result<Decimal, DomainError> {
    let fraction = tariff.fraction;
    if fraction <= Decimal::ZERO {
        return Err(DomainError::InvalidTariff {
            reason: format!(
                "tariff {} has non-positive fraction {fraction}",
                tariff.id
            ),
        });
    }

    let elapsed = exit - entry;
    if elapsed <= chrono::TimeDelta::zero() {
        return Err(DomainError::InvalidDuration { entry, exit });
    }

    let hours = Decimal::from(elapsed.num_milliseconds())
        .checked_div(Decimal::from(MILLIS_PER_HOUR))
        .ok_or_else(|| out_of_range("stay length"))?;
    let rounded = fractions_in(hours, fraction)
        .map(|count| count.ceil())
        .and_then(|count| count.checked_mul(fraction))
        .ok_or_else(|| {
            out_of_range(format!(
                "a stay of {hours} h in fractions of {fraction} h (tariff {})",
                tariff.id
            ))
        })?;
    Ok(rounded.max(fraction))
}

/// How many tariff fractions `hours` spans, unrounded.
///
/// `None` when the fraction is not positive or the quotient does not fit.
pub fn fractions_in(hours: Decimal, fraction: Decimal) -> Option<Decimal> {
    if fraction <= Decimal::ZERO {
        return None;
    }
    hours.checked_div(fraction)
}

/// Amount due for a parking stay.
pub fn parking_total(
    tariff: &ParkingTariff,
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
) -> Result<Decimal, DomainError> {
    let hours = billable_hours(tariff, entry, exit)?;
    hours.checked_mul(tariff.hourly_rate).ok_or_else(|| {
        out_of_range(format!(
            "{hours} h at {} per hour (tariff {})",
            tariff.hourly_rate, tariff.id
        ))
    })
}

/// Sum of the snapshotted service prices.
pub fn car_wash_total(lines: &[ServiceSnapshot]) -> Result<Decimal, DomainError> {
    if lines.is_empty() {
        return Err(DomainError::EmptyServiceSet);
    }
    sum_prices(lines)
        .ok_or_else(|| out_of_range(format!("the sum of {} service prices", lines.len())))
}

/// Sum of the line prices, `None` on overflow.
pub fn sum_prices(lines: &[ServiceSnapshot]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.tariff))
}

fn out_of_range(reason: impl Into<String>) -> DomainError {
    DomainError::AmountOutOfRange {
        reason: reason.into(),
    }
}
