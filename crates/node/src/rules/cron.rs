// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal 5-field cron-phase matcher backing the `cronjob(name, expr)`
//! builtin. Supports `*`, comma lists, ranges (`a-b`), and step values
//! (`*/n`, `a-b/n`) per field — the common subset real science rules use,
//! not the full vixie-cron grammar (no `@` aliases, no day-name/month-name
//! words).

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::{NodeError, NodeResult};

/// Parses and matches a 5-field `minute hour day-of-month month day-of-week`
/// cron expression against a point in time.
pub fn matches(expr: &str, at: DateTime<Utc>) -> NodeResult<bool> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(NodeError::Condition(format!(
            "cron expression {expr:?} must have exactly 5 fields"
        )));
    }

    Ok(field_matches(fields[0], at.minute(), 0, 59)?
        && field_matches(fields[1], at.hour(), 0, 23)?
        && field_matches(fields[2], at.day(), 1, 31)?
        && field_matches(fields[3], at.month(), 1, 12)?
        && field_matches(fields[4], at.weekday().num_days_from_sunday(), 0, 6)?)
}

fn field_matches(field: &str, value: u32, min: u32, max: u32) -> NodeResult<bool> {
    for part in field.split(',') {
        if part_matches(part, value, min, max)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn part_matches(part: &str, value: u32, min: u32, max: u32) -> NodeResult<bool> {
    let (range_part, step) = match part.split_once('/') {
        Some((r, s)) => (
            r,
            s.parse::<u32>()
                .map_err(|_| NodeError::Condition(format!("invalid cron step {s:?}")))?,
        ),
        None => (part, 1),
    };

    let (lo, hi) = if range_part == "*" {
        (min, max)
    } else if let Some((lo, hi)) = range_part.split_once('-') {
        (
            lo.parse::<u32>()
                .map_err(|_| NodeError::Condition(format!("invalid cron range {range_part:?}")))?,
            hi.parse::<u32>()
                .map_err(|_| NodeError::Condition(format!("invalid cron range {range_part:?}")))?,
        )
    } else {
        let exact = range_part
            .parse::<u32>()
            .map_err(|_| NodeError::Condition(format!("invalid cron field {range_part:?}")))?;
        (exact, exact)
    };

    if value < lo || value > hi {
        return Ok(false);
    }
    Ok((value - lo) % step == 0)
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
