//! Grouping of dated feedback into per-day bundles.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::models::{DailyBundle, FeedbackItem};
use crate::errors::ValidationError;
use crate::validation::char_len;

/// Groups feedback by calendar date in a single pass.
///
/// Bundles appear in the order their date was first seen and keep the
/// arrival order of their texts. Dates are not sorted here.
#[must_use]
pub fn group_by_date(items: &[FeedbackItem]) -> Vec<DailyBundle> {
    let mut positions: HashMap<NaiveDate, usize> = HashMap::new();
    let mut bundles: Vec<DailyBundle> = Vec::new();

    for item in items {
        let slot = *positions.entry(item.date).or_insert_with(|| {
            bundles.push(DailyBundle {
                date: item.date,
                texts: Vec::new(),
            });
            bundles.len() - 1
        });
        bundles[slot].texts.push(item.text.clone());
    }

    bundles
}

/// Joins texts with a single space.
#[must_use]
pub fn combine_texts<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Rejects combined text longer than `max_length` characters. When the text
/// belongs to one day's bundle the error names that date.
pub fn check_combined_length(
    combined: &str,
    max_length: usize,
    bundle: Option<&DailyBundle>,
) -> Result<(), ValidationError> {
    if char_len(combined) <= max_length {
        return Ok(());
    }

    Err(match bundle {
        Some(bundle) => ValidationError::CombinedDailyTextTooLong {
            date: bundle.date_key(),
            max: max_length,
        },
        None => ValidationError::CombinedTextTooLong { max: max_length },
    })
}
