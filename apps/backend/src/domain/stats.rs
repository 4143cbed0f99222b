//! Date-bucketed round aggregation.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

/// Rounds started on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRoundStats {
    pub date: Date,
    pub round_count: u64,
    pub participant_count: u64,
}

/// Fold `(start date, participant count)` pairs into per-day buckets, newest
/// day first.
pub fn group_by_date<I>(rounds: I) -> Vec<DailyRoundStats>
where
    I: IntoIterator<Item = (Date, usize)>,
{
    let mut buckets: BTreeMap<Date, (u64, u64)> = BTreeMap::new();
    for (date, participants) in rounds {
        let entry = buckets.entry(date).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += participants as u64;
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date, (round_count, participant_count))| DailyRoundStats {
            date,
            round_count,
            participant_count,
        })
        .collect()
}
