//! Cross-user averages per metric key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::Store;
use crate::unit::{Unit, UnitRegistry};

/// Derived statistic for one metric key across all users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    /// Mean of all pooled values, rounded to 2 decimals (half away from zero).
    #[serde(rename = "avg")]
    pub average: f64,
    pub unit: Unit,
    pub count: u64,
}

/// Sorted by metric key so repeated queries serialize identically.
pub type Averages = BTreeMap<String, AggregateStat>;

#[derive(Default)]
struct Pool {
    sum: i128,
    count: u64,
}

/// Pool every user's samples per metric key and compute the means.
///
/// Read-only; values from different users are weighted equally per sample.
pub fn aggregate(store: &Store, units: &UnitRegistry) -> Averages {
    let mut pools: BTreeMap<String, Pool> = BTreeMap::new();
    store.visit_series(|key, values| {
        if values.is_empty() {
            return;
        }
        let pool = pools.entry(key.to_string()).or_default();
        pool.sum += values.iter().map(|&v| i128::from(v)).sum::<i128>();
        pool.count += values.len() as u64;
    });

    pools
        .into_iter()
        .filter(|(_, p)| p.count > 0)
        .map(|(key, p)| {
            let stat = AggregateStat {
                average: mean_2dp(p.sum, p.count),
                unit: units.resolve(&key),
                count: p.count,
            };
            (key, stat)
        })
        .collect()
}

/// `sum / count` rounded to 2 decimal places, ties away from zero.
///
/// Rounds on the exact rational in integers; going through `f64` first would
/// land `.xx5` ties like 23/40 on the wrong side. `count` must be non-zero.
pub fn mean_2dp(sum: i128, count: u64) -> f64 {
    let count = u128::from(count);
    // floor((|sum| * 100) / count + 1/2)
    let hundredths = (sum.unsigned_abs() * 200 + count) / (2 * count);
    let v = hundredths as f64 / 100.0;
    if sum < 0 {
        -v
    } else {
        v
    }
}
