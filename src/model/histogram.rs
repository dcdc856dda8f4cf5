use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Width of an age group in the grouped table.
pub const YEARS_PER_GROUP: u32 = 6;
/// Ages covered by the grouped table, `[0, 96)`.
pub const GROUPED_AGE_SPAN: u32 = 96;
/// Slots in the single-year table, ages `[0, 128)`.
pub const SINGLE_YEAR_SLOTS: usize = 128;

/// What to do with an age that lands past the last bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRange {
    #[default]
    Error,
    Drop,
    Clamp,
}

/// Population counts summed into fixed-width age buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeHistogram {
    width: u32,
    counts: Vec<u64>,
    total: u64,
    policy: OutOfRange,
}

/// One bucket of the normalised histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Proportion {
    pub lower_age: u32,
    pub count: u64,
    pub proportion: f64,
    pub cumulative: f64,
}

impl AgeHistogram {
    /// Buckets of `width` years covering `[0, span)`; a partial last bucket
    /// is kept.
    pub fn grouped(width: u32, span: u32) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidConfig("group width must be >= 1".into()));
        }
        if span == 0 {
            return Err(Error::InvalidConfig("age span must be >= 1".into()));
        }
        Ok(Self {
            width,
            counts: vec![0; span.div_ceil(width) as usize],
            total: 0,
            policy: OutOfRange::default(),
        })
    }

    /// One bucket per single year of age.
    pub fn per_year(slots: usize) -> Result<Self> {
        if slots == 0 {
            return Err(Error::InvalidConfig("need at least one age slot".into()));
        }
        Ok(Self { width: 1, counts: vec![0; slots], total: 0, policy: OutOfRange::default() })
    }

    pub fn with_policy(mut self, policy: OutOfRange) -> Self {
        self.policy = policy;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Add `count` people of single-year `age`. Fails rather than wraps if
    /// the grand total would exceed `u64::MAX`; no bucket can then overflow
    /// either.
    pub fn add(&mut self, age: u32, count: u64) -> Result<()> {
        let idx = (age / self.width) as usize;
        let last = self.counts.len() - 1;
        let idx = if idx <= last {
            idx
        } else {
            match self.policy {
                OutOfRange::Error => {
                    return Err(Error::AgeOutOfRange {
                        age,
                        width: self.width,
                        buckets: self.counts.len(),
                    })
                }
                OutOfRange::Drop => {
                    warn!(age, count, "dropping age past the last bucket");
                    return Ok(());
                }
                OutOfRange::Clamp => {
                    warn!(age, count, "clamping age into the last bucket");
                    last
                }
            }
        };
        self.total = self
            .total
            .checked_add(count)
            .ok_or_else(|| Error::CountOverflow(format!("age {}", age)))?;
        self.counts[idx] += count;
        Ok(())
    }

    /// Build from `(age, count)` pairs.
    pub fn extend<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (u32, u64)>,
    {
        for (age, count) in entries {
            self.add(age, count)?;
        }
        Ok(())
    }

    /// Normalise to proportions with a running cumulative sum.
    pub fn proportions(&self) -> Result<Vec<Proportion>> {
        let total = self.total();
        if total == 0 {
            return Err(Error::ZeroPopulation);
        }
        let total = total as f64;
        let mut cumulative = 0.0;
        let out = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let proportion = count as f64 / total;
                cumulative += proportion;
                Proportion { lower_age: i as u32 * self.width, count, proportion, cumulative }
            })
            .collect();
        Ok(out)
    }
}
