use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use thiserror::Error;
use tracing::{info, warn};

/// A user-supplied amount: either an exact number (`"2"`) or an inclusive range (`"2-4"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CountOrRange {
    Exact(u32),
    Range { min: u32, max: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("value is empty")]
    Empty,
    #[error("'{0}' is not a non-negative integer")]
    NotANumber(String),
    #[error("range {min}-{max} has its lower bound above its upper bound")]
    InvertedRange { min: u32, max: u32 },
    #[error("'{0}' has more than two parts")]
    TooManyParts(String),
}

impl CountOrRange {
    /// Draw a value. Ranges are sampled uniformly, bounds included.
    pub fn sample(&self, rng: &mut dyn RngCore) -> u32 {
        match *self {
            CountOrRange::Exact(value) => value,
            CountOrRange::Range { min, max } if min == max => min,
            CountOrRange::Range { min, max } => rng.random_range(min..=max),
        }
    }
}

impl FromStr for CountOrRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ValueError::Empty);
        }
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| ValueError::NotANumber(part.trim().to_string()))
        };
        let parts: Vec<&str> = raw.split('-').collect();
        match parts.as_slice() {
            [single] => Ok(CountOrRange::Exact(parse(single)?)),
            [lo, hi] => {
                let (min, max) = (parse(lo)?, parse(hi)?);
                if min > max {
                    return Err(ValueError::InvertedRange { min, max });
                }
                Ok(CountOrRange::Range { min, max })
            }
            _ => Err(ValueError::TooManyParts(raw.to_string())),
        }
    }
}

impl fmt::Display for CountOrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountOrRange::Exact(value) => write!(f, "{value}"),
            CountOrRange::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

/// Parse a count-or-range argument, falling back to `default` when it is malformed.
///
/// `label` is a short name for the value ("Likes count", "Unfollow") used in the log line.
pub fn parse_or_default(raw: &str, label: &str, default: u32) -> CountOrRange {
    match raw.parse::<CountOrRange>() {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target: "instabot::args",
                %label, value = %raw, default, error = %err,
                "Using default value, it must be either a number (e.g. 2) or a range (e.g. 2-4)"
            );
            CountOrRange::Exact(default)
        }
    }
}

/// Parse and sample in one step, logging the chosen value.
pub fn get_value(raw: &str, label: &str, default: u32, rng: &mut dyn RngCore) -> u32 {
    let value = parse_or_default(raw, label, default).sample(rng);
    info!(target: "instabot::args", %label, value, "Resolved value");
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    #[test]
    fn parses_exact_and_range() {
        assert_eq!("2".parse(), Ok(CountOrRange::Exact(2)));
        assert_eq!(" 3-8 ".parse(), Ok(CountOrRange::Range { min: 3, max: 8 }));
        assert_eq!(CountOrRange::Range { min: 3, max: 8 }.to_string(), "3-8");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!("".parse::<CountOrRange>(), Err(ValueError::Empty));
        assert_eq!(
            "abc".parse::<CountOrRange>(),
            Err(ValueError::NotANumber("abc".into()))
        );
        assert_eq!(
            "4-2".parse::<CountOrRange>(),
            Err(ValueError::InvertedRange { min: 4, max: 2 })
        );
        assert!(matches!(
            "1-2-3".parse::<CountOrRange>(),
            Err(ValueError::TooManyParts(_))
        ));
        assert!(matches!(
            "-1".parse::<CountOrRange>(),
            Err(ValueError::NotANumber(_))
        ));
    }

    #[test]
    fn range_samples_stay_within_bounds_and_cover_them() {
        let mut rng = StdRng::seed_from_u64(7);
        let range: CountOrRange = "2-4".parse().unwrap();
        let seen: BTreeSet<u32> = (0..500).map(|_| range.sample(&mut rng)).collect();
        assert_eq!(seen, BTreeSet::from([2, 3, 4]));
    }

    #[test]
    fn range_samples_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(13);
        let range = CountOrRange::Range { min: 2, max: 4 };
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            counts[(range.sample(&mut rng) - 2) as usize] += 1;
        }
        // Expected 1000 per value; the bound is many standard deviations wide.
        for (offset, count) in counts.iter().enumerate() {
            assert!(
                (800..=1200).contains(count),
                "value {} drawn {count} times",
                offset + 2
            );
        }
    }

    #[test]
    fn get_value_falls_back_to_default() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(get_value("oops", "Likes count", 2, &mut rng), 2);
        assert_eq!(get_value("5", "Likes count", 2, &mut rng), 5);
    }
}
