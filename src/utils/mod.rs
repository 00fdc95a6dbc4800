use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strsim::levenshtein;

/// Edit distance used to score command similarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scorer {
    /// Insertions and deletions only
    #[default]
    Indel,
    /// Insertions, deletions and substitutions
    Levenshtein,
}

impl Scorer {
    /// Distance between `a` and `b` in characters
    #[must_use]
    pub fn distance(self, a: &str, b: &str) -> usize {
        match self {
            Self::Indel => indel_distance(a, b),
            Self::Levenshtein => levenshtein(a, b),
        }
    }

    /// Similarity on a 0-100 scale, 100 meaning identical strings.
    ///
    /// The distance is normalized by the combined length of both strings.
    /// Comparison is case-sensitive; callers lowercase commands beforehand.
    #[must_use]
    pub fn ratio(self, a: &str, b: &str) -> f64 {
        let total = (a.chars().count() + b.chars().count()).max(1);
        let distance = self.distance(a, b);

        100.0 * (1.0 - as_f64(distance) / as_f64(total))
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indel => write!(f, "indel"),
            Self::Levenshtein => write!(f, "levenshtein"),
        }
    }
}

impl FromStr for Scorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indel" => Ok(Self::Indel),
            "levenshtein" => Ok(Self::Levenshtein),
            other => Err(format!("unknown scorer '{other}' (expected indel or levenshtein)")),
        }
    }
}

/// Number of single-character insertions and deletions turning `a` into `b`
#[must_use]
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    a_len + b_len - 2 * longest_common_subsequence(a, b)
}

/// Length of the longest common subsequence of `a` and `b`, in characters
#[must_use]
pub fn longest_common_subsequence(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() || b_chars.is_empty() {
        return 0;
    }

    // Two rows of the classic table are enough
    let mut previous = vec![0usize; b_chars.len() + 1];
    let mut current = vec![0usize; b_chars.len() + 1];

    for a_char in &a_chars {
        for (j, b_char) in b_chars.iter().enumerate() {
            current[j + 1] = if a_char == b_char {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

fn as_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}
