use std::collections::HashSet;

use rand::{rngs::OsRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenError, Result};

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Shape of a generated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSpec {
    /// Number of random characters.
    pub length: usize,
    /// Inserted between consecutive characters.
    pub sep: String,
    /// Extra characters to draw from.
    pub special: String,
    /// Include ASCII letters.
    pub alpha: bool,
    /// Include ASCII digits.
    pub digits: bool,
}

impl Default for RandomSpec {
    fn default() -> Self {
        Self {
            length: 20,
            sep: String::new(),
            special: String::new(),
            alpha: true,
            digits: true,
        }
    }
}

impl RandomSpec {
    /// Distinct characters to draw from, in a stable order.
    fn alphabet(&self) -> Vec<char> {
        let mut seen = HashSet::new();
        let letters = if self.alpha { LETTERS } else { "" };
        let digits = if self.digits { DIGITS } else { "" };
        letters
            .chars()
            .chain(digits.chars())
            .chain(self.special.chars())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// How many distinct strings this spec can produce (saturating).
    pub fn variations(&self) -> u128 {
        let base = self.alphabet().len() as u128;
        let exp = u32::try_from(self.length).unwrap_or(u32::MAX);
        base.checked_pow(exp).unwrap_or(u128::MAX)
    }
}

/// One random string, drawn from the OS CSPRNG.
pub fn random_string(spec: &RandomSpec) -> Result<String> {
    draw(&spec.alphabet(), spec)
}

fn draw(alphabet: &[char], spec: &RandomSpec) -> Result<String> {
    if spec.length == 0 {
        return Ok(String::new());
    }

    let mut out = String::with_capacity(spec.length * (1 + spec.sep.len()));
    for i in 0..spec.length {
        if i > 0 {
            out.push_str(&spec.sep);
        }
        let c = alphabet.choose(&mut OsRng).ok_or(GenError::EmptyAlphabet)?;
        out.push(*c);
    }
    Ok(out)
}

const PREALLOCATE_LIMIT: usize = 4096;

/// `count` distinct random strings, in generation order.
pub fn random_list(count: usize, spec: &RandomSpec) -> Result<Vec<String>> {
    let possible = spec.variations();
    if count as u128 > possible {
        return Err(GenError::TooManyVariations {
            requested: count,
            possible,
        });
    }

    let alphabet = spec.alphabet();
    // grow as strings arrive; `count` may be far larger than memory allows
    let reserve = count.min(PREALLOCATE_LIMIT);
    let mut seen = HashSet::with_capacity(reserve);
    let mut out = Vec::with_capacity(reserve);
    let mut draws = 0usize;
    while out.len() < count {
        let candidate = draw(&alphabet, spec)?;
        draws += 1;
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    }
    debug!(count, draws, "generated random list");
    Ok(out)
}
