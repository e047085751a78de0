use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenError {
    #[error("no characters to choose from")]
    EmptyAlphabet,
    /// Asked for more distinct strings than the alphabet and length allow.
    #[error("{requested} strings requested but only {possible} variations exist; increase the length")]
    TooManyVariations { requested: usize, possible: u128 },
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("date out of range")]
    OutOfRange,
}

pub type Result<T> = std::result::Result<T, GenError>;
