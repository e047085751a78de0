//! Small generators: random tokens and calendar helpers.

pub mod dates;
pub mod error;
pub mod random;

pub use dates::{date_by_weekday, is_dst, next_weekday, parse_weekday};
pub use error::GenError;
pub use random::{random_list, random_string, RandomSpec};
