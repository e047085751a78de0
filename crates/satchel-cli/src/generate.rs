use chrono::{NaiveDate, Utc};
use color_eyre::Result;
use satchel_gen::RandomSpec;

use crate::cli::RandomArgs;

/// Merge CLI flags over the configured random-string defaults.
pub fn spec_from(args: &RandomArgs, defaults: &RandomSpec) -> RandomSpec {
    RandomSpec {
        length: args.length.unwrap_or(defaults.length),
        sep: args.sep.clone().unwrap_or_else(|| defaults.sep.clone()),
        special: args
            .special
            .clone()
            .unwrap_or_else(|| defaults.special.clone()),
        alpha: defaults.alpha && !args.no_alpha,
        digits: defaults.digits && !args.no_digits,
    }
}

pub fn random(args: &RandomArgs, defaults: &RandomSpec) -> Result<Vec<String>> {
    let spec = spec_from(args, defaults);
    Ok(satchel_gen::random_list(args.count, &spec)?)
}

pub fn weekday(day: &str, weeks_out: u32) -> Result<NaiveDate> {
    let day = satchel_gen::parse_weekday(day)?;
    Ok(satchel_gen::next_weekday(day, weeks_out)?)
}

pub fn dst(timezone: Option<&str>) -> Result<bool> {
    Ok(satchel_gen::is_dst(timezone.unwrap_or("UTC"), Utc::now())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RandomArgs {
        RandomArgs {
            length: None,
            count: 3,
            sep: None,
            special: None,
            no_alpha: false,
            no_digits: false,
        }
    }

    #[test]
    fn flags_override_config_defaults() {
        let defaults = RandomSpec {
            length: 8,
            special: "!".into(),
            ..RandomSpec::default()
        };
        let flags = RandomArgs {
            length: Some(4),
            no_alpha: true,
            ..args()
        };

        let spec = spec_from(&flags, &defaults);
        assert_eq!(spec.length, 4);
        assert_eq!(spec.special, "!");
        assert!(!spec.alpha);
        assert!(spec.digits);
    }

    #[test]
    fn random_returns_requested_count() {
        let out = random(&args(), &RandomSpec::default()).expect("random");
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|s| s.len() == 20));
    }

    #[test]
    fn utc_never_observes_dst() {
        assert!(!dst(None).expect("dst"));
    }
}
