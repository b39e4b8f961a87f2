use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in verbosity order; the index is the count `-v` would produce.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse `IDBIND_LOG_LEVEL` as either a count (`0..=4`) or a level name.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        let level = level.trim().to_lowercase();

        if let Ok(count) = level.parse::<u8>() {
            if usize::from(count) < LEVELS.len() {
                return Ok(count);
            }
            return Err(format!("log level must be 0..={}", LEVELS.len() - 1));
        }

        LEVELS
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level, expected one of: {}", LEVELS.join(", ")))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("IDBIND_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(level: &str) -> Result<u8, clap::Error> {
        let matches = Command::new("idbind")
            .arg(
                Arg::new("level")
                    .long("level")
                    .value_parser(validator_log_level()),
            )
            .try_get_matches_from(["idbind", "--level", level])?;

        matches
            .get_one::<u8>("level")
            .copied()
            .ok_or_else(|| clap::Error::new(clap::error::ErrorKind::MissingRequiredArgument))
    }

    #[test]
    fn test_counts_cover_every_mapped_level() -> Result<(), clap::Error> {
        for count in 0..=4u8 {
            assert_eq!(parse(&count.to_string())?, count);
        }
        assert!(parse("5").is_err());
        Ok(())
    }

    #[test]
    fn test_names_are_case_insensitive() -> Result<(), clap::Error> {
        assert_eq!(parse("error")?, 0);
        assert_eq!(parse("WARN")?, 1);
        assert_eq!(parse(" Info ")?, 2);
        assert_eq!(parse("debug")?, 3);
        assert_eq!(parse("trace")?, 4);
        assert!(parse("verbose").is_err());
        Ok(())
    }
}
