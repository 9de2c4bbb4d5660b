//! Port flag parsing, tolerant of the host's own flag set.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use promwire_core::error::{PromwireError, Result};

/// Flag the bundle contributes to the host's CLI surface.
pub const PORT_FLAG: &str = "prometheus-port";

/// Extract `--prometheus-port` from an argument vector.
///
/// The first element is treated as the program name, so the host's full argv
/// can be passed straight through. Unknown flags and positionals are ignored
/// rather than rejected; this flag set has to coexist with whatever the host
/// itself parses.
pub fn parse_port_flag<I, T>(args: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Command::new(PORT_FLAG)
        .ignore_errors(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(PORT_FLAG)
                .long(PORT_FLAG)
                .value_name("PORT")
                .action(ArgAction::Set)
                .help("prometheus metrics port"),
        )
        .try_get_matches_from(args)
        .map_err(|e| PromwireError::Flags(e.to_string()))?;

    Ok(matches.get_one::<String>(PORT_FLAG).cloned())
}
