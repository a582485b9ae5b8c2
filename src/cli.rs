use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};

#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(author, version, about, long_about = None, args_override_self = true)]
pub struct Args {
    /// Run all checks but do not change anything in the bucket
    #[arg(long)]
    pub dry_run: bool,
}

pub const ACCEPTED_FLAGS: &[&str] = &["--dry-run"];

/// Parses `args` (program name first), dropping anything unrecognized.
///
/// Returns the parsed arguments and the rejected ones so the caller can warn.
pub fn parse_lenient<I, S>(args: I) -> (Args, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut remaining: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut rejected = Vec::new();

    loop {
        match Args::try_parse_from(&remaining) {
            Ok(args) => return (args, rejected),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let offending = match e.get(ContextKind::InvalidArg) {
                    Some(ContextValue::String(arg)) => arg.clone(),
                    _ => {
                        // Nothing to pinpoint, keep only the accepted flags
                        if drop_unaccepted(&mut remaining, &mut rejected) {
                            continue;
                        }
                        return (Args::default(), rejected);
                    }
                };
                // clap may report `--flag` for `--flag=value`, match on the prefix as well.
                // An exact accepted flag is never the culprit.
                let position = remaining.iter().skip(1).position(|arg| {
                    !is_accepted(arg)
                        && (arg == &offending || arg.split('=').next() == Some(offending.as_str()))
                });
                match position {
                    Some(i) => rejected.push(remaining.remove(i + 1)),
                    None => {
                        if !drop_unaccepted(&mut remaining, &mut rejected) {
                            return (Args::default(), rejected);
                        }
                    }
                }
            }
        }
    }
}

fn is_accepted(arg: &str) -> bool {
    ACCEPTED_FLAGS.contains(&arg)
}

/// Moves every token except the program name and exact accepted flags into
/// `rejected`. Returns false when there was nothing left to drop.
fn drop_unaccepted(remaining: &mut Vec<String>, rejected: &mut Vec<String>) -> bool {
    let before = rejected.len();
    let mut kept = Vec::with_capacity(remaining.len());
    for (i, arg) in remaining.drain(..).enumerate() {
        if i == 0 || is_accepted(&arg) {
            kept.push(arg);
        } else {
            rejected.push(arg);
        }
    }
    *remaining = kept;
    rejected.len() > before
}

pub fn invalid_argument_warning(arg: &str) -> String {
    format!(
        "Invalid argument: {} - Please use one of the following: {:?}",
        arg, ACCEPTED_FLAGS
    )
}

/// Like [`parse_lenient`] but returns the warning text for every dropped argument.
pub fn parse_from<I, S>(args: I) -> (Args, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (args, rejected) = parse_lenient(args);
    let warnings = rejected
        .iter()
        .map(|arg| invalid_argument_warning(arg))
        .collect();
    (args, warnings)
}

/// Parses the process arguments, warning about every unrecognized one.
pub fn parse_args() -> Args {
    let (args, warnings) = parse_from(std::env::args());
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    if args.dry_run {
        tracing::info!("Dry run has been enabled.");
    }
    args
}
