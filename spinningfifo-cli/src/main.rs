use std::num::NonZeroU32;
use std::time::Duration;

use clap::{arg, value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{debug, warn, LevelFilter};
use spinningfifo::hook::Hook;
use spinningfifo::{RetryPolicy, SpinningFifo, WriteRequest};

include!(concat!(env!("OUT_DIR"), "/const_gen.rs"));

/// Environment variable overriding the log filter, in `env_logger` syntax
const LOG_ENV: &str = "SPINNINGFIFO_LOG";

struct MainError {
    inner: Box<dyn std::error::Error + 'static>
}

impl<E: std::error::Error + 'static> From<E> for MainError {
    fn from(value: E) -> Self {
        Self { inner: Box::new(value) }
    }
}

impl std::fmt::Debug for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&console::style(format!("{}", self.inner.as_ref())).red().to_string())
    }
}

fn cli() -> Command {
    Command::new("spinningfifo")
        .version(VERSION)
        .long_version(LONG_VERSION)
        .about("Wait for a named pipe to get a reader, then write a message to it")
        .long_about("Wait for a named pipe to get a reader, then write a message to it.
The arguments are joined with spaces into `<path> <message>`. The path is opened write-only without blocking; \
while it doesn't exist or has no reader the open is retried.")

        .arg(Arg::new("args")
            .value_name("ARG")
            .num_args(1..)
            .trailing_var_arg(true)
            .allow_hyphen_values(true)
            .value_hint(ValueHint::Other)
            .required_unless_present("hook")
            .help("<path> <message>, as one or several arguments"))
        .arg(Arg::new("hook")
            .long("hook")
            .value_name("NAME:ARG")
            .conflicts_with("args")
            .help("Host style invocation, e.g. `spinningfifo:/tmp/fifo hello`"))

        // Retry options
        .arg(arg!(-i --interval <SECONDS> "Time between open attempts")
            .value_parser(value_parser!(f64))
            .default_value("1")
            .help_heading("Retry options"))
        .arg(arg!(-t --timeout <SECONDS> "Give up after waiting this long (default: wait forever)")
            .value_parser(value_parser!(f64))
            .help_heading("Retry options"))
        .arg(arg!(-n --"max-attempts" <N> "Give up after this many open attempts (default: unlimited)")
            .value_parser(value_parser!(NonZeroU32))
            .help_heading("Retry options"))

        // Output
        .arg(arg!(--color "Enable color output (default: automatic)"))
        .arg(Arg::new("no-color")
            .long("no-color")
            .action(ArgAction::SetTrue)
            .conflicts_with("color")
            .hide(true))
        .arg(arg!(--debug "Print debug information")
            .hide_short_help(true))
        .arg(arg!(-q --quiet "Only print errors")
            .conflicts_with_all(["verbosity", "debug"]))
        .arg(Arg::new("verbosity")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Sets the level of verbosity"))
}

fn main() -> Result<(), MainError> {
    let matches = cli().get_matches();

    run_cli(&matches)
}

/// Log target prefix shared by the library and this binary
const LOG_TARGET: &str = "spinningfifo";

/// Filter levels for all targets and for our own targets.
///
/// Our own targets never go below `Info` unless `quiet` is set: the
/// `waiting for <path> ...` lines are the only sign of progress while waiting.
fn log_levels(debug_build: bool, verbosity: u8, quiet: bool) -> (LevelFilter, LevelFilter) {
    if quiet {
        return (LevelFilter::Error, LevelFilter::Error);
    }

    let level = match (debug_build, verbosity) {
        (true, _) => LevelFilter::Trace,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, 3..) => LevelFilter::Trace,
    };
    (level, level.max(LevelFilter::Info))
}

fn init_logging(matches: &ArgMatches) {
    let debug = matches.get_flag("debug");
    let verbosity = if debug { 3 } else { matches.get_count("verbosity") };
    let (level, own_level) = log_levels(cfg!(debug_assertions), verbosity, matches.get_flag("quiet"));

    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.filter(Some(LOG_TARGET), own_level);

    clog.parse_env(env_logger::Env::new().filter(LOG_ENV));
    clog.init();
}

fn retry_policy(matches: &ArgMatches) -> Result<RetryPolicy, MainError> {
    let interval = matches.get_one::<f64>("interval").copied().unwrap_or(1.0);
    let mut policy = RetryPolicy::default().with_interval(Duration::try_from_secs_f64(interval)?);

    if let Some(timeout) = matches.get_one::<f64>("timeout") {
        policy = policy.with_timeout(Duration::try_from_secs_f64(*timeout)?);
    }
    if let Some(max_attempts) = matches.get_one::<NonZeroU32>("max-attempts") {
        policy = policy.with_max_attempts(*max_attempts);
    }

    Ok(policy)
}

fn run_cli(matches: &ArgMatches) -> Result<(), MainError> {
    init_logging(matches);

    let flag_color = matches.get_flag("color");
    let flag_no_color = matches.get_flag("no-color");
    if flag_color || flag_no_color {
        console::set_colors_enabled_stderr(flag_color);
    }

    let policy = retry_policy(matches)?;

    let arg = match matches.get_one::<String>("hook") {
        Some(invocation) => Hook::parse(invocation)?.arg().to_string(),
        None => matches.get_many::<String>("args")
            .map(|args| args.map(String::as_str).collect::<Vec<&str>>().join(" "))
            .unwrap_or_default(),
    };

    let request = WriteRequest::parse(&arg)?;
    if request.payload.is_empty() {
        warn!("Writing an empty message to {}", request.target_path.display());
    }

    let writer = SpinningFifo::new().policy(policy);
    if !writer.retry_policy().is_bounded() {
        debug!("No timeout or attempt limit set, retrying indefinitely");
    }
    let delivery = writer.write_request(&request)?;
    debug!("Delivered {} bytes to {} after {} attempt(s)", delivery.written, request.target_path.display(), delivery.attempts);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use log::LevelFilter;

    use super::{cli, log_levels, retry_policy};

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn release_shows_waiting_lines_by_default() {
        assert_eq!(log_levels(false, 0, false), (LevelFilter::Warn, LevelFilter::Info));
        assert_eq!(log_levels(false, 1, false), (LevelFilter::Info, LevelFilter::Info));
        assert_eq!(log_levels(false, 2, false), (LevelFilter::Debug, LevelFilter::Debug));
        assert_eq!(log_levels(false, 5, false), (LevelFilter::Trace, LevelFilter::Trace));
    }

    #[test]
    fn debug_build_logs_everything() {
        assert_eq!(log_levels(true, 0, false), (LevelFilter::Trace, LevelFilter::Trace));
    }

    #[test]
    fn quiet_only_shows_errors() {
        assert_eq!(log_levels(false, 0, true), (LevelFilter::Error, LevelFilter::Error));
        assert_eq!(log_levels(true, 0, true), (LevelFilter::Error, LevelFilter::Error));
    }

    #[test]
    fn default_policy_is_unbounded() {
        let matches = cli().try_get_matches_from(["spinningfifo", "/tmp/fifo", "hello"]).unwrap();
        let policy = retry_policy(&matches).unwrap();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert!(!policy.is_bounded());
    }

    #[test]
    fn retry_options() {
        let matches = cli().try_get_matches_from([
            "spinningfifo", "-i", "0.25", "--timeout", "3", "-n", "7", "/tmp/fifo", "hello",
        ]).unwrap();
        let policy = retry_policy(&matches).unwrap();
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.timeout, Some(Duration::from_secs(3)));
        assert_eq!(policy.max_attempts.map(|n| n.get()), Some(7));
    }

    #[test]
    fn negative_interval_is_rejected() {
        let matches = cli().try_get_matches_from(["spinningfifo", "--interval=-1", "/tmp/fifo", "hello"]).unwrap();
        assert!(retry_policy(&matches).is_err());
    }

    #[test]
    fn hook_conflicts_with_args() {
        let result = cli().try_get_matches_from([
            "spinningfifo", "--hook", "spinningfifo:/tmp/fifo hi", "/tmp/fifo", "hi",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn message_args_keep_hyphens() {
        let matches = cli().try_get_matches_from(["spinningfifo", "/tmp/fifo", "-x", "--y"]).unwrap();
        let args: Vec<&String> = matches.get_many::<String>("args").unwrap().collect();
        assert_eq!(args, ["/tmp/fifo", "-x", "--y"]);
    }
}
