use duration_string::DurationString;
use gumdrop::Options;

/// Tether a deployed application to its git repository: re-clone and restart
/// when the remote branch moves ahead.
#[derive(Debug, Options)]
pub struct Args {
    /// The GitHub repository to track (https://github.com/<owner>/<name>).
    #[options(free)]
    pub repository: Option<String>,

    /// The branch to follow.
    #[options(default = "main")]
    pub branch: String,

    /// The command that starts the application inside the checkout.
    #[options()]
    pub start: Option<String>,

    /// The directory to hold the checkout, defaults to the program's directory.
    #[options(no_short)]
    pub directory: Option<String>,

    /// Scan only once and exit. Useful for cronjobs.
    #[options()]
    pub once: bool,

    /// Scan with this delay.
    ///
    /// Can be a number postfixed with s(econds), m(inutes), h(ours), d(ays)
    #[options(long = "every", default = "1m")]
    pub delay: DurationString,

    /// Runs an HTTP server on the URL, which requests a scan when called.
    #[options(no_short)]
    pub http: Option<String>,

    /// Only print errors.
    #[options()]
    pub quiet: bool,

    /// Increase verbosity, can be set multiple times (-v debug, -vv tracing)
    #[options(count)]
    pub verbose: u8,

    /// Print the current version.
    #[options(short = "V")]
    pub version: bool,

    /// Print this help.
    #[options()]
    pub help: bool,
}

pub fn parse_args() -> Args {
    Args::parse_args_default_or_exit()
}
