use crate::{args::Args, MainError};
use log::{warn, LevelFilter};
use simplelog::{
    format_description, ColorChoice, ConfigBuilder, LevelPadding, TermLogger, TerminalMode,
};

// Local time with an explicit offset, so the lines match the timestamps of
// the supervised application.
const TIMESTAMP_FORMAT: &[simplelog::FormatItem<'_>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
);

fn level_filter(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

pub fn init_logger(args: &Args) -> Result<(), MainError> {
    let config = ConfigBuilder::new()
        .set_level_padding(LevelPadding::Right)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_time_format_custom(TIMESTAMP_FORMAT)
        .set_time_offset_to_local()
        .map_err(|_| MainError::FailedLoggerTimezones)?
        .build();

    TermLogger::init(
        level_filter(args.quiet, args.verbose),
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    if args.verbose > 2 {
        warn!("Verbosity maxes out at -vv.")
    }

    Ok(())
}
