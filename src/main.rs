mod app;
mod binning;
mod calendar;
mod config;
mod daylist;
mod event;
mod form;
mod format;
mod help;
mod logging;
mod overflow;
mod store;
mod theme;
use crate::app::App;
use crate::calendar::MonthView;
use crate::config::Config;
use crate::format::PlainFormat;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::info;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        config: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { date, config })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { date, config } => {
                let config = Config::load(config.as_deref())?;
                // Must happen before any other threads are started (e.g., by
                // the logger)
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let _logger =
                    logging::init(&config.log).context("failed to set up logging")?;
                info!(
                    "Week starts on {:?}; {} task types configured",
                    config.week_start,
                    config.task_types.len()
                );
                let mut view = MonthView::new(today, config.week_start)
                    .context("cannot display the current month")?;
                if let Some(date) = date {
                    view = view
                        .start_date(date)
                        .with_context(|| format!("cannot display the month of {date}"))?;
                }
                let app = App::new(view, PlainFormat::new(config.time_format), config.task_types);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(terminal).context("terminal I/O failed")?;
                    Ok(())
                })?;
                info!("Exiting");
                Ok(())
            }
            Command::Help => {
                println!("Usage: evcal [-c FILE] [YYYY-MM-DD]");
                println!();
                println!("Month-grid terminal calendar for scheduling dated events");
                println!();
                println!("Options:");
                println!("  -c FILE, --config FILE");
                println!("                    Read configuration from FILE instead of the default");
                println!("                    location");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
