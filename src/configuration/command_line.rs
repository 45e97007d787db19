use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::ir::Status;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Set a custom configuration file. Supported: YAML, JSON, TOML, HJSON
    #[structopt(long, short = "c", parse(from_os_str), env = "RES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", parse(from_os_str), env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Convert a JUnit/xUnit XML report into a result file
    Junit {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// Where to write the result file, defaults to ./junit.res
        #[structopt(long, short = "o", parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Rebuild a Cucumber run from a JSON-lines stream of formatter events
    Replay {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// Where to write the result file, defaults to stdout
        #[structopt(long, short = "o", parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Print test counts of a result file
    Summary {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// Only print the count of this status: passed, failed, notrun, unknown
        #[structopt(long, short = "s")]
        status: Option<Status>,
    },
    /// Print every node of a result file as one flat JSON array
    Flatten {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
}

impl Into<LevelFilter> for LogLevel {
    fn into(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
