// #![forbid(unsafe_code)]
// #![deny(non_upper_case_globals)]
// #![deny(non_camel_case_types)]
// #![deny(non_snake_case)]
// #![deny(unused_mut)]
// #![deny(unused_variables)]
// #![deny(dead_code)]
// #![deny(unused_imports)]
//#![deny(missing_docs)]
//#![deny(warnings)]

extern crate chrono;
extern crate derivative;
extern crate lazy_static;
extern crate serde_derive;

#[macro_use]
extern crate log;

mod app;
mod configuration;
mod error;
mod formatters;
mod ir;
mod metrics;
mod parsers;
mod time;

use log::LevelFilter;
use std::{path::PathBuf, process::exit};
use structopt::StructOpt;

use self::app::App;
use self::{
    configuration::command_line::{LogLevel, Opt},
    configuration::settings::Settings,
};

fn main() {
    let options = Opt::from_args();
    let settings = Settings::load(options.config.as_deref());

    let log_output_file = options.log_output_file.clone().or_else(|| {
        settings
            .as_ref()
            .ok()
            .and_then(|settings| settings.log_output_file.clone())
    });
    if let Err(e) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &log_output_file,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        exit(2);
    }

    match settings {
        Ok(settings) => {
            debug!("Initiated configuration {:#?}", settings);
            let app = App::new(settings);
            if let Err(e) = app.run(options.command) {
                error!("{}", e);
                exit(1);
            }
        }
        Err(e) => {
            error!("Failed to load configuration {}", e);
            exit(1);
        }
    }
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    info!("Logging level {} enabled", level);
    Ok(())
}
