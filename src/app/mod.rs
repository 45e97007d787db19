pub(crate) mod replay;

use std::path::{Path, PathBuf};

use crate::configuration::command_line::Command;
use crate::configuration::constants::common::DEFAULT_JUNIT_OUTPUT;
use crate::configuration::settings::Settings;
use crate::error::Result;
use crate::formatters::cucumber::Outcome;
use crate::ir::{Document, Node, Status};
use crate::parsers::junit;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        App { settings }
    }

    pub fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Junit { input, output } => self.convert_junit(&input, output),
            Command::Replay { input, output } => self.replay(&input, output),
            Command::Summary { input, status } => self.summary(&input, status),
            Command::Flatten { input } => self.flatten(&input),
        }
    }

    fn convert_junit(&self, input: &Path, output: Option<PathBuf>) -> Result<()> {
        info!("Converting JUnit report {}", input.display());
        let document = junit::load(input, self.settings.framework())?;
        let output = output
            .or_else(|| self.settings.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JUNIT_OUTPUT));
        document.write_to(&output)?;
        info!("Results written into {}", output.display());
        Ok(())
    }

    fn replay(&self, input: &Path, output: Option<PathBuf>) -> Result<()> {
        info!("Replaying Cucumber events from {}", input.display());
        let outcome = replay::replay_file(input)?;
        debug!("Replayed {} features", outcome.document().results.len());
        let document = match outcome {
            Outcome::Finished(document) => document,
            Outcome::Aborted(document) => {
                warn!("Event stream ended before the run finished, results are incomplete");
                document
            }
        };
        match output.or_else(|| self.settings.output.clone()) {
            Some(path) => {
                document.write_to(&path)?;
                info!("Results written into {}", path.display());
            }
            None => println!("{}", document.json()?),
        }
        Ok(())
    }

    fn summary(&self, input: &Path, status: Option<Status>) -> Result<()> {
        let document = Document::load(input)?;
        debug!("Loaded {} results of type {}", document.results.len(), document.r#type());
        if let Some(status) = status {
            println!("{}", document.count(status));
            return Ok(());
        }
        println!("tests: {}", document.tests().count());
        for status in Status::ALL.iter() {
            println!("{}: {}", status, document.count(*status));
        }
        Ok(())
    }

    fn flatten(&self, input: &Path) -> Result<()> {
        let document = Document::load(input)?;
        let flat = document.flat_format();
        debug!(
            "Flattened {} of {} nodes",
            flat.len(),
            document.results.iter().map(Node::size).sum::<usize>()
        );
        println!("{}", serde_json::to_string(&flat)?);
        Ok(())
    }
}
