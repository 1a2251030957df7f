use chrono::Local;
use csv::{Writer, WriterBuilder};
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

use crate::Utils::engine_settings::LoggingSettings;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_steps::Step;

/// Initialize the global logger from the logging settings: terminal output and/or a
/// log_<date>_<time>.txt file. A logger that is already installed is left in place.
///
/// Returns the name of the log file, if one was created.
pub fn init_logger(settings: &LoggingSettings) -> Result<Option<String>, SymbolicError> {
    let level = settings.level;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.console {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    let mut file_name = None;
    if settings.file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let file = File::create(&name)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
        file_name = Some(name);
    }

    if !loggers.is_empty() {
        // a second init (tests, repeated demo runs) keeps the first logger
        let _ = CombinedLogger::init(loggers);
    }
    Ok(file_name)
}

fn write_steps<W: std::io::Write>(mut writer: Writer<W>, steps: &[Step]) -> Result<(), SymbolicError> {
    writer.write_record(["step", "rule", "expression"])?;
    for (i, step) in steps.iter().enumerate() {
        let index = (i + 1).to_string();
        writer.write_record([index.as_str(), step.description.as_str(), step.expression.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// save a step trace as csv with columns step, rule, expression
pub fn save_steps_to_csv<P: AsRef<Path>>(steps: &[Step], filename: P) -> Result<(), SymbolicError> {
    let writer = Writer::from_path(filename.as_ref())?;
    write_steps(writer, steps)?;
    info!("{} steps saved to {}", steps.len(), filename.as_ref().display());
    Ok(())
}

/// save a step trace as a tab separated text file
pub fn save_steps_to_file<P: AsRef<Path>>(steps: &[Step], filename: P) -> Result<(), SymbolicError> {
    let file = File::create(filename.as_ref())?;
    let writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
    write_steps(writer, steps)?;
    info!("{} steps saved to {}", steps.len(), filename.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::{Expr, VarSelector};
    use crate::symbolic::symbolic_engine_derivatives::differentiate;
    use std::fs;
    use tempfile::tempdir;

    fn sample_steps() -> Vec<Step> {
        let x = Expr::Var("x".to_string());
        differentiate(&(x.clone() + Expr::sin(x.boxed())), VarSelector::X).1
    }

    #[test]
    fn test_save_steps_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("steps.csv");
        let steps = sample_steps();
        save_steps_to_csv(&steps, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["step", "rule", "expression"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), steps.len());
        assert_eq!(&rows[0][1], steps[0].description.as_str());
        assert_eq!(&rows[0][0], "1");
    }

    #[test]
    fn test_save_steps_to_file_is_tab_separated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("steps.txt");
        let steps = sample_steps();
        save_steps_to_file(&steps, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("step\trule\texpression"));
        assert_eq!(text.lines().count(), steps.len() + 1);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("steps.csv");
        assert!(save_steps_to_csv(&sample_steps(), &path).is_err());
    }

    #[test]
    fn test_init_logger_without_sinks() {
        let settings = LoggingSettings {
            console: false,
            file: false,
            ..LoggingSettings::default()
        };
        assert_eq!(init_logger(&settings).unwrap(), None);
    }
}
