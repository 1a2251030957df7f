//! Engine, logging and trace settings read from a task document.
//!
//! ```text
//! engine
//!  riemann_steps: 100
//!  taylor_order: 5
//!  quad_degree: 20
//! logging
//!  level: info
//!  console: true
//!  file: true
//! trace
//!  tables: true
//!  csv_dir: results
//! ```
//! Every key is optional, a missing key keeps its default.
use log::LevelFilter;
use std::fs;
use std::path::Path;

use crate::Utils::task_parser::{DocumentMap, Value, parse_settings_document, template_of};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_integration::DEFAULT_RIEMANN_STEPS;

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub console: bool,
    /// write a timestamped log_<date>.txt next to the working directory
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: LevelFilter::Info,
            console: true,
            file: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalculusSettings {
    /// cells per axis of the double-integral grid
    pub riemann_steps: usize,
    pub taylor_order: usize,
    /// Gauss-Legendre nodes for the definite-integral fallback
    pub quad_degree: usize,
}

impl Default for CalculusSettings {
    fn default() -> Self {
        CalculusSettings {
            riemann_steps: DEFAULT_RIEMANN_STEPS,
            taylor_order: 5,
            quad_degree: 20,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceSettings {
    /// render step traces as tables in the demo runner
    pub tables: bool,
    /// directory for csv exports of step traces, none disables export
    pub csv_dir: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineSettings {
    pub engine: CalculusSettings,
    pub logging: LoggingSettings,
    pub trace: TraceSettings,
}

fn settings_template() -> DocumentMap {
    template_of(&[
        ("engine", &["riemann_steps", "taylor_order", "quad_degree"]),
        ("logging", &["level", "console", "file"]),
        ("trace", &["tables", "csv_dir"]),
    ])
}

// first value of section.key, None when the key is absent
fn first<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Option<&'a Value> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .and_then(|values| values.as_ref())
        .and_then(|values| values.first())
}

fn read_count(doc: &DocumentMap, section: &str, key: &str, default: usize) -> Result<usize, SymbolicError> {
    match first(doc, section, key) {
        None => Ok(default),
        Some(value) => value
            .as_integer()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| {
                SymbolicError::Settings(format!("{section}.{key} must be a non-negative integer, got {value}"))
            }),
    }
}

fn read_flag(doc: &DocumentMap, section: &str, key: &str, default: bool) -> Result<bool, SymbolicError> {
    match first(doc, section, key) {
        None => Ok(default),
        Some(value) => value
            .as_boolean()
            .ok_or_else(|| SymbolicError::Settings(format!("{section}.{key} must be true or false, got {value}"))),
    }
}

fn parse_level(value: &Value) -> Result<LevelFilter, SymbolicError> {
    match value.to_string().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(SymbolicError::Settings(format!(
            "logging.level must be off, error, warn, info, debug or trace, got {other}"
        ))),
    }
}

impl EngineSettings {
    /// Settings from the text of a task document.
    pub fn from_document(input: &str) -> Result<Self, SymbolicError> {
        let template = settings_template();
        let doc = parse_settings_document(input, Some(&template))?;
        let defaults = EngineSettings::default();

        let engine = CalculusSettings {
            riemann_steps: read_count(&doc, "engine", "riemann_steps", defaults.engine.riemann_steps)?,
            taylor_order: read_count(&doc, "engine", "taylor_order", defaults.engine.taylor_order)?,
            quad_degree: read_count(&doc, "engine", "quad_degree", defaults.engine.quad_degree)?,
        };
        if engine.riemann_steps == 0 {
            return Err(SymbolicError::InvalidGrid(0));
        }

        let level = match first(&doc, "logging", "level") {
            Some(value) => parse_level(value)?,
            None => defaults.logging.level,
        };
        let logging = LoggingSettings {
            level,
            console: read_flag(&doc, "logging", "console", defaults.logging.console)?,
            file: read_flag(&doc, "logging", "file", defaults.logging.file)?,
        };

        let trace = TraceSettings {
            tables: read_flag(&doc, "trace", "tables", defaults.trace.tables)?,
            csv_dir: first(&doc, "trace", "csv_dir").map(|v| v.to_string()),
        };

        Ok(EngineSettings { engine, logging, trace })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SymbolicError> {
        let text = fs::read_to_string(path)?;
        Self::from_document(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.engine.riemann_steps, 100);
        assert_eq!(settings.logging.level, LevelFilter::Info);
        assert!(settings.logging.console);
        assert!(!settings.trace.tables);
    }

    #[test]
    fn test_full_document() {
        let doc = "engine\n riemann_steps: 40\n taylor_order: 3\n quad_degree: 8\n\
                   logging\n level: debug\n console: false\n file: true\n\
                   trace\n tables: true\n csv_dir: out\n";
        let settings = EngineSettings::from_document(doc).unwrap();
        assert_eq!(
            settings.engine,
            CalculusSettings { riemann_steps: 40, taylor_order: 3, quad_degree: 8 }
        );
        assert_eq!(settings.logging.level, LevelFilter::Debug);
        assert!(!settings.logging.console);
        assert!(settings.logging.file);
        assert_eq!(settings.trace.csv_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings = EngineSettings::from_document("logging\n level: WARN\n").unwrap();
        assert_eq!(settings.logging.level, LevelFilter::Warn);
        assert_eq!(settings.engine, CalculusSettings::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineSettings::from_document("engine\n riemann_steps: 0\n"),
            Err(SymbolicError::InvalidGrid(0))
        ));
        assert!(matches!(
            EngineSettings::from_document("engine\n taylor_order: -2\n"),
            Err(SymbolicError::Settings(_))
        ));
        assert!(matches!(
            EngineSettings::from_document("logging\n level: loud\n"),
            Err(SymbolicError::Settings(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# demo settings\nengine\n riemann_steps: 25").unwrap();
        let settings = EngineSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.engine.riemann_steps, 25);
        assert!(matches!(
            EngineSettings::from_file("/definitely/not/here.txt"),
            Err(SymbolicError::Io(_))
        ));
    }

    #[test]
    fn test_empty_csv_dir_means_no_export() {
        let settings = EngineSettings::from_document("trace\n csv_dir:\n tables: true\n").unwrap();
        assert_eq!(settings.trace.csv_dir, None);
        assert!(settings.trace.tables);
    }
}
