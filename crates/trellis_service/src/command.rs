//! Fast parsing through an external command.

use std::process::Command;

use trellis_config::ParserConfig;
use trellis_param::{FastParser, ParseError, ParsedFile};

/// Runs an external program that prints a parsed-file JSON document.
///
/// The program is invoked as `command args... <path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    /// Creates a parser running `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments placed before the file path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds a parser from the `[parser]` section, if a command is set.
    pub fn from_config(config: &ParserConfig) -> Option<Self> {
        let program = config.command.as_deref()?.trim();
        if program.is_empty() {
            return None;
        }
        Some(Self::new(program).with_args(config.args.iter().cloned()))
    }

    /// The executable.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl FastParser for CommandParser {
    fn fast(&self, path: &str) -> Result<ParsedFile, ParseError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| ParseError::Io {
                path: path.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(ParseError::Failed {
                path: path.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        serde_json::from_slice(&output.stdout).map_err(|e| ParseError::Malformed {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_command() {
        assert!(CommandParser::from_config(&ParserConfig::default()).is_none());
        let config = ParserConfig {
            command: Some("hdl-fast".into()),
            args: vec!["--json".into()],
        };
        let parser = CommandParser::from_config(&config).unwrap();
        assert_eq!(parser, CommandParser::new("hdl-fast").with_args(["--json"]));
    }

    #[test]
    fn missing_program_is_io_error() {
        let parser = CommandParser::new("trellis-no-such-parser-binary");
        assert!(matches!(parser.fast("/a.v"), Err(ParseError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn reads_json_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("top.v");
        std::fs::write(
            &file,
            r#"{"languageId": "vlog", "content": [{"name": "top", "instances": [{"name": "u0", "type": "leaf"}]}]}"#,
        )
        .unwrap();
        let parsed = CommandParser::new("cat")
            .fast(&file.to_string_lossy())
            .unwrap();
        assert_eq!(parsed.content[0].instances[0].type_name, "leaf");
    }

    #[cfg(unix)]
    #[test]
    fn non_json_output_is_malformed() {
        let parser = CommandParser::new("echo");
        assert!(matches!(parser.fast("module"), Err(ParseError::Malformed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_failure() {
        let parser = CommandParser::new("false");
        assert!(matches!(parser.fast("/a.v"), Err(ParseError::Failed { .. })));
    }
}
