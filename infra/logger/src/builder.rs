use crate::error::LoggerError;
use crate::layers::{self, BoxedLayer};
use crate::{ConsoleTarget, LevelFilter, Logger, Rotation};
use private::Sealed;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_MAX_FILES: usize = 10;

mod private {
    pub trait Sealed {}
}

/// Builder state before `.name(..)`.
#[derive(Debug)]
pub struct NoName;

/// Builder state once the logger is named.
#[derive(Debug)]
pub struct WithName(String);

/// Builder state without file output.
#[derive(Debug)]
pub struct NoFile;

/// Builder state with a log directory; unlocks the file-only options.
#[derive(Debug)]
pub struct WithFile(pub(crate) FileSettings);

impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

#[derive(Debug)]
pub(crate) struct FileSettings {
    pub(crate) directory: PathBuf,
    pub(crate) rotation: Rotation,
    pub(crate) max_files: usize,
    pub(crate) json: bool,
}

#[derive(Debug)]
pub(crate) struct ConsoleSettings {
    pub(crate) enabled: bool,
    pub(crate) target: ConsoleTarget,
    pub(crate) level: LevelFilter,
    pub(crate) directives: Option<String>,
}

/// Type-state builder for the global subscriber. `init` is only reachable once named.
#[must_use = "nothing is installed until .init() is called"]
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    name: N,
    file: F,
    console: ConsoleSettings,
}

impl LoggerBuilder {
    pub(crate) const fn new() -> Self {
        Self {
            name: NoName,
            file: NoFile,
            console: ConsoleSettings {
                enabled: true,
                target: ConsoleTarget::Stderr,
                level: LevelFilter::INFO,
                directives: None,
            },
        }
    }
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), file: self.file, console: self.console }
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Base level for every target without an explicit directive.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.console.level = level;
        self
    }

    /// Extra filter directives such as `candor_cache=debug`, applied on top of the level.
    ///
    /// A malformed directive makes [`init`](Self::init) fail.
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.console.directives = Some(directives.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console.enabled = enabled;
        self
    }

    pub const fn console_target(mut self, target: ConsoleTarget) -> Self {
        self.console.target = target;
        self
    }

    /// Writes a rolling file into `directory` (created on `init`).
    pub fn path(self, directory: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let file = FileSettings {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        };
        LoggerBuilder { name: self.name, file: WithFile(file), console: self.console }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Number of rotated files kept on disk.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.file.0.max_files = max;
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.file.0.rotation = rotation;
        self
    }

    /// One JSON object per line instead of human-readable text.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.file.0.json = enabled;
        self
    }

    /// Installs console and file output as the global subscriber.
    ///
    /// # Errors
    /// - [`LoggerError::InvalidConfiguration`] for a blank name, `max_files == 0` or bad directives.
    /// - [`LoggerError::Directory`] / [`LoggerError::Appender`] when the log file cannot be opened.
    /// - [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = checked_name(&self.name)?;
        if self.file.0.max_files == 0 {
            return Err(invalid("max_files must be greater than zero"));
        }

        let mut installed = console_layers(&self.console);
        let (file_layer, guard) = layers::file(name, &self.file.0)?;
        installed.push(file_layer);

        install(&self.console, installed)?;
        Ok(Logger { guard: Some(guard) })
    }
}

impl LoggerBuilder<WithName, NoFile> {
    /// Installs console output as the global subscriber.
    ///
    /// # Errors
    /// - [`LoggerError::InvalidConfiguration`] for a blank name, bad directives or a
    ///   disabled console with no file configured.
    /// - [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        checked_name(&self.name)?;
        let installed = console_layers(&self.console);
        if installed.is_empty() {
            return Err(invalid("no output enabled, turn on the console or add a path"));
        }

        install(&self.console, installed)?;
        Ok(Logger { guard: None })
    }
}

fn console_layers(settings: &ConsoleSettings) -> Vec<BoxedLayer> {
    if settings.enabled { vec![layers::console(settings.target)] } else { Vec::new() }
}

fn install(settings: &ConsoleSettings, installed: Vec<BoxedLayer>) -> Result<(), LoggerError> {
    let filter = layers::filter(settings.level, settings.directives.as_deref())?;
    tracing_subscriber::registry().with(filter).with(installed).try_init()?;
    Ok(())
}

fn checked_name(name: &WithName) -> Result<&str, LoggerError> {
    let name = name.0.trim();
    if name.is_empty() { Err(invalid("logger name cannot be empty")) } else { Ok(name) }
}

const fn invalid(message: &'static str) -> LoggerError {
    LoggerError::InvalidConfiguration { message: std::borrow::Cow::Borrowed(message), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn defaults_log_info_to_stderr() {
        let builder = Logger::builder().name("candor").env_filter("candor=debug");
        assert!(builder.console.enabled);
        assert_eq!(builder.console.target, ConsoleTarget::Stderr);
        assert_eq!(builder.console.level, LevelFilter::INFO);
        assert_eq!(builder.console.directives.as_deref(), Some("candor=debug"));
    }

    #[test]
    fn file_options_are_recorded() {
        let builder = Logger::builder()
            .name("candor")
            .console_target(ConsoleTarget::Stdout)
            .path("/var/log/candor")
            .max_files(5)
            .rotation(Rotation::HOURLY)
            .json(true)
            .level(LevelFilter::DEBUG);

        let file = &builder.file.0;
        assert_eq!(file.directory, PathBuf::from("/var/log/candor"));
        assert_eq!(file.max_files, 5);
        assert!(file.json);
        assert_eq!(builder.console.target, ConsoleTarget::Stdout);
        assert_eq!(builder.console.level, LevelFilter::DEBUG);
    }

    #[test]
    #[serial]
    fn rejected_settings_install_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;

        let blank = Logger::builder().name("  ").init().unwrap_err();
        let silent = Logger::builder().name("candor").console(false).init().unwrap_err();
        let no_files = Logger::builder().name("candor").path(tmp.path()).max_files(0).init().unwrap_err();
        for err in [blank, silent, no_files] {
            assert!(matches!(err, LoggerError::InvalidConfiguration { .. }), "{err}");
        }
        assert!(
            std::fs::read_dir(tmp.path())?.next().is_none(),
            "validation happens before any file is opened"
        );
        Ok(())
    }
}
