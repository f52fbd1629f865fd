use crate::builder::FileSettings;
use crate::error::{LoggerError, LoggerErrorExt};
use crate::{ConsoleTarget, LevelFilter};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_SUFFIX: &str = "log";

/// Layers sit on top of the registry already wrapped by the [`EnvFilter`].
pub(crate) type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

pub(crate) fn console(target: ConsoleTarget) -> BoxedLayer {
    let layer = fmt::layer().compact().with_ansi(true);
    match target {
        ConsoleTarget::Stdout => layer.with_writer(std::io::stdout).boxed(),
        ConsoleTarget::Stderr => layer.with_writer(std::io::stderr).boxed(),
    }
}

pub(crate) fn file(
    name: &str,
    settings: &FileSettings,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    let directory = &settings.directory;
    fs::create_dir_all(directory)
        .context(format!("cannot create {}", directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if settings.json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}

/// `level` as the default directive, then `directives` or else `RUST_LOG`.
pub(crate) fn filter(level: LevelFilter, directives: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    let Some(directives) = directives else {
        return Ok(builder.from_env_lossy());
    };

    builder.parse(directives).map_err(|err| LoggerError::InvalidConfiguration {
        message: format!("invalid filter '{directives}': {err}").into(),
        context: None,
    })
}
