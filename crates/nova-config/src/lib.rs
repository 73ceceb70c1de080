use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once, OnceLock};

use nova_framework_immutable::{
    WrapperOptions, DEFAULT_EXCEPTION, DEFAULT_FIELD_NAME, DEFAULT_WRAPPER_PREFIX,
};
use parking_lot::ReentrantMutex;
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
pub use schema::json_schema;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
/// Top-level Nova configuration loaded from TOML.
///
/// ```toml
/// [immutable]
/// annotation = "com.example.ReadOnly"
/// prefix = "ReadOnly"
/// field_name = "delegate"
///
/// [generated_sources]
/// output_dir = "build/generated/sources/annotationProcessor/java/main"
///
/// [logging]
/// level = "nova.immutable=debug,info"
/// ```
pub struct NovaConfig {
    /// Immutable wrapper generation settings.
    #[serde(default)]
    pub immutable: ImmutableWrapperConfig,

    /// Where generated compilation units are written.
    #[serde(default)]
    pub generated_sources: GeneratedSourcesConfig,

    /// Global logging settings for Nova crates.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ImmutableWrapperConfig {
    /// Marker annotation, as a simple or fully qualified name.
    #[serde(default = "ImmutableWrapperConfig::default_annotation")]
    pub annotation: String,

    /// Prepended to the simple name of the annotated class.
    #[serde(default = "ImmutableWrapperConfig::default_prefix")]
    pub prefix: String,

    /// Name of the field that holds the wrapped instance.
    #[serde(default = "ImmutableWrapperConfig::default_field_name")]
    pub field_name: String,

    /// Fully qualified exception type thrown by mutator overrides.
    #[serde(default = "ImmutableWrapperConfig::default_exception")]
    pub exception: String,

    /// Emit `// Immutable methods` / `// Other methods` section comments.
    #[serde(default = "ImmutableWrapperConfig::default_section_comments")]
    pub section_comments: bool,
}

impl ImmutableWrapperConfig {
    fn default_annotation() -> String {
        nova_apt::IMMUTABLE_WRAPPER_ANNOTATION.to_owned()
    }

    fn default_prefix() -> String {
        DEFAULT_WRAPPER_PREFIX.to_owned()
    }

    fn default_field_name() -> String {
        DEFAULT_FIELD_NAME.to_owned()
    }

    fn default_exception() -> String {
        DEFAULT_EXCEPTION.to_owned()
    }

    fn default_section_comments() -> bool {
        true
    }

    pub fn wrapper_options(&self) -> WrapperOptions {
        WrapperOptions {
            prefix: self.prefix.clone(),
            field_name: self.field_name.clone(),
            exception: self.exception.clone(),
            section_comments: self.section_comments,
        }
    }
}

impl Default for ImmutableWrapperConfig {
    fn default() -> Self {
        Self {
            annotation: Self::default_annotation(),
            prefix: Self::default_prefix(),
            field_name: Self::default_field_name(),
            exception: Self::default_exception(),
            section_comments: Self::default_section_comments(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GeneratedSourcesConfig {
    /// Output root, relative to the workspace root unless absolute.
    #[serde(default = "GeneratedSourcesConfig::default_output_dir")]
    #[schemars(with = "String")]
    pub output_dir: PathBuf,
}

impl GeneratedSourcesConfig {
    fn default_output_dir() -> PathBuf {
        PathBuf::from(nova_apt::DEFAULT_GENERATED_SOURCES_DIR)
    }

    /// Absolute output root for a workspace.
    pub fn resolve(&self, workspace_root: &Path) -> PathBuf {
        nova_apt::generated_sources_root(workspace_root, Some(&self.output_dir))
    }
}

impl Default for GeneratedSourcesConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Nova crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path.
    ///
    /// If the file cannot be opened, file logging is disabled while stderr
    /// logging remains active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Create the effective `EnvFilter` for Nova tracing.
    ///
    /// `level` may be either a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string. If `RUST_LOG` is set,
    /// it is merged into the resulting filter.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(ConfigValidationError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a snippet of the input; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl NovaConfig {
    /// Load and validate a config file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Parse and validate a config from TOML text.
    ///
    /// Validation warnings are logged; the first validation error is returned
    /// as [`ConfigError::Invalid`].
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: NovaConfig = toml::from_str(text)?;
        let diagnostics = config.validate();
        for warning in &diagnostics.warnings {
            tracing::warn!(target: "nova.config", "{warning}");
        }
        if let Some(error) = diagnostics.errors.into_iter().next() {
            return Err(ConfigError::Invalid(error));
        }
        Ok(config)
    }
}

pub const NOVA_CONFIG_ENV_VAR: &str = "NOVA_CONFIG_PATH";

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Run `f` while holding Nova's config environment lock.
///
/// Environment variables are process-global; tests that set
/// [`NOVA_CONFIG_ENV_VAR`] wrap the mutation and the discovery call in this
/// helper so concurrent discovery never observes the temporary override.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Discover the Nova configuration file for a workspace root.
///
/// Search order:
/// 1) `NOVA_CONFIG_PATH` (absolute or relative to `workspace_root`)
/// 2) `nova.toml` in `workspace_root`
/// 3) `.nova.toml` in `workspace_root`
/// 4) `.nova/config.toml` in `workspace_root`
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(NOVA_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            workspace_root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["nova.toml", ".nova.toml", ".nova/config.toml"]
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Load the Nova configuration for a workspace root.
///
/// If no config is present, returns [`NovaConfig::default`] and `None`.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(NovaConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        tracing::debug!(target: "nova.config", root = %workspace_root.display(), "no config file found");
        return Ok((NovaConfig::default(), None));
    };

    let config = NovaConfig::load_from_path(&path)?;
    tracing::debug!(target: "nova.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}

struct MutexFileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl<'a> MakeWriter<'a> for MutexFileMakeWriter {
    type Writer = MutexFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A poisoned lock only means another thread panicked mid-write.
        let guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        MutexFileWriter { guard }
    }
}

struct MutexFileWriter<'a> {
    guard: std::sync::MutexGuard<'a, std::fs::File>,
}

impl Write for MutexFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging.
///
/// This function is safe to call multiple times; only the first call installs
/// a global subscriber.
pub fn init_tracing(logging: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = logging.env_filter();

        let file = logging.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = logging.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if logging.stderr {
            // `cargo test` output capture only works for the stdlib's `eprint!`
            // macros, which `TestWriter` goes through.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(std::io::stderr));
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(MutexFileMakeWriter {
                file: Arc::new(Mutex::new(file)),
            }));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if logging.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = logging.file.as_ref() {
                tracing::warn!(
                    target: "nova.config",
                    path = %path.display(),
                    "failed to open log file; file logging is disabled"
                );
            }
        }
    });
}
