use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDiagnostics {
    pub warnings: Vec<ConfigWarning>,
    pub errors: Vec<ConfigValidationError>,
}

impl ValidationDiagnostics {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("logging.level `{value}` is not a valid filter (normalized to `{normalized}`); falling back to `info`")]
    LoggingLevelInvalid { value: String, normalized: String },
    #[error("generated_sources.output_dir is empty; wrappers will be written into the workspace root")]
    OutputDirEmpty,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{toml_path} = `{value}` is not a valid Java identifier")]
    NotAnIdentifier { toml_path: String, value: String },
    #[error("{toml_path} = `{value}` is a reserved Java keyword")]
    ReservedKeyword { toml_path: String, value: String },
    #[error("{toml_path} = `{value}` is not a qualified Java name")]
    NotAQualifiedName { toml_path: String, value: String },
}

impl ConfigValidationError {
    pub fn toml_path(&self) -> &str {
        match self {
            ConfigValidationError::NotAnIdentifier { toml_path, .. }
            | ConfigValidationError::ReservedKeyword { toml_path, .. }
            | ConfigValidationError::NotAQualifiedName { toml_path, .. } => toml_path,
        }
    }
}
