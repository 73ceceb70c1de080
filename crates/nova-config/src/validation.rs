use nova_types::{is_java_identifier, is_java_keyword, is_qualified_name};

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{LoggingConfig, NovaConfig};

impl NovaConfig {
    /// Validate semantic invariants for a configuration.
    ///
    /// Validation attempts to report as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_immutable(self, &mut out);
        validate_generated_sources(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_immutable(config: &NovaConfig, out: &mut ValidationDiagnostics) {
    let immutable = &config.immutable;

    check_identifier("immutable.prefix", &immutable.prefix, out);
    if check_identifier("immutable.field_name", &immutable.field_name, out)
        && is_java_keyword(&immutable.field_name)
    {
        out.errors.push(ConfigValidationError::ReservedKeyword {
            toml_path: "immutable.field_name".to_string(),
            value: immutable.field_name.clone(),
        });
    }

    for (toml_path, value) in [
        ("immutable.annotation", &immutable.annotation),
        ("immutable.exception", &immutable.exception),
    ] {
        if !is_qualified_name(value.trim_start_matches('@')) {
            out.errors.push(ConfigValidationError::NotAQualifiedName {
                toml_path: toml_path.to_string(),
                value: value.clone(),
            });
        }
    }
}

fn check_identifier(toml_path: &str, value: &str, out: &mut ValidationDiagnostics) -> bool {
    if is_java_identifier(value) {
        return true;
    }
    out.errors.push(ConfigValidationError::NotAnIdentifier {
        toml_path: toml_path.to_string(),
        value: value.to_string(),
    });
    false
}

fn validate_generated_sources(config: &NovaConfig, out: &mut ValidationDiagnostics) {
    if config.generated_sources.output_dir.as_os_str().is_empty() {
        out.warnings.push(ConfigWarning::OutputDirEmpty);
    }
}

fn validate_logging(config: &NovaConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}
