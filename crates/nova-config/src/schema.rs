use schemars::schema::{RootSchema, Schema};
use schemars::schema_for;
use serde_json::json;

use crate::NovaConfig;

const JAVA_IDENTIFIER_PATTERN: &str = r"^[\p{L}_$][\p{L}\p{N}_$]*$";

/// JSON schema for `nova.toml`.
///
/// Intended for editor tooling (TOML JSON schema integration) and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(NovaConfig);
    apply_semantic_constraints(&mut schema);
    schema
}

fn apply_semantic_constraints(schema: &mut RootSchema) {
    // Mirror the identifier checks from `NovaConfig::validate` so editors flag
    // bad names without running Nova.
    constrain_property(
        schema,
        "ImmutableWrapperConfig",
        "prefix",
        schema_from_json(json!({ "pattern": JAVA_IDENTIFIER_PATTERN })),
    );
    constrain_property(
        schema,
        "ImmutableWrapperConfig",
        "field_name",
        schema_from_json(json!({
            "pattern": JAVA_IDENTIFIER_PATTERN,
            "not": { "enum": nova_types::JAVA_KEYWORDS }
        })),
    );
}

fn constrain_property(
    schema: &mut RootSchema,
    definition_name: &str,
    property_name: &str,
    constraint: Schema,
) {
    let Some(Schema::Object(definition)) = schema.definitions.get_mut(definition_name) else {
        return;
    };
    let Some(Schema::Object(property)) = definition.object().properties.get_mut(property_name)
    else {
        return;
    };
    property
        .subschemas()
        .all_of
        .get_or_insert_with(Vec::new)
        .push(constraint);
}

fn schema_from_json(value: serde_json::Value) -> Schema {
    serde_json::from_value(value).expect("valid json schema")
}
