//! Structural validation of font descriptors.
//!
//! Every provider `type` has a table of fields. Each field lists the runtime
//! types it accepts and may carry an extra check (`ascent <= height`, uniform
//! `chars` rows, referenced files exist). The first failing field stops
//! validation and is reported with its full path, such as
//! `providers[2].chars`.
//!
//! Validation runs on the raw JSON value so that type errors can be reported
//! precisely; only a validated descriptor should be built.
//!
//! ```
//! use mcfont_core::NamespaceLookup;
//! use mcfont_render::font::validate_font;
//! use serde_json::json;
//!
//! struct Everything;
//! impl NamespaceLookup for Everything {
//!     fn resolve_namespace(&self, id: &str, _: &[&str]) -> Option<String> {
//!         Some(id.replace(':', "/"))
//!     }
//! }
//!
//! let font = json!({"providers": [
//!     {"type": "bitmap", "file": "a:b.png", "height": 8, "ascent": 9, "chars": ["a"]}
//! ]});
//! let err = validate_font(&font, &Everything).unwrap_err();
//! assert_eq!(err.path, "providers[0].ascent");
//! ```

use std::fmt;

use mcfont_core::NamespaceLookup;
use serde_json::{Map, Value};

use super::descriptor::DEFAULT_BITMAP_HEIGHT;

/// Why a descriptor was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted/bracketed path to the offending value.
    pub path: String,
    pub kind: ValidationErrorKind,
}

/// The kind of validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The value at the path is not a JSON object.
    NotObject,
    /// The value has none of the accepted types.
    WrongType { expected: String },
    /// An array entry has none of the accepted types.
    ArrayEntries { expected: String },
    /// A map value has none of the accepted types.
    MapValues { expected: String },
    /// The provider `type` is not a known provider.
    UnknownProvider { allowed: String },
    /// The value has the right type but failed a field check.
    Check(String),
}

impl ValidationError {
    fn new(path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.kind {
            ValidationErrorKind::NotObject => write!(f, "Entry `{path}` is not object"),
            ValidationErrorKind::WrongType { expected } => {
                write!(f, "Property `{path}` must be `{expected}`")
            }
            ValidationErrorKind::ArrayEntries { expected } => {
                write!(f, "Entries of array `{path}` must be `{expected}`")
            }
            ValidationErrorKind::MapValues { expected } => {
                write!(f, "Values of object `{path}` must be `{expected}`")
            }
            ValidationErrorKind::UnknownProvider { allowed } => {
                write!(f, "Property `{path}` must be `{allowed}`")
            }
            ValidationErrorKind::Check(reason) => {
                write!(f, "Property `{path}` validation failed ({reason})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A runtime type accepted by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// The field may be absent.
    Undefined,
    /// `[T]`: an array whose entries are any of the listed types.
    ArrayOf(&'static [FieldType]),
    /// `[T,U]`: an array with exactly these positional types.
    Tuple(&'static [FieldType]),
    /// `<string,V>`: an object whose values are any of the listed types.
    MapOf(&'static [FieldType]),
    /// A nested object checked against the field's nested table.
    Ref,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Number => f.write_str("number"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Undefined => f.write_str("undefined"),
            FieldType::ArrayOf(types) | FieldType::Tuple(types) => write!(f, "[{}]", join(types)),
            FieldType::MapOf(types) => write!(f, "<string,{}>", join(types)),
            FieldType::Ref => f.write_str("ref"),
        }
    }
}

fn join(types: &[FieldType]) -> String {
    types.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// A field check: the value, its parent object, and the namespace lookup.
type FieldCheck = fn(&Value, &Map<String, Value>, &dyn NamespaceLookup) -> Result<(), String>;

/// One entry of a provider field table.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub types: &'static [FieldType],
    check: Option<FieldCheck>,
    nested: &'static [FieldSpec],
}

impl FieldSpec {
    const fn new(name: &'static str, types: &'static [FieldType]) -> Self {
        Self {
            name,
            types,
            check: None,
            nested: &[],
        }
    }

    const fn checked(name: &'static str, types: &'static [FieldType], check: FieldCheck) -> Self {
        Self {
            name,
            types,
            check: Some(check),
            nested: &[],
        }
    }

    const fn nested(name: &'static str, types: &'static [FieldType], nested: &'static [FieldSpec]) -> Self {
        Self {
            name,
            types,
            check: None,
            nested,
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("types", &self.types)
            .field("checked", &self.check.is_some())
            .finish()
    }
}

use FieldType::{Number, Ref, Undefined};

const STRING: &[FieldType] = &[FieldType::String];
const NUMBER: &[FieldType] = &[Number];

const REFERENCE_FIELDS: &[FieldSpec] = &[FieldSpec::checked("id", STRING, check_font_id)];

const BITMAP_FIELDS: &[FieldSpec] = &[
    FieldSpec::checked("file", STRING, check_texture),
    FieldSpec::new("height", &[Number, Undefined]),
    FieldSpec::checked("ascent", NUMBER, check_ascent),
    FieldSpec::checked("chars", &[FieldType::ArrayOf(STRING)], check_chars),
];

const SPACE_FIELDS: &[FieldSpec] = &[FieldSpec::new("advances", &[FieldType::MapOf(NUMBER)])];

const TTF_FIELDS: &[FieldSpec] = &[
    FieldSpec::checked("file", STRING, check_ttf),
    FieldSpec::new("shift", &[FieldType::Tuple(&[Number, Number])]),
    FieldSpec::new("size", NUMBER),
    FieldSpec::new("oversample", NUMBER),
    FieldSpec::new("skip", &[FieldType::ArrayOf(STRING), FieldType::String]),
];

const SIZE_OVERRIDE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("from", STRING),
    FieldSpec::new("to", STRING),
    FieldSpec::new("left", NUMBER),
    FieldSpec::new("right", NUMBER),
];

const UNIHEX_FIELDS: &[FieldSpec] = &[
    FieldSpec::checked("hex_file", STRING, check_archive),
    FieldSpec::nested("size_overrides", &[FieldType::ArrayOf(&[Ref])], SIZE_OVERRIDE_FIELDS),
];

/// Provider types and their field tables, in declaration order.
pub const PROVIDER_FIELDS: &[(&str, &[FieldSpec])] = &[
    ("reference", REFERENCE_FIELDS),
    ("bitmap", BITMAP_FIELDS),
    ("space", SPACE_FIELDS),
    ("ttf", TTF_FIELDS),
    ("unihex", UNIHEX_FIELDS),
];

/// Validate a font descriptor.
///
/// File references are looked up through `lookup`. Returns the first
/// failure found, walking providers in declaration order and fields in
/// table order.
pub fn validate_font(descriptor: &Value, lookup: &dyn NamespaceLookup) -> Result<(), ValidationError> {
    let Some(providers) = descriptor.get("providers").and_then(Value::as_array) else {
        return Err(ValidationError::new(
            "providers",
            ValidationErrorKind::WrongType {
                expected: FieldType::ArrayOf(&[Ref]).to_string(),
            },
        ));
    };

    for (i, provider) in providers.iter().enumerate() {
        let path = format!("providers[{i}]");
        let kind = provider.get("type").and_then(Value::as_str);
        let Some((_, fields)) = PROVIDER_FIELDS.iter().find(|(name, _)| Some(*name) == kind) else {
            let allowed = PROVIDER_FIELDS.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(",");
            return Err(ValidationError::new(
                format!("{path}.type"),
                ValidationErrorKind::UnknownProvider { allowed },
            ));
        };
        validate_object(provider, fields, &path, lookup)?;
    }

    tracing::trace!(target: "mcfont_render::font", providers = providers.len(), "font descriptor valid");
    Ok(())
}

fn validate_object(
    value: &Value,
    fields: &[FieldSpec],
    path: &str,
    lookup: &dyn NamespaceLookup,
) -> Result<(), ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::new(path, ValidationErrorKind::NotObject));
    };

    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        validate_field(object, field, &field_path, lookup)?;
    }
    Ok(())
}

/// A field passes when any of its types matches and the check (if any)
/// accepts the value. Otherwise the last failure is reported.
fn validate_field(
    object: &Map<String, Value>,
    field: &FieldSpec,
    path: &str,
    lookup: &dyn NamespaceLookup,
) -> Result<(), ValidationError> {
    let value = object.get(field.name);
    let mut failure = None;

    for ty in field.types {
        if let Err(e) = check_type(value, *ty, field, path, lookup) {
            failure = Some(e);
            continue;
        }
        let Some(check) = field.check else {
            return Ok(());
        };
        match check(value.unwrap_or(&Value::Null), object, lookup) {
            Ok(()) => return Ok(()),
            Err(reason) => failure = Some(ValidationError::new(path, ValidationErrorKind::Check(reason))),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn check_type(
    value: Option<&Value>,
    ty: FieldType,
    field: &FieldSpec,
    path: &str,
    lookup: &dyn NamespaceLookup,
) -> Result<(), ValidationError> {
    let wrong_type = || {
        ValidationError::new(
            path,
            ValidationErrorKind::WrongType {
                expected: ty.to_string(),
            },
        )
    };

    match ty {
        FieldType::ArrayOf(entry_types) => {
            let entries = value.and_then(Value::as_array).ok_or_else(wrong_type)?;
            for (i, entry) in entries.iter().enumerate() {
                let entry_path = format!("{path}[{i}]");
                check_any(entry, entry_types, field, &entry_path, lookup).map_err(|e| {
                    e.unwrap_or_else(|| {
                        ValidationError::new(
                            path,
                            ValidationErrorKind::ArrayEntries {
                                expected: ty.to_string(),
                            },
                        )
                    })
                })?;
            }
            Ok(())
        }
        FieldType::Tuple(positions) => {
            let entries = value.and_then(Value::as_array).ok_or_else(wrong_type)?;
            let matches = entries.len() == positions.len()
                && entries.iter().zip(positions).all(|(entry, ty)| is_primitive(Some(entry), *ty));
            if matches { Ok(()) } else { Err(wrong_type()) }
        }
        FieldType::MapOf(value_types) => {
            let map = value.and_then(Value::as_object).ok_or_else(wrong_type)?;
            // JSON object keys are always strings, so only values need checking.
            for (key, entry) in map {
                let entry_path = format!("{path}.{key}");
                check_any(entry, value_types, field, &entry_path, lookup).map_err(|e| {
                    e.unwrap_or_else(|| {
                        ValidationError::new(
                            path,
                            ValidationErrorKind::MapValues {
                                expected: join(value_types),
                            },
                        )
                    })
                })?;
            }
            Ok(())
        }
        FieldType::Ref => match value {
            Some(v) => validate_object(v, field.nested, path, lookup),
            None => Err(wrong_type()),
        },
        primitive => {
            if is_primitive(value, primitive) {
                Ok(())
            } else {
                Err(wrong_type())
            }
        }
    }
}

/// Check a collection entry against its allowed types.
///
/// `Err(Some(_))` carries a nested object failure, which is more precise than
/// the generic entry-type message produced for `Err(None)`.
fn check_any(
    entry: &Value,
    types: &[FieldType],
    field: &FieldSpec,
    path: &str,
    lookup: &dyn NamespaceLookup,
) -> Result<(), Option<ValidationError>> {
    let mut nested = None;
    for ty in types {
        match ty {
            FieldType::Ref => match validate_object(entry, field.nested, path, lookup) {
                Ok(()) => return Ok(()),
                Err(e) => nested = Some(e),
            },
            primitive if is_primitive(Some(entry), *primitive) => return Ok(()),
            _ => {}
        }
    }
    Err(nested)
}

fn is_primitive(value: Option<&Value>, ty: FieldType) -> bool {
    match (ty, value) {
        (FieldType::Undefined, None) => true,
        (FieldType::String, Some(Value::String(_))) => true,
        (FieldType::Number, Some(Value::Number(_))) => true,
        (FieldType::Boolean, Some(Value::Bool(_))) => true,
        _ => false,
    }
}

// ============================================================================
// FIELD CHECKS
// ============================================================================

fn check_file(
    value: &Value,
    suffix: &str,
    prefix: &[&str],
    missing: &str,
    lookup: &dyn NamespaceLookup,
) -> Result<(), String> {
    let id = value.as_str().unwrap_or_default();
    if id.to_lowercase() != id {
        return Err("namespace must be lowercase".into());
    }
    match lookup.resolve_namespace(&format!("{id}{suffix}"), prefix) {
        Some(_) => Ok(()),
        None => Err(missing.into()),
    }
}

fn check_font_id(value: &Value, _: &Map<String, Value>, lookup: &dyn NamespaceLookup) -> Result<(), String> {
    check_file(value, ".json", &["font"], "json file doesn't exist", lookup)
}

fn check_texture(value: &Value, _: &Map<String, Value>, lookup: &dyn NamespaceLookup) -> Result<(), String> {
    check_file(value, "", &["textures"], "png file doesn't exist", lookup)
}

fn check_ttf(value: &Value, _: &Map<String, Value>, lookup: &dyn NamespaceLookup) -> Result<(), String> {
    check_file(value, "", &["font"], "ttf/otf file doesn't exist", lookup)
}

fn check_archive(value: &Value, _: &Map<String, Value>, lookup: &dyn NamespaceLookup) -> Result<(), String> {
    check_file(value, "", &[], "zip file doesn't exist", lookup)
}

fn check_ascent(value: &Value, object: &Map<String, Value>, _: &dyn NamespaceLookup) -> Result<(), String> {
    let ascent = value.as_f64().unwrap_or_default();
    let height = object
        .get("height")
        .and_then(Value::as_f64)
        .unwrap_or(f64::from(DEFAULT_BITMAP_HEIGHT));
    if ascent <= height {
        Ok(())
    } else {
        Err("ascent cannot be higher than height".into())
    }
}

fn check_chars(value: &Value, _: &Map<String, Value>, _: &dyn NamespaceLookup) -> Result<(), String> {
    let rows: Vec<&str> = value
        .as_array()
        .map(|rows| rows.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let Some(first) = rows.first().filter(|row| !row.is_empty()) else {
        return Err("must have at least one entry".into());
    };
    let len = first.chars().count();
    if rows.iter().all(|row| row.chars().count() == len) {
        Ok(())
    } else {
        Err("all entries must be the same length".into())
    }
}
