use crate::types::DependencyClass;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

/// Top-level key holding lifecycle scripts.
pub const SCRIPTS_KEY: &str = "scripts";
/// Top-level boolean set once the protect policy has processed the manifest.
pub const MARKER_KEY: &str = "snyk";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse manifest: top-level value must be an object, found {0}")]
    NotAnObject(&'static str),
    #[error("failed to write manifest file: {0}")]
    Write(#[source] std::io::Error),
}

/// An in-memory `package.json` document.
///
/// Keys keep their original order so a load/edit/save cycle only touches what
/// was edited. Only `scripts`, the four dependency classes and the marker flag
/// have typed accessors; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed JSON value. Anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ManifestError::NotAnObject(json_type(&other))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn scripts(&self) -> Option<&Map<String, Value>> {
        self.0.get(SCRIPTS_KEY).and_then(Value::as_object)
    }

    /// Command line of a script, if present and a string.
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts()
            .and_then(|scripts| scripts.get(name))
            .and_then(Value::as_str)
    }

    /// Like [`Manifest::script`], with absent scripts read as empty.
    pub fn script_or_empty(&self, name: &str) -> &str {
        self.script(name).unwrap_or_default()
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.script(name).is_some()
    }

    /// The `scripts` object, created if missing.
    pub fn scripts_mut(&mut self) -> &mut Map<String, Value> {
        self.object_mut(SCRIPTS_KEY)
    }

    pub fn set_script(&mut self, name: &str, command: impl Into<String>) {
        self.scripts_mut()
            .insert(name.to_owned(), Value::String(command.into()));
    }

    pub fn dependency_class(&self, class: DependencyClass) -> Option<&Map<String, Value>> {
        self.0.get(class.key()).and_then(Value::as_object)
    }

    /// Existing dependency class object. Never creates one.
    pub fn dependency_class_existing_mut(
        &mut self,
        class: DependencyClass,
    ) -> Option<&mut Map<String, Value>> {
        self.0.get_mut(class.key()).and_then(Value::as_object_mut)
    }

    /// Dependency class object, created if missing.
    pub fn dependency_class_mut(&mut self, class: DependencyClass) -> &mut Map<String, Value> {
        self.object_mut(class.key())
    }

    pub fn marker(&self) -> bool {
        self.0
            .get(MARKER_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_marker(&mut self) {
        self.0.insert(MARKER_KEY.to_owned(), Value::Bool(true));
    }

    /// Two-space pretty JSON with a trailing newline, as npm writes it.
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        let mut out = serde_json::to_string_pretty(&self.0)?;
        out.push('\n');
        Ok(out)
    }

    fn object_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        let slot = self
            .0
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            warn!(
                "replacing non-object '{key}' ({}) with an empty object",
                json_type(slot)
            );
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            unreachable!("'{key}' was just set to an object");
        };
        map
    }
}

impl TryFrom<Value> for Manifest {
    type Error = ManifestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse_manifest_str(input: &str) -> Result<Manifest, ManifestError> {
    let value: Value = serde_json::from_str(input)?;
    Manifest::from_value(value)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

/// Replace `dest` with the serialized manifest via a same-directory temp file.
pub fn write_manifest_file(dest: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    let content = manifest.to_json_pretty()?;
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(ManifestError::Write)?;
    tmp.write_all(content.as_bytes()).map_err(ManifestError::Write)?;
    tmp.as_file().sync_all().map_err(ManifestError::Write)?;
    tmp.persist(dest).map_err(|e| ManifestError::Write(e.error))?;
    Ok(())
}
