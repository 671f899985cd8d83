//! Configuration file discovery and decoding.
//!
//! The file is decoded into a flat `name -> string` layer. Nested mappings are
//! flattened with `.` separators, sequences are joined with `,`, nulls are skipped.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ConfigError;
use super::defaults;

/// Supported config file content types, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl FileFormat {
    /// Detects the format from a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Where the config file is expected to live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Path supplied by the user; it must exist and parse.
    Explicit(PathBuf),
    /// Default path under the home directory; absence is not an error.
    Default(PathBuf),
}

impl ConfigLocation {
    /// Resolves the location from an optional explicit path.
    ///
    /// Without an explicit path, the default is `<home>/.falcoctl/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirUnavailable`] if no explicit path is given
    /// and `home` is `None`.
    pub fn resolve(explicit: Option<&Path>, home: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Ok(Self::Explicit(path.to_path_buf()));
        }

        let home = home.ok_or(ConfigError::HomeDirUnavailable)?;
        let file_name = format!("{}.{}", defaults::CONFIG_NAME, defaults::CONFIG_EXTENSION);
        Ok(Self::Default(home.join(defaults::CONFIG_DIR).join(file_name)))
    }

    /// The path to attempt.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }

    /// Returns true if the user named this file explicitly.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    /// Loads the file at this location.
    ///
    /// A missing file at the default location yields an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read, if a file that
    /// exists cannot be read or parsed, or if its format is unsupported.
    pub fn load(&self) -> Result<FileLayer, ConfigError> {
        let path = self.path();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.is_explicit() => {
                tracing::debug!("running without a configuration file");
                return Ok(FileLayer::empty());
            }
            Err(e) => {
                return Err(ConfigError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let format = FileFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let layer = FileLayer::parse(&content, format, path)?;
        tracing::info!(file = %path.display(), "using config file");
        Ok(layer)
    }
}

/// Flat key/value contribution of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLayer {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl FileLayer {
    /// A layer that contributes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a layer from already-decoded pairs. Keys are lowercased.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            path: None,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Decodes file content in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or not a mapping.
    pub fn parse(content: &str, format: FileFormat, path: &Path) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        match format {
            FileFormat::Yaml => decode_yaml(content, path, &mut values)?,
            FileFormat::Toml => decode_toml(content, path, &mut values)?,
        }

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Looks up a key (case-insensitive).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// The file this layer was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of decoded keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the layer contributes no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_lowercase()
    } else {
        format!("{prefix}.{}", key.to_lowercase())
    }
}

fn decode_yaml(
    content: &str,
    path: &Path,
    out: &mut BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(());
    }

    let root: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    match root {
        serde_yaml::Value::Null => Ok(()),
        serde_yaml::Value::Mapping(_) => {
            flatten_yaml("", &root, out);
            Ok(())
        }
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    use serde_yaml::Value;

    match value {
        Value::Null => {}
        Value::Sequence(items) => {
            let joined: Vec<String> = items.iter().filter_map(yaml_scalar).collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        Value::Mapping(map) => {
            for (key, child) in map {
                if let Some(key) = yaml_scalar(key) {
                    flatten_yaml(&join_key(prefix, &key), child, out);
                }
            }
        }
        Value::Tagged(tagged) => flatten_yaml(prefix, &tagged.value, out),
        scalar => {
            if let Some(text) = yaml_scalar(scalar) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => yaml_scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn decode_toml(
    content: &str,
    path: &Path,
    out: &mut BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    for (key, value) in &table {
        flatten_toml(&join_key("", key), value, out);
    }
    Ok(())
}

fn flatten_toml(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(toml_scalar).collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        toml::Value::Table(table) => {
            for (key, child) in table {
                flatten_toml(&join_key(prefix, key), child, out);
            }
        }
        scalar => {
            if let Some(text) = toml_scalar(scalar) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
