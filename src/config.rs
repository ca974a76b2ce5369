//! Key/value configuration
//!
//! `Config` is the parameter map handed to asset constructors and, after
//! [`crate::resolve_asset_ids`], to the solver. Typed getters fall back to a
//! default when the key is missing and fail when it holds the wrong type.

use crate::asset::AssetRef;
use crate::{Error, Result, Vector3f, Vector3i};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single configuration value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    Vector(Vector3f),
    IntVector(Vector3i),
    /// Handle to a registered (or not yet registered) asset
    Asset(AssetRef),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Real(_) => "real",
            ConfigValue::Str(_) => "string",
            ConfigValue::Vector(_) => "vector",
            ConfigValue::IntVector(_) => "int vector",
            ConfigValue::Asset(_) => "asset",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{}", v),
            ConfigValue::Int(v) => write!(f, "{}", v),
            ConfigValue::Real(v) => write!(f, "{}", v),
            ConfigValue::Str(v) => write!(f, "{}", v),
            ConfigValue::Vector(v) => write!(f, "{}", v),
            ConfigValue::IntVector(v) => write!(f, "{}", v),
            ConfigValue::Asset(asset) => match asset.id {
                Some(id) => write!(f, "{}#{}", asset.kind, id),
                None => write!(f, "{}#unregistered", asset.kind),
            },
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value as i64)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Real(value as f64)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Real(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<Vector3f> for ConfigValue {
    fn from(value: Vector3f) -> Self {
        ConfigValue::Vector(value)
    }
}

impl From<Vector3i> for ConfigValue {
    fn from(value: Vector3i) -> Self {
        ConfigValue::IntVector(value)
    }
}

impl From<AssetRef> for ConfigValue {
    fn from(value: AssetRef) -> Self {
        ConfigValue::Asset(value)
    }
}

/// Ordered key/value configuration map
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    data: BTreeMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    ///
    /// ```rust
    /// use mpmkit::{Config, ConfigValue};
    ///
    /// let config = Config::new().set("radius", 0.05f32).set("name", "ball");
    /// assert_eq!(config.get("name"), Some(&ConfigValue::from("ball")));
    /// ```
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.data.get(key)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.data.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut ConfigValue)> {
        self.data.iter_mut()
    }

    fn mismatch(key: &str, expected: &str, found: &ConfigValue) -> Error {
        Error::InvalidParameter(format!(
            "Config key '{}' holds a {}, expected {}",
            key,
            found.type_name(),
            expected
        ))
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::Bool(v)) => Ok(*v),
            Some(other) => Err(Self::mismatch(key, "bool", other)),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::Int(v)) => Ok(*v),
            Some(other) => Err(Self::mismatch(key, "int", other)),
        }
    }

    /// Integers are accepted and widened
    pub fn get_real(&self, key: &str, default: f64) -> Result<f64> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::Real(v)) => Ok(*v),
            Some(ConfigValue::Int(v)) => Ok(*v as f64),
            Some(other) => Err(Self::mismatch(key, "real", other)),
        }
    }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::Str(v)) => Ok(v),
            Some(other) => Err(Self::mismatch(key, "string", other)),
        }
    }

    /// Integer vectors are accepted and converted
    pub fn get_vec3(&self, key: &str, default: Vector3f) -> Result<Vector3f> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::Vector(v)) => Ok(*v),
            Some(ConfigValue::IntVector(v)) => {
                Ok(Vector3f::new(v.x as f32, v.y as f32, v.z as f32))
            }
            Some(other) => Err(Self::mismatch(key, "vector", other)),
        }
    }

    pub fn get_vec3i(&self, key: &str, default: Vector3i) -> Result<Vector3i> {
        match self.get(key) {
            None => Ok(default),
            Some(ConfigValue::IntVector(v)) => Ok(*v),
            Some(other) => Err(Self::mismatch(key, "int vector", other)),
        }
    }

    /// Multi-line `key = value` listing, sorted by key
    pub fn describe(&self) -> String {
        let mut out = String::from("Configures:");
        for (key, value) in &self.data {
            out.push_str(&format!("\n * {} = {}", key, value));
        }
        out
    }
}

impl FromIterator<(String, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Config {
    type Item = (String, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
