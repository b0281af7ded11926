//! Variable names and key type annotations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label under which a value appears in its container
///
/// Roots carry no name (`Option<&VarName>` is `None` at the call site).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarName {
    /// List index
    Index(i64),
    /// Object field or associative key
    Key(String),
}

impl VarName {
    /// Get as i64 if this is an index
    pub fn as_index(&self) -> Option<i64> {
        match self {
            VarName::Index(i) => Some(*i),
            VarName::Key(_) => None,
        }
    }

    /// Get as &str if this is a key
    pub fn as_key(&self) -> Option<&str> {
        match self {
            VarName::Index(_) => None,
            VarName::Key(k) => Some(k),
        }
    }

    /// Key type implied by the name's own representation
    pub fn natural_key_type(&self) -> KeyType {
        match self {
            VarName::Index(_) => KeyType::Int,
            VarName::Key(_) => KeyType::String,
        }
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarName::Index(i) => write!(f, "{}", i),
            VarName::Key(k) => f.write_str(k),
        }
    }
}

impl From<i64> for VarName {
    fn from(i: i64) -> Self {
        VarName::Index(i)
    }
}

impl From<i32> for VarName {
    fn from(i: i32) -> Self {
        VarName::Index(i as i64)
    }
}

impl From<usize> for VarName {
    fn from(i: usize) -> Self {
        VarName::Index(i as i64)
    }
}

impl From<&str> for VarName {
    fn from(s: &str) -> Self {
        VarName::Key(s.to_string())
    }
}

impl From<String> for VarName {
    fn from(s: String) -> Self {
        VarName::Key(s)
    }
}

/// Whether an array entry name renders as a numeric index or a string key
///
/// Carried separately from `VarName` because a source type system may blur
/// the two (a string key `"10"` is still a string key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Numeric array index
    Int,
    /// String key
    String,
}

impl KeyType {
    /// Short identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyType::Int => "int",
            KeyType::String => "string",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
