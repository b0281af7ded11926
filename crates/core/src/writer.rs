//! The writer contract
//!
//! A `VarWriter` receives the structural events of one dump session and
//! renders them. It performs no traversal of its own: identity assignment,
//! reference detection and visiting order all belong to the engine.
//!
//! ## Call protocol
//!
//! ```text
//! start
//!   ( leaf | reference | open ( ... )* close )*
//! [ abort ]
//! stop
//! ```
//!
//! - `start()` exactly once before anything else, `stop()` exactly once
//!   after everything else.
//! - Every `write_*_open` is matched by one `write_*_close` of the same kind
//!   and id, with stack discipline.
//! - Every `ref` equals an id issued earlier in the same session.
//! - When the engine gives up on a walk after a non-contract error, it calls
//!   `abort()` instead of the outstanding closes, then `stop()`.
//!
//! Implementations report breaches as `DumpError::Contract`. The
//! `ContractTracker` in [`crate::contract`] implements all of these checks.
//!
//! ## Optional capabilities
//!
//! The contract grew over several revisions. Key type annotations, resource
//! references and uninitialized slots are gated by [`Capabilities`]: the
//! engine only sends what a writer advertises.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DumpResult;
use crate::id::{DumpId, Occurrence};
use crate::name::{KeyType, VarName};

/// Kind of a composite that opens and closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeKind {
    /// Array / container
    Array,
    /// Object
    Object,
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeKind::Array => f.write_str("array"),
            CompositeKind::Object => f.write_str("object"),
        }
    }
}

/// Optional parts of the contract a writer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Accepts `KeyType` annotations on named values
    pub key_type: bool,
    /// Accepts `write_resource_reference`
    pub resource_reference: bool,
    /// Accepts `write_uninitialized`
    pub uninitialized: bool,
}

impl Capabilities {
    /// The first contract revision: none of the optional parts
    pub const BASELINE: Capabilities = Capabilities {
        key_type: false,
        resource_reference: false,
        uninitialized: false,
    };

    /// Every optional part
    pub const FULL: Capabilities = Capabilities {
        key_type: true,
        resource_reference: true,
        uninitialized: true,
    };

    /// What a writer gets from the trait defaults alone
    ///
    /// Resource references forward to `write_resource`, which every writer
    /// implements. Uninitialized slots need an explicit `write_uninitialized`.
    pub const IMPLICIT: Capabilities = Capabilities {
        key_type: true,
        resource_reference: true,
        uninitialized: false,
    };

    /// Set key type support (builder pattern)
    pub fn with_key_type(mut self, enabled: bool) -> Self {
        self.key_type = enabled;
        self
    }

    /// Set resource reference support (builder pattern)
    pub fn with_resource_reference(mut self, enabled: bool) -> Self {
        self.resource_reference = enabled;
        self
    }

    /// Set uninitialized slot support (builder pattern)
    pub fn with_uninitialized(mut self, enabled: bool) -> Self {
        self.uninitialized = enabled;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::FULL
    }
}

/// Renders the events of a dump session
///
/// Object safe: engines take `&mut W where W: VarWriter + ?Sized`, so a
/// `Box<dyn VarWriter>` chosen at run time works as well as a concrete type.
///
/// Scalar `write_*` methods receive the value on both occurrences. On
/// `Occurrence::Repeat` the value is whatever the shared slot holds now and
/// writers should not rely on it.
pub trait VarWriter {
    /// Optional contract parts this writer understands
    ///
    /// Writers that override `write_uninitialized` must also report
    /// `uninitialized` here.
    fn capabilities(&self) -> Capabilities {
        Capabilities::IMPLICIT
    }

    /// Called once before the first value
    fn start(&mut self) -> DumpResult<()>;

    /// Called once after the last value; flushes everything buffered
    fn stop(&mut self) -> DumpResult<()>;

    /// Entering an array not seen before
    fn write_array_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// All elements of the array have been written
    fn write_array_close(&mut self, id: DumpId, name: Option<&VarName>) -> DumpResult<()>;

    /// An array that has been written already
    fn write_array_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// Entering an object not seen before
    fn write_object_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()>;

    /// All properties of the object have been written
    fn write_object_close(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        class: &str,
    ) -> DumpResult<()>;

    /// An object that has been written already
    fn write_object_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()>;

    /// A boolean
    fn write_bool(
        &mut self,
        occurrence: Occurrence,
        value: bool,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// An integer
    fn write_int(
        &mut self,
        occurrence: Occurrence,
        value: i64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// A float
    fn write_float(
        &mut self,
        occurrence: Occurrence,
        value: f64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// A string
    fn write_string(
        &mut self,
        occurrence: Occurrence,
        value: &str,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// A null
    fn write_null(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// An opaque resource; only its declared type is rendered
    ///
    /// Writers without `resource_reference` also receive repeats here.
    fn write_resource(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>;

    /// A resource that has been written already
    fn write_resource_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.write_resource(Occurrence::Repeat(reference), name, resource_type, key_type)
    }

    /// A declared object property that holds no value
    ///
    /// Only sent when `capabilities().uninitialized` is set.
    fn write_uninitialized(&mut self, _name: &VarName) -> DumpResult<()> {
        Ok(())
    }

    /// The engine abandoned the session with composites still open
    ///
    /// No closes follow for them; `stop()` is called next and must still
    /// finalize the output.
    fn abort(&mut self) -> DumpResult<()> {
        Ok(())
    }
}
