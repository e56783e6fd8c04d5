//! Resource engine
//!
//! Generic machinery for serving declarative REST resources. Each resource
//! is described by a [`ResourceDescriptor`], a pure-data declaration of the
//! exposed field set, equality-filter whitelist, embedded relations, computed
//! fields and access policy, consumed by one generic list/detail serving
//! path instead of one hand-written handler per entity.
//!
//! The engine owns:
//! - field specs and typed filter-value parsing ([`field`])
//! - descriptor composition and payload shaping ([`descriptor`])
//! - request-parameter validation against the whitelist ([`filter`])
//! - the explicit, ordered resource registry ([`registry`])
//!
//! Data access stays behind the [`RecordSource`] trait; the engine never
//! touches the database directly.

pub mod descriptor;
pub mod field;
pub mod filter;
pub mod registry;

pub use descriptor::{AccessPolicy, ComputedField, RelationKind, RelationSpec, ResourceDescriptor};
pub use field::{BindValue, CompiledFilter, FieldSpec, FieldType, ValueParseError};
pub use filter::{compile_filters, parse_paging, FilterError, RESERVED_PARAMS};
pub use registry::{
    RecordPage, RecordSource, RegisteredResource, RegistryError, ResourceRegistry,
};
