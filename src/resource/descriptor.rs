//! Resource descriptors
//!
//! A [`ResourceDescriptor`] is the declarative heart of a resource: which
//! fields are exposed, which of them accept equality filters, which related
//! resources are embedded by value, which derived fields are computed at
//! serialization time, and who may read the resource. Descriptors are plain
//! values built once at startup; specialization (article is-a publishable)
//! is resolved into a flat descriptor with [`ResourceDescriptor::extend`],
//! not through runtime dispatch.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::field::{FieldSpec, FieldType};

/// Who may read a resource.
///
/// Declarations that name no policy get `Restricted`, the stricter default:
/// requests must carry the server's configured bearer token. `Open` resources
/// skip the check entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Requires the configured API token
    #[default]
    Restricted,
    /// No access check
    Open,
}

/// A derived, read-only field evaluated at serialization time.
///
/// The function sees the raw hydrated record and returns the field value.
/// Computed fields never carry filter predicates, so they are excluded from
/// the filter whitelist by construction; they are equally invisible to
/// writes because the API accepts none.
#[derive(Clone)]
pub struct ComputedField {
    pub name: &'static str,
    pub compute: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField").field("name", &self.name).finish()
    }
}

/// Cardinality of an embedded relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Zero-or-one related object; absent serializes as `null`
    OneOptional,
    /// Exactly one related object
    One,
    /// Zero-or-more related objects
    Many,
}

/// An embedded relation field.
///
/// Relations are always embedded by value; the nested object is shaped by
/// the related resource's own descriptor, so its excludes apply inside the
/// parent payload too. A relation may optionally be filterable by the
/// related object's id.
#[derive(Debug, Clone)]
pub struct RelationSpec {
    pub name: &'static str,
    pub kind: RelationKind,
    pub nested: Arc<ResourceDescriptor>,
    /// Equality-filter predicate matching the related id, if filterable
    pub filter: Option<&'static str>,
}

/// Declarative description of one REST resource.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    name: String,
    fields: Vec<FieldSpec>,
    excludes: BTreeSet<&'static str>,
    relations: Vec<RelationSpec>,
    computed: Vec<ComputedField>,
    access: AccessPolicy,
}

impl ResourceDescriptor {
    /// Start a descriptor for the resource mounted under the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            excludes: BTreeSet::new(),
            relations: Vec::new(),
            computed: Vec::new(),
            access: AccessPolicy::default(),
        }
    }

    /// Declare an exposed field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Drop a declared field from serialized payloads. The field stays out
    /// of the filter whitelist as well.
    pub fn exclude(mut self, name: &'static str) -> Self {
        self.excludes.insert(name);
        self
    }

    /// Embed a related resource by value.
    pub fn relation(
        mut self,
        name: &'static str,
        kind: RelationKind,
        nested: Arc<ResourceDescriptor>,
    ) -> Self {
        self.relations.push(RelationSpec {
            name,
            kind,
            nested,
            filter: None,
        });
        self
    }

    /// Embed a related resource by value and allow filtering by related id.
    pub fn relation_filterable(
        mut self,
        name: &'static str,
        kind: RelationKind,
        nested: Arc<ResourceDescriptor>,
        predicate: &'static str,
    ) -> Self {
        self.relations.push(RelationSpec {
            name,
            kind,
            nested,
            filter: Some(predicate),
        });
        self
    }

    /// Attach a derived, serialization-time-only field.
    pub fn computed(
        mut self,
        name: &'static str,
        compute: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.computed.push(ComputedField {
            name,
            compute: Arc::new(compute),
        });
        self
    }

    /// Set the access policy.
    pub fn access(mut self, policy: AccessPolicy) -> Self {
        self.access = policy;
        self
    }

    /// Strip every filter predicate, leaving the whitelist empty.
    pub fn without_filters(mut self) -> Self {
        for field in &mut self.fields {
            field.filter = None;
        }
        for relation in &mut self.relations {
            relation.filter = None;
        }
        self
    }

    /// Derive a new resource from this one: same fields, excludes, relations,
    /// computed fields and policy under a new name, ready for additions.
    /// Resolved once at startup; the result carries no link to its parent.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        let mut derived = self.clone();
        derived.name = name.into();
        derived
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access_policy(&self) -> AccessPolicy {
        self.access
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn relations(&self) -> &[RelationSpec] {
        &self.relations
    }

    pub fn computed_fields(&self) -> &[ComputedField] {
        &self.computed
    }

    /// Names accepted as filter parameters, in declaration order.
    pub fn filter_whitelist(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.filter.is_some() && !self.excludes.contains(f.name))
            .map(|f| f.name)
            .chain(
                self.relations
                    .iter()
                    .filter(|r| r.filter.is_some())
                    .map(|r| r.name),
            )
            .collect()
    }

    /// Look up the predicate and value type for a filter parameter.
    /// Excluded fields are not filterable even if their spec carries a
    /// predicate.
    pub fn filter_binding(&self, name: &str) -> Option<(&'static str, FieldType)> {
        if let Some(field) = self.fields.iter().find(|f| f.name == name) {
            if self.excludes.contains(field.name) {
                return None;
            }
            return field.filter.map(|sql| (sql, field.ty));
        }
        self.relations
            .iter()
            .find(|r| r.name == name)
            .and_then(|r| r.filter.map(|sql| (sql, FieldType::Int)))
    }

    /// Shape a raw hydrated record into the serialized payload: exactly the
    /// declared exposed-minus-excluded fields, relations shaped by their own
    /// descriptors, computed fields appended last.
    pub fn shape(&self, raw: &Value) -> Value {
        let Some(source) = raw.as_object() else {
            return raw.clone();
        };

        let mut out = Map::new();
        for field in &self.fields {
            if self.excludes.contains(field.name) {
                continue;
            }
            out.insert(
                field.name.to_string(),
                source.get(field.name).cloned().unwrap_or(Value::Null),
            );
        }

        for relation in &self.relations {
            let shaped = match (relation.kind, source.get(relation.name)) {
                (RelationKind::Many, Some(Value::Array(items))) => {
                    Value::Array(items.iter().map(|item| relation.nested.shape(item)).collect())
                }
                (RelationKind::Many, _) => Value::Array(Vec::new()),
                (_, Some(value)) if !value.is_null() => relation.nested.shape(value),
                _ => Value::Null,
            };
            out.insert(relation.name.to_string(), shaped);
        }

        for computed in &self.computed {
            out.insert(computed.name.to_string(), (computed.compute)(raw));
        }

        Value::Object(out)
    }
}
