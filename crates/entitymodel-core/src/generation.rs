//! Value-generation resolution.
//!
//! A key property that is also a foreign key usually does not generate its
//! own value: it receives the value of the principal property it references,
//! which may in turn reference another principal, and so on. Resolution
//! follows those references until it reaches a property marked
//! `generate_value_on_add`.
//!
//! The walk is depth-first. At each property, foreign keys are tried in
//! declaration order (and, for a property that appears more than once in a
//! foreign key, positions in order); the first generating property reached is
//! the answer. Every property is entered at most once per resolution, so
//! cyclic foreign-key graphs terminate and the work is bounded by the number
//! of properties in the model.

use crate::model::{ForeignKeyId, Model, PropertyId};
use crate::property_set::PropertySet;

/// One property on the current traversal path, plus how many of its
/// outgoing edges have been tried.
struct Frame {
    property: PropertyId,
    next_edge: usize,
}

impl Model {
    /// The property responsible for generating `property`'s value on add.
    ///
    /// Returns `property` itself when it generates its own value, the first
    /// generating property reachable through foreign keys otherwise, and
    /// `None` when nothing in its key lineage generates a value.
    pub fn generation_property(&self, property: PropertyId) -> Option<PropertyId> {
        self.generation_path(property)
            .and_then(|path| path.last().copied())
    }

    /// Like [`generation_property`](Self::generation_property), but returns
    /// the whole chain of properties from `property` to the generating
    /// property, both ends included.
    pub fn generation_path(&self, property: PropertyId) -> Option<Vec<PropertyId>> {
        self.property(property)?;

        let mut visited = PropertySet::with_capacity(self.property_count());
        let mut stack: Vec<Frame> = Vec::new();

        visited.insert(property);
        if self.generates_value(property) {
            tracing::trace!(
                property = %self.qualified_name(property),
                "Property generates its own value"
            );
            return Some(vec![property]);
        }
        stack.push(Frame {
            property,
            next_edge: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let current = frame.property;
            let Some(&(foreign_key, index)) = self
                .dependent_index
                .get(current.index())
                .and_then(|edges| edges.get(frame.next_edge))
            else {
                stack.pop();
                continue;
            };
            frame.next_edge += 1;

            let Some(principal) = self.principal_at(foreign_key, index) else {
                continue;
            };
            if !visited.insert(principal) {
                tracing::trace!(
                    from = %self.qualified_name(current),
                    to = %self.qualified_name(principal),
                    "Skipping already visited principal"
                );
                continue;
            }

            tracing::trace!(
                from = %self.qualified_name(current),
                to = %self.qualified_name(principal),
                "Following foreign key"
            );
            if self.generates_value(principal) {
                let mut path: Vec<PropertyId> = stack.iter().map(|f| f.property).collect();
                path.push(principal);
                tracing::debug!(
                    property = %self.qualified_name(property),
                    generator = %self.qualified_name(principal),
                    depth = path.len() - 1,
                    "Resolved generation property"
                );
                return Some(path);
            }
            stack.push(Frame {
                property: principal,
                next_edge: 0,
            });
        }

        tracing::debug!(
            property = %self.qualified_name(property),
            visited = visited.count(),
            "No generation property"
        );
        None
    }

    fn generates_value(&self, property: PropertyId) -> bool {
        self.property(property)
            .is_some_and(|p| p.generate_value_on_add)
    }

    fn principal_at(&self, foreign_key: ForeignKeyId, index: usize) -> Option<PropertyId> {
        let fk = self.foreign_key(foreign_key)?;
        self.key(fk.principal_key)?.properties.get(index).copied()
    }
}
