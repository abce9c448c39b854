//! Object types: concrete, resolvable types with fields backed by
//! [`crate::types::Resolver`]s.

use crate::value::ClassTag;
use indexmap::IndexMap;

use super::field::Field;

#[derive(Clone, Debug)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub class_tag: ClassTag,
    pub fields: IndexMap<String, Field>,
    /// Names of interfaces this object declares itself as implementing.
    /// Populated by the schema builder; used by the subtype lattice.
    pub(crate) parents: Vec<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, class_tag: ClassTag) -> Self {
        ObjectType {
            name: name.into(),
            description: None,
            class_tag,
            fields: IndexMap::new(),
            parents: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Adds a field, rejecting a second registration under the same name.
    pub fn add_field(&mut self, field: Field) -> Result<(), String> {
        if self.fields.contains_key(field.name()) {
            return Err(field.name().to_string());
        }
        self.fields.insert(field.name().to_string(), field);
        Ok(())
    }

    pub fn implement_interface(&mut self, interface_name: impl Into<String>) {
        self.parents.push(interface_name.into());
    }

    pub fn implemented_interfaces(&self) -> &[String] {
        &self.parents
    }
}
