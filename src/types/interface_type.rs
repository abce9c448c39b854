//! Interface types: a field contract that objects (and other interfaces)
//! may implement/extend. Interfaces have no resolver of their own -- only
//! [`crate::types::FieldDescriptor`]s, since a bare interface is never a
//! concrete source value.

use indexmap::IndexMap;

use super::field::FieldDescriptor;

#[derive(Clone, Debug)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDescriptor>,
    /// Interfaces this interface declares itself as extending.
    pub(crate) parents: Vec<String>,
    /// Objects/interfaces that directly implement/extend this interface.
    /// Filled in by the schema builder once every type has registered its
    /// parents, since a declaration only runs one direction (child -> parent)
    /// and the reverse edge is needed for subtype/possible-type queries.
    pub(crate) children: Vec<String>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        InterfaceType {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<(), String> {
        if self.fields.contains_key(&field.name) {
            return Err(field.name.clone());
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    pub fn extend_interface(&mut self, interface_name: impl Into<String>) {
        self.parents.push(interface_name.into());
    }

    pub fn extended_interfaces(&self) -> &[String] {
        &self.parents
    }

    pub fn implementors(&self) -> &[String] {
        &self.children
    }
}
