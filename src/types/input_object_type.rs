//! Input object types: structured argument/variable values.

use indexmap::IndexMap;

use super::type_ref::TypeRef;

/// An input object doesn't carry per-field defaults (unlike an
/// [`super::field::Argument`], which backs variable/argument default-value
/// machinery per §4.3): a literal omitting a `NonNull` field is always
/// rejected, per §3/§4.2's "every `NonNull` field must appear" rule.
#[derive(Clone, Debug, PartialEq)]
pub struct InputField {
    pub name: String,
    pub field_type: TypeRef,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputField>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        InputObjectType {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.get(name)
    }

    pub fn add_field(&mut self, field: InputField) -> Result<(), String> {
        if self.fields.contains_key(&field.name) {
            return Err(field.name.clone());
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }
}
