//! Union types. A union's declared members may themselves be unions --
//! the registry walks the resulting DAG down to its Object leaves when
//! answering "what concrete types can satisfy this union" (see
//! `Schema::leaf_types`). Declaring a cycle among unions is a build error.

#[derive(Clone, Debug)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    /// The type names this union was declared to contain, in declaration
    /// order. May name objects, interfaces, or other unions.
    pub(crate) children: Vec<String>,
    /// Other unions that declared this union as one of their members.
    pub(crate) parents: Vec<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        UnionType {
            name: name.into(),
            description: None,
            children: members,
            parents: Vec::new(),
        }
    }

    pub fn members(&self) -> &[String] {
        &self.children
    }
}
