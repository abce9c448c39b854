//! Assembles independently-constructed types into a finished [`Schema`],
//! performing the cross-type validation a single type can't do on its own:
//! resolving interface/union references, propagating reverse edges through
//! the subtype lattice, checking field-override compatibility, and
//! attaching the built-in `__typename`/`__schema`/`__type` machinery.

use crate::introspection;
use crate::loc::SchemaDefLocation;
use crate::schema::error::SchemaBuildError;
use crate::schema::schema::Schema;
use crate::types::{
    builtin_include, builtin_scalar_impl, builtin_scalar_names, builtin_skip, DirectiveType,
    EnumType, FieldDescriptor, GraphQLType, InputObjectType, InterfaceType, ObjectType,
    ScalarType, TypeKind, TypeRef, UnionType,
};
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, SchemaBuildError>;

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    objects: IndexMap<String, ObjectType>,
    interfaces: IndexMap<String, InterfaceType>,
    unions: IndexMap<String, UnionType>,
    enums: IndexMap<String, EnumType>,
    scalars: IndexMap<String, ScalarType>,
    input_objects: IndexMap<String, InputObjectType>,
    directives: IndexMap<String, DirectiveType>,
    query_type_name: Option<String>,
    mutation_type_name: Option<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut builder = SchemaBuilder::default();
        for name in builtin_scalar_names() {
            let implementation = builtin_scalar_impl(name).expect("builtin scalar name has an impl");
            builder
                .scalars
                .insert((*name).to_string(), ScalarType::new(*name, implementation));
        }
        builder.directives.insert("include".to_string(), builtin_include());
        builder.directives.insert("skip".to_string(), builtin_skip());
        builder
    }

    pub fn add_object(&mut self, object: ObjectType) -> Result<&mut Self> {
        self.check_name_available(&object.name)?;
        self.objects.insert(object.name.clone(), object);
        Ok(self)
    }

    pub fn add_interface(&mut self, interface: InterfaceType) -> Result<&mut Self> {
        self.check_name_available(&interface.name)?;
        self.interfaces.insert(interface.name.clone(), interface);
        Ok(self)
    }

    pub fn add_union(&mut self, union: UnionType) -> Result<&mut Self> {
        self.check_name_available(&union.name)?;
        self.unions.insert(union.name.clone(), union);
        Ok(self)
    }

    pub fn add_enum(&mut self, enum_type: EnumType) -> Result<&mut Self> {
        self.check_name_available(&enum_type.name)?;
        self.enums.insert(enum_type.name.clone(), enum_type);
        Ok(self)
    }

    pub fn add_scalar(&mut self, scalar: ScalarType) -> Result<&mut Self> {
        if builtin_scalar_names().contains(&scalar.name.as_str()) {
            return Err(SchemaBuildError::DuplicateTypeDefinition {
                type_name: scalar.name.clone(),
                def1: SchemaDefLocation::Builtin,
                def2: SchemaDefLocation::Registered(self.scalars.len()),
            });
        }
        self.check_name_available(&scalar.name)?;
        self.scalars.insert(scalar.name.clone(), scalar);
        Ok(self)
    }

    pub fn add_input_object(&mut self, input_object: InputObjectType) -> Result<&mut Self> {
        self.check_name_available(&input_object.name)?;
        self.input_objects
            .insert(input_object.name.clone(), input_object);
        Ok(self)
    }

    pub fn add_directive(&mut self, directive: DirectiveType) -> Result<&mut Self> {
        if matches!(directive.name.as_str(), "include" | "skip") {
            return Err(SchemaBuildError::RedefinedBuiltinDirective {
                name: directive.name,
            });
        }
        self.directives.insert(directive.name.clone(), directive);
        Ok(self)
    }

    pub fn set_query_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.query_type_name = Some(name.into());
        self
    }

    pub fn set_mutation_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.mutation_type_name = Some(name.into());
        self
    }

    fn check_name_available(&self, name: &str) -> Result<()> {
        if self.type_kind_of(name).is_some() {
            return Err(SchemaBuildError::DuplicateTypeDefinition {
                type_name: name.to_string(),
                def1: SchemaDefLocation::Registered(0),
                def2: SchemaDefLocation::Registered(1),
            });
        }
        Ok(())
    }

    fn type_kind_of(&self, name: &str) -> Option<TypeKind> {
        if self.objects.contains_key(name) {
            Some(TypeKind::Object)
        } else if self.interfaces.contains_key(name) {
            Some(TypeKind::Interface)
        } else if self.unions.contains_key(name) {
            Some(TypeKind::Union)
        } else if self.enums.contains_key(name) {
            Some(TypeKind::Enum)
        } else if self.scalars.contains_key(name) {
            Some(TypeKind::Scalar)
        } else if self.input_objects.contains_key(name) {
            Some(TypeKind::InputObject)
        } else {
            None
        }
    }

    pub fn build(mut self) -> Result<Schema> {
        self.validate_interface_hierarchy()?;
        self.validate_object_interfaces()?;
        self.validate_unions()?;
        self.validate_field_types()?;
        self.validate_no_meta_field_shadowing()?;

        let query_type_name = self
            .query_type_name
            .clone()
            .or_else(|| self.objects.contains_key("Query").then(|| "Query".to_string()))
            .ok_or(SchemaBuildError::NoQueryTypeDefined)?;

        let mutation_type_name = self
            .mutation_type_name
            .clone()
            .or_else(|| self.objects.contains_key("Mutation").then(|| "Mutation".to_string()));

        let mut class_tag_to_type = IndexMap::new();
        for object in self.objects.values() {
            class_tag_to_type.insert(object.class_tag, object.name.clone());
        }

        let mut types = IndexMap::new();
        for (name, t) in self.scalars {
            types.insert(name, GraphQLType::Scalar(t));
        }
        for (name, t) in self.enums {
            types.insert(name, GraphQLType::Enum(t));
        }
        for (name, t) in self.input_objects {
            types.insert(name, GraphQLType::InputObject(t));
        }
        for (name, t) in self.interfaces {
            types.insert(name, GraphQLType::Interface(t));
        }
        for (name, t) in self.unions {
            types.insert(name, GraphQLType::Union(t));
        }
        for (name, t) in self.objects {
            types.insert(name, GraphQLType::Object(t));
        }

        let mut common_fields = IndexMap::new();
        common_fields.insert(
            "__typename".to_string(),
            FieldDescriptor::new(
                "__typename",
                TypeRef::non_null(TypeRef::named("String")).expect("non_null never double-wraps"),
            ),
        );

        let mut implicit_root_fields = IndexMap::new();
        implicit_root_fields.insert(
            "__schema".to_string(),
            FieldDescriptor::new(
                "__schema",
                TypeRef::non_null(TypeRef::named("__Schema")).expect("non_null never double-wraps"),
            ),
        );
        let mut type_field = FieldDescriptor::new("__type", TypeRef::named("__Type"));
        type_field.args.insert(
            "name".to_string(),
            crate::types::Argument {
                name: "name".to_string(),
                arg_type: TypeRef::non_null(TypeRef::named("String"))
                    .expect("non_null never double-wraps"),
                default_value: None,
                description: None,
            },
        );
        implicit_root_fields.insert("__type".to_string(), type_field);

        let schema = Schema {
            schema_id: crate::schema::schema::next_schema_id(),
            types,
            directives: self.directives,
            query_type_name,
            mutation_type_name,
            class_tag_to_type,
            common_fields,
            implicit_root_fields,
        };

        Ok(introspection::attach(schema))
    }

    /// Wires `extends` edges between interfaces in both directions and
    /// checks that an extending interface's fields are compatible with the
    /// interfaces it extends.
    fn validate_interface_hierarchy(&mut self) -> Result<()> {
        let names: Vec<String> = self.interfaces.keys().cloned().collect();
        for name in &names {
            let parents = self.interfaces[name].extended_interfaces().to_vec();
            for parent_name in &parents {
                if !self.interfaces.contains_key(parent_name) {
                    return Err(SchemaBuildError::NotAnInterface {
                        type_name: name.clone(),
                        referenced: parent_name.clone(),
                    });
                }
                self.check_field_compatibility(name, parent_name)?;
            }
        }
        for name in &names {
            let parents = self.interfaces[name].extended_interfaces().to_vec();
            for parent_name in parents {
                self.interfaces
                    .get_mut(&parent_name)
                    .expect("checked above")
                    .children
                    .push(name.clone());
            }
        }
        Ok(())
    }

    /// §4.1 rule 3's "subtype-of" relation, computed from the `parents`
    /// edges collected on `self` so far (forward declarations for
    /// objects/interfaces are available immediately; union-of-union
    /// membership is only reachable once `validate_unions` has run its
    /// reverse-edge pass). Mirrors [`Schema::is_subtype`].
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = std::collections::HashSet::new();
        self.is_subtype_inner(sub, sup, &mut visited)
    }

    fn is_subtype_inner(
        &self,
        sub: &str,
        sup: &str,
        visited: &mut std::collections::HashSet<String>,
    ) -> bool {
        if !visited.insert(sub.to_string()) {
            return false;
        }
        let parents: &[String] = if let Some(obj) = self.objects.get(sub) {
            &obj.parents
        } else if let Some(iface) = self.interfaces.get(sub) {
            &iface.parents
        } else if let Some(union) = self.unions.get(sub) {
            &union.parents
        } else {
            return false;
        };
        for parent in parents {
            if parent == sup || self.is_subtype_inner(parent, sup, visited) {
                return true;
            }
        }
        false
    }

    fn check_field_compatibility(&self, type_name: &str, parent_name: &str) -> Result<()> {
        let parent_fields: Vec<_> = self.interfaces[parent_name].fields.values().cloned().collect();
        for parent_field in parent_fields {
            let child_field = if let Some(obj) = self.objects.get(type_name) {
                obj.field(&parent_field.name).map(|f| f.descriptor.clone())
            } else if let Some(iface) = self.interfaces.get(type_name) {
                iface.field(&parent_field.name).cloned()
            } else {
                None
            };
            let Some(child_field) = child_field else {
                return Err(SchemaBuildError::MissingInterfaceField {
                    type_name: type_name.to_string(),
                    interface_name: parent_name.to_string(),
                    field_name: parent_field.name.clone(),
                });
            };
            if !child_field.is_assignment_compatible_with(&parent_field, |a, b| self.is_subtype(a, b)) {
                return Err(SchemaBuildError::IncompatibleFieldOverride {
                    type_name: type_name.to_string(),
                    parent_name: parent_name.to_string(),
                    field_name: parent_field.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_object_interfaces(&mut self) -> Result<()> {
        let names: Vec<String> = self.objects.keys().cloned().collect();
        for name in &names {
            let parents = self.objects[name].implemented_interfaces().to_vec();
            for parent_name in &parents {
                if !self.interfaces.contains_key(parent_name) {
                    return Err(SchemaBuildError::NotAnInterface {
                        type_name: name.clone(),
                        referenced: parent_name.clone(),
                    });
                }
                self.check_field_compatibility(name, parent_name)?;
            }
        }
        for name in &names {
            let parents = self.objects[name].implemented_interfaces().to_vec();
            for parent_name in parents {
                self.interfaces
                    .get_mut(&parent_name)
                    .expect("checked above")
                    .children
                    .push(name.clone());
            }
        }
        Ok(())
    }

    fn validate_unions(&mut self) -> Result<()> {
        let names: Vec<String> = self.unions.keys().cloned().collect();
        for name in &names {
            let members = self.unions[name].members().to_vec();
            for member in &members {
                if self.type_kind_of(member).is_none() {
                    return Err(SchemaBuildError::UndefinedUnionMember {
                        type_name: name.clone(),
                        referenced: member.clone(),
                    });
                }
            }
        }
        // Reverse edges so every member (object, interface, or nested union)
        // gets a `parents` edge back to this union, needed for
        // `is_subtype`/possible-type queries.
        for name in &names {
            let members = self.unions[name].members().to_vec();
            for member in members {
                if let Some(object) = self.objects.get_mut(&member) {
                    object.parents.push(name.clone());
                } else if let Some(interface) = self.interfaces.get_mut(&member) {
                    interface.parents.push(name.clone());
                } else if let Some(member_union) = self.unions.get_mut(&member) {
                    member_union.parents.push(name.clone());
                }
            }
        }
        // Cycle detection restricted to union->union edges (only unions can
        // cycle; objects are always leaves).
        let mut visiting = std::collections::HashSet::new();
        let mut visited = std::collections::HashSet::new();
        for name in &names {
            if !visited.contains(name) {
                let mut path = Vec::new();
                self.detect_union_cycle(name, &mut path, &mut visiting, &mut visited)?;
            }
        }
        Ok(())
    }

    fn detect_union_cycle(
        &self,
        name: &str,
        path: &mut Vec<String>,
        visiting: &mut std::collections::HashSet<String>,
        visited: &mut std::collections::HashSet<String>,
    ) -> Result<()> {
        if visiting.contains(name) {
            let start = path.iter().position(|n| n == name).unwrap_or(0);
            let mut cycle_names: Vec<String> = path[start..].to_vec();
            cycle_names.push(name.to_string());
            return Err(SchemaBuildError::UnionCycle {
                cycle: cycle_names.join(" => "),
            });
        }
        if visited.contains(name) {
            return Ok(());
        }
        visiting.insert(name.to_string());
        path.push(name.to_string());
        if let Some(union) = self.unions.get(name) {
            for member in union.members() {
                if self.unions.contains_key(member) {
                    self.detect_union_cycle(member, path, visiting, visited)?;
                }
            }
        }
        path.pop();
        visiting.remove(name);
        visited.insert(name.to_string());
        Ok(())
    }

    /// Confirms every field/argument/input-field `TypeRef` resolves to a
    /// registered type, and that output positions only ever name
    /// output-kinded types (and likewise for input positions).
    fn validate_field_types(&self) -> Result<()> {
        for object in self.objects.values() {
            for field in object.fields.values() {
                self.validate_output_type_ref(&field.descriptor.field_type)?;
                for arg in field.descriptor.args.values() {
                    self.validate_input_type_ref(&arg.arg_type)?;
                }
            }
        }
        for interface in self.interfaces.values() {
            for field in interface.fields.values() {
                self.validate_output_type_ref(&field.field_type)?;
                for arg in field.args.values() {
                    self.validate_input_type_ref(&arg.arg_type)?;
                }
            }
        }
        for input_object in self.input_objects.values() {
            for field in input_object.fields.values() {
                self.validate_input_type_ref(&field.field_type)?;
            }
        }
        for directive in self.directives.values() {
            for arg in directive.args.values() {
                self.validate_input_type_ref(&arg.arg_type)?;
            }
        }
        Ok(())
    }

    fn validate_output_type_ref(&self, type_ref: &TypeRef) -> Result<()> {
        let name = type_ref.base_name();
        let kind = self.type_kind_of(name).ok_or(SchemaBuildError::UndefinedFieldType {
            type_ref: type_ref.to_string(),
        })?;
        if !kind.is_output_kind() {
            return Err(SchemaBuildError::InputTypeUsedAsOutput {
                type_ref: type_ref.to_string(),
                named_type: name.to_string(),
            });
        }
        Ok(())
    }

    /// §3's invariant: no user-defined field may shadow `__typename` (on any
    /// type) or the implicit root fields `__schema`/`__type` (on the root
    /// query type).
    fn validate_no_meta_field_shadowing(&self) -> Result<()> {
        for object in self.objects.values() {
            if object.fields.contains_key("__typename") {
                return Err(SchemaBuildError::ShadowsMetaField {
                    type_name: object.name.clone(),
                    field_name: "__typename".to_string(),
                });
            }
        }
        for interface in self.interfaces.values() {
            if interface.fields.contains_key("__typename") {
                return Err(SchemaBuildError::ShadowsMetaField {
                    type_name: interface.name.clone(),
                    field_name: "__typename".to_string(),
                });
            }
        }
        let query_type_name = self
            .query_type_name
            .clone()
            .or_else(|| self.objects.contains_key("Query").then(|| "Query".to_string()));
        if let Some(query_type_name) = query_type_name {
            if let Some(query_object) = self.objects.get(&query_type_name) {
                for meta in ["__schema", "__type"] {
                    if query_object.fields.contains_key(meta) {
                        return Err(SchemaBuildError::ShadowsMetaField {
                            type_name: query_type_name.clone(),
                            field_name: meta.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_input_type_ref(&self, type_ref: &TypeRef) -> Result<()> {
        let name = type_ref.base_name();
        let kind = self.type_kind_of(name).ok_or(SchemaBuildError::UndefinedFieldType {
            type_ref: type_ref.to_string(),
        })?;
        if !kind.is_input_kind() {
            return Err(SchemaBuildError::OutputTypeUsedAsInput {
                type_ref: type_ref.to_string(),
                named_type: name.to_string(),
            });
        }
        Ok(())
    }
}
