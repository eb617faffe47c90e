use crate::ast;
use crate::file_reader;
use crate::loc;
use crate::operation::OperationKind;
use crate::schema::FieldDefinition;
use crate::schema::GraphQLType;
use crate::schema::GraphQLTypeKind;
use crate::schema::LeafType;
use crate::schema::NamedGraphQLTypeRef;
use crate::schema::ObjectOrInterfaceType;
use crate::schema::Schema;
use crate::schema::TypeAnnotation;
use crate::schema::UnionType;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const BUILTIN_SCALAR_NAMES: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

#[derive(Debug)]
struct RootTypeDecl {
    location: loc::SourceLocation,
    type_name: String,
}

/// Accumulates SDL documents and builds an immutable [Schema] from them.
#[derive(Debug)]
pub struct SchemaBuilder {
    mutation_type: Option<RootTypeDecl>,
    pending_extensions: Vec<(Option<PathBuf>, ast::schema::TypeExtension)>,
    query_type: Option<RootTypeDecl>,
    schema_def_location: Option<loc::SourceLocation>,
    subscription_type: Option<RootTypeDecl>,
    types: IndexMap<String, GraphQLType>,
}
impl SchemaBuilder {
    pub fn build(mut self) -> Result<Schema> {
        for (file_path, type_ext) in std::mem::take(&mut self.pending_extensions) {
            self.apply_type_extension(file_path.as_deref(), type_ext)?;
        }

        let type_errors = self.validate_type_references();
        if !type_errors.is_empty() {
            return Err(SchemaBuildError::TypeValidationErrors {
                errors: type_errors,
            });
        }

        let query_type_name =
            match self.resolve_root_type(OperationKind::Query)? {
                Some(type_name) => type_name,
                None => return Err(SchemaBuildError::NoQueryOperationTypeDefined),
            };
        let mutation_type_name = self.resolve_root_type(OperationKind::Mutation)?;
        let subscription_type_name =
            self.resolve_root_type(OperationKind::Subscription)?;

        let supertypes = self.compute_supertypes();
        log::debug!(
            "Built a schema with {} types (query root: `{query_type_name}`).",
            self.types.len(),
        );

        Ok(Schema {
            mutation_type_name,
            query_type_name,
            subscription_type_name,
            supertypes,
            types: self.types,
        })
    }

    pub fn from_str(
        file_path: Option<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        Self::new().load_str(file_path, content)
    }

    pub fn new() -> Self {
        let types = BUILTIN_SCALAR_NAMES.iter()
            .map(|name| (
                name.to_string(),
                GraphQLType::Scalar(LeafType::builtin(name)),
            ))
            .collect();

        Self {
            mutation_type: None,
            pending_extensions: vec![],
            query_type: None,
            schema_def_location: None,
            subscription_type: None,
            types,
        }
    }

    pub fn load_file(
        self,
        file_path: impl AsRef<Path>,
    ) -> Result<Self> {
        self.load_files(vec![file_path])
    }

    pub fn load_files(
        mut self,
        file_paths: Vec<impl AsRef<Path>>,
    ) -> Result<Self> {
        for file_path in file_paths {
            let file_path = file_path.as_ref();
            let file_content = file_reader::read_content(file_path)
                .map_err(|err| SchemaBuildError::SchemaFileReadError(
                    Box::new(err),
                ))?;
            self = self.load_str(
                Some(file_path.to_path_buf()),
                file_content.as_str(),
            )?;
        }
        Ok(self)
    }

    pub fn load_str(
        mut self,
        file_path: Option<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        let ast_doc = ast::schema::parse(content)
            .map_err(|err| SchemaBuildError::ParseError {
                file: file_path.clone(),
                err: err.to_string(),
            })?;

        for def in ast_doc.definitions {
            self.visit_ast_def(file_path.as_deref(), def)?;
        }

        Ok(self)
    }

    fn apply_type_extension(
        &mut self,
        file_path: Option<&Path>,
        type_ext: ast::schema::TypeExtension,
    ) -> Result<()> {
        use ast::schema::TypeExtension;
        let (type_name, position, expected_kind) = match &type_ext {
            TypeExtension::Enum(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::Enum),
            TypeExtension::InputObject(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::InputObject),
            TypeExtension::Interface(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::Interface),
            TypeExtension::Object(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::Object),
            TypeExtension::Scalar(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::Scalar),
            TypeExtension::Union(ext) =>
                (ext.name.clone(), ext.position, GraphQLTypeKind::Union),
        };
        let ext_location = loc::SourceLocation::from_pos(file_path, position);

        let Some(existing_type) = self.types.get_mut(&type_name) else {
            return Err(SchemaBuildError::ExtensionOfUndefinedType {
                type_name,
                extension_type_loc: ext_location,
            });
        };
        if existing_type.kind() != expected_kind {
            return Err(SchemaBuildError::InvalidExtensionType {
                type_name,
                type_kind: existing_type.kind(),
                extension_kind: expected_kind,
                extension_loc: ext_location,
            });
        }

        match type_ext {
            TypeExtension::Interface(ext) => {
                if let Some(data) = existing_type.as_object_or_interface_mut() {
                    Self::extend_object_or_interface(
                        file_path,
                        data,
                        &ext.implements_interfaces,
                        &ext.fields,
                        &ext_location,
                    )?;
                }
            },

            TypeExtension::Object(ext) => {
                if let Some(data) = existing_type.as_object_or_interface_mut() {
                    Self::extend_object_or_interface(
                        file_path,
                        data,
                        &ext.implements_interfaces,
                        &ext.fields,
                        &ext_location,
                    )?;
                }
            },

            TypeExtension::Union(ext) => {
                if let GraphQLType::Union(union_type) = existing_type {
                    for member_name in &ext.types {
                        union_type.members.push(NamedGraphQLTypeRef::new(
                            member_name,
                            ext_location.clone(),
                        ));
                    }
                }
            },

            TypeExtension::Enum(_)
                | TypeExtension::InputObject(_)
                | TypeExtension::Scalar(_) =>
                log::trace!(
                    "Nothing to extend on non-composite type `{type_name}`.",
                ),
        }

        Ok(())
    }

    fn compute_supertypes(&self) -> IndexMap<String, IndexSet<String>> {
        let mut supertypes = IndexMap::new();
        for (type_name, graphql_type) in &self.types {
            if graphql_type.as_object_or_interface().is_none() {
                continue;
            }

            let mut matching = IndexSet::from([type_name.clone()]);
            let mut stack = vec![type_name.as_str()];
            while let Some(next_name) = stack.pop() {
                let Some(data) = self.types.get(next_name)
                    .and_then(|t| t.as_object_or_interface()) else {
                    continue;
                };
                for iface_name in data.interface_names() {
                    if matching.insert(iface_name.to_string()) {
                        stack.push(iface_name);
                    }
                }
            }

            if let GraphQLType::Object(_) = graphql_type {
                for other_type in self.types.values() {
                    if let GraphQLType::Union(union_type) = other_type
                        && union_type.member_names().any(|m| m == type_name) {
                        matching.insert(union_type.name.clone());
                    }
                }
            }

            supertypes.insert(type_name.clone(), matching);
        }

        for union_type in self.types.values().filter_map(|t| t.as_union()) {
            supertypes.insert(
                union_type.name.clone(),
                IndexSet::from([union_type.name.clone()]),
            );
        }

        supertypes
    }

    fn extend_object_or_interface(
        file_path: Option<&Path>,
        data: &mut ObjectOrInterfaceType,
        implements_interfaces: &[String],
        fields: &[ast::schema::Field],
        ext_location: &loc::SourceLocation,
    ) -> Result<()> {
        for iface_name in implements_interfaces {
            data.interfaces.push(NamedGraphQLTypeRef::new(
                iface_name,
                ext_location.clone(),
            ));
        }
        for field in fields {
            Self::insert_field_def(file_path, data, field)?;
        }
        Ok(())
    }

    fn insert_field_def(
        file_path: Option<&Path>,
        data: &mut ObjectOrInterfaceType,
        field: &ast::schema::Field,
    ) -> Result<()> {
        let def_location = loc::SourceLocation::from_pos(file_path, field.position);
        if let Some(existing) = data.fields.get(&field.name) {
            return Err(SchemaBuildError::DuplicateFieldNameDefinition {
                type_name: data.name.clone(),
                field_name: field.name.clone(),
                field_def1: existing.def_location.clone(),
                field_def2: def_location,
            });
        }

        data.fields.insert(field.name.clone(), FieldDefinition {
            def_location,
            name: field.name.clone(),
            type_annotation: TypeAnnotation::from_ast_type(&field.field_type),
        });
        Ok(())
    }

    fn object_or_interface_from_ast(
        file_path: Option<&Path>,
        name: &str,
        position: graphql_parser::Pos,
        implements_interfaces: &[String],
        fields: &[ast::schema::Field],
    ) -> Result<ObjectOrInterfaceType> {
        let location = loc::SourceLocation::from_pos(file_path, position);
        let mut data = ObjectOrInterfaceType {
            def_location: loc::SchemaDefLocation::Schema(location.clone()),
            fields: IndexMap::new(),
            interfaces: vec![],
            name: name.to_string(),
        };
        Self::extend_object_or_interface(
            file_path,
            &mut data,
            implements_interfaces,
            fields,
            &location,
        )?;
        Ok(data)
    }

    fn resolve_root_type(&self, kind: OperationKind) -> Result<Option<String>> {
        let (explicit_decl, default_name) = match kind {
            OperationKind::Mutation => (&self.mutation_type, "Mutation"),
            OperationKind::Query => (&self.query_type, "Query"),
            OperationKind::Subscription => (&self.subscription_type, "Subscription"),
        };

        if let Some(decl) = explicit_decl {
            return match self.types.get(&decl.type_name) {
                Some(GraphQLType::Object(_)) => Ok(Some(decl.type_name.clone())),
                _ => Err(SchemaBuildError::InvalidRootOperationType {
                    operation: kind,
                    type_name: decl.type_name.clone(),
                    location: decl.location.clone(),
                }),
            };
        }

        Ok(match self.types.get(default_name) {
            Some(GraphQLType::Object(_)) => Some(default_name.to_string()),
            _ => None,
        })
    }

    fn validate_type_references(&self) -> Vec<TypeValidationError> {
        let mut errors = vec![];
        for graphql_type in self.types.values() {
            if let Some(data) = graphql_type.as_object_or_interface() {
                for iface_ref in &data.interfaces {
                    match self.types.get(iface_ref.name()) {
                        Some(GraphQLType::Interface(_)) => (),
                        Some(_) => errors.push(TypeValidationError::ImplementsNonInterfaceType {
                            type_name: data.name.clone(),
                            interface_name: iface_ref.name().to_string(),
                            location: iface_ref.ref_location().clone(),
                        }),
                        None => errors.push(TypeValidationError::UndefinedTypeName {
                            undefined_type_name: iface_ref.name().to_string(),
                            location: iface_ref.ref_location().clone(),
                        }),
                    }
                }

                for field_def in data.fields.values() {
                    let inner_name = field_def.type_annotation.innermost_type_name();
                    match self.types.get(inner_name) {
                        Some(GraphQLType::InputObject(_)) =>
                            errors.push(TypeValidationError::InvalidOutputFieldType {
                                type_name: data.name.clone(),
                                field_name: field_def.name.clone(),
                                field_type_name: inner_name.to_string(),
                                location: field_def.def_location.clone(),
                            }),
                        Some(_) => (),
                        None => errors.push(TypeValidationError::UndefinedTypeName {
                            undefined_type_name: inner_name.to_string(),
                            location: field_def.def_location.clone(),
                        }),
                    }
                }
            }

            if let GraphQLType::Union(union_type) = graphql_type {
                for member_ref in &union_type.members {
                    match self.types.get(member_ref.name()) {
                        Some(GraphQLType::Object(_)) => (),
                        Some(_) => errors.push(TypeValidationError::InvalidUnionMember {
                            union_name: union_type.name.clone(),
                            member_name: member_ref.name().to_string(),
                            location: member_ref.ref_location().clone(),
                        }),
                        None => errors.push(TypeValidationError::UndefinedTypeName {
                            undefined_type_name: member_ref.name().to_string(),
                            location: member_ref.ref_location().clone(),
                        }),
                    }
                }
            }
        }
        errors
    }

    fn visit_ast_def(
        &mut self,
        file_path: Option<&Path>,
        def: ast::schema::Definition,
    ) -> Result<()> {
        use ast::schema::Definition;
        match def {
            Definition::SchemaDefinition(schema_def) =>
                self.visit_ast_schemablock_def(file_path, schema_def),
            Definition::TypeDefinition(type_def) =>
                self.visit_ast_type_def(file_path, type_def),
            Definition::TypeExtension(type_ext) => {
                self.pending_extensions.push((
                    file_path.map(|p| p.to_path_buf()),
                    type_ext,
                ));
                Ok(())
            },
            Definition::DirectiveDefinition(directive_def) => {
                log::trace!(
                    "Ignoring definition of directive `@{}`.",
                    directive_def.name,
                );
                Ok(())
            },
        }
    }

    fn visit_ast_schemablock_def(
        &mut self,
        file_path: Option<&Path>,
        schema_def: ast::schema::SchemaDefinition,
    ) -> Result<()> {
        let location = loc::SourceLocation::from_pos(file_path, schema_def.position);
        if let Some(existing_location) = &self.schema_def_location {
            return Err(SchemaBuildError::DuplicateSchemaDefinition {
                location1: existing_location.clone(),
                location2: location,
            });
        }
        self.schema_def_location = Some(location.clone());

        let to_decl = |type_name: Option<String>| type_name.map(|type_name| {
            RootTypeDecl {
                location: location.clone(),
                type_name,
            }
        });
        self.query_type = to_decl(schema_def.query);
        self.mutation_type = to_decl(schema_def.mutation);
        self.subscription_type = to_decl(schema_def.subscription);
        Ok(())
    }

    fn visit_ast_type_def(
        &mut self,
        file_path: Option<&Path>,
        type_def: ast::schema::TypeDefinition,
    ) -> Result<()> {
        use ast::schema::TypeDefinition;
        let leaf = |name: &str, position| LeafType {
            def_location: loc::SchemaDefLocation::Schema(
                loc::SourceLocation::from_pos(file_path, position),
            ),
            name: name.to_string(),
        };

        let graphql_type = match &type_def {
            TypeDefinition::Enum(enum_def) =>
                GraphQLType::Enum(leaf(&enum_def.name, enum_def.position)),

            TypeDefinition::InputObject(input_def) =>
                GraphQLType::InputObject(leaf(&input_def.name, input_def.position)),

            TypeDefinition::Interface(iface_def) =>
                GraphQLType::Interface(Self::object_or_interface_from_ast(
                    file_path,
                    &iface_def.name,
                    iface_def.position,
                    &iface_def.implements_interfaces,
                    &iface_def.fields,
                )?),

            TypeDefinition::Object(obj_def) =>
                GraphQLType::Object(Self::object_or_interface_from_ast(
                    file_path,
                    &obj_def.name,
                    obj_def.position,
                    &obj_def.implements_interfaces,
                    &obj_def.fields,
                )?),

            TypeDefinition::Scalar(scalar_def) =>
                GraphQLType::Scalar(leaf(&scalar_def.name, scalar_def.position)),

            TypeDefinition::Union(union_def) => {
                let location = loc::SourceLocation::from_pos(
                    file_path,
                    union_def.position,
                );
                GraphQLType::Union(UnionType {
                    def_location: loc::SchemaDefLocation::Schema(location.clone()),
                    members: union_def.types.iter()
                        .map(|member_name| NamedGraphQLTypeRef::new(
                            member_name,
                            location.clone(),
                        ))
                        .collect(),
                    name: union_def.name.clone(),
                })
            },
        };

        if let Some(existing_type) = self.types.get(graphql_type.name()) {
            return Err(SchemaBuildError::DuplicateTypeDefinition {
                type_name: graphql_type.name().to_string(),
                def1: existing_type.def_location().clone(),
                def2: graphql_type.def_location().clone(),
            });
        }

        log::trace!("Visited {} `{}`.", graphql_type.kind(), graphql_type.name());
        self.types.insert(graphql_type.name().to_string(), graphql_type);
        Ok(())
    }
}
impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaBuildError {
    #[error("Multiple fields named `{field_name}` were defined on the `{type_name}` type")]
    DuplicateFieldNameDefinition {
        type_name: String,
        field_name: String,
        field_def1: loc::SourceLocation,
        field_def2: loc::SourceLocation,
    },

    #[error("Multiple `schema` blocks were defined")]
    DuplicateSchemaDefinition {
        location1: loc::SourceLocation,
        location2: loc::SourceLocation,
    },

    #[error("Multiple GraphQL types named `{type_name}` were defined")]
    DuplicateTypeDefinition {
        type_name: String,
        def1: loc::SchemaDefLocation,
        def2: loc::SchemaDefLocation,
    },

    #[error("Attempted to extend `{type_name}`, which is not defined elsewhere")]
    ExtensionOfUndefinedType {
        type_name: String,
        extension_type_loc: loc::SourceLocation,
    },

    #[error(
        "Attempted to extend the {type_kind} `{type_name}` with an \
        {extension_kind} extension"
    )]
    InvalidExtensionType {
        type_name: String,
        type_kind: GraphQLTypeKind,
        extension_kind: GraphQLTypeKind,
        extension_loc: loc::SourceLocation,
    },

    #[error("The {operation} root operation type `{type_name}` is not an object type")]
    InvalidRootOperationType {
        operation: OperationKind,
        type_name: String,
        location: loc::SourceLocation,
    },

    #[error("Attempted to build a schema that has no Query operation type defined")]
    NoQueryOperationTypeDefined,

    #[error("Error parsing schema string: {err}")]
    ParseError {
        file: Option<PathBuf>,
        err: String,
    },

    #[error("Failure while trying to read a schema file from disk: {0}")]
    SchemaFileReadError(Box<file_reader::ReadContentError>),

    #[error(
        "Encountered the following type-validation errors while building the \
        schema:\n\n{}",
        errors.iter()
            .map(|s| format!("  * {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )]
    TypeValidationErrors {
        errors: Vec<TypeValidationError>,
    },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TypeValidationError {
    #[error("`{type_name}` declares that it implements `{interface_name}`, which is not an interface")]
    ImplementsNonInterfaceType {
        type_name: String,
        interface_name: String,
        location: loc::SourceLocation,
    },

    #[error("`{type_name}.{field_name}` is declared with the input type `{field_type_name}`")]
    InvalidOutputFieldType {
        type_name: String,
        field_name: String,
        field_type_name: String,
        location: loc::SourceLocation,
    },

    #[error("The `{union_name}` union includes `{member_name}`, which is not an object type")]
    InvalidUnionMember {
        union_name: String,
        member_name: String,
        location: loc::SourceLocation,
    },

    #[error("Reference to undefined type `{undefined_type_name}`")]
    UndefinedTypeName {
        undefined_type_name: String,
        location: loc::SourceLocation,
    },
}
