use crate::ast;
use crate::file_reader;
use crate::ir::IrDiagnostic;
use crate::ir::MergeConfig;
use crate::loc;
use crate::operation::CompiledDocument;
use crate::operation::DefinitionName;
use crate::operation::Definitions;
use crate::operation::FragmentRegistryBuildError;
use crate::operation::FragmentRegistryBuilder;
use crate::operation::OperationKind;
use crate::operation::selection_set_lowering::DefinitionLowering;
use crate::schema::GraphQLTypeKind;
use crate::schema::Schema;
use crate::schema::TypeAnnotation;
use crate::value::Value;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, Vec<IrBuildError>>;

/// Lowers executable documents (operations and fragment definitions) into a
/// [CompiledDocument].
///
/// Fragments from every added document are visible to every operation, so
/// fragments and the operations spreading them may live in different files.
///
/// ```
/// use libgraphql_ir::operation::IrBuilder;
/// use libgraphql_ir::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::from_str(None, r#"
///     type Query { me: User }
///     type User { id: ID!, name: String }
/// "#).unwrap().build().unwrap();
///
/// let mut builder = IrBuilder::new(&schema);
/// builder.add_document_str(
///     "query Me { me { ...UserFields } } fragment UserFields on User { id name }",
///     None,
/// ).unwrap();
/// let document = builder.build().unwrap();
///
/// let me = document.operation(Some("Me")).unwrap()
///     .field_selection_set("me").unwrap();
/// assert_eq!(me.selections().merged().fields().len(), 2);
/// ```
#[derive(Debug)]
pub struct IrBuilder<'schema> {
    config: MergeConfig,
    fragments: FragmentRegistryBuilder,
    operations: Vec<(ast::query::OperationDefinition, Option<PathBuf>)>,
    schema: &'schema Schema,
}
impl<'schema> IrBuilder<'schema> {
    pub fn new(schema: &'schema Schema) -> Self {
        Self {
            config: MergeConfig::default(),
            fragments: FragmentRegistryBuilder::new(),
            operations: vec![],
            schema,
        }
    }

    pub fn with_config(mut self, config: MergeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_document_ast(
        &mut self,
        ast: &ast::query::Document,
        file_path: Option<&Path>,
    ) -> Result<()> {
        self.fragments.add_from_document_ast(ast, file_path)
            .map_err(|errs| errs.into_iter().map(IrBuildError::from).collect::<Vec<_>>())?;

        for def in &ast.definitions {
            if let ast::query::Definition::Operation(op_def) = def {
                self.operations.push((op_def.clone(), file_path.map(|p| p.to_path_buf())));
            }
        }
        Ok(())
    }

    pub fn add_document_file(&mut self, file_path: impl AsRef<Path>) -> Result<()> {
        let file_path = file_path.as_ref();
        let file_content = file_reader::read_content(file_path)
            .map_err(|e| vec![IrBuildError::FileReadError(Box::new(e))])?;
        self.add_document_str(file_content, Some(file_path))
    }

    pub fn add_document_str(
        &mut self,
        content: impl AsRef<str>,
        file_path: Option<&Path>,
    ) -> Result<()> {
        let ast_doc = ast::query::parse(content.as_ref())
            .map_err(|e| vec![IrBuildError::ParseError {
                file: file_path.map(|p| p.to_path_buf()),
                err: e.to_string(),
            }])?;
        self.add_document_ast(&ast_doc, file_path)
    }

    /// Lowers every added fragment and operation.
    ///
    /// Fragments are lowered before anything that spreads them. Fragments
    /// that take part in a spread cycle are not lowered at all: every spread
    /// of them is dropped and the cycle is reported as an
    /// [IrDiagnostic::FragmentCycle] rather than an error.
    pub fn build(self) -> Result<CompiledDocument<'schema>> {
        let registry = self.fragments.build()
            .map_err(|errs| errs.into_iter().map(IrBuildError::from).collect::<Vec<_>>())?;

        let mut diagnostics: Vec<IrDiagnostic> = registry.cycles()
            .iter()
            .map(|cycle_path| IrDiagnostic::FragmentCycle {
                cycle_path: cycle_path.clone(),
            })
            .collect();
        let skipped_fragments: IndexSet<String> = registry.cyclic_fragment_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut definitions = Definitions::default();
        let mut errors = vec![];
        for fragment in registry.build_order() {
            let type_name = fragment.type_condition();
            let file_path = fragment.file_path.as_deref();
            match self.schema.type_named(type_name) {
                Some(graphql_type) if graphql_type.is_composite() => (),
                Some(graphql_type) => {
                    errors.push(IrBuildError::InvalidTypeCondition {
                        type_name: type_name.to_string(),
                        type_kind: graphql_type.kind(),
                        location: loc::SourceLocation::from_pos(file_path, fragment.ast.position),
                    });
                    continue;
                },
                None => {
                    errors.push(IrBuildError::UndefinedTypeName {
                        type_name: type_name.to_string(),
                        location: loc::SourceLocation::from_pos(file_path, fragment.ast.position),
                    });
                    continue;
                },
            }

            let lowered = DefinitionLowering::new(
                self.schema,
                &definitions,
                &skipped_fragments,
                DefinitionName::Fragment(fragment.name().to_string()),
                file_path,
            ).lower(type_name, &fragment.ast.selection_set, fragment.ast.position);
            match lowered {
                Ok((definition, mut definition_diagnostics)) => {
                    diagnostics.append(&mut definition_diagnostics);
                    definitions.push(definition);
                },
                Err(mut errs) => errors.append(&mut errs),
            }
        }

        let mut operation_names: IndexMap<String, loc::SourceLocation> = IndexMap::new();
        for (op_def, file_path) in &self.operations {
            let file_path = file_path.as_deref();
            let (kind, name, selection_set, position) = operation_parts(op_def);
            let location = loc::SourceLocation::from_pos(file_path, position);

            if let Some(name) = name {
                if let Some(first_location) = operation_names.get(name) {
                    errors.push(IrBuildError::DuplicateOperationName {
                        operation_name: name.to_string(),
                        first_location: first_location.clone(),
                        second_location: location,
                    });
                    continue;
                }
                operation_names.insert(name.to_string(), location.clone());
            }

            let Some(root_type_name) = self.schema.root_type_name(kind) else {
                errors.push(IrBuildError::NoRootTypeForOperation {
                    operation_kind: kind,
                    location,
                });
                continue;
            };

            let lowered = DefinitionLowering::new(
                self.schema,
                &definitions,
                &skipped_fragments,
                DefinitionName::Operation {
                    kind,
                    name: name.map(|name| name.to_string()),
                },
                file_path,
            ).lower(root_type_name, selection_set, position);
            match lowered {
                Ok((definition, mut definition_diagnostics)) => {
                    diagnostics.append(&mut definition_diagnostics);
                    definitions.push(definition);
                },
                Err(mut errs) => errors.append(&mut errs),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        log::debug!(
            "Built {} definition(s) with {} diagnostic(s).",
            definitions.len(),
            diagnostics.len(),
        );
        Ok(CompiledDocument {
            config: self.config,
            definitions,
            diagnostics,
            schema: self.schema,
        })
    }
}

fn operation_parts(
    op_def: &ast::query::OperationDefinition,
) -> (OperationKind, Option<&str>, &ast::query::SelectionSet, graphql_parser::Pos) {
    use graphql_parser::query::OperationDefinition as OpDef;
    match op_def {
        OpDef::Mutation(mutation) => (
            OperationKind::Mutation,
            mutation.name.as_deref(),
            &mutation.selection_set,
            mutation.position,
        ),
        OpDef::Query(query) => (
            OperationKind::Query,
            query.name.as_deref(),
            &query.selection_set,
            query.position,
        ),
        OpDef::SelectionSet(selection_set) => (
            OperationKind::Query,
            None,
            selection_set,
            selection_set.span.0,
        ),
        OpDef::Subscription(subscription) => (
            OperationKind::Subscription,
            subscription.name.as_deref(),
            &subscription.selection_set,
            subscription.position,
        ),
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum IrBuildError {
    #[error("Multiple operations named `{operation_name}` were defined")]
    DuplicateOperationName {
        operation_name: String,
        first_location: loc::SourceLocation,
        second_location: loc::SourceLocation,
    },

    #[error("Failure while trying to read a document from disk: {0}")]
    FileReadError(Box<file_reader::ReadContentError>),

    #[error(transparent)]
    FragmentRegistryBuildError(#[from] FragmentRegistryBuildError),

    #[error(
        "The `if` argument of @{directive_name} at {location} must be a \
        boolean literal or a variable"
    )]
    InvalidConditionArgument {
        directive_name: String,
        location: loc::SourceLocation,
        value: Option<Value>,
    },

    #[error("Type condition on the {type_kind} `{type_name}` at {location}: only object, interface and union types can be type conditions")]
    InvalidTypeCondition {
        type_name: String,
        type_kind: GraphQLTypeKind,
        location: loc::SourceLocation,
    },

    #[error("The field `{field_name}` at {location} has composite type `{field_type}` and needs a selection set")]
    MissingSelectionSet {
        field_name: String,
        field_type: TypeAnnotation,
        location: loc::SourceLocation,
    },

    #[error("The schema defines no {operation_kind} root type for the operation at {location}")]
    NoRootTypeForOperation {
        operation_kind: OperationKind,
        location: loc::SourceLocation,
    },

    #[error("Error parsing executable document: {err}")]
    ParseError {
        file: Option<PathBuf>,
        err: String,
    },

    #[error("The field `{field_name}` at {location} has leaf type `{field_type}` and cannot have a selection set")]
    SelectionSetOnLeafField {
        field_name: String,
        field_type: TypeAnnotation,
        location: loc::SourceLocation,
    },

    #[error("The type `{type_name}` has no field named `{field_name}` (selected at {location})")]
    UndefinedFieldName {
        type_name: String,
        field_name: String,
        location: loc::SourceLocation,
    },

    #[error("Spread of undefined fragment `{fragment_name}` at {location}")]
    UndefinedFragment {
        fragment_name: String,
        location: loc::SourceLocation,
    },

    #[error("Reference to undefined type `{type_name}` at {location}")]
    UndefinedTypeName {
        type_name: String,
        location: loc::SourceLocation,
    },
}
