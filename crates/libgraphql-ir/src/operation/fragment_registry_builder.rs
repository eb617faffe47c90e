use crate::ast;
use crate::file_reader;
use crate::loc;
use crate::operation::FragmentRegistry;
use crate::operation::FragmentSource;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

type Result<T> = std::result::Result<T, Vec<FragmentRegistryBuildError>>;

/// Builder for a [FragmentRegistry].
///
/// Fragments can be added from any number of documents (files, strings or
/// already-parsed ASTs); operation definitions in those documents are
/// ignored. [FragmentRegistryBuilder::build] then checks that every spread
/// refers to a defined fragment and records every spread cycle.
///
/// # Example
///
/// ```
/// use libgraphql_ir::operation::FragmentRegistryBuilder;
///
/// let mut builder = FragmentRegistryBuilder::new();
/// builder.add_from_document_str(
///     "fragment UserFields on User { id ...NameFields }",
///     None,
/// ).unwrap();
/// builder.add_from_document_str(
///     "fragment NameFields on User { name }",
///     None,
/// ).unwrap();
///
/// let registry = builder.build().unwrap();
/// let build_order: Vec<_> = registry.build_order().map(|f| f.name()).collect();
/// assert_eq!(build_order, vec!["NameFields", "UserFields"]);
/// ```
#[derive(Debug, Default)]
pub struct FragmentRegistryBuilder {
    fragments: IndexMap<String, FragmentSource>,
}
impl FragmentRegistryBuilder {
    pub fn new() -> Self {
        Self {
            fragments: IndexMap::new(),
        }
    }

    /// Adds one fragment definition. Fails if a fragment with the same name
    /// was already added.
    pub fn add_fragment_definition(
        &mut self,
        fragment_def: ast::query::FragmentDefinition,
        file_path: Option<&Path>,
    ) -> std::result::Result<(), FragmentRegistryBuildError> {
        let name = fragment_def.name.clone();
        if let Some(existing) = self.fragments.get(&name) {
            return Err(FragmentRegistryBuildError::DuplicateFragmentDefinition {
                fragment_name: name,
                first_def_location: loc::SourceLocation::from_pos(
                    existing.file_path.as_deref(),
                    existing.ast.position,
                ),
                second_def_location: loc::SourceLocation::from_pos(
                    file_path,
                    fragment_def.position,
                ),
            });
        }

        log::trace!("Added fragment `{name}`.");
        self.fragments.insert(name, FragmentSource {
            ast: fragment_def,
            file_path: file_path.map(|p| p.to_path_buf()),
        });
        Ok(())
    }

    /// Adds every fragment definition of an already-parsed document.
    pub fn add_from_document_ast(
        &mut self,
        ast: &ast::query::Document,
        file_path: Option<&Path>,
    ) -> Result<()> {
        let mut errors = vec![];
        for def in &ast.definitions {
            if let ast::query::Definition::Fragment(fragment_def) = def
                && let Err(err) = self.add_fragment_definition(fragment_def.clone(), file_path) {
                errors.push(err);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(())
    }

    pub fn add_from_document_file(
        &mut self,
        file_path: impl AsRef<Path>,
    ) -> Result<()> {
        let file_path = file_path.as_ref();
        let file_content = file_reader::read_content(file_path)
            .map_err(|e| vec![FragmentRegistryBuildError::FileReadError(Box::new(e))])?;

        self.add_from_document_str(file_content, Some(file_path))
    }

    pub fn add_from_document_str(
        &mut self,
        content: impl AsRef<str>,
        file_path: Option<&Path>,
    ) -> Result<()> {
        let ast_doc = ast::query::parse(content.as_ref())
            .map_err(|e| vec![FragmentRegistryBuildError::ParseError {
                file: file_path.map(|p| p.to_path_buf()),
                err: e.to_string(),
            }])?;

        self.add_from_document_ast(&ast_doc, file_path)
    }

    /// Builds the [FragmentRegistry].
    ///
    /// Spreads of undefined fragments are errors, all returned at once.
    /// Spread cycles are not: they are recorded (each distinct cycle once,
    /// regardless of which fragment it was found from) and the fragments
    /// taking part in them are left out of the build order.
    pub fn build(self) -> Result<FragmentRegistry> {
        let errors = self.validate_fragment_references();
        if !errors.is_empty() {
            return Err(errors);
        }

        let cycles = self.find_cycles();
        let cyclic_names: HashSet<&str> = cycles.iter()
            .flat_map(|cycle| cycle.iter().map(|name| name.as_str()))
            .collect();

        let mut build_order = vec![];
        let mut visited = HashSet::new();
        for fragment_name in self.fragments.keys() {
            self.visit_for_build_order(
                fragment_name,
                &cyclic_names,
                &mut visited,
                &mut build_order,
            );
        }

        Ok(FragmentRegistry {
            build_order,
            cycles,
            fragments: self.fragments,
        })
    }

    fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut all_cycles = Vec::new();
        let mut seen_normalized_cycles = HashSet::new();

        for fragment_name in self.fragments.keys() {
            let mut path = Vec::new();
            let mut visiting = IndexSet::new();

            self.check_fragment_cycles(
                fragment_name,
                &mut path,
                &mut visiting,
                &mut all_cycles,
                &mut seen_normalized_cycles,
            );
        }

        all_cycles
    }

    fn check_fragment_cycles(
        &self,
        fragment_name: &str,
        path: &mut Vec<String>,
        visiting: &mut IndexSet<String>,
        cycles: &mut Vec<Vec<String>>,
        seen_normalized: &mut HashSet<Vec<String>>,
    ) {
        if let Some(cycle_start) = visiting.get_index_of(fragment_name) {
            let mut cycle = path[cycle_start..].to_vec();
            cycle.push(fragment_name.to_string());

            let normalized = normalize_cycle(&cycle);
            if seen_normalized.insert(normalized.clone()) {
                log::debug!("Found fragment cycle: {}", normalized.join(" → "));
                cycles.push(normalized);
            }
            return;
        }

        let Some(fragment) = self.fragments.get(fragment_name) else {
            return;
        };

        path.push(fragment_name.to_string());
        visiting.insert(fragment_name.to_string());

        for spread in fragment_spreads(&fragment.ast.selection_set) {
            self.check_fragment_cycles(
                &spread.fragment_name,
                path,
                visiting,
                cycles,
                seen_normalized,
            );
        }

        path.pop();
        visiting.pop();
    }

    fn validate_fragment_references(&self) -> Vec<FragmentRegistryBuildError> {
        let mut errors = Vec::new();
        for (fragment_name, fragment) in &self.fragments {
            for spread in fragment_spreads(&fragment.ast.selection_set) {
                if !self.fragments.contains_key(&spread.fragment_name) {
                    errors.push(FragmentRegistryBuildError::UndefinedFragmentReference {
                        fragment_name: fragment_name.clone(),
                        undefined_fragment: spread.fragment_name.clone(),
                        reference_location: loc::SourceLocation::from_pos(
                            fragment.file_path.as_deref(),
                            spread.position,
                        ),
                    });
                }
            }
        }
        errors
    }

    fn visit_for_build_order(
        &self,
        fragment_name: &str,
        cyclic_names: &HashSet<&str>,
        visited: &mut HashSet<String>,
        build_order: &mut Vec<String>,
    ) {
        if cyclic_names.contains(fragment_name)
            || !visited.insert(fragment_name.to_string()) {
            return;
        }
        let Some(fragment) = self.fragments.get(fragment_name) else {
            return;
        };

        for spread in fragment_spreads(&fragment.ast.selection_set) {
            self.visit_for_build_order(
                &spread.fragment_name,
                cyclic_names,
                visited,
                build_order,
            );
        }
        build_order.push(fragment_name.to_string());
    }
}

/// Every fragment spread in `selection_set`, including those nested in
/// fields and inline fragments, in document order.
pub(crate) fn fragment_spreads(
    selection_set: &ast::query::SelectionSet,
) -> Vec<&ast::query::FragmentSpread> {
    let mut spreads = vec![];
    let mut stack = vec![selection_set];
    while let Some(next) = stack.pop() {
        // Reverse so that popping visits selections in document order.
        for selection in next.items.iter().rev() {
            match selection {
                ast::query::Selection::Field(field) =>
                    stack.push(&field.selection_set),
                ast::query::Selection::FragmentSpread(spread) =>
                    spreads.push(spread),
                ast::query::Selection::InlineFragment(inline) =>
                    stack.push(&inline.selection_set),
            }
        }
    }
    spreads
}

/// Rotates a cycle (`[B, C, A, B]`) so that it starts with its
/// lexicographically smallest fragment name (`[A, B, C, A]`). Rotations of
/// the same cycle normalize to the same path.
fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    if cycle.is_empty() {
        return Vec::new();
    }

    let cycle_without_repeat = &cycle[..cycle.len() - 1];
    let min_idx = cycle_without_repeat
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&cycle_without_repeat[min_idx..]);
    normalized.extend_from_slice(&cycle_without_repeat[..min_idx]);
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}

#[derive(Debug, Error, PartialEq)]
pub enum FragmentRegistryBuildError {
    #[error("Duplicate fragment definition: '{fragment_name}'")]
    DuplicateFragmentDefinition {
        fragment_name: String,
        first_def_location: loc::SourceLocation,
        second_def_location: loc::SourceLocation,
    },

    #[error("Failure while trying to read a document from disk: {0}")]
    FileReadError(Box<file_reader::ReadContentError>),

    #[error("Error parsing executable document: {err}")]
    ParseError {
        file: Option<std::path::PathBuf>,
        err: String,
    },

    #[error("Fragment '{fragment_name}' references undefined fragment '{undefined_fragment}'")]
    UndefinedFragmentReference {
        fragment_name: String,
        undefined_fragment: String,
        reference_location: loc::SourceLocation,
    },
}
