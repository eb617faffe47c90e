use crate::output_utils;
use crate::render;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use libgraphql_ir::ir::DeclaredTypePolicy;
use libgraphql_ir::ir::MergeConfig;
use libgraphql_ir::operation::IrBuilder;
use libgraphql_ir::schema::SchemaBuilder;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct InspectCmd {
    #[arg(
        default_values_t=[
            "graphql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for \
             executable documents within a directory.",
        long,
        value_delimiter = ',',
    )]
    pub(crate) graphql_file_exts: Vec<String>,

    #[arg(
        help="Path to a schema (SDL) file. May be given more than once.",
        long,
        required=true,
    )]
    pub(crate) schema: Vec<PathBuf>,

    #[arg(
        help="Treat fields whose declared types differ at all (even \
             covariantly) as conflicting.",
        long,
    )]
    pub(crate) strict_declared_types: bool,

    #[arg(
        help="Paths to one or more GraphQL files or directories containing \
             GraphQL files with operations and fragments to inspect.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    pub(crate) file_or_dir_paths: Vec<PathBuf>,
}
impl InspectCmd {
    fn inspect(&self) -> anyhow::Result<CommandResult> {
        let file_paths = find_graphql_files(
            &self.file_or_dir_paths,
            &self.graphql_file_exts,
        )?;
        log::debug!("Found {} GraphQL files to inspect.", file_paths.len());

        let schema = SchemaBuilder::new()
            .load_files(self.schema.clone())
            .and_then(|builder| builder.build())
            .context("Failed to build the schema")?;

        let policy =
            if self.strict_declared_types {
                DeclaredTypePolicy::Exact
            } else {
                DeclaredTypePolicy::Covariant
            };
        let mut ir_builder = IrBuilder::new(&schema)
            .with_config(MergeConfig::new().with_declared_type_policy(policy));

        let mut errors = vec![];
        for file_path in &file_paths {
            if let Err(mut errs) = ir_builder.add_document_file(file_path) {
                errors.append(&mut errs);
            }
        }
        if !errors.is_empty() {
            return Ok(CommandResult::stderr(format_args!(
                "{} Failed to load documents:\n{}",
                output_utils::RED_X,
                render::render_errors(&errors),
            )));
        }

        let document = match ir_builder.build() {
            Ok(document) => document,
            Err(errors) => return Ok(CommandResult::stderr(format_args!(
                "{} Failed to build the IR:\n{}",
                output_utils::RED_X,
                render::render_errors(&errors),
            ))),
        };

        let report = render::render_document(&document)?;
        let diagnostics = document.collect_merge_diagnostics();
        if diagnostics.is_empty() {
            Ok(CommandResult::success(Some(format!(
                "{report}\n{} Inspected {} definitions from {} files.",
                output_utils::GREEN_CHECK,
                document.definitions().len(),
                file_paths.len(),
            ))))
        } else {
            Ok(CommandResult::with_failures(
                report,
                format!(
                    "{} Found {} diagnostics:\n{}",
                    output_utils::RED_X,
                    diagnostics.len(),
                    render::render_errors(&diagnostics),
                ),
            ))
        }
    }
}

#[inherent::inherent]
impl RunnableCommand for InspectCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.inspect() {
            Ok(result) => result,
            Err(e) => CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        }
    }
}

/// Every file at or under `paths` whose extension is one of `file_exts`,
/// canonicalized and in walk order.
///
/// A single file path is always included, whatever its extension.
pub(crate) fn find_graphql_files(
    paths: &[PathBuf],
    file_exts: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let file_exts: HashSet<&str> = file_exts.iter()
        .map(|ext| ext.trim_start_matches('.'))
        .collect();

    log::debug!("Scanning {} input paths...", paths.len());
    let mut file_paths = vec![];
    for path in paths {
        for entry in WalkDir::new(path.as_path()).follow_links(true) {
            let entry = entry.with_context(|| format!(
                "Failed to read files at or under {}",
                path.display(),
            ))?;
            let entry_path = entry.path();
            if !entry.file_type().is_file() {
                log::trace!("Skipping non-file: {entry_path:#?}.");
                continue;
            }
            if let Some(ext) = entry_path.extension().map(|s| s.to_string_lossy())
                && file_exts.contains(ext.as_ref()) {
                file_paths.push(canonicalize(entry_path)?);
            }
        }
    }

    if file_paths.is_empty()
        && paths.len() == 1
        && let Some(first_path) = paths.first()
        && first_path.is_file() {
        log::warn!(
            "Proceeding to inspect {first_path:#?} even though it doesn't \
            match any of the --graphql-file-exts.",
        );
        file_paths.push(canonicalize(first_path)?);
    }
    Ok(file_paths)
}

fn canonicalize(path: &Path) -> anyhow::Result<PathBuf> {
    std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))
}
