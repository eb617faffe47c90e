//! Plain-text rendering of a compiled document for `graphql-ir inspect`.

use indexmap::IndexSet;
use libgraphql_ir::ir::AnyOf;
use libgraphql_ir::ir::MergedSource;
use libgraphql_ir::ir::SelectionSet;
use libgraphql_ir::ir::SelectionShallowMatchable;
use libgraphql_ir::operation::CompiledDocument;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Every definition of `document`, each followed by its selection sets
/// (outermost first) with their direct and merged selections.
pub(crate) fn render_document(
    document: &CompiledDocument<'_>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (idx, definition) in document.definitions().iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        writeln!(
            out,
            "{} on {} ({})",
            definition.name(),
            definition.type_condition(),
            definition.def_location(),
        )?;
        render_selection_set(&mut out, &document.selection_set(definition.root_ref()))?;
    }
    Ok(out)
}

/// One `- {item}` line per item, continuation lines indented under it.
pub(crate) fn render_errors<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter()
        .map(|item| format!("{INDENT}- {}", item.to_string().replace('\n', "\n    ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_selection_set(out: &mut String, selection_set: &SelectionSet<'_>) -> std::fmt::Result {
    writeln!(out, "{INDENT}{}", selection_set.type_info())?;

    let selections = selection_set.selections();
    let direct = selections.direct();
    if !direct.is_empty() {
        writeln!(out, "{INDENT}{INDENT}direct:")?;
        render_entries(out, direct)?;
    }

    let merged = selections.merged();
    if !merged.is_empty() {
        writeln!(out, "{INDENT}{INDENT}merged:")?;
        render_entries(out, merged)?;
    }
    for conflict in merged.conflicts() {
        writeln!(
            out,
            "{INDENT}{INDENT}conflict: `{}` {}",
            conflict.response_key,
            conflict.kind,
        )?;
    }

    // Only this definition's own nested selection sets; merged ones are
    // rendered where they are written.
    for field in direct.fields().values() {
        if let Some(child) = field.selection_set_ref() {
            render_selection_set(out, &selection_set.resolve(child))?;
        }
    }
    for inline_fragment in direct.inline_fragments().values() {
        render_selection_set(out, &selection_set.resolve(inline_fragment.selection_set_ref()))?;
    }
    Ok(())
}

fn render_entries<S: SelectionShallowMatchable>(out: &mut String, selections: &S) -> std::fmt::Result {
    let pad = INDENT.repeat(3);
    for entry in selections.field_entries() {
        writeln!(
            out,
            "{pad}{}{}",
            entry.field,
            render_conditions(entry.field.inclusion_conditions()),
        )?;
        render_sources(out, entry.sources)?;
    }
    for entry in selections.inline_fragment_entries() {
        let scope_condition = entry.inline_fragment.scope_condition();
        write!(out, "{pad}...")?;
        if let Some(type_name) = &scope_condition.type_name {
            write!(out, " on {type_name}")?;
        }
        if let Some(conditions) = &scope_condition.conditions {
            write!(out, " if {conditions}")?;
        }
        writeln!(out, "{}", render_conditions(entry.inclusion_conditions))?;
        render_sources(out, entry.sources)?;
    }
    for entry in selections.fragment_spread_entries() {
        writeln!(
            out,
            "{pad}...{}{}",
            entry.fragment_spread.fragment_name(),
            render_conditions(entry.fragment_spread.inclusion_conditions()),
        )?;
        render_sources(out, entry.sources)?;
    }
    Ok(())
}

fn render_conditions(conditions: Option<&AnyOf>) -> String {
    match conditions {
        Some(conditions) => format!(" @if({conditions})"),
        None => String::new(),
    }
}

fn render_sources(out: &mut String, sources: Option<&IndexSet<MergedSource>>) -> std::fmt::Result {
    let pad = INDENT.repeat(4);
    for source in sources.into_iter().flatten() {
        writeln!(out, "{pad}<- {source}")?;
    }
    Ok(())
}
