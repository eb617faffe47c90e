use crate::ir::TypeInfo;
use crate::loc;
use crate::schema::TypeAnnotation;
use thiserror::Error;

/// A non-fatal problem found while building or merging selections. The
/// affected selections are left out of the IR; everything else is unaffected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IrDiagnostic {
    #[error("Fragment cycle detected: {}", format_cycle_path(.cycle_path))]
    FragmentCycle { cycle_path: Vec<String> },

    #[error(transparent)]
    MergeConflict(MergeConflict),
}

/// Two selections of the same response key that cannot be merged.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "Conflicting selections for `{response_key}`: {kind}\n  first:  {first}\n  second: {second}"
)]
pub struct MergeConflict {
    pub response_key: String,
    pub kind: ConflictKind,
    pub first: ConflictSite,
    pub second: ConflictSite,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConflictKind {
    Arguments,
    DeclaredType {
        first_type: TypeAnnotation,
        second_type: TypeAnnotation,
    },
    FieldName {
        first_name: String,
        second_name: String,
    },
}
impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arguments => write!(f, "arguments differ"),
            Self::DeclaredType { first_type, second_type } =>
                write!(f, "declared types `{first_type}` and `{second_type}` are incompatible"),
            Self::FieldName { first_name, second_name } =>
                write!(f, "selects both `{first_name}` and `{second_name}`"),
        }
    }
}

/// One side of a [MergeConflict].
#[derive(Clone, Debug, PartialEq)]
pub struct ConflictSite {
    pub type_info: TypeInfo,
    pub fragment: Option<String>,
    pub location: loc::SourceLocation,
}
impl std::fmt::Display for ConflictSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_info)?;
        if let Some(fragment) = &self.fragment {
            write!(f, " (via ...{fragment})")?;
        }
        write!(f, " at {}", self.location)
    }
}

fn format_cycle_path(cycle: &[String]) -> String {
    cycle.join(" → ")
}
