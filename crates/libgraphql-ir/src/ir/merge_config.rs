/// How the declared types of two same-named selections of one response key
/// must relate for them to be merged.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum DeclaredTypePolicy {
    /// One declared type must be a subtype of the other (e.g. `User!` and
    /// `Node`).
    #[default]
    Covariant,

    /// Declared types must be identical.
    Exact,
}

/// Knobs for the merged-selections computation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MergeConfig {
    pub declared_type_policy: DeclaredTypePolicy,
}
impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_declared_type_policy(mut self, policy: DeclaredTypePolicy) -> Self {
        self.declared_type_policy = policy;
        self
    }
}
