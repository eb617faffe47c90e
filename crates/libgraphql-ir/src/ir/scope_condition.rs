use crate::ir::InclusionConditions;

/// One conditional step of a scope: an optional type condition together with
/// optional inclusion conditions (`... on User @include(if: $a)`).
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ScopeCondition {
    pub type_name: Option<String>,
    pub conditions: Option<InclusionConditions>,
}
impl ScopeCondition {
    pub fn new(
        type_name: Option<&str>,
        conditions: Option<InclusionConditions>,
    ) -> Self {
        Self {
            type_name: type_name.map(|name| name.to_string()),
            conditions,
        }
    }

    pub fn of_type(type_name: impl AsRef<str>) -> Self {
        Self::new(Some(type_name.as_ref()), None)
    }

    pub fn is_empty(&self) -> bool {
        self.type_name.is_none() && self.conditions.is_none()
    }
}
impl std::fmt::Display for ScopeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.type_name, &self.conditions) {
            (Some(type_name), Some(conditions)) =>
                write!(f, "{type_name} if {conditions}"),
            (Some(type_name), None) => write!(f, "{type_name}"),
            (None, Some(conditions)) => write!(f, "if {conditions}"),
            (None, None) => write!(f, "*"),
        }
    }
}
