use crate::ast;
use crate::value::Value;

/// A single `@include(if: $variable)` (or, when inverted,
/// `@skip(if: $variable)`) condition.
///
/// Ordered by variable name first, so a condition and its inverse sort next
/// to each other.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct InclusionCondition {
    pub variable: String,
    pub is_inverted: bool,
}
impl InclusionCondition {
    pub fn include(variable: impl AsRef<str>) -> Self {
        Self {
            variable: variable.as_ref().to_string(),
            is_inverted: false,
        }
    }

    pub fn skip(variable: impl AsRef<str>) -> Self {
        Self {
            variable: variable.as_ref().to_string(),
            is_inverted: true,
        }
    }

    pub fn inverted(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            is_inverted: !self.is_inverted,
        }
    }

    pub fn is_inverse_of(&self, other: &Self) -> bool {
        self.variable == other.variable && self.is_inverted != other.is_inverted
    }
}
impl std::fmt::Display for InclusionCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_inverted {
            write!(f, "!${}", self.variable)
        } else {
            write!(f, "${}", self.variable)
        }
    }
}

/// What a single `@include`/`@skip` directive lowers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DirectiveCondition {
    /// `@include(if: true)` or `@skip(if: false)`.
    Always,

    /// `@include(if: false)` or `@skip(if: true)`.
    Never,

    Variable(InclusionCondition),
}
impl DirectiveCondition {
    /// Lowers an `@include`/`@skip` directive. Returns `Ok(None)` for any
    /// other directive.
    pub(crate) fn from_ast(
        directive: &ast::query::Directive,
    ) -> Result<Option<Self>, InvalidConditionArgument> {
        let is_inverted = match directive.name.as_str() {
            "include" => false,
            "skip" => true,
            _ => return Ok(None),
        };

        let if_arg = directive.arguments.iter()
            .find(|(arg_name, _)| arg_name == "if")
            .map(|(_, arg_value)| Value::from_ast(arg_value));

        match (if_arg, is_inverted) {
            (Some(Value::Bool(value)), is_inverted) =>
                Ok(Some(if value != is_inverted { Self::Always } else { Self::Never })),

            (Some(Value::VarRef(variable)), is_inverted) =>
                Ok(Some(Self::Variable(InclusionCondition {
                    variable,
                    is_inverted,
                }))),

            (other, _) => Err(InvalidConditionArgument {
                directive_name: directive.name.clone(),
                position: directive.position,
                value: other,
            }),
        }
    }
}

/// An `@include`/`@skip` directive whose `if` argument is missing or is
/// neither a boolean literal nor a variable.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InvalidConditionArgument {
    pub(crate) directive_name: String,
    pub(crate) position: graphql_parser::Pos,
    pub(crate) value: Option<Value>,
}
