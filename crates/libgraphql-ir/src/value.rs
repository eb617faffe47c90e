use crate::ast;
use indexmap::IndexMap;

/// An argument value as written in an executable document.
///
/// Equality of [Value::Object]s does not depend on the order their entries
/// were written in.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Value {
    VarRef(String),
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    EnumValue(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}
impl Value {
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(str) = self {
            Some(str.as_str())
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_var_name(&self) -> Option<&str> {
        if let Self::VarRef(var_name) = self {
            Some(var_name.as_str())
        } else {
            None
        }
    }

    pub(crate) fn from_ast(ast_value: &ast::query::Value) -> Self {
        use ast::query::Value as AstValue;
        match ast_value {
            AstValue::Variable(var_name) =>
                Value::VarRef(var_name.clone()),

            AstValue::Int(value) =>
                Value::Int(value.as_i64().unwrap_or_default()),

            AstValue::Float(value) =>
                Value::Float(*value),

            AstValue::String(value) =>
                Value::String(value.clone()),

            AstValue::Boolean(value) =>
                Value::Bool(*value),

            AstValue::Null =>
                Value::Null,

            AstValue::Enum(value) =>
                Value::EnumValue(value.clone()),

            AstValue::List(values) =>
                Value::List(values.iter().map(Value::from_ast).collect()),

            AstValue::Object(entries) =>
                Value::Object(entries.iter().map(|(key, ast_value)|
                    (key.clone(), Value::from_ast(ast_value))
                ).collect()),
        }
    }
}
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VarRef(var_name) => write!(f, "${var_name}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => write!(f, "null"),
            Self::EnumValue(value) => write!(f, "{value}"),
            Self::List(values) => {
                write!(f, "[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Object(entries) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
        }
    }
}
