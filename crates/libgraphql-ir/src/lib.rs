pub mod ast;
mod file_reader;
pub mod ir;
pub mod loc;
mod named_ref;
pub mod operation;
pub mod schema;
#[cfg(test)]
mod test;
mod value;

pub use file_reader::ReadContentError;
pub use named_ref::DerefByName;
pub use named_ref::DerefByNameError;
pub use named_ref::NamedRef;
pub use value::Value;
