mod compiled_document;
mod definition;
mod fragment_registry;
mod fragment_registry_builder;
mod ir_builder;
mod operation_kind;
mod selection_set_lowering;

pub use compiled_document::CompiledDocument;
pub use definition::Definition;
pub use definition::DefinitionId;
pub use definition::DefinitionName;
pub use definition::Definitions;
pub use definition::NamedFragmentRef;
pub(crate) use definition::SelectionSetNode;
pub use fragment_registry::FragmentRegistry;
pub use fragment_registry::FragmentSource;
pub use fragment_registry_builder::FragmentRegistryBuildError;
pub use fragment_registry_builder::FragmentRegistryBuilder;
pub use ir_builder::IrBuildError;
pub use ir_builder::IrBuilder;
pub use operation_kind::OperationKind;
