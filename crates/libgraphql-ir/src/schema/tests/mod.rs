mod schema_builder_tests;
mod schema_tests;
mod type_annotation_tests;
