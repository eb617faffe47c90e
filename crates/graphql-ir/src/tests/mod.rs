mod inspect_tests;
mod render_tests;
