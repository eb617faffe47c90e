mod any_of_tests;
mod inclusion_conditions_tests;
