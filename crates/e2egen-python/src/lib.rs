pub mod emitters;
pub mod generator;
pub mod layout;
pub mod settings_merge;
pub mod templates;
pub mod type_mapper;

pub use generator::{GenerateOptions, PytestSuiteGenerator, generate};
