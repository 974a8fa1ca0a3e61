pub mod config;
pub mod error;
pub mod introspection;
pub mod pipeline;
pub mod types;

pub use config::{Dialect, GenerateRequest, GenerationOptions, GenerationPlan};
pub use error::{GeneratorError, GeneratorResult};
pub use pipeline::generate;
pub use types::{Buffer, Column, GenerationResult, Schema, SqlType, Table};
