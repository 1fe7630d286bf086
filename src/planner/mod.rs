mod builder;
pub mod constants;
mod generator;
mod scorer;
mod validator;

pub use builder::MenuBuilder;
pub use generator::{GenerationRequest, MenuGenerator};
pub use scorer::{MenuScorer, MenuStats};
pub use validator::{Macro, MenuValidator, Rejection};
