mod loader;

pub use loader::{LoadError, load_questions, load_questions_from_json, parse_questions};
