mod question;

pub use question::{OptionAppearance, Question};
