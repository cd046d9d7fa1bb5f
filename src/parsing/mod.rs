pub mod token;
pub mod tokenize;
