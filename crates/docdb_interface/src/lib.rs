pub mod documents;
pub mod errors;
pub mod people;
