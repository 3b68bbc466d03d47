mod parser;
mod schema;
mod tools;

pub use parser::CodexAdapter;
