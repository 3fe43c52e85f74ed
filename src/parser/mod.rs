pub mod dom;
pub mod extract;
pub mod sections;
pub mod text;
