pub mod circuit;
pub mod codec;
pub mod error;
pub mod gates;
pub mod instructions;
pub mod runtime;
pub mod shell;
