pub mod ast;
pub mod compiler;
pub mod diagnostics;
pub mod interpreter;
pub mod ir;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod stdlib;
pub mod symtab;
pub mod typechecker;

pub use compiler::{Compiled, CompileError, compile, run};
