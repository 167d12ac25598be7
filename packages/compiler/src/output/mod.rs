pub mod output_ast;
pub mod printer;
