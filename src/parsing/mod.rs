pub mod ast;
pub mod comments;
pub mod go;
pub mod parser;

pub use ast::{CommentGroup, Decl, SourceFile};
pub use comments::CommentMap;
pub use go::GoParser;
pub use parser::SourceParser;
