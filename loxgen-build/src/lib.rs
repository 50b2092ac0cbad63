//! Generates the AST node definitions of the lox interpreter from a compact
//! grammar description.
//!
//! ```no_run
//! use loxgen_build::{ast_src::EXPR_SRC, Style};
//!
//! let path = loxgen_build::generate("src".as_ref(), &EXPR_SRC, Style::Visitor).unwrap();
//! assert!(path.ends_with("expr.hpp"));
//! ```

use std::{
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;

pub mod ast_src;
pub mod sourcegen;
mod sourcegen_ast;

pub use ast_src::{AstDefSrc, AstSrc, GrammarError};
pub use sourcegen_ast::{generate_ast, Style};

#[macro_use]
extern crate log;

#[derive(Error, Debug)]
pub enum Error {
  #[error("invalid grammar: {0}")]
  Grammar(#[from] GrammarError),

  #[error("could not write {}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },
}

/// Generates the header for `def` into `out_dir`, returning the path of the
/// generated file.
pub fn generate(out_dir: &Path, def: &AstDefSrc<'_>, style: Style) -> Result<PathBuf, Error> {
  let ast = AstSrc::lower(def)?;
  let contents = generate_ast(&ast, style);

  let path = sourcegen::output_file(out_dir, &ast.base_name);
  debug!("generating {} nodes in {style} style", ast.nodes.len());

  sourcegen::ensure_file_contents(&path, &contents)
    .map_err(|source| Error::Io { path: path.clone(), source })?;

  Ok(path)
}
