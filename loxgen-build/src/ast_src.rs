//! Defines input for code generation process.
//!
//! A grammar is a base name plus a list of rules written as
//! `"Name: Type field, Type field"`. Lowering turns that into an [`AstSrc`],
//! which the emitters consume.

use thiserror::Error;

/// One grammar, as handed to the generator.
#[derive(Debug, Clone, Copy)]
pub struct AstDefSrc<'a> {
  pub base_name: &'a str,
  pub rules:     &'a [&'a str],
}

/// The expression grammar of the tree-walk interpreter.
pub const EXPR_SRC: AstDefSrc<'_> = AstDefSrc {
  base_name: "Expr",
  rules:     &[
    "BinaryExpr:    Expr left, Token op, Expr right",
    "GroupingExpr:  Expr expression",
    "LiteralExpr:   Literal value",
    "UnaryExpr:     Token op, Expr right",
  ],
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GrammarError {
  #[error("rule `{rule}` has no `:` separating the name from its fields")]
  MissingColon { rule: String },

  #[error("rule `{rule}` has an empty name")]
  EmptyName { rule: String },

  #[error("field `{field}` in rule `{rule}` is not a `Type name` pair")]
  MalformedField { rule: String, field: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct AstSrc {
  pub base_name: String,
  pub nodes:     Vec<AstNodeSrc>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AstNodeSrc {
  pub name:   String,
  pub fields: Vec<Field>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Field {
  pub name: String,
  pub ty:   FieldTy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTy {
  /// Points back at the base node type, so nodes can nest.
  Node,
  /// Defined outside the generated file, like `Token` or `Literal`.
  Foreign(String),
}

impl AstSrc {
  pub fn lower(def: &AstDefSrc<'_>) -> Result<AstSrc, GrammarError> {
    let nodes = def
      .rules
      .iter()
      .map(|rule| lower_rule(def.base_name, rule))
      .collect::<Result<Vec<_>, _>>()?;

    debug!("lowered {} rules for `{}`", nodes.len(), def.base_name);

    Ok(AstSrc { base_name: def.base_name.to_string(), nodes })
  }
}

fn lower_rule(base_name: &str, rule: &str) -> Result<AstNodeSrc, GrammarError> {
  let (name, fields) =
    rule.split_once(':').ok_or_else(|| GrammarError::MissingColon { rule: rule.to_string() })?;

  let name = name.trim();
  if name.is_empty() {
    return Err(GrammarError::EmptyName { rule: rule.to_string() });
  }

  let fields = fields.trim();
  let fields = if fields.is_empty() {
    vec![]
  } else {
    fields.split(", ").map(|field| lower_field(base_name, rule, field)).collect::<Result<_, _>>()?
  };

  Ok(AstNodeSrc { name: name.to_string(), fields })
}

fn lower_field(base_name: &str, rule: &str, field: &str) -> Result<Field, GrammarError> {
  let malformed = || GrammarError::MalformedField { rule: rule.to_string(), field: field.to_string() };

  let (ty, name) = field.trim().split_once(' ').ok_or_else(malformed)?;
  let (ty, name) = (ty.trim(), name.trim());
  let is_word = |s: &str| !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == ',');
  if !is_word(ty) || !is_word(name) {
    return Err(malformed());
  }

  let ty = if ty == base_name { FieldTy::Node } else { FieldTy::Foreign(ty.to_string()) };
  Ok(Field { name: name.to_string(), ty })
}

impl FieldTy {
  /// The type as written in the grammar.
  pub fn source_name<'a>(&'a self, base_name: &'a str) -> &'a str {
    match self {
      FieldTy::Node => base_name,
      FieldTy::Foreign(name) => name,
    }
  }
}
