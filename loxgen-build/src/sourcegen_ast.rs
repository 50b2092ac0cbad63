//! This module generates the C++ AST header consumed by the tree-walk
//! interpreter.
//!
//! Two shapes are supported. [`Style::Visitor`] emits a node hierarchy that is
//! generic over a result type `R`, together with a visitor interface, so every
//! node can route itself to the matching `visit` overload through `accept`.
//! [`Style::Plain`] emits bare structs with constructors and nothing else, for
//! code that inspects node types directly.
//!
//! Both start with the same placeholder declarations for the opaque `Literal`
//! and `Token` types, and both emit one block per rule, in rule order.

use std::{borrow::Cow, fmt, str::FromStr};

use itertools::Itertools;

use crate::ast_src::{AstNodeSrc, AstSrc, Field, FieldTy};

const INDENT: &str = "    ";

const OPAQUE_TYPES: &[&str] = &["Literal", "Token"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
  #[default]
  Visitor,
  Plain,
}

impl Style {
  fn emitter(self) -> &'static dyn Emit {
    match self {
      Style::Visitor => &VisitorStyle,
      Style::Plain => &PlainStyle,
    }
  }
}

impl FromStr for Style {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "visitor" => Ok(Style::Visitor),
      "plain" => Ok(Style::Plain),
      _ => Err(format!("unknown style `{s}`, expected `visitor` or `plain`")),
    }
  }
}

impl fmt::Display for Style {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Style::Visitor => write!(f, "visitor"),
      Style::Plain => write!(f, "plain"),
    }
  }
}

/// Renders the header for `ast` in the given style.
pub fn generate_ast(ast: &AstSrc, style: Style) -> String {
  SourceFile { ast, emit: style.emitter() }.to_string()
}

/// One way of turning an [`AstSrc`] into a header.
trait Emit {
  /// Everything between the opaque type placeholders and the first node.
  fn preamble(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc) -> fmt::Result;

  /// A single node definition, without the trailing blank line.
  fn node(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc, node: &AstNodeSrc) -> fmt::Result;
}

struct SourceFile<'a> {
  ast:  &'a AstSrc,
  emit: &'a dyn Emit,
}

impl fmt::Display for SourceFile<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ty in OPAQUE_TYPES {
      writeln!(f, "typedef struct {ty} {{}} {ty};")?;
    }
    writeln!(f)?;

    self.emit.preamble(f, self.ast)?;

    for node in &self.ast.nodes {
      self.emit.node(f, self.ast, node)?;
      writeln!(f)?;
    }

    Ok(())
  }
}

struct VisitorStyle;

impl VisitorStyle {
  fn field_ty<'a>(ast: &AstSrc, field: &'a Field) -> Cow<'a, str> {
    match &field.ty {
      FieldTy::Node => Cow::Owned(format!("{}<R>*", ast.base_name)),
      FieldTy::Foreign(name) => Cow::Borrowed(name),
    }
  }
}

impl Emit for VisitorStyle {
  fn preamble(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc) -> fmt::Result {
    let base = &ast.base_name;

    // The visitor names every node before any of them is defined.
    for node in &ast.nodes {
      writeln!(f, "template<typename R>")?;
      writeln!(f, "struct {};", node.name)?;
      writeln!(f)?;
    }

    let param = base.to_lowercase();
    writeln!(f, "template<typename R>")?;
    writeln!(f, "struct {base}Visitor {{")?;
    for node in &ast.nodes {
      writeln!(f, "{INDENT}virtual R visit({}<R>* {param}) = 0;", node.name)?;
    }
    writeln!(f, "{INDENT}virtual ~{base}Visitor() = default;")?;
    writeln!(f, "}};")?;
    writeln!(f)?;

    writeln!(f, "template<typename R>")?;
    writeln!(f, "struct {base} {{")?;
    writeln!(f, "{INDENT}virtual R accept({base}Visitor<R>& visitor) = 0;")?;
    writeln!(f, "{INDENT}virtual ~{base}() = default;")?;
    writeln!(f, "}};")?;
    writeln!(f)
  }

  fn node(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc, node: &AstNodeSrc) -> fmt::Result {
    let base = &ast.base_name;
    let ty = |field| Self::field_ty(ast, field);

    writeln!(f, "template<typename R>")?;
    writeln!(f, "struct {} : public {base}<R> {{", node.name)?;
    write_fields(f, &node.fields, ty)?;
    write_constructor(f, node, ty)?;
    writeln!(f)?;
    writeln!(f, "{INDENT}R accept({base}Visitor<R>& visitor) override {{")?;
    writeln!(f, "{INDENT}{INDENT}return visitor.visit(this);")?;
    writeln!(f, "{INDENT}}}")?;
    writeln!(f, "}};")
  }
}

struct PlainStyle;

impl PlainStyle {
  fn field_ty<'a>(ast: &'a AstSrc, field: &'a Field) -> Cow<'a, str> {
    Cow::Borrowed(field.ty.source_name(&ast.base_name))
  }
}

impl Emit for PlainStyle {
  fn preamble(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc) -> fmt::Result {
    writeln!(f, "struct {} {{}};", ast.base_name)?;
    writeln!(f)
  }

  fn node(&self, f: &mut fmt::Formatter<'_>, ast: &AstSrc, node: &AstNodeSrc) -> fmt::Result {
    let ty = |field| Self::field_ty(ast, field);

    writeln!(f, "struct {} final : public {} {{", node.name, ast.base_name)?;
    write_fields(f, &node.fields, ty)?;
    write_constructor(f, node, ty)?;
    writeln!(f, "}};")
  }
}

/// Writes one member per field, followed by a blank line if there were any.
fn write_fields<'a>(
  f: &mut fmt::Formatter<'_>,
  fields: &'a [Field],
  ty: impl Fn(&'a Field) -> Cow<'a, str>,
) -> fmt::Result {
  for field in fields {
    writeln!(f, "{INDENT}{} {};", ty(field), field.name)?;
  }
  if !fields.is_empty() {
    writeln!(f)?;
  }
  Ok(())
}

/// Writes a constructor taking every field in order and assigning each one.
fn write_constructor<'a>(
  f: &mut fmt::Formatter<'_>,
  node: &'a AstNodeSrc,
  ty: impl Fn(&'a Field) -> Cow<'a, str>,
) -> fmt::Result {
  let params = node.fields.iter().format_with(", ", |field, f| {
    f(&format_args!("{} {}", ty(field), field.name))
  });

  writeln!(f, "{INDENT}{}({params}) {{", node.name)?;
  for field in &node.fields {
    writeln!(f, "{INDENT}{INDENT}this->{0} = {0};", field.name)?;
  }
  writeln!(f, "{INDENT}}}")
}

#[cfg(test)]
mod tests {
  use expect_test::expect;

  use super::*;
  use crate::ast_src::{AstDefSrc, EXPR_SRC};

  fn render(base_name: &str, rules: &[&str], style: Style) -> String {
    let ast = AstSrc::lower(&AstDefSrc { base_name, rules }).unwrap();
    generate_ast(&ast, style)
  }

  fn expr(style: Style) -> String { generate_ast(&AstSrc::lower(&EXPR_SRC).unwrap(), style) }

  #[test]
  fn visitor_expr() {
    expect![[r#"
        typedef struct Literal {} Literal;
        typedef struct Token {} Token;

        template<typename R>
        struct BinaryExpr;

        template<typename R>
        struct GroupingExpr;

        template<typename R>
        struct LiteralExpr;

        template<typename R>
        struct UnaryExpr;

        template<typename R>
        struct ExprVisitor {
            virtual R visit(BinaryExpr<R>* expr) = 0;
            virtual R visit(GroupingExpr<R>* expr) = 0;
            virtual R visit(LiteralExpr<R>* expr) = 0;
            virtual R visit(UnaryExpr<R>* expr) = 0;
            virtual ~ExprVisitor() = default;
        };

        template<typename R>
        struct Expr {
            virtual R accept(ExprVisitor<R>& visitor) = 0;
            virtual ~Expr() = default;
        };

        template<typename R>
        struct BinaryExpr : public Expr<R> {
            Expr<R>* left;
            Token op;
            Expr<R>* right;

            BinaryExpr(Expr<R>* left, Token op, Expr<R>* right) {
                this->left = left;
                this->op = op;
                this->right = right;
            }

            R accept(ExprVisitor<R>& visitor) override {
                return visitor.visit(this);
            }
        };

        template<typename R>
        struct GroupingExpr : public Expr<R> {
            Expr<R>* expression;

            GroupingExpr(Expr<R>* expression) {
                this->expression = expression;
            }

            R accept(ExprVisitor<R>& visitor) override {
                return visitor.visit(this);
            }
        };

        template<typename R>
        struct LiteralExpr : public Expr<R> {
            Literal value;

            LiteralExpr(Literal value) {
                this->value = value;
            }

            R accept(ExprVisitor<R>& visitor) override {
                return visitor.visit(this);
            }
        };

        template<typename R>
        struct UnaryExpr : public Expr<R> {
            Token op;
            Expr<R>* right;

            UnaryExpr(Token op, Expr<R>* right) {
                this->op = op;
                this->right = right;
            }

            R accept(ExprVisitor<R>& visitor) override {
                return visitor.visit(this);
            }
        };

    "#]]
    .assert_eq(&expr(Style::Visitor));
  }

  #[test]
  fn plain_expr() {
    expect![[r#"
        typedef struct Literal {} Literal;
        typedef struct Token {} Token;

        struct Expr {};

        struct BinaryExpr final : public Expr {
            Expr left;
            Token op;
            Expr right;

            BinaryExpr(Expr left, Token op, Expr right) {
                this->left = left;
                this->op = op;
                this->right = right;
            }
        };

        struct GroupingExpr final : public Expr {
            Expr expression;

            GroupingExpr(Expr expression) {
                this->expression = expression;
            }
        };

        struct LiteralExpr final : public Expr {
            Literal value;

            LiteralExpr(Literal value) {
                this->value = value;
            }
        };

        struct UnaryExpr final : public Expr {
            Token op;
            Expr right;

            UnaryExpr(Token op, Expr right) {
                this->op = op;
                this->right = right;
            }
        };

    "#]]
    .assert_eq(&expr(Style::Plain));
  }

  #[test]
  fn visitor_unary() {
    let out = render("Expr", &["UnaryExpr: Token op, Expr right"], Style::Visitor);

    assert!(out.contains("struct UnaryExpr : public Expr<R> {\n"));
    assert!(out.contains("    Token op;\n    Expr<R>* right;\n"));
    assert!(out.contains("    UnaryExpr(Token op, Expr<R>* right) {\n"));
    assert!(out.contains("        return visitor.visit(this);\n"));
    assert!(out.contains("    virtual R visit(UnaryExpr<R>* expr) = 0;\n"));
  }

  #[test]
  fn plain_unary() {
    let out = render("Expr", &["UnaryExpr: Token op, Expr right"], Style::Plain);

    assert!(out.contains("struct UnaryExpr final : public Expr {\n"));
    assert!(out.contains("    Token op;\n    Expr right;\n"));
    assert!(out.contains("    UnaryExpr(Token op, Expr right) {\n"));
    assert!(!out.contains("accept"));
    assert!(!out.contains("Visitor"));
  }

  #[test]
  fn one_block_per_rule() {
    let visitor = expr(Style::Visitor);
    assert_eq!(visitor.matches(" : public Expr<R> {").count(), 4);
    assert_eq!(visitor.matches("struct ExprVisitor {").count(), 1);
    assert_eq!(visitor.matches("virtual R visit(").count(), 4);
    assert_eq!(visitor.matches("return visitor.visit(this);").count(), 4);

    let plain = expr(Style::Plain);
    assert_eq!(plain.matches(" final : public Expr {").count(), 4);

    for out in [&visitor, &plain] {
      let positions = ["BinaryExpr(", "GroupingExpr(", "LiteralExpr(", "UnaryExpr("]
        .map(|ctor| out.find(ctor).unwrap());
      assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
  }

  #[test]
  fn deterministic() {
    assert_eq!(expr(Style::Visitor), expr(Style::Visitor));
    assert_eq!(expr(Style::Plain), expr(Style::Plain));
  }

  #[test]
  fn base_name_drives_names() {
    let out = render("Stmt", &["Print: Expr expression, Stmt next"], Style::Visitor);

    assert!(out.contains("struct StmtVisitor {\n"));
    assert!(out.contains("    virtual R visit(Print<R>* stmt) = 0;\n"));
    assert!(out.contains("    virtual R accept(StmtVisitor<R>& visitor) = 0;\n"));
    assert!(out.contains("    Expr expression;\n    Stmt<R>* next;\n"));
  }

  #[test]
  fn node_without_fields() {
    expect![[r#"
        typedef struct Literal {} Literal;
        typedef struct Token {} Token;

        struct Expr {};

        struct NilExpr final : public Expr {
            NilExpr() {
            }
        };

    "#]]
    .assert_eq(&render("Expr", &["NilExpr:"], Style::Plain));
  }

  #[test]
  fn parse_style() {
    assert_eq!("visitor".parse(), Ok(Style::Visitor));
    assert_eq!("plain".parse(), Ok(Style::Plain));
    assert!("fancy".parse::<Style>().is_err());
    assert_eq!(Style::default(), Style::Visitor);
    assert_eq!(Style::Plain.to_string(), "plain");
  }
}
