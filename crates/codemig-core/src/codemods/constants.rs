use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Codemod, MigrationContext};
use crate::error::Result;
use crate::matcher::{CodeView, Span, expand_to_lines, include_leading_attachments, remove_lines};

/// Shape of the initialiser a removable constant must have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiteralShape {
    #[default]
    String,
    Number,
    Char,
    Any,
}

impl LiteralShape {
    fn pattern(self) -> &'static str {
        match self {
            // Literal contents are blanked in the mask, so only the quotes remain.
            LiteralShape::String => r#""[^"\n]*""#,
            LiteralShape::Char => r"'[^'\n]*'",
            LiteralShape::Number => r"-?[0-9][0-9_]*(?:\.[0-9_]+)?[lLfFdD]?",
            LiteralShape::Any => r"[^;{}]+?",
        }
    }
}

/// Remove field declarations matched by their full shape (modifiers, type,
/// name and literal initialiser) among the anchored class's direct members.
pub struct RemoveConstant {
    name: String,
    re: Regex,
}

impl RemoveConstant {
    pub fn new(
        modifiers: &[String],
        ty: &str,
        name: &str,
        literal: LiteralShape,
    ) -> std::result::Result<Self, regex::Error> {
        let modifiers = if modifiers.is_empty() {
            String::new()
        } else {
            let alternatives = modifiers
                .iter()
                .map(|m| regex::escape(m))
                .collect::<Vec<_>>()
                .join("|");
            format!(r"(?:(?:{alternatives})\s+){{{}}}", modifiers.len())
        };
        let ty = ty
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s*");
        let pattern = format!(
            r"(?m)^[ \t]*{modifiers}{ty}\s+{}\s*=\s*{}\s*;",
            regex::escape(name),
            literal.pattern()
        );
        Ok(Self {
            name: name.to_string(),
            re: Regex::new(&pattern)?,
        })
    }

    fn first_match(&self, view: &CodeView<'_>, ctx: &MigrationContext) -> Result<Option<Span>> {
        let decl = ctx.declaration(view)?;
        Ok(view.find_members(&decl, &self.re).into_iter().next())
    }
}

impl Codemod for RemoveConstant {
    fn name(&self) -> &'static str {
        "remove-constant"
    }

    fn detect(&self, ctx: &MigrationContext, content: &str) -> Result<bool> {
        Ok(self.first_match(&CodeView::new(content), ctx)?.is_some())
    }

    fn apply(&self, ctx: &MigrationContext, content: &str) -> Result<Option<String>> {
        let mut text = content.to_string();
        loop {
            let view = CodeView::new(&text);
            let Some(hit) = self.first_match(&view, ctx)? else {
                break;
            };
            let mut region = expand_to_lines(view.masked(), hit);
            if region.start == crate::matcher::line_start(&text, region.start) {
                region.start = include_leading_attachments(&view, region.start);
            }
            debug!("Removing constant {} at line {}", self.name, view.line_of(hit.start));
            text = remove_lines(&text, region);
        }
        Ok((text != content).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remover(name: &str) -> RemoveConstant {
        let modifiers = ["private", "static", "final"].map(String::from);
        RemoveConstant::new(&modifiers, "String", name, LiteralShape::String).unwrap()
    }

    #[test]
    fn test_removes_class_level_constant() {
        let content = "class A {\n\n  private static final String REPOSITORY_KEY = \"mulesoft\";\n  private static final String RULE_KEY = \"MS001\";\n\n  void f() {}\n}\n";
        let ctx = MigrationContext::default();
        let out = remover("RULE_KEY").apply(&ctx, content).unwrap().unwrap();
        let out = remover("REPOSITORY_KEY").apply(&ctx, &out).unwrap().unwrap();
        assert_eq!(out, "class A {\n\n  void f() {}\n}\n");
    }

    #[test]
    fn test_shape_must_match() {
        let content = "class A {\n  private static final int RULE_KEY = 3;\n  public static final String RULE_KEY2 = \"x\";\n  void f() {\n    final String RULE_KEY = \"y\";\n  }\n}\n";
        let ctx = MigrationContext::default();
        assert!(!remover("RULE_KEY").detect(&ctx, content).unwrap());
        assert!(remover("RULE_KEY").apply(&ctx, content).unwrap().is_none());
    }

    #[test]
    fn test_modifier_order_and_trailing_comment() {
        let content = "class A {\n  static private final String RULE_KEY = \"a;b\"; // old\n  int x;\n}\n";
        let out = remover("RULE_KEY")
            .apply(&MigrationContext::default(), content)
            .unwrap()
            .unwrap();
        assert_eq!(out, "class A {\n  int x;\n}\n");
    }

    #[test]
    fn test_one_line_member_above_is_kept() {
        let content = "class A {\n  @Override public String toString() { return \"x\"; }\n  /** Key. */\n  private static final String RULE_KEY = \"MS1\";\n}\n";
        let out = remover("RULE_KEY")
            .apply(&MigrationContext::default(), content)
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            "class A {\n  @Override public String toString() { return \"x\"; }\n}\n"
        );
    }

    #[test]
    fn test_number_shape() {
        let c = RemoveConstant::new(&["private".into()], "int", "LIMIT", LiteralShape::Number).unwrap();
        let out = c
            .apply(&MigrationContext::default(), "class A {\n  private int LIMIT = 10;\n}\n")
            .unwrap()
            .unwrap();
        assert_eq!(out, "class A {\n}\n");
    }
}
