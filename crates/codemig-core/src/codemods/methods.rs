use log::debug;
use regex::Regex;

use super::{Codemod, MigrationContext};
use crate::error::Result;
use crate::matcher::{
    CodeView, Span, expand_to_lines, include_leading_attachments, line_start, remove_lines,
};

/// Remove every direct member method whose signature matches, body and all.
///
/// The body end is found by brace balancing from the signature, so bodies of
/// any length and nesting are removed whole. With `body_contains` set, only
/// methods whose text contains that literal qualify.
pub struct RemoveMethod {
    signature: Regex,
    body_contains: Option<String>,
}

impl RemoveMethod {
    pub fn new(signature: &str, body_contains: Option<String>) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            signature: Regex::new(signature)?,
            body_contains,
        })
    }

    fn first_qualifying(&self, view: &CodeView<'_>, ctx: &MigrationContext) -> Result<Option<Span>> {
        let decl = ctx.declaration(view)?;
        let anchor = format!("method `{}` of class {}", self.signature.as_str(), decl.name);
        for hit in view.find_members(&decl, &self.signature) {
            let extent = view.method_extent(hit, &anchor)?;
            let text = &view.text()[extent.start..extent.end];
            if self
                .body_contains
                .as_deref()
                .is_none_or(|needle| text.contains(needle))
            {
                return Ok(Some(extent));
            }
            debug!(
                "Keeping method at line {}: body does not contain {:?}",
                view.line_of(hit.start),
                self.body_contains
            );
        }
        Ok(None)
    }
}

impl Codemod for RemoveMethod {
    fn name(&self) -> &'static str {
        "remove-method"
    }

    fn detect(&self, ctx: &MigrationContext, content: &str) -> Result<bool> {
        Ok(self.first_qualifying(&CodeView::new(content), ctx)?.is_some())
    }

    fn apply(&self, ctx: &MigrationContext, content: &str) -> Result<Option<String>> {
        let mut text = content.to_string();
        loop {
            let view = CodeView::new(&text);
            let Some(extent) = self.first_qualifying(&view, ctx)? else {
                break;
            };
            let mut region = expand_to_lines(view.masked(), extent);
            if region.start == line_start(&text, region.start) {
                region.start = include_leading_attachments(&view, region.start);
            }
            debug!(
                "Removing method at lines {}-{}",
                view.line_of(region.start),
                view.line_of(extent.end)
            );
            text = remove_lines(&text, region);
        }
        Ok((text != content).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;

    const CHECK: &str = r#"public class FooCheck implements MuleSoftCheck {

  @Override
  public void scanFile(SensorContext context) {
    if (bad) {
      reportIssue(context, "bad } brace");
    }
  }

  private void reportIssue(SensorContext context, String message) {
    NewIssue issue = context.newIssue();
    if (message != null) {
      issue.save();
    }
  }

  /** Line variant. */
  private void reportIssue(SensorContext context, String message, int line) {
    NewIssue issue = context.newIssue();
    issue.save();
  }
}
"#;

    fn remover(body_contains: Option<&str>) -> RemoveMethod {
        RemoveMethod::new(r"private\s+void\s+reportIssue\s*\(", body_contains.map(String::from)).unwrap()
    }

    #[test]
    fn test_removes_all_overloads_with_nested_blocks() {
        let out = remover(Some("newIssue()"))
            .apply(&MigrationContext::default(), CHECK)
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            r#"public class FooCheck implements MuleSoftCheck {

  @Override
  public void scanFile(SensorContext context) {
    if (bad) {
      reportIssue(context, "bad } brace");
    }
  }
}
"#
        );
    }

    #[test]
    fn test_body_filter_keeps_other_helpers() {
        let content = "class A {\n  private void reportIssue(String m) {\n    log(m);\n  }\n}\n";
        let ctx = MigrationContext::default();
        assert!(!remover(Some("newIssue()")).detect(&ctx, content).unwrap());
        assert!(remover(None).detect(&ctx, content).unwrap());
    }

    #[test]
    fn test_neighbouring_members_survive() {
        let content = "class A {\n  @Deprecated int count; // still used\n  @SuppressWarnings(\"unused\")\n  private void reportIssue(String m) {\n    newIssue();\n  }\n  int other;\n}\n";
        let out = remover(None)
            .apply(&MigrationContext::default(), content)
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            "class A {\n  @Deprecated int count; // still used\n  int other;\n}\n"
        );
    }

    #[test]
    fn test_calls_are_not_signatures() {
        let content = "class A {\n  void f() {\n    reportIssue(ctx, m);\n  }\n}\n";
        assert!(
            remover(None)
                .apply(&MigrationContext::default(), content)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_unbalanced_body_is_an_error() {
        let content = "class A {\n  private void reportIssue(String m) {\n    if (x) {\n  }\n}\n";
        let err = remover(None)
            .apply(&MigrationContext::default(), content)
            .unwrap_err();
        assert!(matches!(err, MigrateError::Unbalanced { .. }));
    }
}
