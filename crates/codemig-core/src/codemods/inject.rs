use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Codemod, MigrationContext};
use crate::error::{MigrateError, Result};
use crate::matcher::CodeView;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").unwrap());

/// Placeholders every template may use besides captured anchor values.
pub const BUILTIN_PLACEHOLDERS: &[&str] = &["indent", "unit", "class_name", "package"];

/// Member source with `{name}` placeholders.
///
/// `{indent}` is the full member indentation of the target class and
/// `{unit}` one indentation level; any other name refers to a captured
/// anchor value.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        PLACEHOLDER
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    pub fn render(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let mut missing = None;
        let rendered = PLACEHOLDER.replace_all(&self.source, |caps: &regex::Captures| {
            let name = &caps[1];
            lookup(name).unwrap_or_else(|| {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            })
        });
        match missing {
            Some(name) => Err(MigrateError::missing(format!("template value `{name}`"))),
            None => Ok(rendered.into_owned()),
        }
    }
}

/// Insert a rendered member right after the anchored class's opening brace,
/// as its own paragraph. Skipped when a method of the same name is already
/// declared.
pub struct InjectMethod {
    method: String,
    declared: Regex,
    template: Template,
}

impl InjectMethod {
    pub fn new(method: &str, template: Template) -> std::result::Result<Self, regex::Error> {
        // A declaration has a return type (or generic / array suffix) before the name.
        let declared = Regex::new(&format!(r"[\w$>\]]\s+{}\s*\(", regex::escape(method)))?;
        Ok(Self {
            method: method.to_string(),
            declared,
            template,
        })
    }
}

impl Codemod for InjectMethod {
    fn name(&self) -> &'static str {
        "inject-method"
    }

    fn detect(&self, ctx: &MigrationContext, content: &str) -> Result<bool> {
        let view = CodeView::new(content);
        let decl = ctx.declaration(&view)?;
        Ok(view.find_members(&decl, &self.declared).is_empty())
    }

    fn apply(&self, ctx: &MigrationContext, content: &str) -> Result<Option<String>> {
        if !self.detect(ctx, content)? {
            debug!("{} already declared, not injecting", self.method);
            return Ok(None);
        }

        let view = CodeView::new(content);
        let decl = ctx.declaration(&view)?;
        let (indent, unit) = view.member_indent(&decl);

        let member = self.template.render(|name| match name {
            "indent" => Some(indent.clone()),
            "unit" => Some(unit.clone()),
            "class_name" => Some(decl.name.clone()),
            "package" => ctx.package.clone(),
            other => ctx.value(other).map(str::to_string),
        })?;
        let member = member.trim_matches('\n');

        let body = &content[decl.open + 1..decl.close];
        let mut out = String::with_capacity(content.len() + member.len() + 4);
        out.push_str(&content[..=decl.open]);
        if body.trim().is_empty() {
            let class_indent = &indent[..indent.len().saturating_sub(unit.len())];
            out.push('\n');
            out.push_str(member);
            out.push('\n');
            out.push_str(class_indent);
        } else {
            // Keep a blank line between the member and whatever follows it.
            let mut lines = body.splitn(3, '\n');
            let spaced = lines.next().is_some_and(|l| l.trim().is_empty())
                && lines.next().is_some_and(|l| l.trim().is_empty())
                && lines.next().is_some();
            out.push_str("\n\n");
            out.push_str(member);
            if !spaced {
                out.push('\n');
            }
            out.push_str(body);
        }
        out.push_str(&content[decl.close..]);

        debug!("Injected {} into class {}", self.method, decl.name);
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUB: &str = "{indent}@Override\n{indent}protected String getRuleKey() {\n{indent}{unit}return \"{rule_key}\";\n{indent}}\n";

    fn ctx() -> MigrationContext {
        let mut ctx = MigrationContext::default();
        ctx.values.insert("rule_key".into(), "MS031".into());
        ctx
    }

    fn injector() -> InjectMethod {
        InjectMethod::new("getRuleKey", Template::new(STUB)).unwrap()
    }

    #[test]
    fn test_injects_after_opening_brace() {
        let content = "public class A extends BaseCheck {\n\n  @Override\n  public void scanFile() {\n  }\n}\n";
        let out = injector().apply(&ctx(), content).unwrap().unwrap();
        assert_eq!(
            out,
            "public class A extends BaseCheck {\n\n  @Override\n  protected String getRuleKey() {\n    return \"MS031\";\n  }\n\n  @Override\n  public void scanFile() {\n  }\n}\n"
        );
    }

    #[test]
    fn test_separates_from_first_member() {
        let content = "class A implements Runnable {\n  public void run() {}\n}\n";
        let out = injector().apply(&ctx(), content).unwrap().unwrap();
        assert_eq!(
            out,
            "class A implements Runnable {\n\n  @Override\n  protected String getRuleKey() {\n    return \"MS031\";\n  }\n\n  public void run() {}\n}\n"
        );
    }

    #[test]
    fn test_follows_file_indentation() {
        let content = "class A {\n    int x;\n}\n";
        let out = injector().apply(&ctx(), content).unwrap().unwrap();
        assert!(out.contains("\n        return \"MS031\";\n"));
    }

    #[test]
    fn test_empty_body() {
        let out = injector().apply(&ctx(), "class A {\n}\n").unwrap().unwrap();
        assert_eq!(
            out,
            "class A {\n  @Override\n  protected String getRuleKey() {\n    return \"MS031\";\n  }\n}\n"
        );
    }

    #[test]
    fn test_existing_declaration_is_not_duplicated() {
        let content = "class A {\n  protected String getRuleKey() { return \"X\"; }\n}\n";
        assert!(!injector().detect(&ctx(), content).unwrap());
        assert!(injector().apply(&ctx(), content).unwrap().is_none());
    }

    #[test]
    fn test_calls_do_not_count_as_declarations() {
        let content = "class A {\n  void f() { log(getRuleKey()); }\n}\n";
        assert!(injector().detect(&ctx(), content).unwrap());
    }

    #[test]
    fn test_missing_value() {
        let err = injector()
            .apply(&MigrationContext::default(), "class A {}\n")
            .unwrap_err();
        assert!(err.to_string().contains("rule_key"));
    }

    #[test]
    fn test_placeholders() {
        let template = Template::new(STUB);
        let names: Vec<_> = template.placeholders().collect();
        assert!(names.contains(&"rule_key"));
        assert!(names.contains(&"unit"));
    }
}
