//! Recipes: TOML descriptions of one migration, compiled into a guard, a
//! set of required anchors, an ordered codemod list and an import policy.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::codemods::inject::BUILTIN_PLACEHOLDERS;
use crate::codemods::{
    Codemod, InjectMethod, LiteralShape, MigrationContext, RemoveConstant, RemoveMethod,
    ReplaceLiteral, RewriteClause, Template,
};
use crate::error::{MigrateError, Result};
use crate::guard::{Guard, Marker};
use crate::imports::{ImportKey, ImportReconciler, package_of};
use crate::matcher::{CodeView, Phrase};

const BUILTINS: &[(&str, &str)] = &[
    ("base-check", include_str!("../recipes/base-check.toml")),
    ("document-mock", include_str!("../recipes/document-mock.toml")),
];

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("failed to parse recipe: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid recipe `{recipe}`: {reason}")]
    Invalid { recipe: String, reason: String },

    #[error("unknown recipe `{0}`")]
    Unknown(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// File-name suffix selecting files when walking directories.
    #[serde(default)]
    pub suffix: Option<String>,
    pub guard: GuardSpec,
    #[serde(default)]
    pub anchors: AnchorSpec,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub imports: ImportPolicy,
}

/// Markers for the idempotency guard. The old convention is recognised by
/// exactly one of `trigger` (a code phrase) or `implements` (an interface in
/// the top-level class header); the new one by at most one of `target` or
/// `extends`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardSpec {
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub implements: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorSpec {
    /// Require a top-level class declaration.
    #[serde(default)]
    pub class: bool,
    #[serde(default)]
    pub capture: Vec<CaptureSpec>,
}

/// A required value taken from the first group of `pattern`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureSpec {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum StepSpec {
    RewriteClause {
        interface: String,
        base: String,
    },
    RemoveConstant {
        #[serde(default)]
        modifiers: Vec<String>,
        #[serde(rename = "type")]
        ty: String,
        name: String,
        #[serde(default)]
        literal: LiteralShape,
    },
    RemoveMethod {
        signature: String,
        #[serde(default)]
        body_contains: Option<String>,
    },
    InjectMethod {
        method: String,
        template: String,
    },
    ReplaceLiteral {
        from: String,
        to: String,
    },
}

impl StepSpec {
    /// Steps that edit the anchored class and so need it located first.
    fn is_structural(&self) -> bool {
        !matches!(self, StepSpec::ReplaceLiteral { .. })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportPolicy {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub drop_if_unused: Vec<String>,
}

struct Capture {
    name: String,
    re: Regex,
}

/// A compiled recipe. Immutable once built and shared by every worker.
pub struct Recipe {
    name: String,
    description: String,
    suffix: Option<String>,
    source: Option<String>,
    guard: Guard,
    require_class: bool,
    captures: Vec<Capture>,
    codemods: Vec<Box<dyn Codemod>>,
    imports: ImportReconciler,
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field(
                "steps",
                &self.codemods.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Recipe {
    pub fn from_toml(source: &str) -> std::result::Result<Self, RecipeError> {
        let spec: RecipeSpec = toml::from_str(source)?;
        let mut recipe = Self::from_spec(spec)?;
        recipe.source = Some(source.to_string());
        Ok(recipe)
    }

    pub fn from_spec(spec: RecipeSpec) -> std::result::Result<Self, RecipeError> {
        let recipe = spec.name.clone();
        let invalid = |reason: String| RecipeError::Invalid {
            recipe: recipe.clone(),
            reason,
        };

        let marker = |phrase: Option<&str>, header: Option<&str>, role: &str, header_key: &str| {
            match (phrase, header) {
                (Some(_), Some(_)) => Err(invalid(format!(
                    "guard sets both `{role}` and `{header_key}`"
                ))),
                (Some(text), None) if !text.trim().is_empty() => Phrase::new(text)
                    .map(|p| Some(Marker::Phrase(p)))
                    .map_err(|e| invalid(format!("bad marker {text:?}: {e}"))),
                (None, Some(name)) if !name.trim().is_empty() => {
                    let name = name.trim().to_string();
                    Ok(Some(if header_key == "implements" {
                        Marker::Implements(name)
                    } else {
                        Marker::Extends(name)
                    }))
                }
                (None, None) => Ok(None),
                _ => Err(invalid(format!("guard `{role}` must not be empty"))),
            }
        };
        let trigger = marker(
            spec.guard.trigger.as_deref(),
            spec.guard.implements.as_deref(),
            "trigger",
            "implements",
        )?
        .ok_or_else(|| invalid("guard needs a `trigger` or an `implements` marker".into()))?;
        let target = marker(
            spec.guard.target.as_deref(),
            spec.guard.extends.as_deref(),
            "target",
            "extends",
        )?;
        let guard = Guard::new(trigger, target);

        let mut captures = Vec::with_capacity(spec.anchors.capture.len());
        for capture in &spec.anchors.capture {
            let re = Regex::new(&capture.pattern)
                .map_err(|e| invalid(format!("capture `{}`: {e}", capture.name)))?;
            if re.captures_len() < 2 {
                return Err(invalid(format!(
                    "capture `{}` has no group to take its value from",
                    capture.name
                )));
            }
            captures.push(Capture {
                name: capture.name.clone(),
                re,
            });
        }

        let known: BTreeSet<&str> = BUILTIN_PLACEHOLDERS
            .iter()
            .copied()
            .chain(captures.iter().map(|c| c.name.as_str()))
            .collect();

        let mut codemods: Vec<Box<dyn Codemod>> = Vec::with_capacity(spec.steps.len());
        for step in &spec.steps {
            let regex_err = |e: regex::Error| invalid(format!("step pattern: {e}"));
            let codemod: Box<dyn Codemod> = match step {
                StepSpec::RewriteClause { interface, base } => {
                    Box::new(RewriteClause::new(interface, base))
                }
                StepSpec::RemoveConstant {
                    modifiers,
                    ty,
                    name,
                    literal,
                } => Box::new(RemoveConstant::new(modifiers, ty, name, *literal).map_err(regex_err)?),
                StepSpec::RemoveMethod {
                    signature,
                    body_contains,
                } => Box::new(RemoveMethod::new(signature, body_contains.clone()).map_err(regex_err)?),
                StepSpec::InjectMethod { method, template } => {
                    let template = Template::new(template.as_str());
                    if let Some(unknown) = template.placeholders().find(|p| !known.contains(p)) {
                        return Err(invalid(format!(
                            "template for `{method}` uses unknown placeholder `{{{unknown}}}`"
                        )));
                    }
                    Box::new(InjectMethod::new(method, template).map_err(regex_err)?)
                }
                StepSpec::ReplaceLiteral { from, to } => {
                    Box::new(ReplaceLiteral::new(from, to.as_str()).map_err(regex_err)?)
                }
            };
            codemods.push(codemod);
        }

        let keys = |specs: &[String]| {
            specs
                .iter()
                .map(|s| ImportKey::parse(s).ok_or_else(|| invalid(format!("bad import `{s}`"))))
                .collect::<std::result::Result<Vec<_>, _>>()
        };
        let imports = ImportReconciler::new(keys(&spec.imports.add)?, keys(&spec.imports.drop_if_unused)?);

        Ok(Self {
            require_class: spec.anchors.class || spec.steps.iter().any(StepSpec::is_structural),
            name: spec.name,
            description: spec.description,
            suffix: spec.suffix,
            source: None,
            guard,
            captures,
            codemods,
            imports,
        })
    }

    pub fn builtin(name: &str) -> std::result::Result<Self, RecipeError> {
        let source = builtin_source(name).ok_or_else(|| RecipeError::Unknown(name.to_string()))?;
        Self::from_toml(source)
    }

    pub fn builtins() -> std::result::Result<Vec<Self>, RecipeError> {
        BUILTINS.iter().map(|(_, source)| Self::from_toml(source)).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// TOML the recipe was loaded from, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn codemods(&self) -> &[Box<dyn Codemod>] {
        &self.codemods
    }

    pub fn imports(&self) -> &ImportReconciler {
        &self.imports
    }

    /// Resolve the required anchors of `content`. A miss fails the file
    /// before any codemod runs.
    pub fn prepare(&self, path: &Path, content: &str) -> Result<MigrationContext> {
        let view = CodeView::new(content);
        let mut ctx = MigrationContext {
            path: path.to_path_buf(),
            package: package_of(&view),
            ..Default::default()
        };

        if self.require_class {
            ctx.class_name = Some(view.find_class(None)?.name);
        }

        for capture in &self.captures {
            let (_, value) = view.capture(&capture.re).ok_or_else(|| {
                MigrateError::missing(format!("{} (`{}`)", capture.name, capture.re.as_str()))
            })?;
            ctx.values.insert(capture.name.clone(), value);
        }

        Ok(ctx)
    }
}

/// Names of the recipes shipped with the library.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

pub fn builtin_source(name: &str) -> Option<&'static str> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
}
