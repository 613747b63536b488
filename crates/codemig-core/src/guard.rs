use crate::error::{MigrateError, Result};
use crate::matcher::{CodeView, HeaderClauses, Phrase, Span, simple_type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Trigger present, target absent.
    Proceed,
    AlreadyMigrated,
    /// Nothing in the file follows the old convention.
    NotApplicable,
}

/// Something whose presence says which convention a file follows.
#[derive(Debug, Clone)]
pub enum Marker {
    /// A phrase anywhere in code.
    Phrase(Phrase),
    /// The first top-level class lists this interface in its `implements`
    /// clause. Qualified and simple spellings match alike.
    Implements(String),
    /// The first top-level class extends this type.
    Extends(String),
}

impl Marker {
    fn is_present(&self, view: &CodeView<'_>) -> Result<bool> {
        let wanted = match self {
            Marker::Phrase(phrase) => return Ok(phrase.is_present(view)),
            Marker::Implements(name) | Marker::Extends(name) => simple_type_name(name),
        };
        let Some(clauses) = top_level_header(view)? else {
            return Ok(false);
        };
        let names = |span: &Span| simple_type_name(&view.masked()[span.start..span.end]) == wanted;
        Ok(match self {
            Marker::Implements(_) => clauses.interfaces.iter().any(names),
            _ => clauses.extends.as_ref().is_some_and(names),
        })
    }
}

/// Clauses of the first top-level class, `None` when the file declares none.
/// A class whose body never closes is an error.
fn top_level_header(view: &CodeView<'_>) -> Result<Option<HeaderClauses>> {
    match view.find_class(None) {
        Ok(decl) => Ok(Some(view.header_clauses(&decl))),
        Err(MigrateError::MissingAnchor { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Decides from two markers whether a file still needs migrating.
#[derive(Debug, Clone)]
pub struct Guard {
    trigger: Marker,
    target: Option<Marker>,
}

impl Guard {
    pub fn new(trigger: Marker, target: Option<Marker>) -> Self {
        Self { trigger, target }
    }

    /// The target marker wins over the trigger, so a half-migrated file that
    /// shows both is never migrated a second time.
    pub fn should_migrate(&self, content: &str) -> Result<Verdict> {
        let view = CodeView::new(content);
        if let Some(target) = &self.target {
            if target.is_present(&view)? {
                return Ok(Verdict::AlreadyMigrated);
            }
        }
        Ok(if self.trigger.is_present(&view)? {
            Verdict::Proceed
        } else {
            Verdict::NotApplicable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> Guard {
        Guard::new(
            Marker::Phrase(Phrase::new("implements MuleSoftCheck").unwrap()),
            Some(Marker::Phrase(Phrase::new("extends BaseCheck").unwrap())),
        )
    }

    fn header() -> Guard {
        Guard::new(
            Marker::Implements("MuleSoftCheck".into()),
            Some(Marker::Extends("BaseCheck".into())),
        )
    }

    fn verdict(guard: &Guard, content: &str) -> Verdict {
        guard.should_migrate(content).unwrap()
    }

    #[test]
    fn test_verdicts() {
        for g in [phrases(), header()] {
            assert_eq!(verdict(&g, "class A implements MuleSoftCheck {}"), Verdict::Proceed);
            assert_eq!(verdict(&g, "class A extends BaseCheck {}"), Verdict::AlreadyMigrated);
            assert_eq!(verdict(&g, "class A implements Runnable {}"), Verdict::NotApplicable);
        }
    }

    #[test]
    fn test_target_checked_first() {
        let content = "class A extends BaseCheck implements MuleSoftCheck {}";
        assert_eq!(verdict(&phrases(), content), Verdict::AlreadyMigrated);
        assert_eq!(verdict(&header(), content), Verdict::AlreadyMigrated);
    }

    #[test]
    fn test_markers_in_comments_do_not_count() {
        let content = "// was: implements MuleSoftCheck\nclass A implements MuleSoftCheckFactory {}";
        assert_eq!(verdict(&phrases(), content), Verdict::NotApplicable);
        assert_eq!(verdict(&header(), content), Verdict::NotApplicable);
    }

    #[test]
    fn test_header_markers_follow_the_clause_list() {
        let g = header();
        assert_eq!(
            verdict(&g, "class A implements Serializable, MuleSoftCheck {}"),
            Verdict::Proceed
        );
        assert_eq!(
            verdict(&g, "class A implements com.lioncorp.sonar.mulesoft.MuleSoftCheck {}"),
            Verdict::Proceed
        );
        assert_eq!(
            verdict(&g, "class A extends com.acme.BaseCheck {}"),
            Verdict::AlreadyMigrated
        );
    }

    #[test]
    fn test_header_markers_ignore_nested_classes_and_bounds() {
        let g = header();
        assert_eq!(
            verdict(&g, "class Outer implements Runnable {\n  static class Inner implements MuleSoftCheck {}\n}\n"),
            Verdict::NotApplicable
        );
        assert_eq!(
            verdict(&g, "class X<T extends BaseCheck> implements MuleSoftCheck {}"),
            Verdict::Proceed
        );
    }

    #[test]
    fn test_unbalanced_class_is_an_error() {
        let err = header()
            .should_migrate("class A implements MuleSoftCheck {\n")
            .unwrap_err();
        assert!(matches!(err, MigrateError::Unbalanced { .. }));
        assert_eq!(verdict(&header(), "interface A {}\n"), Verdict::NotApplicable);
    }

    #[test]
    fn test_without_target() {
        let g = Guard::new(
            Marker::Phrase(Phrase::new("mock(Document.class)").unwrap()),
            None,
        );
        assert_eq!(verdict(&g, "x = mock(Document.class);"), Verdict::Proceed);
        assert_eq!(verdict(&g, "x = helper();"), Verdict::NotApplicable);
    }
}
