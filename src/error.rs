//! Error types for loading and applying scenes

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::SolverError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("view '{id}' is declared more than once")]
    DuplicateView { id: String },

    #[error("unknown view '{name}' referenced by '{referenced_by}'")]
    UnknownView {
        name: String,
        referenced_by: String,
        suggestions: Vec<String>,
    },

    #[error("view '{view}' uses '{rule}' but has no parent")]
    MissingParent { view: String, rule: &'static str },

    #[error("view '{view}' is its own ancestor")]
    ParentCycle { view: String },

    #[error("layout error: {0}")]
    Solver(#[from] SolverError),
}

impl SceneError {
    /// Source span of the error, when the TOML parser reported one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Toml(e) => e.span(),
            _ => None,
        }
    }

    /// Similar view names for an unknown reference
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownView { suggestions, .. } if !suggestions.is_empty() => Some(suggestions),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = match self {
            Self::Toml(e) => e.message().to_string(),
            other => other.to_string(),
        };
        let hint = self
            .suggestions()
            .map(|names| format!("\nDid you mean: {}?", names.join(", ")))
            .unwrap_or_default();

        let Some(span) = self.span() else {
            return format!("Error: {}{}", message, hint);
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid scene")
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(report)) => report,
            _ => format!("Error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_view_display() {
        let err = SceneError::UnknownView {
            name: "heder".to_string(),
            referenced_by: "body".to_string(),
            suggestions: vec!["header".to_string()],
        };
        assert!(err.to_string().contains("heder"));
        assert_eq!(err.suggestions(), Some(&["header".to_string()][..]));
        assert!(err.format("", "scene.toml").contains("Did you mean: header?"));
    }

    #[test]
    fn test_missing_parent_display() {
        let err = SceneError::MissingParent {
            view: "body".to_string(),
            rule: "fill",
        };
        assert_eq!(err.to_string(), "view 'body' uses 'fill' but has no parent");
        assert!(err.span().is_none());
        assert!(err.suggestions().is_none());
    }

    #[test]
    fn test_toml_error_has_span() {
        let parsed: Result<toml::Value, _> = toml::from_str("[[view]]\nid = ");
        let err = SceneError::from(parsed.unwrap_err());
        assert!(err.span().is_some());
        let report = err.format("[[view]]\nid = ", "scene.toml");
        assert!(report.contains("scene.toml"));
    }
}
