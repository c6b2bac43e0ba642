use serde::{Deserialize, Serialize};

/// How a locator value should be interpreted when re-finding an element.
///
/// Families, strongest first: identifier-based (`Id`, `TestAttribute`,
/// `Name`), accessibility-based (`AriaLabel`, `Label`, `Role`,
/// `Placeholder`), content-based (`ContentText`, `IndexedText`), and
/// structural (`Css`, `CssPath`, `XPath`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Id,
    TestAttribute,
    Name,
    AriaLabel,
    Label,
    Role,
    Placeholder,
    ContentText,
    IndexedText,
    Css,
    CssPath,
    XPath,
}

impl Strategy {
    /// Identifier-family strategies are never generated from values the
    /// dynamic-value filter flags.
    pub fn is_identifier(self) -> bool {
        matches!(self, Strategy::Id | Strategy::TestAttribute | Strategy::Name)
    }

    /// Short display label for reports and the step inspector.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::TestAttribute => "test-attr",
            Strategy::Name => "name",
            Strategy::AriaLabel => "aria-label",
            Strategy::Label => "label",
            Strategy::Role => "role",
            Strategy::Placeholder => "placeholder",
            Strategy::ContentText => "text",
            Strategy::IndexedText => "text-index",
            Strategy::Css => "css",
            Strategy::CssPath => "css-path",
            Strategy::XPath => "xpath",
        }
    }
}

/// One candidate way to re-find an element during replay, generated fresh
/// per step at record time. Immutable; `confidence` is assigned by the
/// ranker and lists attached to a step are always sorted descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub value: String,
    pub confidence: f32,
}

impl Locator {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Locator {
            strategy,
            value: value.into(),
            confidence: 0.0,
        }
    }
}
