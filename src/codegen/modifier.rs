//! Placeholder modifiers (`${@optional definition.id}`)

use std::fmt;
use std::str::FromStr;

/// Token after `@` in a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateModifier {
    /// Elide the placeholder when its path does not resolve
    Optional,
    /// Open a region repeated over a collection
    Iterate,
    IterateBlock,
    /// Close an `iterate` / `iterateBlock` region
    EndBlock,
    OptionalBlock,
    EndOptionalBlock,
}

impl TemplateModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateModifier::Optional => "optional",
            TemplateModifier::Iterate => "iterate",
            TemplateModifier::IterateBlock => "iterateBlock",
            TemplateModifier::EndBlock => "endBlock",
            TemplateModifier::OptionalBlock => "OPTIONAL_BLOCK",
            TemplateModifier::EndOptionalBlock => "END_OPTIONAL_BLOCK",
        }
    }

    pub fn all() -> &'static [TemplateModifier] {
        &[
            TemplateModifier::Optional,
            TemplateModifier::Iterate,
            TemplateModifier::IterateBlock,
            TemplateModifier::EndBlock,
            TemplateModifier::OptionalBlock,
            TemplateModifier::EndOptionalBlock,
        ]
    }

    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            TemplateModifier::Iterate
                | TemplateModifier::IterateBlock
                | TemplateModifier::OptionalBlock
        )
    }

    pub fn closes_block(&self) -> bool {
        matches!(
            self,
            TemplateModifier::EndBlock | TemplateModifier::EndOptionalBlock
        )
    }

    /// Whether this closing marker ends a region opened by `open`
    pub fn closes(&self, open: TemplateModifier) -> bool {
        match self {
            TemplateModifier::EndBlock => matches!(
                open,
                TemplateModifier::Iterate | TemplateModifier::IterateBlock
            ),
            TemplateModifier::EndOptionalBlock => open == TemplateModifier::OptionalBlock,
            _ => false,
        }
    }
}

impl fmt::Display for TemplateModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateModifier {
    type Err = String;

    /// Tokens are matched with their exact spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown template modifier: {}", s))
    }
}
