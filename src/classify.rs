//! Function ownership classification.
//!
//! Rules are evaluated in order and the first match wins, so a
//! `runtime.`-prefixed shim around a UI call is still `RUNTIME`. New
//! categories are added by appending a rule, never by editing earlier ones.

use crate::model::Category;

/// Own-codebase namespace prefix used when nothing else is configured.
pub const DEFAULT_OWN_PREFIX: &str = "game_main/";
/// Go runtime namespace prefix.
pub const RUNTIME_PREFIX: &str = "runtime.";
/// Fragments identifying the third-party UI stack.
pub const THIRD_PARTY_UI_FRAGMENTS: &[&str] = &["ebiten", "ebitenui"];
/// Fragments identifying the entity-component framework.
pub const ENTITY_FRAMEWORK_FRAGMENTS: &[&str] = &["ecs"];

/// Maps a fully-qualified function name to a [`Category`].
pub trait FunctionClassifier {
    fn classify(&self, name: &str) -> Category;
}

/// How a single rule tests a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    Prefix(String),
    Contains(Vec<String>),
}

impl RuleMatch {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Contains(fragments) => fragments
                .iter()
                .any(|fragment| name.contains(fragment.as_str())),
        }
    }
}

/// One ordered classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRule {
    pub matcher: RuleMatch,
    pub category: Category,
}

impl ClassifierRule {
    #[must_use]
    pub fn prefix(prefix: impl Into<String>, category: Category) -> Self {
        Self {
            matcher: RuleMatch::Prefix(prefix.into()),
            category,
        }
    }

    #[must_use]
    pub fn contains(fragments: &[&str], category: Category) -> Self {
        Self {
            matcher: RuleMatch::Contains(fragments.iter().map(|f| (*f).to_string()).collect()),
            category,
        }
    }
}

/// First-match-wins classifier over an ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleClassifier {
    rules: Vec<ClassifierRule>,
}

impl RuleClassifier {
    /// Standard rule set with the given own-code prefix.
    #[must_use]
    pub fn with_own_prefix(own_prefix: &str) -> Self {
        Self {
            rules: vec![
                ClassifierRule::prefix(own_prefix, Category::YourCode),
                ClassifierRule::prefix(RUNTIME_PREFIX, Category::Runtime),
                ClassifierRule::contains(THIRD_PARTY_UI_FRAGMENTS, Category::ThirdPartyUi),
                ClassifierRule::contains(ENTITY_FRAMEWORK_FRAGMENTS, Category::EntityFramework),
            ],
        }
    }

    /// Append a rule after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: ClassifierRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::with_own_prefix(DEFAULT_OWN_PREFIX)
    }
}

impl FunctionClassifier for RuleClassifier {
    fn classify(&self, name: &str) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(name))
            .map_or(Category::Other, |rule| rule.category)
    }
}
