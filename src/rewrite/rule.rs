//! Rewrite rules and ordered rule sets.

use crate::rewrite::pattern::{Pattern, PatternError};
use crate::rewrite::template::{Template, TemplateError};

/// Why a rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleErrorKind {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("invalid replacement: {0}")]
    Template(#[from] TemplateError),
}

/// A rule that failed to compile, with its position in the rule list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rule #{index} ({pattern} -> {replacement}): {kind}")]
pub struct RuleError {
    pub index: usize,
    pub pattern: String,
    pub replacement: String,
    pub kind: RuleErrorKind,
}

/// A compiled (pattern, replacement) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pattern: Pattern,
    replacement: Template,
}

impl RewriteRule {
    /// Compile a rule, checking that every `$N` has a matching wildcard.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, RuleErrorKind> {
        let pattern = Pattern::parse(pattern)?;
        let replacement = Template::parse(replacement)?;
        replacement.check_captures(pattern.wildcard_count())?;
        Ok(Self { pattern, replacement })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn replacement(&self) -> &Template {
        &self.replacement
    }

    /// Rewrite `path` if it matches this rule's pattern.
    pub fn apply(&self, path: &str) -> Option<String> {
        self.pattern
            .captures(path)
            .map(|captures| self.replacement.render(&captures))
    }
}

/// A successful rule match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Position of the matching rule in the set.
    pub index: usize,
    pub rule: &'a RewriteRule,
    pub path: String,
}

/// Ordered, immutable list of rules. The first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// Compile (pattern, replacement) pairs in order.
    ///
    /// Stops at the first invalid pair; use [`RuleSet::compile_all`] to
    /// collect every error.
    pub fn compile<P, R>(pairs: impl IntoIterator<Item = (P, R)>) -> Result<Self, RuleError>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        Self::compile_all(pairs).map_err(|mut errors| errors.remove(0))
    }

    /// Compile (pattern, replacement) pairs, reporting every invalid pair.
    pub fn compile_all<P, R>(
        pairs: impl IntoIterator<Item = (P, R)>,
    ) -> Result<Self, Vec<RuleError>>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let mut rules = Vec::new();
        let mut errors = Vec::new();

        for (index, (pattern, replacement)) in pairs.into_iter().enumerate() {
            let (pattern, replacement) = (pattern.as_ref(), replacement.as_ref());
            match RewriteRule::new(pattern, replacement) {
                Ok(rule) => rules.push(rule),
                Err(kind) => errors.push(RuleError {
                    index,
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                    kind,
                }),
            }
        }

        if errors.is_empty() {
            Ok(Self { rules })
        } else {
            Err(errors)
        }
    }

    /// Find the first rule matching `path` and compute the rewritten path.
    pub fn first_match(&self, path: &str) -> Option<RuleMatch<'_>> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.apply(path).map(|path| RuleMatch { index, rule, path })
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter()
    }
}
