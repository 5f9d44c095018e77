//! The path rewriter: skip predicate followed by first-match-wins rules.

use tracing::{debug, trace};

use crate::rewrite::rule::{RuleError, RuleSet};
use crate::rewrite::skip::{RequestContext, Skip, SkipConditions};

/// Result of running a request through the rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// A rule matched; dispatch continues at `path`.
    Rewritten {
        path: String,
        /// Index of the rule that matched.
        rule: usize,
    },
    /// No rule matched; the original path is dispatched.
    Unchanged,
    /// The skip predicate bypassed the rule set.
    Skipped,
}

impl Rewrite {
    /// True only when a rule rewrote the path.
    pub fn matched(&self) -> bool {
        matches!(self, Rewrite::Rewritten { .. })
    }

    /// The path to dispatch: the rewritten path, or `original`.
    pub fn path<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Rewrite::Rewritten { path, .. } => path,
            Rewrite::Unchanged | Rewrite::Skipped => original,
        }
    }

    /// Metric / log label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Rewrite::Rewritten { .. } => "rewritten",
            Rewrite::Unchanged => "unchanged",
            Rewrite::Skipped => "skipped",
        }
    }
}

/// Rewrites request paths using an ordered rule set.
///
/// Immutable after construction and `Send + Sync`; share it behind an
/// `Arc` across requests. `PathRewriter::default()` is the identity
/// transform.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    rules: RuleSet,
    skip: Skip,
}

impl PathRewriter {
    pub fn new(rules: RuleSet, skip: Skip) -> Self {
        Self { rules, skip }
    }

    pub fn builder() -> PathRewriterBuilder {
        PathRewriterBuilder::default()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn skip(&self) -> &Skip {
        &self.skip
    }

    /// Run the rule set against `path`, ignoring the skip predicate.
    pub fn rewrite_path(&self, path: &str) -> Rewrite {
        match self.rules.first_match(path) {
            Some(matched) => {
                debug!(
                    from = %path,
                    to = %matched.path,
                    rule = matched.index,
                    pattern = %matched.rule.pattern(),
                    "Path rewritten"
                );
                Rewrite::Rewritten {
                    path: matched.path,
                    rule: matched.index,
                }
            }
            None => {
                trace!(path = %path, "No rewrite rule matched");
                Rewrite::Unchanged
            }
        }
    }

    /// Evaluate the skip predicate, then the rule set.
    pub fn rewrite(&self, ctx: &RequestContext<'_>) -> Rewrite {
        if self.skip.should_skip(ctx) {
            trace!(method = %ctx.method, path = %ctx.path, "Rewrite skipped");
            return Rewrite::Skipped;
        }
        self.rewrite_path(ctx.path)
    }
}

/// Builder for [`PathRewriter`]. Rules keep insertion order.
#[derive(Debug, Default)]
pub struct PathRewriterBuilder {
    pairs: Vec<(String, String)>,
    skip: Skip,
}

impl PathRewriterBuilder {
    /// Append a rule.
    pub fn rule(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.pairs.push((pattern.into(), replacement.into()));
        self
    }

    /// Append several rules, in iteration order.
    pub fn rules<P, R>(mut self, rules: impl IntoIterator<Item = (P, R)>) -> Self
    where
        P: Into<String>,
        R: Into<String>,
    {
        self.pairs
            .extend(rules.into_iter().map(|(p, r)| (p.into(), r.into())));
        self
    }

    /// Bypass rewriting for requests where `predicate` returns true.
    pub fn skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.skip = self.skip.with_predicate(predicate);
        self
    }

    pub fn skip_conditions(mut self, conditions: SkipConditions) -> Self {
        self.skip = self.skip.with_conditions(conditions);
        self
    }

    /// Compile every rule. Fails on the first malformed rule.
    pub fn build(self) -> Result<PathRewriter, RuleError> {
        let rules = RuleSet::compile(self.pairs)?;
        Ok(PathRewriter::new(rules, self.skip))
    }

    /// Compile every rule, reporting all malformed rules at once.
    pub fn build_all(self) -> Result<PathRewriter, Vec<RuleError>> {
        let rules = RuleSet::compile_all(self.pairs)?;
        Ok(PathRewriter::new(rules, self.skip))
    }
}
