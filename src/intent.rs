//! Small-talk detection that gates retrieval.
//!
//! Queries are checked against an ordered table of case-insensitive regular
//! expressions. The first rule that matches decides the outcome; a query no
//! rule matches is treated as information-seeking. The filter is a heuristic:
//! an information-seeking question that happens to mention "weekend" is still
//! classified as small talk unless a custom rule carves it out.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IntentConfig;

/// Errors from compiling intent rules.
#[derive(Error, Debug)]
pub enum IntentError {
    #[error("Invalid intent pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Built-in small-talk table as `(name, pattern)` pairs, in evaluation order.
pub const BUILTIN_RULES: &[(&str, &str)] = &[
    ("greeting", r"\b(hi|hello|hey|good morning|good afternoon|good evening)\b"),
    ("how-are-you", r"\bhow are you\b"),
    ("hows-it-going", r"\bhow's it going\b"),
    ("whats-up", r"\bwhat's up\b"),
    ("how-do-you-do", r"\bhow do you do\b"),
    ("thanks-you", r"\bthanks? you\b"),
    ("thank-you", r"\bthank you\b"),
    ("farewell", r"\bbye|goodbye|see you\b"),
    ("weather", r"\bweather\b"),
    ("weekend", r"\bweekend\b"),
    ("hobbies", r"\bhobby|hobbies\b"),
    ("weekend-plans", r"\bweekend plans\b"),
    ("day-going", r"\bday\b.*\bgoing\b"),
    ("nice-to-meet-you", r"\bnice to meet you\b"),
    ("pleasure", r"\bpleasure\b"),
    ("good-day", r"\bgood\b.*\bday\b"),
    ("have-a-good", r"\bhave a good\b"),
    ("take-care", r"\btake care\b"),
];

/// A rule as written in `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRuleConfig {
    /// Identifier reported by `classify`.
    pub name: String,

    /// Regular expression, matched case-insensitively anywhere in the query.
    pub pattern: String,

    /// Outcome when this rule matches.
    #[serde(default = "default_conversational")]
    pub conversational: bool,
}

fn default_conversational() -> bool {
    true
}

/// One compiled pattern and the decision it makes.
#[derive(Debug, Clone)]
pub struct IntentRule {
    name: String,
    regex: Regex,
    conversational: bool,
}

impl IntentRule {
    /// Compile a rule; the pattern is case-insensitive.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        conversational: bool,
    ) -> Result<Self, IntentError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| IntentError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.into(),
            regex,
            conversational,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_conversational(&self) -> bool {
        self.conversational
    }

    /// True if the pattern occurs anywhere in `query`.
    pub fn matches(&self, query: &str) -> bool {
        self.regex.is_match(query)
    }
}

impl TryFrom<&IntentRuleConfig> for IntentRule {
    type Error = IntentError;

    fn try_from(config: &IntentRuleConfig) -> Result<Self, Self::Error> {
        Self::new(config.name.clone(), &config.pattern, config.conversational)
    }
}

/// Outcome of classifying a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Conversational input; retrieval is skipped.
    SmallTalk { rule: String },

    /// A question for the corpus. `rule` is set when a rule explicitly
    /// marked the query as information-seeking.
    InformationSeeking { rule: Option<String> },
}

impl Intent {
    pub fn is_conversational(&self) -> bool {
        matches!(self, Intent::SmallTalk { .. })
    }

    /// Name of the rule that decided, if any.
    pub fn rule(&self) -> Option<&str> {
        match self {
            Intent::SmallTalk { rule } => Some(rule),
            Intent::InformationSeeking { rule } => rule.as_deref(),
        }
    }
}

/// Ordered rule table deciding whether a query is small talk.
#[derive(Debug, Clone, Default)]
pub struct IntentFilter {
    rules: Vec<IntentRule>,
}

impl IntentFilter {
    /// Filter with no rules; every query is information-seeking.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Filter with the built-in small-talk table.
    pub fn builtin() -> Result<Self, IntentError> {
        Ok(Self::with_rules(builtin_rules()?))
    }

    /// Filter evaluating `rules` in order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Build from settings: custom rules first, then the built-in table.
    pub fn from_config(config: &IntentConfig) -> Result<Self, IntentError> {
        if !config.enabled {
            tracing::debug!(target: "intent", "intent filter disabled");
            return Ok(Self::empty());
        }

        let mut rules = config
            .rules
            .iter()
            .map(IntentRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if config.builtin_rules {
            rules.extend(builtin_rules()?);
        }

        tracing::debug!(
            target: "intent",
            "intent filter ready: {} custom, {} total rules",
            config.rules.len(),
            rules.len()
        );

        Ok(Self::with_rules(rules))
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify `query`; the first matching rule decides.
    pub fn classify(&self, query: &str) -> Intent {
        for rule in &self.rules {
            let matched = rule.matches(query);
            tracing::trace!(target: "intent", "rule {} matched={matched}", rule.name());

            if matched {
                let name = rule.name().to_string();
                return if rule.is_conversational() {
                    Intent::SmallTalk { rule: name }
                } else {
                    Intent::InformationSeeking { rule: Some(name) }
                };
            }
        }

        Intent::InformationSeeking { rule: None }
    }

    /// True if `query` is small talk.
    pub fn is_conversational(&self, query: &str) -> bool {
        self.classify(query).is_conversational()
    }
}

fn builtin_rules() -> Result<Vec<IntentRule>, IntentError> {
    BUILTIN_RULES
        .iter()
        .map(|(name, pattern)| IntentRule::new(*name, pattern, true))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> IntentFilter {
        IntentFilter::builtin().unwrap()
    }

    #[test]
    fn test_builtin_table_compiles() {
        assert_eq!(filter().rules().len(), 18);
    }

    #[test]
    fn test_small_talk_detected() {
        let filter = filter();
        for query in [
            "hello",
            "Hi there!",
            "how are you",
            "HOW ARE YOU?",
            "bye",
            "thank you so much",
            "what's up",
            "Good morning",
            "How's the weather today?",
            "any weekend plans?",
            "nice to meet you",
            "take care",
            "have a good one",
            "how is your day going",
        ] {
            assert!(filter.is_conversational(query), "expected small talk: {query}");
        }
    }

    #[test]
    fn test_information_seeking_passes() {
        let filter = filter();
        for query in [
            "What are the main types of machine learning?",
            "What is AI ethics?",
            "Explain gradient descent",
            "Which algorithms handle missing data?",
        ] {
            assert!(!filter.is_conversational(query), "expected question: {query}");
        }
    }

    #[test]
    fn test_known_false_positive_is_small_talk() {
        // Heuristic: any mention of a weekend suppresses retrieval
        let intent = filter().classify("What did the report say about weekend staffing?");
        assert_eq!(
            intent,
            Intent::SmallTalk {
                rule: "weekend".to_string()
            }
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let intent = filter().classify("hello, how are you?");
        assert_eq!(intent.rule(), Some("greeting"));
    }

    #[test]
    fn test_no_match_has_no_rule() {
        let intent = filter().classify("Define overfitting");
        assert_eq!(intent, Intent::InformationSeeking { rule: None });
        assert!(!intent.is_conversational());
    }

    #[test]
    fn test_custom_rule_carves_exception() {
        let config = IntentConfig {
            rules: vec![IntentRuleConfig {
                name: "weekend-report".to_string(),
                pattern: r"\bweekend report\b".to_string(),
                conversational: false,
            }],
            ..IntentConfig::default()
        };
        let filter = IntentFilter::from_config(&config).unwrap();

        let intent = filter.classify("Summarize the weekend report");
        assert_eq!(
            intent,
            Intent::InformationSeeking {
                rule: Some("weekend-report".to_string())
            }
        );
        // Built-ins still apply to everything else
        assert!(filter.is_conversational("see you later"));
    }

    #[test]
    fn test_disabled_filter_never_matches() {
        let config = IntentConfig {
            enabled: false,
            ..IntentConfig::default()
        };
        let filter = IntentFilter::from_config(&config).unwrap();
        assert!(filter.rules().is_empty());
        assert!(!filter.is_conversational("hello"));
    }

    #[test]
    fn test_custom_rules_only() {
        let config = IntentConfig {
            builtin_rules: false,
            rules: vec![IntentRuleConfig {
                name: "ping".to_string(),
                pattern: r"^ping$".to_string(),
                conversational: true,
            }],
            ..IntentConfig::default()
        };
        let filter = IntentFilter::from_config(&config).unwrap();
        assert!(filter.is_conversational("PING"));
        assert!(!filter.is_conversational("hello"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = IntentRule::new("broken", r"(unclosed", true).unwrap_err();
        assert!(matches!(err, IntentError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_rule_config_defaults_to_conversational() {
        let rule: IntentRuleConfig =
            toml::from_str("name = \"yo\"\npattern = '\\byo\\b'").unwrap();
        assert!(rule.conversational);
    }
}
