//! Keyword-matched canned responses.
//!
//! An ordered decision list: a rule fires when any of its keywords occurs
//! as a case-insensitive substring of the input, the first firing rule
//! wins, and a fixed fallback answers everything else. There is no model
//! behind this and no learning.

/// One canned response with its trigger keywords.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseRule {
    pub keywords: Vec<String>,
    pub response: String,
}

impl ResponseRule {
    pub fn new(keywords: &[&str], response: &str) -> ResponseRule {
        ResponseRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            response: response.to_string(),
        }
    }

    fn matches(&self, normalized_input: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| normalized_input.contains(&k.to_lowercase()))
    }
}

/// The decision list. Rules are evaluated top to bottom.
pub struct Responder {
    rules: Vec<ResponseRule>,
    fallback: String,
}

impl Responder {
    pub fn new(rules: Vec<ResponseRule>, fallback: &str) -> Responder {
        Responder {
            rules,
            fallback: fallback.to_string(),
        }
    }

    /// The built-in rule set for the supplies domain.
    pub fn with_default_rules() -> Responder {
        Responder::new(default_rules(), DEFAULT_FALLBACK)
    }

    /// Custom rules evaluated before the built-in ones.
    pub fn with_rules(custom: Vec<ResponseRule>) -> Responder {
        let mut rules = custom;
        rules.extend(default_rules());
        Responder::new(rules, DEFAULT_FALLBACK)
    }

    pub fn reply(&self, input: &str) -> &str {
        let normalized = input.to_lowercase();
        for rule in &self.rules {
            if rule.matches(&normalized) {
                return &rule.response;
            }
        }
        &self.fallback
    }
}

const DEFAULT_FALLBACK: &str = "I can answer questions about leakage, ghost \
beneficiaries, FPS health, grain quality, DBT fraud risk and anomaly flags.";

fn default_rules() -> Vec<ResponseRule> {
    vec![
        ResponseRule::new(
            &["leakage", "diversion", "truck"],
            "Route deviation above 10% usually indicates diversion in \
             transit. Check the leakage index and the flagged districts.",
        ),
        ResponseRule::new(
            &["ghost", "duplicate", "bogus"],
            "Ghost beneficiary estimates come from duplicate ration-card \
             matching. The savings projection assumes most flagged cards \
             can be removed in a cleanup drive.",
        ),
        ResponseRule::new(
            &["fps", "shop", "uptime"],
            "FPS health tracks shop uptime reported by the ePoS devices. \
             Shops below 70% uptime are worth a field audit.",
        ),
        ResponseRule::new(
            &["dbt", "transaction", "fraud"],
            "Unusual DBT transaction counts are scored against the district \
             baseline. Scores above 60 merit a manual review.",
        ),
        ResponseRule::new(
            &["quality", "grain", "adulter"],
            "Grain quality scoring is binary for now: lab-passed stock \
             scores 95, adulterated samples score 62.",
        ),
        ResponseRule::new(
            &["anomaly", "outlier", "flag", "z-score"],
            "A district is flagged when its total sits more than two \
             standard deviations from the mean. The threshold is \
             configurable per report.",
        ),
        ResponseRule::new(
            &["savings", "crore", "recovery"],
            "Projected savings apply the cleanup rate to the estimated \
             ghost-beneficiary loss.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let responder = Responder::new(
            vec![
                ResponseRule::new(&["card"], "first"),
                ResponseRule::new(&["card", "shop"], "second"),
            ],
            "fallback",
        );
        assert_eq!(responder.reply("how many cards?"), "first");
        assert_eq!(responder.reply("which shop?"), "second");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let responder = Responder::with_default_rules();
        let lower = responder.reply("what does the leakage index mean?");
        let upper = responder.reply("WHAT DOES THE LEAKAGE INDEX MEAN?");
        assert_eq!(lower, upper);
        assert!(lower.contains("diversion"));
    }

    #[test]
    fn fallback_answers_everything_else() {
        let responder = Responder::new(vec![], "nothing matched");
        assert_eq!(responder.reply("completely unrelated"), "nothing matched");
    }

    #[test]
    fn custom_rules_take_precedence() {
        let responder = Responder::with_rules(vec![ResponseRule::new(
            &["leakage"],
            "custom leakage answer",
        )]);
        assert_eq!(
            responder.reply("leakage in Guntur?"),
            "custom leakage answer"
        );
    }
}
