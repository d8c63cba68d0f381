mod parser;
mod rules;

pub use parser::parse_rules;
pub use rules::MatchRuleSet;
