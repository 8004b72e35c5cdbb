//! Parse calculator commands from a line of text.
//! Grammar: `<command> key=value ... [flag ...]`, e.g. `loan price=1.2m down=20% rate=3.5 term=25`.

use regex::Regex;
use std::{collections::BTreeMap, str::FromStr, sync::OnceLock};

use crate::error::ParseError;

/// Output switch accepted by every command.
pub const JSON_FLAG: &str = "--json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Loan,
    Schedule,
    Costs,
    Service,
    Community,
    RentVsBuy,
    Compare,
    Properties,
    Checklist,
    Help,
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = match s.to_ascii_lowercase().replace('-', "").as_str() {
            "loan" | "mortgage" => Command::Loan,
            "schedule" | "amortization" => Command::Schedule,
            "costs" | "fees" => Command::Costs,
            "service" | "servicecharge" => Command::Service,
            "community" => Command::Community,
            "rentvsbuy" | "rvb" => Command::RentVsBuy,
            "compare" => Command::Compare,
            "properties" | "list" => Command::Properties,
            "checklist" | "documents" | "docs" => Command::Checklist,
            "help" | "?" => Command::Help,
            _ => return Err(ParseError::UnknownCommand(s.to_string())),
        };
        Ok(c)
    }
}

/// A number as typed: `1.2m`, `250k`, `1_000_000`, `3.5%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    pub value: f64,
    pub percent: bool,
}

/// Down payments may be absolute or a share of the price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Absolute(f64),
    PercentOf(f64),
}

impl Amount {
    pub fn resolve(self, base: f64) -> f64 {
        match self {
            Amount::Absolute(v) => v,
            Amount::PercentOf(p) => base * p / 100.0,
        }
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^([+-]?(?:\d[\d_,]*(?:\.\d+)?|\.\d+))\s*(k|m|%)?$").expect("number regex")
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z][\w-]*)=(?:"([^"]*)"|(\S+))|"([^"]*)"|(\S+)"#).expect("token regex")
    })
}

pub fn parse_number(raw: &str) -> Option<Number> {
    let c = number_re().captures(raw.trim())?;
    let digits: String = c[1].chars().filter(|ch| *ch != '_' && *ch != ',').collect();
    let mut value: f64 = digits.parse().ok()?;
    let mut percent = false;
    match c.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("k") => value *= 1_000.0,
        Some("m") => value *= 1_000_000.0,
        Some("%") => percent = true,
        _ => {}
    }
    Some(Number { value, percent })
}

/// Long-form argument names fold onto the short keys the calculators read.
const ALIASES: &[(&str, &str)] = &[
    ("property_price", "price"),
    ("down_payment", "down"),
    ("interest", "rate"),
    ("interest_rate", "rate"),
    ("term_years", "term"),
    ("loan_term", "term"),
    ("tenure", "term"),
    ("size_sq_ft", "size"),
    ("sqft", "size"),
    ("age_years", "age"),
    ("property_type", "type"),
    ("name", "community"),
    ("area", "community"),
    ("first", "a"),
    ("second", "b"),
    ("id", "property"),
    ("appreciation_rate", "appreciation"),
    ("monthly_rent", "rent"),
    ("rent_increase_rate", "rent_increase"),
    ("security_deposit", "deposit"),
    ("investment_return", "return"),
    ("analysis_years", "years"),
    ("period", "years"),
    ("holding_years", "years"),
    ("annual_maintenance", "maintenance"),
    ("property_tax", "tax"),
    ("buyer_type", "buyer"),
    ("residence_status", "residence"),
    ("lender", "bank"),
];

fn canonical_key(raw: &str) -> String {
    let k = raw.to_ascii_lowercase().replace('-', "_");
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == k)
        .map(|(_, key)| (*key).to_string())
        .unwrap_or(k)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, String>,
    flags: Vec<String>,
}

impl Args {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    fn bad(key: &str, value: &str) -> ParseError {
        ParseError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn number(&self, key: &str) -> Result<Option<Number>, ParseError> {
        match self.text(key) {
            None => Ok(None),
            Some(raw) => parse_number(raw).map(Some).ok_or_else(|| Self::bad(key, raw)),
        }
    }

    /// Currency amount; a `%` suffix makes no sense here.
    pub fn money(&self, key: &str) -> Result<Option<f64>, ParseError> {
        match self.number(key)? {
            Some(n) if n.percent => Err(Self::bad(key, self.text(key).unwrap_or_default())),
            other => Ok(other.map(|n| n.value)),
        }
    }

    /// Rates are percentages either way: `3.5` and `3.5%` are the same.
    pub fn rate(&self, key: &str) -> Result<Option<f64>, ParseError> {
        Ok(self.number(key)?.map(|n| n.value))
    }

    pub fn amount(&self, key: &str) -> Result<Option<Amount>, ParseError> {
        Ok(self.number(key)?.map(|n| {
            if n.percent {
                Amount::PercentOf(n.value)
            } else {
                Amount::Absolute(n.value)
            }
        }))
    }

    /// Whole years; `25`, `25y` and `25yrs` are accepted.
    pub fn years(&self, key: &str) -> Result<Option<u32>, ParseError> {
        let Some(raw) = self.text(key) else {
            return Ok(None);
        };
        let digits = raw
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_alphabetic());
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Self::bad(key, raw))
    }

    pub fn id(&self, key: &str) -> Result<Option<u32>, ParseError> {
        match self.text(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| Self::bad(key, raw)),
        }
    }

    /// Reject keys and flags the command does not read. `--json` is always allowed.
    pub fn only(&self, keys: &[&str], flags: &[&str]) -> Result<(), ParseError> {
        if let Some(k) = self.values.keys().find(|k| !keys.contains(&k.as_str())) {
            return Err(ParseError::UnknownArgument(k.clone()));
        }
        if let Some(f) = self
            .flags
            .iter()
            .find(|f| f.as_str() != JSON_FLAG && !flags.contains(&f.as_str()))
        {
            return Err(ParseError::UnknownArgument(f.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub command: Command,
    pub args: Args,
}

impl Request {
    pub fn wants_json(&self) -> bool {
        self.args.flag(JSON_FLAG)
    }
}

pub fn parse_request(text: &str) -> Result<Request, ParseError> {
    let t = text.trim();
    let mut words = t.splitn(2, char::is_whitespace);
    let head = words.next().filter(|w| !w.is_empty()).ok_or(ParseError::Empty)?;
    let command: Command = head.parse()?;
    let rest = words.next().unwrap_or("");

    let mut args = Args::default();
    let mut covered = 0usize;
    for c in token_re().captures_iter(rest) {
        let whole = c.get(0).map(|m| m.as_str()).unwrap_or_default();
        // anything skipped between tokens must be whitespace
        let start = c.get(0).map(|m| m.start()).unwrap_or(0);
        if !rest[covered..start].trim().is_empty() {
            return Err(ParseError::Malformed(rest[covered..start].trim().to_string()));
        }
        covered = c.get(0).map(|m| m.end()).unwrap_or(covered);

        if let Some(key) = c.get(1) {
            let value = c.get(2).or_else(|| c.get(3)).map(|m| m.as_str()).unwrap_or_default();
            args.values.insert(canonical_key(key.as_str()), value.to_string());
        } else if c.get(4).is_some() {
            // a quoted string on its own is not an argument
            return Err(ParseError::Malformed(whole.to_string()));
        } else if whole.contains('=') {
            return Err(ParseError::Malformed(whole.to_string()));
        } else {
            args.flags.push(whole.to_ascii_lowercase());
        }
    }
    if !rest[covered..].trim().is_empty() {
        return Err(ParseError::Malformed(rest[covered..].trim().to_string()));
    }

    Ok(Request { command, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn must_parse(s: &str) -> Request {
        parse_request(s).unwrap_or_else(|e| panic!("should parse: {s}: {e}"))
    }

    // ---------- Numbers ----------

    #[test]
    fn number_suffixes_and_separators() {
        assert_eq!(parse_number("1.2m").unwrap().value, 1_200_000.0);
        assert_eq!(parse_number("250K").unwrap().value, 250_000.0);
        assert_eq!(parse_number("1_000_000").unwrap().value, 1_000_000.0);
        assert_eq!(parse_number("1,850,000").unwrap().value, 1_850_000.0);
        assert_eq!(parse_number(".5").unwrap().value, 0.5);
        let p = parse_number("20%").unwrap();
        assert!(p.percent);
        assert_eq!(p.value, 20.0);
        assert_eq!(parse_number("-2.5%").unwrap().value, -2.5);
    }

    #[test]
    fn junk_is_not_a_number() {
        assert!(parse_number("abc").is_none());
        assert!(parse_number("1.2.3").is_none());
        assert!(parse_number("12x").is_none());
        assert!(parse_number("").is_none());
    }

    // ---------- Commands ----------

    #[test]
    fn loan_with_mixed_arguments() {
        let r = must_parse("loan price=1.2m down=20% rate=3.5% term=25y");
        assert_eq!(r.command, Command::Loan);
        assert_eq!(r.args.money("price").unwrap(), Some(1_200_000.0));
        assert_eq!(r.args.amount("down").unwrap(), Some(Amount::PercentOf(20.0)));
        assert_eq!(r.args.rate("rate").unwrap(), Some(3.5));
        assert_eq!(r.args.years("term").unwrap(), Some(25));
    }

    #[test]
    fn command_aliases_and_case() {
        assert_eq!(must_parse("MORTGAGE price=1").command, Command::Loan);
        assert_eq!(must_parse("rent-vs-buy").command, Command::RentVsBuy);
        assert_eq!(must_parse("  help  ").command, Command::Help);
        assert_eq!(must_parse("docs nationality=India").command, Command::Checklist);
    }

    #[test]
    fn long_keys_fold_to_short_ones() {
        let r = must_parse("costs property_price=900000 down_payment=25% interest_rate=4");
        assert_eq!(r.args.money("price").unwrap(), Some(900_000.0));
        assert_eq!(r.args.rate("down").unwrap(), Some(25.0));
        assert_eq!(r.args.rate("rate").unwrap(), Some(4.0));
    }

    #[test]
    fn quoted_values_and_flags() {
        let r = must_parse(r#"community name="Dubai Marina" type=apartment size=1200"#);
        assert_eq!(r.args.text("community"), Some("Dubai Marina"));
        let r = must_parse("service type=villa size=4000 pool Gym");
        assert!(r.args.flag("pool") && r.args.flag("gym"));
        assert_eq!(r.args.flags().len(), 2);
    }

    #[test]
    fn checklist_keys_and_flags() {
        let r = must_parse("checklist buyer_type=self-employed residence_status=non-resident lender=ADCB Off-Plan");
        assert_eq!(r.args.text("buyer"), Some("self-employed"));
        assert_eq!(r.args.text("residence"), Some("non-resident"));
        assert_eq!(r.args.text("bank"), Some("ADCB"));
        assert!(r.args.flag("off-plan"));
    }

    #[test]
    fn amount_absolute_resolves_as_is() {
        assert_eq!(Amount::Absolute(150_000.0).resolve(1_000_000.0), 150_000.0);
        assert_eq!(Amount::PercentOf(15.0).resolve(1_000_000.0), 150_000.0);
    }

    // ---------- Negative cases ----------

    #[test]
    fn empty_and_unknown_commands_fail() {
        assert_eq!(parse_request("   "), Err(ParseError::Empty));
        assert!(matches!(parse_request("buy house"), Err(ParseError::UnknownCommand(_))));
    }

    #[test]
    fn bad_values_are_reported_lazily() {
        let r = must_parse("loan price=lots term=twenty");
        assert!(matches!(r.args.money("price"), Err(ParseError::BadValue { .. })));
        assert!(r.args.years("term").is_err());
        // a percent is not a price
        assert!(must_parse("loan price=20%").args.money("price").is_err());
    }

    #[test]
    fn malformed_tokens_fail() {
        assert!(matches!(parse_request("loan =5"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse_request(r#"loan "free text""#), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn only_rejects_unread_arguments() {
        let r = must_parse("loan price=1m colour=blue");
        assert_eq!(
            r.args.only(&["price"], &[]),
            Err(ParseError::UnknownArgument("colour".to_string()))
        );
        let r = must_parse("loan price=1m yearly");
        assert!(r.args.only(&["price"], &[]).is_err());
        assert!(r.args.only(&["price"], &["yearly"]).is_ok());
    }

    #[test]
    fn json_flag_is_accepted_everywhere() {
        let r = must_parse("costs price=1m --JSON");
        assert!(r.wants_json());
        assert!(r.args.only(&["price"], &[]).is_ok());
        assert!(!must_parse("costs price=1m").wants_json());
    }
}
