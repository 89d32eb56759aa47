//! Pluralization oracle and case helpers.
//!
//! The resolver only depends on the [`Inflector`] trait. [`Inflections`] is the
//! stock English implementation: ordered regex rules where the most recently
//! added rule wins, plus irregular and uncountable words. Words no rule
//! matches come back unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{HamletError, Result};

/// Turns words into their plural and singular forms
pub trait Inflector {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Rule-based English inflections
#[derive(Debug, Clone)]
pub struct Inflections {
    plurals: Vec<Rule>,
    singulars: Vec<Rule>,
    uncountables: Vec<String>,
    uncountable_pattern: Option<Regex>,
}

impl Inflections {
    /// An inflector without any rules; every word is returned as-is.
    pub fn empty() -> Self {
        Self {
            plurals: Vec::new(),
            singulars: Vec::new(),
            uncountables: Vec::new(),
            uncountable_pattern: None,
        }
    }

    /// The default English rule set.
    pub fn english() -> Self {
        let mut inflections = Self::empty();

        for (pattern, replacement) in [
            (r"$", "s"),
            (r"(?i)s$", "s"),
            (r"(?i)(ax|test)is$", "${1}es"),
            (r"(?i)(octop|vir)(?:us|i)$", "${1}i"),
            (r"(?i)(alias|status)$", "${1}es"),
            (r"(?i)(bu)s$", "${1}ses"),
            (r"(?i)(buffal|tomat)o$", "${1}oes"),
            (r"(?i)([ti])um$", "${1}a"),
            (r"(?i)([ti])a$", "${1}a"),
            (r"(?i)sis$", "ses"),
            (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
            (r"(?i)(hive)$", "${1}s"),
            (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
            (r"(?i)(x|ch|ss|sh)$", "${1}es"),
            (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
            (r"(?i)([ml])ouse$", "${1}ice"),
            (r"(?i)([ml])ice$", "${1}ice"),
            (r"(?i)^(ox)$", "${1}en"),
            (r"(?i)^(oxen)$", "${1}"),
            (r"(?i)(quiz)$", "${1}zes"),
        ] {
            inflections.push_plural(pattern, replacement);
        }

        for (pattern, replacement) in [
            (r"(?i)s$", ""),
            (r"(?i)(ss)$", "${1}"),
            (r"(?i)(n)ews$", "${1}ews"),
            (r"(?i)([ti])a$", "${1}um"),
            (
                r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(?:sis|ses)$",
                "${1}sis",
            ),
            (r"(?i)(^analy)(?:sis|ses)$", "${1}sis"),
            (r"(?i)([^f])ves$", "${1}fe"),
            (r"(?i)(hive)s$", "${1}"),
            (r"(?i)(tive)s$", "${1}"),
            (r"(?i)([lr])ves$", "${1}f"),
            (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
            (r"(?i)(s)eries$", "${1}eries"),
            (r"(?i)(m)ovies$", "${1}ovie"),
            (r"(?i)(x|ch|ss|sh)es$", "${1}"),
            (r"(?i)([ml])ice$", "${1}ouse"),
            (r"(?i)(bus)(?:es)?$", "${1}"),
            (r"(?i)(o)es$", "${1}"),
            (r"(?i)(shoe)s$", "${1}"),
            (r"(?i)(cris|test)(?:is|es)$", "${1}is"),
            (r"(?i)^(a)x[ie]s$", "${1}xis"),
            (r"(?i)(octop|vir)(?:us|i)$", "${1}us"),
            (r"(?i)(alias|status)(?:es)?$", "${1}"),
            (r"(?i)^(ox)en", "${1}"),
            (r"(?i)(vert|ind)ices$", "${1}ex"),
            (r"(?i)(matr)ices$", "${1}ix"),
            (r"(?i)(quiz)zes$", "${1}"),
            (r"(?i)(database)s$", "${1}"),
        ] {
            inflections.push_singular(pattern, replacement);
        }

        for (singular, plural) in [
            ("person", "people"),
            ("man", "men"),
            ("child", "children"),
            ("sex", "sexes"),
            ("move", "moves"),
            ("cow", "kine"),
        ] {
            inflections.push_irregular(singular, plural);
        }

        for word in [
            "equipment",
            "information",
            "rice",
            "money",
            "species",
            "series",
            "fish",
            "sheep",
            "jeans",
        ] {
            inflections.push_uncountable(word);
        }

        inflections
    }

    /// Adds a plural rule; it takes precedence over every earlier rule.
    pub fn plural(&mut self, pattern: &str, replacement: &str) -> Result<&mut Self> {
        let rule = compile_rule(pattern, replacement)?;
        self.plurals.push(rule);
        Ok(self)
    }

    /// Adds a singular rule; it takes precedence over every earlier rule.
    pub fn singular(&mut self, pattern: &str, replacement: &str) -> Result<&mut Self> {
        let rule = compile_rule(pattern, replacement)?;
        self.singulars.push(rule);
        Ok(self)
    }

    /// Registers a word pair that the regular rules get wrong.
    pub fn irregular(&mut self, singular: &str, plural: &str) -> Result<&mut Self> {
        if !is_plain_word(singular) || !is_plain_word(plural) {
            return Err(HamletError::configuration(format!(
                "irregular inflection '{}' / '{}' must be plain words",
                singular, plural
            )));
        }
        self.push_irregular(singular, plural);
        Ok(self)
    }

    /// Registers a word that has no distinct plural.
    pub fn uncountable(&mut self, word: &str) -> &mut Self {
        self.push_uncountable(word);
        self
    }

    fn push_plural(&mut self, pattern: &str, replacement: &str) {
        self.plurals.push(static_rule(pattern, replacement));
    }

    fn push_singular(&mut self, pattern: &str, replacement: &str) {
        self.singulars.push(static_rule(pattern, replacement));
    }

    fn push_irregular(&mut self, singular: &str, plural: &str) {
        let singular = singular.to_lowercase();
        let plural = plural.to_lowercase();
        self.uncountables
            .retain(|word| *word != singular && *word != plural);
        self.rebuild_uncountable_pattern();

        let (s_head, s_tail) = split_first(&singular);
        let (p_head, p_tail) = split_first(&plural);

        // Irregulars apply to a whole trailing word or a camel-case hump:
        // "human" is not "hu" + "man", "SalesMan" is "Sales" + "Man".
        let starts = [
            (WORD_START, s_head.to_uppercase(), p_head.to_uppercase()),
            (WORD_START, s_head.to_lowercase(), p_head.to_lowercase()),
            (HUMP_START, s_head.to_uppercase(), p_head.to_uppercase()),
        ];
        for (start, s_first, p_first) in starts {
            let singular_word = format!(
                "{}{}{}$",
                start,
                regex::escape(&s_first),
                tail_pattern(s_tail)
            );
            let plural_word = format!(
                "{}{}{}$",
                start,
                regex::escape(&p_first),
                tail_pattern(p_tail)
            );
            let singular_form = format!("${{1}}{}{}", s_first, s_tail);
            let plural_form = format!("${{1}}{}{}", p_first, p_tail);

            self.push_plural(&singular_word, &plural_form);
            self.push_plural(&plural_word, &plural_form);
            self.push_singular(&plural_word, &singular_form);
            self.push_singular(&singular_word, &singular_form);
        }
    }

    fn push_uncountable(&mut self, word: &str) {
        let word = word.to_lowercase();
        if !self.uncountables.contains(&word) {
            self.uncountables.push(word);
        }
        self.rebuild_uncountable_pattern();
    }

    fn rebuild_uncountable_pattern(&mut self) {
        if self.uncountables.is_empty() {
            self.uncountable_pattern = None;
            return;
        }
        let alternatives = self
            .uncountables
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        self.uncountable_pattern = Regex::new(&format!(r"(?i)\b(?:{})$", alternatives)).ok();
    }

    fn is_uncountable(&self, word: &str) -> bool {
        self.uncountable_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(word))
    }

    fn apply(&self, word: &str, rules: &[Rule]) -> String {
        if word.is_empty() || self.is_uncountable(word) {
            return word.to_string();
        }

        rules
            .iter()
            .rev()
            .find(|rule| rule.pattern.is_match(word))
            .map(|rule| {
                rule.pattern
                    .replace(word, rule.replacement.as_str())
                    .into_owned()
            })
            .unwrap_or_else(|| word.to_string())
    }
}

impl Default for Inflections {
    fn default() -> Self {
        Self::english()
    }
}

impl Inflector for Inflections {
    fn pluralize(&self, word: &str) -> String {
        self.apply(word, &self.plurals)
    }

    fn singularize(&self, word: &str) -> String {
        self.apply(word, &self.singulars)
    }
}

fn compile_rule(pattern: &str, replacement: &str) -> Result<Rule> {
    let pattern = Regex::new(pattern).map_err(|e| {
        HamletError::configuration(format!("invalid inflection rule '{}': {}", pattern, e))
    })?;
    Ok(Rule {
        pattern,
        replacement: replacement.to_string(),
    })
}

// Built-in patterns are literals in this file.
fn static_rule(pattern: &str, replacement: &str) -> Rule {
    compile_rule(pattern, replacement).expect("built-in inflection rule compiles")
}

const WORD_START: &str = r"(^|[^A-Za-z])";
const HUMP_START: &str = r"([a-z])";

fn split_first(word: &str) -> (&str, &str) {
    match word.char_indices().nth(1) {
        Some((idx, _)) => word.split_at(idx),
        None => (word, ""),
    }
}

fn tail_pattern(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!("(?i:{})", regex::escape(tail))
    }
}

fn is_plain_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// `Admin::UserProfile` -> `admin/user_profile`
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// `admin/user_profile` -> `Admin::UserProfile`
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .map(capitalize_first)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// `author_id` -> `Author`, `created_at` -> `Created at`
pub fn humanize(word: &str) -> String {
    let word = word.strip_suffix("_id").unwrap_or(word);
    let spaced = word.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// `Admin::Widget` -> `Widget`
pub fn demodulize(class_name: &str) -> String {
    class_name
        .rsplit("::")
        .next()
        .unwrap_or(class_name)
        .to_string()
}

/// `Admin::Widget` -> `admin/widgets`
pub fn tableize(inflector: &dyn Inflector, class_name: &str) -> String {
    inflector.pluralize(&underscore(class_name))
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let inflector = Inflections::english();
        assert_eq!(inflector.pluralize("widget"), "widgets");
        assert_eq!(inflector.pluralize("category"), "categories");
        assert_eq!(inflector.pluralize("box"), "boxes");
        assert_eq!(inflector.pluralize("class"), "classes");
        assert_eq!(inflector.pluralize("status"), "statuses");
        assert_eq!(inflector.pluralize("wife"), "wives");
        assert_eq!(inflector.pluralize("half"), "halves");
        assert_eq!(inflector.pluralize("matrix"), "matrices");
        assert_eq!(inflector.pluralize("mouse"), "mice");
        assert_eq!(inflector.pluralize("quiz"), "quizzes");
        assert_eq!(inflector.pluralize("ox"), "oxen");
        assert_eq!(inflector.pluralize("medium"), "media");
    }

    #[test]
    fn test_regular_singulars() {
        let inflector = Inflections::english();
        assert_eq!(inflector.singularize("widgets"), "widget");
        assert_eq!(inflector.singularize("categories"), "category");
        assert_eq!(inflector.singularize("boxes"), "box");
        assert_eq!(inflector.singularize("statuses"), "status");
        assert_eq!(inflector.singularize("status"), "status");
        assert_eq!(inflector.singularize("wives"), "wife");
        assert_eq!(inflector.singularize("analyses"), "analysis");
        assert_eq!(inflector.singularize("movies"), "movie");
        assert_eq!(inflector.singularize("news"), "news");
        assert_eq!(inflector.singularize("databases"), "database");
        assert_eq!(inflector.singularize("class"), "class");
    }

    #[test]
    fn test_plurals_are_stable() {
        let inflector = Inflections::english();
        for plural in ["widgets", "categories", "boxes", "people", "children", "mice"] {
            assert_eq!(inflector.pluralize(plural), plural);
        }
    }

    #[test]
    fn test_irregulars_preserve_case() {
        let inflector = Inflections::english();
        assert_eq!(inflector.pluralize("person"), "people");
        assert_eq!(inflector.pluralize("Person"), "People");
        assert_eq!(inflector.singularize("People"), "Person");
        assert_eq!(inflector.pluralize("Admin::Child"), "Admin::Children");
        assert_eq!(inflector.pluralize("cow"), "kine");
        assert_eq!(inflector.pluralize("Cow"), "Kine");
        assert_eq!(inflector.singularize("kine"), "cow");
        assert_eq!(inflector.pluralize("human"), "humans");
    }

    #[test]
    fn test_irregulars_at_camel_case_humps() {
        let inflector = Inflections::english();
        assert_eq!(inflector.pluralize("SalesMan"), "SalesMen");
        assert_eq!(inflector.singularize("SalesMen"), "SalesMan");
        assert_eq!(inflector.pluralize("SalesPerson"), "SalesPeople");
        assert_eq!(inflector.pluralize("GrandChild"), "GrandChildren");
        assert_eq!(inflector.pluralize("Admin::SalesMan"), "Admin::SalesMen");
        assert_eq!(inflector.pluralize("salesman"), "salesmans");
    }

    #[test]
    fn test_uncountables() {
        let inflector = Inflections::english();
        assert_eq!(inflector.pluralize("sheep"), "sheep");
        assert_eq!(inflector.singularize("Sheep"), "Sheep");
        assert_eq!(inflector.pluralize("Admin::Equipment"), "Admin::Equipment");
    }

    #[test]
    fn test_namespaced_words_inflect_last_segment() {
        let inflector = Inflections::english();
        assert_eq!(inflector.pluralize("Admin::Widget"), "Admin::Widgets");
        assert_eq!(inflector.singularize("admin/widgets"), "admin/widget");
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let mut inflector = Inflections::english();
        inflector.irregular("octopus", "octopodes").unwrap();
        inflector.uncountable("staff");
        assert_eq!(inflector.pluralize("octopus"), "octopodes");
        assert_eq!(inflector.singularize("octopodes"), "octopus");
        assert_eq!(inflector.pluralize("staff"), "staff");

        assert!(inflector.irregular("two words", "x").is_err());
        assert!(inflector.plural("(unclosed", "x").is_err());
    }

    #[test]
    fn test_empty_inflector_returns_input() {
        let inflector = Inflections::empty();
        assert_eq!(inflector.pluralize("widget"), "widget");
        assert_eq!(inflector.singularize("widgets"), "widgets");
        assert_eq!(inflector.pluralize(""), "");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("UserProfile"), "user_profile");
        assert_eq!(underscore("Admin::UserProfile"), "admin/user_profile");
        assert_eq!(underscore("APIKey"), "api_key");
        assert_eq!(underscore("widget"), "widget");
        assert_eq!(underscore("line-item"), "line_item");
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("user_profile"), "UserProfile");
        assert_eq!(camelize("admin/user_profile"), "Admin::UserProfile");
        assert_eq!(camelize("Widget"), "Widget");
    }

    #[test]
    fn test_humanize_and_demodulize() {
        assert_eq!(humanize("author_id"), "Author");
        assert_eq!(humanize("created_at"), "Created at");
        assert_eq!(humanize("my_app"), "My app");
        assert_eq!(demodulize("Admin::Widget"), "Widget");
        assert_eq!(demodulize("Widget"), "Widget");
        assert_eq!(tableize(&Inflections::english(), "Admin::LineItem"), "admin/line_items");
    }
}
