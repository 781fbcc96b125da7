//! Location resolver: runs the rule chain over a location string.
//!
//! Chain:  empty → "remote" → "multiple" → ", XX" region code → country alias → city → default
//!
//! First match wins. The "remote" check runs before any geographic rule so
//! that "Remote - London" is never counted as a UK posting.

use super::rules::LocationRuleTable;
use super::types::{CountryResult, MatchMode, MatchedRule, Resolution};
use crate::jobs::JobPosting;
use std::sync::Arc;

/// Resolves free-form job locations to canonical country names.
///
/// Holds no mutable state; clones share the same rule table.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    rules: Arc<LocationRuleTable>,
    mode: MatchMode,
}

impl LocationResolver {
    /// Resolver over the built-in table in substring mode.
    pub fn new() -> Self {
        Self::with_rules(LocationRuleTable::builtin())
    }

    pub fn with_rules(rules: LocationRuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
            mode: MatchMode::Substring,
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn rules(&self) -> &LocationRuleTable {
        &self.rules
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Resolve a location string. Total: never fails.
    pub fn resolve(&self, location: Option<&str>) -> CountryResult {
        self.resolve_detailed(location).result
    }

    /// Resolve a posting's location.
    pub fn resolve_job(&self, job: &JobPosting) -> CountryResult {
        self.resolve(job.location.as_deref())
    }

    /// Resolve and report which rule fired.
    pub fn resolve_detailed(&self, location: Option<&str>) -> Resolution {
        let (result, rule) = self.run_chain(location);
        Resolution {
            input: location.map(str::to_string),
            result,
            rule,
        }
    }

    fn run_chain(&self, location: Option<&str>) -> (CountryResult, MatchedRule) {
        let loc = match location {
            Some(l) if !l.trim().is_empty() => l,
            _ => return (self.default_result(), MatchedRule::Empty),
        };

        let lower = loc.to_lowercase();
        if lower.contains("remote") {
            return (CountryResult::Remote, MatchedRule::RemoteKeyword);
        }
        if lower.contains("multiple") {
            return (self.default_result(), MatchedRule::MultipleKeyword);
        }

        for list in self.rules.subdivisions() {
            for code in &list.codes {
                let needle = format!(", {}", code);
                if contains_token(loc, &needle, self.mode) {
                    return (
                        CountryResult::Country(list.country.clone()),
                        MatchedRule::RegionCode(code.clone()),
                    );
                }
            }
        }

        for entry in self.rules.country_aliases() {
            if contains_token(loc, &entry.alias, self.mode) {
                return (
                    CountryResult::Country(entry.country.clone()),
                    MatchedRule::CountryAlias(entry.alias.clone()),
                );
            }
        }

        for entry in self.rules.cities() {
            if contains_token(loc, &entry.city, self.mode) {
                return (
                    CountryResult::Country(entry.country.clone()),
                    MatchedRule::City(entry.city.clone()),
                );
            }
        }

        (self.default_result(), MatchedRule::Fallback)
    }

    fn default_result(&self) -> CountryResult {
        CountryResult::Default(self.rules.default_country().to_string())
    }
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-sensitive search for `needle` in `haystack` under the given mode.
fn contains_token(haystack: &str, needle: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => haystack.contains(needle),
        MatchMode::WordBoundary => haystack.match_indices(needle).any(|(start, matched)| {
            let end = start + matched.len();
            let boundary_before = needle.starts_with(|c: char| !c.is_alphanumeric())
                || !haystack[..start].ends_with(|c: char| c.is_alphanumeric());
            let boundary_after = !haystack[end..].starts_with(|c: char| c.is_alphanumeric());
            boundary_before && boundary_after
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USA: &str = "United States of America";
    const UK: &str = "United Kingdom";

    fn country(name: &str) -> CountryResult {
        CountryResult::Country(name.to_string())
    }

    fn default_usa() -> CountryResult {
        CountryResult::Default(USA.to_string())
    }

    #[test]
    fn test_empty_and_missing_resolve_to_default() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(None), default_usa());
        assert_eq!(resolver.resolve(Some("")), default_usa());
        assert_eq!(resolver.resolve(Some("   ")), default_usa());
        assert_eq!(resolver.resolve_detailed(None).rule, MatchedRule::Empty);
    }

    #[test]
    fn test_remote_wins_over_everything() {
        let resolver = LocationResolver::new();
        for loc in ["Remote", "remote", "REMOTE - US", "Remote - London, UK", "Austin, TX (Remote)"] {
            assert_eq!(resolver.resolve(Some(loc)), CountryResult::Remote, "{}", loc);
        }
    }

    #[test]
    fn test_multiple_locations_default() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("Multiple Locations"));
        assert_eq!(res.result, default_usa());
        assert_eq!(res.rule, MatchedRule::MultipleKeyword);
        // "multiple" outranks a city in the same string
        assert_eq!(resolver.resolve(Some("London and multiple others")), default_usa());
    }

    #[test]
    fn test_us_state_code() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("Austin, TX"));
        assert_eq!(res.result, country(USA));
        assert_eq!(res.rule, MatchedRule::RegionCode("TX".into()));
        // unknown city, known state
        assert_eq!(resolver.resolve(Some("Springfield, TX")), country(USA));
        assert_eq!(resolver.resolve(Some("Washington, DC")), country(USA));
    }

    #[test]
    fn test_canadian_province_code() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("Kitchener, ON")), country("Canada"));
        assert_eq!(resolver.resolve(Some("Vancouver, BC")), country("Canada"));
    }

    #[test]
    fn test_region_code_beats_city_table() {
        let resolver = LocationResolver::new();
        // Vancouver is a Canadian city in the table, but ", WA" fires first
        assert_eq!(resolver.resolve(Some("Vancouver, WA")), country(USA));
    }

    #[test]
    fn test_region_code_requires_comma_space() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("Austin TX"));
        assert_eq!(res.rule, MatchedRule::City("Austin".into()));
    }

    #[test]
    fn test_country_alias() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("U.K. Office")), country(UK));
        assert_eq!(resolver.resolve(Some("Great Britain")), country(UK));
        assert_eq!(resolver.resolve(Some("Berlin, Germany")), country("Germany"));
        assert_eq!(resolver.resolve(Some("Anywhere in the USA")), country(USA));
        assert_eq!(resolver.resolve(Some("Belfast, Northern Ireland")), country(UK));
        assert_eq!(resolver.resolve(Some("Dublin, Ireland")), country("Ireland"));
    }

    #[test]
    fn test_alias_is_case_sensitive() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("somewhere in germany"));
        assert_eq!(res.rule, MatchedRule::Fallback);
    }

    #[test]
    fn test_city_table() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("London")), country(UK));
        assert_eq!(resolver.resolve(Some("Toronto")), country("Canada"));
        assert_eq!(resolver.resolve(Some("Bangalore")), country("India"));
        assert_eq!(
            resolver.resolve_detailed(Some("Greater Munich Area")).rule,
            MatchedRule::City("Munich".into())
        );
    }

    #[test]
    fn test_ambiguous_city_first_entry_wins() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("Cambridge")), country(USA));
        assert_eq!(resolver.resolve(Some("Birmingham")), country(UK));
    }

    #[test]
    fn test_unknown_location_falls_back() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("Gotham"));
        assert_eq!(res.result, default_usa());
        assert_eq!(res.rule, MatchedRule::Fallback);
    }

    #[test]
    fn test_substring_false_positive_preserved() {
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("Indiana")), country("India"));
        assert_eq!(resolver.resolve(Some("Toronto, CANADA")), country(USA));
    }

    #[test]
    fn test_region_names_containing_uk_aliases() {
        let resolver = LocationResolver::new();
        let res = resolver.resolve_detailed(Some("Sydney, New South Wales"));
        assert_eq!(res.result, country("Australia"));
        assert_eq!(res.rule, MatchedRule::CountryAlias("New South Wales".into()));
        assert_eq!(resolver.resolve(Some("Boston, New England")), country(USA));
        assert_eq!(resolver.resolve(Some("Cardiff, Wales")), country(UK));

        let strict = LocationResolver::new().with_mode(MatchMode::WordBoundary);
        assert_eq!(strict.resolve(Some("Sydney, New South Wales")), country("Australia"));
        assert_eq!(strict.resolve(Some("Boston, New England")), country(USA));
    }

    #[test]
    fn test_indianapolis_needs_word_boundary() {
        // Substring mode hits the "India" alias before the city table.
        let resolver = LocationResolver::new();
        assert_eq!(resolver.resolve(Some("Indianapolis")), country("India"));

        let strict = LocationResolver::new().with_mode(MatchMode::WordBoundary);
        let res = strict.resolve_detailed(Some("Indianapolis"));
        assert_eq!(res.result, country(USA));
        assert_eq!(res.rule, MatchedRule::City("Indianapolis".into()));
    }

    #[test]
    fn test_word_boundary_mode() {
        let resolver = LocationResolver::new().with_mode(MatchMode::WordBoundary);
        assert_eq!(resolver.resolve(Some("Indiana")), default_usa());
        assert_eq!(resolver.resolve(Some("Toronto, CANADA")), country("Canada"));
        assert_eq!(resolver.resolve(Some("Austin, TX")), country(USA));
        assert_eq!(resolver.resolve(Some("New Delhi, India")), country("India"));
        assert_eq!(resolver.resolve(Some("U.K. Office")), country(UK));
        assert_eq!(resolver.resolve(Some("Boston")), country(USA));
    }

    #[test]
    fn test_custom_rules() {
        let rules = LocationRuleTable::from_json(
            r#"{
                "default_country": "Sweden",
                "subdivisions": [{ "country": "Norway", "codes": ["OS"] }],
                "country_aliases": [{ "alias": "Danmark", "country": "Denmark" }],
                "cities": [{ "city": "Malmö", "country": "Sweden" }]
            }"#,
        )
        .unwrap();
        let resolver = LocationResolver::with_rules(rules);
        assert_eq!(resolver.resolve(None), CountryResult::Default("Sweden".into()));
        assert_eq!(resolver.resolve(Some("Sentrum, OS")), country("Norway"));
        assert_eq!(resolver.resolve(Some("Aarhus, Danmark")), country("Denmark"));
        assert_eq!(resolver.resolve(Some("Malmö")), country("Sweden"));
        assert_eq!(resolver.resolve(Some("London")), CountryResult::Default("Sweden".into()));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = LocationResolver::new();
        for loc in ["Austin, TX", "London", "Remote", "Gotham", ""] {
            assert_eq!(
                resolver.resolve_detailed(Some(loc)),
                resolver.resolve_detailed(Some(loc))
            );
        }
    }

    #[test]
    fn test_contains_token_boundaries() {
        assert!(contains_token("Indiana", "India", MatchMode::Substring));
        assert!(!contains_token("Indiana", "India", MatchMode::WordBoundary));
        assert!(contains_token("Pune, India", "India", MatchMode::WordBoundary));
        assert!(contains_token("Austin, TX", ", TX", MatchMode::WordBoundary));
        assert!(!contains_token("Austin, TXN", ", TX", MatchMode::WordBoundary));
        assert!(!contains_token("U.S.A.", "U.S.", MatchMode::WordBoundary));
        assert!(contains_token("U.S. only", "U.S.", MatchMode::WordBoundary));
    }
}
