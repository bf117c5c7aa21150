//! Country Code Lookup
//! Best-effort resolution of reported country names to ISO-3166 alpha-3
//! codes over the fixed `rust_iso3166` table. A failed lookup is not an
//! error: the caller gets `None` and the row is skipped downstream.

/// Names the WHO feed spells differently from the ISO registry.
const ALIASES: [(&str, &str); 22] = [
    ("united states", "USA"),
    ("us", "USA"),
    ("russia", "RUS"),
    ("bolivia", "BOL"),
    ("iran", "IRN"),
    ("iran (islamic republic of)", "IRN"),
    ("south korea", "KOR"),
    ("republic of korea", "KOR"),
    ("north korea", "PRK"),
    ("venezuela", "VEN"),
    ("vietnam", "VNM"),
    ("syria", "SYR"),
    ("tanzania", "TZA"),
    ("moldova", "MDA"),
    ("democratic republic of the congo", "COD"),
    ("laos", "LAO"),
    ("brunei", "BRN"),
    ("czech republic", "CZE"),
    ("turkey", "TUR"),
    ("taiwan", "TWN"),
    ("cote d'ivoire", "CIV"),
    ("curacao", "CUW"),
];

/// Resolve a country name to its ISO-3166 alpha-3 code.
pub fn country_code(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for (alias, alpha3) in ALIASES {
        if needle == alias {
            return Some(alpha3);
        }
    }

    // Exact match on the registry name, then a prefix match to cover the
    // parenthesized official forms ("Bolivia (Plurinational State of)").
    for entry in rust_iso3166::ALL.iter() {
        if entry.name.to_lowercase() == needle {
            return Some(entry.alpha3);
        }
    }
    for entry in rust_iso3166::ALL.iter() {
        let registry = entry.name.to_lowercase();
        if registry.starts_with(&needle)
            && registry[needle.len()..].starts_with(" (")
        {
            return Some(entry.alpha3);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_united_states_to_valid_alpha3() {
        let code = country_code("United States").expect("US should resolve");
        assert_eq!(code, "USA");
        assert!(rust_iso3166::from_alpha3(code).is_some());
    }

    #[test]
    fn resolves_registry_names_case_insensitively() {
        assert_eq!(country_code("france"), Some("FRA"));
        assert_eq!(country_code("GERMANY"), Some("DEU"));
        assert_eq!(country_code("  Japan "), Some("JPN"));
    }

    #[test]
    fn resolves_who_spellings_via_aliases() {
        assert_eq!(country_code("Russia"), Some("RUS"));
        assert_eq!(country_code("Iran (Islamic Republic of)"), Some("IRN"));
        assert_eq!(country_code("Czech Republic"), Some("CZE"));
    }

    #[test]
    fn unknown_names_yield_none() {
        assert_eq!(country_code("Atlantis"), None);
        assert_eq!(country_code("Kosovo[1]"), None);
        assert_eq!(country_code(""), None);
    }
}
