//! Method name normalization.
//!
//! Free-text method mentions are folded to a canonical key so that
//! "Monte-Carlo Simulation" and "monte carlo  simulation" land on the same
//! method. The rewrite is idempotent: normalizing a canonical key returns it
//! unchanged.

use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Spelling Table
// ============================================================================

/// British → American spellings, applied as literal substring substitutions in
/// this order. Longer variants sharing a prefix must come before the shorter
/// one or be harmless after it ("optimised" is already "optimized" once
/// "optimise" has been rewritten).
pub const SPELLING_MAP: &[(&str, &str)] = &[
    ("optimisation", "optimization"),
    ("optimise", "optimize"),
    ("optimised", "optimized"),
    ("optimising", "optimizing"),
    ("behaviour", "behavior"),
    ("modelling", "modeling"),
    ("colour", "color"),
    ("centre", "center"),
    ("analyse", "analyze"),
    ("parameterise", "parameterize"),
];

/// Base normalization: lowercase, fold `-`/`_` to spaces, apply the spelling
/// table and collapse whitespace.
pub fn normalize_method_name(raw: &str) -> String {
    let mut text = raw.to_lowercase().trim().replace(['-', '_'], " ");

    for (uk, us) in SPELLING_MAP {
        if text.contains(uk) {
            text = text.replace(uk, us);
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Normalizer with variant aliases
// ============================================================================

/// Normalizer carrying the optional alias table built from the variant overlay.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: HashMap<String, String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `canonical -> [variants]` mapping. Both sides are
    /// base-normalized. A variant listed under several canonicals goes to the
    /// first canonical in key order. Aliases pointing at another alias key are
    /// dropped so that every rewrite is a single step.
    pub fn with_variants(variants: &BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases: HashMap<String, String> = HashMap::new();
        for (canonical, list) in variants {
            let canonical = normalize_method_name(canonical);
            if canonical.is_empty() {
                continue;
            }
            for variant in list {
                let variant = normalize_method_name(variant);
                if variant.is_empty() || variant == canonical {
                    continue;
                }
                match aliases.get(&variant) {
                    Some(existing) if *existing != canonical => {
                        tracing::warn!(variant = %variant, kept = %existing, ignored = %canonical, "method variant listed twice");
                    }
                    Some(_) => {}
                    None => {
                        aliases.insert(variant, canonical.clone());
                    }
                }
            }
        }

        let chained: Vec<String> = aliases
            .iter()
            .filter(|(_, target)| aliases.contains_key(*target))
            .map(|(k, _)| k.clone())
            .collect();
        for key in chained {
            tracing::warn!(variant = %key, "dropping chained method variant alias");
            aliases.remove(&key);
        }

        Self { aliases }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Canonical key for a raw mention string.
    pub fn normalize(&self, raw: &str) -> String {
        let base = normalize_method_name(raw);
        match self.aliases.get(&base) {
            Some(canonical) => canonical.clone(),
            None => base,
        }
    }

    /// Normalize an optional mention. Missing stays missing, and a mention
    /// that normalizes to nothing is reported as missing too.
    pub fn normalize_mention(&self, raw: Option<&str>) -> Option<String> {
        let normalized = self.normalize(raw?);
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_punctuation_and_whitespace() {
        assert_eq!(
            normalize_method_name("  Monte-Carlo__Simulation  "),
            "monte carlo simulation"
        );
        assert_eq!(normalize_method_name("Load\tFlow   Analysis"), "load flow analysis");
    }

    #[test]
    fn test_spelling_variants_unified() {
        assert_eq!(
            normalize_method_name("Particle Swarm Optimisation"),
            "particle swarm optimization"
        );
        assert_eq!(normalize_method_name("Optimised dispatch"), "optimized dispatch");
        assert_eq!(normalize_method_name("Agent behaviour modelling"), "agent behavior modeling");
        assert_eq!(normalize_method_name("Analyse"), "analyze");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Particle Swarm Optimisation",
            "  Monte-Carlo__Simulation ",
            "Centre-of-Mass  analyse",
            "",
            "   ",
            "MILP",
            "Über-Modelling",
        ];
        for input in inputs {
            let once = normalize_method_name(input);
            assert_eq!(normalize_method_name(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_missing_propagates() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_mention(None), None);
        assert_eq!(n.normalize_mention(Some("   ")), None);
        assert_eq!(n.normalize_mention(Some(" - _ ")), None);
        assert_eq!(n.normalize_mention(Some("LSTM")), Some("lstm".to_string()));
    }

    #[test]
    fn test_variant_aliases() {
        let mut variants = BTreeMap::new();
        variants.insert(
            "Monte Carlo Simulation".to_string(),
            vec!["MCS".to_string(), "monte-carlo".to_string()],
        );
        let n = Normalizer::with_variants(&variants);

        assert_eq!(n.normalize("MCS"), "monte carlo simulation");
        assert_eq!(n.normalize("Monte-Carlo"), "monte carlo simulation");
        assert_eq!(n.normalize("monte carlo simulation"), "monte carlo simulation");
        assert_eq!(n.alias_count(), 2);
    }

    #[test]
    fn test_chained_aliases_are_dropped() {
        let mut variants = BTreeMap::new();
        variants.insert("b".to_string(), vec!["a".to_string()]);
        variants.insert("c".to_string(), vec!["b".to_string()]);
        let n = Normalizer::with_variants(&variants);

        // "a" -> "b" would need a second hop, so it is dropped.
        assert_eq!(n.normalize("a"), "a");
        assert_eq!(n.normalize("b"), "c");
        for raw in ["a", "b", "c"] {
            let once = n.normalize(raw);
            assert_eq!(n.normalize(&once), once);
        }
    }

    #[test]
    fn test_shared_variant_goes_to_first_canonical() {
        let mut variants = BTreeMap::new();
        variants.insert("Random Forest".to_string(), vec!["RF".to_string()]);
        variants.insert("Radio Frequency".to_string(), vec!["rf".to_string()]);
        variants.insert("radio-frequency".to_string(), vec!["RF".to_string()]);

        for _ in 0..20 {
            let n = Normalizer::with_variants(&variants);
            assert_eq!(n.normalize("RF"), "radio frequency");
            assert_eq!(n.alias_count(), 1);
        }
    }
}
