use crate::error::{RelevanceError, Result};
use crate::matchers::MatcherKind;

/// Matchers applied on every fuzzy search.
pub const STANDARD_WEIGHTS: [(MatcherKind, u32); 6] = [
    (MatcherKind::Exact, 100),
    (MatcherKind::StartOfString, 50),
    (MatcherKind::SpacelessLength, 45),
    (MatcherKind::Acronym, 42),
    (MatcherKind::ConsecutiveCharacters, 40),
    (MatcherKind::Spaceless, 35),
];

/// Costlier matchers added on top of the standard ones by extended searches.
pub const EXTENDED_WEIGHTS: [(MatcherKind, u32); 4] = [
    (MatcherKind::StartOfWords, 35),
    (MatcherKind::StudlyCase, 32),
    (MatcherKind::InString, 30),
    (MatcherKind::TimesInString, 8),
];

/// Ordered mapping from matcher kind to weight.
///
/// Each kind appears at most once; inserting a kind that is already present
/// replaces its weight and keeps its position. Order only affects how the
/// summed expression reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatcherSet {
    entries: Vec<(MatcherKind, u32)>,
}

impl MatcherSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_WEIGHTS.to_vec(),
        }
    }

    /// Extended matchers only, without the standard ones.
    #[must_use]
    pub fn extended_only() -> Self {
        Self {
            entries: EXTENDED_WEIGHTS.to_vec(),
        }
    }

    /// Standard matchers followed by the extended ones.
    #[must_use]
    pub fn extended() -> Self {
        Self::standard().merge(&Self::extended_only())
    }

    /// A caller-supplied set. An empty set is allowed and scores every row 0.
    pub fn custom<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (MatcherKind, u32)>,
    {
        let mut set = Self::new();
        for (kind, weight) in entries {
            set.insert(kind, weight)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, kind: MatcherKind, weight: u32) -> Result<()> {
        if weight == 0 {
            return Err(RelevanceError::InvalidWeight { kind });
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == kind) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((kind, weight)),
        }
        Ok(())
    }

    /// Appends `other` after `self`; weights from `other` win on collision.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for &(kind, weight) in &other.entries {
            match self.entries.iter_mut().find(|(existing, _)| *existing == kind) {
                Some(entry) => entry.1 = weight,
                None => self.entries.push((kind, weight)),
            }
        }
        self
    }

    /// Parses `kind=weight` pairs such as `exact=100`.
    pub fn parse_entry(raw: &str) -> Result<(MatcherKind, u32)> {
        let (kind, weight) = raw
            .split_once('=')
            .or_else(|| raw.split_once(':'))
            .ok_or_else(|| {
                RelevanceError::Other(format!("expected kind=weight, got {raw:?}"))
            })?;
        let kind: MatcherKind = kind.parse()?;
        let weight: u32 = weight.trim().parse().map_err(|_| {
            RelevanceError::Other(format!("weight for {kind} is not a number: {weight:?}"))
        })?;
        if weight == 0 {
            return Err(RelevanceError::InvalidWeight { kind });
        }
        Ok((kind, weight))
    }

    #[must_use]
    pub fn weight(&self, kind: MatcherKind) -> Option<u32> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == kind)
            .map(|(_, weight)| *weight)
    }

    #[must_use]
    pub fn contains(&self, kind: MatcherKind) -> bool {
        self.weight(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatcherKind, u32)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest score a row can reach with this set.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, (_, weight)| acc.saturating_add(*weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extended_appends_after_standard() {
        let kinds: Vec<_> = MatcherSet::extended().iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![
                MatcherKind::Exact,
                MatcherKind::StartOfString,
                MatcherKind::SpacelessLength,
                MatcherKind::Acronym,
                MatcherKind::ConsecutiveCharacters,
                MatcherKind::Spaceless,
                MatcherKind::StartOfWords,
                MatcherKind::StudlyCase,
                MatcherKind::InString,
                MatcherKind::TimesInString,
            ]
        );
        assert_eq!(MatcherSet::standard().total_weight(), 312);
        assert_eq!(MatcherSet::extended().total_weight(), 417);
    }

    #[test]
    fn merge_overrides_in_place() {
        let overlay = MatcherSet::custom([(MatcherKind::Exact, 7), (MatcherKind::InString, 3)]).unwrap();
        let merged = MatcherSet::standard().merge(&overlay);
        assert_eq!(merged.len(), 7);
        assert_eq!(merged.iter().next(), Some((MatcherKind::Exact, 7)));
        assert_eq!(merged.weight(MatcherKind::InString), Some(3));
    }

    #[test]
    fn insert_rejects_zero_weight() {
        let err = MatcherSet::custom([(MatcherKind::Exact, 0)]).unwrap_err();
        assert!(matches!(err, RelevanceError::InvalidWeight { kind: MatcherKind::Exact }));
    }

    #[test]
    fn zero_weight_anywhere_in_a_custom_list_is_rejected() {
        let err = MatcherSet::custom([
            (MatcherKind::Exact, 100),
            (MatcherKind::InString, 0),
            (MatcherKind::Acronym, 42),
        ])
        .unwrap_err();
        assert!(matches!(err, RelevanceError::InvalidWeight { kind: MatcherKind::InString }));
    }

    #[test]
    fn duplicate_custom_entries_keep_last_weight() {
        let set = MatcherSet::custom([(MatcherKind::Exact, 10), (MatcherKind::Exact, 20)]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.weight(MatcherKind::Exact), Some(20));
    }

    #[test]
    fn parses_entries() {
        assert_eq!(
            MatcherSet::parse_entry("exact=100").unwrap(),
            (MatcherKind::Exact, 100)
        );
        assert_eq!(
            MatcherSet::parse_entry("StudlyCase: 32").unwrap(),
            (MatcherKind::StudlyCase, 32)
        );
        assert!(MatcherSet::parse_entry("exact").is_err());
        assert!(MatcherSet::parse_entry("exact=abc").is_err());
        assert!(MatcherSet::parse_entry("exact=0").is_err());
        assert!(MatcherSet::parse_entry("soundex=5").is_err());
    }
}
