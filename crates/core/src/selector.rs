use crate::{Deck, DeckError, FolderId, RngState, Roster};
use std::collections::HashMap;

/// Anything that can turn a folder id into normalized decks: the relay in
/// process, or an HTTP client talking to it.
pub trait DeckSource {
    fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError>;
}

impl<T: DeckSource + ?Sized> DeckSource for &T {
    fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError> {
        (**self).fetch_folder(folder)
    }
}

impl<T: DeckSource + ?Sized> DeckSource for std::sync::Arc<T> {
    fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError> {
        (**self).fetch_folder(folder)
    }
}

/// Decks grouped by bracket label. Built in one pass and never edited after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketBuckets {
    buckets: HashMap<String, Vec<Deck>>,
}

impl BracketBuckets {
    pub fn get(&self, bracket: &str) -> Option<&[Deck]> {
        self.buckets.get(bracket).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Deck])> {
        self.buckets
            .iter()
            .map(|(label, decks)| (label.as_str(), decks.as_slice()))
    }

    /// Labels for display: numeric labels numerically, then the rest
    /// alphabetically.
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        labels.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });
        labels
    }
}

/// Groups decks by bracket label, keeping input order inside each group.
/// Decks without a bracket are grouped under the sentinel label so the total
/// count is preserved; the selector filters those out before calling this.
pub fn organize_by_bracket(decks: &[Deck]) -> BracketBuckets {
    let mut buckets: HashMap<String, Vec<Deck>> = HashMap::new();
    for deck in decks {
        buckets
            .entry(deck.bracket.to_string())
            .or_default()
            .push(deck.clone());
    }
    BracketBuckets { buckets }
}

/// Uniformly random deck from one bucket; `None` if the bucket is missing
/// or empty.
pub fn pick_random<'a>(
    bracket: &str,
    buckets: &'a BracketBuckets,
    rng: &mut RngState,
) -> Option<&'a Deck> {
    let decks = buckets.get(bracket)?;
    rng.index(decks.len()).map(|idx| &decks[idx])
}

/// Resolves players to folders and loads their usable decks.
#[derive(Debug, Clone)]
pub struct DeckSelector<S> {
    roster: Roster,
    source: S,
}

impl<S: DeckSource> DeckSelector<S> {
    pub fn new(roster: Roster, source: S) -> Self {
        Self { roster, source }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decks of `player` that carry a bracket. Source errors pass through
    /// untouched; an empty result after filtering is `NoUsableDecks`.
    pub fn load_decks(&self, player: &str) -> Result<Vec<Deck>, DeckError> {
        let folder = self.roster.resolve(player)?;
        let decks = self.source.fetch_folder(folder)?;
        let usable: Vec<Deck> = decks.into_iter().filter(Deck::has_bracket).collect();
        if usable.is_empty() {
            return Err(DeckError::NoUsableDecks {
                player: player.to_string(),
            });
        }
        Ok(usable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bracket, DeckId};

    fn deck(id: u64, bracket: &str) -> Deck {
        Deck::new(DeckId::Number(id), format!("deck {id}"), Bracket::rated(bracket))
    }

    #[test]
    fn grouping_keeps_order_and_count() {
        let decks = vec![deck(1, "3"), deck(2, "2"), deck(3, "3"), deck(4, "4"), deck(5, "3")];
        let buckets = organize_by_bracket(&decks);
        assert_eq!(buckets.total(), decks.len());
        let ids: Vec<_> = buckets
            .get("3")
            .expect("bucket")
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(
            ids,
            vec![DeckId::Number(1), DeckId::Number(3), DeckId::Number(5)]
        );
    }

    #[test]
    fn sorted_labels_are_numeric_first() {
        let decks = vec![deck(1, "10"), deck(2, "2"), deck(3, "casual"), deck(4, "4")];
        let buckets = organize_by_bracket(&decks);
        assert_eq!(buckets.sorted_labels(), vec!["2", "4", "10", "casual"]);
    }

    #[test]
    fn pick_stays_inside_bucket() {
        let decks = vec![deck(1, "3"), deck(2, "2"), deck(3, "3")];
        let buckets = organize_by_bracket(&decks);
        let mut rng = RngState::from_seed(11);
        for _ in 0..200 {
            let picked = pick_random("3", &buckets, &mut rng).expect("pick");
            assert_eq!(picked.bracket, Bracket::rated("3"));
            assert!(buckets.get("3").expect("bucket").contains(picked));
        }
    }

    #[test]
    fn pick_from_missing_or_empty_bucket_is_none() {
        let buckets = organize_by_bracket(&[]);
        let mut rng = RngState::from_seed(1);
        assert!(pick_random("3", &buckets, &mut rng).is_none());
        assert_eq!(rng.index(0), None);
    }

    #[test]
    fn picks_are_uniform() {
        let decks: Vec<Deck> = (0..4).map(|id| deck(id, "2")).collect();
        let buckets = organize_by_bracket(&decks);
        let mut rng = RngState::from_seed(0xC0FFEE);
        let draws = 20_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let picked = pick_random("2", &buckets, &mut rng).expect("pick");
            let DeckId::Number(id) = &picked.id else {
                panic!("numeric id expected");
            };
            counts[*id as usize] += 1;
        }
        for count in counts {
            let freq = count as f64 / draws as f64;
            assert!((freq - 0.25).abs() < 0.02, "frequency {freq} too far from 0.25");
        }
    }
}
