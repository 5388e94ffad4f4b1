use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use thiserror::Error;

static CORPUS_DIR: Dir = include_dir!("src/corpus");

/// The corpus has no passages to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("corpus contains no passages")]
pub struct EmptyCorpusError;

/// An ordered bank of candidate passages. Non-empty by construction, so
/// selection is total.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub size: u32,
    pub passages: Vec<String>,
}

impl Corpus {
    pub fn new(name: impl Into<String>, passages: Vec<String>) -> Result<Self, EmptyCorpusError> {
        if passages.is_empty() {
            return Err(EmptyCorpusError);
        }
        Ok(Self {
            name: name.into(),
            size: passages.len() as u32,
            passages,
        })
    }

    /// The passage bank embedded in the binary.
    pub fn builtin() -> Self {
        read_corpus_from_file("default.json")
    }

    /// Pick one passage uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // `new` guarantees at least one passage
        self.passages
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

fn read_corpus_from_file(file_name: &str) -> Corpus {
    let file = CORPUS_DIR.get_file(file_name).expect("Corpus file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    from_str(file_as_str).expect("Unable to deserialize corpus json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_corpus_loads() {
        let corpus = Corpus::builtin();

        assert_eq!(corpus.name, "default");
        assert!(!corpus.passages.is_empty());
        assert_eq!(corpus.size as usize, corpus.passages.len());
    }

    #[test]
    fn test_new_rejects_empty() {
        let result = Corpus::new("empty", vec![]);
        assert_eq!(result.unwrap_err(), EmptyCorpusError);
    }

    #[test]
    fn test_new_counts_passages() {
        let corpus = Corpus::new("two", vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(corpus.size, 2);
        assert_eq!(corpus.len(), 2);
        assert!(!corpus.is_empty());
    }

    #[test]
    fn test_pick_returns_member() {
        let corpus = Corpus::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let chosen = corpus.pick(&mut rng).to_string();
            assert!(corpus.passages.contains(&chosen));
        }
    }

    #[test]
    fn test_pick_single_passage_is_deterministic() {
        let corpus = Corpus::new("one", vec!["only".into()]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(corpus.pick(&mut rng), "only");
        assert_eq!(corpus.pick(&mut rng), "only");
    }

    #[test]
    fn test_pick_eventually_covers_bank() {
        // With a uniform choice over a small bank, a modest number of draws
        // should hit more than one distinct passage.
        let corpus = Corpus::builtin();
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(corpus.pick(&mut rng).to_string());
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_corpus_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 2,
            "passages": ["hello world", "lorem ipsum"]
        }
        "#;

        let corpus: Corpus = from_str(json_data).expect("Failed to deserialize test corpus");

        assert_eq!(corpus.name, "test");
        assert_eq!(corpus.size, 2);
        assert_eq!(corpus.passages.len(), 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(EmptyCorpusError.to_string(), "corpus contains no passages");
    }
}
