use std::collections::HashMap;
use std::path::Path;

use crate::CoreError;

/// Inverse document frequency per processed term.
///
/// Loaded from a TSV with `term \t count \t idf` rows. Terms that are not in
/// the table are treated as maximally rare (idf 1.0).
#[derive(Debug, Clone, Default)]
pub struct Idf {
    idf: HashMap<String, f64>,
}

impl Idf {
    pub fn new(idf: HashMap<String, f64>) -> Self {
        Self { idf }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let mut idf = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                return Err(CoreError::Parse(format!(
                    "IDF line {} has {} fields, expected 3",
                    number + 1,
                    fields.len()
                )));
            }
            let value: f64 = fields[2].trim().parse().map_err(|e| {
                CoreError::Parse(format!("IDF line {}: bad value '{}': {}", number + 1, fields[2], e))
            })?;
            if idf.insert(fields[0].to_string(), value).is_some() {
                return Err(CoreError::Parse(format!("duplicate IDF term '{}'", fields[0])));
            }
        }
        Ok(Self { idf })
    }

    pub fn get(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(1.0)
    }

    /// IDF pulled towards 1.0: `(idf + shift) / (1 + shift)`.
    pub fn get_shifted(&self, term: &str, shift: f64) -> f64 {
        (self.get(term) + shift) / (1.0 + shift)
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let idf = Idf::parse("the\t1000\t0.05\nfoobar\t2\t0.9\n").unwrap();
        assert_eq!(idf.len(), 2);
        assert_eq!(idf.get("foobar"), 0.9);
        assert_eq!(idf.get("unseen"), 1.0);
    }

    #[test]
    fn test_shifted() {
        let idf = Idf::parse("a\t1\t0.5\n").unwrap();
        assert_eq!(idf.get_shifted("a", 0.0), 0.5);
        assert_eq!(idf.get_shifted("a", 1.0), 0.75);
        assert_eq!(idf.get_shifted("missing", 3.0), 1.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Idf::parse("only\ttwo\n"), Err(CoreError::Parse(_))));
        assert!(matches!(Idf::parse("a\t1\tx\n"), Err(CoreError::Parse(_))));
        assert!(matches!(Idf::parse("a\t1\t0.1\na\t2\t0.2\n"), Err(CoreError::Parse(_))));
    }
}
