// Utility functions

/// Identity of a stored assignment: the product's source, country and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKey<'a> {
    pub source: &'a str,
    pub country: &'a str,
    pub source_id: &'a str,
}

impl<'a> RecordKey<'a> {
    pub fn new(source: &'a str, country: &'a str, source_id: &'a str) -> Self {
        Self {
            source,
            country,
            source_id,
        }
    }

    /// Flat key: `{source}_{country}_{source_id}`.
    pub fn key(&self) -> String {
        record_key(self.source, self.country, self.source_id)
    }
}

pub fn record_key(source: &str, country: &str, source_id: &str) -> String {
    format!("{}_{}_{}", source, country, source_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_parts_in_order() {
        assert_eq!(record_key("APO", "lt", "12345"), "APO_lt_12345");
        assert_eq!(RecordKey::new("APO", "lt", "12345").key(), "APO_lt_12345");
    }
}
