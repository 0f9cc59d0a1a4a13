use serde::{Serialize, Serializer};

/// Written in place of any field that could not be read from its container.
pub const UNAVAILABLE: &str = "unavailable";

/// Outcome of reading one field out of an item container.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Field {
    Found(String),
    Missing,
}

impl Field {
    pub fn as_str(&self) -> &str {
        match self {
            Field::Found(value) => value,
            Field::Missing => UNAVAILABLE,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => Field::Found(value),
            None => Field::Missing,
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One product as it appeared on the listing. Key order in the JSON output
/// follows field declaration order.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Record {
    pub name: Field,
    pub price: Field,
    pub image: Field,
}

impl Record {
    pub fn missing_fields(&self) -> usize {
        [&self.name, &self.price, &self.image]
            .iter()
            .filter(|f| f.is_missing())
            .count()
    }
}
