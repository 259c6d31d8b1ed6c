use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// --- Wire envelope ---

#[derive(Serialize)]
pub(crate) struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a V>,
}

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    /// Outer `Some` whenever the key is present, even as `"errors": null`.
    #[serde(default, deserialize_with = "present")]
    pub errors: Option<Option<Vec<GraphQlError>>>,
}

fn present<'de, D, V>(deserializer: D) -> Result<Option<V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    V::deserialize(deserializer).map(Some)
}

// --- Error payload ---

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

/// One step of an error `path`: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(u64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            f.write_str(" (at ")?;
            for (i, segment) in path.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                write!(f, "{segment}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// The full `errors` array of a response, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GraphQlErrors(pub Vec<GraphQlError>);

impl GraphQlErrors {
    pub fn iter(&self) -> impl Iterator<Item = &GraphQlError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GraphQlErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty error list)");
        }
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
