use serde::{Deserialize, Serialize};

/// A value stored on an entity under a tag.
///
/// Hosts decide what tags mean. The engine only checks whether a tag is
/// present and, for numeric tags such as `age`, compares against a minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentValue {
    /// A marker tag with no payload.
    Flag,
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
}

impl ComponentValue {
    /// The numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text payload, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ComponentValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ComponentValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl std::fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "*"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_accessors() {
        let v = ComponentValue::from(12.5);
        assert_eq!(v.as_number(), Some(12.5));
        assert_eq!(v.as_text(), None);
    }

    #[test]
    fn flag_has_no_payload() {
        assert_eq!(ComponentValue::Flag.as_number(), None);
        assert_eq!(ComponentValue::Flag.as_text(), None);
    }

    #[test]
    fn untagged_json_shapes() {
        let n: ComponentValue = serde_json::from_str("3.0").unwrap();
        assert_eq!(n, ComponentValue::Number(3.0));
        let t: ComponentValue = serde_json::from_str("\"herbivore\"").unwrap();
        assert_eq!(t.as_text(), Some("herbivore"));
    }
}
