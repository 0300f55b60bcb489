use std::collections::BTreeMap;

/// Attribute payload of a population record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    numbers: BTreeMap<String, f64>,
    labels: BTreeMap<String, String>,
}

impl Attributes {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a numeric attribute.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.numbers.get(name).copied()
    }

    /// Set a numeric attribute.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.numbers.insert(name.into(), value);
    }

    /// Value of a categorical attribute.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Set a categorical attribute.
    pub fn set_label(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(name.into(), value.into());
    }

    /// All numeric attributes, sorted by name.
    pub fn numbers(&self) -> impl Iterator<Item = (&str, f64)> {
        self.numbers.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// All categorical attributes, sorted by name.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .numbers()
            .map(|(k, v)| format!("{k}={v:.1}"))
            .collect();
        parts.extend(self.labels().map(|(k, v)| format!("{k}={v}")));
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut attrs = Attributes::new();
        attrs.set("skill", 12.0);
        attrs.set_label("material", "leather");
        assert_eq!(attrs.get("skill"), Some(12.0));
        assert_eq!(attrs.label("material"), Some("leather"));
        assert_eq!(attrs.get("material"), None);
    }

    #[test]
    fn display_lists_numbers_then_labels() {
        let mut attrs = Attributes::new();
        attrs.set("skill", 12.0);
        attrs.set("morale", 3.0);
        attrs.set_label("material", "hide");
        assert_eq!(attrs.to_string(), "morale=3.0 skill=12.0 material=hide");
    }
}
