//! jCard property values.

use serde_json::Value;

/// The value part of a jCard property array, everything after the data type.
///
/// A structured value is one JSON array whose items are strings, or arrays of
/// strings when a component has several values.
#[derive(Debug, Clone, PartialEq)]
pub enum JCardValue {
    /// `["fn", {}, "text", "John"]`
    Single(Value),
    /// `["categories", {}, "text", "a", "b"]`
    Multi(Vec<Value>),
    /// `["n", {}, "text", ["Doe", "John", "", "", ""]]`
    Structured(Vec<Vec<Value>>),
}

impl JCardValue {
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self::Single(value.into())
    }

    #[must_use]
    pub fn multi<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Builds a structured value. Every component is kept, so the arity is
    /// the number of components even when some are empty.
    #[must_use]
    pub fn structured(components: &[&[String]]) -> Self {
        Self::Structured(
            components
                .iter()
                .map(|component| {
                    component
                        .iter()
                        .map(|v| Value::from(v.as_str()))
                        .collect()
                })
                .collect(),
        )
    }

    /// The value as one string. Multi values are comma-joined; structured
    /// values use the text layout `a,b;c`.
    #[must_use]
    pub fn as_single(&self) -> String {
        match self {
            Self::Single(value) => scalar_to_string(value),
            Self::Multi(values) => join(values, ","),
            Self::Structured(components) => components
                .iter()
                .map(|c| join(c, ","))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }

    /// The value as a flat list.
    #[must_use]
    pub fn as_multi(&self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![scalar_to_string(value)],
            Self::Multi(values) => values.iter().map(scalar_to_string).collect(),
            Self::Structured(components) => components
                .iter()
                .flatten()
                .map(scalar_to_string)
                .collect(),
        }
    }

    /// The value as components. Empty strings denote empty components. A
    /// single value is one component; each item of a multi value is one
    /// component.
    #[must_use]
    pub fn as_structured(&self) -> Vec<Vec<String>> {
        let component = |values: &[Value]| -> Vec<String> {
            values
                .iter()
                .map(scalar_to_string)
                .filter(|s| !s.is_empty())
                .collect()
        };
        match self {
            Self::Single(value) => vec![component(std::slice::from_ref(value))],
            Self::Multi(values) => values
                .iter()
                .map(|v| component(std::slice::from_ref(v)))
                .collect(),
            Self::Structured(components) => components.iter().map(|c| component(c)).collect(),
        }
    }

    /// The JSON values that follow the data type in a property array.
    #[must_use]
    pub fn to_json_values(&self) -> Vec<Value> {
        match self {
            Self::Single(value) => vec![value.clone()],
            Self::Multi(values) => values.clone(),
            Self::Structured(components) => vec![Value::Array(
                components
                    .iter()
                    .map(|component| match component.as_slice() {
                        [] => Value::from(""),
                        [single] => single.clone(),
                        many => Value::Array(many.to_vec()),
                    })
                    .collect(),
            )],
        }
    }

    /// Reads the values that follow the data type in a property array.
    #[must_use]
    pub fn from_json_values(values: &[Value]) -> Self {
        match values {
            [] => Self::Single(Value::from("")),
            [Value::Array(components)] => Self::Structured(
                components
                    .iter()
                    .map(|component| match component {
                        Value::Array(items) => items.clone(),
                        Value::String(s) if s.is_empty() => Vec::new(),
                        other => vec![other.clone()],
                    })
                    .collect(),
            ),
            [single] => Self::Single(single.clone()),
            many => Self::Multi(many.to_vec()),
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn join(values: &[Value], separator: &str) -> String {
    values
        .iter()
        .map(scalar_to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_keeps_empty_slots() {
        let empty: Vec<String> = Vec::new();
        let street = vec!["1 Main".to_string(), "Apt 2".to_string()];
        let city = vec!["Austin".to_string()];
        let value = JCardValue::structured(&[&empty, &street, &city]);
        assert_eq!(
            value.to_json_values(),
            vec![json!(["", ["1 Main", "Apt 2"], "Austin"])]
        );
        assert_eq!(
            value.as_structured(),
            vec![Vec::<String>::new(), street, city]
        );
    }

    #[test]
    fn reads_shapes() {
        assert_eq!(
            JCardValue::from_json_values(&[json!("x")]),
            JCardValue::single("x")
        );
        assert_eq!(
            JCardValue::from_json_values(&[json!("a"), json!("b")]),
            JCardValue::multi(["a", "b"])
        );
        let structured = JCardValue::from_json_values(&[json!(["Doe", "", ["A", "B"]])]);
        assert_eq!(
            structured.as_structured(),
            vec![vec!["Doe".to_string()], vec![], vec!["A".to_string(), "B".to_string()]]
        );
        assert_eq!(structured.as_single(), "Doe;;A,B");
    }

    #[test]
    fn scalars_become_strings() {
        assert_eq!(JCardValue::single(42).as_single(), "42");
        assert_eq!(JCardValue::single(true).as_multi(), vec!["true"]);
        assert_eq!(JCardValue::single(Value::Null).as_single(), "");
    }
}
