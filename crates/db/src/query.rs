use std::cmp::Ordering;

use serde_json::Value;

use crate::Document;

/// Document selector understood by every backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    #[default]
    All,
    /// Field equals the value. Against an array field this matches when the
    /// array contains the value, as document stores do.
    Eq(String, Value),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Evaluate the filter against an in-process document.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => match doc.get(field) {
                Some(Value::Array(items)) => items.contains(expected),
                Some(actual) => actual == expected,
                None => expected.is_null(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: Order,
}

impl Sort {
    /// Compare two documents on the sort field; missing fields sort first.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.order {
            Order::Ascending => ordering,
            Order::Descending => ordering.reverse(),
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

/// A filter plus an optional sort, i.e. one `find` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order,
        });
        self
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        Self { filter, sort: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn eq_matches_scalars_and_array_members() {
        let book = doc(json!({"title": "Dune", "genre": ["g1", "g2"]}));

        assert!(Filter::eq("title", "Dune").matches(&book));
        assert!(!Filter::eq("title", "Emma").matches(&book));
        assert!(Filter::eq("genre", "g2").matches(&book));
        assert!(!Filter::eq("genre", "g3").matches(&book));
        assert!(Filter::All.matches(&book));
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let genre = doc(json!({"name": "Fantasy"}));
        assert!(!Filter::eq("name", "fantasy").matches(&genre));
    }

    #[test]
    fn descending_sort_reverses_string_order() {
        let sort = Sort {
            field: "name".into(),
            order: Order::Descending,
        };
        let a = doc(json!({"name": "Fantasy"}));
        let b = doc(json!({"name": "Poetry"}));
        assert_eq!(sort.compare(&a, &b), Ordering::Greater);
        assert_eq!(sort.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn missing_fields_sort_first() {
        let sort = Sort {
            field: "family_name".into(),
            order: Order::Ascending,
        };
        let with = doc(json!({"family_name": "Austen"}));
        let without = doc(json!({}));
        assert_eq!(sort.compare(&without, &with), Ordering::Less);
    }
}
