//! Request binding: turn route, query and form values into the parameter set
//! the key templates are resolved against.

use std::collections::HashMap;

use keyspace::ParameterSet;

/// Form field carrying the value of a write.
pub const VALUE_FIELD: &str = "value";

/// Merge route parameters with query or form parameters.
///
/// Route parameters always win, so a form field named `key` can never
/// redirect a write away from the key in the URL. Empty extra values are
/// dropped; `?customer_id=` behaves like an absent `customer_id`.
pub fn bind(route: HashMap<String, String>, extra: HashMap<String, String>) -> ParameterSet {
    let mut params: ParameterSet = route.into_iter().collect();
    for (name, value) in extra {
        if value.is_empty() {
            continue;
        }
        params.insert_if_absent(name, value);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn route_parameters_take_precedence() {
        let params = bind(
            map(&[("context", "dev"), ("key", "foo")]),
            map(&[("key", "test.foo"), ("value", "test.bar"), ("customer_id", "123456")]),
        );
        assert_eq!(params.get("key"), Some("foo"));
        assert_eq!(params.get("context"), Some("dev"));
        assert_eq!(params.get("customer_id"), Some("123456"));
        assert_eq!(params.get(VALUE_FIELD), Some("test.bar"));
    }

    #[test]
    fn empty_extra_values_are_unbound() {
        let params = bind(map(&[("context", "dev")]), map(&[("customer_id", "")]));
        assert!(!params.contains("customer_id"));
        assert_eq!(params.len(), 1);
    }
}
