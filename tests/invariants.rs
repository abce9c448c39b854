//! Property-based checks for the §8 invariants that don't need a full
//! scenario fixture: the identifier grammar, the `Int` range boundary, and
//! enum bijection, each exercised against randomly generated inputs rather
//! than a handful of hand-picked examples.

use graphlayer::{
    builtin_scalar_impl, is_valid_identifier, EnumType, EnumValue, EnumValueError, INT_MAX_EXCLUSIVE, INT_MIN,
};
use proptest::prelude::*;

/// Generates strings that `is_valid_identifier` must accept: `[_A-Za-z]` then
/// any run of `[_0-9A-Za-z]`.
fn valid_identifier_strategy() -> impl Strategy<Value = String> {
    "[_a-zA-Z][_a-zA-Z0-9]{0,15}"
}

proptest! {
    /// §8: "∀ identifier in the schema, it matches the identifier regex" --
    /// every string the regex itself can generate must round-trip as valid.
    #[test]
    fn generated_identifiers_are_always_valid(name in valid_identifier_strategy()) {
        prop_assert!(is_valid_identifier(&name));
    }

    /// A string starting with a digit is never a valid identifier, no
    /// matter what follows.
    #[test]
    fn digit_leading_strings_are_never_valid_identifiers(
        first in 0u8..10,
        rest in "[_a-zA-Z0-9]{0,10}",
    ) {
        let name = format!("{first}{rest}");
        prop_assert!(!is_valid_identifier(&name));
    }

    /// A string containing any byte outside `[_0-9A-Za-z]` is never valid,
    /// even if it starts with a letter.
    #[test]
    fn strings_with_punctuation_are_never_valid_identifiers(
        head in "[a-zA-Z]",
        punct in prop::sample::select(vec!['-', '.', ' ', '@', '$', '!', '/']),
        tail in "[_a-zA-Z0-9]{0,5}",
    ) {
        let name = format!("{head}{punct}{tail}");
        prop_assert!(!is_valid_identifier(&name));
    }

    /// §8: "∀ `Int` literal emitted or accepted, value ∈ `[-2^31, 2^31)`" --
    /// driven through the actual `Int` scalar's input coercion, not a
    /// reimplementation of the bound.
    #[test]
    fn int_input_coercion_accepts_exactly_the_in_range_values(n in any::<i64>()) {
        let int_impl = builtin_scalar_impl("Int").expect("Int is a built-in scalar");
        let literal = serde_json::json!(n);
        let result = int_impl.coerce_input(&literal);
        let in_range = (INT_MIN..INT_MAX_EXCLUSIVE).contains(&n);
        prop_assert_eq!(result.is_ok(), in_range, "n = {n}");
    }

    #[test]
    fn int_range_boundaries_are_exactly_31_bits(n in (INT_MIN - 4)..(INT_MIN + 4)) {
        let int_impl = builtin_scalar_impl("Int").expect("Int is a built-in scalar");
        let result = int_impl.coerce_input(&serde_json::json!(n));
        prop_assert_eq!(result.is_ok(), n >= INT_MIN);
    }

    #[test]
    fn int_upper_boundary_is_exclusive(n in (INT_MAX_EXCLUSIVE - 4)..(INT_MAX_EXCLUSIVE + 4)) {
        let int_impl = builtin_scalar_impl("Int").expect("Int is a built-in scalar");
        let result = int_impl.coerce_input(&serde_json::json!(n));
        prop_assert_eq!(result.is_ok(), n < INT_MAX_EXCLUSIVE);
    }

    /// §8: "Enum maps are bijections: ∀ enum `E`, `|graphql_names(E)| =
    /// |internal_values(E)|`." Feed a generated list of (name, internal
    /// value) pairs through `EnumType::add_value` one at a time; the
    /// accepted subset must end up bijective, and every rejection must be
    /// a real collision (reserved name, duplicate name, or a repeated
    /// internal value), never a false negative.
    #[test]
    fn enum_builder_only_ever_produces_a_bijection(
        pairs in prop::collection::vec(("[a-zA-Z][a-zA-Z0-9]{0,6}", "[a-zA-Z0-9]{1,4}"), 0..12)
    ) {
        let mut enum_type = EnumType::new("Generated");
        let mut accepted_names = std::collections::HashSet::new();
        let mut accepted_values = std::collections::HashSet::new();

        for (name, internal_value) in &pairs {
            let value = EnumValue {
                name: name.clone(),
                internal_value: internal_value.clone(),
                description: None,
                deprecated: false,
                deprecation_reason: None,
            };
            let reserved = matches!(name.as_str(), "true" | "false" | "null");
            let dup_name = accepted_names.contains(name);
            let dup_value = accepted_values.contains(internal_value);

            match enum_type.add_value(value) {
                Ok(()) => {
                    prop_assert!(!reserved && !dup_name && !dup_value);
                    accepted_names.insert(name.clone());
                    accepted_values.insert(internal_value.clone());
                }
                Err(EnumValueError::Reserved(_)) => prop_assert!(reserved),
                Err(EnumValueError::DuplicateConstant(_)) => prop_assert!(!reserved && dup_name),
                Err(EnumValueError::NonBijective(_)) => prop_assert!(!reserved && !dup_name && dup_value),
            }
        }

        // The accepted set is a bijection by construction: as many distinct
        // names as distinct internal values, each appearing exactly once.
        prop_assert_eq!(enum_type.values.len(), accepted_names.len());
        prop_assert_eq!(accepted_names.len(), accepted_values.len());
    }
}
