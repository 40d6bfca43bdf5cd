//! Integer-only text inputs.
//!
//! Accepted text is an optional leading `-` followed by digits.  The empty
//! string and a lone `-` are accepted too: the user is still typing.  Anything
//! else marks the field invalid and the keystroke never reaches the model.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegerInputError {
    #[error("'{0}' is not an integer")]
    NotInteger(String),
    #[error("'{0}' does not fit in a 64-bit integer")]
    OutOfRange(String),
}

/// Does `text` match `^-?\d*$`?
pub fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.chars().all(|c| c.is_ascii_digit())
}

/// Parse the current text of an integer input.
///
/// `Ok(Some(n))` carries a value for the model, `Ok(None)` is valid but
/// unfinished input (`""`, `"-"`), `Err` means the field is invalid.
pub fn parse_integer(text: &str) -> Result<Option<i64>, IntegerInputError> {
    if !is_integer_text(text) {
        return Err(IntegerInputError::NotInteger(text.to_string()));
    }
    if text.is_empty() || text == "-" {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| IntegerInputError::OutOfRange(text.to_string()))
}

/// Mark the input valid/invalid the way the stylesheet expects.
pub fn set_validity(input: &HtmlInputElement, valid: bool) {
    let class_list = input.class_list();
    if valid {
        let _ = class_list.remove_1("invalid");
        let _ = input.remove_attribute("aria-invalid");
    } else {
        let _ = class_list.add_1("invalid");
        let _ = input.set_attribute("aria-invalid", "true");
    }
}

/// Validate `input` on every keystroke and hand complete values to `on_value`.
pub fn bind_integer_input(input: &HtmlInputElement, on_value: impl Fn(i64) + 'static) -> Result<(), JsValue> {
    let target = input.clone();
    let cb = Closure::wrap(Box::new(move |_e: Event| match parse_integer(&target.value()) {
        Ok(value) => {
            set_validity(&target, true);
            if let Some(value) = value {
                on_value(value);
            }
        }
        Err(err) => {
            crate::debug_log!("integer input rejected: {}", err);
            set_validity(&target, false);
        }
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_signed_digits() {
        assert_eq!(parse_integer("-12"), Ok(Some(-12)));
        assert_eq!(parse_integer("42"), Ok(Some(42)));
        assert_eq!(parse_integer("007"), Ok(Some(7)));
    }

    #[test]
    fn unfinished_input_is_valid_without_value() {
        assert_eq!(parse_integer(""), Ok(None));
        assert_eq!(parse_integer("-"), Ok(None));
    }

    #[test]
    fn rejects_everything_else() {
        for text in ["12a", "1.5", "--1", "+3", " 1", "1-", "٣"] {
            assert!(!is_integer_text(text), "{text:?} should be rejected");
            assert!(matches!(parse_integer(text), Err(IntegerInputError::NotInteger(_))));
        }
    }

    #[test]
    fn huge_numbers_are_out_of_range() {
        assert!(matches!(
            parse_integer("99999999999999999999"),
            Err(IntegerInputError::OutOfRange(_))
        ));
    }

    proptest! {
        #[test]
        fn any_i64_round_trips(n in any::<i64>()) {
            prop_assert_eq!(parse_integer(&n.to_string()), Ok(Some(n)));
        }

        #[test]
        fn a_letter_anywhere_invalidates(prefix in "-?[0-9]{0,5}", letter in "[a-zA-Z]", suffix in "[0-9]{0,5}") {
            let text = format!("{prefix}{letter}{suffix}");
            prop_assert!(parse_integer(&text).is_err());
        }
    }
}
