//! # Ingredient Quantity Parser Tests
//!
//! Validates the amount/unit/name split used before nutrition estimation,
//! including the documented policy choices for ambiguous lines.

use mealsnap::{parse_line, ParsedIngredientLine};

fn parsed(name: &str, amount: Option<f64>, unit: Option<&str>) -> ParsedIngredientLine {
    ParsedIngredientLine {
        name: name.to_string(),
        amount,
        unit: unit.map(str::to_string),
    }
}

#[test]
fn amount_unit_and_name() {
    assert_eq!(
        parse_line("1 cup flour"),
        parsed("flour", Some(1.0), Some("cup"))
    );
    assert_eq!(
        parse_line("2 tablespoons olive oil"),
        parsed("olive oil", Some(2.0), Some("tablespoons"))
    );
}

#[test]
fn fraction_amounts_divide_as_floats() {
    assert_eq!(
        parse_line("1/2 cup olive oil"),
        parsed("olive oil", Some(0.5), Some("cup"))
    );
    assert_eq!(parse_line("3/4 tsp salt"), parsed("salt", Some(0.75), Some("tsp")));
}

/// No unit token between the number and the name: the token after the
/// amount backs off to the name slot.
#[test]
fn amount_without_unit() {
    assert_eq!(parse_line("2 eggs"), parsed("eggs", Some(2.0), None));
}

#[test]
fn decimal_amounts() {
    assert_eq!(
        parse_line("1.5 kg potatoes"),
        parsed("potatoes", Some(1.5), Some("kg"))
    );
}

/// Policy: with no leading number, the whole line is the name. The second
/// word of "olive oil" must not be captured as a unit.
#[test]
fn line_without_amount_is_name_only() {
    assert_eq!(parse_line("olive oil"), parsed("olive oil", None, None));
    assert_eq!(parse_line("salt"), parsed("salt", None, None));
    assert_eq!(
        parse_line("  a pinch of saffron  "),
        parsed("a pinch of saffron", None, None)
    );
}

#[test]
fn unparseable_amount_token_yields_none() {
    // "." matches the numeric token charset but is not a number.
    assert_eq!(parse_line("./ cup sugar"), parsed("sugar", None, Some("cup")));
}

#[test]
fn zero_denominator_yields_none() {
    assert_eq!(parse_line("1/0 cup chaos"), parsed("chaos", None, Some("cup")));
}

#[test]
fn unit_adjacent_to_amount_without_space() {
    // "100g chicken": the unit may hug the number.
    assert_eq!(
        parse_line("100g chicken"),
        parsed("chicken", Some(100.0), Some("g"))
    );
}
