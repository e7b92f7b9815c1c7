//! Parses the assistant's free-text plan response. A missing section is
//! fatal; a malformed field inside a section degrades to a default.

use thiserror::Error;

use super::dto::{GroceryItem, PlanResult};

pub const PLAN_SUMMARY: &str = "PLAN SUMMARY";
pub const GROCERY_LIST: &str = "GROCERY LIST";
pub const INSTRUCTIONS: &str = "INSTRUCTIONS";
pub const NUTRITION: &str = "NUTRITION";
pub const TOTAL_COST: &str = "TOTAL COST";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("assistant response was missing the [{0}] section")]
    MissingSection(&'static str),
}

/// The body of `[name]` runs up to the next `[` tag or end of input.
fn section_body<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let tag = format!("[{name}]");
    let start = text.find(&tag)? + tag.len();
    let rest = &text[start..];
    let body = match rest.find('[') {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim())
}

fn required_section<'a>(text: &'a str, name: &'static str) -> Result<&'a str, ParseError> {
    match section_body(text, name) {
        Some(body) if !body.is_empty() => Ok(body),
        _ => Err(ParseError::MissingSection(name)),
    }
}

/// Strips everything that is not part of a number, then parses. Unparseable
/// prices default to 0 instead of failing the line.
fn clean_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0).max(0.0)
}

/// Numeric prefix of the text, so "42.50 (estimated)" still reads as 42.5.
fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.' && *c != '-')
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().ok()
}

/// A grocery line is a semicolon-separated list of `key: value` pairs.
/// Lines without a usable `name` are noise and dropped; a missing id gets a
/// generated one.
fn parse_grocery_line(line: &str) -> Option<GroceryItem> {
    let mut id = None;
    let mut name = None;
    let mut quantity = None;
    let mut price = None;

    for part in line.split(';') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "id" if !value.is_empty() => id = Some(value.to_string()),
            "name" if !value.is_empty() => name = Some(value.to_string()),
            "quantity" if !value.is_empty() => quantity = Some(value.to_string()),
            "price" => price = Some(clean_price(value)),
            _ => {}
        }
    }

    Some(GroceryItem {
        id: id.unwrap_or_else(GroceryItem::generated_id),
        name: name?,
        quantity: quantity.unwrap_or_default(),
        price: price.unwrap_or(0.0),
    })
}

pub fn parse_grocery_list(section: &str) -> Vec<GroceryItem> {
    section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_grocery_line)
        .collect()
}

pub fn parse_plan(text: &str) -> Result<PlanResult, ParseError> {
    let plan_summary = required_section(text, PLAN_SUMMARY)?;
    let grocery_section = required_section(text, GROCERY_LIST)?;
    let instructions = required_section(text, INSTRUCTIONS)?;
    let nutrition = required_section(text, NUTRITION)?;
    let total_cost_section = required_section(text, TOTAL_COST)?;

    Ok(PlanResult {
        plan_summary: plan_summary.to_string(),
        grocery_list: parse_grocery_list(grocery_section),
        instructions: instructions.to_string(),
        nutrition: nutrition.to_string(),
        total_cost: leading_number(total_cost_section).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(grocery_lines: &str, total_cost: &str) -> String {
        format!(
            "[PLAN SUMMARY]\nA 5-day cut at 1780 kcal/day.\n\
             [GROCERY LIST]\n{grocery_lines}\n\
             [INSTRUCTIONS]\n### Dinner\nRoast the salmon.\n\
             [NUTRITION]\n### Total\n1780 kcal, 133g protein.\n\
             [TOTAL COST]\n{total_cost}\n"
        )
    }

    #[test]
    fn parses_all_five_sections() {
        let text = fixture(
            "id: ing-1; name: Salmon; quantity: 2 lbs; price: $18.99\n\
             id: ing-2; name: Asparagus; quantity: 1 bunch; price: 3.49",
            "42.50",
        );
        let plan = parse_plan(&text).unwrap();
        assert_eq!(plan.plan_summary, "A 5-day cut at 1780 kcal/day.");
        assert_eq!(plan.grocery_list.len(), 2);
        assert_eq!(plan.grocery_list[0].name, "Salmon");
        assert!((plan.grocery_list[0].price - 18.99).abs() < 1e-9);
        assert!(plan.instructions.contains("Roast the salmon."));
        assert!((plan.total_cost - 42.5).abs() < 1e-9);
    }

    #[test]
    fn missing_section_is_fatal() {
        let text = "[PLAN SUMMARY]\nok\n[GROCERY LIST]\nname: Rice\n\
                    [INSTRUCTIONS]\nok\n[NUTRITION]\nok\n";
        assert_eq!(parse_plan(text), Err(ParseError::MissingSection(TOTAL_COST)));
    }

    #[test]
    fn empty_section_counts_as_missing() {
        let text = fixture("name: Rice", "10").replace("A 5-day cut at 1780 kcal/day.", " ");
        assert_eq!(
            parse_plan(&text),
            Err(ParseError::MissingSection(PLAN_SUMMARY))
        );
    }

    #[test]
    fn parse_is_idempotent() {
        let text = fixture("id: a; name: Rice; quantity: 2 cups; price: 1.20", "12");
        let first = parse_plan(&text).unwrap();
        let second = parse_plan(&text).unwrap();
        assert_eq!(first.plan_summary, second.plan_summary);
        assert_eq!(first.grocery_list, second.grocery_list);
        assert_eq!(first.total_cost, second.total_cost);
    }

    #[test]
    fn nameless_lines_are_noise_not_errors() {
        let items = parse_grocery_list(
            "Here is your list:\n\
             id: x; quantity: 2\n\
             name: Eggs; quantity: 1 dozen; price: 4.29",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Eggs");
    }

    #[test]
    fn missing_id_gets_generated_one() {
        let items = parse_grocery_list("name: Eggs; quantity: 1 dozen; price: 4.29");
        assert!(items[0].id.starts_with("ing-"));
    }

    #[test]
    fn bad_prices_default_to_zero() {
        let items = parse_grocery_list(
            "name: Eggs; price: n/a\n\
             name: Milk\n\
             name: Butter; price: about $3",
        );
        assert_eq!(items[0].price, 0.0);
        assert_eq!(items[1].price, 0.0);
        assert_eq!(items[2].price, 3.0);
    }

    #[test]
    fn unparseable_total_cost_defaults_to_zero() {
        let plan = parse_plan(&fixture("name: Rice", "$85.00")).unwrap();
        assert_eq!(plan.total_cost, 0.0);
    }

    #[test]
    fn values_may_contain_colons() {
        let items = parse_grocery_list("name: Soup: chicken noodle; quantity: 2 cans; price: 5");
        assert_eq!(items[0].name, "Soup: chicken noodle");
    }

    #[test]
    fn grocery_lines_round_trip() {
        let original = parse_grocery_list(
            "id: ing-1; name: Salmon; quantity: 2 lbs; price: 18.99\n\
             id: ing-2; name: Rice; quantity: 3 cups; price: 2.5",
        );
        let rendered: String = original
            .iter()
            .map(GroceryItem::to_line)
            .collect::<Vec<_>>()
            .join("\n");
        let reparsed = parse_grocery_list(&rendered);
        let key = |items: &[GroceryItem]| {
            items
                .iter()
                .map(|i| (i.name.clone(), i.quantity.clone(), i.price))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&original), key(&reparsed));
    }
}
