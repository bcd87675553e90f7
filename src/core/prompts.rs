use crate::models::WineSummary;

const MISSING: &str = "N/A";

fn field(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

/// One-line description of a wine, `N/A` for unknown fields
pub fn describe_wine(wine: &WineSummary) -> String {
    let year = wine.year.as_ref().map(|y| y.to_string());

    format!(
        "Name: {}, Producer: {}, Region: {}, Color: {}, Year: {}",
        field(wine.name.as_deref()),
        field(wine.producer.as_deref()),
        field(wine.region.as_deref()),
        field(wine.color.as_deref()),
        field(year.as_deref()),
    )
}

/// Prompt asking for dishes that suit one wine
pub fn food_for_wine_prompt(wine: &WineSummary) -> String {
    format!(
        "Given the wine: Wine {}, what are 3-5 great food pairing suggestions? Provide concise suggestions.",
        describe_wine(wine)
    )
}

/// Prompt asking which cellar wines suit a dish
pub fn wine_for_food_prompt(food: &str, wines: &[WineSummary]) -> String {
    let food = food.trim();
    let wine_list = wines.iter().map(describe_wine).collect::<Vec<_>>().join("\n");

    format!(
        "Given the food item: \"{food}\", and the following wines from my cellar:\n\n{wine_list}\n\n\
         Suggest 1-3 wines from the list that would pair well with \"{food}\". \
         If no good pairing exists, state that. Focus only on the provided wine list."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vintage;

    fn barolo() -> WineSummary {
        WineSummary {
            name: Some("Cannubi".into()),
            producer: Some("Brezza".into()),
            region: Some("Barolo".into()),
            color: Some("red".into()),
            year: Some(Vintage::Year(2016)),
        }
    }

    #[test]
    fn test_describe_wine_fills_missing_fields() {
        let wine = WineSummary {
            producer: Some("Krug".into()),
            name: Some("  ".into()),
            ..Default::default()
        };

        assert_eq!(
            describe_wine(&wine),
            "Name: N/A, Producer: Krug, Region: N/A, Color: N/A, Year: N/A"
        );
    }

    #[test]
    fn test_food_for_wine_prompt() {
        let prompt = food_for_wine_prompt(&barolo());
        assert!(prompt.starts_with("Given the wine: Wine Name: Cannubi, Producer: Brezza, Region: Barolo, Color: red, Year: 2016,"));
        assert!(prompt.ends_with("Provide concise suggestions."));
    }

    #[test]
    fn test_wine_for_food_prompt_lists_each_wine() {
        let mut second = barolo();
        second.name = Some("Sarmassa".into());

        let prompt = wine_for_food_prompt(" truffle risotto ", &[barolo(), second]);

        assert!(prompt.starts_with("Given the food item: \"truffle risotto\""));
        assert!(prompt.contains("Name: Cannubi,"));
        assert!(prompt.contains("\nName: Sarmassa,"));
        assert!(prompt.contains("pair well with \"truffle risotto\""));
    }
}
