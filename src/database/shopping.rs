use serde::Serialize;

use super::schema::CartIngredientRow;
use crate::constants::SHOPPING_LIST_HEADER;

/// One aggregated (name, unit) group of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Groups cart ingredient rows by (name, unit) and sums the amounts.
/// Output keeps the order in which groups first appear in the input.
pub fn aggregate(rows: &[CartIngredientRow]) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = vec![];

    for row in rows {
        let group = items
            .iter_mut()
            .find(|item| item.name == row.name && item.measurement_unit == row.measurement_unit);

        match group {
            Some(item) => item.amount += i64::from(row.amount),
            None => items.push(ShoppingListItem {
                name: row.name.clone(),
                measurement_unit: row.measurement_unit.clone(),
                amount: i64::from(row.amount),
            }),
        }
    }

    items
}

/// Renders the aggregated list as the downloadable plain-text body.
pub fn render(items: &[ShoppingListItem]) -> String {
    let mut text = String::from(SHOPPING_LIST_HEADER);

    for item in items {
        text += &format!("{}, {} -- {}\n", item.name, item.measurement_unit, item.amount);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, amount: i32) -> CartIngredientRow {
        CartIngredientRow {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn sums_by_name_and_unit_in_first_appearance_order() {
        // Recipe A: flour 200g, egg 2pcs; Recipe B: flour 100g, milk 1cup.
        let rows = vec![
            row("flour", "g", 200),
            row("egg", "pcs", 2),
            row("flour", "g", 100),
            row("milk", "cup", 1),
        ];

        let items = aggregate(&rows);
        assert_eq!(
            items,
            vec![
                ShoppingListItem {
                    name: String::from("flour"),
                    measurement_unit: String::from("g"),
                    amount: 300,
                },
                ShoppingListItem {
                    name: String::from("egg"),
                    measurement_unit: String::from("pcs"),
                    amount: 2,
                },
                ShoppingListItem {
                    name: String::from("milk"),
                    measurement_unit: String::from("cup"),
                    amount: 1,
                },
            ]
        );

        assert_eq!(
            render(&items),
            "Ваш список покупок:\n\nflour, g -- 300\negg, pcs -- 2\nmilk, cup -- 1\n"
        );
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let rows = vec![row("milk", "ml", 200), row("milk", "cup", 1)];

        let items = aggregate(&rows);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].measurement_unit, "ml");
        assert_eq!(items[1].measurement_unit, "cup");
    }

    #[test]
    fn empty_cart_renders_header_only() {
        let items = aggregate(&[]);
        assert!(items.is_empty());
        assert_eq!(render(&items), SHOPPING_LIST_HEADER);
    }
}
