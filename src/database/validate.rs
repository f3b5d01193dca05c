use std::collections::HashMap;

use serde::Serialize;

use super::form::RecipeSubmission;
use super::schema::{Ingredient, Tag};

/// Reference sets the engine resolves ids against. Built per call by the
/// facade, never read from globals.
pub type IngredientLookup = HashMap<i32, Ingredient>;
pub type TagLookup = HashMap<i32, Tag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    InvalidCookingTime,
    EmptyIngredientList,
    DuplicateIngredient,
    UnknownIngredient,
    NonPositiveAmount,
    EmptyTagList,
    DuplicateTag,
    UnknownTag,
}

/// Field-scoped error report. Every applicable code is collected before the
/// submission is rejected; each code appears at most once per field.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cooking_time: Vec<ValidationCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<ValidationCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ValidationCode>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.cooking_time.is_empty() && self.ingredients.is_empty() && self.tags.is_empty()
    }
}

fn push_code(field: &mut Vec<ValidationCode>, code: ValidationCode) {
    if !field.contains(&code) {
        field.push(code);
    }
}

/// Submission with every reference resolved and deduplication guaranteed,
/// ready for persistence.
#[derive(Debug, Clone)]
pub struct ValidatedRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<(Ingredient, i32)>,
    pub tags: Vec<Tag>,
}

pub fn validate_recipe_submission(
    submission: &RecipeSubmission,
    known_ingredients: &IngredientLookup,
    known_tags: &TagLookup,
) -> Result<ValidatedRecipe, ValidationReport> {
    let mut report = ValidationReport::default();

    if submission.cooking_time < 1 {
        push_code(&mut report.cooking_time, ValidationCode::InvalidCookingTime);
    }

    let mut ingredients: Vec<(Ingredient, i32)> = vec![];
    let mut seen_ingredients: Vec<i32> = vec![];
    if submission.ingredients.is_empty() {
        push_code(&mut report.ingredients, ValidationCode::EmptyIngredientList);
    }
    for line in submission.ingredients.iter() {
        if seen_ingredients.contains(&line.id) {
            push_code(&mut report.ingredients, ValidationCode::DuplicateIngredient);
            continue;
        }
        seen_ingredients.push(line.id);
        if line.amount <= 0 {
            push_code(&mut report.ingredients, ValidationCode::NonPositiveAmount);
        }
        match known_ingredients.get(&line.id) {
            Some(ingredient) => ingredients.push((ingredient.clone(), line.amount)),
            None => push_code(&mut report.ingredients, ValidationCode::UnknownIngredient),
        }
    }

    let mut tags: Vec<Tag> = vec![];
    let mut seen_tags: Vec<i32> = vec![];
    if submission.tags.is_empty() {
        push_code(&mut report.tags, ValidationCode::EmptyTagList);
    }
    for tag_id in submission.tags.iter() {
        if seen_tags.contains(tag_id) {
            push_code(&mut report.tags, ValidationCode::DuplicateTag);
            continue;
        }
        seen_tags.push(*tag_id);
        match known_tags.get(tag_id) {
            Some(tag) => tags.push(tag.clone()),
            None => push_code(&mut report.tags, ValidationCode::UnknownTag),
        }
    }

    if !report.is_empty() {
        return Err(report);
    }

    Ok(ValidatedRecipe {
        name: submission.name.clone(),
        text: submission.text.clone(),
        cooking_time: submission.cooking_time,
        ingredients,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::IngredientAmount;

    fn ingredient(id: i32, name: &str, unit: &str) -> Ingredient {
        Ingredient {
            id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        }
    }

    fn tag(id: i32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            slug: name.to_string(),
            color: format!("#{id:06}"),
        }
    }

    fn lookups() -> (IngredientLookup, TagLookup) {
        let ingredients = [
            ingredient(1, "flour", "g"),
            ingredient(2, "egg", "pcs"),
            ingredient(3, "milk", "cup"),
        ]
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
        let tags = [tag(10, "breakfast"), tag(11, "dinner")]
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        (ingredients, tags)
    }

    fn submission(ingredients: Vec<IngredientAmount>, tags: Vec<i32>) -> RecipeSubmission {
        RecipeSubmission {
            name: String::from("Pancakes"),
            text: String::from("Mix and fry"),
            cooking_time: 20,
            ingredients,
            tags,
            image: None,
        }
    }

    #[test]
    fn valid_submission_resolves_in_input_order() {
        let (ingredients, tags) = lookups();
        let submission = submission(
            vec![
                IngredientAmount { id: 2, amount: 2 },
                IngredientAmount { id: 1, amount: 200 },
            ],
            vec![11, 10],
        );

        let validated =
            validate_recipe_submission(&submission, &ingredients, &tags).expect("valid");
        let names: Vec<&str> = validated
            .ingredients
            .iter()
            .map(|(i, _)| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["egg", "flour"]);
        assert_eq!(validated.ingredients[1].1, 200);
        let tag_ids: Vec<i32> = validated.tags.iter().map(|t| t.id).collect();
        assert_eq!(tag_ids, vec![11, 10]);
    }

    #[test]
    fn empty_ingredient_list_is_rejected() {
        let (ingredients, tags) = lookups();
        let submission = submission(vec![], vec![10]);

        let report =
            validate_recipe_submission(&submission, &ingredients, &tags).unwrap_err();
        assert_eq!(report.ingredients, vec![ValidationCode::EmptyIngredientList]);
        assert!(report.tags.is_empty());
    }

    #[test]
    fn repeated_ingredient_id_is_rejected_once() {
        let (ingredients, tags) = lookups();
        let submission = submission(
            vec![
                IngredientAmount { id: 1, amount: 100 },
                IngredientAmount { id: 1, amount: 50 },
                IngredientAmount { id: 1, amount: 25 },
            ],
            vec![10],
        );

        let report =
            validate_recipe_submission(&submission, &ingredients, &tags).unwrap_err();
        assert_eq!(report.ingredients, vec![ValidationCode::DuplicateIngredient]);
    }

    #[test]
    fn errors_accumulate_across_fields() {
        let (ingredients, tags) = lookups();
        let mut submission = submission(
            vec![
                IngredientAmount { id: 99, amount: 1 },
                IngredientAmount { id: 2, amount: 0 },
            ],
            vec![10, 10, 42],
        );
        submission.cooking_time = 0;

        let report =
            validate_recipe_submission(&submission, &ingredients, &tags).unwrap_err();
        assert_eq!(report.cooking_time, vec![ValidationCode::InvalidCookingTime]);
        assert_eq!(
            report.ingredients,
            vec![
                ValidationCode::UnknownIngredient,
                ValidationCode::NonPositiveAmount
            ]
        );
        assert_eq!(
            report.tags,
            vec![ValidationCode::DuplicateTag, ValidationCode::UnknownTag]
        );
    }

    #[test]
    fn empty_tag_list_is_rejected() {
        let (ingredients, tags) = lookups();
        let submission = submission(vec![IngredientAmount { id: 1, amount: 1 }], vec![]);

        let report =
            validate_recipe_submission(&submission, &ingredients, &tags).unwrap_err();
        assert_eq!(report.tags, vec![ValidationCode::EmptyTagList]);
    }
}
