use serde::{Deserialize, Serialize};

/// A recipe as the chat knows it.
///
/// Search results carry only `id` and `title`; `ingredients` is filled in
/// once the details have been fetched. This is also the element type of the
/// persisted history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl Recipe {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ingredients: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }
}

/// Full information for one recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub id: i64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

impl RecipeDetails {
    /// Point-in-time copy used for the history list
    pub fn snapshot(&self) -> Recipe {
        Recipe::new(self.id, self.title.clone()).with_ingredients(self.ingredients.clone())
    }
}

// --- Spoonacular wire types --- //

/// Body of `GET /recipes/complexSearch`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One entry of a search response
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
}

impl From<SearchResult> for Recipe {
    fn from(result: SearchResult) -> Self {
        Recipe::new(result.id, result.title)
    }
}

/// Body of `GET /recipes/{id}/information`
#[derive(Debug, Deserialize)]
pub struct InformationResponse {
    pub id: i64,
    pub title: String,
    #[serde(rename = "extendedIngredients", default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendedIngredient {
    pub original: String,
}

impl From<InformationResponse> for RecipeDetails {
    fn from(info: InformationResponse) -> Self {
        Self {
            id: info.id,
            title: info.title,
            ingredients: info
                .extended_ingredients
                .into_iter()
                .map(|ing| ing.original)
                .collect(),
            instructions: info.instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_decoding() {
        let body = r#"{
            "results": [
                {"id": 715538, "title": "Pasta Bolognese", "image": "https://img/715538.jpg", "imageType": "jpg"},
                {"id": 716429, "title": "Pasta with Garlic"}
            ],
            "offset": 0,
            "number": 10,
            "totalResults": 2
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();

        let recipes: Vec<Recipe> = response.results.into_iter().map(Recipe::from).collect();
        assert_eq!(recipes[0], Recipe::new(715538, "Pasta Bolognese"));
        assert_eq!(recipes[1].title, "Pasta with Garlic");
        assert!(recipes.iter().all(|r| r.ingredients.is_none()));
    }

    #[test]
    fn test_information_response_decoding() {
        let body = r#"{
            "id": 1,
            "title": "Pasta Bolognese",
            "servings": 4,
            "extendedIngredients": [
                {"id": 11, "original": "200g spaghetti", "name": "spaghetti"},
                {"id": 12, "original": "1 onion, chopped", "name": "onion"}
            ],
            "instructions": "Boil the pasta."
        }"#;

        let info: InformationResponse = serde_json::from_str(body).unwrap();
        let details = RecipeDetails::from(info);
        assert_eq!(details.ingredients, vec!["200g spaghetti", "1 onion, chopped"]);
        assert_eq!(details.instructions.as_deref(), Some("Boil the pasta."));

        let snapshot = details.snapshot();
        assert_eq!(snapshot.id, 1);
        assert_eq!(
            snapshot.ingredients,
            Some(vec!["200g spaghetti".to_string(), "1 onion, chopped".to_string()])
        );
    }

    #[test]
    fn test_null_instructions() {
        let body = r#"{"id": 2, "title": "Toast", "extendedIngredients": [], "instructions": null}"#;
        let details = RecipeDetails::from(serde_json::from_str::<InformationResponse>(body).unwrap());
        assert!(details.instructions.is_none());
        assert!(details.ingredients.is_empty());
    }

    #[test]
    fn test_recipe_json_shape() {
        let plain = serde_json::to_string(&Recipe::new(3, "Soup")).unwrap();
        assert_eq!(plain, r#"{"id":3,"title":"Soup"}"#);

        let stored: Recipe =
            serde_json::from_str(r#"{"id":3,"title":"Soup","ingredients":["water"]}"#).unwrap();
        assert_eq!(stored.ingredients, Some(vec!["water".to_string()]));
    }
}
