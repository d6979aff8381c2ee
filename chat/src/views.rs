//! History and shopping list views.
//!
//! Each view loads its list once when shown and rewrites the whole list on
//! every delete. Views do not coordinate with each other or with a running
//! session; a view only sees store changes on its next `load`.
//!
//! A stored list that cannot be read shows as empty, but the view is then
//! not `loaded` and deletes leave the stored value alone.

use recipe_core::Recipe;
use recipe_store::{ListStore, StoreResult};
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct HistoryView {
    lists: ListStore,
    items: Vec<Recipe>,
    loaded: bool,
}

impl HistoryView {
    pub fn new(lists: ListStore) -> Self {
        Self {
            lists,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Read the history key. Failures are logged and show as an empty list.
    pub async fn load(&mut self) -> &[Recipe] {
        (self.items, self.loaded) = match self.lists.load_history().await {
            Ok(items) => (items, true),
            Err(e) => {
                error!(error = %e, "Error retrieving history");
                (Vec::new(), false)
            }
        };
        debug!(count = self.items.len(), "Loaded history view");
        &self.items
    }

    pub fn items(&self) -> &[Recipe] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the last `load` read the stored list successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Remove every entry with `recipe_id` and rewrite the list, even when
    /// nothing matched. Skipped when the history never loaded.
    pub async fn delete(&mut self, recipe_id: i64) -> StoreResult<()> {
        if !self.loaded {
            warn!(recipe_id, "History was not loaded, skipping delete");
            return Ok(());
        }
        self.items.retain(|recipe| recipe.id != recipe_id);
        self.lists.save_history(&self.items).await.inspect_err(|e| {
            error!(recipe_id, error = %e, "Error saving history after delete");
        })
    }
}

#[derive(Debug, Clone)]
pub struct ShopView {
    lists: ListStore,
    items: Vec<String>,
    loaded: bool,
}

impl ShopView {
    pub fn new(lists: ListStore) -> Self {
        Self {
            lists,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Read the shop key. Failures are logged and show as an empty list.
    pub async fn load(&mut self) -> &[String] {
        (self.items, self.loaded) = match self.lists.load_shop().await {
            Ok(items) => (items, true),
            Err(e) => {
                error!(error = %e, "Error retrieving shopping list");
                (Vec::new(), false)
            }
        };
        debug!(count = self.items.len(), "Loaded shop view");
        &self.items
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the last `load` read the stored list successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Remove every entry equal to `item` and rewrite the list
    pub async fn delete(&mut self, item: &str) -> StoreResult<()> {
        if !self.loaded {
            warn!(item, "Shopping list was not loaded, skipping delete");
            return Ok(());
        }
        self.items.retain(|existing| existing != item);
        self.lists.save_shop(&self.items).await.inspect_err(|e| {
            error!(item, error = %e, "Error saving shopping list after delete");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flaky_lists;
    use recipe_store::KeyValueStore;
    use tokio::test;

    const THREE: &str = r#"[{"id":1,"title":"A"},{"id":2,"title":"B"},{"id":3,"title":"C"}]"#;

    #[test]
    async fn test_history_delete_keeps_order() {
        let (_, lists) = flaky_lists(vec![("history", THREE)]);
        let mut view = HistoryView::new(lists.clone());
        assert_eq!(view.load().await.len(), 3);

        view.delete(2).await.unwrap();

        let expected = vec![Recipe::new(1, "A"), Recipe::new(3, "C")];
        assert_eq!(view.items(), expected.as_slice());
        assert_eq!(lists.load_history().await.unwrap(), expected);
    }

    #[test]
    async fn test_history_delete_missing_still_rewrites() {
        let (store, lists) = flaky_lists(vec![("history", THREE)]);
        let mut view = HistoryView::new(lists.clone());
        view.load().await;

        view.delete(99).await.unwrap();

        assert_eq!(view.items().len(), 3);
        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "history");
        assert_eq!(lists.load_history().await.unwrap().len(), 3);
    }

    #[test]
    async fn test_absent_history_is_empty() {
        let (_, lists) = flaky_lists(vec![]);
        let mut view = HistoryView::new(lists);
        assert!(view.load().await.is_empty());
        assert!(view.is_empty());
    }

    #[test]
    async fn test_corrupt_history_shows_empty() {
        let (_, lists) = flaky_lists(vec![("history", "not json")]);
        let mut view = HistoryView::new(lists);
        assert!(view.load().await.is_empty());
        assert!(!view.is_loaded());
    }

    #[test]
    async fn test_delete_leaves_undecodable_history_alone() {
        let stored = r#"[{"id":1,"title":"A"},{"id":"oops"}]"#;
        let (store, lists) = flaky_lists(vec![("history", stored)]);
        let mut view = HistoryView::new(lists.clone());
        view.load().await;

        view.delete(99).await.unwrap();

        assert!(store.writes().is_empty());
        assert_eq!(store.get("history").await.unwrap().as_deref(), Some(stored));
    }

    #[test]
    async fn test_delete_leaves_undecodable_shop_alone() {
        let (store, lists) = flaky_lists(vec![("shop", r#"["eggs", 3]"#)]);
        let mut view = ShopView::new(lists);
        view.load().await;

        view.delete("eggs").await.unwrap();

        assert!(store.writes().is_empty());
        assert_eq!(store.get("shop").await.unwrap().as_deref(), Some(r#"["eggs", 3]"#));
    }

    #[test]
    async fn test_shop_delete_removes_exact_matches() {
        let (_, lists) = flaky_lists(vec![("shop", r#"["salt","Salt","pepper","salt"]"#)]);
        let mut view = ShopView::new(lists.clone());
        view.load().await;

        view.delete("salt").await.unwrap();

        assert_eq!(view.items(), &["Salt", "pepper"]);
        assert_eq!(lists.load_shop().await.unwrap(), vec!["Salt", "pepper"]);
    }

    #[test]
    async fn test_shop_delete_on_empty_writes_empty_list() {
        let (store, lists) = flaky_lists(vec![]);
        let mut view = ShopView::new(lists);
        view.load().await;
        assert!(view.is_loaded());

        view.delete("salt").await.unwrap();

        assert_eq!(store.writes(), vec![("shop".to_string(), "[]".to_string())]);
    }

    #[test]
    async fn test_shop_delete_failure_keeps_local_change() {
        let (store, lists) = flaky_lists(vec![("shop", r#"["salt","pepper"]"#)]);
        let mut view = ShopView::new(lists.clone());
        view.load().await;
        store.fail_writes(true);

        assert!(view.delete("salt").await.is_err());
        assert_eq!(view.items(), &["pepper"]);
        assert_eq!(lists.load_shop().await.unwrap(), vec!["salt", "pepper"]);
    }

    #[test]
    async fn test_views_see_changes_only_after_reload() {
        let (_, lists) = flaky_lists(vec![("shop", r#"["salt"]"#)]);
        let mut first = ShopView::new(lists.clone());
        let mut second = ShopView::new(lists.clone());
        first.load().await;
        second.load().await;

        first.delete("salt").await.unwrap();
        assert_eq!(second.items(), &["salt"]);

        second.load().await;
        assert!(second.is_empty());
    }
}
