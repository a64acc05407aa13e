//! Menu widgets

use crate::messages::Translator;
use orchestra_core::ListenerError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub link: String,
}

/// Ordered list of menu items with unique ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub name: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Add an item, replacing any existing item with the same id
    pub fn add(&mut self, item: MenuItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Registry of named menus such as `menu.orchestra`
#[derive(Debug, Default)]
pub struct MenuWidget {
    menus: RwLock<BTreeMap<String, Menu>>,
}

impl MenuWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the menu `name` if it does not exist yet
    pub fn make(&self, name: &str) {
        self.menus
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Menu {
                name: name.to_string(),
                items: Vec::new(),
            });
    }

    /// Add an item to `menu`, creating the menu when needed
    pub fn add(&self, menu: &str, id: &str, title: impl Into<String>, link: impl Into<String>) {
        let item = MenuItem {
            id: id.to_string(),
            title: title.into(),
            link: link.into(),
        };
        debug!("Adding '{}' to {}", item.id, menu);
        self.menus
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(menu.to_string())
            .or_insert_with(|| Menu {
                name: menu.to_string(),
                items: Vec::new(),
            })
            .add(item);
    }

    pub fn get(&self, name: &str) -> Option<Menu> {
        self.menus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.menus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

/// Fills the admin menu once the admin area is ready
pub struct AdminMenuHandler {
    widget: Arc<MenuWidget>,
    translator: Arc<dyn Translator>,
    base_url: String,
}

impl AdminMenuHandler {
    /// Menu the admin entries are added to
    pub const MENU: &'static str = "menu.orchestra";

    /// `base_url` is the admin root, e.g. `http://localhost/admin`
    pub fn new(
        widget: Arc<MenuWidget>,
        translator: Arc<dyn Translator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            widget,
            translator,
            base_url: base_url.into(),
        }
    }

    pub fn handle(&self) -> Result<(), ListenerError> {
        self.widget.add(
            Self::MENU,
            "extensions",
            self.translator.translate("title.extensions.list", &[]),
            format!("{}/extensions", self.base_url),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::LineTranslator;

    #[test]
    fn test_make_is_idempotent() {
        let widget = MenuWidget::new();
        widget.make("menu.app");
        widget.add("menu.app", "home", "Home", "/");
        widget.make("menu.app");

        assert_eq!(widget.get("menu.app").unwrap().items.len(), 1);
    }

    #[test]
    fn test_add_replaces_same_id() {
        let widget = MenuWidget::new();
        widget.add("menu.orchestra", "home", "Home", "/a");
        widget.add("menu.orchestra", "home", "Dashboard", "/b");

        let menu = widget.get("menu.orchestra").unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.item("home").unwrap().link, "/b");
    }

    #[test]
    fn test_admin_menu_handler_adds_extensions() {
        let widget = Arc::new(MenuWidget::new());
        let handler = AdminMenuHandler::new(
            Arc::clone(&widget),
            Arc::new(LineTranslator::english().unwrap()),
            "http://localhost/admin",
        );

        handler.handle().unwrap();

        let menu = widget.get(AdminMenuHandler::MENU).unwrap();
        let item = menu.item("extensions").unwrap();
        assert_eq!(item.title, "Extensions");
        assert_eq!(item.link, "http://localhost/admin/extensions");
    }
}
