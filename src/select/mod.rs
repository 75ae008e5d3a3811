//! The selection engine: one contract, two strategies chosen from the
//! package settings.

mod cursor;
mod numeric;

use std::io;

pub use cursor::{ArrowSelector, CursorAction, CursorState};
pub use numeric::{parse_numeric_input, NumericInput, NumericSelector};

use crate::config::{ArchPicker, InputMethod, Settings};
use crate::menu::MenuDefinition;

/// What the operator chose on one menu screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionResult {
    Item(u32),
    Back,
    Home,
    SwitchPackage,
    QuitToParent,
    Quit,
}

/// One selectable line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub key: u32,
    pub label: String,
}

/// A renderable screen: a title and its choices in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    pub title: String,
    pub choices: Vec<Choice>,
    /// Message carried over from the previous screen, shown with this one.
    pub notice: Option<String>,
    /// False on screens where switching packages is refused.
    pub offers_switch: bool,
}

impl MenuView {
    pub fn from_menu(menu: &MenuDefinition) -> Self {
        Self {
            title: menu.display_title().to_string(),
            choices: menu
                .items
                .iter()
                .map(|item| Choice {
                    key: item.id,
                    label: item.display_label().to_string(),
                })
                .collect(),
            notice: None,
            offers_switch: true,
        }
    }

    pub fn from_arch_picker(picker: &ArchPicker) -> Self {
        Self {
            title: picker.title.clone(),
            choices: picker
                .options
                .iter()
                .map(|option| Choice {
                    key: option.id,
                    label: option.display.clone(),
                })
                .collect(),
            notice: None,
            offers_switch: false,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

pub trait Selector {
    /// Blocks until the operator makes a choice on `view`. Malformed input
    /// is reported and re-prompted internally; only I/O failures escape.
    fn select(&mut self, view: &MenuView) -> io::Result<SelectionResult>;
}

/// Builds the strategy for `method`, reading presentation options from
/// `settings`.
pub fn build(method: InputMethod, settings: &Settings) -> Box<dyn Selector> {
    match method {
        InputMethod::Numeric => Box::new(NumericSelector::stdio(settings.display_clear)),
        InputMethod::Arrow => Box::new(ArrowSelector::new(
            settings.arrow_indicator.clone(),
            settings.display_clear,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuTree;

    #[test]
    fn test_view_from_menu_keeps_item_order() {
        let tree = MenuTree::from_json(
            r#"{"main": {"title": "Tools", "items": [
                {"id": 7, "type": "main", "label": "Home"},
                {"id": 2, "type": "back"}
            ]}}"#,
        )
        .unwrap();
        let view = MenuView::from_menu(tree.get("main").unwrap());
        assert_eq!(view.title, "Tools");
        assert!(view.offers_switch);
        assert_eq!(
            view.choices,
            vec![
                Choice { key: 7, label: "Home".into() },
                Choice { key: 2, label: "Back".into() },
            ]
        );
    }

    #[test]
    fn test_view_from_arch_picker() {
        let view = MenuView::from_arch_picker(&ArchPicker::default());
        assert_eq!(view.title, "Select architecture");
        assert_eq!(view.choices.len(), 4);
        assert_eq!(view.choices[0], Choice { key: 1, label: "X86_64".into() });
        assert!(!view.offers_switch);
        assert_eq!(view.notice, None);
    }
}
