//! The menu tree a tool package describes: menus keyed by id, each with an
//! ordered list of items, and the per-architecture path table carried by
//! executable items.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::arch::ArchTag;

/// Id of the menu every navigation stack starts from.
pub const ROOT_MENU: &str = "main";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "BTreeMap<String, MenuDefinition>")]
pub struct MenuTree {
    menus: BTreeMap<String, MenuDefinition>,
}

impl From<BTreeMap<String, MenuDefinition>> for MenuTree {
    fn from(mut menus: BTreeMap<String, MenuDefinition>) -> Self {
        for (id, menu) in menus.iter_mut() {
            menu.id = id.clone();
        }
        Self { menus }
    }
}

impl MenuTree {
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    pub fn get(&self, id: &str) -> Option<&MenuDefinition> {
        self.menus.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.menus.contains_key(id)
    }

    pub fn has_root(&self) -> bool {
        self.contains(ROOT_MENU)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Defects that do not prevent navigation but should be reported.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for menu in self.menus.values() {
            if let Some(parent) = &menu.parent {
                if !self.contains(parent) {
                    problems.push(format!(
                        "menu '{}' names unknown parent '{parent}'",
                        menu.id
                    ));
                }
            }
            let mut seen = HashSet::new();
            for item in &menu.items {
                if !seen.insert(item.id) {
                    problems.push(format!(
                        "menu '{}' has more than one item with id {}",
                        menu.id, item.id
                    ));
                }
                match &item.kind {
                    ItemKind::Submenu { submenu } if !self.contains(submenu) => {
                        problems.push(format!(
                            "item {} in menu '{}' points to missing menu '{submenu}'",
                            item.id, menu.id
                        ));
                    }
                    ItemKind::Executable { path, .. } if path.is_empty() => {
                        problems.push(format!(
                            "item {} in menu '{}' has no executable path",
                            item.id, menu.id
                        ));
                    }
                    _ => {}
                }
            }
        }
        problems
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MenuDefinition {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuDefinition {
    /// Looks up an item by its selection key. The first match wins when
    /// ids are duplicated.
    pub fn item(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl MenuItem {
    pub fn display_label(&self) -> &str {
        if !self.label.is_empty() {
            return &self.label;
        }
        match &self.kind {
            ItemKind::Submenu { submenu } => submenu.as_str(),
            ItemKind::Executable { .. } => "(unnamed tool)",
            ItemKind::Back => "Back",
            ItemKind::Main => "Main menu",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Submenu {
        submenu: String,
    },
    Executable {
        path: ExecPath,
        #[serde(default)]
        args: Vec<String>,
    },
    Back,
    Main,
}

/// Where an executable item lives: one path for every host, or a table of
/// per-architecture builds kept in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecPath {
    Single(String),
    PerArch(Vec<(ArchTag, String)>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMatch {
    Verbatim,
    Exact,
    X86_64Fallback,
    FirstDeclared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    pub path: &'a str,
    pub matched: PathMatch,
}

impl ExecPath {
    pub fn is_empty(&self) -> bool {
        match self {
            ExecPath::Single(path) => path.trim().is_empty(),
            ExecPath::PerArch(variants) => variants.is_empty(),
        }
    }

    /// Picks the build for `arch`: exact tag, then the x86_64 build, then
    /// whatever was declared first. `None` only for an empty table.
    pub fn resolve(&self, arch: ArchTag) -> Option<ResolvedPath<'_>> {
        let variants = match self {
            ExecPath::Single(path) => {
                return Some(ResolvedPath {
                    path,
                    matched: PathMatch::Verbatim,
                })
            }
            ExecPath::PerArch(variants) => variants,
        };
        let lookup = |tag: ArchTag| {
            variants
                .iter()
                .find(|(candidate, _)| *candidate == tag)
                .map(|(_, path)| path.as_str())
        };
        if let Some(path) = lookup(arch) {
            return Some(ResolvedPath {
                path,
                matched: PathMatch::Exact,
            });
        }
        if let Some(path) = lookup(ArchTag::X86_64) {
            return Some(ResolvedPath {
                path,
                matched: PathMatch::X86_64Fallback,
            });
        }
        variants.first().map(|(_, path)| ResolvedPath {
            path,
            matched: PathMatch::FirstDeclared,
        })
    }
}

impl<'de> Deserialize<'de> for ExecPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExecPathVisitor;

        impl<'de> Visitor<'de> for ExecPathVisitor {
            type Value = ExecPath;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a path string or a map of architecture tags to paths")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ExecPath, E> {
                Ok(ExecPath::Single(value.to_owned()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<ExecPath, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut variants: Vec<(ArchTag, String)> = Vec::new();
                while let Some((tag, path)) = map.next_entry::<ArchTag, String>()? {
                    if variants.iter().any(|(seen, _)| *seen == tag) {
                        return Err(de::Error::custom(format!(
                            "architecture {tag} listed twice"
                        )));
                    }
                    variants.push((tag, path));
                }
                Ok(ExecPath::PerArch(variants))
            }
        }

        deserializer.deserialize_any(ExecPathVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "main": {
            "title": "Diagnostics",
            "parent": null,
            "items": [
                {"id": 1, "type": "submenu", "label": "GPU", "submenu": "gpu"},
                {"id": 2, "type": "executable", "label": "Memtest",
                 "path": {"ARM64": "bin/arm/memtest", "X86_64": "bin/x64/memtest"}}
            ]
        },
        "gpu": {
            "title": "GPU",
            "parent": "main",
            "items": [
                {"id": 1, "type": "executable", "label": "FurMark", "path": "furmark", "args": ["--demo"]},
                {"id": 2, "type": "back", "label": "Back"},
                {"id": 3, "type": "main"}
            ]
        }
    }"#;

    fn per_arch(entries: &[(ArchTag, &str)]) -> ExecPath {
        ExecPath::PerArch(
            entries
                .iter()
                .map(|(tag, path)| (*tag, path.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_sample_tree() {
        let tree = MenuTree::from_json(SAMPLE).unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree.has_root());

        let main = tree.get("main").unwrap();
        assert_eq!(main.id, "main");
        assert_eq!(main.display_title(), "Diagnostics");
        assert!(matches!(
            &main.item(1).unwrap().kind,
            ItemKind::Submenu { submenu } if submenu == "gpu"
        ));

        let gpu = tree.get("gpu").unwrap();
        assert_eq!(gpu.parent.as_deref(), Some("main"));
        match &gpu.item(1).unwrap().kind {
            ItemKind::Executable { path, args } => {
                assert_eq!(path, &ExecPath::Single("furmark".into()));
                assert_eq!(args, &vec!["--demo".to_string()]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(matches!(gpu.item(2).unwrap().kind, ItemKind::Back));
        assert_eq!(gpu.item(3).unwrap().display_label(), "Main menu");
        assert!(gpu.item(4).is_none());
        assert!(tree.problems().is_empty());
    }

    #[test]
    fn test_arch_table_keeps_declaration_order() {
        let tree = MenuTree::from_json(SAMPLE).unwrap();
        match &tree.get("main").unwrap().item(2).unwrap().kind {
            ItemKind::Executable { path, .. } => assert_eq!(
                path,
                &per_arch(&[
                    (ArchTag::Arm64, "bin/arm/memtest"),
                    (ArchTag::X86_64, "bin/x64/memtest")
                ])
            ),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let err = MenuTree::from_json(r#"{"main": {"items": [{"id": 1, "type": "submenu"}]}}"#);
        assert!(err.is_err());
        let err = MenuTree::from_json(r#"{"main": {"items": [{"id": 1, "type": "launch"}]}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_duplicate_arch_key_is_rejected() {
        let doc = r#"{"main": {"items": [{"id": 1, "type": "executable",
            "path": {"X86": "a", "X86": "b"}}]}}"#;
        assert!(MenuTree::from_json(doc).is_err());
    }

    #[test]
    fn test_resolve_exact_match() {
        let path = per_arch(&[(ArchTag::Arm64, "a"), (ArchTag::X86_64, "b")]);
        let resolved = path.resolve(ArchTag::Arm64).unwrap();
        assert_eq!(resolved.path, "a");
        assert_eq!(resolved.matched, PathMatch::Exact);
    }

    #[test]
    fn test_resolve_falls_back_to_x86_64() {
        let path = per_arch(&[(ArchTag::Arm64, "a"), (ArchTag::X86_64, "b")]);
        let resolved = path.resolve(ArchTag::X86).unwrap();
        assert_eq!(resolved.path, "b");
        assert_eq!(resolved.matched, PathMatch::X86_64Fallback);
    }

    #[test]
    fn test_resolve_falls_back_to_first_declared() {
        let path = per_arch(&[(ArchTag::Arm64, "a")]);
        let resolved = path.resolve(ArchTag::X86_64).unwrap();
        assert_eq!(resolved.path, "a");
        assert_eq!(resolved.matched, PathMatch::FirstDeclared);
    }

    #[test]
    fn test_resolve_single_path_is_verbatim() {
        let path = ExecPath::Single("tools/run.sh".into());
        let resolved = path.resolve(ArchTag::Unknown).unwrap();
        assert_eq!(resolved.path, "tools/run.sh");
        assert_eq!(resolved.matched, PathMatch::Verbatim);
        assert!(per_arch(&[]).resolve(ArchTag::X86).is_none());
    }

    #[test]
    fn test_problems_are_reported_not_fatal() {
        let doc = r#"{
            "main": {"items": [
                {"id": 1, "type": "submenu", "label": "Storage", "submenu": "storage"},
                {"id": 1, "type": "back"},
                {"id": 2, "type": "executable", "path": {}}
            ]},
            "orphan": {"parent": "nowhere", "items": []}
        }"#;
        let tree = MenuTree::from_json(doc).unwrap();
        let problems = tree.problems();
        assert_eq!(problems.len(), 4, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("missing menu 'storage'")));
        assert!(problems.iter().any(|p| p.contains("more than one item with id 1")));
        assert!(problems.iter().any(|p| p.contains("no executable path")));
        assert!(problems.iter().any(|p| p.contains("unknown parent 'nowhere'")));
    }
}
