use crate::features::world::FestboardWorld;
use cucumber::{given, then, when};
use festboard_core::navigation::{NavItem, NavSubItem, Sidebar};

#[given(expr = "a menu where {string} requires {string} and its child {string} requires {string}")]
async fn given_custom_menu(
    world: &mut FestboardWorld,
    parent: String,
    parent_permission: String,
    child: String,
    child_permission: String,
) {
    let item = NavItem::new(&parent, &format!("/admin/{}", parent.to_lowercase()))
        .requires(&parent_permission)
        .child(
            NavSubItem::new(&child, &format!("/admin/{}", child.to_lowercase()))
                .requires(&child_permission),
        );
    world.menu_source = Some(Sidebar { nav_main: vec![item], projects: Vec::new() });
}

#[given(expr = "the festival menu")]
async fn given_festival_menu(world: &mut FestboardWorld) {
    world.menu_source = Some(Sidebar::festival_default());
}

#[when(expr = "the menu is built")]
async fn when_menu_built(world: &mut FestboardWorld) {
    let source = world.menu_source.as_ref().expect("no menu defined");
    world.sidebar = Some(source.visible_to(world.auth()));
}

fn titles(world: &FestboardWorld) -> Vec<String> {
    let sidebar = world.sidebar.as_ref().expect("menu not built");
    sidebar
        .nav_main
        .iter()
        .flat_map(|item| {
            std::iter::once(item.title.clone()).chain(item.items.iter().map(|s| s.title.clone()))
        })
        .collect()
}

#[then(expr = "the menu is empty")]
async fn then_menu_empty(world: &mut FestboardWorld) {
    assert!(titles(world).is_empty(), "visible: {:?}", titles(world));
}

#[then(expr = "the menu shows {string}")]
async fn then_menu_shows(world: &mut FestboardWorld, title: String) {
    assert!(titles(world).contains(&title), "visible: {:?}", titles(world));
}

#[then(expr = "the menu hides {string}")]
async fn then_menu_hides(world: &mut FestboardWorld, title: String) {
    assert!(!titles(world).contains(&title), "visible: {:?}", titles(world));
}

#[then(expr = "the menu shows only ungated entries")]
async fn then_only_ungated(world: &mut FestboardWorld) {
    let sidebar = world.sidebar.as_ref().expect("menu not built");
    assert!(sidebar.nav_main.is_empty());
    assert!(sidebar.projects.iter().all(|p| p.required_permission.is_none()));
}
