//! Scenario tests for akit-widgets
//!
//! Widgets attached to parsed markup and driven through host input.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use akit_dom::{Document, Key, NodeId};
use akit_widgets::{
    Accordion, AccordionOptions, Behavior, Menu, MenuOptions, Menubar, MenubarOptions, Tabs,
    TabsOptions, ToggleGroup, ToggleGroupOptions,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn is_shown(doc: &Document, node: NodeId) -> bool {
    !doc.tree.has_attribute(node, "hidden")
}

// ============================================================================
// ACCORDION
// ============================================================================

const ACCORDION: &str = r#"
    <div class="accordion">
      <div><h3><button>Shipping</button></h3><div role="region">Ships in 2 days</div></div>
      <div><h3><button>Returns</button></h3><div role="region">30 days</div></div>
      <div><h3><button>Warranty</button></h3><div role="region">One year</div></div>
      <div><h3><button>Support</button></h3><div role="region">Email us</div></div>
    </div>"#;

#[test]
fn test_accordion_click_opens_one_then_none() -> anyhow::Result<()> {
    init_tracing();
    let (mut doc, root) = akit_html::parse_fragment(ACCORDION)?;
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reported);
    let accordion = Accordion::attach(
        &mut doc,
        root,
        AccordionOptions::default().on_change(move |open| sink.borrow_mut().push(open)),
    )?;
    let triggers = doc.tree.query_selector_all(root, "button")?;
    let regions = doc.tree.query_selector_all(root, r#"[role="region"]"#)?;

    doc.click(triggers[2]);
    assert_eq!(accordion.open_item(), Some(2));
    for (index, &region) in regions.iter().enumerate() {
        assert_eq!(is_shown(&doc, region), index == 2, "region {index}");
    }
    assert_eq!(doc.tree.get_attribute(triggers[2], "aria-expanded"), Some("true"));
    assert_eq!(doc.tree.get_attribute(triggers[0], "aria-expanded"), Some("false"));

    doc.click(triggers[2]);
    assert_eq!(accordion.open_item(), None);
    assert!(regions.iter().all(|&r| !is_shown(&doc, r)));
    assert_eq!(*reported.borrow(), vec![Some(2), None]);
    Ok(())
}

#[test]
fn test_accordion_arrows_move_focus_between_triggers() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(ACCORDION)?;
    let _accordion = Accordion::attach(&mut doc, root, AccordionOptions::default())?;
    let triggers = doc.tree.query_selector_all(root, "button")?;

    doc.focus(triggers[0]);
    doc.key_up(Key::ArrowUp);
    assert_eq!(doc.active_element(), Some(triggers[3]));
    doc.key_up(Key::ArrowDown);
    assert_eq!(doc.active_element(), Some(triggers[0]));
    Ok(())
}

// ============================================================================
// TABS
// ============================================================================

const TABS: &str = r#"
    <div class="tabs">
      <div role="tablist">
        <button>Overview</button>
        <button>Specs</button>
        <button>Reviews</button>
      </div>
      <div role="tabpanel">overview</div>
      <div role="tabpanel">specs</div>
      <div role="tabpanel">reviews</div>
    </div>"#;

#[test]
fn test_tabs_arrow_right_twice() -> anyhow::Result<()> {
    init_tracing();
    let (mut doc, root) = akit_html::parse_fragment(TABS)?;
    let tabs = Tabs::attach(&mut doc, root, TabsOptions::default())?;
    let tablist = doc.tree.query_selector(root, r#"[role="tablist"]"#)?.expect("tablist");
    let buttons = doc.tree.query_selector_all(root, "button")?;
    let panels = doc.tree.query_selector_all(root, r#"[role="tabpanel"]"#)?;

    doc.focus(tablist);
    assert_eq!(doc.active_element(), Some(buttons[0]));
    doc.key_up(Key::ArrowRight);
    doc.key_up(Key::ArrowRight);

    assert_eq!(tabs.selected_index(), 2);
    assert_eq!(tabs.value(), "2");
    assert_eq!(doc.active_element(), Some(buttons[2]));
    assert!(is_shown(&doc, panels[2]));
    assert!(!is_shown(&doc, panels[0]));
    assert!(!is_shown(&doc, panels[1]));
    assert_eq!(doc.tree.get_attribute(buttons[2], "aria-selected"), Some("true"));
    assert_eq!(doc.tree.get_attribute(buttons[2], "tabindex"), Some("0"));
    Ok(())
}

#[test]
fn test_tabs_tab_key_moves_to_panel() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(TABS)?;
    let tabs = Tabs::attach(&mut doc, root, TabsOptions::default())?;
    let tablist = doc.tree.query_selector(root, r#"[role="tablist"]"#)?.expect("tablist");
    let buttons = doc.tree.query_selector_all(root, "button")?;
    let panels = doc.tree.query_selector_all(root, r#"[role="tabpanel"]"#)?;

    doc.focus(buttons[0]);
    assert!(tabs.is_armed());
    doc.press_tab();

    assert!(!tabs.is_armed());
    assert_eq!(doc.active_element(), Some(panels[0]));
    assert_eq!(doc.tree.get_attribute(tablist, "tabindex"), Some("0"));
    Ok(())
}

// ============================================================================
// MENU
// ============================================================================

const MENU: &str = r#"
    <ul role="menu">
      <li><button role="menuitem">Cut</button></li>
      <li><button role="menuitem">Copy</button></li>
      <li><button role="menuitem">Paste</button></li>
    </ul>"#;

#[test]
fn test_menu_escape_requests_close_once() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(MENU)?;
    let closes = Rc::new(Cell::new(0));
    let sink = Rc::clone(&closes);
    let menu = Menu::attach(
        &mut doc,
        root,
        MenuOptions::default()
            .enabled(true)
            .request_close(move |_| sink.set(sink.get() + 1)),
    )?;
    let items = doc.tree.element_children(root);

    doc.key_up(Key::ArrowDown);
    doc.key_up(Key::ArrowDown);
    assert_eq!(menu.highlighted(), Some(1));

    doc.key_down(Key::Escape);
    doc.key_down(Key::Escape);
    assert_eq!(closes.get(), 1);
    assert_eq!(menu.highlighted(), None);
    assert!(items.iter().all(|&i| !doc.tree.has_attribute(i, "data-highlighted")));
    Ok(())
}

#[test]
fn test_menu_typeahead() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(MENU)?;
    let menu = Menu::attach(&mut doc, root, MenuOptions::default().enabled(true))?;

    doc.key_up(Key::Character('p'));
    assert_eq!(menu.highlighted(), Some(2));
    doc.key_up(Key::Character('z'));
    assert_eq!(menu.highlighted(), Some(2));
    Ok(())
}

// ============================================================================
// MENUBAR WITH MENUS
// ============================================================================

const MENUBAR: &str = r#"
    <div role="menubar">
      <div>
        <button role="menuitem">File</button>
        <ul role="menu"><li><button>New</button></li><li><button>Open</button></li></ul>
      </div>
      <div>
        <button role="menuitem">Edit</button>
        <ul role="menu"><li><button>Undo</button></li><li><button>Redo</button></li></ul>
      </div>
    </div>"#;

fn hooked_menu(doc: &mut Document, node: NodeId) -> anyhow::Result<Menu> {
    let options = MenuOptions::default()
        .request_open(move |doc| {
            let _ = doc.tree.set_attribute(node, "data-open", "true");
        })
        .request_close(move |doc| {
            let _ = doc.tree.remove_attribute(node, "data-open");
        });
    Ok(Menu::attach(doc, node, options)?)
}

#[test]
fn test_menubar_hands_open_menu_to_next_item() -> anyhow::Result<()> {
    init_tracing();
    let (mut doc, root) = akit_html::parse_fragment(MENUBAR)?;
    let menubar = Menubar::attach(&mut doc, root, MenubarOptions::default())?;
    let menus = doc.tree.query_selector_all(root, "ul")?;
    let file = hooked_menu(&mut doc, menus[0])?;
    let edit = hooked_menu(&mut doc, menus[1])?;
    let items = doc.tree.query_selector_all(root, r#"[role="menuitem"]"#)?;

    doc.tree.set_attribute(menus[0], "data-open", "true")?;
    file.set_enabled(true);
    edit.set_enabled(true);

    doc.focus(items[0]);
    doc.key_up(Key::ArrowRight);

    assert_eq!(menubar.highlighted(), Some(1));
    assert_eq!(doc.active_element(), Some(items[1]));
    assert!(!doc.tree.has_attribute(menus[0], "data-open"));
    assert_eq!(doc.tree.get_attribute(menus[1], "data-open"), Some("true"));
    Ok(())
}

#[test]
fn test_menubar_without_open_menu_sends_nothing() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(MENUBAR)?;
    let _menubar = Menubar::attach(&mut doc, root, MenubarOptions::default())?;
    let menus = doc.tree.query_selector_all(root, "ul")?;
    let _file = hooked_menu(&mut doc, menus[0])?;
    let _edit = hooked_menu(&mut doc, menus[1])?;
    let items = doc.tree.query_selector_all(root, r#"[role="menuitem"]"#)?;

    doc.focus(items[0]);
    doc.key_up(Key::ArrowRight);

    assert!(menus.iter().all(|&m| !doc.tree.has_attribute(m, "data-open")));
    Ok(())
}

// ============================================================================
// TOGGLE GROUP
// ============================================================================

const TOGGLE_GROUP: &str = r#"
    <div role="group">
      <button aria-pressed="false">Left</button>
      <button aria-pressed="true">Center</button>
      <button aria-pressed="false">Right</button>
    </div>"#;

#[test]
fn test_toggle_group_tab_disarms_arrows() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(TOGGLE_GROUP)?;
    let group = ToggleGroup::attach(&mut doc, root, ToggleGroupOptions::default())?;
    let buttons = doc.tree.query_selector_all(root, "button")?;

    doc.focus(root);
    doc.key_up(Key::ArrowRight);
    assert_eq!(group.selected(), Some(1));
    assert!(group.is_armed());

    doc.key_down(Key::Tab);
    assert!(!group.is_armed());
    assert_eq!(doc.tree.get_attribute(root, "tabindex"), Some("0"));

    doc.key_up(Key::ArrowRight);
    assert_eq!(group.selected(), Some(1));
    assert_eq!(doc.tree.get_attribute(buttons[1], "tabindex"), Some("0"));
    assert_eq!(doc.tree.get_attribute(buttons[2], "tabindex"), Some("-1"));
    Ok(())
}

// ============================================================================
// TEARDOWN
// ============================================================================

#[test]
fn test_destroy_removes_every_listener() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(TABS)?;
    let baseline = doc.listener_count();
    let mut tabs = Tabs::attach(&mut doc, root, TabsOptions::default())?;
    assert!(doc.listener_count() > baseline);
    assert!(tabs.is_attached());

    tabs.destroy();
    tabs.destroy();
    assert_eq!(doc.listener_count(), baseline);
    assert!(!tabs.is_attached());

    let buttons = doc.tree.query_selector_all(root, "button")?;
    doc.click(buttons[2]);
    assert_eq!(tabs.selected_index(), 0);
    Ok(())
}

#[test]
fn test_drop_removes_listeners() -> anyhow::Result<()> {
    let (mut doc, root) = akit_html::parse_fragment(TOGGLE_GROUP)?;
    {
        let _group = ToggleGroup::attach(&mut doc, root, ToggleGroupOptions::default())?;
        assert!(doc.listener_count() > 0);
    }
    assert_eq!(doc.listener_count(), 0);
    Ok(())
}
