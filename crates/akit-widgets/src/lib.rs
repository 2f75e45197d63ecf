//! anatomykit widgets
//!
//! Accessible widget behaviors attached to existing markup. Composite
//! widgets (accordion, tabs, menus, select, toolbars) share one roving
//! focus core in [`nav`]; the rest are small disclosure or value widgets.
//!
//! Every widget is attached with `Widget::attach(&mut doc, node, options)`
//! and stays live until [`Behavior::destroy`] is called or it is dropped.

pub mod behavior;
pub mod callback;
pub mod error;
pub mod nav;
mod roving;

pub mod accordion;
pub mod collapsible;
pub mod dialog;
pub mod menu;
pub mod menubar;
pub mod select;
pub mod slider;
pub mod switch;
pub mod tabs;
pub mod toggle;
pub mod toolbar;
pub mod tooltip;

pub use behavior::Behavior;
pub use callback::{Callback, DocumentHook};
pub use error::{WidgetError, WidgetResult};

pub use accordion::{Accordion, AccordionOptions};
pub use collapsible::{Collapsible, CollapsibleOptions};
pub use dialog::{AlertDialog, Dialog, DialogOptions};
pub use menu::{Menu, MenuOptions, MenuSelectors};
pub use menubar::{Menubar, MenubarOptions, MenubarSelectors};
pub use select::{Select, SelectOptions};
pub use slider::{Slider, SliderOptions};
pub use switch::{Switch, SwitchOptions};
pub use tabs::{Tabs, TabsOptions};
pub use toggle::{Toggle, ToggleGroup, ToggleGroupOptions, ToggleOptions};
pub use toolbar::{Toolbar, ToolbarOptions};
pub use tooltip::{Tooltip, TooltipOptions};
