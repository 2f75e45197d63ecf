//! ARIA Support
//!
//! Roles, attribute names and state values written by the widgets.

use std::str::FromStr;

use serde::Deserialize;

use crate::A11yError;

/// Attribute names
pub mod attr {
    pub const ARIA_CHECKED: &str = "aria-checked";
    pub const ARIA_CONTROLS: &str = "aria-controls";
    pub const ARIA_DESCRIBEDBY: &str = "aria-describedby";
    pub const ARIA_EXPANDED: &str = "aria-expanded";
    pub const ARIA_HASPOPUP: &str = "aria-haspopup";
    pub const ARIA_LABEL: &str = "aria-label";
    pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
    pub const ARIA_ORIENTATION: &str = "aria-orientation";
    pub const ARIA_PRESSED: &str = "aria-pressed";
    pub const ARIA_SELECTED: &str = "aria-selected";
    pub const ARIA_VALUEMAX: &str = "aria-valuemax";
    pub const ARIA_VALUEMIN: &str = "aria-valuemin";
    pub const ARIA_VALUENOW: &str = "aria-valuenow";
    pub const DATA_CONTROLS: &str = "data-controls";
    pub const DATA_DISABLED: &str = "data-disabled";
    pub const DATA_HIGHLIGHTED: &str = "data-highlighted";
    pub const DATA_STATE: &str = "data-state";
    pub const DATA_VALUE: &str = "data-value";
    pub const HIDDEN: &str = "hidden";
    pub const ID: &str = "id";
    pub const OPEN: &str = "open";
    pub const TABINDEX: &str = "tabindex";
}

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    AlertDialog,
    Button,
    Combobox,
    Dialog,
    Group,
    Listbox,
    Menu,
    MenuBar,
    MenuItem,
    Option,
    Region,
    Slider,
    Switch,
    Tab,
    TabList,
    TabPanel,
    Toolbar,
    ToolTip,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "alertdialog" => Self::AlertDialog,
            "button" => Self::Button,
            "combobox" => Self::Combobox,
            "dialog" => Self::Dialog,
            "group" => Self::Group,
            "listbox" => Self::Listbox,
            "menu" => Self::Menu,
            "menubar" => Self::MenuBar,
            "menuitem" => Self::MenuItem,
            "option" => Self::Option,
            "region" => Self::Region,
            "slider" => Self::Slider,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "toolbar" => Self::Toolbar,
            "tooltip" => Self::ToolTip,
            _ => return None,
        })
    }

    /// Role attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlertDialog => "alertdialog",
            Self::Button => "button",
            Self::Combobox => "combobox",
            Self::Dialog => "dialog",
            Self::Group => "group",
            Self::Listbox => "listbox",
            Self::Menu => "menu",
            Self::MenuBar => "menubar",
            Self::MenuItem => "menuitem",
            Self::Option => "option",
            Self::Region => "region",
            Self::Slider => "slider",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::Toolbar => "toolbar",
            Self::ToolTip => "tooltip",
        }
    }

    /// Attribute selector matching this role, e.g. `[role="tab"]`
    pub fn selector(&self) -> String {
        format!(r#"[role="{}"]"#, self.as_str())
    }
}

/// `data-state` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    Open,
    Closed,
    Checked,
    Unchecked,
}

impl DataState {
    /// `open` or `closed`
    pub fn open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    /// `checked` or `unchecked`
    pub fn checked(checked: bool) -> Self {
        if checked { Self::Checked } else { Self::Unchecked }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "checked" => Some(Self::Checked),
            "unchecked" => Some(Self::Unchecked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Checked => "checked",
            Self::Unchecked => "unchecked",
        }
    }
}

/// Layout axis of a composite widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// `aria-orientation` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(A11yError::InvalidOrientation(other.to_string())),
        }
    }
}

/// Text direction (`dir`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// `dir` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl FromStr for TextDirection {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            other => Err(A11yError::InvalidDirection(other.to_string())),
        }
    }
}
