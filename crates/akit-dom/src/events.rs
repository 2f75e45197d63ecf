//! DOM Events
//!
//! Event types, key values and the event object handed to listeners.

use std::fmt;

use crate::NodeId;

/// Where a listener is registered and where an event is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global window (end of every bubbling path)
    Window,
    /// A node in the document
    Node(NodeId),
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl EventTarget {
    /// Node id, if the target is a node
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Window => None,
        }
    }
}

/// Event types understood by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerEnter,
    PointerLeave,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    /// `<dialog>` close
    Close,
    /// Named custom event (never bubbles)
    Custom(String),
}

impl EventType {
    /// Parse from the DOM event name
    pub fn parse(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "pointerdown" => Self::PointerDown,
            "pointerup" => Self::PointerUp,
            "pointermove" => Self::PointerMove,
            "pointerenter" => Self::PointerEnter,
            "pointerleave" => Self::PointerLeave,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "close" => Self::Close,
            other => Self::Custom(other.to_string()),
        }
    }

    /// DOM event name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerMove => "pointermove",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Close => "close",
            Self::Custom(name) => name,
        }
    }

    /// Whether events of this type bubble to ancestors and the window
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            Self::Focus
                | Self::Blur
                | Self::PointerEnter
                | Self::PointerLeave
                | Self::Close
                | Self::Custom(_)
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Printable character
    Character(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Enter,
    Tab,
    Escape,
    Backspace,
    Space,

    // Modifiers
    Shift,
    Control,
    Alt,
    Meta,

    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "Backspace" => Self::Backspace,
            "Shift" => Self::Shift,
            "Control" => Self::Control,
            "Alt" => Self::Alt,
            "Meta" => Self::Meta,
            " " => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// `KeyboardEvent.key` string
    pub fn as_key_string(&self) -> String {
        match self {
            Self::Character(c) => c.to_string(),
            Self::Space => " ".to_string(),
            Self::Unidentified(s) => s.clone(),
            other => format!("{other:?}"),
        }
    }

    /// Printable character, if any
    pub fn char(&self) -> Option<char> {
        match self {
            Self::Character(c) => Some(*c),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    /// Only shift held
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Event object passed to listeners
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Original target
    pub target: EventTarget,
    /// Target whose listeners are currently running
    pub current_target: EventTarget,
    /// Key for keyboard events
    pub key: Option<Key>,
    pub modifiers: KeyModifiers,
    pub client_x: f64,
    pub client_y: f64,
    /// Payload of custom events
    pub detail: Option<String>,
    /// Other node involved in focus transitions
    pub related_target: Option<NodeId>,
    pub bubbles: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event aimed at `target`
    pub fn new(event_type: EventType, target: impl Into<EventTarget>) -> Self {
        let target = target.into();
        Self {
            bubbles: event_type.bubbles(),
            event_type,
            target,
            current_target: target,
            key: None,
            modifiers: KeyModifiers::default(),
            client_x: 0.0,
            client_y: 0.0,
            detail: None,
            related_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Keyboard event
    pub fn keyboard(
        event_type: EventType,
        target: impl Into<EventTarget>,
        key: Key,
        modifiers: KeyModifiers,
    ) -> Self {
        let mut event = Self::new(event_type, target);
        event.key = Some(key);
        event.modifiers = modifiers;
        event
    }

    /// Pointer event at client coordinates
    pub fn pointer(event_type: EventType, target: impl Into<EventTarget>, x: f64, y: f64) -> Self {
        let mut event = Self::new(event_type, target);
        event.client_x = x;
        event.client_y = y;
        event
    }

    /// Custom event carrying a string detail
    pub fn custom(name: &str, target: impl Into<EventTarget>, detail: Option<&str>) -> Self {
        let mut event = Self::new(EventType::Custom(name.to_string()), target);
        event.detail = detail.map(str::to_string);
        event
    }

    /// Target node, if the event was aimed at a node
    pub fn target_node(&self) -> Option<NodeId> {
        self.target.node()
    }

    /// Check the key of a keyboard event
    pub fn is_key(&self, key: &Key) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Prevent default
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
