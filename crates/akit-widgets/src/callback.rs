//! Callbacks
//!
//! Closures supplied through option builders. They are cloned out of
//! widget state before being called, so a callback may freely call back
//! into the widget.

use std::fmt;
use std::rc::Rc;

use akit_dom::Document;

/// Value callback (`on_change`)
pub struct Callback<T>(Rc<dyn Fn(T)>);

impl<T> Callback<T> {
    pub fn new(f: impl Fn(T) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: T) {
        (self.0)(value)
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Callback that may change the document (menu open/close requests)
#[derive(Clone)]
pub struct DocumentHook(Rc<dyn Fn(&mut Document)>);

impl DocumentHook {
    pub fn new(f: impl Fn(&mut Document) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, doc: &mut Document) {
        (self.0)(doc)
    }
}

impl fmt::Debug for DocumentHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DocumentHook")
    }
}

/// Call an optional callback
pub(crate) fn emit<T>(callback: Option<Callback<T>>, value: T) {
    if let Some(callback) = callback {
        callback.call(value);
    }
}
