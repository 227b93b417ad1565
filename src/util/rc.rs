use std::{cell::RefCell, rc::Rc};

// For convenience, when creating mutable shared pointers for single-threaded
// use (mostly output handles). Avoids the nested ::new.
pub type RcRefCell<T> = Rc<RefCell<T>>;

// Defined as a namespace, so we can _kind of_ add extra functions for our
// type alias without the linter wanting a snake_case mod name.
pub struct RcRefCellT(());

impl RcRefCellT {
    pub fn new<T>(t: T) -> RcRefCell<T> {
        Rc::new(RefCell::new(t))
    }
}
