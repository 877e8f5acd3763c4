use std::collections::HashMap;

use fsm_util::make_type_idx;

make_type_idx!(pub StateId, String);
make_type_idx!(pub SymbolId, String);

/// Handle types that can be issued by an [`Interner`].
pub trait Handle: Copy + Eq {
    fn from_push(names: &mut Vec<String>, name: String) -> Self;
    fn index(self) -> usize;
}

impl Handle for StateId {
    fn from_push(names: &mut Vec<String>, name: String) -> Self {
        StateId::from_push(names, name)
    }

    fn index(self) -> usize {
        StateId::index(self)
    }
}

impl Handle for SymbolId {
    fn from_push(names: &mut Vec<String>, name: String) -> Self {
        SymbolId::from_push(names, name)
    }

    fn index(self) -> usize {
        SymbolId::index(self)
    }
}

// names are issued handles in first-seen order, which is also the order
// the minimizer uses to pick representatives
#[derive(Debug, Clone)]
pub struct Interner<H: Handle> {
    names: Vec<String>,
    lookup: HashMap<String, H>,
}

impl<H: Handle> Interner<H> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn intern(&mut self, name: &str) -> H {
        if let Some(handle) = self.lookup.get(name) {
            return *handle;
        }

        let handle = H::from_push(&mut self.names, name.to_string());
        self.lookup.insert(name.to_string(), handle);
        handle
    }

    pub fn get(&self, name: &str) -> Option<H> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, handle: H) -> &str {
        &self.names[handle.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.lookup.clear();
    }
}

impl<H: Handle> Default for Interner<H> {
    fn default() -> Self {
        Self::new()
    }
}
