//! Label table populated by the assembler's first pass.

/// Insertion-ordered mapping from label name to instruction address.
///
/// Lookups scan linearly and return the first match; the table is small
/// enough that nothing fancier pays for itself.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<(String, u32)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a label entry.
    pub fn insert(&mut self, name: &str, address: u32) {
        self.entries.push((name.to_owned(), address));
    }

    /// Returns the address of the first entry named `name`.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(label, _)| label == name)
            .map(|(_, address)| *address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
