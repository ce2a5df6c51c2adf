use indexmap::IndexMap;

/// Label to address map. Populated during pass 1, read-only afterwards.
#[derive(Debug, Default)]
pub struct SymTab(IndexMap<String, u32>);

impl SymTab {
    pub fn new() -> Self {
        SymTab(IndexMap::new())
    }

    /// Insert a label, returning the previous address on redefinition.
    pub fn insert(&mut self, name: &str, addr: u32) -> Option<u32> {
        self.0.insert(name.to_ascii_uppercase(), addr)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.0.iter()
    }
}
