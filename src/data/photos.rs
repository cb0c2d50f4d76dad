/// Ordered list of opaque image identifiers supplied by the host.
///
/// The core never loads images; it only needs the length (to bind ornaments)
/// and the identifier behind the selected index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoList {
    ids: Vec<String>,
}

impl PhotoList {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Placeholder identifiers, for hosts that only report a count
    pub fn with_count(count: usize) -> Self {
        Self {
            ids: (0..count).map(|i| format!("photo-{}", i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(|s| s.as_str())
    }

    /// Photo bound to ornament `slot`; None when the list is empty
    pub fn binding(&self, slot: usize) -> Option<usize> {
        if self.ids.is_empty() {
            None
        } else {
            Some(slot % self.ids.len())
        }
    }
}
