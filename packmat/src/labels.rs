//! Row and column names with reverse lookup

use hashbrown::HashMap;
use packmat_core::validation::{validate_label, validate_label_count};
use packmat_core::{PackError, Result};
use std::sync::Arc;

#[derive(Debug)]
struct LabelIndex {
    names: Vec<String>,
    positions: HashMap<String, u32>,
}

/// Ordered dimension names
///
/// Cheap to clone; clones share the names. Reverse lookup returns the first
/// position of a repeated name.
#[derive(Debug, Clone)]
pub struct LabelSet {
    inner: Arc<LabelIndex>,
}

impl LabelSet {
    /// Validate and index `names`
    pub fn new(names: Vec<String>) -> Result<Self> {
        let len = u32::try_from(names.len()).map_err(|_| PackError::ArraySizeOverflow)?;
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in (0..len).zip(&names) {
            validate_label(name)?;
            positions.entry(name.clone()).or_insert(i);
        }
        Ok(Self {
            inner: Arc::new(LabelIndex { names, positions }),
        })
    }

    /// Collect `len` names from a lookup function
    ///
    /// Returns `None` if the source has no names at all. A source naming only
    /// some of its entries is rejected.
    pub fn collect<'a>(len: u32, mut name: impl FnMut(u32) -> Option<&'a str>) -> Result<Option<Self>> {
        if len == 0 {
            return Ok(None);
        }
        let Some(first) = name(0) else {
            return Ok(None);
        };
        let mut names = Vec::with_capacity(len as usize);
        names.push(first.to_owned());
        for i in 1..len {
            let label = name(i).ok_or(PackError::LabelCountMismatch)?;
            names.push(label.to_owned());
        }
        Self::new(names).map(Some)
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    /// Name at `index`
    pub fn get(&self, index: u32) -> Option<&str> {
        self.inner.names.get(index as usize).map(String::as_str)
    }

    /// Position of `name`
    pub fn position(&self, name: &str) -> Option<u32> {
        self.inner.positions.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.inner.names.clone()
    }

    /// Check that these names cover a dimension of `len` entries
    pub fn check_len(&self, len: u32) -> Result<()> {
        if self.is_empty() {
            return Err(PackError::LabelCountMismatch);
        }
        validate_label_count(self.len(), len)
    }
}

impl PartialEq for LabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.inner.names == other.inner.names
    }
}

impl Eq for LabelSet {}
