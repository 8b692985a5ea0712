//! Profile document internals
// (c) 2024 Ross Younger

use std::fmt;
use std::fs;
use std::ops::{Bound, RangeBounds};
use std::path::Path;

use super::{Element, ProfileError};

/// An OpenVPN client profile: an ordered sequence of [`Element`]s with
/// map-like access by name.
///
/// Element order is the on-disk line order and is preserved by every
/// operation. At most one parameter or inline block may carry a given name;
/// comments and blank lines may repeat freely.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Profile {
    elements: Vec<Element>,
}

impl Profile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole source text.
    ///
    /// `source` is used in diagnostics only; pass the file name, or
    /// something like `<string>` for in-memory text.
    pub fn parse(text: &str, source: &str) -> Result<Self, ProfileError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut profile = Self::new();
        let mut consumed = 0;
        while consumed < lines.len() {
            let remaining = &lines[consumed..];
            let mut hit = None;
            for reader in Element::READERS {
                if let Some(found) = reader(remaining)? {
                    hit = Some(found);
                    break;
                }
            }
            let Some((element, lines_read)) = hit else {
                return Err(ProfileError::UnrecognizedLine {
                    line: remaining[0].to_string(),
                    origin: source.to_string(),
                    line_number: consumed + 1,
                });
            };
            profile.push(element)?;
            consumed += lines_read;
        }
        Ok(profile)
    }

    /// Reads and parses a profile from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text, &path.to_string_lossy())
    }

    /// Serializes this profile to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProfileError> {
        Ok(fs::write(path, self.to_string())?)
    }

    /// Builds a profile from parts, enforcing the duplicate-name invariant.
    pub fn from_elements<I: IntoIterator<Item = Element>>(
        elements: I,
    ) -> Result<Self, ProfileError> {
        let mut profile = Self::new();
        for element in elements {
            profile.push(element)?;
        }
        Ok(profile)
    }

    /// The number of elements (not lines) in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document has no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements in document order. Positional access goes through this
    /// slice.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Finds the first element with the given name.
    ///
    /// Comments, parameters and inline blocks share one name space here;
    /// see [`Element::name`].
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == Some(name))
    }

    /// Whether any element has the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The position of the first element with the given name within `range`.
    ///
    /// The returned index is absolute (into [`Profile::elements`]), not
    /// relative to the range start.
    #[must_use]
    pub fn position<R: RangeBounds<usize>>(&self, name: &str, range: R) -> Option<usize> {
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.elements.len(),
        };
        let end = end.min(self.elements.len());
        if start >= end {
            return None;
        }
        self.elements[start..end]
            .iter()
            .position(|e| e.name() == Some(name))
            .map(|offset| start + offset)
    }

    /// Splices an element in at `index`, shifting later elements along.
    ///
    /// Fails with [`ProfileError::Duplicate`] if the element is a parameter
    /// or inline block and one with the same name is already present
    /// anywhere in the document. Comments and blank lines always insert.
    ///
    /// # Panics
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, element: Element) -> Result<(), ProfileError> {
        match &element {
            Element::Param { keyword, .. } if self.has_directive(keyword) => {
                return Err(ProfileError::Duplicate(keyword.clone()));
            }
            Element::Inline { tag, .. } if self.has_directive(tag) => {
                return Err(ProfileError::Duplicate(tag.clone()));
            }
            _ => (),
        }
        self.elements.insert(index, element);
        Ok(())
    }

    /// Appends an element, with the same duplicate check as
    /// [`Profile::insert`].
    pub fn push(&mut self, element: Element) -> Result<(), ProfileError> {
        self.insert(self.elements.len(), element)
    }

    /// Removes and returns the first element with the given name, or `None`
    /// if there is nothing to remove.
    pub fn remove(&mut self, name: &str) -> Option<Element> {
        let index = self.position(name, ..)?;
        Some(self.elements.remove(index))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range, like [`Vec::remove`].
    pub fn remove_at(&mut self, index: usize) -> Element {
        self.elements.remove(index)
    }

    /// The last position before any inline block: the index of the first
    /// inline element, or the document length if there is none.
    ///
    /// Inline blocks (certificates, keys) conventionally sit at the tail of
    /// a profile; new directives should land before them rather than
    /// interleave with PEM content.
    #[must_use]
    pub fn last_before_inline(&self) -> usize {
        self.elements
            .iter()
            .position(|e| matches!(e, Element::Inline { .. }))
            .unwrap_or(self.elements.len())
    }

    /// Whether a parameter or inline block with this name exists. Comments
    /// share the name space for lookup but never collide on insert.
    fn has_directive(&self, name: &str) -> bool {
        self.elements.iter().any(|e| match e {
            Element::Param { keyword, .. } => keyword == name,
            Element::Inline { tag, .. } => tag == name,
            Element::Blank | Element::Comment(_) => false,
        })
    }
}

impl fmt::Display for Profile {
    /// Renders the whole document exactly as it should appear on disk.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////
