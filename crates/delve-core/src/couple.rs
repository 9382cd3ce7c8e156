//! Unordered containers of one or two distinct elements.

use crate::error::CoupleError;

/// One or two distinct elements, unordered.
///
/// Used for "the square(s) touching this border". A couple never becomes
/// empty and never holds the same element twice.
///
/// # Examples
///
/// ```
/// use delve_core::Couple;
///
/// let mut c = Couple::new(1u32);
/// c.add(2).unwrap();
/// assert_eq!(c.partner(1), Some(2));
/// assert!(c.add(3).is_err());
/// c.delete(1).unwrap();
/// assert_eq!(c.any(), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Couple<T> {
    first: T,
    second: Option<T>,
}

impl<T: Copy + Eq> Couple<T> {
    /// A couple holding only `element`.
    pub fn new(element: T) -> Self {
        Self {
            first: element,
            second: None,
        }
    }

    /// A couple holding two distinct elements.
    pub fn pair(a: T, b: T) -> Result<Self, CoupleError> {
        if a == b {
            return Err(CoupleError::DuplicateElement);
        }
        Ok(Self {
            first: a,
            second: Some(b),
        })
    }

    /// Number of elements, 1 or 2.
    pub fn len(&self) -> usize {
        if self.second.is_some() {
            2
        } else {
            1
        }
    }

    /// Always `false`: a couple holds at least one element.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the couple holds two elements.
    pub fn is_pair(&self) -> bool {
        self.second.is_some()
    }

    /// Whether `element` is a member.
    pub fn contains(&self, element: T) -> bool {
        self.first == element || self.second == Some(element)
    }

    /// Some member of the couple.
    pub fn any(&self) -> T {
        self.first
    }

    /// The other member, if `element` is a member and the couple is a pair.
    pub fn partner(&self, element: T) -> Option<T> {
        match self.second {
            Some(second) if self.first == element => Some(second),
            Some(second) if second == element => Some(self.first),
            _ => None,
        }
    }

    /// Add a second element.
    pub fn add(&mut self, element: T) -> Result<(), CoupleError> {
        if self.contains(element) {
            return Err(CoupleError::DuplicateElement);
        }
        if self.second.is_some() {
            return Err(CoupleError::Full);
        }
        self.second = Some(element);
        Ok(())
    }

    /// Remove `element`, leaving its partner.
    pub fn delete(&mut self, element: T) -> Result<(), CoupleError> {
        if !self.contains(element) {
            return Err(CoupleError::NotMember);
        }
        match self.second.take() {
            None => Err(CoupleError::LastElement),
            Some(second) => {
                if self.first == element {
                    self.first = second;
                }
                Ok(())
            }
        }
    }

    /// Iterate over the members.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::once(self.first).chain(self.second)
    }
}

impl<T: Copy + Eq> PartialEq for Couple<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|e| other.contains(e))
    }
}

impl<T: Copy + Eq> Eq for Couple<T> {}
