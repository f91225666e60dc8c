//! Zero-based fragment positioning within a document.
//!
//! Provides [`FragmentId`], a type-safe wrapper around `u32` used both as the
//! stable identifier of a fragment and as its position in the assembled
//! document.

use std::num::TryFromIntError;

use derive_more::{Display, From};
use serde::Deserialize;

/// Zero-based ordinal identifying a fragment and its document position.
///
/// # Examples
///
/// ```
/// use folio::FragmentId;
/// let id = FragmentId::new(3);
/// assert_eq!(id.get(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct FragmentId(u32);

impl FragmentId {
    /// Construct an identifier from a `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the first valid fragment identifier.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

impl TryFrom<i64> for FragmentId {
    type Error = TryFromIntError;

    fn try_from(value: i64) -> Result<Self, Self::Error> { u32::try_from(value).map(Self) }
}

impl From<FragmentId> for u32 {
    fn from(value: FragmentId) -> Self { value.0 }
}
