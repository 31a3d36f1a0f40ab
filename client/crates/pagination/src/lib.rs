//! Offset pagination primitives for gallery list queries.
//!
//! A [`PageRequest`] carries a validated `limit`/`offset` pair that list
//! endpoints accept, and a [`Page`] wraps one slice of results together with
//! the total the server reports for the whole collection.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 0).expect("valid request");
//! let page = Page::new(vec!["a", "b"], 5);
//! assert!(page.has_more(request));
//! assert_eq!(request.next().offset(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of items requested when callers do not choose a limit.
pub const DEFAULT_LIMIT: u32 = 50;
/// Largest page a caller may request.
pub const MAX_LIMIT: u32 = 100;
/// Largest offset representable by the `int32` wire field.
pub const MAX_OFFSET: u32 = 2_147_483_647;

/// Errors raised when building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Limit was zero.
    #[error("page limit must be at least 1")]
    ZeroLimit,
    /// Limit exceeded [`MAX_LIMIT`].
    #[error("page limit must be at most {max}")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: u32,
    },
    /// Offset exceeded [`MAX_OFFSET`].
    #[error("page offset must be at most {max}")]
    OffsetTooLarge {
        /// Largest accepted offset.
        max: u32,
    },
}

/// Validated `limit`/`offset` pair for list queries.
///
/// ## Invariants
/// - `limit` is within `1..=MAX_LIMIT`.
/// - `offset` is at most [`MAX_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Build a request from raw values.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `limit` is zero or above
    /// [`MAX_LIMIT`], or when `offset` exceeds [`MAX_OFFSET`].
    pub const fn new(limit: u32, offset: u32) -> Result<Self, PageRequestError> {
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        if offset > MAX_OFFSET {
            return Err(PageRequestError::OffsetTooLarge { max: MAX_OFFSET });
        }
        Ok(Self { limit, offset })
    }

    /// First page using [`DEFAULT_LIMIT`].
    #[must_use]
    pub const fn first() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Maximum number of items requested.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    /// Request for the page directly after this one, saturating at
    /// [`MAX_OFFSET`].
    #[must_use]
    pub const fn next(self) -> Self {
        let advanced = self.offset.saturating_add(self.limit);
        let offset = if advanced > MAX_OFFSET {
            MAX_OFFSET
        } else {
            advanced
        };
        Self {
            limit: self.limit,
            offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PageRequestDto {
    limit: u32,
    offset: u32,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            limit: value.limit,
            offset: value.offset,
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.limit, value.offset)
    }
}

/// One page of results plus the collection total reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u32,
}

impl<T> Page<T> {
    /// Wrap a slice of results.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u32) -> Self {
        Self { items, total }
    }

    /// Empty page with a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of items in the whole collection.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether items remain beyond this page for the given request.
    #[must_use]
    pub fn has_more(&self, request: PageRequest) -> bool {
        let seen = u64::from(request.offset())
            .saturating_add(u64::try_from(self.items.len()).unwrap_or(u64::MAX));
        seen < u64::from(self.total)
    }

    /// Transform every item, keeping the total.
    #[must_use]
    pub fn map<U, F>(self, transform: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
