//! Lazy iteration over paginated list endpoints.
//!
//! Box pages its collections in two ways. Most newer endpoints use a
//! `marker`/`next_marker` cursor. Folder listings use `offset` and report a
//! `total_count`. [`BoxResourceIterable`] hides the difference behind a
//! [`Stream`].

use std::collections::VecDeque;
use std::marker::PhantomData;

use futures_util::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::connection::BoxApiConnection;
use crate::error::Result;

pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageMode {
    Marker,
    Offset,
}

#[derive(Debug)]
enum Cursor {
    Marker(Option<String>),
    Offset(u64),
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    entries: Vec<T>,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    next_marker: Option<Value>,
}

impl<T> Page<T> {
    fn next_marker(&self) -> Option<String> {
        match &self.next_marker {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// One list endpoint: where it lives, its page size and how it pages.
#[derive(Debug, Clone)]
pub struct BoxResourceIterable<T> {
    api: BoxApiConnection,
    url: Url,
    limit: u64,
    mode: PageMode,
    _entry: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> BoxResourceIterable<T> {
    /// Marker paging. `url` already carries any filters and `fields`.
    pub fn marker(api: &BoxApiConnection, url: Url, limit: u64) -> Self {
        Self { api: api.clone(), url, limit, mode: PageMode::Marker, _entry: PhantomData }
    }

    /// Offset paging, stopping at `total_count`, or at the first empty page
    /// when Box leaves the total out.
    pub fn offset(api: &BoxApiConnection, url: Url, limit: u64) -> Self {
        Self { api: api.clone(), url, limit, mode: PageMode::Offset, _entry: PhantomData }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Entries one at a time, fetching the next page only when the current
    /// one runs out. Every call starts from the first page again.
    pub fn stream(&self) -> impl Stream<Item = Result<T>> + use<T> {
        let state = PageState {
            api: self.api.clone(),
            url: self.url.clone(),
            limit: self.limit,
            buffer: VecDeque::new(),
            cursor: Some(match self.mode {
                PageMode::Marker => Cursor::Marker(None),
                PageMode::Offset => Cursor::Offset(0),
            }),
        };
        stream::try_unfold(state, |mut state| async move {
            let next = state.next_entry().await?;
            Ok(next.map(|entry| (entry, state)))
        })
    }

    /// Drain every page into memory.
    pub async fn collect(&self) -> Result<Vec<T>> {
        self.stream().try_collect().await
    }
}

struct PageState<T> {
    api: BoxApiConnection,
    url: Url,
    limit: u64,
    buffer: VecDeque<T>,
    /// `None` once the last page has been fetched.
    cursor: Option<Cursor>,
}

impl<T: DeserializeOwned> PageState<T> {
    async fn next_entry(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry));
            }
            let Some(cursor) = self.cursor.take() else {
                return Ok(None);
            };
            self.fetch(cursor).await?;
        }
    }

    async fn fetch(&mut self, cursor: Cursor) -> Result<()> {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.limit.to_string());
            match &cursor {
                Cursor::Marker(None) => {}
                Cursor::Marker(Some(marker)) => {
                    query.append_pair("marker", marker);
                }
                Cursor::Offset(offset) => {
                    query.append_pair("offset", &offset.to_string());
                }
            }
        }

        let page: Page<T> = self.api.get(url).await?;
        let fetched = page.entries.len() as u64;
        debug!(count = fetched, total = ?page.total_count, "box page");

        self.cursor = match cursor {
            Cursor::Marker(_) => page.next_marker().map(|m| Cursor::Marker(Some(m))),
            Cursor::Offset(offset) => {
                let next = offset + fetched;
                // Without a total, only an empty page ends the listing.
                let more = fetched > 0 && page.total_count.is_none_or(|total| next < total);
                more.then_some(Cursor::Offset(next))
            }
        };
        self.buffer.extend(page.entries);
        Ok(())
    }
}

/// A single page of an offset-paged listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialCollection<T> {
    pub offset: u64,
    pub limit: u64,
    /// `total_count` as reported by Box.
    pub full_size: u64,
    pub entries: Vec<T>,
}

impl<T> PartialCollection<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<T> IntoIterator for PartialCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub(crate) struct OffsetPage<T> {
    #[serde(default = "Vec::new")]
    pub entries: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

impl<T> From<OffsetPage<T>> for PartialCollection<T> {
    fn from(page: OffsetPage<T>) -> Self {
        Self { offset: page.offset, limit: page.limit, full_size: page.total_count, entries: page.entries }
    }
}
