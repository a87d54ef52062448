//! `me/threads` listing and the cursor-following pager.

use std::collections::HashSet;

use reqwest::StatusCode;

use crate::client::ThreadsClient;
use crate::error::ThreadsError;
use crate::types::{Thread, ThreadsPage};
use crate::validate::{validate_names, THREAD_FIELDS};

/// Parameters for one `me/threads` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadsQuery {
    pub fields: Vec<String>,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub limit: Option<u32>,
    /// Wins over `after` when both are set.
    pub before: Option<String>,
    pub after: Option<String>,
}

impl ThreadsQuery {
    #[must_use]
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn window(mut self, since: Option<i64>, until: Option<i64>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn before(mut self, cursor: &str) -> Self {
        self.before = Some(cursor.to_owned());
        self
    }

    #[must_use]
    pub fn after(mut self, cursor: &str) -> Self {
        self.after = Some(cursor.to_owned());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("fields", self.fields.join(","))];
        if let Some(since) = self.since {
            params.push(("since", since.to_string()));
        }
        if let Some(until) = self.until {
            params.push(("until", until.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(before) = &self.before {
            params.push(("before", before.clone()));
        } else if let Some(after) = &self.after {
            params.push(("after", after.clone()));
        }
        params
    }
}

/// Why a pagination run stopped.
#[derive(Debug)]
pub enum PageStop {
    /// The last page carried no `after` cursor.
    Exhausted,
    /// A page request failed; earlier pages are kept.
    PageFailed(ThreadsError),
    /// The server returned a cursor that was already followed.
    StuckCursor(String),
    /// The configured page cap was reached with a cursor still pending.
    PageLimit(usize),
}

/// Everything collected by [`ThreadsClient::fetch_all_threads`].
#[derive(Debug)]
pub struct ThreadPages {
    pub threads: Vec<Thread>,
    pub pages: usize,
    pub stop: PageStop,
}

impl ThreadPages {
    /// `true` when every page up to cursor exhaustion was fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, PageStop::Exhausted)
    }

    /// Strict view of the run: the threads only if paging ran to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns the failed page's error, [`ThreadsError::StuckCursor`], or
    /// [`ThreadsError::PaginationLimit`] for the corresponding stop reason.
    pub fn into_result(self) -> Result<Vec<Thread>, ThreadsError> {
        match self.stop {
            PageStop::Exhausted => Ok(self.threads),
            PageStop::PageFailed(err) => Err(err),
            PageStop::StuckCursor(cursor) => Err(ThreadsError::StuckCursor { cursor }),
            PageStop::PageLimit(max_pages) => Err(ThreadsError::PaginationLimit { max_pages }),
        }
    }
}

impl ThreadsClient {
    /// Fetches one page of the user's threads.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::InvalidInput`] if any field is not a thread field.
    /// - [`ThreadsError::ThreadsFetchFailed`] on any non-200 response.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the 200 body has an unexpected shape.
    pub async fn list_user_threads(
        &self,
        access_token: &str,
        query: &ThreadsQuery,
    ) -> Result<ThreadsPage, ThreadsError> {
        validate_names(&query.fields, THREAD_FIELDS, "field")?;

        let params = query.params();
        let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.build_url(&["me", "threads"], &pairs)?;

        let (status, body) = self.get_with_token(url, access_token).await?;
        if status != StatusCode::OK {
            return Err(ThreadsError::ThreadsFetchFailed {
                status: status.as_u16(),
                body,
            });
        }
        Self::decode(&body, "me/threads")
    }

    /// Follows `after` cursors from the first page until the listing is
    /// exhausted, collecting every thread in page order.
    ///
    /// Never fails outright: a failing page ends the run and the threads
    /// from earlier pages are returned alongside the reason in
    /// [`ThreadPages::stop`]. The run is bounded by the client's
    /// `max_pages` and stops early if a cursor repeats.
    ///
    /// `limit` defaults to the client's configured page size.
    pub async fn fetch_all_threads<S: AsRef<str>>(
        &self,
        access_token: &str,
        fields: &[S],
        since: Option<i64>,
        until: Option<i64>,
        limit: Option<u32>,
    ) -> ThreadPages {
        let base = ThreadsQuery::new(fields)
            .window(since, until)
            .limit(limit.unwrap_or(self.page_limit));

        let mut threads: Vec<Thread> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        let stop = loop {
            if pages >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    fetched = threads.len(),
                    "thread pagination hit page cap"
                );
                break PageStop::PageLimit(self.max_pages);
            }

            let query = ThreadsQuery {
                after: cursor.clone(),
                ..base.clone()
            };
            let page = match self.list_user_threads(access_token, &query).await {
                Ok(page) => page,
                Err(err) => {
                    tracing::warn!(
                        page = pages + 1,
                        fetched = threads.len(),
                        error = %err,
                        "thread page fetch failed; keeping earlier pages"
                    );
                    break PageStop::PageFailed(err);
                }
            };
            pages += 1;

            let next = page.next_cursor().map(str::to_owned);
            threads.extend(page.data);

            match next {
                None => break PageStop::Exhausted,
                Some(next) if !seen.insert(next.clone()) => {
                    tracing::warn!(cursor = %next, pages, "thread pagination cursor repeated");
                    break PageStop::StuckCursor(next);
                }
                Some(next) => cursor = Some(next),
            }
        };

        tracing::debug!(pages, threads = threads.len(), "thread pagination finished");
        ThreadPages {
            threads,
            pages,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_prefer_before_over_after() {
        let query = ThreadsQuery::new(&["id"]).before("B").after("A");
        let params = query.params();
        assert!(params.contains(&("before", "B".to_owned())));
        assert!(!params.iter().any(|(k, _)| *k == "after"));
    }

    #[test]
    fn params_use_after_alone() {
        let query = ThreadsQuery::new(&["id", "text"]).limit(25).after("A");
        assert_eq!(
            query.params(),
            vec![
                ("fields", "id,text".to_owned()),
                ("limit", "25".to_owned()),
                ("after", "A".to_owned()),
            ]
        );
    }

    #[test]
    fn into_result_maps_stop_reasons() {
        let stuck = ThreadPages {
            threads: vec![],
            pages: 2,
            stop: PageStop::StuckCursor("C".to_owned()),
        };
        assert!(matches!(
            stuck.into_result(),
            Err(ThreadsError::StuckCursor { ref cursor }) if cursor == "C"
        ));

        let capped = ThreadPages {
            threads: vec![],
            pages: 5,
            stop: PageStop::PageLimit(5),
        };
        assert!(matches!(
            capped.into_result(),
            Err(ThreadsError::PaginationLimit { max_pages: 5 })
        ));

        let done = ThreadPages {
            threads: vec![],
            pages: 1,
            stop: PageStop::Exhausted,
        };
        assert!(done.is_complete());
        assert!(done.into_result().unwrap().is_empty());
    }
}
