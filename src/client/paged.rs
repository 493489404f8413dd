//! Paginated fetch loop

use super::{projector, ApiClient, RequestHook};
use crate::entity::Wrapped;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, RequestOptions};
use tracing::debug;

impl ApiClient {
    /// GET every page of `path` and collect the results.
    ///
    /// Pages holding a list are concatenated; any other payload is appended
    /// as one element.
    pub async fn get_paged(&self, path: &str, options: &RequestOptions) -> Result<Vec<Wrapped>> {
        self.get_paged_with(path, options, None).await
    }

    /// [`get_paged`](Self::get_paged) with a hook run on every page request
    pub async fn get_paged_with(
        &self,
        path: &str,
        options: &RequestOptions,
        customize: Option<&RequestHook<'_>>,
    ) -> Result<Vec<Wrapped>> {
        let mut results = Vec::new();
        self.each_page(path, options, customize, |page| {
            match page {
                Wrapped::List(items) => results.extend(items),
                Wrapped::Value(JsonValue::Array(items)) => {
                    results.extend(items.into_iter().map(Wrapped::Value));
                }
                other => results.push(other),
            }
            Ok(())
        })
        .await?;
        Ok(results)
    }

    /// GET every page of `path`, handing each page's payload to `consumer`.
    ///
    /// Pages without a payload are skipped. An error from the transport or
    /// from `consumer` stops the loop; pages already consumed stay consumed.
    pub async fn each_page<F>(
        &self,
        path: &str,
        options: &RequestOptions,
        customize: Option<&RequestHook<'_>>,
        mut consumer: F,
    ) -> Result<()>
    where
        F: FnMut(Wrapped) -> Result<()> + Send,
    {
        if !self.is_json() {
            return Err(Error::unsupported_format(self.config.format.name()));
        }

        let mut pager = self.config.pager();
        let mut fetched = 0usize;
        while pager.more_pages() {
            let mut page_options = options.clone();
            page_options.extend(pager.page_options());

            let response = self
                .dispatch(Method::GET, path, &page_options, customize)
                .await?;
            let body = response.body.to_json();
            fetched += 1;

            if let Some(data) = projector::extract(pager.as_ref(), &body) {
                consumer(data)?;
            } else {
                debug!("Page {} of {} has no data", fetched, path);
            }
            pager.next_page(&body);
        }

        debug!("Fetched {} page(s) of {}", fetched, path);
        Ok(())
    }
}
