use std::collections::HashSet;

use openedx_domain::constants::URL_COURSES_LIST;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::OpenedxClient;
use crate::api::ApiError;

impl OpenedxClient {
    /// List every course visible to the client, optionally for one org
    ///
    /// Follows `pagination.next` until the LMS stops returning one and
    /// concatenates the `results` of each page in order. A bare JSON list is
    /// accepted as a single page.
    ///
    /// # Errors
    /// Any failed page fails the whole call; a page without `results` or a
    /// `next` link pointing back to a visited page is an [`ApiError::Decode`].
    #[instrument(skip(self))]
    pub async fn list_all_courses(&self, org: Option<&str>) -> Result<Vec<Value>, ApiError> {
        let org_query;
        let query: &[(&str, &str)] = match org {
            Some(org) => {
                org_query = [("org", org)];
                &org_query
            }
            None => &[],
        };

        let mut courses = Vec::new();
        let mut visited = HashSet::new();
        let mut page_url = self.api.resolve_url(URL_COURSES_LIST);
        let mut page_query = query;

        loop {
            let page = self.api.request(Method::GET, &page_url, page_query, None).await?;
            visited.insert(page_url.clone());

            let next = match page {
                Value::Array(items) => {
                    courses.extend(items);
                    None
                }
                Value::Object(mut object) => {
                    match object.remove("results") {
                        Some(Value::Array(items)) => courses.extend(items),
                        _ => {
                            return Err(ApiError::Decode(format!(
                                "{page_url} returned a page without a results list"
                            )))
                        }
                    }
                    object
                        .get("pagination")
                        .and_then(|p| p.get("next"))
                        .and_then(Value::as_str)
                        .filter(|next| !next.is_empty())
                        .map(str::to_string)
                }
                other => {
                    return Err(ApiError::Decode(format!(
                        "{page_url} returned {other} instead of a course page"
                    )))
                }
            };

            match next {
                Some(next) if visited.contains(&next) => {
                    return Err(ApiError::Decode(format!("pagination loops back to {next}")));
                }
                Some(next) => {
                    debug!(next = %next, fetched = courses.len(), "Following course pagination");
                    // The next link already carries the filter
                    page_url = next;
                    page_query = &[];
                }
                None => break,
            }
        }

        info!(count = courses.len(), "Listed courses");
        Ok(courses)
    }
}
