//! GitLab API resource services.

pub mod groups;
pub mod issues;
pub mod merge_requests;
pub mod pipelines;
pub mod projects;
pub mod users;
pub mod variables;

pub use groups::GroupsService;
pub use issues::IssuesService;
pub use merge_requests::MergeRequestsService;
pub use pipelines::PipelinesService;
pub use projects::ProjectsService;
pub use users::UsersService;
pub use variables::VariablesService;

use crate::client::GitLabClient;
use crate::pagination::{PageCursor, Pager};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Builds a [`Pager`] over any list endpoint.
///
/// The closure handed to the pager resolves the cursor: `None` fetches the
/// first page with the given params, an offset cursor re-requests the same
/// path with an explicit page number, and a keyset cursor follows the
/// opaque URL verbatim.
pub(crate) fn paged<T, P>(client: &GitLabClient, path: String, params: P) -> Pager<T>
where
    T: DeserializeOwned + Send + 'static,
    P: Serialize + Clone + Send + Sync + 'static,
{
    let client = client.clone();
    Pager::new(move |cursor| {
        let client = client.clone();
        let params = params.clone();
        let path = path.clone();
        async move {
            match cursor {
                Some(PageCursor::Keyset(url)) => client.get_page_url(&url).await,
                Some(PageCursor::Offset(page)) => {
                    client.get_page(&path, &params, Some(page)).await
                }
                None => client.get_page(&path, &params, None).await,
            }
        }
        .boxed()
    })
}
