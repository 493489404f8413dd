//! Response projection

use super::Reply;
use crate::config::ClientConfig;
use crate::entity::{Entity, Wrapped};
use crate::http::HttpResponse;
use crate::pagination::Pager;
use crate::types::JsonValue;

/// Turn a response into what the caller asked for.
///
/// JSON responses are wrapped through the pager's `data` unless the caller
/// wants the raw response; other formats are always returned raw.
pub(crate) fn project(
    config: &ClientConfig,
    pager: &dyn Pager,
    response: HttpResponse,
    raw: bool,
) -> Reply {
    if raw || !config.is_json() {
        return Reply::Raw(response);
    }
    Reply::Data(extract(pager, &response.body.to_json()))
}

/// Wrap the payload the pager finds in `body`
pub(crate) fn extract(pager: &dyn Pager, body: &JsonValue) -> Option<Wrapped> {
    pager.data(body).and_then(Entity::create)
}
