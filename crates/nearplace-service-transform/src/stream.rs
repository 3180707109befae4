//! Incremental JSON array encoding of enriched entities.
//!
//! The response body is produced as a stream of chunks: an opening bracket,
//! the comma-separated encoded entities in input order, and a closing
//! bracket. Entities are enriched lazily as the body is polled, so a
//! disconnected client stops the remaining work.

use axum::body::Bytes;
use futures::stream::{self, Stream};
use tracing::warn;

use nearplace_lib::entity::{LAT_FIELD, LON_FIELD};
use nearplace_lib::{enrich_entity, Entity, Error};
use nearplace_service_shared::{AppState, RequestId};

/// True when the entity carries both coordinate fields.
pub(crate) fn has_coordinates(entity: &Entity) -> bool {
    entity.contains_key(LAT_FIELD) && entity.contains_key(LON_FIELD)
}

/// Stream the enriched entity array.
///
/// A malformed coordinate is a per-entity failure: it is logged and the
/// entity passes through unenriched, keeping the batch going. Any other
/// enrichment error aborts the stream mid-flight; there is no
/// partial-response recovery.
pub(crate) fn enriched_array_stream(
    state: AppState,
    entities: Vec<Entity>,
    request_id: RequestId,
) -> impl Stream<Item = Result<Bytes, Error>> {
    let open = std::iter::once(Ok(Bytes::from_static(b"[")));
    let close = std::iter::once(Ok(Bytes::from_static(b"]")));

    let items = entities
        .into_iter()
        .enumerate()
        .map(move |(position, mut entity)| {
            match enrich_entity(state.index(), &mut entity) {
                Ok(_) => {}
                Err(Error::MalformedCoordinate { value }) => {
                    warn!(
                        request_id = %request_id,
                        position,
                        value = %value,
                        "malformed coordinate; passing entity through unenriched"
                    );
                }
                Err(error) => return Err(error),
            }

            let mut chunk = if position == 0 { Vec::new() } else { vec![b','] };
            serde_json::to_writer(&mut chunk, &entity).map_err(|e| Error::Io(e.into()))?;
            Ok(Bytes::from(chunk))
        });

    stream::iter(open.chain(items).chain(close))
}
