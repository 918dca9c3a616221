use std::future::Future;

use bytes::Bytes;

use crate::error::FiledropResult;
use crate::types::ObjectRef;

/// Backing object storage for staging and master files.
///
/// [`ObjectStore`] implementations define how named objects are checked,
/// read, and rewritten. The merge engine only ever touches individual named
/// objects; it never lists or scans.
///
/// `exists` must be an exact-key check: a stored key that merely starts with
/// the probed key is absent, and probing a missing or empty key is a `false`,
/// never an error.
pub trait ObjectStore {
    /// Returns whether `object` names a stored object, by exact key match.
    fn exists(&self, object: &ObjectRef) -> impl Future<Output = FiledropResult<bool>> + Send;

    /// Returns the full content of `object`, or [`None`] when it is absent.
    fn read(
        &self,
        object: &ObjectRef,
    ) -> impl Future<Output = FiledropResult<Option<Bytes>>> + Send;

    /// Creates or overwrites `object` with `data`.
    fn write(
        &self,
        object: &ObjectRef,
        data: Bytes,
    ) -> impl Future<Output = FiledropResult<()>> + Send;

    /// Returns the byte size of `object`.
    fn size(&self, object: &ObjectRef) -> impl Future<Output = FiledropResult<u64>> + Send;
}
