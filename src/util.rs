use bytemuck::{pod_read_unaligned, Pod};

use crate::DecodeError;
use core::mem::size_of;

#[inline]
pub(crate) fn try_pull_pod<T: Pod>(bytes: &[u8]) -> Result<(T, &[u8]), DecodeError> {
  let position = size_of::<T>();
  if bytes.len() >= position {
    let (head, tail) = bytes.split_at(position);
    let a: T = pod_read_unaligned(head);
    Ok((a, tail))
  } else {
    Err(DecodeError::InsufficientBytes)
  }
}

/// Reads a `Pod` value from the current position of a byte source.
#[inline]
pub(crate) fn read_pod<T: Pod, S: crate::ByteSource + ?Sized>(
  source: &mut S,
) -> Result<T, DecodeError> {
  let mut t: T = T::zeroed();
  source.read_exact(bytemuck::bytes_of_mut(&mut t))?;
  Ok(t)
}
