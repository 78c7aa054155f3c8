//! Reassembly of complete TLV elements from arbitrarily chunked input.

use log::{trace, warn};

use ndnwire_common::MAX_NDN_PACKET_SIZE;
use ndnwire_core::DynamicByteBuffer;

use crate::structure_decoder::{FramingError, Progress, TlvStructureDecoder};

const INITIAL_PARTIAL_CAPACITY: usize = 1024;

/// Receives each complete top-level TLV element as the reader frames it.
///
/// The slice covers exactly one unparsed element, headers included, and is
/// only valid for the duration of the call.
pub trait ElementListener {
    fn on_received_element(&mut self, element: &[u8]);
}

impl<F: FnMut(&[u8])> ElementListener for F {
    fn on_received_element(&mut self, element: &[u8]) {
        self(element)
    }
}

/// Cuts a byte stream into TLV elements and hands each to a listener.
///
/// `on_received_data` accepts chunks of any size: a chunk may hold a
/// fraction of an element, exactly one, or several, and one call delivers
/// zero or more elements. A chunk holding complete elements is sliced and
/// delivered without copying; only an element left open at the end of a
/// chunk is copied into an internal buffer to await the next call.
///
/// The reader is stateful and single-owner. A transport's read loop owns
/// one reader per connection and feeds it from one thread.
pub struct ElementReader<L: ElementListener> {
    listener: L,
    structure: TlvStructureDecoder,
    partial: DynamicByteBuffer,
    partial_len: usize,
    use_partial: bool,
    /// Value bytes of a discarded oversize element not yet seen.
    skip_remaining: u64,
}

impl<L: ElementListener> ElementReader<L> {
    /// A reader rejecting elements over [`MAX_NDN_PACKET_SIZE`] bytes.
    pub fn new(listener: L) -> Self {
        Self::with_max_element_size(listener, MAX_NDN_PACKET_SIZE)
    }

    pub fn with_max_element_size(listener: L, max_element_size: usize) -> Self {
        Self::with_buffer(
            listener,
            TlvStructureDecoder::with_max_element_size(max_element_size),
            DynamicByteBuffer::new(INITIAL_PARTIAL_CAPACITY),
        )
    }

    /// Assembles a reader from explicit parts. Passing a fixed-capacity
    /// buffer bounds accumulation memory; overflowing it fails the call
    /// with [`FramingError::Buffer`] instead of reallocating.
    pub fn with_buffer(
        listener: L,
        structure: TlvStructureDecoder,
        partial: DynamicByteBuffer,
    ) -> Self {
        Self {
            listener,
            structure,
            partial,
            partial_len: 0,
            use_partial: false,
            skip_remaining: 0,
        }
    }

    pub fn max_element_size(&self) -> usize {
        self.structure.max_element_size()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Consumes the next chunk of the stream, invoking the listener once
    /// per element completed by it.
    ///
    /// An oversize element is reported as [`FramingError::PacketExceedsMaxSize`]
    /// by the call that reads its length header, then silently discarded;
    /// elements after it, including any later in the same chunk, are still
    /// framed and delivered. A malformed header drops all buffered state,
    /// so on a stream transport the caller should close the connection.
    pub fn on_received_data(&mut self, data: &[u8]) -> Result<(), FramingError> {
        let mut data = data;
        let mut deferred = None;

        if self.skip_remaining > 0 {
            let take = self.skip_remaining.min(data.len() as u64) as usize;
            self.skip_remaining -= take as u64;
            data = &data[take..];
            if self.skip_remaining > 0 {
                return Ok(());
            }
            trace!("finished discarding oversize element");
        }

        while !data.is_empty() {
            let fed_before = self.structure.consumed();
            match self.structure.feed(data) {
                Ok(Progress::ElementComplete(end)) => {
                    if self.use_partial {
                        self.stash(&data[..end])?;
                        let element_len = self.partial_len;
                        self.use_partial = false;
                        self.partial_len = 0;
                        trace!("framed {element_len} byte element from partial data");
                        self.listener
                            .on_received_element(&self.partial.as_slice()[..element_len]);
                    } else {
                        trace!("framed {end} byte element in place");
                        self.listener.on_received_element(&data[..end]);
                    }
                    self.structure.reset();
                    data = &data[end..];
                }
                Ok(Progress::NeedMoreBytes(_)) => {
                    self.stash(data)?;
                    self.use_partial = true;
                    break;
                }
                Err(FramingError::PacketExceedsMaxSize { length, max }) => {
                    warn!("discarding {length} byte element over the {max} byte limit");
                    // The headers are consumed; skip the declared value,
                    // which may run past this chunk.
                    let header_len = self.structure.consumed();
                    data = &data[header_len - fed_before..];
                    let value_len = length - header_len as u64;
                    let take = value_len.min(data.len() as u64) as usize;
                    data = &data[take..];
                    self.skip_remaining = value_len - take as u64;
                    self.use_partial = false;
                    self.partial_len = 0;
                    self.structure.reset();
                    deferred = Some(FramingError::PacketExceedsMaxSize { length, max });
                    if self.skip_remaining > 0 {
                        break;
                    }
                }
                Err(err) => {
                    warn!("dropping buffered stream state: {err}");
                    self.use_partial = false;
                    self.partial_len = 0;
                    self.structure.reset();
                    return Err(err);
                }
            }
        }

        match deferred {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn stash(&mut self, bytes: &[u8]) -> Result<(), FramingError> {
        if let Err(err) = self.partial.copy(bytes, self.partial_len) {
            self.use_partial = false;
            self.partial_len = 0;
            self.structure.reset();
            return Err(err.into());
        }
        self.partial_len += bytes.len();
        Ok(())
    }
}
