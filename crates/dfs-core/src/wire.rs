//! Download stream framing.
//!
//! `DownloadFile` is server-streamed: the coordinator emits one frame per
//! chunk as it is fetched and verified, and the client reassembles the
//! file as frames arrive. Each frame is self-describing so a reader never
//! needs to know chunk boundaries in advance:
//!
//! ```text
//! [u32 LE name_len][name_len bytes of file_name][u32 LE data_len][data_len bytes of chunk_data]
//! ```
//!
//! `file_name` is repeated on every frame (cheap — it is short and
//! constant for the whole stream) so a client can start writing output
//! without waiting for an out-of-band header.

use bytes::{Buf, BufMut, Bytes, BytesMut};

const HEADER_LEN: usize = 4;

/// Encode one `(file_name, chunk_data)` frame.
pub fn encode_frame(file_name: &str, chunk_data: &[u8]) -> Bytes {
    let name_bytes = file_name.as_bytes();
    let mut buf = BytesMut::with_capacity(HEADER_LEN + name_bytes.len() + HEADER_LEN + chunk_data.len());
    buf.put_u32_le(name_bytes.len() as u32);
    buf.put_slice(name_bytes);
    buf.put_u32_le(chunk_data.len() as u32);
    buf.put_slice(chunk_data);
    buf.freeze()
}

/// Incrementally decodes frames out of a byte stream that may arrive in
/// arbitrarily-sized pieces (e.g. TCP/HTTP body chunks).
#[derive(Default)]
pub struct FrameDecoder {
    buf: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed newly-received bytes into the decoder.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Pop the next complete frame, if the buffer holds one yet.
    pub fn next_frame(&mut self) -> Option<(String, Bytes)> {
        let mut cursor = &self.buf[..];
        if cursor.len() < HEADER_LEN {
            return None;
        }
        let name_len = (&cursor[..HEADER_LEN]).get_u32_le() as usize;
        cursor = &cursor[HEADER_LEN..];
        if cursor.len() < name_len + HEADER_LEN {
            return None;
        }
        let name_bytes = &cursor[..name_len];
        cursor = &cursor[name_len..];
        let data_len = (&cursor[..HEADER_LEN]).get_u32_le() as usize;
        cursor = &cursor[HEADER_LEN..];
        if cursor.len() < data_len {
            return None;
        }

        let file_name = String::from_utf8_lossy(name_bytes).into_owned();
        let frame_total = HEADER_LEN + name_len + HEADER_LEN + data_len;
        let data = Bytes::copy_from_slice(&cursor[..data_len]);
        self.buf.advance(frame_total);
        Some((file_name, data))
    }
}
