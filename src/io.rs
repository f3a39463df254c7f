//! Byte stream seams for binary codecs.

use std::io;

/// Source of bytes; `read` fills the whole buffer
pub trait InStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Sink of bytes; `write` takes the first `len` bytes of `buf`
pub trait OutStream {
    fn write(&mut self, buf: &[u8], len: usize) -> io::Result<()>;
}

impl<W: io::Write> OutStream for W {
    fn write(&mut self, buf: &[u8], len: usize) -> io::Result<()> {
        let end = len.min(buf.len());
        self.write_all(&buf[..end])
    }
}

/// Reads from an in-memory byte array.
///
/// Reading past the end of the input never fails: the missing bytes are written as zero.
///
/// Examples
/// ```rust
/// use geomlib::io::{ByteArrayInStream, InStream};
///
/// let mut stream = ByteArrayInStream::new(vec![1, 2, 3]);
/// let mut buf = [9u8; 2];
/// stream.read(&mut buf).unwrap();
/// assert_eq!(buf, [1, 2]);
/// stream.read(&mut buf).unwrap();
/// assert_eq!(buf, [3, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ByteArrayInStream {
    buffer: Vec<u8>,
    position: usize,
}

impl ByteArrayInStream {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Replace the input and rewind to its start
    pub fn set_bytes(&mut self, buffer: Vec<u8>) {
        self.buffer = buffer;
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl InStream for ByteArrayInStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let available = self.buffer.len().saturating_sub(self.position);
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.buffer[self.position..self.position + n]);
        buf[n..].fill(0);
        self.position += n;
        Ok(())
    }
}
