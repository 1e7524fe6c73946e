use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;

/// Duplex byte channel a [`Transport`](super::Transport) talks through
pub trait ByteChannel: Read + Write + Send {
    /// Bound how long a single `read` may block.
    ///
    /// After the timeout passes with nothing to read, `read` returns either
    /// `Ok(0)` or an error of kind `TimedOut`/`WouldBlock`.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Discard anything already buffered on the input side
    fn clear_input_buffer(&mut self) -> io::Result<()>;

    /// Release the underlying device. Called once by `Transport::close`.
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serial port wrapper implementing ByteChannel
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Wrap an opened port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Name the OS reports for the port, if any
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl Read for SerialChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl ByteChannel for SerialChannel {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(io::Error::other)
    }

    fn clear_input_buffer(&mut self) -> io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(io::Error::other)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::All)
            .map_err(io::Error::other)
    }
}
