//! Serve loop - the synchronous frame pump
//!
//! Strictly one command at a time: read a 5-byte frame, dispatch it, write
//! the reply frames, repeat. The transport is anything `Read + Write`; a
//! real serial device, stdio, or an in-memory pipe in tests. Only transport
//! failures escape this loop; game-logic errors were already turned into
//! status bytes by the dispatcher.

use std::io::{self, Read, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::link::dispatcher::Dispatcher;
use crate::link::frame::{command_name, status_name, CMD_FRAME_LEN};
use crate::logger::{hex, Logger};

/// Read timeout used for serial devices; the loop just waits out idle
/// periods, so the exact value only bounds shutdown latency.
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Open a serial device for the frame pump
pub fn open_serial(device: &str, baud: u32) -> Result<Box<dyn serialport::SerialPort>> {
    serialport::new(device, baud)
        .timeout(SERIAL_READ_TIMEOUT)
        .open()
        .with_context(|| format!("opening serial device {}", device))
}

/// Stdio transport, for piping a client into the engine without hardware
pub struct StdioLink {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdioLink {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdioLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for StdioLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

impl Write for StdioLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Run the frame pump until the peer closes the link.
///
/// Returns Ok on a clean close (EOF between frames). A trailing partial
/// frame still gets its STATUS_INVALID reply before the loop exits.
pub fn serve<L: Read + Write>(mut link: L, dispatcher: &mut Dispatcher, log: &Logger) -> Result<()> {
    let mut buf = [0u8; CMD_FRAME_LEN];

    loop {
        let filled = read_frame(&mut link, &mut buf).context("reading command frame")?;
        if filled == 0 {
            log.verbose("link closed");
            return Ok(());
        }

        log.trace(&format!("rx {}", hex(&buf[..filled])));
        let reply = dispatcher.handle(&buf[..filled]);

        for frame in reply.frames() {
            link.write_all(frame.as_bytes())
                .context("writing response frame")?;
            log.trace(&format!("tx {}", hex(frame.as_bytes())));
        }
        link.flush().context("flushing response")?;

        log.verbose(&format!(
            "{} -> {}",
            command_name(buf[0]),
            status_name(reply.status())
        ));

        if filled < CMD_FRAME_LEN {
            log.verbose("link closed mid-frame");
            return Ok(());
        }
    }
}

/// Fill `buf` from the link, riding out read timeouts. Returns the number
/// of bytes read; fewer than `buf.len()` means EOF arrived first.
fn read_frame<R: Read>(link: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match link.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct SlowReader {
        chunks: Vec<Vec<u8>>,
    }

    impl Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            // An empty chunk stands in for a read timeout
            let chunk = self.chunks.remove(0);
            if chunk.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"));
            }
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_read_frame_accumulates_across_timeouts() {
        let mut reader = SlowReader {
            chunks: vec![vec![0x01, 0x02], vec![], vec![0x03, 0x04, 0x05]],
        };
        let mut buf = [0u8; 5];
        let filled = read_frame(&mut reader, &mut buf).unwrap();
        assert_eq!(filled, 5);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn test_read_frame_reports_eof() {
        let mut reader = Cursor::new(vec![0x01, 0x02]);
        let mut buf = [0u8; 5];
        assert_eq!(read_frame(&mut reader, &mut buf).unwrap(), 2);

        let mut empty = Cursor::new(Vec::<u8>::new());
        assert_eq!(read_frame(&mut empty, &mut buf).unwrap(), 0);
    }
}
