use portlink_core::transport::{
    ByteChannel, ConnectionConfig, ConnectionProvider, ErrorCategory, ReceiveOutcome,
    SharedTransport, Transport, TransportError, TransportState,
};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Shared state behind a mock serial line
#[derive(Default)]
struct MockLine {
    inbound: VecDeque<u8>,
    written: Vec<u8>,
    fail_on_send: bool,
    fail_on_read: bool,
    fail_on_shutdown: bool,
    shutdowns: usize,
}

type SharedLine = Arc<Mutex<MockLine>>;

/// Mock serial port: reads drain `inbound`, and an empty line blocks for
/// the read timeout before reporting `TimedOut`, like a real port
struct MockSerial {
    line: SharedLine,
    read_timeout: Duration,
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        {
            let mut line = self.line.lock().unwrap();
            if line.fail_on_read {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "line dropped"));
            }
            if !line.inbound.is_empty() {
                let n = buf.len().min(line.inbound.len());
                for slot in buf.iter_mut().take(n) {
                    *slot = line.inbound.pop_front().unwrap();
                }
                return Ok(n);
            }
        }
        std::thread::sleep(self.read_timeout);
        Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
    }
}

impl Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut line = self.line.lock().unwrap();
        if line.fail_on_send {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "Serial write failed"));
        }
        line.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteChannel for MockSerial {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.read_timeout = timeout;
        Ok(())
    }

    fn clear_input_buffer(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        let mut line = self.line.lock().unwrap();
        line.shutdowns += 1;
        if line.fail_on_shutdown {
            return Err(io::Error::other("device vanished"));
        }
        Ok(())
    }
}

struct MockProvider {
    line: SharedLine,
    available: bool,
}

impl ConnectionProvider for MockProvider {
    fn open_connection(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ByteChannel>, TransportError> {
        if !self.available {
            return Err(TransportError::Open(format!("{} is busy", config.port_name)));
        }
        Ok(Box::new(MockSerial {
            line: Arc::clone(&self.line),
            read_timeout: Duration::from_millis(10),
        }))
    }
}

fn open_mock() -> (Transport, SharedLine) {
    let line = SharedLine::default();
    let mut transport = Transport::new(MockProvider {
        line: Arc::clone(&line),
        available: true,
    });
    transport
        .open(ConnectionConfig::new("/dev/ttyMOCK0"))
        .expect("mock port should open");
    (transport, line)
}

fn feed(line: &SharedLine, data: &[u8]) {
    line.lock().unwrap().inbound.extend(data.iter().copied());
}

#[test]
fn test_open_and_close_lifecycle() {
    let (mut transport, line) = open_mock();
    assert_eq!(transport.state(), TransportState::Open);
    assert_eq!(transport.config().unwrap().port_name, "/dev/ttyMOCK0");

    transport.close();
    assert_eq!(transport.state(), TransportState::Closed);
    transport.close();
    assert_eq!(transport.state(), TransportState::Closed);
    assert_eq!(line.lock().unwrap().shutdowns, 1);

    // Reopenable after close
    transport.open(ConnectionConfig::new("/dev/ttyMOCK0")).unwrap();
    assert!(transport.is_open());
}

#[test]
fn test_close_swallows_release_errors() {
    let (mut transport, line) = open_mock();
    line.lock().unwrap().fail_on_shutdown = true;
    transport.close();
    assert_eq!(transport.state(), TransportState::Closed);
}

#[test]
fn test_open_failure_leaves_closed() {
    let mut transport = Transport::new(MockProvider {
        line: SharedLine::default(),
        available: false,
    });
    let err = transport
        .open(ConnectionConfig::new("/dev/ttyMOCK0"))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Open);
    assert_eq!(transport.state(), TransportState::Closed);
}

#[test]
fn test_open_twice_rejected() {
    let (mut transport, _line) = open_mock();
    let err = transport
        .open(ConnectionConfig::new("/dev/ttyMOCK1"))
        .unwrap_err();
    assert!(matches!(err, TransportError::AlreadyOpen));
    assert_eq!(transport.config().unwrap().port_name, "/dev/ttyMOCK0");
}

#[test]
fn test_open_rejects_invalid_config() {
    let mut transport = Transport::new(MockProvider {
        line: SharedLine::default(),
        available: true,
    });
    let err = transport.open(ConnectionConfig::default()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(!transport.is_open());
}

#[test]
fn test_send_writes_all_bytes() {
    let (mut transport, line) = open_mock();
    transport.send(&[0x02, 0x30, 0x03]).unwrap();
    transport.send_hex("a0b").unwrap();

    assert_eq!(line.lock().unwrap().written, vec![0x02, 0x30, 0x03, 0xA0, 0xB0]);
    let counters = transport.counters();
    assert_eq!(counters.tx_bytes, 5);
    assert_eq!(counters.tx_frames, 2);
}

#[test]
fn test_send_hex_rejects_bad_text() {
    let (mut transport, line) = open_mock();
    let err = transport.send_hex("12zz").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(line.lock().unwrap().written.is_empty());
}

#[test]
fn test_send_failure_keeps_connection_open() {
    let (mut transport, line) = open_mock();
    line.lock().unwrap().fail_on_send = true;

    let err = transport.send(b"test").unwrap_err();
    assert!(matches!(err, TransportError::Send(_)));
    assert_eq!(transport.state(), TransportState::Open);

    // Caller retries once the line recovers
    line.lock().unwrap().fail_on_send = false;
    transport.send(b"test").unwrap();
    assert_eq!(line.lock().unwrap().written, b"test".to_vec());
}

#[test]
fn test_receive_empty_timeout() {
    let (mut transport, _line) = open_mock();
    let start = Instant::now();
    let err = transport
        .receive(10, Duration::from_millis(100))
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, TransportError::Timeout));
    assert_eq!(err.category(), ErrorCategory::EmptyTimeout);
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
}

#[test]
fn test_receive_partial_on_timeout() {
    let (mut transport, line) = open_mock();
    feed(&line, &[0xB0, 0xB1, 0xB2]);

    let start = Instant::now();
    let outcome = transport.receive(10, Duration::from_millis(100)).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(outcome, ReceiveOutcome::PartialOnTimeout(vec![0xB0, 0xB1, 0xB2]));
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
}

#[test]
fn test_receive_complete_without_waiting() {
    let (mut transport, line) = open_mock();
    let data: Vec<u8> = (0..10).collect();
    feed(&line, &data);

    let start = Instant::now();
    let outcome = transport.receive(10, Duration::from_millis(1000)).unwrap();

    assert_eq!(outcome, ReceiveOutcome::Complete(data));
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(transport.counters().rx_bytes, 10);
}

#[test]
fn test_receive_zero_timeout_returns_buffered_bytes() {
    let (mut transport, line) = open_mock();
    feed(&line, &[1, 2, 3]);
    let outcome = transport.receive(3, Duration::ZERO).unwrap();
    assert_eq!(outcome, ReceiveOutcome::Complete(vec![1, 2, 3]));

    feed(&line, &[4]);
    let outcome = transport.receive(3, Duration::ZERO).unwrap();
    assert_eq!(outcome, ReceiveOutcome::PartialOnTimeout(vec![4]));

    let err = transport.receive(3, Duration::ZERO).unwrap_err();
    assert!(matches!(err, TransportError::Timeout));
}

#[test]
fn test_receive_huge_request_is_an_upper_bound() {
    let (mut transport, line) = open_mock();
    feed(&line, &[0x7E]);

    let outcome = transport
        .receive(usize::MAX, Duration::from_millis(10))
        .unwrap();
    assert_eq!(outcome, ReceiveOutcome::PartialOnTimeout(vec![0x7E]));
}

#[test]
fn test_receive_leaves_extra_bytes_for_next_call() {
    let (mut transport, line) = open_mock();
    feed(&line, &[1, 2, 3, 4, 5]);

    let first = transport.receive(2, Duration::from_millis(100)).unwrap();
    assert_eq!(first, ReceiveOutcome::Complete(vec![1, 2]));
    let second = transport.receive(3, Duration::from_millis(100)).unwrap();
    assert_eq!(second, ReceiveOutcome::Complete(vec![3, 4, 5]));
}

#[test]
fn test_receive_data_arriving_late() {
    let (mut transport, line) = open_mock();
    let writer_line = Arc::clone(&line);
    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(40));
        feed(&writer_line, &[0x06, 0x07]);
        std::thread::sleep(Duration::from_millis(40));
        feed(&writer_line, &[0x08, 0x09]);
    });

    let outcome = transport.receive(4, Duration::from_millis(1000)).unwrap();
    writer.join().unwrap();
    assert_eq!(outcome, ReceiveOutcome::Complete(vec![0x06, 0x07, 0x08, 0x09]));
}

#[test]
fn test_receive_stream_error() {
    let (mut transport, line) = open_mock();
    line.lock().unwrap().fail_on_read = true;

    let err = transport
        .receive(4, Duration::from_millis(100))
        .unwrap_err();
    assert!(matches!(err, TransportError::Stream(_)));
    assert_eq!(err.category(), ErrorCategory::Stream);
    assert!(transport.is_open());
}

#[test]
fn test_receive_cancelled_from_another_thread() {
    let (mut transport, _line) = open_mock();
    let cancel = Arc::new(AtomicBool::new(false));
    let trigger = Arc::clone(&cancel);
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        trigger.store(true, std::sync::atomic::Ordering::Relaxed);
    });

    let start = Instant::now();
    let err = transport
        .receive_until(8, start + Duration::from_secs(10), Some(&cancel))
        .unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, TransportError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_operations_after_close_rejected() {
    let (mut transport, _line) = open_mock();
    transport.close();
    let err = transport.send(&[1]).unwrap_err();
    assert!(matches!(err, TransportError::Send(_)));
    assert_eq!(err.category(), ErrorCategory::Send);
    assert!(matches!(
        transport
            .receive(1, Duration::from_millis(10))
            .unwrap_err(),
        TransportError::NotOpen
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shared_transport_round_trip() {
    let line = SharedLine::default();
    let shared = SharedTransport::new(Transport::new(MockProvider {
        line: Arc::clone(&line),
        available: true,
    }));

    shared
        .open(ConnectionConfig::new("/dev/ttyMOCK0"))
        .await
        .unwrap();
    assert!(shared.is_open().await);

    shared.send(vec![0xAA, 0x55]).await.unwrap();
    assert_eq!(line.lock().unwrap().written, vec![0xAA, 0x55]);

    feed(&line, &[0x01]);
    let outcome = shared
        .receive(2, Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(outcome, ReceiveOutcome::PartialOnTimeout(vec![0x01]));

    shared.close().await;
    shared.close().await;
    assert!(!shared.is_open().await);
}
