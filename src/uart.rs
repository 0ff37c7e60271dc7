use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::READ_BUFFER_SIZE;
use crate::error::UartError;
use crate::port::LineSettings;
use crate::terminal::TerminalLog;

const IDLE_SLEEP: Duration = Duration::from_millis(10);

pub enum UartCommand {
    /// Raw bytes for the wire plus the text logged once they are written
    Send { data: Vec<u8>, display: String },
    Disconnect,
}

/// Handle to the thread that owns an open port.
///
/// All port access happens on that thread; the UI only talks to it through
/// the command channel and reads what it appends to the shared log.
pub struct UartLink {
    port_name: String,
    sender: mpsc::Sender<UartCommand>,
    handle: Option<JoinHandle<()>>,
    alive: Arc<AtomicBool>,
}

pub fn start_uart_thread(
    port_name: &str,
    settings: &LineSettings,
    log: Arc<Mutex<TerminalLog>>,
) -> Result<UartLink, UartError> {
    if port_name.trim().is_empty() {
        return Err(UartError::NoPort);
    }

    let port = settings
        .builder(port_name)
        .open()
        .map_err(|source| UartError::Open {
            port: port_name.to_string(),
            source,
        })?;

    info!("Opened {port_name} at {settings}");
    Ok(spawn_link(port_name, port, log))
}

/// Start the reader loop on any byte stream; used directly by tests.
pub fn spawn_link<P>(port_name: &str, port: P, log: Arc<Mutex<TerminalLog>>) -> UartLink
where
    P: Read + Write + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let alive = Arc::new(AtomicBool::new(true));

    append(&log, |l| l.push_system(format!("Connected to {port_name}")));

    let thread_alive = Arc::clone(&alive);
    let thread_name = port_name.to_string();
    let handle = thread::spawn(move || {
        uart_loop(port, &log, rx);
        thread_alive.store(false, Ordering::SeqCst);
        append(&log, |l| l.push_system(format!("Disconnected from {thread_name}")));
        info!("UART thread for {thread_name} exited");
    });

    UartLink {
        port_name: port_name.to_string(),
        sender: tx,
        handle: Some(handle),
        alive,
    }
}

impl UartLink {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn send(&self, data: Vec<u8>, display: String) -> Result<(), UartError> {
        if !self.is_alive() {
            return Err(UartError::LinkClosed);
        }
        self.sender
            .send(UartCommand::Send { data, display })
            .map_err(|_| UartError::LinkClosed)
    }

    /// Stops the reader and waits for it to release the port.
    pub fn disconnect(&mut self) {
        let _ = self.sender.send(UartCommand::Disconnect);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("UART thread for {} panicked", self.port_name);
        }
    }
}

impl Drop for UartLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn append(log: &Arc<Mutex<TerminalLog>>, f: impl FnOnce(&mut TerminalLog)) {
    if let Ok(mut log) = log.lock() {
        f(&mut log);
    }
}

fn uart_loop<P: Read + Write>(
    mut port: P,
    log: &Arc<Mutex<TerminalLog>>,
    rx: mpsc::Receiver<UartCommand>,
) {
    let mut serial_buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        // Drain outgoing commands before blocking on a read
        loop {
            match rx.try_recv() {
                Ok(UartCommand::Send { data, display }) => {
                    handle_write(&mut port, &data, display, log);
                }
                Ok(UartCommand::Disconnect) | Err(TryRecvError::Disconnected) => {
                    debug!("Disconnect requested");
                    return;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if !handle_serial_read(&mut port, &mut serial_buf, log) {
            return;
        }
    }
}

fn handle_write<P: Write>(
    port: &mut P,
    data: &[u8],
    display: String,
    log: &Arc<Mutex<TerminalLog>>,
) {
    match port.write_all(data).and_then(|()| port.flush()) {
        Ok(()) => {
            debug!("Wrote {} bytes", data.len());
            append(log, |l| l.push_sent(display));
        }
        Err(e) => {
            warn!("Failed to send data: {e}");
            append(log, |l| l.push_error(format!("Send error: {e}")));
        }
    }
}

/// Returns false once the port is unusable.
fn handle_serial_read<P: Read>(
    port: &mut P,
    serial_buf: &mut [u8],
    log: &Arc<Mutex<TerminalLog>>,
) -> bool {
    match port.read(serial_buf) {
        Ok(0) => {
            thread::sleep(IDLE_SLEEP);
            true
        }
        Ok(n) => {
            append(log, |l| l.push_received(&serial_buf[..n]));
            true
        }
        Err(ref e)
            if matches!(
                e.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
            ) =>
        {
            true
        }
        Err(e) => {
            error!("Read error: {e}");
            append(log, |l| l.push_error(format!("Read error: {e}")));
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    /// In-memory stand-in for a serial device
    #[derive(Clone, Default)]
    pub struct MockPort {
        pub incoming: Arc<Mutex<VecDeque<io::Result<Vec<u8>>>>>,
        pub written: Arc<Mutex<Vec<u8>>>,
        pub fail_writes: bool,
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let next = self.incoming.lock().unwrap().pop_front();
            match next {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(e)) => Err(e),
                None => {
                    thread::sleep(Duration::from_millis(1));
                    Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"))
                }
            }
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
            }
            self.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
