//! Background "work in progress" spinner.
//!
//! The spinner thread only writes glyphs to its sink. It is stopped and
//! joined when the [`Indicator`] is dropped, so leaving the decorated scope
//! on any path, including an unwinding panic, cleans it up.

use std::io::Write;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const GLYPHS: [char; 4] = ['-', '/', '|', '\\'];
const DEFAULT_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug)]
pub struct Indicator {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Indicator {
    /// Spinner on stderr.
    pub fn start(message: impl Into<String>) -> Self {
        Self::start_with(message, std::io::stderr(), DEFAULT_DELAY)
    }

    /// Spinner writing to `out`, redrawn every `delay`.
    pub fn start_with<W>(message: impl Into<String>, mut out: W, delay: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let message = message.into();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut frame = 0usize;
            loop {
                let _ = write!(out, "\r{} {}", message, GLYPHS[frame % GLYPHS.len()]);
                let _ = out.flush();
                frame += 1;
                match stop_rx.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            let _ = write!(out, "\r{}\r", " ".repeat(message.chars().count() + 2));
            let _ = out.flush();
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// An indicator that draws nothing.
    pub fn disabled() -> Self {
        Self {
            stop_tx: None,
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop and join now instead of at end of scope.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // dropping the sender wakes the thread immediately
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn stop_joins_and_clears_line() {
        let buf = SharedBuf::default();
        let spinner = Indicator::start_with("Compiling", buf.clone(), Duration::from_millis(5));
        assert!(spinner.is_active());
        thread::sleep(Duration::from_millis(30));
        spinner.stop();

        let text = buf.text();
        assert!(text.starts_with("\rCompiling -"));
        assert!(text.ends_with(&format!("\r{}\r", " ".repeat(11))));

        // nothing is written once stopped
        let len = text.len();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(buf.text().len(), len);
    }

    #[test]
    fn early_return_still_stops_spinner() {
        fn failing_phase(buf: SharedBuf) -> Result<(), &'static str> {
            let _spinner = Indicator::start_with("Loading", buf, Duration::from_secs(60));
            Err("compile failed")
        }

        let buf = SharedBuf::default();
        assert!(failing_phase(buf.clone()).is_err());
        // a 60 s delay would block here if the stop signal were not prompt
        assert!(buf.text().ends_with(&format!("\r{}\r", " ".repeat(9))));
    }

    #[test]
    fn disabled_indicator_is_inert() {
        let spinner = Indicator::disabled();
        assert!(!spinner.is_active());
        drop(spinner);
    }
}
