//! An in-memory capture device.
//!
//! Frames written through the sending half are recorded and passed to a
//! responder, whose answers are queued for the receiving half the way a
//! kernel capture buffer would hold them. The receiving half applies the
//! installed [`CaptureFilter`] and reports a read timeout when the queue is
//! empty.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use lanprobe_common::ScanError;
use lanprobe_common::network::binding::LocalBinding;
use lanprobe_core::{CaptureDevice, CaptureSession, FrameReceiver, FrameSender};
use lanprobe_protocols::CaptureFilter;

const READ_TIMEOUT: Duration = Duration::from_millis(5);

type Responder = Box<dyn Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync>;

/// Session lifecycle as seen by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(String),
    Filter(CaptureFilter),
    Split,
    Sent,
    SenderClosed,
    ReceiverClosed,
}

#[derive(Default)]
struct Script {
    unsolicited: Vec<Vec<u8>>,
    fail_send_at: Option<usize>,
    reject_filter: bool,
    queue: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    events: Vec<Event>,
}

pub struct ScriptedDevice {
    script: Arc<Mutex<Script>>,
    responder: Arc<Responder>,
}

impl Default for ScriptedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDevice {
    /// A device on a silent segment.
    pub fn new() -> Self {
        let silent: Responder = Box::new(|_: &[u8]| Vec::<Vec<u8>>::new());
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            responder: Arc::new(silent),
        }
    }

    /// Answers every transmitted frame with whatever `responder` returns.
    pub fn responding<F>(mut self, responder: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        let responder: Responder = Box::new(responder);
        self.responder = Arc::new(responder);
        self
    }

    /// Frames already waiting in the capture buffer when the session opens.
    pub fn with_frames(self, frames: Vec<Vec<u8>>) -> Self {
        self.lock().unsolicited = frames;
        self
    }

    /// Fails the `n`th transmission (zero-based).
    pub fn failing_send_at(self, n: usize) -> Self {
        self.lock().fail_send_at = Some(n);
        self
    }

    pub fn rejecting_filter(self) -> Self {
        self.lock().reject_filter = true;
        self
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        lock(&self.script)
    }
}

fn lock(script: &Mutex<Script>) -> MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CaptureDevice for ScriptedDevice {
    fn open(&self, local: &LocalBinding) -> Result<Box<dyn CaptureSession>, ScanError> {
        let mut script = self.lock();
        script.events.push(Event::Opened(local.interface.clone()));
        let waiting: VecDeque<Vec<u8>> = script.unsolicited.drain(..).collect();
        script.queue = waiting;

        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            responder: self.responder.clone(),
            filter: None,
        }))
    }
}

struct ScriptedSession {
    script: Arc<Mutex<Script>>,
    responder: Arc<Responder>,
    filter: Option<CaptureFilter>,
}

impl CaptureSession for ScriptedSession {
    fn set_filter(&mut self, filter: CaptureFilter) -> Result<(), ScanError> {
        let mut script = lock(&self.script);
        if script.reject_filter {
            return Err(ScanError::FilterRejected {
                expression: filter.expression().to_string(),
                reason: "syntax error".to_string(),
            });
        }
        script.events.push(Event::Filter(filter));
        self.filter = Some(filter);
        Ok(())
    }

    fn split(self: Box<Self>) -> (Box<dyn FrameSender>, Box<dyn FrameReceiver>) {
        lock(&self.script).events.push(Event::Split);
        (
            Box::new(ScriptedSender {
                script: self.script.clone(),
                responder: self.responder.clone(),
            }),
            Box::new(ScriptedReceiver {
                script: self.script.clone(),
                filter: self.filter,
                current: Vec::new(),
            }),
        )
    }
}

struct ScriptedSender {
    script: Arc<Mutex<Script>>,
    responder: Arc<Responder>,
}

impl FrameSender for ScriptedSender {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        let mut script = lock(&self.script);
        if script.fail_send_at == Some(script.sent.len()) {
            return Err(io::Error::new(io::ErrorKind::NetworkDown, "link went down"));
        }
        script.sent.push(frame.to_vec());
        script.events.push(Event::Sent);

        let replies = (self.responder)(frame);
        script.queue.extend(replies);
        Ok(())
    }
}

impl Drop for ScriptedSender {
    fn drop(&mut self) {
        lock(&self.script).events.push(Event::SenderClosed);
    }
}

struct ScriptedReceiver {
    script: Arc<Mutex<Script>>,
    filter: Option<CaptureFilter>,
    current: Vec<u8>,
}

impl FrameReceiver for ScriptedReceiver {
    fn next_frame(&mut self) -> io::Result<Option<&[u8]>> {
        let next = lock(&self.script).queue.pop_front();
        let Some(frame) = next else {
            thread::sleep(READ_TIMEOUT);
            return Ok(None);
        };

        if self.filter.is_some_and(|f| !f.matches(&frame)) {
            return Ok(None);
        }
        self.current = frame;
        Ok(Some(self.current.as_slice()))
    }
}

impl Drop for ScriptedReceiver {
    fn drop(&mut self) {
        lock(&self.script).events.push(Event::ReceiverClosed);
    }
}
