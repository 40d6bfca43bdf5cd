//! Test doubles shared by the unit tests: a recording transport, a transport
//! whose responses the test releases by hand, and two timers (one that never
//! waits, one that waits until the test fires it).

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use futures::channel::oneshot;

use crate::network::{ApiError, HttpRequest, HttpTransport};
use crate::timer::Timer;

enum Reply {
    Body(String),
    Fail(u16),
}

#[derive(Default)]
struct ReplyQueue {
    replies: VecDeque<Reply>,
    /// The single remaining reply has been served at least once.
    served: bool,
}

/// Records every request and answers from per-URL queues.  The last queued
/// reply for a URL keeps being served once the queue is down to one, until
/// a new reply is queued for that URL.
#[derive(Default)]
pub struct MockTransport {
    replies: RefCell<HashMap<String, ReplyQueue>>,
    requests: RefCell<Vec<HttpRequest>>,
    on_send: RefCell<Option<Box<dyn Fn(&HttpRequest)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: &str) {
        self.push(url, Reply::Body(body.to_string()));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.push(url, Reply::Fail(status));
    }

    pub fn set_on_send(&self, hook: impl Fn(&HttpRequest) + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url == url).count()
    }

    fn push(&self, url: &str, reply: Reply) {
        let mut replies = self.replies.borrow_mut();
        let queue = replies.entry(url.to_string()).or_default();
        if queue.served {
            queue.replies.clear();
            queue.served = false;
        }
        queue.replies.push_back(reply);
    }

    fn next_reply(&self, url: &str) -> Result<String, ApiError> {
        let mut replies = self.replies.borrow_mut();
        let queue = replies
            .get_mut(url)
            .ok_or_else(|| ApiError::Transport(format!("no reply scripted for {}", url)))?;
        let popped = if queue.replies.len() > 1 { queue.replies.pop_front() } else { None };
        if popped.is_none() {
            queue.served = true;
        }
        let reply = popped.as_ref().or_else(|| queue.replies.front());
        match reply {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail(status)) => Err(ApiError::Status {
                status: *status,
                status_text: "Mock Failure".into(),
            }),
            None => Err(ApiError::Transport(format!("no reply scripted for {}", url))),
        }
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook(&request);
        }
        self.next_reply(&request.url)
    }
}

type PendingReply = (usize, String, oneshot::Sender<Result<String, ApiError>>);

/// Transport whose requests stay in flight until the test releases them, in
/// any order.
#[derive(Default)]
pub struct GatedTransport {
    pending: RefCell<Vec<PendingReply>>,
    next_id: Cell<usize>,
}

impl GatedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Ids and URLs of the requests currently in flight.
    pub fn pending(&self) -> Vec<(usize, String)> {
        self.pending.borrow().iter().map(|(id, url, _)| (*id, url.clone())).collect()
    }

    /// Answer the request with the given id.  Returns false if it is not in
    /// flight.
    pub fn release(&self, id: usize, body: &str) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|(pid, _, _)| *pid == id) {
            Some(index) => {
                let (_, _, tx) = pending.remove(index);
                let _ = tx.send(Ok(body.to_string()));
                true
            }
            None => false,
        }
    }
}

impl HttpTransport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError> {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.pending.borrow_mut().push((id, request.url, tx));
        rx.await.unwrap_or_else(|_| Err(ApiError::Transport("request dropped".into())))
    }
}

/// Timer that returns immediately and remembers what it was asked for.
#[derive(Default)]
pub struct InstantTimer {
    sleeps: RefCell<Vec<u32>>,
    on_sleep: RefCell<Option<Box<dyn Fn(usize)>>>,
}

impl InstantTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook called with the 1-based count of sleeps so far.
    pub fn set_on_sleep(&self, hook: impl Fn(usize) + 'static) {
        *self.on_sleep.borrow_mut() = Some(Box::new(hook));
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

impl Timer for InstantTimer {
    async fn sleep(&self, ms: u32) {
        let count = {
            let mut sleeps = self.sleeps.borrow_mut();
            sleeps.push(ms);
            sleeps.len()
        };
        if let Some(hook) = self.on_sleep.borrow().as_ref() {
            hook(count);
        }
    }
}

/// Timer whose sleeps stay pending until the test fires them, in any order.
#[derive(Default)]
pub struct ManualTimer {
    pending: RefCell<Vec<(usize, u32, oneshot::Sender<()>)>>,
    next_id: Cell<usize>,
}

impl ManualTimer {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Ids and durations of the sleeps currently waiting.
    pub fn pending(&self) -> Vec<(usize, u32)> {
        self.pending.borrow().iter().map(|(id, ms, _)| (*id, *ms)).collect()
    }

    /// Complete the sleep with the given id.  Returns false if it is not
    /// pending.
    pub fn fire(&self, id: usize) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|(pid, _, _)| *pid == id) {
            Some(index) => {
                let (_, _, tx) = pending.remove(index);
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }
}

impl Timer for ManualTimer {
    async fn sleep(&self, ms: u32) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.pending.borrow_mut().push((id, ms, tx));
        let _ = rx.await;
    }
}
