use crate::api::request::{Request, RequestFrame};
use crate::api::response::{ResponseFrame, RpcError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Socket error: {0}")]
    SocketError(#[from] std::io::Error),
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::error::Error),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Node returned no genesis block hash")]
    MissingGenesis,
}

pub trait Client {
    fn request<R>(&self, request: Request) -> impl Future<Output = Result<R, ClientError>> + Send
    where
        R: DeserializeOwned + Send;

    fn subscribe<T>(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Subscription<T>, ClientError>> + Send
    where
        T: DeserializeOwned + Send;
}

/// Stream of notifications pushed by the node for one subscribing request.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<serde_json::Value>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub fn new(receiver: mpsc::UnboundedReceiver<serde_json::Value>) -> Self {
        Self {
            receiver,
            on_drop: None,
            _item: PhantomData,
        }
    }

    fn on_drop(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_drop = Some(Box::new(hook));
        self
    }

    /// Next notification, or `None` once the connection is gone.
    pub async fn next(&mut self) -> Option<Result<T, ClientError>> {
        let params = self.receiver.recv().await?;
        Some(serde_json::from_value(params).map_err(ClientError::from))
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(hook) = self.on_drop.take() {
            hook();
        }
    }
}

type PendingCall = oneshot::Sender<Result<serde_json::Value, RpcError>>;

#[derive(Default)]
struct Pending {
    calls: HashMap<u64, PendingCall>,
    subscriptions: HashMap<u64, mpsc::UnboundedSender<serde_json::Value>>,
    closed: bool,
}

impl Pending {
    fn insert_call(&mut self, id: u64, call: PendingCall) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::ConnectionClosed);
        }
        self.calls.insert(id, call);
        Ok(())
    }

    fn insert_subscription(
        &mut self,
        id: u64,
        sender: mpsc::UnboundedSender<serde_json::Value>,
    ) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::ConnectionClosed);
        }
        self.subscriptions.insert(id, sender);
        Ok(())
    }

    /// Fails everything in flight; later registrations are refused.
    fn close(&mut self) {
        self.closed = true;
        self.calls.clear();
        self.subscriptions.clear();
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single long-lived connection to a node, multiplexed by request id.
pub struct TcpClient {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: Arc<Mutex<Pending>>,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl TcpClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let peer_addr = stream.peer_addr()?;
        tracing::debug!(%peer_addr, "Connected to rpc node");

        let (read_half, write_half) = stream.into_split();
        let pending = Arc::new(Mutex::new(Pending::default()));
        let reader = tokio::spawn(read_frames(read_half, Arc::clone(&pending)));
        Ok(Self {
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            next_id: AtomicU64::new(1),
            reader,
        })
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn call(&self, id: u64, request: Request) -> Result<serde_json::Value, ClientError> {
        let (sender, receiver) = oneshot::channel();
        lock(&self.pending).insert_call(id, sender)?;

        if let Err(e) = self.send_frame(id, request).await {
            lock(&self.pending).calls.remove(&id);
            return Err(e);
        }

        let result = receiver.await.map_err(|_| ClientError::ConnectionClosed)??;
        Ok(result)
    }

    async fn send_frame(&self, id: u64, request: Request) -> Result<(), ClientError> {
        let frame = RequestFrame { id, request };
        let mut line = serde_json::to_vec(&frame)?;
        line.push(b'\n');
        self.writer.lock().await.write_all(&line).await?;
        tracing::trace!(id, ?frame.request, "Request sent to rpc node");
        Ok(())
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl Client for TcpClient {
    async fn request<R>(&self, request: Request) -> Result<R, ClientError>
    where
        R: DeserializeOwned + Send,
    {
        let id = self.next_id();
        let result = self.call(id, request).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn subscribe<T>(&self, request: Request) -> Result<Subscription<T>, ClientError>
    where
        T: DeserializeOwned + Send,
    {
        // The subscription id is the request id, registered up front so no
        // notification can arrive before there is somewhere to put it.
        let id = self.next_id();
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.pending).insert_subscription(id, sender)?;

        let pending = Arc::clone(&self.pending);
        let subscription = Subscription::new(receiver).on_drop(move || {
            lock(&pending).subscriptions.remove(&id);
        });

        let _ack = self.call(id, request).await?;
        Ok(subscription)
    }
}

async fn read_frames(read_half: OwnedReadHalf, pending: Arc<Mutex<Pending>>) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => dispatch_frame(&line, &pending),
            Ok(None) => {
                tracing::debug!("Connection closed by rpc node");
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read from rpc node: {}", e);
                break;
            }
        }
    }

    lock(&pending).close();
}

fn dispatch_frame(line: &str, pending: &Mutex<Pending>) {
    let frame = match serde_json::from_str::<ResponseFrame>(line) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame: {}", e);
            return;
        }
    };
    tracing::trace!(?frame, "Frame received from rpc node");

    let mut pending = lock(pending);
    match frame {
        ResponseFrame::Result { id, result } => {
            if let Some(call) = pending.calls.remove(&id) {
                let _ = call.send(Ok(result));
            }
        }
        ResponseFrame::Error { id, error } => match pending.calls.remove(&id) {
            Some(call) => {
                let _ = call.send(Err(error));
            }
            None => tracing::warn!(id, %error, "Error for unknown request"),
        },
        ResponseFrame::Notification {
            subscription,
            params,
        } => {
            if let Some(sender) = pending.subscriptions.get(&subscription) {
                let _ = sender.send(params);
            }
        }
    }
}
