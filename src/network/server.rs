use crate::api::request::RequestFrame;
use crate::api::response::{INTERNAL_ERROR, PARSE_ERROR, ResponseFrame, RpcError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Socket error: {0}")]
    SocketError(#[from] std::io::Error),
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::error::Error),
    #[error("Request rejected: {0}")]
    Rejected(RpcError),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Connection closed")]
    ConnectionClosed,
}

impl ServerError {
    fn into_rpc_error(self) -> RpcError {
        match self {
            ServerError::Rejected(error) => error,
            other => RpcError::new(INTERNAL_ERROR, other.to_string()),
        }
    }
}

pub trait Handler<R> {
    fn handle_request(
        &self,
        request: R,
        subscriber: Subscriber,
    ) -> impl Future<Output = Result<ServerResponse, ServerError>> + Send;
}

#[derive(Debug, PartialEq)]
pub struct ServerResponse(serde_json::Value);

impl ServerResponse {
    pub fn new<A: Serialize>(response: A) -> Result<Self, ServerError> {
        Ok(Self(serde_json::to_value(response)?))
    }
}

/// Pushes notifications for the request identified by `id`.
///
/// Notifications may reach the socket before the response to the
/// subscribing request; clients register the id before sending.
#[derive(Clone, Debug)]
pub struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<ResponseFrame>,
}

impl Subscriber {
    pub fn new(id: u64, sender: mpsc::UnboundedSender<ResponseFrame>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn notify<A: Serialize>(&self, params: A) -> Result<(), ServerError> {
        let frame = ResponseFrame::Notification {
            subscription: self.id,
            params: serde_json::to_value(params)?,
        };
        self.sender
            .send(frame)
            .map_err(|_| ServerError::ConnectionClosed)
    }
}

pub async fn start_server<R, H>(port: u16, handler: Arc<H>) -> Result<(), ServerError>
where
    R: DeserializeOwned + Debug + Send + 'static,
    H: Handler<R> + Send + Sync + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::debug!("Server is listening on port {}", port);
    serve(listener, handler).await
}

pub async fn serve<R, H>(listener: TcpListener, handler: Arc<H>) -> Result<(), ServerError>
where
    R: DeserializeOwned + Debug + Send + 'static,
    H: Handler<R> + Send + Sync + 'static,
{
    loop {
        let (socket, addr) = listener.accept().await?;
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            if let Err(e) = accept_socket::<R, H>(socket, addr, handler).await {
                tracing::warn!("Connection from {} terminated: {}", addr, e);
            }
        });
    }
}

#[tracing::instrument(skip(socket, handler))]
async fn accept_socket<R, H>(
    socket: TcpStream,
    addr: SocketAddr,
    handler: Arc<H>,
) -> Result<(), ServerError>
where
    R: DeserializeOwned + Debug + Send + 'static,
    H: Handler<R> + Send + Sync + 'static,
{
    tracing::debug!("Accepted new connection from {}", addr);

    let (read_half, write_half) = socket.into_split();
    let (sender, receiver) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_frames(write_half, receiver));

    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await? {
        let frame = match serde_json::from_str::<RequestFrame<R>>(&line) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Received malformed request: {}", e);
                let error = RpcError::new(PARSE_ERROR, e.to_string());
                let _ = sender.send(ResponseFrame::Error { id: 0, error });
                continue;
            }
        };
        tracing::debug!(frame.id, "Received new request from client: {:?}", frame.request);

        let subscriber = Subscriber::new(frame.id, sender.clone());
        let response = match handler.handle_request(frame.request, subscriber).await {
            Ok(ServerResponse(result)) => ResponseFrame::Result {
                id: frame.id,
                result,
            },
            Err(e) => ResponseFrame::Error {
                id: frame.id,
                error: e.into_rpc_error(),
            },
        };
        if sender.send(response).is_err() {
            break;
        }
    }

    drop(sender);
    writer
        .await
        .map_err(|e| ServerError::InternalError(e.to_string()))?
}

async fn write_frames(
    mut socket: OwnedWriteHalf,
    mut receiver: mpsc::UnboundedReceiver<ResponseFrame>,
) -> Result<(), ServerError> {
    while let Some(frame) = receiver.recv().await {
        let mut line = serde_json::to_vec(&frame)?;
        line.push(b'\n');
        socket.write_all(&line).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::Request;
    use crate::network::client::{Client, TcpClient};

    struct EchoHandler;

    impl Handler<Request> for EchoHandler {
        async fn handle_request(
            &self,
            request: Request,
            subscriber: Subscriber,
        ) -> Result<ServerResponse, ServerError> {
            match request {
                Request::SystemName => ServerResponse::new("echo"),
                Request::ChainGetFinalizedHead => {
                    subscriber.notify(1u64)?;
                    subscriber.notify(2u64)?;
                    ServerResponse::new(subscriber.id())
                }
                _ => Err(ServerError::Rejected(RpcError::new(-32601, "Method not found"))),
            }
        }
    }

    async fn start_echo_server() -> SocketAddr {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve::<Request, _>(listener, Arc::new(EchoHandler)));
        addr
    }

    #[tokio::test]
    async fn respond_to_request() {
        let addr = start_echo_server().await;
        let client = TcpClient::connect(addr).await.unwrap();
        let name: String = client.request(Request::SystemName).await.unwrap();
        assert_eq!(name, "echo");
    }

    #[tokio::test]
    async fn reply_with_handler_error() {
        let addr = start_echo_server().await;
        let client = TcpClient::connect(addr).await.unwrap();
        let response = client.request::<String>(Request::SystemChain).await;
        assert!(response.is_err());
    }

    #[tokio::test]
    async fn serve_multiple_requests_on_one_connection() {
        let addr = start_echo_server().await;
        let client = TcpClient::connect(addr).await.unwrap();
        for _ in 0..3 {
            let name: String = client.request(Request::SystemName).await.unwrap();
            assert_eq!(name, "echo");
        }
    }

    #[tokio::test]
    async fn deliver_notifications_in_order() {
        let addr = start_echo_server().await;
        let client = TcpClient::connect(addr).await.unwrap();
        let mut subscription = client
            .subscribe::<u64>(Request::ChainGetFinalizedHead)
            .await
            .unwrap();
        assert_eq!(subscription.next().await.unwrap().unwrap(), 1);
        assert_eq!(subscription.next().await.unwrap().unwrap(), 2);
    }
}
