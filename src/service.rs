use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    thread::spawn,
};

use tracing::{debug, info, warn};
use tungstenite::{
    accept_hdr,
    handshake::server::{Request, Response},
    Message, WebSocket,
};

use crate::responder::Responder;

/// Path suffix clients connect to.
pub const CLUSTER_PATH: &str = "/ws/cluster";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("failed to serialize answer: {0}")]
    Json(#[from] serde_json::Error),
}

/// A websocket service answering clustering queries.
/// Each text message is a query string and gets one text message back.
pub struct Service {
    listener: TcpListener,
    responder: Responder,
}

impl Service {
    pub fn bind(address: &str, responder: Responder) -> Result<Self, ServiceError> {
        let listener = TcpListener::bind(address)?;
        Ok(Self {
            listener,
            responder,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServiceError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one thread per connection.
    pub fn run(self) -> Result<(), ServiceError> {
        info!(address = %self.local_addr()?, "service listening");
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(reason) => {
                    warn!(%reason, "incoming connection failed");
                    continue;
                }
            };
            let responder = self.responder.clone();
            spawn(move || {
                if let Err(reason) = handle_connection(stream, &responder) {
                    warn!(%reason, "connection ended with an error");
                }
            });
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream, responder: &Responder) -> Result<(), ServiceError> {
    let peer = stream.peer_addr()?;
    let (path, mut websocket) = get_websocket(stream)?;
    if !path.ends_with(CLUSTER_PATH) {
        warn!(%peer, path = %path, "unknown path");
        websocket.close(None)?;
        return Ok(());
    }
    info!(%peer, "got a client");
    loop {
        match websocket.read_message() {
            Ok(Message::Text(query)) => {
                let answer = responder.respond(&query)?;
                websocket.write_message(Message::Text(answer))?;
            }
            Ok(Message::Binary(_)) => warn!(%peer, "unsupported binary message"),
            Ok(Message::Close(_)) => debug!(%peer, "client closing"),
            Ok(_) => {}
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                break
            }
            Err(reason) => return Err(reason.into()),
        }
    }
    info!(%peer, "client left");
    Ok(())
}

fn get_websocket(stream: TcpStream) -> Result<(String, WebSocket<TcpStream>), ServiceError> {
    let mut path: String = String::new();
    let callback = |req: &Request, response: Response| {
        path = String::from(req.uri().path());
        Ok(response)
    };
    let websocket =
        accept_hdr(stream, callback).map_err(|e| ServiceError::Handshake(e.to_string()))?;
    Ok((path, websocket))
}
