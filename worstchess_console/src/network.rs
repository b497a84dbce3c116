use std::io;
use std::net::TcpStream;

use anyhow::Context;
use serde::{Serialize, de};
use tungstenite::{Message, WebSocket, protocol::Role};
use url::Url;

use worstchess::event::StatusSnapshot;


pub const STATUS_PATH: &str = "/api/game/status";

#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::text(serialized)).map_err(CommunicationError::Socket)
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    loop {
        match socket.read().map_err(CommunicationError::Socket)? {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).map_err(CommunicationError::Serde);
            }
            // Keep-alives are answered by tungstenite itself.
            Message::Ping(_) | Message::Pong(_) => {}
            msg => {
                return Err(CommunicationError::Protocol(format!("Expected text, got {msg:?}")));
            }
        }
    }
}

// Improvement potential: Call `TcpStream::set_nonblocking` and do reads and writes on one thread
//   instead of cloning the socket.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}

pub fn connect(server_address: &str) -> anyhow::Result<WebSocket<TcpStream>> {
    let url = Url::parse(server_address).context("Invalid server address")?;
    let addrs = url.socket_addrs(|| Some(80)).context("Cannot resolve server address")?;
    log::info!("Connecting to {addrs:?}...");
    let stream = TcpStream::connect(&addrs[..]).context("Cannot connect to server")?;
    let (socket, _) =
        tungstenite::client(url.as_str(), stream).context("WebSocket handshake failed")?;
    Ok(socket)
}

// "ws://host:port/anything" -> "http://host:port/api/game/status".
pub fn default_status_url(server_address: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(server_address).context("Invalid server address")?;
    let scheme = match url.scheme() {
        "wss" | "https" => "https",
        _ => "http",
    };
    url.set_scheme(scheme)
        .map_err(|()| anyhow::anyhow!("Cannot derive status URL from {server_address}"))?;
    url.set_path(STATUS_PATH);
    url.set_query(None);
    Ok(url.to_string())
}

pub fn fetch_status(
    http: &reqwest::blocking::Client, status_url: &str,
) -> Result<StatusSnapshot, String> {
    http.get(status_url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json::<StatusSnapshot>())
        .map_err(|err| err.to_string())
}
