//! Loopback HTTP listener that captures the provider's redirect.
//!
//! The listener runs as a background task for the duration of one
//! authorization. The first request to the redirect path that carries the
//! expected `state` and a `code` (or an `error`) is answered and its result handed to the waiting
//! flow through a `oneshot` channel; every later request is answered but
//! ignored. [`RedirectListener::shutdown`] stops accepting, cancels open
//! connections and joins the task, releasing the port.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

/// Body returned to the browser once the code has been captured.
pub const SUCCESS_BODY: &str = "You may now close this window.";

/// Upper bound on header lines read from one request.
const MAX_HEADER_LINES: usize = 100;

type CodeSlot = Arc<Mutex<Option<oneshot::Sender<Result<String>>>>>;

/// A running redirect listener.
#[derive(Debug)]
pub struct RedirectListener {
    local_addr: SocketAddr,
    path: String,
    code_rx: oneshot::Receiver<Result<String>>,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RedirectListener {
    /// Binds `addr` and starts serving `path` in a background task.
    ///
    /// When `state` is set, a redirect whose `state` parameter is missing or
    /// differs from it is answered with 400 and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListenerBind`] if the address is unavailable.
    pub async fn bind(addr: SocketAddr, path: &str, state: Option<String>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::ListenerBind { addr, source })?;
        let local_addr = listener.local_addr()?;
        info!("Listening for the authorization redirect on {local_addr}");

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let route = Route {
            path: path.to_string(),
            state,
            slot: Arc::new(Mutex::new(Some(code_tx))),
        };

        let handle = tokio::spawn(serve(listener, shutdown_rx, route));

        Ok(Self {
            local_addr,
            path: path.to_string(),
            code_rx,
            shutdown_tx,
            handle,
        })
    }

    /// Returns the bound address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The redirect URI that lands on this listener.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        let mut addr = self.local_addr;
        if addr.ip().is_unspecified() {
            addr.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        format!("http://{addr}{}", self.path)
    }

    /// Waits for the redirect and returns the authorization code.
    ///
    /// Waits indefinitely when `timeout` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the error carried by the redirect, [`Error::Timeout`] if the
    /// wait elapses, or [`Error::ListenerClosed`] if the listener stopped first.
    pub async fn wait_for_code(&mut self, timeout: Option<Duration>) -> Result<String> {
        let received = match timeout {
            Some(limit) => tokio::time::timeout(limit, &mut self.code_rx)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => (&mut self.code_rx).await,
        };

        received.map_err(|_| Error::ListenerClosed)?
    }

    /// Stops the listener and waits for its task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener task panicked.
    pub async fn shutdown(self) -> Result<()> {
        // The task may already be gone, in which case there is nobody to tell
        let _ = self.shutdown_tx.send(());
        self.handle
            .await
            .map_err(|e| Error::Io(io::Error::other(format!("listener task failed: {e}"))))?;
        debug!("Redirect listener on {} stopped", self.local_addr);
        Ok(())
    }
}

#[derive(Clone)]
struct Route {
    path: String,
    state: Option<String>,
    slot: CodeSlot,
}

async fn serve(listener: TcpListener, mut shutdown: oneshot::Receiver<()>, route: Route) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!("Redirect listener accepted connection from {peer}");
                    let route = route.clone();
                    connections.spawn(async move {
                        if let Err(e) = handle_connection(stream, &route).await {
                            debug!("Redirect connection from {peer} failed: {e}");
                        }
                    });
                }
                Err(e) => warn!("Redirect listener accept failed: {e}"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    // Browsers keep idle connections open; cancel them so the port is released
    connections.shutdown().await;
}

async fn handle_connection(mut stream: TcpStream, route: &Route) -> io::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut reader = BufReader::new(reader);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(());
    }

    let mut header = String::new();
    for _ in 0..MAX_HEADER_LINES {
        header.clear();
        if reader.read_line(&mut header).await? == 0 || header.trim_end().is_empty() {
            break;
        }
    }

    let reply = route.dispatch(&request_line);
    write_response(&mut writer, reply.status, &reply.body).await?;

    // Answer the browser before the flow moves on and tears the listener down
    if let Some(outcome) = reply.outcome
        && let Some(sender) = route.take_sender()
    {
        let _ = sender.send(outcome);
    }

    Ok(())
}

struct Reply {
    status: Status,
    body: String,
    outcome: Option<Result<String>>,
}

impl Reply {
    fn new(status: Status, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            outcome: None,
        }
    }

    fn deliver(mut self, outcome: Result<String>) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    BadRequest,
    NotFound,
    Conflict,
}

impl Status {
    const fn line(self) -> &'static str {
        match self {
            Self::Ok => "200 OK",
            Self::BadRequest => "400 Bad Request",
            Self::NotFound => "404 Not Found",
            Self::Conflict => "409 Conflict",
        }
    }
}

impl Route {
    fn take_sender(&self) -> Option<oneshot::Sender<Result<String>>> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }

    fn is_delivered(&self) -> bool {
        self.slot.lock().map_or(true, |slot| slot.is_none())
    }

    fn dispatch(&self, request_line: &str) -> Reply {
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
            return Reply::new(Status::BadRequest, "Bad Request");
        };

        let Ok(url) = Url::parse(&format!("http://localhost{target}")) else {
            return Reply::new(Status::BadRequest, "Bad Request");
        };

        if method != "GET" || url.path() != self.path {
            return Reply::new(Status::NotFound, "Not Found");
        }

        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        if self.is_delivered() {
            return Reply::new(Status::Conflict, "Authorization already received.");
        }

        if let Some(expected) = &self.state
            && param("state").as_deref() != Some(expected.as_str())
        {
            warn!("Ignoring redirect with a missing or unexpected state value");
            return Reply::new(Status::BadRequest, "State mismatch.");
        }

        if let Some(error) = param("error") {
            let outcome = if error == "access_denied" {
                Error::AccessDenied
            } else {
                Error::oauth_error(error, param("error_description").unwrap_or_default())
            };
            return Reply::new(Status::BadRequest, "Authorization failed.").deliver(Err(outcome));
        }

        match param("code").filter(|code| !code.is_empty()) {
            Some(code) => Reply::new(Status::Ok, SUCCESS_BODY).deliver(Ok(code)),
            None => Reply::new(Status::BadRequest, "Missing authorization code."),
        }
    }
}

async fn write_response<W>(writer: &mut W, status: Status, body: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        status.line(),
        body.len(),
    );
    writer.write_all(response.as_bytes()).await?;
    writer.flush().await?;
    writer.shutdown().await
}
