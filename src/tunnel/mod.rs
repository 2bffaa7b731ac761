//! Scoped SSH tunnel
//!
//! Opens a password-authenticated SSH session and forwards an ephemeral
//! local port to the warehouse host on the far side. The tunnel is a scoped
//! resource: dropping it stops the forward thread and closes the session,
//! and the warehouse connection must be closed before that happens (the
//! engine enforces the ordering).
//!
//! Forwarding runs on one background thread that multiplexes every accepted
//! local connection over its own `direct-tcpip` channel in a nonblocking
//! poll loop, so a sink that opens more than one connection cannot wedge the
//! tunnel.

use crate::config::TunnelSettings;
use crate::error::{Error, Result};
use ssh2::{Channel, Session};
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const BUF_SIZE: usize = 16 * 1024;

/// A live SSH local port-forward
pub struct SshTunnel {
    local_port: u16,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SshTunnel {
    /// Open a tunnel to `remote_host:remote_port` as resolved on the SSH
    /// server's network
    pub fn open(settings: &TunnelSettings, remote_host: &str, remote_port: u16) -> Result<Self> {
        let tcp = TcpStream::connect((settings.host.as_str(), settings.port)).map_err(|e| {
            Error::tunnel(format!(
                "failed to reach {}:{}: {e}",
                settings.host, settings.port
            ))
        })?;

        let mut session =
            Session::new().map_err(|e| Error::tunnel(format!("session init failed: {e}")))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| Error::tunnel(format!("handshake failed: {e}")))?;
        session
            .userauth_password(&settings.user, &settings.password)
            .map_err(|e| Error::tunnel(format!("authentication failed: {e}")))?;
        if !session.authenticated() {
            return Err(Error::tunnel("authentication rejected"));
        }

        let listener = TcpListener::bind(("127.0.0.1", 0))
            .map_err(|e| Error::tunnel(format!("failed to bind local port: {e}")))?;
        let local_port = listener
            .local_addr()
            .map_err(|e| Error::tunnel(format!("failed to read local port: {e}")))?
            .port();

        info!(
            local_port,
            remote_host, remote_port, "ssh tunnel established"
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = thread::spawn({
            let shutdown = Arc::clone(&shutdown);
            let remote_host = remote_host.to_string();
            move || forward_loop(session, listener, &remote_host, remote_port, &shutdown)
        });

        Ok(Self {
            local_port,
            shutdown,
            handle: Some(handle),
        })
    }

    /// The forwarded local port; connections to `127.0.0.1:{port}` land on
    /// the remote endpoint
    pub fn local_port(&self) -> u16 {
        self.local_port
    }
}

impl Drop for SshTunnel {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!(local_port = self.local_port, "ssh tunnel closed");
    }
}

impl std::fmt::Debug for SshTunnel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshTunnel")
            .field("local_port", &self.local_port)
            .finish_non_exhaustive()
    }
}

/// One accepted local connection paired with its forward channel
struct Link {
    stream: TcpStream,
    channel: Channel,
    done: bool,
}

impl Link {
    /// Move bytes in both directions; returns whether anything moved
    fn pump(&mut self, buf: &mut [u8]) -> io::Result<bool> {
        let mut active = false;

        match self.stream.read(buf) {
            Ok(0) => self.done = true,
            Ok(n) => {
                write_all_retrying(&mut self.channel, &buf[..n])?;
                active = true;
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(e),
        }

        match self.channel.read(buf) {
            Ok(0) => {
                if self.channel.eof() {
                    self.done = true;
                }
            }
            Ok(n) => {
                write_all_retrying(&mut self.stream, &buf[..n])?;
                active = true;
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(e),
        }

        Ok(active)
    }
}

fn forward_loop(
    session: Session,
    listener: TcpListener,
    remote_host: &str,
    remote_port: u16,
    shutdown: &AtomicBool,
) {
    if let Err(e) = listener.set_nonblocking(true) {
        warn!(error = %e, "tunnel listener setup failed");
        return;
    }
    session.set_blocking(false);

    let mut links: Vec<Link> = Vec::new();
    let mut buf = vec![0u8; BUF_SIZE];

    while !shutdown.load(Ordering::SeqCst) {
        let mut idle = true;

        match listener.accept() {
            Ok((stream, _)) => {
                idle = false;
                match accept_link(&session, stream, remote_host, remote_port) {
                    Ok(link) => links.push(link),
                    Err(e) => warn!(error = %e, "failed to open forward channel"),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => {
                warn!(error = %e, "tunnel listener failed");
                break;
            }
        }

        for link in &mut links {
            match link.pump(&mut buf) {
                Ok(true) => idle = false,
                Ok(false) => {}
                Err(e) => {
                    debug!(error = %e, "forwarded connection ended");
                    link.done = true;
                }
            }
        }
        links.retain(|link| !link.done);

        if idle {
            thread::sleep(POLL_INTERVAL);
        }
    }

    // Channel teardown needs a blocking session; errors here are moot.
    session.set_blocking(true);
    for link in &mut links {
        let _ = link.channel.close();
    }
}

fn accept_link(
    session: &Session,
    stream: TcpStream,
    remote_host: &str,
    remote_port: u16,
) -> io::Result<Link> {
    stream.set_nonblocking(true)?;

    // Channel setup is a multi-packet exchange; flip to blocking for it so
    // the handshake cannot surface as a spurious WouldBlock.
    session.set_blocking(true);
    let channel = session.channel_direct_tcpip(remote_host, remote_port, None);
    session.set_blocking(false);

    let channel = channel.map_err(|e| io::Error::other(e.to_string()))?;
    Ok(Link {
        stream,
        channel,
        done: false,
    })
}

/// `write_all` that rides out WouldBlock on a nonblocking sink
fn write_all_retrying<W: Write>(writer: &mut W, mut data: &[u8]) -> io::Result<()> {
    while !data.is_empty() {
        match writer.write(data) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(1));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
