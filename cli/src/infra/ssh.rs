//! SSH transport backed by libssh2.
//!
//! [`Ssh2SessionProvider`] opens one authenticated session per target.
//! [`Ssh2ExecChannel`] pumps the channel with non-blocking reads into a
//! local buffer so that `available` can answer without blocking.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use bootstrap_common::InstanceInfo;
use ssh2::{Channel, Session};
use tracing::{debug, warn};

use crate::application::ports::{Connection, ExecChannel, SessionInfo, SessionProvider};
use crate::domain::{Target, TestConfig, TransportError};

/// Terminal type requested along with a pty.
const PTY_TERM: &str = "vt100";

/// Size of one non-blocking read while pumping the channel.
const PUMP_CHUNK: usize = 8192;

impl From<ssh2::Error> for TransportError {
    fn from(e: ssh2::Error) -> Self {
        Self::Protocol(e.to_string())
    }
}

// ── Session provider ─────────────────────────────────────────────────────────

/// Opens libssh2 sessions using key-file or agent authentication.
#[derive(Debug, Clone)]
pub struct Ssh2SessionProvider {
    user: String,
    identity_file: Option<PathBuf>,
    default_port: u16,
    connect_timeout: Duration,
}

impl Ssh2SessionProvider {
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        identity_file: Option<PathBuf>,
        default_port: u16,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            user: user.into(),
            identity_file,
            default_port,
            connect_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &TestConfig) -> Self {
        Self::new(
            config.user.clone(),
            config.identity_file.clone(),
            config.port,
            config.connect_timeout(),
        )
    }

    fn establish(&self, target: &Target) -> Result<Session, TransportError> {
        let host = target.host();
        let port = target.port_or(self.default_port);
        let tcp = connect_tcp(host, port, self.connect_timeout)?;

        let mut session = Session::new()?;
        session.set_timeout(u32::try_from(self.connect_timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(tcp);
        session.handshake()?;
        debug!(host, port, "handshake complete");

        let auth = match &self.identity_file {
            Some(key) => session.userauth_pubkey_file(&self.user, None, key, None),
            None => session.userauth_agent(&self.user),
        };
        if let Err(e) = auth {
            debug!(error = %e, "authentication rejected");
        }
        if !session.authenticated() {
            return Err(TransportError::Auth {
                user: self.user.clone(),
                host: host.to_string(),
            });
        }
        // Commands may run for as long as they like once started.
        session.set_timeout(0);
        Ok(session)
    }
}

impl SessionProvider for Ssh2SessionProvider {
    fn open(&self, target: &Target) -> SessionInfo {
        let instance: InstanceInfo = target.instance.clone();
        match self.establish(target) {
            Ok(session) => SessionInfo::connected(instance, Box::new(Ssh2Connection(session))),
            Err(e) => {
                warn!(instance = %instance.id, error = %e, "could not open session");
                SessionInfo::absent(instance)
            }
        }
    }
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }
    Err(TransportError::Io(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("no address for {host}"))
    })))
}

// ── Connection ───────────────────────────────────────────────────────────────

/// An authenticated libssh2 session.
pub struct Ssh2Connection(Session);

impl Connection for Ssh2Connection {
    fn open_exec_channel(&mut self) -> Result<Box<dyn ExecChannel + Send>, TransportError> {
        self.0.set_blocking(true);
        let channel = self.0.channel_session()?;
        Ok(Box::new(Ssh2ExecChannel::new(self.0.clone(), channel)))
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.0.set_blocking(true);
        self.0.disconnect(None, "closing", None)?;
        Ok(())
    }
}

// ── Exec channel ─────────────────────────────────────────────────────────────

/// Exec channel over a libssh2 session channel.
pub struct Ssh2ExecChannel {
    session: Session,
    channel: Channel,
    command: String,
    pty: bool,
    err_sink: Option<Box<dyn Write + Send>>,
    pending: Vec<u8>,
}

impl Ssh2ExecChannel {
    fn new(session: Session, channel: Channel) -> Self {
        Self {
            session,
            channel,
            command: String::new(),
            pty: false,
            err_sink: None,
            pending: Vec::new(),
        }
    }

    /// Move whatever the remote side has already sent into `pending`, and
    /// forward stderr to the err sink. Leaves the session blocking.
    fn pump(&mut self) -> Result<(), TransportError> {
        self.session.set_blocking(false);
        let result = self.pump_nonblocking();
        self.session.set_blocking(true);
        result
    }

    fn pump_nonblocking(&mut self) -> Result<(), TransportError> {
        let mut chunk = [0u8; PUMP_CHUNK];
        loop {
            match self.channel.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }
        let mut stderr = self.channel.stderr();
        loop {
            match stderr.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    if let Some(sink) = self.err_sink.as_mut() {
                        if let Err(e) = sink.write_all(&chunk[..n]) {
                            warn!(error = %e, "failed to write remote stderr");
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl ExecChannel for Ssh2ExecChannel {
    fn set_command(&mut self, command: &str) {
        command.clone_into(&mut self.command);
    }

    fn set_pty(&mut self, enabled: bool) {
        self.pty = enabled;
    }

    fn set_err_stream(&mut self, sink: Box<dyn Write + Send>) {
        self.err_sink = Some(sink);
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        self.session.set_blocking(true);
        if self.pty {
            self.channel.request_pty(PTY_TERM, None, None)?;
        }
        self.channel.exec(&self.command)?;
        Ok(())
    }

    fn available(&mut self) -> Result<usize, TransportError> {
        self.pump()?;
        Ok(self.pending.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if self.pending.is_empty() {
            return Ok(self.channel.read(buf)?);
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    fn is_closed(&mut self) -> bool {
        if let Err(e) = self.pump() {
            warn!(error = %e, "channel read failed; treating channel as closed");
            return true;
        }
        self.channel.eof()
    }

    fn exit_status(&mut self) -> Result<i32, TransportError> {
        self.session.set_blocking(true);
        self.channel.wait_close()?;
        Ok(self.channel.exit_status()?)
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.session.set_blocking(true);
        flush_err_sink(self.err_sink.as_mut());
        self.channel.close()?;
        Ok(())
    }
}

/// Flush the local stderr sink. A failing sink is logged, never fatal.
fn flush_err_sink(sink: Option<&mut Box<dyn Write + Send>>) {
    if let Some(sink) = sink {
        if let Err(e) = sink.flush() {
            warn!(error = %e, "failed to flush remote stderr");
        }
    }
}
