use std::marker::PhantomData;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_SEND_TIMEOUT};
use crate::protocol::{ClientMessage, Frame, ServerMessage};
use crate::transport::Transport;

/// Size of the big-endian length prefix in front of every frame.
const LEN_PREFIX: usize = 4;

const READ_CHUNK: usize = 4096;

/// Server end of a TCP connection.
pub type ServerTcp = TcpTransport<ServerMessage, ClientMessage>;
/// Client end of a TCP connection.
pub type ClientTcp = TcpTransport<ClientMessage, ServerMessage>;

/// Length-prefixed JSON frames over a TCP stream.
pub struct TcpTransport<Out, In> {
    stream: TcpStream,
    buf: Vec<u8>,
    max_frame_size: u32,
    send_timeout: Duration,
    _marker: PhantomData<fn(Out) -> In>,
}

impl<Out: Frame, In: Frame> TcpTransport<Out, In> {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_limits(stream, DEFAULT_MAX_FRAME_SIZE, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_limits(stream: TcpStream, max_frame_size: u32, send_timeout: Duration) -> Self {
        Self {
            stream,
            buf: Vec::new(),
            max_frame_size,
            send_timeout,
            _marker: PhantomData,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Split one complete frame off the front of the read buffer.
    fn take_frame(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        if self.buf.len() < LEN_PREFIX {
            return Ok(None);
        }
        let len = u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]);
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }
        if len > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        let end = LEN_PREFIX + len as usize;
        if self.buf.len() < end {
            return Ok(None);
        }
        let frame = self.buf[LEN_PREFIX..end].to_vec();
        self.buf.drain(..end);
        Ok(Some(frame))
    }
}

#[async_trait::async_trait]
impl<Out: Frame, In: Frame> Transport<Out, In> for TcpTransport<Out, In> {
    async fn send(&mut self, msg: Out) -> anyhow::Result<()> {
        let data = msg.encode()?;
        if data.len() > self.max_frame_size as usize {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            ));
        }
        let mut frame = Vec::with_capacity(LEN_PREFIX + data.len());
        frame.extend_from_slice(&(data.len() as u32).to_be_bytes());
        frame.extend_from_slice(&data);

        let write = self.stream.write_all(&frame);
        timeout(self.send_timeout, write)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.send_timeout))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::ConnectionReset
                {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })
    }

    async fn recv(&mut self) -> anyhow::Result<In> {
        loop {
            if let Some(frame) = self.take_frame()? {
                return In::decode(&frame);
            }
            // `read` is cancel safe and the partial frame lives in `self.buf`.
            let mut chunk = [0u8; READ_CHUNK];
            let n = self.stream.read(&mut chunk).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::ConnectionReset {
                    anyhow::anyhow!("Connection reset by peer")
                } else {
                    anyhow::anyhow!("Read error: {}", e)
                }
            })?;
            if n == 0 {
                return Err(if self.buf.is_empty() {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Connection closed mid-frame")
                });
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }
}
