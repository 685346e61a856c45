use std::marker::PhantomData;

use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, Frame, ServerMessage};
use crate::transport::Transport;

/// Server end of an in-memory connection.
pub type ServerMemory = InMemoryTransport<ServerMessage, ClientMessage>;
/// Client end of an in-memory connection.
pub type ClientMemory = InMemoryTransport<ClientMessage, ServerMessage>;

/// Encoded frames passed over a pair of unbounded channels.
pub struct InMemoryTransport<Out, In> {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    _marker: PhantomData<fn(Out) -> In>,
}

impl<Out: Frame, In: Frame> InMemoryTransport<Out, In> {
    pub fn pair() -> (Self, InMemoryTransport<In, Out>) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                tx: tx1,
                rx: rx2,
                _marker: PhantomData,
            },
            InMemoryTransport {
                tx: tx2,
                rx: rx1,
                _marker: PhantomData,
            },
        )
    }

    /// Push an arbitrary frame body to the peer, bypassing the encoder.
    pub fn send_raw(&mut self, bytes: impl Into<Vec<u8>>) -> anyhow::Result<()> {
        self.tx
            .send(bytes.into())
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }
}

#[async_trait::async_trait]
impl<Out: Frame, In: Frame> Transport<Out, In> for InMemoryTransport<Out, In> {
    async fn send(&mut self, msg: Out) -> anyhow::Result<()> {
        let bytes = msg.encode()?;
        self.send_raw(bytes)
    }

    async fn recv(&mut self) -> anyhow::Result<In> {
        let bytes = self
            .rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))?;
        In::decode(&bytes)
    }
}
