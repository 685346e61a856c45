use crate::protocol::Frame;

/// A bidirectional message channel to one peer.
///
/// `recv` must be cancel safe: a connection task polls it inside
/// `tokio::select!` alongside its outbound queue, and dropping a pending
/// `recv` must not lose a partially received frame.
#[async_trait::async_trait]
pub trait Transport<Out: Frame, In: Frame>: Send {
    async fn send(&mut self, msg: Out) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<In>;
}

pub mod in_memory;
pub mod tcp;
