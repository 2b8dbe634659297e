use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Error;

/// A client connection, reading and writing whole frames.
pub struct Connection<T = TcpStream> {
    pub id: Uuid,
    // Data is read from the socket into the codec's read buffer. When a frame is parsed, the
    // corresponding data is removed from the buffer.
    framed: Framed<T, FrameCodec>,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: T) -> Connection<T> {
        Self::with_codec(stream, FrameCodec::default())
    }

    pub fn with_codec(stream: T, codec: FrameCodec) -> Connection<T> {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, codec),
        }
    }

    /// Reads the next frame. `Ok(None)` means the peer closed the stream cleanly, between two
    /// frames. A stream closing in the middle of a frame is an error.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.framed.next().await.transpose()
    }

    /// Writes a frame and flushes it to the socket.
    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.framed.send(frame).await
    }
}
