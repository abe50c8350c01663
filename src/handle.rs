// Reads and writes War frames on a TcpStream
use crate::error::WarError;
use crate::frame::{
    decode_game_start, decode_play_card, decode_play_result, decode_want_game, Command, Frame,
    Outcome,
};
use crate::game::Hand;
use bytes::{Bytes, BytesMut};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

pub struct Handle {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    peer: Option<SocketAddr>,
}

impl Handle {
    pub fn new(socket: TcpStream) -> io::Result<Handle> {
        let peer = socket.peer_addr().ok();

        Ok(Handle {
            reader: BufReader::new(socket.try_clone()?),
            writer: BufWriter::new(socket),
            peer,
        })
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Bounds every read and write. `None` blocks forever.
    pub fn set_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)
    }

    // Blocks until exactly `len` bytes arrive; EOF before that is a framing error
    pub fn read_exact(&mut self, len: usize) -> Result<Bytes, WarError> {
        let mut buf = BytesMut::zeroed(len);
        let mut received = 0;

        while received < len {
            match self.reader.read(&mut buf[received..]) {
                Ok(0) => {
                    return Err(WarError::Framing {
                        expected: len,
                        received,
                    })
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(buf.freeze())
    }

    pub fn read_frame(&mut self, expected: Command) -> Result<Frame, WarError> {
        let bytes = self.read_exact(expected.frame_len())?;
        Frame::decode(expected, bytes)
    }

    pub fn read_want_game(&mut self) -> Result<(), WarError> {
        decode_want_game(self.read_exact(Command::WantGame.frame_len())?)
    }

    pub fn read_game_start(&mut self) -> Result<Hand, WarError> {
        decode_game_start(self.read_exact(Command::GameStart.frame_len())?)
    }

    pub fn read_play_card(&mut self) -> Result<u8, WarError> {
        decode_play_card(self.read_exact(Command::PlayCard.frame_len())?)
    }

    pub fn read_play_result(&mut self) -> Result<Outcome, WarError> {
        decode_play_result(self.read_exact(Command::PlayResult.frame_len())?)
    }

    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), WarError> {
        self.writer.write_all(&frame.to_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Tears the connection down in both directions. Errors are ignored, the
    /// peer may already be gone.
    pub fn shutdown(self) {
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
    }
}
