//! Token stream: the delta a sender emits and a receiver consumes for one
//! file. See design §3 "Token stream (delta)".

use std::io::{Read, Write};

use crate::channel::Channel;
use crate::error::Result;

/// One record in a token stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// A run of bytes the receiver has no local copy of.
    Literal(Vec<u8>),
    /// A reference to block `index` in the receiver's block set.
    Reference(usize),
}

/// Writes one token: a literal as `len` (positive i32) + bytes, a reference
/// as `-(index + 1)` (negative i32). Does not write the terminating zero —
/// call [`write_end`] once the whole file has been processed.
pub fn write_token<S: Read + Write>(chan: &mut Channel<S>, token: &Token) -> Result<()> {
    match token {
        Token::Literal(bytes) => {
            debug_assert!(!bytes.is_empty(), "empty literal runs should be skipped");
            chan.write_int(i32::try_from(bytes.len()).expect("literal run fits in i32"))?;
            chan.write_buf(bytes)
        }
        Token::Reference(index) => {
            let count = -(i32::try_from(*index).expect("block index fits in i32") + 1);
            chan.write_int(count)
        }
    }
}

/// Writes the zero count that terminates a token stream.
pub fn write_end<S: Read + Write>(chan: &mut Channel<S>) -> Result<()> {
    chan.write_int(0)
}

/// Reads one token, or `None` if the terminating zero count was read.
pub fn read_token<S: Read + Write>(chan: &mut Channel<S>) -> Result<Option<Token>> {
    let count = chan.read_int()?;
    if count == 0 {
        return Ok(None);
    }
    if count > 0 {
        let bytes = chan.read_buf_exact(count as usize)?;
        Ok(Some(Token::Literal(bytes)))
    } else {
        let index = (-count - 1) as usize;
        Ok(Some(Token::Reference(index)))
    }
}

/// Writes the 16-byte whole-file digest that follows the terminating zero.
pub fn write_digest<S: Read + Write>(chan: &mut Channel<S>, digest: &[u8; 16]) -> Result<()> {
    chan.write_buf(digest)
}

/// Reads the 16-byte whole-file digest that follows the terminating zero.
pub fn read_digest<S: Read + Write>(chan: &mut Channel<S>) -> Result<[u8; 16]> {
    let bytes = chan.read_buf_exact(16)?;
    Ok(bytes.try_into().expect("read_buf_exact(16) returns 16 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn channel(data: Vec<u8>) -> Channel<Cursor<Vec<u8>>> {
        Channel::new(Cursor::new(data), |_, _| {})
    }

    #[test]
    fn round_trips_literal_then_reference_then_end_then_digest() {
        let mut buf = Vec::new();
        {
            let mut chan = channel(Vec::new());
            write_token(&mut chan, &Token::Literal(b"hi".to_vec())).unwrap();
            write_token(&mut chan, &Token::Reference(3)).unwrap();
            write_end(&mut chan).unwrap();
            write_digest(&mut chan, &[7u8; 16]).unwrap();
            buf = chan.into_inner().into_inner();
        }
        let mut chan = channel(buf);
        assert_eq!(
            read_token(&mut chan).unwrap(),
            Some(Token::Literal(b"hi".to_vec()))
        );
        assert_eq!(read_token(&mut chan).unwrap(), Some(Token::Reference(3)));
        assert_eq!(read_token(&mut chan).unwrap(), None);
        assert_eq!(read_digest(&mut chan).unwrap(), [7u8; 16]);
    }
}
