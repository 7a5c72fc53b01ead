use std::io::{Read, Seek, SeekFrom, Write};

use checksums::{FileDigest, Seed};
use protocol::token::{read_digest, read_token};
use protocol::{Channel, Token};
use signature::BlockSet;

use crate::error::Result;

/// Outcome of consuming one file's token stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeOutcome {
    /// The reconstructed content's digest matched the sender's.
    Verified,
    /// The digest did not match; the caller should retry at phase 2 or, if
    /// this was already phase 2, record a hard error.
    DigestMismatch,
}

/// Reads one file's token stream from `chan`, reconstructing it into
/// `output` by copying literal runs verbatim and block references from
/// `local` (the receiver's possibly-stale existing copy, seeked by byte
/// offset per block). Verifies the trailing whole-file digest.
///
/// This is the merge step of `spec.md` §4.5, steps 1-3 (short of the
/// rename/metadata commit, which is the caller's responsibility since it
/// depends on the destination path).
pub fn merge<S, L, O>(
    chan: &mut Channel<S>,
    local: &mut L,
    _blocks: &BlockSet,
    seed: Seed,
    mut output: O,
) -> Result<MergeOutcome>
where
    S: Read + Write,
    L: Read + Seek,
    O: Write,
{
    let mut digest = FileDigest::new(seed);
    let blocks = _blocks;

    loop {
        match read_token(chan)? {
            None => break,
            Some(Token::Literal(bytes)) => {
                output.write_all(&bytes)?;
                digest.update(&bytes);
            }
            Some(Token::Reference(idx)) => {
                let block = &blocks.blocks[idx];
                local.seek(SeekFrom::Start(block.offs))?;
                let mut buf = vec![0u8; block.len as usize];
                local.read_exact(&mut buf)?;
                output.write_all(&buf)?;
                digest.update(&buf);
            }
        }
    }

    let computed = digest.finalize();
    let expected = read_digest(chan)?;
    Ok(if computed == expected {
        MergeOutcome::Verified
    } else {
        MergeOutcome::DigestMismatch
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::token::{write_digest, write_end, write_token};
    use signature::BlockSet;
    use std::io::Cursor;

    fn channel(data: Vec<u8>) -> Channel<Cursor<Vec<u8>>> {
        Channel::new(Cursor::new(data), |_, _| {})
    }

    #[test]
    fn reconstructs_a_mix_of_literal_and_reference_tokens() {
        let local_copy = b"AAAABBBBCCCC".to_vec();
        let blocks = BlockSet::build(&local_copy, 4, 16, 5);

        let mut wire = channel(Vec::new());
        write_token(&mut wire, &Token::Reference(0)).unwrap();
        write_token(&mut wire, &Token::Literal(b"zzzz".to_vec())).unwrap();
        write_token(&mut wire, &Token::Reference(2)).unwrap();
        write_end(&mut wire).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"AAAA");
        expected.extend_from_slice(b"zzzz");
        expected.extend_from_slice(b"CCCC");
        let digest = checksums::hash_file(&expected, 5);
        write_digest(&mut wire, &digest).unwrap();

        let bytes = wire.into_inner().into_inner();
        let mut chan = channel(bytes);
        let mut local = Cursor::new(local_copy);
        let mut out = Vec::new();
        let outcome = merge(&mut chan, &mut local, &blocks, 5, &mut out).unwrap();

        assert_eq!(outcome, MergeOutcome::Verified);
        assert_eq!(out, expected);
    }

    #[test]
    fn mismatched_trailing_digest_is_reported() {
        let local_copy = b"AAAA".to_vec();
        let blocks = BlockSet::build(&local_copy, 4, 16, 0);

        let mut wire = channel(Vec::new());
        write_token(&mut wire, &Token::Reference(0)).unwrap();
        write_end(&mut wire).unwrap();
        write_digest(&mut wire, &[0u8; 16]).unwrap();

        let bytes = wire.into_inner().into_inner();
        let mut chan = channel(bytes);
        let mut local = Cursor::new(local_copy);
        let mut out = Vec::new();
        let outcome = merge(&mut chan, &mut local, &blocks, 0, &mut out).unwrap();
        assert_eq!(outcome, MergeOutcome::DigestMismatch);
    }
}
