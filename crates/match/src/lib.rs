//! Sender-side block matching: slides a window over a source buffer against
//! a receiver-supplied [`signature::BlockSet`] and emits a [`protocol::Token`]
//! stream.
//!
//! # Upstream reference
//!
//! `extern.h`'s `blk_match`/`blk_send` pairing, generalised here into one
//! pure function over in-memory buffers (the caller owns mapping the source
//! file and driving the token stream onto the wire).

mod index;

use checksums::{hash_slow, RollingChecksum, Seed};
use protocol::{Token, MAX_CHUNK};
use signature::BlockSet;

pub use index::BlockIndex;

/// Runs the sliding-window match of `source` against `blocks`, returning the
/// token stream that reconstructs `source` on the receiver.
///
/// `blocks.csum` controls how many strong-checksum bytes are compared: 2 for
/// a phase 1 pass, 16 for phase 2.
#[must_use]
pub fn generate_tokens(source: &[u8], blocks: &BlockSet, seed: Seed) -> Vec<Token> {
    let mut tokens = Vec::new();
    if blocks.blocks.is_empty() || blocks.len == 0 {
        if !source.is_empty() {
            push_literal(&mut tokens, source);
        }
        return tokens;
    }

    let index = BlockIndex::build(blocks);
    let window_len = blocks.len as usize;
    let n = source.len();
    let mut literal_start = 0usize;
    let mut pos = 0usize;

    if n < window_len {
        if n > 0 {
            push_literal(&mut tokens, &source[literal_start..n]);
        }
        return tokens;
    }

    let mut rolling = RollingChecksum::of(&source[0..window_len]);

    loop {
        let window = &source[pos..pos + window_len];
        if let Some(block_idx) = index.find_match(rolling.value(), window, blocks, seed) {
            if literal_start < pos {
                push_literal(&mut tokens, &source[literal_start..pos]);
            }
            tokens.push(Token::Reference(block_idx));
            pos += window_len;
            literal_start = pos;
            if pos + window_len > n {
                break;
            }
            rolling = RollingChecksum::of(&source[pos..pos + window_len]);
        } else {
            if pos + window_len >= n {
                pos += 1;
                break;
            }
            let old = source[pos];
            let new = source[pos + window_len];
            rolling.roll(old, new);
            pos += 1;
        }
    }

    if literal_start < n {
        push_literal(&mut tokens, &source[literal_start..n]);
    }

    tokens
}

fn push_literal(tokens: &mut Vec<Token>, bytes: &[u8]) {
    for chunk in bytes.chunks(MAX_CHUNK) {
        tokens.push(Token::Literal(chunk.to_vec()));
    }
}
