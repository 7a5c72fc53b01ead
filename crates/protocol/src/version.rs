//! Protocol version handshake.
//!
//! Each side writes its local version as a 4-byte little-endian int and
//! reads the peer's. This core speaks exactly protocol 27 and rejects any
//! other value rather than negotiating a `min(lver, rver)` with a range of
//! versions — there is no "newer" or "older" version to fall back to here.

/// The only protocol version this implementation speaks.
pub const RSYNC_PROTOCOL: i32 = 27;

/// A validated protocol version. Constructing one checks equality with
/// [`RSYNC_PROTOCOL`]; this type exists so the handshake result can be
/// passed around without re-checking it at every use site.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtocolVersion(i32);

impl ProtocolVersion {
    /// The version this core negotiates and accepts.
    pub const CURRENT: Self = Self(RSYNC_PROTOCOL);

    /// Validates a version advertised by a peer.
    pub fn negotiate(peer: i32) -> crate::Result<Self> {
        if peer == RSYNC_PROTOCOL {
            Ok(Self(peer))
        } else {
            Err(crate::ProtocolError::ProtocolVersion(peer))
        }
    }

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_match() {
        assert_eq!(ProtocolVersion::negotiate(27).unwrap().as_i32(), 27);
    }

    #[test]
    fn rejects_any_other_version() {
        for v in [26, 28, 30, 0, -1] {
            assert!(ProtocolVersion::negotiate(v).is_err(), "v={v}");
        }
    }
}
