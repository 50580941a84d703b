//! Packet flag bits.
//!
//! [`PacketFlags`] is a plain struct of booleans rather than a `bitflags!`
//! set because Compact splits the flags non-contiguously across two bytes
//! (three bits borrowed from byte 0 alongside mode/type, two more from byte
//! 1 alongside the TTL nibble) while Standard packs all seven into one
//! contiguous byte. `bitflags!` models a single contiguous bitset; it has
//! no way to express "these three bits live in byte 0, these two in byte
//! 1, and two flags don't exist in this variant at all."

/// The set of boolean flags a packet may carry.
///
/// `is_fragment` and `more_fragments` are only representable in
/// [`crate::header::standard::StandardHeader`] — Compact's 5 flag bits
/// (3 in byte 0, 2 in byte 1) are fully spoken for by the other five
/// flags, so a Compact header can never describe a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketFlags {
    /// Packet should be relayed across the mesh rather than consumed only
    /// by the receiving node.
    pub mesh: bool,
    /// Sender requests an ACK payload in response.
    pub ack_requested: bool,
    /// Payload region is an AEAD ciphertext (security mode != None).
    pub encrypted: bool,
    /// Payload bytes are compressed before any encryption step.
    pub compressed: bool,
    /// Elevated relay priority (e.g. an SOS beacon).
    pub urgent: bool,
    /// This packet is one fragment of a larger logical message.
    pub is_fragment: bool,
    /// Further fragments follow this one.
    pub more_fragments: bool,
}

impl PacketFlags {
    /// Encode all seven flags into the Standard header's single flags
    /// byte. Bit 7 is the most significant flag listed below; bit 0 is
    /// reserved and always cleared.
    #[must_use]
    pub fn to_standard_byte(self) -> u8 {
        (u8::from(self.mesh) << 7)
            | (u8::from(self.ack_requested) << 6)
            | (u8::from(self.encrypted) << 5)
            | (u8::from(self.compressed) << 4)
            | (u8::from(self.urgent) << 3)
            | (u8::from(self.is_fragment) << 2)
            | (u8::from(self.more_fragments) << 1)
    }

    /// Decode a Standard header's flags byte.
    #[must_use]
    pub fn from_standard_byte(byte: u8) -> Self {
        Self {
            mesh: byte & 0x80 != 0,
            ack_requested: byte & 0x40 != 0,
            encrypted: byte & 0x20 != 0,
            compressed: byte & 0x10 != 0,
            urgent: byte & 0x08 != 0,
            is_fragment: byte & 0x04 != 0,
            more_fragments: byte & 0x02 != 0,
        }
    }

    /// Encode `{mesh, ack_requested, encrypted}` into the low 3 bits of
    /// Compact's byte 0 (bits 2..0, below the mode/type bits).
    #[must_use]
    pub fn to_compact_byte0_bits(self) -> u8 {
        (u8::from(self.mesh) << 2) | (u8::from(self.ack_requested) << 1) | u8::from(self.encrypted)
    }

    /// Encode `{compressed, urgent}` into bits 3..2 of Compact's byte 1
    /// (below the TTL nibble, above the 2 reserved low bits).
    #[must_use]
    pub fn to_compact_byte1_bits(self) -> u8 {
        (u8::from(self.compressed) << 3) | (u8::from(self.urgent) << 2)
    }

    /// Decode Compact's flag bits back into a [`PacketFlags`].
    /// `is_fragment`/`more_fragments` are always `false`: Compact has no
    /// bits left to carry them.
    #[must_use]
    pub fn from_compact_bits(byte0_low3: u8, byte1_bits_3_2: u8) -> Self {
        Self {
            mesh: byte0_low3 & 0b100 != 0,
            ack_requested: byte0_low3 & 0b010 != 0,
            encrypted: byte0_low3 & 0b001 != 0,
            compressed: byte1_bits_3_2 & 0b1000 != 0,
            urgent: byte1_bits_3_2 & 0b0100 != 0,
            is_fragment: false,
            more_fragments: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arbitrary_flags() -> impl Strategy<Value = PacketFlags> {
        any::<(bool, bool, bool, bool, bool, bool, bool)>().prop_map(
            |(mesh, ack_requested, encrypted, compressed, urgent, is_fragment, more_fragments)| PacketFlags {
                mesh,
                ack_requested,
                encrypted,
                compressed,
                urgent,
                is_fragment,
                more_fragments,
            },
        )
    }

    #[test]
    fn standard_byte_roundtrip_all_set() {
        let flags = PacketFlags {
            mesh: true,
            ack_requested: true,
            encrypted: true,
            compressed: true,
            urgent: true,
            is_fragment: true,
            more_fragments: true,
        };
        assert_eq!(PacketFlags::from_standard_byte(flags.to_standard_byte()), flags);
    }

    #[test]
    fn standard_byte_reserved_bit_is_always_clear() {
        let flags = PacketFlags {
            mesh: true,
            ack_requested: true,
            encrypted: true,
            compressed: true,
            urgent: true,
            is_fragment: true,
            more_fragments: true,
        };
        assert_eq!(flags.to_standard_byte() & 0x01, 0);
    }

    #[test]
    fn compact_bits_cannot_express_fragmentation() {
        let flags = PacketFlags { is_fragment: true, more_fragments: true, ..Default::default() };
        let byte0 = flags.to_compact_byte0_bits();
        let byte1 = flags.to_compact_byte1_bits();
        let decoded = PacketFlags::from_compact_bits(byte0, byte1);
        assert!(!decoded.is_fragment);
        assert!(!decoded.more_fragments);
    }

    proptest! {
        #[test]
        fn standard_byte_roundtrips(flags in arbitrary_flags()) {
            prop_assert_eq!(PacketFlags::from_standard_byte(flags.to_standard_byte()), flags);
        }

        #[test]
        fn compact_bits_roundtrip_representable_subset(flags in arbitrary_flags()) {
            let byte0 = flags.to_compact_byte0_bits();
            let byte1 = flags.to_compact_byte1_bits();
            let decoded = PacketFlags::from_compact_bits(byte0, byte1);
            prop_assert_eq!(decoded.mesh, flags.mesh);
            prop_assert_eq!(decoded.ack_requested, flags.ack_requested);
            prop_assert_eq!(decoded.encrypted, flags.encrypted);
            prop_assert_eq!(decoded.compressed, flags.compressed);
            prop_assert_eq!(decoded.urgent, flags.urgent);
        }
    }
}
