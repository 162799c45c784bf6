use std::ops::Range;

pub const BASE_HEADER_LEN: usize = 20;

// Bit ranges within the first eight bytes.
pub const VERSION_BITS: Range<usize> = 0..4;
pub const IHL_BITS: Range<usize> = 4..8;
pub const DSCP_BITS: Range<usize> = 8..14;
pub const ECN_BITS: Range<usize> = 14..16;
pub const FLAGS_BITS: Range<usize> = 48..51;
pub const FRAGMENT_OFFSET_BITS: Range<usize> = 51..64;

pub const TOTAL_LENGTH_RANGE: Range<usize> = 2..4;
pub const IDENTIFICATION_RANGE: Range<usize> = 4..6;
pub const TTL_RANGE: Range<usize> = 8..9;
pub const PROTOCOL_RANGE: Range<usize> = 9..10;
pub const CHECKSUM_RANGE: Range<usize> = 10..12;
pub const SOURCE_RANGE: Range<usize> = 12..16;
pub const DESTINATION_RANGE: Range<usize> = 16..20;

pub const IP_PROTO_ICMP: u8 = 1;
pub const IP_PROTO_TCP: u8 = 6;
pub const IP_PROTO_UDP: u8 = 17;

pub const FLAG_RESERVED: u64 = 0b100;
pub const FLAG_DONT_FRAGMENT: u64 = 0b010;
pub const FLAG_MORE_FRAGMENTS: u64 = 0b001;

/// Header length in bytes for an IHL value. IHL values below the minimum
/// still cover the base header.
pub fn header_len(ihl: u8) -> usize {
    (usize::from(ihl) * 4).max(BASE_HEADER_LEN)
}
