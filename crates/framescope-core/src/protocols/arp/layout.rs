pub const HARDWARE_TYPE_RANGE: std::ops::Range<usize> = 0..2;
pub const PROTOCOL_TYPE_RANGE: std::ops::Range<usize> = 2..4;
pub const HARDWARE_LEN_OFFSET: usize = 4;
pub const PROTOCOL_LEN_OFFSET: usize = 5;
pub const OPERATION_RANGE: std::ops::Range<usize> = 6..8;
pub const FIXED_LEN: usize = 8;

pub const HTYPE_ETHERNET: u16 = 1;
pub const MAC_LEN: usize = 6;
pub const IPV4_LEN: usize = 4;

pub const OP_REQUEST: u16 = 1;
pub const OP_REPLY: u16 = 2;

/// Length of the whole ARP body for the given address lengths.
pub fn body_len(hardware_len: u8, protocol_len: u8) -> usize {
    FIXED_LEN + 2 * usize::from(hardware_len) + 2 * usize::from(protocol_len)
}
