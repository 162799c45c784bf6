use std::ops::Range;

pub const PREFIX_LEN: usize = 4;
pub const TYPE_OFFSET: usize = 0;
pub const CODE_OFFSET: usize = 1;
pub const CHECKSUM_RANGE: Range<usize> = 2..4;

pub const IDENTIFIER_RANGE: Range<usize> = 4..6;
pub const SEQUENCE_RANGE: Range<usize> = 6..8;
pub const ORIGINATE_RANGE: Range<usize> = 8..12;
pub const RECEIVE_RANGE: Range<usize> = 12..16;
pub const TRANSMIT_RANGE: Range<usize> = 16..20;
pub const POINTER_RANGE: Range<usize> = 4..5;
pub const PARAMETER_UNUSED_RANGE: Range<usize> = 5..8;
pub const ERROR_UNUSED_RANGE: Range<usize> = 4..8;
pub const BODY_OFFSET: usize = 8;

pub const TYPE_ECHO_REPLY: u8 = 0;
pub const TYPE_DESTINATION_UNREACHABLE: u8 = 3;
pub const TYPE_SOURCE_QUENCH: u8 = 4;
pub const TYPE_REDIRECT: u8 = 5;
pub const TYPE_ECHO_REQUEST: u8 = 8;
pub const TYPE_TIME_EXCEEDED: u8 = 11;
pub const TYPE_PARAMETER_PROBLEM: u8 = 12;
pub const TYPE_TIMESTAMP: u8 = 13;
pub const TYPE_TIMESTAMP_REPLY: u8 = 14;

/// Milliseconds in a day; larger timestamps are non-standard.
pub const MILLIS_PER_DAY: u32 = 86_400_000;
/// High-order bit flagging a non-standard timestamp.
pub const NON_STANDARD_TIMESTAMP: u32 = 0x8000_0000;

/// Field layout selected by the message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLayout {
    /// Identifier, sequence number, data.
    Echo,
    /// Identifier, sequence number, three timestamps.
    Timestamp,
    /// Pointer, unused, original datagram.
    ParameterProblem,
    /// Unused, original datagram.
    Error,
    /// Prefix only.
    Other,
}

impl MessageLayout {
    pub fn for_type(message_type: u8) -> Self {
        match message_type {
            TYPE_ECHO_REPLY | TYPE_ECHO_REQUEST => MessageLayout::Echo,
            TYPE_TIMESTAMP | TYPE_TIMESTAMP_REPLY => MessageLayout::Timestamp,
            TYPE_PARAMETER_PROBLEM => MessageLayout::ParameterProblem,
            TYPE_DESTINATION_UNREACHABLE | TYPE_SOURCE_QUENCH | TYPE_REDIRECT | TYPE_TIME_EXCEEDED => {
                MessageLayout::Error
            }
            _ => MessageLayout::Other,
        }
    }

    /// Shortest region that can hold the message.
    pub fn min_len(self) -> usize {
        match self {
            MessageLayout::Echo | MessageLayout::ParameterProblem | MessageLayout::Error => 8,
            MessageLayout::Timestamp => 20,
            MessageLayout::Other => PREFIX_LEN,
        }
    }
}
