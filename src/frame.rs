// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

// Upper bound for the element vector allocated up front when parsing an array. The declared
// length comes from the client, so it is not trusted for the allocation size.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

/// Deepest array nesting accepted from a client. Parsing recurses once per level.
pub const MAX_NESTING_DEPTH: usize = 512;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("protocol error; invalid frame data type: {0}")]
    InvalidDataType(u8),
    #[error("protocol error; line is not terminated by CRLF")]
    MalformedLine,
    #[error("protocol error; invalid length {0:?}")]
    InvalidLength(String),
    #[error("protocol error; invalid integer {0:?}")]
    InvalidInteger(String),
    #[error("protocol error; bulk string is not terminated by CRLF")]
    MissingBulkTerminator,
    #[error("protocol error; invalid frame format")]
    InvalidUtf8,
    #[error("protocol error; arrays nested deeper than {MAX_NESTING_DEPTH} levels")]
    NestingTooDeep,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    /// The RESP2 null bulk string, `$-1\r\n`.
    Null,
    Array(Vec<Frame>),
    /// The RESP2 null array, `*-1\r\n`.
    NullArray,
}

// Protocol specification: https://redis.io/docs/reference/protocol-spec/
impl Frame {
    /// Builds an error reply carrying the generic `ERR` prefix.
    pub fn generic_error(message: impl fmt::Display) -> Frame {
        Frame::Error(format!("ERR {}", message))
    }

    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        Self::parse_nested(src, 0)
    }

    // `depth` counts the arrays enclosing the frame at the cursor.
    fn parse_nested(src: &mut Cursor<&[u8]>, depth: usize) -> Result<Self, Error> {
        // The first byte in an RESP-serialized payload always identifies its type.
        // Subsequent bytes constitute the type's contents.
        let first_byte = get_byte(src)?;
        let data_type = DataType::try_from(first_byte)?;

        match data_type {
            DataType::SimpleString => {
                let line = get_line(src)?;
                Ok(Frame::Simple(to_string(line)?))
            }
            DataType::SimpleError => {
                let line = get_line(src)?;
                Ok(Frame::Error(to_string(line)?))
            }
            DataType::Integer => {
                let line = get_line(src)?;
                let integer = std::str::from_utf8(line)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| Error::InvalidInteger(lossy(line)))?;

                Ok(Frame::Integer(integer))
            }
            // $<length>\r\n<data>\r\n
            DataType::BulkString => match get_length(src)? {
                None => Ok(Frame::Null),
                Some(length) => {
                    let data = get_payload(src, length)?;
                    Ok(Frame::Bulk(Bytes::copy_from_slice(data)))
                }
            },
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => match get_length(src)? {
                None => Ok(Frame::NullArray),
                Some(_) if depth >= MAX_NESTING_DEPTH => Err(Error::NestingTooDeep),
                Some(length) => {
                    let mut frames = Vec::with_capacity(length.min(MAX_PREALLOCATED_ELEMENTS));
                    for _ in 0..length {
                        let frame = Self::parse_nested(src, depth + 1)?;
                        frames.push(frame);
                    }

                    Ok(Frame::Array(frames))
                }
            },
        }
    }

    /// Appends the wire representation of the frame to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Frame::Simple(s) => {
                dst.reserve(1 + s.len() + CRLF.len());
                dst.put_u8(u8::from(DataType::SimpleString));
                dst.put_slice(s.as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Error(s) => {
                dst.reserve(1 + s.len() + CRLF.len());
                dst.put_u8(u8::from(DataType::SimpleError));
                dst.put_slice(s.as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Integer(i) => {
                dst.put_u8(u8::from(DataType::Integer));
                dst.put_slice(i.to_string().as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Bulk(bytes) => {
                let length_str = bytes.len().to_string();
                dst.reserve(1 + length_str.len() + CRLF.len() + bytes.len() + CRLF.len());
                dst.put_u8(u8::from(DataType::BulkString));
                dst.put_slice(length_str.as_bytes());
                dst.put_slice(CRLF);
                dst.put_slice(bytes);
                dst.put_slice(CRLF);
            }
            Frame::Null => {
                dst.put_u8(u8::from(DataType::BulkString));
                dst.put_slice(b"-1");
                dst.put_slice(CRLF);
            }
            Frame::Array(arr) => {
                let length_str = arr.len().to_string();
                dst.put_u8(u8::from(DataType::Array));
                dst.put_slice(length_str.as_bytes());
                dst.put_slice(CRLF);
                for frame in arr {
                    frame.encode(dst);
                }
            }
            Frame::NullArray => {
                dst.put_u8(u8::from(DataType::Array));
                dst.put_slice(b"-1");
                dst.put_slice(CRLF);
            }
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = BytesMut::new();
        self.encode(&mut bytes);
        bytes.to_vec()
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

// Used for logging only, bulk payloads are rendered lossily.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(arr) => {
                write!(f, "*{}[", arr.len())?;
                for (i, frame) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", frame)?;
                }
                write!(f, "]")
            }
            Frame::NullArray => write!(f, "*-1"),
        }
    }
}

/// Returns the line starting at the cursor, without its CRLF terminator, and moves the cursor
/// past the terminator.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let newline = buf[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    if newline == start || buf[newline - 1] != b'\r' {
        return Err(Error::MalformedLine);
    }

    src.set_position((newline + 1) as u64);

    Ok(&buf[start..newline - 1])
}

/// Reads a length header. `-1` stands for the null value of the enclosing type.
fn get_length(src: &mut Cursor<&[u8]>) -> Result<Option<usize>, Error> {
    let line = get_line(src)?;
    let length = std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::InvalidLength(lossy(line)))?;

    match length {
        -1 => Ok(None),
        length if length < 0 => Err(Error::InvalidLength(lossy(line))),
        length => usize::try_from(length)
            .map(Some)
            .map_err(|_| Error::InvalidLength(lossy(line))),
    }
}

fn get_payload<'a>(src: &mut Cursor<&'a [u8]>, length: usize) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let end = start.checked_add(length).ok_or(Error::Incomplete)?;
    if buf.len() < end + CRLF.len() {
        return Err(Error::Incomplete);
    }

    if &buf[end..end + CRLF.len()] != CRLF {
        return Err(Error::MissingBulkTerminator);
    }

    src.set_position((end + CRLF.len()) as u64);

    Ok(&buf[start..end])
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

fn to_string(bytes: &[u8]) -> Result<String, Error> {
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Debug)]
enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'*' => Ok(Self::Array),
            _ => Err(Error::InvalidDataType(byte)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
        }
    }
}
