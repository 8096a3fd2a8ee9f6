// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied argument is out of range.
    ///
    /// Occurs when a scale factor is not a positive finite number,
    /// when a size cap is zero or when the document has no usable size.
    InvalidArgument(String),

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// Failed to parse an XML data or the root element is not `svg`.
    ParsingFailed(roxmltree::Error),

    /// The SVG document was rejected by `usvg`.
    InvalidSvg(usvg::Error),

    /// Failed to allocate or draw the target bitmap.
    RenderingFailed(String),

    /// An I/O error.
    Io(std::io::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl From<usvg::Error> for Error {
    fn from(e: usvg::Error) -> Self {
        match e {
            usvg::Error::NotAnUtf8Str => Error::NotAnUtf8Str,
            usvg::Error::MalformedGZip => Error::MalformedGZip,
            e => Error::InvalidSvg(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InvalidArgument(ref msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::InvalidSvg(ref e) => {
                write!(f, "{}", e)
            }
            Error::RenderingFailed(ref msg) => {
                write!(f, "rendering failed cause {}", msg)
            }
            Error::Io(ref e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::ParsingFailed(ref e) => Some(e),
            Error::InvalidSvg(ref e) => Some(e),
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
