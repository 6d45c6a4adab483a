//! Error and Result types used throughout dynwm.
use crate::Xid;
use thiserror::Error;

/// A window manager level error.
#[derive(Debug, Error)]
pub enum Error {
    /// Another window manager already holds `SubstructureRedirectMask` on the root window.
    #[error("another window manager is already running")]
    OtherWmRunning,

    /// The X server connection could not be opened.
    #[error("unable to open connection to the X server")]
    DisplayOpenFailed,

    /// No screens were reported by the server / Xinerama query.
    #[error("no screens were found")]
    NoScreens,

    /// A raw protocol error that was not one of the recoverable race classes in spec §7.
    #[error("X protocol error: {0}")]
    X11(String),

    /// Attempted to operate on a window that is not currently managed.
    #[error("window {0} is not a managed client")]
    UnknownClient(Xid),

    /// Attempted to operate on a tag index outside of the configured range.
    #[error("tag index {0} is out of range (max {max})", max = crate::tagset::NUM_TAGS)]
    TagOutOfRange(usize),

    /// More than the maximum supported number of user tags was configured.
    #[error("configured {0} user tags, but at most {max} are supported", max = crate::tagset::NUM_TAGS)]
    TooManyTags(usize),

    /// A rule referenced a monitor index that does not exist.
    #[error("rule references monitor {0}, which does not exist")]
    UnknownMonitor(usize),

    /// The session file could not be read or written.
    #[error("session file error: {0}")]
    Session(String),

    /// A config/resource value could not be parsed.
    #[error("invalid configuration value for '{0}': {1}")]
    InvalidConfig(String, String),

    /// Spawning an external process (autostart, layout menu) failed.
    #[error("failed to spawn '{0}': {1}")]
    Spawn(String, std::io::Error),

    /// A [`MockXConn`](crate::x::MockXConn) method was called without an override.
    #[error("mock XConn method was not implemented")]
    UnimplementedMock,
}

/// The crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "x11rb")]
mod x11rb_conversions {
    use super::Error;

    impl From<::x11rb::errors::ConnectError> for Error {
        fn from(e: ::x11rb::errors::ConnectError) -> Self {
            Error::X11(e.to_string())
        }
    }

    impl From<::x11rb::errors::ConnectionError> for Error {
        fn from(e: ::x11rb::errors::ConnectionError) -> Self {
            Error::X11(e.to_string())
        }
    }

    impl From<::x11rb::errors::ReplyError> for Error {
        fn from(e: ::x11rb::errors::ReplyError) -> Self {
            Error::X11(e.to_string())
        }
    }

    impl From<::x11rb::errors::ReplyOrIdError> for Error {
        fn from(e: ::x11rb::errors::ReplyOrIdError) -> Self {
            Error::X11(e.to_string())
        }
    }
}
