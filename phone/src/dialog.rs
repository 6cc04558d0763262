use crate::Error;
use std::{fmt, net::IpAddr, str::FromStr};

/// Who initiated a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl FromStr for CallDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err(Error::InvalidDirection(s.into())),
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallDirection::Inbound => f.write_str("inbound"),
            CallDirection::Outbound => f.write_str("outbound"),
        }
    }
}

/// SIP dialog of a single call, owned by the [`Phone`](crate::Phone) until the call ends
pub trait CallDialog {
    fn direction(&self) -> CallDirection;

    /// Display name or URI of the remote party
    fn caller(&self) -> String;

    /// Local address the SIP dialog is bound to, the RTP socket is created on the same address
    fn local_sip_address(&self) -> IpAddr;

    /// Whether the RTP socket should discover its public address using STUN
    fn uses_stun(&self) -> bool;

    /// Hang up, the signalling layer ends the call with [`Phone::end_call`](crate::Phone::end_call) once done
    fn drop_call(&mut self);
}

/// The SIP user agent
pub trait Signalling {
    /// Register at the given URI
    fn register(&mut self, uri: &str);

    /// Start an outbound call, its dialog is later passed to [`Phone::accept_call`](crate::Phone::accept_call)
    fn place_call(&mut self, uri: &str);
}
