use crate::{CallCookie, CallDialog, IncomingCallAnswer, RtpTransport};
use codec::AudioFormat;
use futures_util::future::LocalBoxFuture;
use std::{
    fmt,
    future::Future,
    io,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Setup,
    Negotiating,
    Started,
}

/// Everything the phone knows about a single call
pub(crate) struct Call {
    pub(crate) dialog: Box<dyn CallDialog>,
    pub(crate) transport: Box<dyn RtpTransport>,
    pub(crate) phase: Phase,

    /// Negotiated format and the payload type the remote uses for it
    pub(crate) format: Option<(AudioFormat, u8)>,

    /// Address the RTP socket is reachable at
    pub(crate) local_rtp: Option<SocketAddr>,
}

/// Result of the asynchronous part of a call's setup
///
/// Must be passed to [`Phone::finish_setup`](crate::Phone::finish_setup).
#[derive(Debug)]
pub struct CallSetup {
    pub(crate) cookie: CallCookie,
    pub(crate) socket: io::Result<SocketAddr>,
    /// Only set for incoming calls
    pub(crate) answer: Option<IncomingCallAnswer>,
}

impl CallSetup {
    pub fn cookie(&self) -> CallCookie {
        self.cookie
    }
}

/// A call that is waiting for its RTP socket, and for incoming calls the user's answer
///
/// Resolves to a [`CallSetup`]. Awaiting it doesn't borrow the phone, so other calls can be handled meanwhile.
pub struct PendingCall {
    pub(crate) cookie: CallCookie,
    pub(crate) setup: LocalBoxFuture<'static, CallSetup>,
}

impl PendingCall {
    pub fn cookie(&self) -> CallCookie {
        self.cookie
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}

impl Future for PendingCall {
    type Output = CallSetup;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.setup.as_mut().poll(cx)
    }
}
