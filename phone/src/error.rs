use crate::CallCookie;
use audio::MediaError;
use codec::CodecError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnsupportedFormat(#[from] CodecError),
    #[error("no audio format supported by both sides")]
    NoUsableFormat,
    #[error("no call with cookie {0:?}")]
    UnknownCall(CallCookie),
    #[error("call {requested:?} is not the current call ({current:?})")]
    NotCurrentCall {
        current: Option<CallCookie>,
        requested: CallCookie,
    },
    #[error("RTP socket of call {0:?} has not been created yet")]
    TransportNotReady(CallCookie),
    #[error("incoming call {0:?} was rejected")]
    Rejected(CallCookie),
    #[error("remote SDP has no connection address")]
    MissingConnectionAddress,
    #[error("unknown call direction {0:?}")]
    InvalidDirection(String),
    #[error("{0:?} is not a DTMF digit")]
    InvalidDtmfDigit(char),
    #[error("no credentials available for {0}")]
    NoCredentials(String),
    #[error("no signalling configured")]
    NoSignalling,
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
