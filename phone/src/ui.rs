use crate::CallCookie;
use futures_util::future::LocalBoxFuture;

/// The user's decision on an incoming call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingCallAnswer {
    Accept,
    Reject,
}

/// User facing side of the [`Phone`](crate::Phone)
pub trait PhoneUi {
    /// A call was accepted or placed and is being set up
    fn call_started(&mut self, cookie: CallCookie);

    /// Ask the user whether to answer an incoming call
    fn incoming_call(
        &mut self,
        caller: &str,
        cookie: CallCookie,
    ) -> LocalBoxFuture<'static, IncomingCallAnswer>;

    fn call_disconnected(&mut self, cookie: CallCookie, reason: &str);

    /// Ask the user for a user name and password
    ///
    /// Returns `None` if this UI can't ask for credentials, the future resolves to `None` if the user declined.
    fn get_auth(&mut self, _prompt: &str) -> Option<LocalBoxFuture<'static, Option<(String, String)>>> {
        None
    }

    fn status_message(&mut self, message: &str);

    fn debug_message(&mut self, message: &str);
}
