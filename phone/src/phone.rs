use crate::{
    CallCookie, CallDialog, CallDirection, CallState, Error, IncomingCallAnswer, PhoneConfig, PhoneUi, RtpPacket,
    RtpTransportFactory, Signalling,
    call::{Call, CallSetup, PendingCall, Phase},
    sdp::{MediaDescription, MediaType, SessionDescription},
    validate_dtmf_digit,
};
use audio::{AudioBackend, MediaLayer};
use codec::{AudioFormat, AudioPacket, CodecLibrary, MediaSample};
use futures_util::{
    FutureExt,
    future::{self, LocalBoxFuture},
};
use slotmap::SlotMap;
use std::time::{Duration, Instant};

/// Order of the formats in the local SDP, telephone-event is always added last
const OFFER_ORDER: [AudioFormat; 4] = [
    AudioFormat::Gsm,
    AudioFormat::Pcmu,
    AudioFormat::Speex,
    AudioFormat::Dvi4,
];

/// Call session of a softphone
///
/// Owns all calls, their RTP transports and the audio device. At most one call is current, only the current call's
/// audio is played back and captured.
///
/// All methods are expected to be called from a single task. Long running parts of the call setup are returned as
/// [`PendingCall`] and must be completed using [`finish_setup`](Self::finish_setup).
pub struct Phone {
    config: PhoneConfig,
    library: CodecLibrary,

    ui: Box<dyn PhoneUi>,
    signalling: Option<Box<dyn Signalling>>,
    audio_backend: Box<dyn AudioBackend>,
    transports: Box<dyn RtpTransportFactory>,

    /// Acquired with the first call
    media: Option<MediaLayer>,

    calls: SlotMap<CallCookie, Call>,
    current: Option<CallCookie>,
    muted: bool,
}

impl Phone {
    pub fn new(
        config: PhoneConfig,
        library: CodecLibrary,
        ui: Box<dyn PhoneUi>,
        audio_backend: Box<dyn AudioBackend>,
        transports: Box<dyn RtpTransportFactory>,
    ) -> Self {
        Self {
            config,
            library,
            ui,
            signalling: None,
            audio_backend,
            transports,
            media: None,
            calls: SlotMap::with_key(),
            current: None,
            muted: false,
        }
    }

    pub fn set_signalling(&mut self, signalling: Box<dyn Signalling>) {
        self.signalling = Some(signalling);
    }

    pub fn config(&self) -> &PhoneConfig {
        &self.config
    }

    /// The media layer, available after the first call has been accepted
    pub fn media(&self) -> Option<&MediaLayer> {
        self.media.as_ref()
    }

    pub fn media_mut(&mut self) -> Option<&mut MediaLayer> {
        self.media.as_mut()
    }

    /// Register at the configured register URI, does nothing if there is none
    pub fn register(&mut self) -> Result<(), Error> {
        let Some(uri) = &self.config.register_uri else {
            log::debug!("no register uri configured, not registering");
            return Ok(());
        };

        self.signalling
            .as_mut()
            .ok_or(Error::NoSignalling)?
            .register(uri);

        Ok(())
    }

    /// Call the given URI, the dialog is passed to [`accept_call`](Self::accept_call) by the signalling layer
    pub fn place_call(&mut self, uri: &str) -> Result<(), Error> {
        self.signalling
            .as_mut()
            .ok_or(Error::NoSignalling)?
            .place_call(uri);

        Ok(())
    }

    /// Credentials to answer an authentication challenge of `realm` for `method` on `uri`
    ///
    /// The configured credentials are used unless this is a `retry` after they were rejected, then the UI is asked.
    pub fn auth_cred(
        &mut self,
        method: &str,
        uri: &str,
        realm: &str,
        retry: bool,
    ) -> LocalBoxFuture<'static, Result<(String, String), Error>> {
        if !retry
            && let (Some(user), Some(password)) = (&self.config.auth_user, &self.config.auth_password)
        {
            return future::ready(Ok((user.clone(), password.clone()))).boxed_local();
        }

        let prompt = format!("Auth needed for {method} {uri}, realm '{realm}'");

        match self.ui.get_auth(&prompt) {
            Some(answer) => answer
                .map(move |credentials| credentials.ok_or(Error::NoCredentials(prompt)))
                .boxed_local(),
            None => {
                log::warn!("no credentials configured and the UI can't ask for them");
                future::ready(Err(Error::NoCredentials(prompt))).boxed_local()
            }
        }
    }

    /// Ask the remote to end the call, does nothing for unknown calls
    pub fn drop_call(&mut self, cookie: CallCookie) {
        if let Some(call) = self.calls.get_mut(cookie) {
            call.dialog.drop_call();
        }
    }

    /// Take over a new call from the signalling layer
    ///
    /// The returned [`PendingCall`] resolves once the RTP socket has been created and, for incoming calls, the UI
    /// answered the call. Its output must be passed to [`finish_setup`](Self::finish_setup).
    pub fn accept_call(&mut self, dialog: Box<dyn CallDialog>) -> Result<PendingCall, Error> {
        self.open_audio_device()?;

        let direction = dialog.direction();
        let local_ip = dialog.local_sip_address();
        let use_stun = dialog.uses_stun();
        let caller = dialog.caller();

        let transports = &mut self.transports;
        let cookie = self.calls.insert_with_key(|cookie| Call {
            dialog,
            transport: transports.create(cookie),
            phase: Phase::Setup,
            format: None,
            local_rtp: None,
        });

        log::debug!("accepted {direction} call {cookie:?} with {caller}");

        let socket = self.calls[cookie]
            .transport
            .create_socket(local_ip, use_stun);

        self.ui.call_started(cookie);

        let setup = match direction {
            CallDirection::Inbound => {
                let answer = self.ui.incoming_call(&caller, cookie);

                future::join(socket, answer)
                    .map(move |(socket, answer)| CallSetup {
                        cookie,
                        socket,
                        answer: Some(answer),
                    })
                    .boxed_local()
            }
            CallDirection::Outbound => socket
                .map(move |socket| CallSetup {
                    cookie,
                    socket,
                    answer: None,
                })
                .boxed_local(),
        };

        Ok(PendingCall { cookie, setup })
    }

    /// Complete the setup of a call started with [`accept_call`](Self::accept_call)
    ///
    /// If the call was ended while the setup was pending, the setup is ignored and [`Error::UnknownCall`] returned.
    /// A failed socket creation or a rejected incoming call ends the call.
    pub fn finish_setup(&mut self, setup: CallSetup) -> Result<CallCookie, Error> {
        let CallSetup {
            cookie,
            socket,
            answer,
        } = setup;

        if !self.calls.contains_key(cookie) {
            log::debug!("ignoring setup of call {cookie:?}, it ended while the setup was pending");
            return Err(Error::UnknownCall(cookie));
        }

        let local_rtp = match socket {
            Ok(local_rtp) => local_rtp,
            Err(e) => {
                log::warn!("failed to create RTP socket for call {cookie:?}, {e}");
                self.end_call(cookie, "failed to create RTP socket");
                return Err(Error::Io(e));
            }
        };

        if answer == Some(IncomingCallAnswer::Reject) {
            self.end_call(cookie, "rejected");
            return Err(Error::Rejected(cookie));
        }

        let call = &mut self.calls[cookie];
        call.local_rtp = Some(local_rtp);
        call.phase = Phase::Negotiating;

        log::debug!("call {cookie:?} RTP socket at {local_rtp}");

        Ok(cookie)
    }

    /// Choose the audio format of a call from the remote's SDP
    ///
    /// Takes the first format of the configured preference which is supported locally, by the call's transport and
    /// offered by the remote.
    pub fn select_format(
        &mut self,
        cookie: CallCookie,
        remote: &SessionDescription,
    ) -> Result<AudioFormat, Error> {
        let call = self
            .calls
            .get_mut(cookie)
            .ok_or(Error::UnknownCall(cookie))?;

        let remote_audio = remote.audio().ok_or(Error::NoUsableFormat)?;

        for &format in &self.config.format_preference {
            if !self.library.is_known(format) || !call.transport.supports_format(format) {
                continue;
            }

            if let Some(remote_pt) = remote_audio.payload_type_of(format) {
                log::debug!("call {cookie:?} uses {format} with payload type {remote_pt}");

                call.format = Some((format, remote_pt));
                return Ok(format);
            }
        }

        log::warn!("no usable format in remote SDP for call {cookie:?}");

        Err(Error::NoUsableFormat)
    }

    /// The negotiated format of a call and the payload type to send it with
    pub fn negotiated_format(&self, cookie: CallCookie) -> Option<(AudioFormat, u8)> {
        self.calls.get(cookie)?.format
    }

    /// Create the local SDP of a call
    ///
    /// Lists the formats the audio device supports followed by telephone-event.
    pub fn get_sdp(&self, cookie: CallCookie) -> Result<SessionDescription, Error> {
        let call = self.calls.get(cookie).ok_or(Error::UnknownCall(cookie))?;

        let address = call
            .transport
            .visible_address()
            .or(call.local_rtp)
            .ok_or(Error::TransportNotReady(cookie))?;

        let device_formats = self
            .media
            .as_ref()
            .map(MediaLayer::device_formats)
            .unwrap_or_default();

        let mut audio = MediaDescription::new(MediaType::Audio, Some(address.ip()), address.port());

        for format in OFFER_ORDER {
            if device_formats.contains(&format)
                && let Some(pt) = self.config.payload_type(format)
            {
                audio.add_rtpmap(pt, format.encoding_name(), format.clock_rate());
            }
        }

        audio.add_rtpmap(self.config.dtmf_pt, "telephone-event", 8000);

        Ok(SessionDescription {
            address: Some(address.ip()),
            media: vec![audio],
        })
    }

    /// Start sending and receiving audio of a call and make it the current call
    ///
    /// The audio device is only reopened if no other call is current. Starting a call which already ended does
    /// nothing and `on_started` is not called.
    pub fn start_call(
        &mut self,
        cookie: CallCookie,
        remote: &SessionDescription,
        on_started: impl FnOnce(CallCookie),
    ) -> Result<(), Error> {
        let Some(call) = self.calls.get(cookie) else {
            log::debug!("not starting call {cookie:?}, it already ended");
            return Ok(());
        };

        if call.local_rtp.is_none() {
            return Err(Error::TransportNotReady(cookie));
        }

        let remote_audio = remote.audio().ok_or(Error::NoUsableFormat)?;
        let remote_addr = remote
            .media_address(remote_audio)
            .ok_or(Error::MissingConnectionAddress)?;

        let format = call.format.map(|(format, _)| format);

        if self.current.is_none() {
            self.reopen_audio(format)?;
        }

        log::debug!("starting call {cookie:?} with {remote_addr}");

        let call = &mut self.calls[cookie];
        call.transport.start(remote_addr);
        call.phase = Phase::Started;

        self.set_current(Some(cookie));

        on_started(cookie);

        Ok(())
    }

    /// End a call and release its transport
    ///
    /// Closes the audio device if no call is current anymore. The UI is always notified, even if the call is
    /// unknown or was already ended.
    pub fn end_call(&mut self, cookie: CallCookie, reason: &str) {
        if let Some(mut call) = self.calls.remove(cookie) {
            log::debug!("ending call {cookie:?}: {reason}");

            call.transport.stop();

            if self.current == Some(cookie) {
                self.set_current(None);
            }

            if self.current.is_none()
                && let Some(media) = &mut self.media
                && let Err(e) = media.close()
            {
                log::warn!("failed to close audio device, {e}");
            }
        } else {
            log::debug!("end_call on unknown call {cookie:?}");
        }

        self.ui.call_disconnected(cookie, reason);
    }

    /// Handle a packet received on a call's transport
    ///
    /// Only audio of the current call is played, comfort noise and unknown payload types are dropped.
    pub fn receive_rtp(&mut self, cookie: CallCookie, packet: RtpPacket) {
        if self.current != Some(cookie) {
            return;
        }

        let format = match self.config.format_for_payload_type(packet.pt) {
            Some(format) if format.is_comfort_noise() => return,
            Some(format) if self.library.is_known(format) => format,
            _ => {
                log::warn!(
                    "unexpected RTP payload type {} with {} bytes",
                    packet.pt,
                    packet.payload.len()
                );
                return;
            }
        };

        let Some(media) = &mut self.media else {
            return;
        };

        let packet = AudioPacket {
            format,
            sequence_number: packet.sequence_number,
            payload: packet.payload,
        };

        if let Err(e) = media.write(&packet) {
            log::debug!("dropping received audio, {e}");
        }
    }

    /// Next chunk of captured audio to send on a call
    ///
    /// Returns `None` if the call is not current, muted or nothing has been captured.
    pub fn give_rtp(&mut self, cookie: CallCookie) -> Option<MediaSample> {
        if self.current != Some(cookie) || self.muted {
            return None;
        }

        self.media.as_mut()?.read()
    }

    pub fn mute_call(&mut self, cookie: CallCookie) -> Result<(), Error> {
        self.ensure_current(cookie)?;
        self.muted = true;
        Ok(())
    }

    pub fn unmute_call(&mut self, cookie: CallCookie) -> Result<(), Error> {
        self.ensure_current(cookie)?;
        self.muted = false;
        Ok(())
    }

    /// Make another established call the current one, e.g. to resume a call on hold
    ///
    /// Calls which have not been started yet become current with [`start_call`](Self::start_call).
    pub fn switch_call_audio(&mut self, cookie: CallCookie) {
        match self.calls.get(cookie) {
            Some(call) if call.phase == Phase::Started => self.set_current(Some(cookie)),
            Some(_) => log::debug!("can't switch audio to call {cookie:?}, it has not been started"),
            None => log::debug!("can't switch audio to unknown call {cookie:?}"),
        }
    }

    pub fn start_dtmf(&mut self, cookie: CallCookie, digit: char) -> Result<(), Error> {
        let digit = validate_dtmf_digit(digit)?;

        self.calls
            .get_mut(cookie)
            .ok_or(Error::UnknownCall(cookie))?
            .transport
            .start_dtmf(digit);

        Ok(())
    }

    pub fn stop_dtmf(&mut self, cookie: CallCookie, digit: char) -> Result<(), Error> {
        let digit = validate_dtmf_digit(digit)?;

        self.calls
            .get_mut(cookie)
            .ok_or(Error::UnknownCall(cookie))?
            .transport
            .stop_dtmf(digit);

        Ok(())
    }

    pub fn status_message(&mut self, message: &str) {
        self.ui.status_message(message);
    }

    pub fn debug_message(&mut self, message: &str) {
        self.ui.debug_message(message);
    }

    pub fn call_state(&self, cookie: CallCookie) -> CallState {
        let Some(call) = self.calls.get(cookie) else {
            return CallState::Ended;
        };

        match call.phase {
            Phase::Setup => CallState::Created,
            Phase::Negotiating => CallState::Negotiating,
            Phase::Started if self.current != Some(cookie) => CallState::Parked,
            Phase::Started if self.muted => CallState::Muted,
            Phase::Started => CallState::Active,
        }
    }

    pub fn current_call(&self) -> Option<CallCookie> {
        self.current
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Returns a duration after which [`poll`](Self::poll) must be called
    pub fn timeout(&self) -> Option<Duration> {
        self.media.as_ref()?.timeout()
    }

    pub fn poll(&mut self, now: Instant) {
        if let Some(media) = &mut self.media {
            media.poll(now);
        }
    }

    fn ensure_current(&self, cookie: CallCookie) -> Result<(), Error> {
        if self.current == Some(cookie) {
            Ok(())
        } else {
            Err(Error::NotCurrentCall {
                current: self.current,
                requested: cookie,
            })
        }
    }

    /// Move the current call pointer, the mute flag doesn't carry over to another call
    fn set_current(&mut self, cookie: Option<CallCookie>) {
        if self.current != cookie {
            self.muted = false;
            self.current = cookie;
        }
    }

    fn open_audio_device(&mut self) -> Result<(), Error> {
        if self.media.is_some() {
            return Ok(());
        }

        log::debug!("getting new audio device");

        let device = self.audio_backend.open(&self.config.audio)?;

        let mut media = MediaLayer::new(device, self.library.clone());
        media.close()?;

        self.media = Some(media);

        Ok(())
    }

    /// Reopen the audio device with the given format, or the first usable of the configured preference
    fn reopen_audio(&mut self, format: Option<AudioFormat>) -> Result<(), Error> {
        self.open_audio_device()?;

        let Some(media) = &mut self.media else {
            return Ok(());
        };

        media.close()?;

        match format {
            Some(format) => media.select_default_format(&[format])?,
            None => media.select_default_format(&self.config.format_preference)?,
        };

        media.reopen(None)?;

        Ok(())
    }
}
