#![allow(dead_code)]

use audio::{AudioBackend, AudioConfig, AudioDevice, CaptureEncoder};
use bytes::Bytes;
use codec::{AudioFormat, CodecLibrary};
use ezk_phone::{
    CallCookie, CallDialog, CallDirection, IncomingCallAnswer, Phone, PhoneConfig, PhoneUi, RtpTransport,
    RtpTransportFactory, Signalling,
    sdp::{MediaDescription, MediaType, SessionDescription},
};
use futures_util::{FutureExt, future::LocalBoxFuture};
use std::{
    cell::RefCell,
    collections::{BTreeSet, VecDeque},
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    rc::Rc,
};

pub(crate) const LOCAL_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
pub(crate) const REMOTE_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7));

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// UI

pub(crate) struct UiState {
    pub(crate) answer: IncomingCallAnswer,
    pub(crate) started: Vec<CallCookie>,
    pub(crate) incoming: Vec<(String, CallCookie)>,
    pub(crate) disconnected: Vec<(CallCookie, String)>,
    pub(crate) status: Vec<String>,
    pub(crate) debug: Vec<String>,
    /// Answer of the credentials prompt, the UI can't ask if `None`
    pub(crate) auth: Option<Option<(String, String)>>,
    pub(crate) auth_prompts: Vec<String>,
}

struct FakeUi(Rc<RefCell<UiState>>);

impl PhoneUi for FakeUi {
    fn call_started(&mut self, cookie: CallCookie) {
        self.0.borrow_mut().started.push(cookie);
    }

    fn incoming_call(
        &mut self,
        caller: &str,
        cookie: CallCookie,
    ) -> LocalBoxFuture<'static, IncomingCallAnswer> {
        let mut state = self.0.borrow_mut();
        state.incoming.push((caller.into(), cookie));
        futures_util::future::ready(state.answer).boxed_local()
    }

    fn call_disconnected(&mut self, cookie: CallCookie, reason: &str) {
        self.0.borrow_mut().disconnected.push((cookie, reason.into()));
    }

    fn get_auth(&mut self, prompt: &str) -> Option<LocalBoxFuture<'static, Option<(String, String)>>> {
        let mut state = self.0.borrow_mut();
        let answer = state.auth.clone()?;
        state.auth_prompts.push(prompt.into());
        Some(futures_util::future::ready(answer).boxed_local())
    }

    fn status_message(&mut self, message: &str) {
        self.0.borrow_mut().status.push(message.into());
    }

    fn debug_message(&mut self, message: &str) {
        self.0.borrow_mut().debug.push(message.into());
    }
}

// Signalling

#[derive(Default)]
pub(crate) struct SignallingState {
    pub(crate) registered: Vec<String>,
    pub(crate) placed: Vec<String>,
}

struct FakeSignalling(Rc<RefCell<SignallingState>>);

impl Signalling for FakeSignalling {
    fn register(&mut self, uri: &str) {
        self.0.borrow_mut().registered.push(uri.into());
    }

    fn place_call(&mut self, uri: &str) {
        self.0.borrow_mut().placed.push(uri.into());
    }
}

pub(crate) struct FakeDialog {
    pub(crate) direction: CallDirection,
    pub(crate) dropped: Rc<RefCell<bool>>,
}

impl FakeDialog {
    pub(crate) fn new(direction: CallDirection) -> (Box<dyn CallDialog>, Rc<RefCell<bool>>) {
        let dropped = Rc::new(RefCell::new(false));

        let dialog = FakeDialog {
            direction,
            dropped: dropped.clone(),
        };

        (Box::new(dialog), dropped)
    }
}

impl CallDialog for FakeDialog {
    fn direction(&self) -> CallDirection {
        self.direction
    }

    fn caller(&self) -> String {
        "sip:alice@example.com".into()
    }

    fn local_sip_address(&self) -> IpAddr {
        LOCAL_IP
    }

    fn uses_stun(&self) -> bool {
        false
    }

    fn drop_call(&mut self) {
        *self.dropped.borrow_mut() = true;
    }
}

// RTP transports

#[derive(Default)]
pub(crate) struct TransportState {
    pub(crate) visible_address: Option<SocketAddr>,
    pub(crate) started: Option<SocketAddr>,
    pub(crate) stopped: bool,
    pub(crate) dtmf: Vec<String>,
    pub(crate) unsupported: BTreeSet<AudioFormat>,
}

#[derive(Default)]
pub(crate) struct TransportsState {
    pub(crate) fail_sockets: bool,
    pub(crate) unsupported: BTreeSet<AudioFormat>,
    pub(crate) created: Vec<(CallCookie, Rc<RefCell<TransportState>>)>,
}

struct FakeTransportFactory(Rc<RefCell<TransportsState>>);

impl RtpTransportFactory for FakeTransportFactory {
    fn create(&mut self, cookie: CallCookie) -> Box<dyn RtpTransport> {
        let mut transports = self.0.borrow_mut();

        let state = Rc::new(RefCell::new(TransportState {
            unsupported: transports.unsupported.clone(),
            ..Default::default()
        }));

        let port = 40000 + 2 * transports.created.len() as u16;
        transports.created.push((cookie, state.clone()));

        Box::new(FakeTransport {
            state,
            port,
            fail: transports.fail_sockets,
        })
    }
}

struct FakeTransport {
    state: Rc<RefCell<TransportState>>,
    port: u16,
    fail: bool,
}

impl RtpTransport for FakeTransport {
    fn create_socket(
        &mut self,
        local_ip: IpAddr,
        _use_stun: bool,
    ) -> LocalBoxFuture<'static, io::Result<SocketAddr>> {
        if self.fail {
            let error = io::Error::new(io::ErrorKind::AddrInUse, "no free port");
            return futures_util::future::ready(Err(error)).boxed_local();
        }

        let address = SocketAddr::new(local_ip, self.port);
        self.state.borrow_mut().visible_address = Some(address);

        futures_util::future::ready(Ok(address)).boxed_local()
    }

    fn visible_address(&self) -> Option<SocketAddr> {
        self.state.borrow().visible_address
    }

    fn supports_format(&self, format: AudioFormat) -> bool {
        !self.state.borrow().unsupported.contains(&format)
    }

    fn start(&mut self, remote: SocketAddr) {
        self.state.borrow_mut().started = Some(remote);
    }

    fn stop(&mut self) {
        self.state.borrow_mut().stopped = true;
    }

    fn start_dtmf(&mut self, digit: char) {
        self.state.borrow_mut().dtmf.push(format!("+{digit}"));
    }

    fn stop_dtmf(&mut self, digit: char) {
        self.state.borrow_mut().dtmf.push(format!("-{digit}"));
    }
}

// Audio device

#[derive(Default)]
pub(crate) struct DeviceState {
    pub(crate) formats: BTreeSet<AudioFormat>,
    pub(crate) acquired: usize,
    pub(crate) open: bool,
    pub(crate) reopen_count: usize,
    pub(crate) written: Vec<Vec<u8>>,
    pub(crate) captured: VecDeque<Bytes>,
    pub(crate) encoder: Option<Box<dyn CaptureEncoder>>,
    pub(crate) fail_writes: bool,
}

struct FakeBackend(Rc<RefCell<DeviceState>>);

impl AudioBackend for FakeBackend {
    fn open(&self, _config: &AudioConfig) -> io::Result<Box<dyn AudioDevice>> {
        self.0.borrow_mut().acquired += 1;
        Ok(Box::new(FakeDevice(self.0.clone())))
    }
}

struct FakeDevice(Rc<RefCell<DeviceState>>);

impl AudioDevice for FakeDevice {
    fn formats(&self) -> BTreeSet<AudioFormat> {
        self.0.borrow().formats.clone()
    }

    fn is_open(&self) -> bool {
        self.0.borrow().open
    }

    fn reopen(&mut self) -> io::Result<()> {
        let mut state = self.0.borrow_mut();
        state.open = true;
        state.reopen_count += 1;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.0.borrow_mut().open = false;
        Ok(())
    }

    fn read(&mut self) -> Option<Bytes> {
        self.0.borrow_mut().captured.pop_front()
    }

    fn write(&mut self, pcm: &[u8]) -> io::Result<usize> {
        let mut state = self.0.borrow_mut();

        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }

        state.written.push(pcm.to_vec());
        Ok(pcm.len())
    }

    fn set_encoder(&mut self, encoder: Box<dyn CaptureEncoder>) {
        self.0.borrow_mut().encoder = Some(encoder);
    }
}

// Harness

pub(crate) struct Harness {
    pub(crate) phone: Phone,
    pub(crate) ui: Rc<RefCell<UiState>>,
    pub(crate) signalling: Rc<RefCell<SignallingState>>,
    pub(crate) transports: Rc<RefCell<TransportsState>>,
    pub(crate) device: Rc<RefCell<DeviceState>>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_config(PhoneConfig::default(), CodecLibrary::new())
    }

    pub(crate) fn with_config(config: PhoneConfig, library: CodecLibrary) -> Self {
        init_logger();

        let ui = Rc::new(RefCell::new(UiState {
            answer: IncomingCallAnswer::Accept,
            started: vec![],
            incoming: vec![],
            disconnected: vec![],
            status: vec![],
            debug: vec![],
            auth: None,
            auth_prompts: vec![],
        }));
        let signalling = Rc::new(RefCell::new(SignallingState::default()));
        let transports = Rc::new(RefCell::new(TransportsState::default()));
        let device = Rc::new(RefCell::new(DeviceState {
            formats: BTreeSet::from([AudioFormat::Pcmu, AudioFormat::Pcma, AudioFormat::Gsm]),
            ..Default::default()
        }));

        let mut phone = Phone::new(
            config,
            library,
            Box::new(FakeUi(ui.clone())),
            Box::new(FakeBackend(device.clone())),
            Box::new(FakeTransportFactory(transports.clone())),
        );
        phone.set_signalling(Box::new(FakeSignalling(signalling.clone())));

        Self {
            phone,
            ui,
            signalling,
            transports,
            device,
        }
    }

    pub(crate) fn transport(&self, cookie: CallCookie) -> Rc<RefCell<TransportState>> {
        self.transports
            .borrow()
            .created
            .iter()
            .find(|(c, _)| *c == cookie)
            .map(|(_, state)| state.clone())
            .expect("no transport created for call")
    }

    /// Accept a call and complete its setup
    pub(crate) async fn setup_call(&mut self, direction: CallDirection) -> CallCookie {
        let (dialog, _) = FakeDialog::new(direction);
        let pending = self.phone.accept_call(dialog).unwrap();
        let setup = pending.await;
        self.phone.finish_setup(setup).unwrap()
    }

    /// Set up an outbound call, negotiate with `remote` and start it
    pub(crate) async fn start_call(&mut self, remote: &SessionDescription) -> CallCookie {
        let cookie = self.setup_call(CallDirection::Outbound).await;
        self.phone.select_format(cookie, remote).unwrap();
        self.phone.start_call(cookie, remote, |_| {}).unwrap();
        cookie
    }
}

/// Remote SDP offering the given payload types, with rtpmap entries for dynamic ones
pub(crate) fn remote_sdp(port: u16, formats: &[(u8, &str)]) -> SessionDescription {
    let mut audio = MediaDescription::new(MediaType::Audio, None, port);

    for &(pt, encoding) in formats {
        audio.add_rtpmap(pt, encoding, 8000);
    }

    SessionDescription {
        address: Some(REMOTE_IP),
        media: vec![audio],
    }
}

pub(crate) fn pcmu_offer(port: u16) -> SessionDescription {
    remote_sdp(port, &[(0, "PCMU"), (101, "telephone-event")])
}
