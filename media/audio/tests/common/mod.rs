#![allow(dead_code)]

use bytes::Bytes;
use codec::AudioFormat;
use ezk_audio::{AudioDevice, CaptureEncoder};
use std::{
    cell::RefCell,
    collections::{BTreeSet, VecDeque},
    io,
    rc::Rc,
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the fake device was asked to do
#[derive(Default)]
pub(crate) struct DeviceState {
    pub(crate) open: bool,
    pub(crate) reopen_count: usize,
    pub(crate) close_count: usize,
    pub(crate) written: Vec<Vec<u8>>,
    pub(crate) captured: VecDeque<Bytes>,
    pub(crate) encoder: Option<Box<dyn CaptureEncoder>>,
    pub(crate) fail_writes: bool,
}

pub(crate) struct FakeDevice {
    pub(crate) formats: BTreeSet<AudioFormat>,
    pub(crate) state: Rc<RefCell<DeviceState>>,
}

impl FakeDevice {
    pub(crate) fn new() -> (Self, Rc<RefCell<DeviceState>>) {
        let state = Rc::new(RefCell::new(DeviceState::default()));

        let device = Self {
            formats: BTreeSet::from([AudioFormat::Pcmu, AudioFormat::Pcma]),
            state: state.clone(),
        };

        (device, state)
    }
}

/// Push `pcm` through the encoder installed on the device, like a capture callback would
pub(crate) fn capture(state: &Rc<RefCell<DeviceState>>, pcm: &[u8]) {
    let mut encoder = state.borrow_mut().encoder.take().expect("no encoder installed");
    encoder.handle_audio(pcm);
    state.borrow_mut().encoder = Some(encoder);
}

impl AudioDevice for FakeDevice {
    fn formats(&self) -> BTreeSet<AudioFormat> {
        self.formats.clone()
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn reopen(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.open = true;
        state.reopen_count += 1;
        state.written.clear();
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.open = false;
        state.close_count += 1;
        Ok(())
    }

    fn read(&mut self) -> Option<Bytes> {
        self.state.borrow_mut().captured.pop_front()
    }

    fn write(&mut self, pcm: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();

        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
        }

        state.written.push(pcm.to_vec());
        Ok(pcm.len())
    }

    fn set_encoder(&mut self, encoder: Box<dyn CaptureEncoder>) {
        self.state.borrow_mut().encoder = Some(encoder);
    }
}
