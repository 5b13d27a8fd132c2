//! Recording bus channel for driver tests
//!
//! Every channel handed out shares one [`BusLog`], so a test can keep a
//! clone of the channel as a probe after moving the original into a driver.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use periph_hal::{I2cChannel, I2cManager, OutputPin, Register};

/// Size of the simulated register space
const MEMORY_SIZE: usize = 0x1_0000;

/// One bus operation as seen by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(Vec<u8>),
    Read(usize),
    WriteReg(Register, u8),
    WriteRegBuffer(Register, Vec<u8>),
    ReadRegBuffer(Register, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

#[derive(Debug)]
pub struct BusLog {
    /// Successful operations, oldest first
    pub ops: Vec<Op>,
    /// Operation index that fails (counted over successful ops)
    pub fail_at: Option<usize>,
    pub closes: usize,
    /// Channels opened through [`MockManager`]
    pub opened: Vec<(String, u8)>,
    /// Register space for register reads and writes
    pub memory: Vec<u8>,
    /// Bytes returned by plain reads
    pub response: Vec<u8>,
}

impl Default for BusLog {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            fail_at: None,
            closes: 0,
            opened: Vec::new(),
            memory: vec![0; MEMORY_SIZE],
            response: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockChannel {
    address: u8,
    log: Rc<RefCell<BusLog>>,
}

impl MockChannel {
    pub fn new(address: u8) -> Self {
        Self::sharing(address, Rc::new(RefCell::new(BusLog::default())))
    }

    fn sharing(address: u8, log: Rc<RefCell<BusLog>>) -> Self {
        Self { address, log }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.log.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.log.borrow_mut().ops.clear();
    }

    pub fn closes(&self) -> usize {
        self.log.borrow().closes
    }

    pub fn opened(&self) -> Vec<(String, u8)> {
        self.log.borrow().opened.clone()
    }

    /// Fail the `n`th operation from now
    pub fn fail_after(&self, n: usize) {
        let mut log = self.log.borrow_mut();
        log.fail_at = Some(log.ops.len() + n);
    }

    pub fn set_response(&self, bytes: &[u8]) {
        self.log.borrow_mut().response = bytes.to_vec();
    }

    pub fn memory(&self, offset: usize, len: usize) -> Vec<u8> {
        self.log.borrow().memory[offset..offset + len].to_vec()
    }

    pub fn fill_memory(&self, offset: usize, bytes: &[u8]) {
        self.log.borrow_mut().memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn record(&self, op: Op) -> Result<(), MockError> {
        let mut log = self.log.borrow_mut();
        if log.fail_at == Some(log.ops.len()) {
            log.fail_at = None;
            return Err(MockError);
        }
        log.ops.push(op);
        Ok(())
    }
}

fn offset(reg: Register) -> usize {
    match reg {
        Register::Byte(reg) => reg as usize,
        Register::Word(reg) => reg as usize,
    }
}

impl I2cChannel for MockChannel {
    type Error = MockError;

    fn address(&self) -> u8 {
        self.address
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.record(Op::Write(data.to_vec()))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.record(Op::Read(buf.len()))?;
        let log = self.log.borrow();
        let n = buf.len().min(log.response.len());
        buf[..n].copy_from_slice(&log.response[..n]);
        Ok(())
    }

    fn write_reg_byte(&mut self, reg: Register, value: u8) -> Result<(), Self::Error> {
        self.record(Op::WriteReg(reg, value))
    }

    fn write_reg_buffer(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error> {
        self.record(Op::WriteRegBuffer(reg, data.to_vec()))?;
        let start = offset(reg);
        self.log.borrow_mut().memory[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_reg_buffer(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.record(Op::ReadRegBuffer(reg, buf.len()))?;
        let start = offset(reg);
        buf.copy_from_slice(&self.log.borrow().memory[start..start + buf.len()]);
        Ok(())
    }

    fn close(self) -> Result<(), Self::Error> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}

/// Hands out channels that all share the probe's log
pub struct MockManager {
    log: Rc<RefCell<BusLog>>,
    pub fail_open: bool,
}

impl MockManager {
    pub fn with_probe() -> (Self, MockChannel) {
        let log = Rc::new(RefCell::new(BusLog::default()));
        let probe = MockChannel::sharing(0, log.clone());
        let manager = Self {
            log,
            fail_open: false,
        };
        (manager, probe)
    }
}

impl I2cManager for MockManager {
    type Channel = MockChannel;

    fn open(&mut self, bus: &str, address: u8) -> Result<MockChannel, MockError> {
        if self.fail_open {
            return Err(MockError);
        }
        self.log
            .borrow_mut()
            .opened
            .push((bus.to_string(), address));
        Ok(MockChannel::sharing(address, self.log.clone()))
    }
}

/// Output pin whose level stays observable through clones
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high.set(true);
    }

    fn set_low(&mut self) {
        self.high.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.high.get()
    }
}
