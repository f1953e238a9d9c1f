//! Builder for command sequences
//!
//! Device protocols describe their register traffic with a [`Sequence`]
//! instead of talking to the bus, so the result can be batched, inspected
//! or replayed by any [`CommandExecutor`](crate::traits::CommandExecutor).

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::command::{Command, GpioPin};
use crate::traits::Opcode;

/// An ordered list of commands for the executor
pub type Commands = Vec<Command>;

/// Appends commands in the order they have to reach the panel
#[derive(Debug, Default, Clone)]
pub(crate) struct Sequence {
    commands: Commands,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    /// Send a command byte
    pub fn cmd<O: Opcode>(&mut self, op: O) -> &mut Self {
        self.raw_cmd(op.address())
    }

    pub fn raw_cmd(&mut self, byte: u8) -> &mut Self {
        self.commands.push(Command::SendCommand { byte });
        self
    }

    /// Send a command followed by its parameters, one byte per data transfer
    pub fn cmd_with_data<O: Opcode>(&mut self, op: O, data: &[u8]) -> &mut Self {
        self.cmd(op);
        self.commands
            .extend(data.iter().map(|&byte| Command::data_byte(byte)));
        self
    }

    /// Send a data block
    ///
    /// Controllers that latch every byte separately need `single_byte_write`.
    pub fn data_block(&mut self, data: &[u8], single_byte_write: bool) -> &mut Self {
        if single_byte_write {
            self.commands
                .extend(data.iter().map(|&byte| Command::data_byte(byte)));
        } else {
            self.commands.push(Command::SendData {
                bytes: data.to_vec(),
            });
        }
        self
    }

    pub fn sleep(&mut self, milliseconds: u32) -> &mut Self {
        self.commands.push(Command::Sleep { milliseconds });
        self
    }

    pub fn wait_until_idle(&mut self) -> &mut Self {
        self.commands.push(Command::WaitForIdle);
        self
    }

    /// Give the controller time to pull busy before polling it
    pub fn sleep_then_wait(&mut self, milliseconds: u32) -> &mut Self {
        self.sleep(milliseconds).wait_until_idle()
    }

    pub fn debug(&mut self, text: &str) -> &mut Self {
        self.commands.push(Command::DebugMessage {
            text: String::from(text),
        });
        self
    }

    pub fn gpio(&mut self, pin: GpioPin, level: bool) -> &mut Self {
        self.commands.push(Command::SetGpio { pin, level });
        self
    }

    /// Hardware reset: high, low, high again with the given hold times
    pub fn reset(&mut self, high_ms: u32, low_ms: u32, settle_ms: u32) -> &mut Self {
        self.gpio(GpioPin::Reset, true)
            .sleep(high_ms)
            .gpio(GpioPin::Reset, false)
            .sleep(low_ms)
            .gpio(GpioPin::Reset, true)
            .sleep(settle_ms)
    }

    /// Read one byte after sending `op`, tagged with `correlation_id`
    pub fn read<O: Opcode>(&mut self, op: O, correlation_id: u32) -> &mut Self {
        self.commands.push(Command::ReadData {
            command: op.address(),
            correlation_id,
            value: None,
        });
        self
    }

    pub fn append(&mut self, commands: Commands) -> &mut Self {
        self.commands.extend(commands);
        self
    }

    pub fn build(&mut self) -> Commands {
        core::mem::replace(&mut self.commands, vec![])
    }
}
